use std::process::ExitCode;

fn main() -> ExitCode {
    recommend_cli::run()
}
