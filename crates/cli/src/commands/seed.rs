use recommend_db::repositories::RepositoryError;
use recommend_db::DemoDataset;
use tracing::info;

use crate::commands::{open_database, prepare, CommandResult, StepFailure, EXIT_QUERY};

pub fn run() -> CommandResult {
    let (config, runtime) = match prepare("seed") {
        Ok(prepared) => prepared,
        Err(result) => return result,
    };

    let result = runtime.block_on(async {
        let pool = open_database(&config).await?;
        let seeded = DemoDataset::load(&pool)
            .await
            .map_err(seed_failure)?;
        pool.close().await;
        Ok::<_, StepFailure>(seeded)
    });

    match result {
        Ok(seeded) => {
            info!(
                event_name = "cli.seed.completed",
                items_seeded = seeded.items_seeded,
                events_seeded = seeded.events_seeded,
                "demo dataset loaded"
            );
            CommandResult::success(
                "seed",
                format!(
                    "loaded demo dataset ({} items, {} interaction events)",
                    seeded.items_seeded, seeded.events_seeded
                ),
            )
        }
        Err(failure) => CommandResult::from_step_failure("seed", failure),
    }
}

fn seed_failure(error: RepositoryError) -> StepFailure {
    ("query", format!("failed to load demo dataset: {error}"), EXIT_QUERY)
}
