use recommend_core::domain::interaction::{ActionKind, InteractionEvent};
use recommend_core::errors::ApplicationError;
use recommend_db::repositories::SqlInteractionRepository;
use tracing::info;

use crate::commands::{
    open_database, prepare, CommandResult, StepFailure, EXIT_INVALID_REQUEST, EXIT_QUERY,
};

pub fn run(user_id: i64, item_id: i64, action: Option<String>, score: Option<u32>) -> CommandResult {
    let action_score = match resolve_score(action.as_deref(), score) {
        Ok(action_score) => action_score,
        Err(error) => {
            let interface = error.into_interface("record");
            return CommandResult::failure(
                "record",
                "invalid_request",
                format!("{} ({interface})", interface.user_message()),
                EXIT_INVALID_REQUEST,
            );
        }
    };

    let (config, runtime) = match prepare("record") {
        Ok(prepared) => prepared,
        Err(result) => return result,
    };

    let event = InteractionEvent::new(user_id, item_id, action_score);

    let result = runtime.block_on(async {
        let pool = open_database(&config).await?;
        SqlInteractionRepository::new(pool.clone())
            .append(&event)
            .await
            .map_err(|error| ("query", error.to_string(), EXIT_QUERY))?;
        pool.close().await;
        Ok::<(), StepFailure>(())
    });

    match result {
        Ok(()) => {
            info!(
                event_name = "cli.record.appended",
                user_id,
                item_id,
                action_score,
                "interaction event recorded"
            );
            CommandResult::success(
                "record",
                format!("recorded user {user_id} -> item {item_id} (score {action_score})"),
            )
        }
        Err(failure) => CommandResult::from_step_failure("record", failure),
    }
}

fn resolve_score(action: Option<&str>, score: Option<u32>) -> Result<u32, ApplicationError> {
    match (action, score) {
        (Some(_), Some(_)) => Err(ApplicationError::InvalidRequest(
            "pass either --action or --score, not both".to_string(),
        )),
        (Some(action), None) => action
            .parse::<ActionKind>()
            .map(|kind| kind.default_score())
            .map_err(ApplicationError::InvalidRequest),
        (None, Some(score)) => Ok(score),
        (None, None) => Err(ApplicationError::InvalidRequest(
            "one of --action or --score is required".to_string(),
        )),
    }
}
