use std::future::Future;

use recommend_core::domain::interaction::UserId;
use recommend_core::domain::item::ItemId;
use recommend_core::recommend::{RecommendResult, Recommendation, RecommendationEngine};
use serde::Serialize;
use tracing::info;

use crate::commands::{
    build_engine, open_database, prepare, serialize_payload, CommandResult, StepFailure,
    EXIT_QUERY,
};

#[derive(Debug, Serialize)]
struct RecommendationReport {
    command: &'static str,
    status: &'static str,
    limit: usize,
    recommendations: Vec<RecommendedItem>,
}

#[derive(Debug, Serialize)]
struct RecommendedItem {
    item_id: i64,
    name: String,
    tags: Vec<String>,
    score: f64,
}

impl From<Recommendation> for RecommendedItem {
    fn from(recommendation: Recommendation) -> Self {
        let tags = recommendation.item.tags().into_iter().collect();
        Self {
            item_id: recommendation.item.id.0,
            name: recommendation.item.name,
            tags,
            score: recommendation.score,
        }
    }
}

pub fn related(item_id: i64, limit: Option<usize>) -> CommandResult {
    run_query("related", limit, move |engine, limit| async move {
        engine.recommend_related_scored(ItemId(item_id), limit).await
    })
}

pub fn homepage(user_id: i64, limit: Option<usize>) -> CommandResult {
    run_query("homepage", limit, move |engine, limit| async move {
        engine.recommend_for_homepage_scored(UserId(user_id), limit).await
    })
}

pub fn cart(item_ids: Vec<i64>, limit: Option<usize>) -> CommandResult {
    let cart = item_ids.into_iter().map(ItemId).collect::<Vec<_>>();
    run_query("cart", limit, move |engine, limit| async move {
        engine.recommend_for_cart_scored(&cart, limit).await
    })
}

fn run_query<F, Fut>(command: &'static str, limit: Option<usize>, query: F) -> CommandResult
where
    F: FnOnce(RecommendationEngine, usize) -> Fut,
    Fut: Future<Output = RecommendResult<Vec<Recommendation>>>,
{
    let (config, runtime) = match prepare(command) {
        Ok(prepared) => prepared,
        Err(result) => return result,
    };
    let limit = limit.unwrap_or(config.engine.default_limit);

    let result = runtime.block_on(async {
        let pool = open_database(&config).await?;
        let engine = build_engine(&config, &pool);
        let recommendations = query(engine, limit).await.map_err(|error| {
            let interface = error.into_interface(command);
            ("query", format!("{} ({interface})", interface.user_message()), EXIT_QUERY)
        })?;
        pool.close().await;
        Ok::<_, StepFailure>(recommendations)
    });

    match result {
        Ok(recommendations) => {
            info!(
                event_name = "cli.recommend.completed",
                command,
                limit,
                returned = recommendations.len(),
                "recommendations produced"
            );
            let report = RecommendationReport {
                command,
                status: "ok",
                limit,
                recommendations: recommendations.into_iter().map(RecommendedItem::from).collect(),
            };
            CommandResult { exit_code: 0, output: serialize_payload(&report) }
        }
        Err(failure) => CommandResult::from_step_failure(command, failure),
    }
}
