use crate::domain::severity::{classify_name, ClassifiedScore};
use crate::domain::{Condition, ConditionScoreSet};
use crate::state::SharedState;
use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
struct ScoreInput {
    condition: String,
    percentage: i64,
}

#[derive(Debug, Deserialize)]
struct ClassifyPayload {
    scores: Vec<ScoreInput>,
}

#[derive(Debug, Serialize)]
struct ConditionVocabulary {
    condition: Condition,
    labels: Vec<&'static str>,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/classify", post(classify_scores))
        .route("/synthetic", get(synthetic_scores))
        .route("/conditions", get(list_conditions))
        .with_state(state)
}

// Unknown condition names are listed with the "Unknown" label rather than rejected.
async fn classify_scores(Json(payload): Json<ClassifyPayload>) -> Json<Vec<ClassifiedScore>> {
    let rows = payload
        .scores
        .into_iter()
        .map(|input| ClassifiedScore {
            severity: classify_name(input.percentage, &input.condition),
            condition: input.condition,
            percentage: input.percentage,
        })
        .collect();
    Json(rows)
}

async fn synthetic_scores() -> Json<ConditionScoreSet> {
    Json(ConditionScoreSet::synthetic())
}

async fn list_conditions() -> Json<Vec<ConditionVocabulary>> {
    let vocabularies = Condition::ALL
        .iter()
        .map(|c| ConditionVocabulary {
            condition: *c,
            labels: c.labels(),
        })
        .collect();
    Json(vocabularies)
}
