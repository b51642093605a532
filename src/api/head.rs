use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentHead;
use crate::core::state::AppState;
use crate::schemas::analytics::{
    ClassProgressResponse, ClassSummaryResponse, StudentProgressResponse,
};
use crate::services::analytics::{self, ProgressFilter};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgressQuery {
    #[serde(default)]
    student_id: Option<String>,
    #[serde(default)]
    class_id: Option<String>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/results/class/:class_id", get(class_results))
        .route("/graph", get(class_graph))
        .route("/graph/student/:student_id", get(student_graph))
}

async fn class_results(
    Path(class_id): Path<String>,
    CurrentHead(head): CurrentHead,
    State(state): State<AppState>,
) -> Result<Json<ClassSummaryResponse>, ApiError> {
    let summary = analytics::class_summary(state.db(), &class_id).await?;

    tracing::debug!(
        user_id = %head.id,
        class_id = %summary.class_id,
        students = summary.students.len(),
        "Class results served"
    );

    Ok(Json(summary))
}

async fn class_graph(
    Query(params): Query<ProgressQuery>,
    CurrentHead(head): CurrentHead,
    State(state): State<AppState>,
) -> Result<Json<ClassProgressResponse>, ApiError> {
    let filter = ProgressFilter::parse(
        params.student_id.as_deref(),
        params.class_id.as_deref(),
        params.start_date.as_deref(),
        params.end_date.as_deref(),
    )?;
    let progress = analytics::class_progress(state.db(), &filter).await?;

    tracing::debug!(
        user_id = %head.id,
        class_id = ?filter.class_id,
        student_id = ?filter.student_id,
        students = progress.student_details.len(),
        "Class progress graph served"
    );

    Ok(Json(progress))
}

async fn student_graph(
    Path(student_id): Path<String>,
    CurrentHead(head): CurrentHead,
    State(state): State<AppState>,
) -> Result<Json<StudentProgressResponse>, ApiError> {
    let progress = analytics::student_progress(state.db(), &student_id).await?;

    tracing::debug!(
        user_id = %head.id,
        student_id = %progress.student.id,
        entries = progress.stats.total_entries,
        "Student progress graph served"
    );

    Ok(Json(progress))
}

#[cfg(test)]
mod tests;
