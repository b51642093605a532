use axum::{extract::State, routing::get, Json, Router};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentStudent;
use crate::core::state::AppState;
use crate::repositories;
use crate::repositories::marks::MarkFilter;
use crate::schemas::class::ClassResponse;
use crate::schemas::mark::MarkResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/classes", get(list_classes)).route("/marks", get(list_marks))
}

/// Classes from the student's own assignment index.
async fn list_classes(
    CurrentStudent(student): CurrentStudent,
    State(state): State<AppState>,
) -> Result<Json<Vec<ClassResponse>>, ApiError> {
    let class_ids = repositories::users::list_assigned_class_ids(state.db(), &student.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list assigned classes"))?;
    let classes = repositories::classes::list_by_ids(state.db(), &class_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load classes"))?;

    Ok(Json(classes.into_iter().map(ClassResponse::from_db).collect()))
}

async fn list_marks(
    CurrentStudent(student): CurrentStudent,
    State(state): State<AppState>,
) -> Result<Json<Vec<MarkResponse>>, ApiError> {
    let filter = MarkFilter { student_id: Some(student.id), ..Default::default() };
    let marks = repositories::marks::list_details(state.db(), &filter)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list marks"))?;

    Ok(Json(marks.iter().map(MarkResponse::from_detail).collect()))
}

#[cfg(test)]
mod tests;
