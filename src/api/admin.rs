use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::api::pagination::{default_limit, PaginatedResponse};
use crate::api::validation::{parse_id, validate_payload};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::class::{
    ClassCreate, ClassDetailResponse, ClassResponse, StudentIdsPayload, StudentsAssignedResponse,
    StudentsUnassignedResponse, TeacherChangeResponse, TeacherIdPayload,
};
use crate::services::roster;

#[derive(Debug, Deserialize)]
struct ClassListQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/classes", get(list_classes).post(create_class))
        .route("/classes/:class_id", get(get_class))
        .route("/assignstudent/:class_id", put(assign_students))
        .route("/assignteacher/:class_id", put(assign_teacher))
        .route("/unassignstudent/:class_id", put(unassign_students))
        .route("/unassignteacher/:class_id", put(unassign_teacher))
}

async fn list_classes(
    Query(params): Query<ClassListQuery>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<PaginatedResponse<ClassResponse>>, ApiError> {
    let skip = params.skip.max(0);
    let limit = params.limit.clamp(1, 1000);

    let classes = repositories::classes::list(state.db(), skip, limit)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list classes"))?;

    Ok(Json(PaginatedResponse {
        items: classes.into_iter().map(ClassResponse::from_db).collect(),
        skip,
        limit,
    }))
}

async fn create_class(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<ClassCreate>,
) -> Result<(StatusCode, Json<ClassResponse>), ApiError> {
    validate_payload(&payload)?;

    let class = repositories::classes::create(
        state.db(),
        repositories::classes::CreateClass {
            id: &Uuid::new_v4().to_string(),
            name: payload.name.trim(),
            section: payload.section.as_deref().map(str::trim).filter(|s| !s.is_empty()),
            semester: payload.semester.as_deref().map(str::trim).filter(|s| !s.is_empty()),
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create class"))?;

    tracing::info!(
        admin_id = %admin.id,
        class_id = %class.id,
        action = "class_create",
        "Admin created class"
    );

    Ok((StatusCode::CREATED, Json(ClassResponse::from_db(class))))
}

async fn get_class(
    Path(class_id): Path<String>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<ClassDetailResponse>, ApiError> {
    let class_id = parse_id(&class_id, "class id")?;
    let roster = roster::load_roster(state.db(), &class_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load class"))?
        .ok_or_else(|| ApiError::NotFound("Class not found".to_string()))?;

    Ok(Json(ClassDetailResponse::from_roster(roster)))
}

async fn assign_students(
    Path(class_id): Path<String>,
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<StudentIdsPayload>,
) -> Result<Json<StudentsAssignedResponse>, ApiError> {
    let change = roster::assign_students(state.db(), &class_id, &payload.into_ids()).await?;

    tracing::info!(
        admin_id = %admin.id,
        class_id = %change.roster.class.id,
        students = change.affected.len(),
        action = "assign_students",
        "Admin assigned students to class"
    );

    Ok(Json(StudentsAssignedResponse {
        message: "Students assigned successfully".to_string(),
        class: ClassDetailResponse::from_roster(change.roster),
        students_assigned: change.affected,
    }))
}

async fn assign_teacher(
    Path(class_id): Path<String>,
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<TeacherIdPayload>,
) -> Result<Json<TeacherChangeResponse>, ApiError> {
    let change =
        roster::assign_teacher(state.db(), &class_id, payload.teacher_id.as_deref()).await?;

    tracing::info!(
        admin_id = %admin.id,
        class_id = %change.roster.class.id,
        teacher_id = ?change.affected.first(),
        previous_teacher_id = ?change.previous_teacher_id,
        action = "assign_teacher",
        "Admin assigned teacher to class"
    );

    Ok(Json(TeacherChangeResponse {
        message: "Teacher assigned successfully".to_string(),
        class: ClassDetailResponse::from_roster(change.roster),
        previous_teacher_id: change.previous_teacher_id,
    }))
}

async fn unassign_students(
    Path(class_id): Path<String>,
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<StudentIdsPayload>,
) -> Result<Json<StudentsUnassignedResponse>, ApiError> {
    let change = roster::unassign_students(state.db(), &class_id, &payload.into_ids()).await?;

    tracing::info!(
        admin_id = %admin.id,
        class_id = %change.roster.class.id,
        students = change.affected.len(),
        action = "unassign_students",
        "Admin removed students from class"
    );

    Ok(Json(StudentsUnassignedResponse {
        message: "Students unassigned successfully".to_string(),
        class: ClassDetailResponse::from_roster(change.roster),
        students_unassigned: change.affected,
    }))
}

async fn unassign_teacher(
    Path(class_id): Path<String>,
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<TeacherChangeResponse>, ApiError> {
    let change = roster::unassign_teacher(state.db(), &class_id).await?;

    tracing::info!(
        admin_id = %admin.id,
        class_id = %change.roster.class.id,
        previous_teacher_id = ?change.previous_teacher_id,
        action = "unassign_teacher",
        "Admin removed teacher from class"
    );

    Ok(Json(TeacherChangeResponse {
        message: "Teacher unassigned successfully".to_string(),
        class: ClassDetailResponse::from_roster(change.roster),
        previous_teacher_id: change.previous_teacher_id,
    }))
}
