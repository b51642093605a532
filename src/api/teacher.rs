use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::{require_class_ownership, CurrentTeacher};
use crate::api::pagination::PageWindow;
use crate::api::validation::{parse_id, validate_payload};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::class::ClassResponse;
use crate::schemas::content::{
    AssignmentCreate, AssignmentResponse, MaterialCreate, MaterialListQuery,
    MaterialListResponse, MaterialResponse, QuizCreate, QuizResponse,
};
use crate::schemas::mark::{MarkCreate, MarkResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/classes", get(list_classes))
        .route("/addquiz", post(create_quiz))
        .route("/addassign", post(create_assignment))
        .route("/materials", get(list_materials).post(create_material))
        .route("/marks", post(create_mark))
}

async fn list_classes(
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
) -> Result<Json<Vec<ClassResponse>>, ApiError> {
    let classes = repositories::classes::list_for_teacher(state.db(), &teacher.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list classes"))?;

    Ok(Json(classes.into_iter().map(ClassResponse::from_db).collect()))
}

async fn create_quiz(
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
    Json(payload): Json<QuizCreate>,
) -> Result<(StatusCode, Json<QuizResponse>), ApiError> {
    validate_payload(&payload)?;
    let class = require_class_ownership(&state, &teacher, &payload.class_id).await?;

    let quiz = repositories::quizzes::create(
        state.db(),
        repositories::quizzes::CreateQuiz {
            id: &Uuid::new_v4().to_string(),
            class_id: &class.id,
            title: payload.title.trim(),
            questions: payload.questions.into_iter().map(Into::into).collect(),
            created_by: &teacher.id,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create quiz"))?;

    tracing::info!(
        teacher_id = %teacher.id,
        class_id = %class.id,
        quiz_id = %quiz.id,
        questions = quiz.questions.0.len(),
        action = "quiz_create",
        "Teacher created quiz"
    );

    Ok((StatusCode::CREATED, Json(QuizResponse::from_db(quiz))))
}

async fn create_assignment(
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
    Json(payload): Json<AssignmentCreate>,
) -> Result<(StatusCode, Json<AssignmentResponse>), ApiError> {
    validate_payload(&payload)?;
    let class = require_class_ownership(&state, &teacher, &payload.class_id).await?;

    let assignment = repositories::assignments::create(
        state.db(),
        repositories::assignments::CreateAssignment {
            id: &Uuid::new_v4().to_string(),
            class_id: &class.id,
            title: payload.title.trim(),
            description: payload.description.trim(),
            file_url: payload.file_url.trim(),
            created_by: &teacher.id,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create assignment"))?;

    tracing::info!(
        teacher_id = %teacher.id,
        class_id = %class.id,
        assignment_id = %assignment.id,
        action = "assignment_create",
        "Teacher created assignment"
    );

    Ok((StatusCode::CREATED, Json(AssignmentResponse::from_db(assignment))))
}

async fn list_materials(
    Query(params): Query<MaterialListQuery>,
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
) -> Result<Json<MaterialListResponse>, ApiError> {
    let window = PageWindow::parse(params.page.as_deref(), params.limit.as_deref());

    let owned: Vec<String> = repositories::classes::list_for_teacher(state.db(), &teacher.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list classes"))?
        .into_iter()
        .map(|class| class.id)
        .collect();

    if owned.is_empty() {
        return Ok(Json(MaterialListResponse {
            message: Some("No classes assigned to this teacher".to_string()),
            total: 0,
            page: window.page,
            limit: window.limit,
            total_pages: 0,
            materials: Vec::new(),
        }));
    }

    let class_ids = match params.class_id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
        Some(raw) => {
            let class_id = parse_id(raw, "class id")?;
            if !owned.contains(&class_id) {
                return Err(ApiError::Forbidden("You are not assigned to this class"));
            }
            vec![class_id]
        }
        None => owned,
    };

    let total = repositories::materials::count_for_classes(state.db(), &class_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count materials"))?;
    let materials = repositories::materials::list_for_classes(
        state.db(),
        &class_ids,
        window.skip(),
        window.limit,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list materials"))?;

    Ok(Json(MaterialListResponse {
        message: None,
        total,
        page: window.page,
        limit: window.limit,
        total_pages: window.total_pages(total),
        materials: materials.into_iter().map(MaterialResponse::from_db).collect(),
    }))
}

async fn create_material(
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
    Json(payload): Json<MaterialCreate>,
) -> Result<(StatusCode, Json<MaterialResponse>), ApiError> {
    validate_payload(&payload)?;
    let class = require_class_ownership(&state, &teacher, &payload.class_id).await?;

    let material_id = Uuid::new_v4().to_string();
    repositories::materials::create(
        state.db(),
        repositories::materials::CreateMaterial {
            id: &material_id,
            class_id: &class.id,
            title: payload.title.trim(),
            description: payload.description.as_deref().map(str::trim).filter(|d| !d.is_empty()),
            file_url: payload.file_url.trim(),
            uploaded_by: &teacher.id,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create material"))?;

    let material = repositories::materials::find_view(state.db(), &material_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load material"))?;

    tracing::info!(
        teacher_id = %teacher.id,
        class_id = %class.id,
        material_id = %material_id,
        action = "material_create",
        "Teacher uploaded material"
    );

    Ok((StatusCode::CREATED, Json(MaterialResponse::from_db(material))))
}

async fn create_mark(
    CurrentTeacher(teacher): CurrentTeacher,
    State(state): State<AppState>,
    Json(payload): Json<MarkCreate>,
) -> Result<(StatusCode, Json<MarkResponse>), ApiError> {
    validate_payload(&payload)?;
    let student_id = parse_id(&payload.student_id, "student id")?;
    let class = require_class_ownership(&state, &teacher, &payload.class_id).await?;

    let enrolled = repositories::classes::is_student_enrolled(state.db(), &class.id, &student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check enrollment"))?;
    if !enrolled {
        return Err(ApiError::BadRequest("Student is not enrolled in this class".to_string()));
    }

    let mark = repositories::marks::create(
        state.db(),
        repositories::marks::CreateMark {
            id: &Uuid::new_v4().to_string(),
            student_id: &student_id,
            class_id: &class.id,
            score: payload.score,
            kind: payload.kind,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to record mark"))?;

    tracing::info!(
        teacher_id = %teacher.id,
        class_id = %class.id,
        student_id = %student_id,
        mark_id = %mark.id,
        action = "mark_create",
        "Teacher recorded mark"
    );

    Ok((StatusCode::CREATED, Json(MarkResponse::from_db(mark))))
}
