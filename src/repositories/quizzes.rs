use sqlx::types::Json;
use sqlx::PgPool;

use crate::db::models::{Quiz, QuizQuestion};

const COLUMNS: &str = "id, class_id, title, questions, created_by, created_at";

pub(crate) struct CreateQuiz<'a> {
    pub(crate) id: &'a str,
    pub(crate) class_id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) questions: Vec<QuizQuestion>,
    pub(crate) created_by: &'a str,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateQuiz<'_>) -> Result<Quiz, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!(
        "INSERT INTO quizzes (id, class_id, title, questions, created_by, created_at)
         VALUES ($1,$2,$3,$4,$5,$6)
         RETURNING {COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.class_id)
    .bind(params.title)
    .bind(Json(params.questions))
    .bind(params.created_by)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}
