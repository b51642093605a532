use sqlx::PgPool;

use crate::db::models::Assignment;

const COLUMNS: &str = "id, class_id, title, description, file_url, created_by, created_at";

pub(crate) struct CreateAssignment<'a> {
    pub(crate) id: &'a str,
    pub(crate) class_id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) description: &'a str,
    pub(crate) file_url: &'a str,
    pub(crate) created_by: &'a str,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateAssignment<'_>,
) -> Result<Assignment, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "INSERT INTO assignments (id, class_id, title, description, file_url, created_by, created_at)
         VALUES ($1,$2,$3,$4,$5,$6,$7)
         RETURNING {COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.class_id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.file_url)
    .bind(params.created_by)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}
