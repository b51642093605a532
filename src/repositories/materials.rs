use sqlx::PgPool;

use crate::db::models::MaterialView;

const VIEW_SELECT: &str = "\
    SELECT m.id, m.class_id, c.name AS class_name, m.title, m.description, m.file_url, \
           m.uploaded_by, u.name AS uploader_name, u.email AS uploader_email, m.created_at \
    FROM materials m \
    LEFT JOIN classes c ON c.id = m.class_id \
    LEFT JOIN users u ON u.id = m.uploaded_by";

pub(crate) struct CreateMaterial<'a> {
    pub(crate) id: &'a str,
    pub(crate) class_id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) description: Option<&'a str>,
    pub(crate) file_url: &'a str,
    pub(crate) uploaded_by: &'a str,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateMaterial<'_>) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO materials (id, class_id, title, description, file_url, uploaded_by, created_at)
         VALUES ($1,$2,$3,$4,$5,$6,$7)",
    )
    .bind(params.id)
    .bind(params.class_id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.file_url)
    .bind(params.uploaded_by)
    .bind(params.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn find_view(pool: &PgPool, id: &str) -> Result<MaterialView, sqlx::Error> {
    sqlx::query_as::<_, MaterialView>(&format!("{VIEW_SELECT} WHERE m.id = $1"))
        .bind(id)
        .fetch_one(pool)
        .await
}

pub(crate) async fn count_for_classes(
    pool: &PgPool,
    class_ids: &[String],
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM materials WHERE class_id = ANY($1)")
        .bind(class_ids)
        .fetch_one(pool)
        .await
}

/// Newest first.
pub(crate) async fn list_for_classes(
    pool: &PgPool,
    class_ids: &[String],
    skip: i64,
    limit: i64,
) -> Result<Vec<MaterialView>, sqlx::Error> {
    sqlx::query_as::<_, MaterialView>(&format!(
        "{VIEW_SELECT}
         WHERE m.class_id = ANY($1)
         ORDER BY m.created_at DESC, m.id
         OFFSET $2 LIMIT $3"
    ))
    .bind(class_ids)
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await
}
