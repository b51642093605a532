use sqlx::{PgPool, Postgres, QueryBuilder};
use time::PrimitiveDateTime;

use crate::db::models::{Mark, MarkDetail};
use crate::db::types::MarkKind;

const COLUMNS: &str = "id, student_id, class_id, score, kind, created_at";

const DETAIL_SELECT: &str = "\
    SELECT m.id, m.student_id, u.name AS student_name, u.email AS student_email, \
           m.class_id, c.name AS class_name, m.score, m.kind, m.created_at \
    FROM marks m \
    LEFT JOIN users u ON u.id = m.student_id \
    LEFT JOIN classes c ON c.id = m.class_id";

pub(crate) struct CreateMark<'a> {
    pub(crate) id: &'a str,
    pub(crate) student_id: &'a str,
    pub(crate) class_id: &'a str,
    pub(crate) score: f64,
    pub(crate) kind: MarkKind,
    pub(crate) created_at: PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateMark<'_>) -> Result<Mark, sqlx::Error> {
    sqlx::query_as::<_, Mark>(&format!(
        "INSERT INTO marks (id, student_id, class_id, score, kind, created_at)
         VALUES ($1,$2,$3,$4,$5,$6)
         RETURNING {COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.student_id)
    .bind(params.class_id)
    .bind(params.score)
    .bind(params.kind)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

#[derive(Debug, Default, Clone)]
pub(crate) struct MarkFilter {
    pub(crate) student_id: Option<String>,
    pub(crate) student_ids: Option<Vec<String>>,
    pub(crate) created_from: Option<PrimitiveDateTime>,
    pub(crate) created_to: Option<PrimitiveDateTime>,
}

/// Chronological (oldest first) with ties broken by id; trend math relies on this order.
pub(crate) async fn list_details(
    pool: &PgPool,
    filter: &MarkFilter,
) -> Result<Vec<MarkDetail>, sqlx::Error> {
    if matches!(filter.student_ids.as_deref(), Some([])) {
        return Ok(Vec::new());
    }

    let mut builder = QueryBuilder::<Postgres>::new(DETAIL_SELECT);
    let mut separated = " WHERE ";

    if let Some(student_id) = filter.student_id.as_ref() {
        builder.push(separated).push("m.student_id = ").push_bind(student_id);
        separated = " AND ";
    }
    if let Some(student_ids) = filter.student_ids.as_ref() {
        builder.push(separated).push("m.student_id = ANY(").push_bind(student_ids).push(")");
        separated = " AND ";
    }
    if let Some(from) = filter.created_from {
        builder.push(separated).push("m.created_at >= ").push_bind(from);
        separated = " AND ";
    }
    if let Some(to) = filter.created_to {
        builder.push(separated).push("m.created_at <= ").push_bind(to);
    }

    builder.push(" ORDER BY m.created_at ASC, m.id ASC");

    builder.build_query_as::<MarkDetail>().fetch_all(pool).await
}
