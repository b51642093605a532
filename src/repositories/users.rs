use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use crate::db::models::{User, UserBrief};
use crate::db::types::UserRole;

const COLUMNS: &str = "id, name, email, hashed_password, role, is_active, created_at, updated_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE lower(email) = lower($1)"))
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn exists_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT id FROM users WHERE lower(email) = lower($1)")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn fetch_one_by_id(pool: &PgPool, id: &str) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_one(pool)
        .await
}

pub(crate) struct CreateUser<'a> {
    pub(crate) id: &'a str,
    pub(crate) name: &'a str,
    pub(crate) email: &'a str,
    pub(crate) hashed_password: String,
    pub(crate) role: UserRole,
    pub(crate) is_active: bool,
    pub(crate) created_at: time::PrimitiveDateTime,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateUser<'_>) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (
            id, name, email, hashed_password, role, is_active, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.name)
    .bind(params.email)
    .bind(params.hashed_password)
    .bind(params.role)
    .bind(params.is_active)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

/// Role is not updatable once a user exists.
pub(crate) struct UpdateUser {
    pub(crate) name: Option<String>,
    pub(crate) is_active: Option<bool>,
    pub(crate) hashed_password: Option<String>,
    pub(crate) updated_at: time::PrimitiveDateTime,
}

pub(crate) async fn update(pool: &PgPool, id: &str, params: UpdateUser) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET
            name = COALESCE($1, name),
            is_active = COALESCE($2, is_active),
            hashed_password = COALESCE($3, hashed_password),
            updated_at = $4
         WHERE id = $5",
    )
    .bind(params.name)
    .bind(params.is_active)
    .bind(params.hashed_password)
    .bind(params.updated_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

#[derive(Debug, Default)]
pub(crate) struct UserFilter {
    pub(crate) email: Option<String>,
    pub(crate) role: Option<UserRole>,
    pub(crate) is_active: Option<bool>,
}

pub(crate) async fn list(
    pool: &PgPool,
    filter: &UserFilter,
    skip: i64,
    limit: i64,
) -> Result<Vec<User>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM users"));
    let mut separated = " WHERE ";

    if let Some(email) = filter.email.as_ref() {
        builder.push(separated).push("lower(email) = lower(").push_bind(email).push(")");
        separated = " AND ";
    }
    if let Some(role) = filter.role {
        builder.push(separated).push("role = ").push_bind(role);
        separated = " AND ";
    }
    if let Some(is_active) = filter.is_active {
        builder.push(separated).push("is_active = ").push_bind(is_active);
    }

    builder.push(" ORDER BY created_at DESC, id");
    builder.push(" OFFSET ").push_bind(skip);
    builder.push(" LIMIT ").push_bind(limit);

    builder.build_query_as::<User>().fetch_all(pool).await
}

/// Keeps only ids that belong to an existing user with `role`, in input order.
pub(crate) async fn filter_ids_with_role(
    tx: &mut Transaction<'_, Postgres>,
    ids: &[String],
    role: UserRole,
) -> Result<Vec<String>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_scalar::<_, String>(
        "SELECT requested.id
         FROM unnest($1::text[]) WITH ORDINALITY AS requested(id, position)
         JOIN users u ON u.id = requested.id AND u.role = $2
         ORDER BY requested.position",
    )
    .bind(ids)
    .bind(role)
    .fetch_all(&mut **tx)
    .await
}

pub(crate) async fn find_brief_for_update(
    tx: &mut Transaction<'_, Postgres>,
    id: &str,
) -> Result<Option<UserBrief>, sqlx::Error> {
    sqlx::query_as::<_, UserBrief>(
        "SELECT id, name, email, role FROM users WHERE id = $1 FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await
}

pub(crate) async fn list_briefs_by_ids(
    pool: &PgPool,
    ids: &[String],
) -> Result<Vec<UserBrief>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, UserBrief>(
        "SELECT id, name, email, role FROM users WHERE id = ANY($1) ORDER BY name, id",
    )
    .bind(ids)
    .fetch_all(pool)
    .await
}

/// User side of the roster: adds `class_id` to each user's assigned classes.
pub(crate) async fn add_class_assignments(
    tx: &mut Transaction<'_, Postgres>,
    user_ids: &[String],
    class_id: &str,
    assigned_at: time::PrimitiveDateTime,
) -> Result<u64, sqlx::Error> {
    if user_ids.is_empty() {
        return Ok(0);
    }

    let result = sqlx::query(
        "INSERT INTO user_class_assignments (user_id, class_id, assigned_at)
         SELECT user_id, $2, $3 FROM unnest($1::text[]) AS user_id
         ON CONFLICT (user_id, class_id) DO NOTHING",
    )
    .bind(user_ids)
    .bind(class_id)
    .bind(assigned_at)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected())
}

pub(crate) async fn remove_class_assignments(
    tx: &mut Transaction<'_, Postgres>,
    user_ids: &[String],
    class_id: &str,
) -> Result<u64, sqlx::Error> {
    if user_ids.is_empty() {
        return Ok(0);
    }

    let result = sqlx::query(
        "DELETE FROM user_class_assignments WHERE class_id = $1 AND user_id = ANY($2)",
    )
    .bind(class_id)
    .bind(user_ids)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected())
}

pub(crate) async fn list_assigned_class_ids(
    pool: &PgPool,
    user_id: &str,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT class_id FROM user_class_assignments
         WHERE user_id = $1
         ORDER BY assigned_at, class_id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
