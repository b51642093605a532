use sqlx::{PgPool, Postgres, Transaction};

use crate::db::models::{Class, UserBrief};

const COLUMNS: &str = "id, name, section, semester, teacher_id, created_at, updated_at";

pub(crate) struct CreateClass<'a> {
    pub(crate) id: &'a str,
    pub(crate) name: &'a str,
    pub(crate) section: Option<&'a str>,
    pub(crate) semester: Option<&'a str>,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateClass<'_>) -> Result<Class, sqlx::Error> {
    sqlx::query_as::<_, Class>(&format!(
        "INSERT INTO classes (id, name, section, semester, teacher_id, created_at, updated_at)
         VALUES ($1,$2,$3,$4,NULL,$5,$5)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.name)
    .bind(params.section)
    .bind(params.semester)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(pool: &PgPool, class_id: &str) -> Result<Option<Class>, sqlx::Error> {
    sqlx::query_as::<_, Class>(&format!("SELECT {COLUMNS} FROM classes WHERE id = $1"))
        .bind(class_id)
        .fetch_optional(pool)
        .await
}

/// Row lock that serialises roster edits on one class.
pub(crate) async fn find_for_update(
    tx: &mut Transaction<'_, Postgres>,
    class_id: &str,
) -> Result<Option<Class>, sqlx::Error> {
    sqlx::query_as::<_, Class>(&format!("SELECT {COLUMNS} FROM classes WHERE id = $1 FOR UPDATE"))
        .bind(class_id)
        .fetch_optional(&mut **tx)
        .await
}

pub(crate) async fn list(pool: &PgPool, skip: i64, limit: i64) -> Result<Vec<Class>, sqlx::Error> {
    sqlx::query_as::<_, Class>(&format!(
        "SELECT {COLUMNS} FROM classes ORDER BY created_at DESC, id OFFSET $1 LIMIT $2"
    ))
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_for_teacher(
    pool: &PgPool,
    teacher_id: &str,
) -> Result<Vec<Class>, sqlx::Error> {
    sqlx::query_as::<_, Class>(&format!(
        "SELECT {COLUMNS} FROM classes WHERE teacher_id = $1 ORDER BY name, id"
    ))
    .bind(teacher_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_ids(pool: &PgPool, ids: &[String]) -> Result<Vec<Class>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, Class>(&format!(
        "SELECT {COLUMNS} FROM classes WHERE id = ANY($1) ORDER BY name, id"
    ))
    .bind(ids)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_student_ids(
    pool: &PgPool,
    class_id: &str,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT student_id FROM class_students
         WHERE class_id = $1
         ORDER BY added_at, student_id",
    )
    .bind(class_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_students(
    pool: &PgPool,
    class_id: &str,
) -> Result<Vec<UserBrief>, sqlx::Error> {
    sqlx::query_as::<_, UserBrief>(
        "SELECT u.id, u.name, u.email, u.role
         FROM class_students cs
         JOIN users u ON u.id = cs.student_id
         WHERE cs.class_id = $1
         ORDER BY cs.added_at, u.name, u.id",
    )
    .bind(class_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn is_student_enrolled(
    pool: &PgPool,
    class_id: &str,
    student_id: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (
            SELECT 1 FROM class_students WHERE class_id = $1 AND student_id = $2
         )",
    )
    .bind(class_id)
    .bind(student_id)
    .fetch_one(pool)
    .await
}

/// Class side of the roster: set union into `class_students`.
pub(crate) async fn add_students(
    tx: &mut Transaction<'_, Postgres>,
    class_id: &str,
    student_ids: &[String],
    added_at: time::PrimitiveDateTime,
) -> Result<u64, sqlx::Error> {
    if student_ids.is_empty() {
        return Ok(0);
    }

    let result = sqlx::query(
        "INSERT INTO class_students (class_id, student_id, added_at)
         SELECT $1, student_id, $3 FROM unnest($2::text[]) AS student_id
         ON CONFLICT (class_id, student_id) DO NOTHING",
    )
    .bind(class_id)
    .bind(student_ids)
    .bind(added_at)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected())
}

/// Removes the given students and returns the ids that were actually enrolled.
pub(crate) async fn remove_students(
    tx: &mut Transaction<'_, Postgres>,
    class_id: &str,
    student_ids: &[String],
) -> Result<Vec<String>, sqlx::Error> {
    if student_ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_scalar::<_, String>(
        "DELETE FROM class_students
         WHERE class_id = $1 AND student_id = ANY($2)
         RETURNING student_id",
    )
    .bind(class_id)
    .bind(student_ids)
    .fetch_all(&mut **tx)
    .await
}

pub(crate) async fn set_teacher(
    tx: &mut Transaction<'_, Postgres>,
    class_id: &str,
    teacher_id: Option<&str>,
    updated_at: time::PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE classes SET teacher_id = $1, updated_at = $2 WHERE id = $3")
        .bind(teacher_id)
        .bind(updated_at)
        .bind(class_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

pub(crate) async fn touch(
    tx: &mut Transaction<'_, Postgres>,
    class_id: &str,
    updated_at: time::PrimitiveDateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE classes SET updated_at = $1 WHERE id = $2")
        .bind(updated_at)
        .bind(class_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
