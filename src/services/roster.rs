use std::collections::HashSet;

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::core::metrics;
use crate::core::time::primitive_now_utc;
use crate::db::models::{Class, UserBrief};
use crate::db::types::UserRole;
use crate::repositories::{classes, users};

#[derive(Debug, Error)]
pub(crate) enum RosterError {
    #[error("{0}")]
    Invalid(String),
    #[error("Class not found")]
    ClassNotFound,
    #[error("No valid student users found")]
    NoValidStudents,
    #[error("Teacher not found")]
    TeacherNotFound,
    #[error("User is not a teacher")]
    NotATeacher,
    #[error("None of the given students are enrolled in this class")]
    NotEnrolled,
    #[error("Class has no assigned teacher")]
    NoTeacher,
    #[error("roster transaction failed: {0}")]
    Database(#[from] sqlx::Error),
}

/// A class with its teacher and students resolved for display.
#[derive(Debug, Clone)]
pub(crate) struct ClassRoster {
    pub(crate) class: Class,
    pub(crate) teacher: Option<UserBrief>,
    pub(crate) students: Vec<UserBrief>,
}

#[derive(Debug)]
pub(crate) struct RosterChange {
    pub(crate) roster: ClassRoster,
    /// User ids the operation linked or unlinked, in request order.
    pub(crate) affected: Vec<String>,
    pub(crate) previous_teacher_id: Option<String>,
}

/// Ids are stored in lowercase hyphenated form; any accepted spelling maps onto it.
pub(crate) fn validate_id(raw: &str, label: &str) -> Result<String, RosterError> {
    Uuid::parse_str(raw.trim())
        .map(|id| id.hyphenated().to_string())
        .map_err(|_| RosterError::Invalid(format!("Invalid {label} id")))
}

/// Trims, canonicalizes and deduplicates ids, keeping the first occurrence of each.
pub(crate) fn normalize_ids(raw: &[String]) -> Result<Vec<String>, RosterError> {
    if raw.is_empty() {
        return Err(RosterError::Invalid("studentIds must be a non-empty array".to_string()));
    }

    let mut seen = HashSet::with_capacity(raw.len());
    let mut ids = Vec::with_capacity(raw.len());
    for value in raw {
        let id = validate_id(value, "student")?;
        if seen.insert(id.clone()) {
            ids.push(id);
        }
    }
    Ok(ids)
}

pub(crate) async fn load_roster(
    pool: &PgPool,
    class_id: &str,
) -> Result<Option<ClassRoster>, sqlx::Error> {
    let Some(class) = classes::find_by_id(pool, class_id).await? else {
        return Ok(None);
    };

    let teacher = match class.teacher_id.as_ref() {
        Some(teacher_id) => users::list_briefs_by_ids(pool, std::slice::from_ref(teacher_id))
            .await?
            .into_iter()
            .next(),
        None => None,
    };
    let students = classes::list_students(pool, &class.id).await?;

    Ok(Some(ClassRoster { class, teacher, students }))
}

pub(crate) async fn assign_students(
    pool: &PgPool,
    class_id: &str,
    raw_student_ids: &[String],
) -> Result<RosterChange, RosterError> {
    let class_id = validate_id(class_id, "class")?;
    let requested = normalize_ids(raw_student_ids)?;

    let mut tx = pool.begin().await?;
    classes::find_for_update(&mut tx, &class_id).await?.ok_or(RosterError::ClassNotFound)?;

    let students = users::filter_ids_with_role(&mut tx, &requested, UserRole::Student).await?;
    if students.is_empty() {
        return Err(RosterError::NoValidStudents);
    }

    let now = primitive_now_utc();
    let class_links = classes::add_students(&mut tx, &class_id, &students, now).await?;
    let user_links = users::add_class_assignments(&mut tx, &students, &class_id, now).await?;
    classes::touch(&mut tx, &class_id, now).await?;
    tx.commit().await?;

    metrics::record_roster_change("class", "assign", class_links as usize);
    metrics::record_roster_change("user", "assign", user_links as usize);
    tracing::debug!(
        class_id = %class_id,
        requested = requested.len(),
        accepted = students.len(),
        new_links = class_links,
        "Students assigned"
    );

    let roster = load_roster(pool, &class_id).await?.ok_or(RosterError::ClassNotFound)?;
    Ok(RosterChange { roster, affected: students, previous_teacher_id: None })
}

pub(crate) async fn assign_teacher(
    pool: &PgPool,
    class_id: &str,
    teacher_id: Option<&str>,
) -> Result<RosterChange, RosterError> {
    let class_id = validate_id(class_id, "class")?;
    let teacher_id = match teacher_id.map(str::trim) {
        Some(value) if !value.is_empty() => validate_id(value, "teacher")?,
        _ => return Err(RosterError::Invalid("teacherId is required".to_string())),
    };

    let mut tx = pool.begin().await?;
    let class =
        classes::find_for_update(&mut tx, &class_id).await?.ok_or(RosterError::ClassNotFound)?;
    let teacher = users::find_brief_for_update(&mut tx, &teacher_id)
        .await?
        .ok_or(RosterError::TeacherNotFound)?;
    if !teacher.role.can_teach() {
        return Err(RosterError::NotATeacher);
    }

    let now = primitive_now_utc();
    let previous_teacher_id = class.teacher_id.filter(|previous| previous != &teacher.id);
    if let Some(previous) = previous_teacher_id.as_ref() {
        let removed = users::remove_class_assignments(
            &mut tx,
            std::slice::from_ref(previous),
            &class_id,
        )
        .await?;
        metrics::record_roster_change("user", "unassign", removed as usize);
    }

    classes::set_teacher(&mut tx, &class_id, Some(&teacher.id), now).await?;
    let user_links = users::add_class_assignments(
        &mut tx,
        std::slice::from_ref(&teacher.id),
        &class_id,
        now,
    )
    .await?;
    tx.commit().await?;

    metrics::record_roster_change("class", "assign", 1);
    metrics::record_roster_change("user", "assign", user_links as usize);

    let roster = load_roster(pool, &class_id).await?.ok_or(RosterError::ClassNotFound)?;
    Ok(RosterChange { roster, affected: vec![teacher.id], previous_teacher_id })
}

pub(crate) async fn unassign_students(
    pool: &PgPool,
    class_id: &str,
    raw_student_ids: &[String],
) -> Result<RosterChange, RosterError> {
    let class_id = validate_id(class_id, "class")?;
    let requested = normalize_ids(raw_student_ids)?;

    let mut tx = pool.begin().await?;
    classes::find_for_update(&mut tx, &class_id).await?.ok_or(RosterError::ClassNotFound)?;

    let removed: HashSet<String> =
        classes::remove_students(&mut tx, &class_id, &requested).await?.into_iter().collect();
    if removed.is_empty() {
        return Err(RosterError::NotEnrolled);
    }
    let removed: Vec<String> = requested.into_iter().filter(|id| removed.contains(id)).collect();

    let now = primitive_now_utc();
    let user_links = users::remove_class_assignments(&mut tx, &removed, &class_id).await?;
    classes::touch(&mut tx, &class_id, now).await?;
    tx.commit().await?;

    metrics::record_roster_change("class", "unassign", removed.len());
    metrics::record_roster_change("user", "unassign", user_links as usize);

    let roster = load_roster(pool, &class_id).await?.ok_or(RosterError::ClassNotFound)?;
    Ok(RosterChange { roster, affected: removed, previous_teacher_id: None })
}

pub(crate) async fn unassign_teacher(
    pool: &PgPool,
    class_id: &str,
) -> Result<RosterChange, RosterError> {
    let class_id = validate_id(class_id, "class")?;

    let mut tx = pool.begin().await?;
    let class =
        classes::find_for_update(&mut tx, &class_id).await?.ok_or(RosterError::ClassNotFound)?;
    let teacher_id = class.teacher_id.ok_or(RosterError::NoTeacher)?;

    let now = primitive_now_utc();
    classes::set_teacher(&mut tx, &class_id, None, now).await?;
    let user_links =
        users::remove_class_assignments(&mut tx, std::slice::from_ref(&teacher_id), &class_id)
            .await?;
    tx.commit().await?;

    metrics::record_roster_change("class", "unassign", 1);
    metrics::record_roster_change("user", "unassign", user_links as usize);

    let roster = load_roster(pool, &class_id).await?.ok_or(RosterError::ClassNotFound)?;
    Ok(RosterChange {
        roster,
        affected: vec![teacher_id.clone()],
        previous_teacher_id: Some(teacher_id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: &str = "5f0c6f62-9d1e-4f39-8a4e-0f8f7d1c2b01";
    const B: &str = "5f0c6f62-9d1e-4f39-8a4e-0f8f7d1c2b02";

    #[test]
    fn normalize_ids_dedupes_and_keeps_first_seen_order() {
        let raw = vec![format!(" {B} "), A.to_string(), B.to_string(), A.to_string()];
        let ids = normalize_ids(&raw).expect("valid ids");
        assert_eq!(ids, vec![B.to_string(), A.to_string()]);
    }

    #[test]
    fn normalize_ids_rejects_empty_input() {
        assert!(matches!(normalize_ids(&[]), Err(RosterError::Invalid(_))));
    }

    #[test]
    fn normalize_ids_rejects_malformed_entries() {
        let raw = vec![A.to_string(), "not-an-id".to_string()];
        let error = normalize_ids(&raw).expect_err("malformed id");
        assert_eq!(error.to_string(), "Invalid student id");

        let blank = vec!["   ".to_string()];
        assert!(matches!(normalize_ids(&blank), Err(RosterError::Invalid(_))));
    }

    #[test]
    fn validate_id_names_the_field() {
        let error = validate_id("42", "class").expect_err("malformed");
        assert_eq!(error.to_string(), "Invalid class id");
        assert_eq!(validate_id(&format!("  {A}"), "class").expect("valid"), A);
    }

    #[test]
    fn normalize_ids_folds_alternate_spellings_of_one_id() {
        let raw = vec![
            A.to_string(),
            A.to_uppercase(),
            format!("{{{A}}}"),
            A.replace('-', ""),
            format!("urn:uuid:{A}"),
        ];
        let ids = normalize_ids(&raw).expect("valid ids");
        assert_eq!(ids, vec![A.to_string()]);
    }
}
