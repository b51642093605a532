use serde::{Deserialize, Serialize};
use sqlx::Type;

/// Closed set of roles. Capabilities are derived from the tag at the request boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub(crate) enum UserRole {
    Admin,
    Head,
    Teacher,
    Student,
}

impl UserRole {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Head => "head",
            UserRole::Teacher => "teacher",
            UserRole::Student => "student",
        }
    }

    /// Create classes, manage users and edit rosters.
    pub(crate) fn can_manage_roster(self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Read marks analytics across classes.
    pub(crate) fn can_view_analytics(self) -> bool {
        matches!(self, UserRole::Head | UserRole::Admin)
    }

    /// Publish quizzes, assignments, materials and record marks.
    pub(crate) fn can_author_content(self) -> bool {
        matches!(self, UserRole::Teacher)
    }

    /// May appear in `class_students`.
    pub(crate) fn can_enroll(self) -> bool {
        matches!(self, UserRole::Student)
    }

    /// May be referenced by `classes.teacher_id`.
    pub(crate) fn can_teach(self) -> bool {
        matches!(self, UserRole::Teacher)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "mark_kind", rename_all = "lowercase")]
pub(crate) enum MarkKind {
    Quiz,
    Assignment,
    Midterm,
}
