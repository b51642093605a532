use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::{MarkKind, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) hashed_password: String,
    pub(crate) role: UserRole,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// Display projection used when resolving roster references.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct UserBrief {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) role: UserRole,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Class {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) section: Option<String>,
    pub(crate) semester: Option<String>,
    pub(crate) teacher_id: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Mark {
    pub(crate) id: String,
    pub(crate) student_id: String,
    pub(crate) class_id: String,
    pub(crate) score: f64,
    pub(crate) kind: MarkKind,
    pub(crate) created_at: PrimitiveDateTime,
}

/// A mark joined with the names the analytics responses display.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct MarkDetail {
    pub(crate) id: String,
    pub(crate) student_id: String,
    pub(crate) student_name: Option<String>,
    pub(crate) student_email: Option<String>,
    pub(crate) class_id: String,
    pub(crate) class_name: Option<String>,
    pub(crate) score: f64,
    pub(crate) kind: MarkKind,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub(crate) struct QuizQuestion {
    pub(crate) question: String,
    #[serde(default)]
    pub(crate) options: Vec<String>,
    pub(crate) answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Quiz {
    pub(crate) id: String,
    pub(crate) class_id: String,
    pub(crate) title: String,
    pub(crate) questions: Json<Vec<QuizQuestion>>,
    pub(crate) created_by: String,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Assignment {
    pub(crate) id: String,
    pub(crate) class_id: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) file_url: String,
    pub(crate) created_by: String,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct MaterialView {
    pub(crate) id: String,
    pub(crate) class_id: String,
    pub(crate) class_name: Option<String>,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) file_url: String,
    pub(crate) uploaded_by: String,
    pub(crate) uploader_name: Option<String>,
    pub(crate) uploader_email: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
}
