use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Mark, MarkDetail};
use crate::db::types::MarkKind;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct MarkCreate {
    #[serde(alias = "studentId")]
    pub(crate) student_id: String,
    #[serde(alias = "classId", alias = "subjectId")]
    pub(crate) class_id: String,
    #[serde(alias = "marks")]
    #[validate(range(min = 0.0, message = "Score must be non-negative"))]
    pub(crate) score: f64,
    #[serde(alias = "type")]
    pub(crate) kind: MarkKind,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MarkResponse {
    pub(crate) id: String,
    pub(crate) student_id: String,
    pub(crate) class_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) class_name: Option<String>,
    pub(crate) marks: f64,
    #[serde(rename = "type")]
    pub(crate) kind: MarkKind,
    pub(crate) created_at: String,
}

impl MarkResponse {
    pub(crate) fn from_db(mark: Mark) -> Self {
        Self {
            id: mark.id,
            student_id: mark.student_id,
            class_id: mark.class_id,
            class_name: None,
            marks: mark.score,
            kind: mark.kind,
            created_at: format_primitive(mark.created_at),
        }
    }

    pub(crate) fn from_detail(mark: &MarkDetail) -> Self {
        Self {
            id: mark.id.clone(),
            student_id: mark.student_id.clone(),
            class_id: mark.class_id.clone(),
            class_name: mark.class_name.clone(),
            marks: mark.score,
            kind: mark.kind,
            created_at: format_primitive(mark.created_at),
        }
    }
}
