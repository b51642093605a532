use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Assignment, MaterialView, Quiz, QuizQuestion};
use crate::schemas::user::UserRef;

#[derive(Debug, Deserialize, Serialize, Validate)]
pub(crate) struct QuizQuestionInput {
    #[validate(length(min = 1, message = "Each question needs text"))]
    pub(crate) question: String,
    #[serde(default)]
    pub(crate) options: Vec<String>,
    #[validate(length(min = 1, message = "Each question needs an answer"))]
    pub(crate) answer: String,
}

impl From<QuizQuestionInput> for QuizQuestion {
    fn from(input: QuizQuestionInput) -> Self {
        Self {
            question: input.question.trim().to_string(),
            options: input.options,
            answer: input.answer.trim().to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuizCreate {
    #[serde(alias = "classId")]
    pub(crate) class_id: String,
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub(crate) title: String,
    #[validate(length(min = 1, message = "Quiz needs at least one question"), nested)]
    pub(crate) questions: Vec<QuizQuestionInput>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AssignmentCreate {
    #[serde(alias = "classId")]
    pub(crate) class_id: String,
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub(crate) title: String,
    #[validate(length(min = 1, message = "Description must not be empty"))]
    pub(crate) description: String,
    #[serde(alias = "fileUrl", alias = "file")]
    #[validate(url(message = "fileUrl must be a valid URL"))]
    pub(crate) file_url: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct MaterialCreate {
    #[serde(alias = "classId")]
    pub(crate) class_id: String,
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) description: Option<String>,
    #[serde(alias = "fileUrl")]
    #[validate(url(message = "fileUrl must be a valid URL"))]
    pub(crate) file_url: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MaterialListQuery {
    #[serde(default)]
    #[serde(alias = "classId")]
    pub(crate) class_id: Option<String>,
    #[serde(default)]
    pub(crate) page: Option<String>,
    #[serde(default)]
    pub(crate) limit: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QuizResponse {
    pub(crate) id: String,
    pub(crate) class_id: String,
    pub(crate) title: String,
    pub(crate) questions: Vec<QuizQuestion>,
    pub(crate) created_by: String,
    pub(crate) created_at: String,
}

impl QuizResponse {
    pub(crate) fn from_db(quiz: Quiz) -> Self {
        Self {
            id: quiz.id,
            class_id: quiz.class_id,
            title: quiz.title,
            questions: quiz.questions.0,
            created_by: quiz.created_by,
            created_at: format_primitive(quiz.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AssignmentResponse {
    pub(crate) id: String,
    pub(crate) class_id: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) file_url: String,
    pub(crate) created_by: String,
    pub(crate) created_at: String,
}

impl AssignmentResponse {
    pub(crate) fn from_db(assignment: Assignment) -> Self {
        Self {
            id: assignment.id,
            class_id: assignment.class_id,
            title: assignment.title,
            description: assignment.description,
            file_url: assignment.file_url,
            created_by: assignment.created_by,
            created_at: format_primitive(assignment.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MaterialResponse {
    pub(crate) id: String,
    pub(crate) class_id: String,
    pub(crate) class_name: Option<String>,
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) file_url: String,
    pub(crate) uploaded_by: Option<UserRef>,
    pub(crate) created_at: String,
}

impl MaterialResponse {
    pub(crate) fn from_db(material: MaterialView) -> Self {
        Self {
            id: material.id,
            class_id: material.class_id,
            class_name: material.class_name,
            title: material.title,
            description: material.description,
            file_url: material.file_url,
            uploaded_by: material.uploader_name.map(|name| UserRef {
                id: material.uploaded_by,
                name,
                email: material.uploader_email.unwrap_or_default(),
            }),
            created_at: format_primitive(material.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MaterialListResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) message: Option<String>,
    pub(crate) total: i64,
    pub(crate) page: i64,
    pub(crate) limit: i64,
    pub(crate) total_pages: i64,
    pub(crate) materials: Vec<MaterialResponse>,
}
