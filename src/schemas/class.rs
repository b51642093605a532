use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Class;
use crate::schemas::user::UserRef;
use crate::services::roster::ClassRoster;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ClassCreate {
    #[serde(alias = "classname")]
    #[validate(length(min = 1, message = "Class name must not be empty"))]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) section: Option<String>,
    #[serde(default)]
    pub(crate) semester: Option<String>,
}

/// Accepts either a single `studentId` or a `studentIds` list.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StudentIdsPayload {
    #[serde(default)]
    pub(crate) student_id: Option<String>,
    #[serde(default)]
    pub(crate) student_ids: Option<Vec<String>>,
}

impl StudentIdsPayload {
    pub(crate) fn into_ids(self) -> Vec<String> {
        let mut ids = self.student_ids.unwrap_or_default();
        if let Some(single) = self.student_id {
            ids.insert(0, single);
        }
        ids
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TeacherIdPayload {
    #[serde(default)]
    pub(crate) teacher_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ClassResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) section: Option<String>,
    pub(crate) semester: Option<String>,
    pub(crate) teacher_id: Option<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl ClassResponse {
    pub(crate) fn from_db(class: Class) -> Self {
        Self {
            id: class.id,
            name: class.name,
            section: class.section,
            semester: class.semester,
            teacher_id: class.teacher_id,
            created_at: format_primitive(class.created_at),
            updated_at: format_primitive(class.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ClassDetailResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) section: Option<String>,
    pub(crate) semester: Option<String>,
    pub(crate) teacher: Option<UserRef>,
    pub(crate) students: Vec<UserRef>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl ClassDetailResponse {
    pub(crate) fn from_roster(roster: ClassRoster) -> Self {
        let ClassRoster { class, teacher, students } = roster;
        Self {
            id: class.id,
            name: class.name,
            section: class.section,
            semester: class.semester,
            teacher: teacher.map(UserRef::from),
            students: students.into_iter().map(UserRef::from).collect(),
            created_at: format_primitive(class.created_at),
            updated_at: format_primitive(class.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StudentsAssignedResponse {
    pub(crate) message: String,
    pub(crate) class: ClassDetailResponse,
    pub(crate) students_assigned: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StudentsUnassignedResponse {
    pub(crate) message: String,
    pub(crate) class: ClassDetailResponse,
    pub(crate) students_unassigned: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TeacherChangeResponse {
    pub(crate) message: String,
    pub(crate) class: ClassDetailResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) previous_teacher_id: Option<String>,
}
