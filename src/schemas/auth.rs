use serde::Serialize;

use crate::schemas::user::UserResponse;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TokenResponse {
    pub(crate) token: String,
    pub(crate) token_type: String,
    pub(crate) user: UserResponse,
}
