use std::collections::HashMap;

use serde::Serialize;

pub(crate) mod analytics;
pub(crate) mod auth;
pub(crate) mod class;
pub(crate) mod content;
pub(crate) mod mark;
pub(crate) mod user;

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) service: String,
    pub(crate) status: String,
    pub(crate) components: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RootResponse {
    pub(crate) message: String,
    pub(crate) version: String,
    pub(crate) api_prefix: String,
}
