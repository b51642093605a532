pub(crate) mod admin;
pub(crate) mod auth;
pub(crate) mod errors;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod head;
pub(crate) mod pagination;
pub(crate) mod router;
pub(crate) mod student;
pub(crate) mod teacher;
pub(crate) mod users;
pub(crate) mod validation;
