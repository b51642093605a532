pub(crate) mod assignments;
pub(crate) mod classes;
pub(crate) mod health;
pub(crate) mod marks;
pub(crate) mod materials;
pub(crate) mod quizzes;
pub(crate) mod users;
