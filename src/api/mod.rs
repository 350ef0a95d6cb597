pub(crate) mod catalog;
pub(crate) mod content;
pub(crate) mod courses;
pub(crate) mod errors;
pub(crate) mod handlers;
pub(crate) mod pagination;
pub(crate) mod quizzes;
pub(crate) mod router;
pub(crate) mod submissions;
pub(crate) mod users;
