pub(crate) mod answer_options;
pub(crate) mod assignments;
pub(crate) mod categories;
pub(crate) mod course_reviews;
pub(crate) mod courses;
pub(crate) mod enrollments;
pub(crate) mod lessons;
pub(crate) mod modules;
pub(crate) mod questions;
pub(crate) mod quiz_submissions;
pub(crate) mod quizzes;
pub(crate) mod submissions;
pub(crate) mod tags;
pub(crate) mod users;
