pub(crate) mod course;
pub(crate) mod enrollment;
pub(crate) mod error;
pub(crate) mod grading;
pub(crate) mod merge;
pub(crate) mod submission;

#[cfg(test)]
pub(crate) mod test_fixtures;
