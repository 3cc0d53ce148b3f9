pub mod evaluations;
pub mod policy;
pub mod submissions;
pub mod theses;
pub mod users;

#[cfg(test)]
pub(crate) mod testing;

pub use evaluations::EvaluationService;
pub use submissions::SubmissionService;
pub use theses::ThesisService;
pub use users::UserService;
