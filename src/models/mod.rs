pub mod submission;

pub use submission::{LeadStatus, NewSubmission, ResumeMeta, Submission, VisaCategories};
