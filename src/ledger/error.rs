use serde_json::json;

use super::model::{AssignmentId, SubmissionId, UserId};

/// Why a ledger operation was refused. Every variant leaves the ledger
/// exactly as it was before the call.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// No user matches the email, password and role together.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email {0:?} is already registered")]
    EmailTaken(String),

    #[error("assignment {0} not found")]
    AssignmentNotFound(AssignmentId),

    #[error("submission {0} not found")]
    SubmissionNotFound(SubmissionId),

    /// The acting user claims the student role but is not a student in the
    /// roster.
    #[error("student {0} not found")]
    StudentNotFound(UserId),

    /// Holds the score as the caller sent it, which may not be a number.
    #[error("score {0} must be an integer between 0 and 100")]
    InvalidScore(String),

    #[error("submission {0} is already graded; use regrade to change the score")]
    AlreadyGraded(SubmissionId),

    #[error("submission {0} has not been graded yet")]
    NotGraded(SubmissionId),

    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl LedgerError {
    /// Stable wire code.
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::InvalidCredentials => "invalid_credentials",
            LedgerError::EmailTaken(_) => "email_taken",
            LedgerError::AssignmentNotFound(_) => "assignment_not_found",
            LedgerError::SubmissionNotFound(_) => "submission_not_found",
            LedgerError::StudentNotFound(_) => "student_not_found",
            LedgerError::InvalidScore(_) => "invalid_score",
            LedgerError::AlreadyGraded(_) => "already_graded",
            LedgerError::NotGraded(_) => "not_graded",
            LedgerError::Unauthorized(_) => "unauthorized",
            LedgerError::Storage(_) => "db_query_failed",
        }
    }

    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            LedgerError::EmailTaken(email) => Some(json!({ "email": email })),
            LedgerError::AssignmentNotFound(id) => Some(json!({ "assignmentId": id })),
            LedgerError::SubmissionNotFound(id)
            | LedgerError::AlreadyGraded(id)
            | LedgerError::NotGraded(id) => Some(json!({ "submissionId": id })),
            LedgerError::StudentNotFound(id) => Some(json!({ "studentId": id })),
            LedgerError::InvalidScore(score) => Some(json!({ "score": score })),
            _ => None,
        }
    }
}
