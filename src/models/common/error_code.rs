use crate::errors::HWSystemError;

/// API 业务码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1xxx
    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1005,
    InternalServerError = 1006,

    // 用户 2xxx
    UserNotFound = 2000,
    EmailAlreadyExists = 2001,
    UserStillReferenced = 2002,
    CanNotDeleteCurrentUser = 2003,

    // 课题 3xxx
    ThesisNotFound = 3000,
    ThesisInvalidState = 3001,
    SupervisorNotAdvisor = 3002,

    // 提交 4xxx
    SubmissionNotFound = 4000,
    SubmissionHasEvaluations = 4001,
    FileUploadFailed = 4002,
    FileNotFound = 4003,
    FileSizeExceeded = 4004,
    MultifileUploadNotAllowed = 4005,

    // 评审 5xxx
    EvaluationNotFound = 5000,
    EvaluationAlreadyExists = 5001,
}

impl ErrorCode {
    /// 根据错误类别推断通用业务码
    pub fn from_error(err: &HWSystemError) -> Self {
        match err {
            HWSystemError::Validation(_) => ErrorCode::ValidationFailed,
            HWSystemError::NotFound(_) => ErrorCode::NotFound,
            HWSystemError::Forbidden(_) => ErrorCode::Forbidden,
            HWSystemError::RoleViolation(_) => ErrorCode::SupervisorNotAdvisor,
            HWSystemError::InvalidState(_) => ErrorCode::ThesisInvalidState,
            HWSystemError::Conflict(_) => ErrorCode::Conflict,
            HWSystemError::Authentication(_) => ErrorCode::Unauthorized,
            HWSystemError::FileOperation(_) => ErrorCode::FileUploadFailed,
            HWSystemError::DatabaseConfig(_)
            | HWSystemError::DatabaseConnection(_)
            | HWSystemError::DatabaseOperation(_)
            | HWSystemError::Serialization(_) => ErrorCode::InternalServerError,
        }
    }
}
