pub mod error_code;
pub mod response;

pub use error_code::ErrorCode;
pub use response::{ApiResponse, error_response, status_code_of};
