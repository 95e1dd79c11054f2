use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResultError {
    #[error("result contains no {role}")]
    RoleNotFound { role: &'static str },
    #[error("index {index} out of range ({count} available)")]
    IndexOutOfRange { index: usize, count: usize },
}
