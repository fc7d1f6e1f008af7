#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    #[error("errors limit exceeded")]
    ErrorsLimitExceeded,
}
