use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid tenant kind: {0}")]
    InvalidTenantKind(String),

    #[error("missing required field: {0}")]
    MissingField(String),
}
