use thiserror::Error;

pub type ArtResult<T> = Result<T, ArtError>;

#[derive(Error, Debug)]
pub enum ArtError {
    #[error("Parameter error: {0}")]
    Parameter(String),

    #[error("Input shape error: {0}")]
    InputShape(String),

    #[error("Lifecycle error: {0}")]
    Lifecycle(String),

    #[error("Null contract error: {0}")]
    NullContract(String),

    #[error("Capacity error: {0}")]
    Capacity(String),

    #[error("Numeric error: {0}")]
    Numeric(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ArtError {
    /// Parameter-range violation at construction or derivation time.
    pub fn parameter(field: &str, detail: impl std::fmt::Display) -> Self {
        ArtError::Parameter(format!("{field}: {detail}"))
    }

    /// Input whose dimension or value domain does not match the variant contract.
    pub fn input_shape(detail: impl std::fmt::Display) -> Self {
        ArtError::InputShape(detail.to_string())
    }

    /// Operation invoked on a closed engine or before required training.
    pub fn lifecycle(detail: impl std::fmt::Display) -> Self {
        ArtError::Lifecycle(detail.to_string())
    }
}
