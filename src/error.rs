pub type GridstageResult<T> = Result<T, GridstageError>;

#[derive(thiserror::Error, Debug)]
pub enum GridstageError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GridstageError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            GridstageError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            GridstageError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = GridstageError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
