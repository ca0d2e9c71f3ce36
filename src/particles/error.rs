use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    /// The container has not been laid out yet. Retry on a later frame.
    #[error("field is not ready: container is {width}x{height} device pixels")]
    NotReady { width: u32, height: u32 },
    #[error("2d drawing context is unavailable")]
    ContextUnavailable,
    #[error("mask has {got} pixels, expected {expected}")]
    MaskSize { expected: usize, got: usize },
    #[error("invalid option `{field}`: {reason}")]
    InvalidOption {
        field: &'static str,
        reason: &'static str,
    },
    #[error("platform call failed: {0}")]
    Platform(String),
}

impl FieldError {
    /// Whether a later attempt may succeed without outside intervention.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NotReady { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::FieldError;

    #[test]
    fn only_not_ready_is_transient() {
        assert!(FieldError::NotReady { width: 0, height: 10 }.is_transient());
        assert!(!FieldError::ContextUnavailable.is_transient());
        assert!(!FieldError::MaskSize { expected: 4, got: 2 }.is_transient());
        let invalid = FieldError::InvalidOption {
            field: "physics.friction",
            reason: "must be in (0, 1)",
        };
        assert!(!invalid.is_transient());
    }

    #[test]
    fn messages_name_the_dimensions() {
        let err = FieldError::NotReady { width: 0, height: 480 };
        assert_eq!(
            err.to_string(),
            "field is not ready: container is 0x480 device pixels"
        );
    }
}
