//! Typed validation failures.
//!
//! Every variant carries the concrete offending values so the human message
//! and the stable machine code stay consistent. The messages embed values
//! clients assert on (expected vs actual height, `txId:index`, input and
//! output sums).

use thiserror::Error;

/// Validation failures for submitted blocks and rollback targets.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Block height does not extend the chain tip.
    #[error("Invalid block height. Expected {expected}, got {actual}")]
    InvalidHeight { expected: u64, actual: u64 },

    /// Input and output sums differ for a transaction with inputs.
    #[error("Input and output sums do not match for transaction {tx_id}. Inputs: {inputs}, Outputs: {outputs}")]
    SumMismatch {
        tx_id: String,
        inputs: u64,
        outputs: u64,
    },

    /// The same output is referenced by two inputs of the same block.
    #[error("Output {tx_id}:{index} is referenced more than once in the same block")]
    DoubleSpend { tx_id: String, index: u32 },

    /// The referenced output was already spent by an earlier block.
    #[error("Output {tx_id}:{index} is already spent")]
    AlreadySpent { tx_id: String, index: u32 },

    /// The referenced output does not exist.
    #[error("Output {tx_id}:{index} does not exist")]
    NonexistentOutput { tx_id: String, index: u32 },

    /// The submitted block id does not match the canonical hash.
    #[error("Invalid block id. Expected {expected}, got {actual}")]
    InvalidBlockId { expected: String, actual: String },

    /// Rollback target is negative.
    #[error("Rollback target must be non-negative, got {height}")]
    InvalidTarget { height: i64 },
}

impl ValidationError {
    /// Stable machine code for this failure, suitable for clients to match on.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidHeight { .. } => "INVALID_HEIGHT",
            ValidationError::SumMismatch { .. } => "SUM_MISMATCH",
            ValidationError::DoubleSpend { .. } => "DOUBLE_SPEND",
            ValidationError::AlreadySpent { .. } => "ALREADY_SPENT",
            ValidationError::NonexistentOutput { .. } => "NONEXISTENT_OUTPUT",
            ValidationError::InvalidBlockId { .. } => "INVALID_BLOCK_ID",
            ValidationError::InvalidTarget { .. } => "INVALID_TARGET",
        }
    }
}

/// Result type for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_embed_offending_values() {
        let err = ValidationError::InvalidHeight {
            expected: 2,
            actual: 3,
        };
        assert!(err.to_string().contains("Expected 2"));
        assert!(err.to_string().contains("got 3"));

        let err = ValidationError::SumMismatch {
            tx_id: "tx2".to_string(),
            inputs: 10,
            outputs: 8,
        };
        assert!(err.to_string().contains("Inputs: 10"));
        assert!(err.to_string().contains("Outputs: 8"));

        let err = ValidationError::DoubleSpend {
            tx_id: "tx1".to_string(),
            index: 0,
        };
        assert!(err.to_string().contains("tx1:0"));
    }

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(
            ValidationError::InvalidHeight {
                expected: 1,
                actual: 2
            }
            .code(),
            "INVALID_HEIGHT"
        );
        assert_eq!(
            ValidationError::InvalidTarget { height: -1 }.code(),
            "INVALID_TARGET"
        );
    }
}
