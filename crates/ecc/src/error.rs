//! Error taxonomy for field arithmetic.
//!
//! Only inversion, square roots, strict decoding and descriptor checks can
//! fail. Exhausting the lazy-reduction budget is not an error: the engine
//! reduces operands before that can happen.

/// Errors returned by field operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("cannot invert the zero element")]
    DivisionByZero,

    #[error("element is not a quadratic residue")]
    NoSquareRoot,

    #[error("encoding is not below the field modulus")]
    NonCanonical,

    #[error("modulus descriptor mismatch: {0}")]
    ConfigurationMismatch(String),
}

pub type FieldResult<T> = Result<T, FieldError>;
