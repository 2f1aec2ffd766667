//! Prime-field arithmetic for pairing-friendly curves.
//!
//! [`Field`] is a Montgomery-form element with lazy reduction, generic over a
//! [`FieldParams`] set. The primary instance is the BN254CX base field,
//! [`curves::bn254cx::Fp`].

pub mod curves;
pub mod error;
pub mod fields;

pub use error::{FieldError, FieldResult};
pub use fields::descriptor::{ModType, ModulusDescriptor};
pub use fields::field::Field;
pub use fields::field_params::FieldParams;
