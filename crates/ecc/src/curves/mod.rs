pub mod bn254;
pub mod bn254cx;
pub mod ed25519;
