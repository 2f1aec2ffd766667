use crate::fields::descriptor::ModType;
use crate::fields::field::Field;
use crate::fields::field_params::FieldParams;

// ---------------------------------------------------------------------------
// BN254CX Base Field (Fp)
// ---------------------------------------------------------------------------

/// p = 0x2400000008702A0DB0BDDF647A6366D3243FD6EE18093EE1BE6623EF5C1B55B3
pub struct Bn254CxFpParams;

impl FieldParams for Bn254CxFpParams {
    const NAME: &'static str = "BN254CX";
    const MODULUS: [u64; 5] = [
        0x6623EF5C1B55B3,
        0xD6EE18093EE1BE,
        0x647A6366D3243F,
        0x08702A0DB0BDDF,
        0x00000024000000,
    ];
    const R_SQUARED: [u64; 5] = [
        0x466A0618A0800A,
        0x2B3A22543056A3,
        0x148515B09C6600,
        0xEC9EA5606BDF50,
        0x0000001C992E66,
    ];
    const MCONST: u64 = 0x4E205BF9789E85;
    const MBITS: usize = 254;
    const MOD8: u32 = 3;
    const MODTYPE: ModType = ModType::NotSpecial;
    const MAXXES: u32 = 26;
}

pub type Fp = Field<Bn254CxFpParams>;
