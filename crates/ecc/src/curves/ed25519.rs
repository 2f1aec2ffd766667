use crate::fields::descriptor::ModType;
use crate::fields::field::Field;
use crate::fields::field_params::FieldParams;

/// p = 2^255 - 19. Reduced through the general Montgomery path.
pub struct F25519Params;

impl FieldParams for F25519Params {
    const NAME: &'static str = "F25519";
    const MODULUS: [u64; 5] = [
        0xFFFFFFFFFFFFED,
        0xFFFFFFFFFFFFFF,
        0xFFFFFFFFFFFFFF,
        0xFFFFFFFFFFFFFF,
        0x0000007FFFFFFF,
    ];
    const R_SQUARED: [u64; 5] = [0xA4000000000000, 0x00000000000005, 0, 0, 0];
    const MCONST: u64 = 0xBCA1AF286BCA1B;
    const MBITS: usize = 255;
    const MOD8: u32 = 5;
    const MODTYPE: ModType = ModType::PseudoMersenne;
    const MAXXES: u32 = 25;
}

pub type F25519 = Field<F25519Params>;
