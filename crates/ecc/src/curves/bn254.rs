use crate::fields::descriptor::ModType;
use crate::fields::field::Field;
use crate::fields::field_params::FieldParams;

// ---------------------------------------------------------------------------
// BN254 Base Field (Fq)
// ---------------------------------------------------------------------------

pub struct Bn254FqParams;

impl FieldParams for Bn254FqParams {
    const NAME: &'static str = "BN254 Fq";
    const MODULUS: [u64; 5] = [
        0x208C16D87CFD47,
        0x6A916871CA8D3C,
        0xB68181585D9781,
        0xE131A029B85045,
        0x00000030644E72,
    ];
    const R_SQUARED: [u64; 5] = [
        0xBB888F34693C46,
        0x1C4BB9BE2AC0DD,
        0xC1A7AEC3D9E1B9,
        0x3CB4FA22C83580,
        0x000000095E2EA9,
    ];
    const MCONST: u64 = 0xD20782E4866389;
    const MBITS: usize = 254;
    const MOD8: u32 = 7;
    const MODTYPE: ModType = ModType::NotSpecial;
    const MAXXES: u32 = 26;
}

pub type Fq = Field<Bn254FqParams>;

// ---------------------------------------------------------------------------
// BN254 Scalar Field (Fr)
// ---------------------------------------------------------------------------

/// Two-adicity 28, so square roots go through Tonelli-Shanks.
pub struct Bn254FrParams;

impl FieldParams for Bn254FrParams {
    const NAME: &'static str = "BN254 Fr";
    const MODULUS: [u64; 5] = [
        0xE1F593F0000001,
        0xE84879B9709143,
        0xB68181585D2833,
        0xE131A029B85045,
        0x00000030644E72,
    ];
    const R_SQUARED: [u64; 5] = [
        0x9B2C977F4EC6B4,
        0x88742BB8AA70FF,
        0xFF538B3AE1FCF6,
        0xA1D99A8BF33DA0,
        0x0000000A45A5A6,
    ];
    const MCONST: u64 = 0xE1F593EFFFFFFF;
    const MBITS: usize = 254;
    const MOD8: u32 = 1;
    const MODTYPE: ModType = ModType::NotSpecial;
    const MAXXES: u32 = 26;
}

pub type Fr = Field<Bn254FrParams>;
