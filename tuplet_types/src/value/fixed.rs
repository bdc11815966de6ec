use crate::value::{expect_len, Decode, Encode, ValueError};
use crate::Genus;
use derive_more::{Deref, From};
use std::mem;


macro_rules! impl_le_scalar {
    ($($t:ty => $genus:path),* $(,)?) => {$(
        impl Encode for $t {
            fn accepts_genus(&self, genus: Genus) -> bool {
                genus == $genus
            }
            fn encoded_len(&self) -> usize {
                mem::size_of::<$t>()
            }
            fn encode_into(&self, out: &mut [u8]) {
                out.copy_from_slice(&self.to_le_bytes());
            }
        }
        impl<'a> Decode<'a> for $t {
            fn accepts(genus: Genus) -> bool {
                genus == $genus
            }
            fn decode(payload: &'a [u8]) -> Result<Self, ValueError> {
                let bytes = <[u8; mem::size_of::<$t>()]>::try_from(payload).map_err(|_| {
                    ValueError::WrongLength {
                        expected: mem::size_of::<$t>(),
                        actual: payload.len(),
                    }
                })?;
                Ok(<$t>::from_le_bytes(bytes))
            }
        }
    )*};
}

impl_le_scalar!(
    i8 => Genus::I8,
    i16 => Genus::I16,
    i32 => Genus::I32,
    i64 => Genus::I64,
    u8 => Genus::U8,
    u16 => Genus::U16,
    u32 => Genus::U32,
    u64 => Genus::U64,
    f32 => Genus::F32,
    f64 => Genus::F64,
    i128 => Genus::I128,
    u128 => Genus::U128,
);

/* bool is stored as a U8 holding 0 or 1. */
impl Encode for bool {
    fn accepts_genus(&self, genus: Genus) -> bool {
        genus == Genus::U8
    }
    fn encoded_len(&self) -> usize {
        1
    }
    fn encode_into(&self, out: &mut [u8]) {
        out[0] = u8::from(*self);
    }
}
impl<'a> Decode<'a> for bool {
    fn accepts(genus: Genus) -> bool {
        genus == Genus::U8
    }
    fn decode(payload: &'a [u8]) -> Result<Self, ValueError> {
        expect_len(payload, 1)?;
        Ok(payload[0] != 0)
    }
}

/* Fixed-width opaque binaries. */
macro_rules! impl_fixed_binary {
    ($($n:literal => $genus:path),* $(,)?) => {$(
        impl Encode for [u8; $n] {
            fn accepts_genus(&self, genus: Genus) -> bool {
                genus == $genus
            }
            fn encoded_len(&self) -> usize {
                $n
            }
            fn encode_into(&self, out: &mut [u8]) {
                out.copy_from_slice(self);
            }
        }
        impl<'a> Decode<'a> for [u8; $n] {
            fn accepts(genus: Genus) -> bool {
                genus == $genus
            }
            fn decode(payload: &'a [u8]) -> Result<Self, ValueError> {
                <[u8; $n]>::try_from(payload).map_err(|_| ValueError::WrongLength {
                    expected: $n,
                    actual: payload.len(),
                })
            }
        }
    )*};
}

impl_fixed_binary!(
    12 => Genus::Bin96,
    16 => Genus::Bin128,
    20 => Genus::Bin160,
    24 => Genus::Bin192,
    28 => Genus::Bin224,
    32 => Genus::Bin256,
);

/// A decimal64 value kept in its raw encoded form.
/// Arithmetic on decimals is outside the scope of the tuple engine.
#[derive(From, Deref, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug, Default)]
pub struct Decimal64(pub i64);

impl Encode for Decimal64 {
    fn accepts_genus(&self, genus: Genus) -> bool {
        genus == Genus::Decimal
    }
    fn encoded_len(&self) -> usize {
        mem::size_of::<i64>()
    }
    fn encode_into(&self, out: &mut [u8]) {
        out.copy_from_slice(&self.0.to_le_bytes());
    }
}
impl<'a> Decode<'a> for Decimal64 {
    fn accepts(genus: Genus) -> bool {
        genus == Genus::Decimal
    }
    fn decode(payload: &'a [u8]) -> Result<Self, ValueError> {
        i64::decode(payload).map(Self)
    }
}
