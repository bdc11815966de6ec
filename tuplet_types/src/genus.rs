use crate::ValueError;
use derive_more::{Deref, From};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;

mod test;

/// The on-wire representation of a [`Genus`]: one byte.
#[derive(From, Deref, Clone, Copy, PartialEq, Eq, Debug)]
pub struct GenusInt(u8);
impl From<Genus> for GenusInt {
    fn from(genus: Genus) -> Self {
        Self(genus as u8)
    }
}

/// How many bytes a value of some genus occupies on the wire.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum WireShape {
    /// Exactly this many bytes; the length is never encoded.
    Fixed(usize),
    /// Length-prefixed bytes or text.
    Variable,
    /// A length-prefixed composite: an embedded tuple image or a property pair.
    Nested,
}

/// The closed set of field kinds.
///
/// Discriminants are assigned manually because they are persisted inside tuple images.
/// Adding a genus must never renumber an existing one.
#[repr(u8)]
#[derive(
    PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, FromPrimitive, ToPrimitive, Debug,
)]
pub enum Genus {
    Text = 0,
    Varbin = 1,
    Nested = 2,
    Property = 3,
    I8 = 4,
    I16 = 5,
    I32 = 6,
    I64 = 7,
    U8 = 8,
    U16 = 9,
    U32 = 10,
    U64 = 11,
    F32 = 12,
    F64 = 13,
    Decimal = 14,
    DatetimeUtc = 15,
    Uuid = 16,
    I128 = 17,
    U128 = 18,
    Bin96 = 19,
    Bin128 = 20,
    Bin160 = 21,
    Bin192 = 22,
    Bin224 = 23,
    Bin256 = 24,
    Ip = 25,
    IpNet = 26,
    Mac = 27,
}

impl Genus {
    pub const ALL: [Genus; 28] = [
        Genus::Text,
        Genus::Varbin,
        Genus::Nested,
        Genus::Property,
        Genus::I8,
        Genus::I16,
        Genus::I32,
        Genus::I64,
        Genus::U8,
        Genus::U16,
        Genus::U32,
        Genus::U64,
        Genus::F32,
        Genus::F64,
        Genus::Decimal,
        Genus::DatetimeUtc,
        Genus::Uuid,
        Genus::I128,
        Genus::U128,
        Genus::Bin96,
        Genus::Bin128,
        Genus::Bin160,
        Genus::Bin192,
        Genus::Bin224,
        Genus::Bin256,
        Genus::Ip,
        Genus::IpNet,
        Genus::Mac,
    ];

    pub const fn shape(self) -> WireShape {
        match self {
            Genus::Text | Genus::Varbin => WireShape::Variable,
            Genus::Nested | Genus::Property => WireShape::Nested,
            _ => WireShape::Fixed(self.fixed_width()),
        }
    }

    /// Width in bytes of a fixed-shape genus, or 0 for variable and nested ones.
    ///
    /// This is a `const fn` so that static tokens can check field widths at compile time.
    pub const fn fixed_width(self) -> usize {
        match self {
            Genus::Text | Genus::Varbin | Genus::Nested | Genus::Property => 0,
            Genus::I8 | Genus::U8 => 1,
            Genus::I16 | Genus::U16 => 2,
            Genus::I32 | Genus::U32 | Genus::F32 => 4,
            Genus::I64 | Genus::U64 | Genus::F64 | Genus::Decimal | Genus::DatetimeUtc => 8,
            Genus::Uuid | Genus::I128 | Genus::U128 | Genus::Ip => 16,
            Genus::Bin96 => 12,
            Genus::Bin128 => 16,
            Genus::Bin160 => 20,
            Genus::Bin192 => 24,
            Genus::Bin224 => 28,
            Genus::Bin256 => 32,
            Genus::IpNet => 17,
            Genus::Mac => 6,
        }
    }

    pub const fn is_fixed(self) -> bool {
        self.fixed_width() != 0
    }

    pub const fn is_signed_integer(self) -> bool {
        matches!(self, Genus::I8 | Genus::I16 | Genus::I32 | Genus::I64)
    }

    pub const fn is_unsigned_integer(self) -> bool {
        matches!(self, Genus::U8 | Genus::U16 | Genus::U32 | Genus::U64)
    }
}

impl TryFrom<GenusInt> for Genus {
    type Error = ValueError;
    fn try_from(int: GenusInt) -> Result<Self, ValueError> {
        Genus::from_u8(*int).ok_or(ValueError::UnknownGenus(*int))
    }
}
