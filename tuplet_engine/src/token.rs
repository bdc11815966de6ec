use bitflags::bitflags;
use std::fmt;
use tuplet_types::Genus;

mod test;

bitflags! {
    #[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
    pub struct TokenFlags: u8 {
        /// Addressed by scanning the loose area. Without it the token is preplaced.
        const LOOSE = 1 << 0;
        /// The payload is an embedded tuple image.
        const INLAY = 1 << 1;
        /// More than one loose entry may share the token's identity.
        const COLLECTION = 1 << 2;
    }
}

/// Identifies one field of a tuple: its genus, a numeric tag and how it is placed.
///
/// Two tokens are equal iff genus, tag and all flags are equal.
/// Scans for loose entries match on `(genus, tag)` only.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct Token {
    genus: Genus,
    tag: u16,
    flags: TokenFlags,
}

impl Token {
    /// A loose, non-collection token.
    pub const fn new(genus: Genus, tag: u16) -> Self {
        Self {
            genus,
            tag,
            flags: TokenFlags::LOOSE,
        }
    }

    pub const fn collection(genus: Genus, tag: u16) -> Self {
        Self {
            genus,
            tag,
            flags: TokenFlags::LOOSE.union(TokenFlags::COLLECTION),
        }
    }

    /// A dynamic preplaced token, resolved against the schema's descriptor table on every access.
    pub const fn preplaced(genus: Genus, tag: u16) -> Self {
        Self {
            genus,
            tag,
            flags: TokenFlags::empty(),
        }
    }

    /// A loose token for an embedded tuple.
    pub const fn inlay(tag: u16) -> Self {
        Self {
            genus: Genus::Nested,
            tag,
            flags: TokenFlags::LOOSE.union(TokenFlags::INLAY),
        }
    }

    pub const fn inlay_collection(tag: u16) -> Self {
        Self {
            genus: Genus::Nested,
            tag,
            flags: TokenFlags::LOOSE
                .union(TokenFlags::INLAY)
                .union(TokenFlags::COLLECTION),
        }
    }

    pub const fn genus(self) -> Genus {
        self.genus
    }
    pub const fn tag(self) -> u16 {
        self.tag
    }
    pub const fn flags(self) -> TokenFlags {
        self.flags
    }

    pub const fn is_preplaced(self) -> bool {
        !self.is_loose()
    }
    pub const fn is_loose(self) -> bool {
        self.flags.contains(TokenFlags::LOOSE)
    }
    pub const fn is_inlay(self) -> bool {
        self.flags.contains(TokenFlags::INLAY)
    }
    pub const fn is_collection(self) -> bool {
        self.flags.contains(TokenFlags::COLLECTION)
    }

    pub(crate) fn same_field(self, genus: Genus, tag: u16) -> bool {
        self.genus == genus && self.tag == tag
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let placement = if self.is_preplaced() {
            "preplaced"
        } else if self.is_collection() {
            "collection"
        } else {
            "loose"
        };
        write!(f, "{:?}#{} ({placement})", self.genus, self.tag)
    }
}

/* Static tokens. */

/// A preplaced slot whose offset is a compile-time constant of some `#[repr(C)]` struct.
///
/// Implemented by the types [`static_token!`](crate::static_token) declares.
pub trait StaticToken: Addressable {
    const TOKEN: Token;
    const OFFSET: usize;

    fn is_static_preplaced() -> bool {
        Self::TOKEN.is_preplaced()
    }
}

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct StaticSlot {
    token: Token,
    offset: usize,
}

impl StaticSlot {
    pub const fn of<T: StaticToken>() -> Self {
        Self {
            token: T::TOKEN,
            offset: T::OFFSET,
        }
    }
    pub const fn token(self) -> Token {
        self.token
    }
    /// Offset within the preplaced region.
    pub const fn offset(self) -> usize {
        self.offset
    }
}

/// How an access names its field. Static addresses skip the descriptor scan.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum Address {
    Static(StaticSlot),
    Dynamic(Token),
}

impl Address {
    pub const fn token(self) -> Token {
        match self {
            Address::Static(slot) => slot.token,
            Address::Dynamic(token) => token,
        }
    }
}

pub trait Addressable {
    fn address(&self) -> Address;
}

impl Addressable for Token {
    fn address(&self) -> Address {
        Address::Dynamic(*self)
    }
}
impl Addressable for Address {
    fn address(&self) -> Address {
        *self
    }
}
impl<A> Addressable for &A
where
    A: Addressable + ?Sized,
{
    fn address(&self) -> Address {
        (**self).address()
    }
}

/// Declares a unit type that statically addresses one field of a `#[repr(C)]` (usually
/// also `packed`) struct laid out as the preplaced region.
///
/// ```
/// use tuplet_engine::{static_token, Genus, StaticToken};
///
/// #[repr(C, packed)]
/// struct Foo {
///     x: u8,
///     bar: i32,
/// }
///
/// static_token!(pub FooBar = Foo { bar: i32 } as Genus::I32, tag 1);
///
/// assert_eq!(1, FooBar::OFFSET);
/// assert!(FooBar::TOKEN.is_preplaced());
/// ```
///
/// Compilation fails if `Foo` has no field `bar` of type `i32`, or if the genus is not
/// exactly as wide as the field.
#[macro_export]
macro_rules! static_token {
    ($vis:vis $name:ident = $layout:ty { $field:ident : $fty:ty } as $genus:expr, tag $tag:expr $(,)?) => {
        #[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Default)]
        $vis struct $name;

        impl $crate::StaticToken for $name {
            const TOKEN: $crate::Token = $crate::Token::preplaced($genus, $tag);
            const OFFSET: usize = ::core::mem::offset_of!($layout, $field);
        }

        impl $crate::Addressable for $name {
            fn address(&self) -> $crate::Address {
                $crate::Address::Static($crate::StaticSlot::of::<$name>())
            }
        }

        const _: () = {
            #[allow(dead_code)]
            fn field_has_declared_type(layout: $layout) -> $fty {
                layout.$field
            }
            assert!(
                ($genus).fixed_width() == ::core::mem::size_of::<$fty>(),
                "the genus is not as wide as the field"
            );
        };
    };
}
