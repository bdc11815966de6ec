use crate::error::{Result, TupleError};
use crate::layout::{self, EntryFlags, LooseEntries, LooseEntry};
use crate::resolver::{self, Resolved};
use crate::ro_weak::TupleRoWeak;
use crate::schema::Schema;
use crate::token::{Addressable, Token};
use std::any;
use std::sync::Arc;
use tuplet_types::{Datetime, Decimal64, Decode, Genus, MacAddress, PropertyPair, Uuid};


fn genus_mismatch<T>(genus: Genus) -> TupleError {
    TupleError::GenusMismatch {
        genus,
        value_type: any::type_name::<T>(),
    }
}

macro_rules! typed_getters {
    ($($name:ident -> $t:ty),* $(,)?) => {
        $(
            fn $name<A: Addressable>(&self, addr: A) -> Result<Option<$t>> {
                self.get::<$t, A>(addr)
            }
        )*
    };
}

/// Read access shared by every tuple variant.
///
/// Reads never mutate, so repeating one gives the same answer. An absent field reads as
/// `Ok(None)`; errors are reserved for misuse of tokens and for undecodable payloads.
pub trait TupleRead {
    /// The full image, header included. Empty if the tuple holds no buffer.
    fn image(&self) -> &[u8];

    fn schema(&self) -> &Arc<Schema>;

    fn size(&self) -> usize {
        self.image().len()
    }

    /// No loose entries and an all-zero preplaced region.
    fn is_empty(&self) -> bool {
        self.loose_count() == 0
            && layout::preplaced_region(self.image())
                .iter()
                .all(|b| *b == 0)
    }

    fn loose_count(&self) -> usize {
        layout::read_header(self.image()).loose_count
    }

    /// A preplaced field is present whenever the image holds its slot.
    fn is_present<A: Addressable>(&self, addr: A) -> Result<bool> {
        let image = self.image();
        let present = match resolver::resolve(addr.address(), self.schema())? {
            Resolved::Slot { offset, width } => offset + width <= image.len(),
            Resolved::Loose(token) => {
                layout::find_first(image, token.genus(), token.tag()).is_some()
            }
        };
        Ok(present)
    }

    /// Decodes the field, or the first matching loose entry.
    fn get<'a, T, A>(&'a self, addr: A) -> Result<Option<T>>
    where
        T: Decode<'a>,
        A: Addressable,
    {
        let addr = addr.address();
        let genus = addr.token().genus();
        if !T::accepts(genus) {
            return Err(genus_mismatch::<T>(genus));
        }

        match raw_field(self.image(), self.schema(), addr)? {
            None => Ok(None),
            Some(payload) => Ok(Some(T::decode(payload)?)),
        }
    }

    /// Like [`TupleRead::get`], but absence is an error.
    fn require<'a, T, A>(&'a self, addr: A) -> Result<T>
    where
        T: Decode<'a>,
        A: Addressable,
    {
        let token = addr.address().token();
        self.get(addr)?.ok_or(TupleError::FieldAbsent {
            genus: token.genus(),
            tag: token.tag(),
        })
    }

    /// Every loose entry matching a collection token, in insertion order.
    ///
    /// Fails with [`TupleError::CollectionRequired`] for any other token, whatever the
    /// tuple holds.
    fn collection<A: Addressable>(&self, addr: A) -> Result<Collection<'_>> {
        let token = addr.address().token();
        if !token.is_collection() {
            return Err(TupleError::CollectionRequired {
                genus: token.genus(),
                tag: token.tag(),
            });
        }
        Ok(Collection {
            entries: LooseEntries::new(self.image()),
            token,
        })
    }

    fn loose_fields(&self) -> LooseFields<'_> {
        LooseFields(LooseEntries::new(self.image()))
    }

    /// The raw bytes of a field, without decoding.
    fn field<A: Addressable>(&self, addr: A) -> Result<Option<&[u8]>> {
        raw_field(self.image(), self.schema(), addr.address())
    }

    typed_getters! {
        get_u8 -> u8,
        get_u16 -> u16,
        get_u32 -> u32,
        get_u64 -> u64,
        get_i8 -> i8,
        get_i16 -> i16,
        get_i32 -> i32,
        get_i64 -> i64,
        get_f32 -> f32,
        get_f64 -> f64,
        get_i128 -> i128,
        get_u128 -> u128,
        get_bool -> bool,
        get_datetime -> Datetime,
        get_uuid -> Uuid,
        get_mac -> MacAddress,
        get_decimal -> Decimal64,
    }

    fn get_string<A: Addressable>(&self, addr: A) -> Result<Option<&str>> {
        self.get(addr)
    }

    fn get_bytes<A: Addressable>(&self, addr: A) -> Result<Option<&[u8]>> {
        self.get(addr)
    }

    fn get_property<A: Addressable>(&self, addr: A) -> Result<Option<PropertyPair<'_>>> {
        self.get(addr)
    }

    /// Reads any signed or unsigned integer field as `i64`.
    fn get_integer<A: Addressable>(&self, addr: A) -> Result<Option<i64>> {
        let addr = addr.address();
        let genus = addr.token().genus();
        let wide = match genus {
            Genus::I8 => self.get::<i8, _>(addr)?.map(i128::from),
            Genus::I16 => self.get::<i16, _>(addr)?.map(i128::from),
            Genus::I32 => self.get::<i32, _>(addr)?.map(i128::from),
            Genus::I64 => self.get::<i64, _>(addr)?.map(i128::from),
            Genus::U8 | Genus::U16 | Genus::U32 | Genus::U64 => {
                self.get_unsigned(addr)?.map(i128::from)
            }
            _ => return Err(genus_mismatch::<i64>(genus)),
        };
        wide.map(|value| i64::try_from(value).map_err(|_| TupleError::ValueRange { genus, value }))
            .transpose()
    }

    /// Reads any unsigned or non-negative signed integer field as `u64`.
    fn get_unsigned<A: Addressable>(&self, addr: A) -> Result<Option<u64>> {
        let addr = addr.address();
        let genus = addr.token().genus();
        let wide = match genus {
            Genus::U8 => self.get::<u8, _>(addr)?.map(i128::from),
            Genus::U16 => self.get::<u16, _>(addr)?.map(i128::from),
            Genus::U32 => self.get::<u32, _>(addr)?.map(i128::from),
            Genus::U64 => self.get::<u64, _>(addr)?.map(i128::from),
            Genus::I8 | Genus::I16 | Genus::I32 | Genus::I64 => {
                self.get_integer(addr)?.map(i128::from)
            }
            _ => return Err(genus_mismatch::<u64>(genus)),
        };
        wide.map(|value| u64::try_from(value).map_err(|_| TupleError::ValueRange { genus, value }))
            .transpose()
    }

    /// A zero-copy view of an embedded tuple. Its preplaced region is opaque.
    fn get_nested<A: Addressable>(&self, addr: A) -> Result<Option<TupleRoWeak<'_>>> {
        let addr = addr.address();
        let genus = addr.token().genus();
        if genus != Genus::Nested {
            return Err(genus_mismatch::<TupleRoWeak>(genus));
        }
        match raw_field(self.image(), self.schema(), addr)? {
            None => Ok(None),
            Some(payload) => Ok(Some(TupleRoWeak::from_embedded(payload)?)),
        }
    }
}

fn raw_field<'a>(
    image: &'a [u8],
    schema: &Schema,
    addr: crate::token::Address,
) -> Result<Option<&'a [u8]>> {
    match resolver::resolve(addr, schema)? {
        Resolved::Slot { offset, width } => Ok(image.get(offset..offset + width)),
        Resolved::Loose(token) => {
            Ok(layout::find_first(image, token.genus(), token.tag()).map(|entry| entry.payload))
        }
    }
}

/* Views over loose entries */

/// One loose entry as seen by readers.
#[derive(Clone, Copy, Debug)]
pub struct FieldView<'a> {
    entry: LooseEntry<'a>,
}

impl<'a> FieldView<'a> {
    pub fn genus(&self) -> Genus {
        self.entry.genus
    }
    pub fn tag(&self) -> u16 {
        self.entry.tag
    }
    pub fn payload(&self) -> &'a [u8] {
        self.entry.payload
    }

    /// Rebuilds the token the entry was written with.
    pub fn token(&self) -> Token {
        let flags = self.entry.flags;
        match (
            flags.contains(EntryFlags::INLAY),
            flags.contains(EntryFlags::COLLECTION),
        ) {
            (true, false) => Token::inlay(self.entry.tag),
            (true, true) => Token::inlay_collection(self.entry.tag),
            (false, false) => Token::new(self.entry.genus, self.entry.tag),
            (false, true) => Token::collection(self.entry.genus, self.entry.tag),
        }
    }

    pub fn decode<T: Decode<'a>>(&self) -> Result<T> {
        if !T::accepts(self.entry.genus) {
            return Err(genus_mismatch::<T>(self.entry.genus));
        }
        Ok(T::decode(self.entry.payload)?)
    }

    pub fn nested(&self) -> Result<TupleRoWeak<'a>> {
        if self.entry.genus != Genus::Nested {
            return Err(genus_mismatch::<TupleRoWeak>(self.entry.genus));
        }
        TupleRoWeak::from_embedded(self.entry.payload)
    }
}

#[derive(Clone, Debug)]
pub struct LooseFields<'a>(LooseEntries<'a>);

impl<'a> Iterator for LooseFields<'a> {
    type Item = FieldView<'a>;
    fn next(&mut self) -> Option<FieldView<'a>> {
        self.0.next().map(|entry| FieldView { entry })
    }
}

/// The entries of one collection token. Lazy and finite; clone it to restart.
#[derive(Clone, Debug)]
pub struct Collection<'a> {
    entries: LooseEntries<'a>,
    token: Token,
}

impl<'a> Collection<'a> {
    pub fn token(&self) -> Token {
        self.token
    }

    pub fn is_empty(&self) -> bool {
        self.clone().next().is_none()
    }

    /// Decodes every remaining entry.
    pub fn values<T: Decode<'a> + 'a>(self) -> impl Iterator<Item = Result<T>> + 'a {
        self.map(|view| view.decode::<T>())
    }
}

impl<'a> Iterator for Collection<'a> {
    type Item = FieldView<'a>;
    fn next(&mut self) -> Option<FieldView<'a>> {
        let token = self.token;
        self.entries
            .find(|entry| token.same_field(entry.genus, entry.tag))
            .map(|entry| FieldView { entry })
    }
}
