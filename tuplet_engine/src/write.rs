use crate::buffer::TupleBuffer;
use crate::error::{Result, TupleError};
use crate::layout::{self, PayloadLen};
use crate::read::TupleRead;
use crate::resolver::{self, Resolved};
use crate::ro_managed::TupleRoManaged;
use crate::ro_weak::TupleRoWeak;
use crate::token::{Addressable, Token};
use std::any;
use std::mem;
use std::sync::Arc;
use tuplet_types::{
    Datetime, Decimal64, Encode, Genus, MacAddress, PropertyPair, Uuid, ValueError,
};


pub(crate) mod sealed {
    use crate::buffer::TupleBuffer;
    use crate::error::Result;

    /// What a builder must provide for the shared mutation logic.
    pub trait Storage {
        fn buffer(&self) -> &TupleBuffer;
        fn buffer_mut(&mut self) -> &mut TupleBuffer;
        /// Capacity to allocate with when the buffer was moved out.
        fn initial_capacity(&self) -> usize;
        /// Makes the buffer able to hold `needed` payload bytes, or fails without touching it.
        fn make_room(&mut self, needed: usize) -> Result<()>;
    }
}

/// An embedded tuple image, written as a `Nested` payload.
struct NestedImage<'a>(&'a [u8]);

impl Encode for NestedImage<'_> {
    fn accepts_genus(&self, genus: Genus) -> bool {
        genus == Genus::Nested
    }
    fn encoded_len(&self) -> usize {
        self.0.len()
    }
    fn encode_into(&self, out: &mut [u8]) {
        out.copy_from_slice(self.0);
    }
}

macro_rules! typed_setters {
    ($($set:ident, $insert:ident : $t:ty),* $(,)?) => {
        $(
            fn $set<A: Addressable>(&mut self, addr: A, value: $t) -> Result<()> {
                self.set(addr, &value)
            }
            fn $insert<A: Addressable>(&mut self, addr: A, value: $t) -> Result<()> {
                self.insert(addr, &value)
            }
        )*
    };
}

/// Mutation shared by both builders. They differ only in how they make room.
///
/// Every failing call leaves the tuple exactly as it was.
pub trait TupleWrite: TupleRead + sealed::Storage {
    /// Netto bytes the buffer holds without reallocating.
    fn capacity(&self) -> usize {
        self.buffer().capacity()
    }

    /// Netto bytes in use.
    fn used(&self) -> usize {
        self.buffer().used()
    }

    /// Writes a preplaced slot, or upserts the first matching loose entry.
    fn set<A, V>(&mut self, addr: A, value: &V) -> Result<()>
    where
        A: Addressable,
        V: Encode + ?Sized,
    {
        let addr = addr.address();
        check_genus(addr.token(), value)?;

        match resolver::resolve(addr, self.schema())? {
            Resolved::Slot { offset, width } => {
                if value.encoded_len() != width {
                    return Err(ValueError::WrongLength {
                        expected: width,
                        actual: value.encoded_len(),
                    }
                    .into());
                }
                prepare(self);
                let image = self.buffer_mut().image_mut();
                value.encode_into(&mut image[offset..offset + width]);
                Ok(())
            }
            Resolved::Loose(token) => allocated(self, |tuple| upsert(tuple, token, value)),
        }
    }

    /// Appends a loose entry.
    ///
    /// Fails with [`TupleError::LayoutConflict`] if the field is preplaced, or if it is
    /// already present and the token is not a collection token.
    fn insert<A, V>(&mut self, addr: A, value: &V) -> Result<()>
    where
        A: Addressable,
        V: Encode + ?Sized,
    {
        let addr = addr.address();
        let token = addr.token();
        check_genus(token, value)?;

        match resolver::resolve(addr, self.schema())? {
            Resolved::Slot { .. } => Err(conflict(token)),
            Resolved::Loose(token) => {
                if !token.is_collection()
                    && layout::find_first(self.image(), token.genus(), token.tag()).is_some()
                {
                    return Err(conflict(token));
                }
                allocated(self, |tuple| append(tuple, token, value))
            }
        }
    }

    /// Drops every loose entry of the field, or zeroes its preplaced slot.
    /// Returns how many fields were dropped.
    fn remove<A: Addressable>(&mut self, addr: A) -> Result<usize> {
        let addr = addr.address();
        match resolver::resolve(addr, self.schema())? {
            Resolved::Slot { offset, width } => {
                let image = self.buffer_mut().image_mut();
                if let Some(slot) = image.get_mut(offset..offset + width) {
                    slot.fill(0);
                }
                Ok(1)
            }
            Resolved::Loose(token) => {
                let image = self.buffer_mut().image_mut();
                Ok(layout::remove_entries(image, token.genus(), token.tag()))
            }
        }
    }

    /// Drops all loose entries and zeroes the preplaced region. Keeps the capacity.
    fn clear(&mut self) {
        layout::reset(self.buffer_mut().image_mut());
    }

    /// Writes any signed or unsigned integer field, narrowing `value` to its width.
    fn set_integer<A: Addressable>(&mut self, addr: A, value: i64) -> Result<()> {
        let addr = addr.address();
        let genus = addr.token().genus();
        let out_of_range = |_| TupleError::ValueRange {
            genus,
            value: value.into(),
        };
        match genus {
            Genus::I8 => self.set(addr, &i8::try_from(value).map_err(out_of_range)?),
            Genus::I16 => self.set(addr, &i16::try_from(value).map_err(out_of_range)?),
            Genus::I32 => self.set(addr, &i32::try_from(value).map_err(out_of_range)?),
            Genus::I64 => self.set(addr, &value),
            Genus::U8 | Genus::U16 | Genus::U32 | Genus::U64 => {
                let value = u64::try_from(value).map_err(out_of_range)?;
                self.set_unsigned(addr, value)
            }
            _ => Err(TupleError::GenusMismatch {
                genus,
                value_type: "i64",
            }),
        }
    }

    /// Writes any unsigned or signed integer field, narrowing `value` to its width.
    fn set_unsigned<A: Addressable>(&mut self, addr: A, value: u64) -> Result<()> {
        let addr = addr.address();
        let genus = addr.token().genus();
        let out_of_range = |_| TupleError::ValueRange {
            genus,
            value: value.into(),
        };
        match genus {
            Genus::U8 => self.set(addr, &u8::try_from(value).map_err(out_of_range)?),
            Genus::U16 => self.set(addr, &u16::try_from(value).map_err(out_of_range)?),
            Genus::U32 => self.set(addr, &u32::try_from(value).map_err(out_of_range)?),
            Genus::U64 => self.set(addr, &value),
            Genus::I8 | Genus::I16 | Genus::I32 | Genus::I64 => {
                let value = i64::try_from(value).map_err(out_of_range)?;
                self.set_integer(addr, value)
            }
            _ => Err(TupleError::GenusMismatch {
                genus,
                value_type: "u64",
            }),
        }
    }

    /// Embeds the image of another tuple as a loose `Nested` entry.
    fn insert_nested<A, R>(&mut self, addr: A, tuple: &R) -> Result<()>
    where
        A: Addressable,
        R: TupleRead + ?Sized,
    {
        self.insert(addr, &NestedImage(tuple.image()))
    }

    typed_setters! {
        set_u8, insert_u8: u8,
        set_u16, insert_u16: u16,
        set_u32, insert_u32: u32,
        set_u64, insert_u64: u64,
        set_i8, insert_i8: i8,
        set_i16, insert_i16: i16,
        set_i32, insert_i32: i32,
        set_i64, insert_i64: i64,
        set_f32, insert_f32: f32,
        set_f64, insert_f64: f64,
        set_i128, insert_i128: i128,
        set_u128, insert_u128: u128,
        set_bool, insert_bool: bool,
        set_datetime, insert_datetime: Datetime,
        set_uuid, insert_uuid: Uuid,
        set_mac, insert_mac: MacAddress,
        set_decimal, insert_decimal: Decimal64,
        set_property, insert_property: PropertyPair<'_>,
    }

    fn set_string<A: Addressable>(&mut self, addr: A, value: &str) -> Result<()> {
        self.set(addr, value)
    }
    fn insert_string<A: Addressable>(&mut self, addr: A, value: &str) -> Result<()> {
        self.insert(addr, value)
    }
    fn set_bytes<A: Addressable>(&mut self, addr: A, value: &[u8]) -> Result<()> {
        self.set(addr, value)
    }
    fn insert_bytes<A: Addressable>(&mut self, addr: A, value: &[u8]) -> Result<()> {
        self.insert(addr, value)
    }

    /* Conversions to read-only tuples */

    /// Borrows the current image. Returns the view and the image size.
    fn take_weak(&self) -> (TupleRoWeak<'_>, usize) {
        let image = self.image();
        let view = TupleRoWeak::trusted(image, Arc::clone(self.schema()));
        (view, image.len())
    }

    /// Copies the current image into a new shared buffer. Returns it and the image size.
    fn take_managed_clone(&self) -> (TupleRoManaged, usize) {
        let ro = TupleRoManaged::copy_of(self);
        let size = ro.size();
        (ro, size)
    }

    /// Hands the buffer over without copying. The builder allocates a new one on next use.
    fn move_to_ro(&mut self) -> TupleRoManaged {
        let buffer = mem::take(self.buffer_mut());
        log::debug!(
            "moved a {}-byte image (capacity {}) to a read-only tuple",
            buffer.image().len(),
            buffer.capacity()
        );
        TupleRoManaged::from_buffer(buffer, Arc::clone(self.schema()))
    }
}

fn check_genus<V: Encode + ?Sized>(token: Token, value: &V) -> Result<()> {
    if !value.accepts_genus(token.genus()) {
        return Err(TupleError::GenusMismatch {
            genus: token.genus(),
            value_type: any::type_name::<V>(),
        });
    }
    Ok(())
}

fn conflict(token: Token) -> TupleError {
    TupleError::LayoutConflict {
        genus: token.genus(),
        tag: token.tag(),
    }
}

fn prepare<W: TupleWrite + ?Sized>(tuple: &mut W) {
    if !tuple.buffer().is_allocated() {
        let buffer = TupleBuffer::allocate(tuple.schema(), tuple.initial_capacity());
        *tuple.buffer_mut() = buffer;
    }
}

/// Runs a loose mutation against an allocated buffer. A buffer allocated here is dropped
/// again if the mutation fails, so a moved-out builder stays unallocated.
fn allocated<W, F>(tuple: &mut W, mutate: F) -> Result<()>
where
    W: TupleWrite + ?Sized,
    F: FnOnce(&mut W) -> Result<()>,
{
    let fresh = !tuple.buffer().is_allocated();
    prepare(tuple);
    let res = mutate(tuple);
    if res.is_err() && fresh {
        *tuple.buffer_mut() = TupleBuffer::default();
    }
    res
}

fn upsert<W, V>(tuple: &mut W, token: Token, value: &V) -> Result<()>
where
    W: TupleWrite + ?Sized,
    V: Encode + ?Sized,
{
    let existing = layout::find_first(tuple.image(), token.genus(), token.tag())
        .map(|entry| (entry.start, entry.payload.len()));
    let Some((start, old_len)) = existing else {
        return append(tuple, token, value);
    };

    let new_len = value.encoded_len();
    let payload_len = PayloadLen::of(new_len)?;
    if new_len > old_len {
        let needed = tuple.used() + new_len - old_len;
        tuple.make_room(needed)?;
    }
    let image = tuple.buffer_mut().image_mut();
    layout::replace_payload(image, start, old_len, payload_len, value);
    Ok(())
}

fn append<W, V>(tuple: &mut W, token: Token, value: &V) -> Result<()>
where
    W: TupleWrite + ?Sized,
    V: Encode + ?Sized,
{
    let payload_len = PayloadLen::of(value.encoded_len())?;
    let needed = tuple.used() + layout::entry_len(value);
    tuple.make_room(needed)?;
    layout::push_entry(tuple.buffer_mut().image_mut(), token, payload_len, value);
    Ok(())
}
