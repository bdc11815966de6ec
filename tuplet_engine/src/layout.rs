//! # Image layout
//!
//! ```text
//! struct TupleImage {
//!     preplaced_len:  u16,
//!     loose_count:    u16,
//!     preplaced:      [u8; preplaced_len],
//!     loose:          [LooseEntry; loose_count],
//! }
//!
//! struct LooseEntry {
//!     genus:          u8,
//!     flags:          u8,     // EntryFlags
//!     tag:            u16,
//!     payload_len:    u32,
//!     payload:        [u8; payload_len],
//! }
//! ```
//!
//! All integers are little-endian. An empty image is a valid tuple with nothing in it.

use crate::error::{Result, TupleError};
use crate::limits::{LOOSE_ENTRY_HEADER_BYTES, MAX_TUPLE_BYTES_NETTO, TUPLE_HEADER_BYTES};
use crate::schema::Schema;
use crate::token::Token;
use bitflags::bitflags;
use derive_more::Deref;
use std::mem;
use tuplet_types::{Encode, Genus, GenusInt};


bitflags! {
    /// Per-entry flags as persisted. Only the bits that survive serialization.
    #[derive(PartialEq, Eq, Clone, Copy, Debug)]
    pub struct EntryFlags: u8 {
        const INLAY = 1 << 0;
        const COLLECTION = 1 << 1;
    }
}

impl From<Token> for EntryFlags {
    fn from(token: Token) -> Self {
        let mut flags = EntryFlags::empty();
        flags.set(EntryFlags::INLAY, token.is_inlay());
        flags.set(EntryFlags::COLLECTION, token.is_collection());
        flags
    }
}

/* Header */

#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub(crate) struct Header {
    pub preplaced_len: usize,
    pub loose_count: usize,
}

fn read_u16(image: &[u8], at: usize) -> Option<u16> {
    let bytes = image.get(at..at + mem::size_of::<u16>())?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// An image shorter than a header reads as an empty one.
pub(crate) fn read_header(image: &[u8]) -> Header {
    match (read_u16(image, 0), read_u16(image, 2)) {
        (Some(preplaced_len), Some(loose_count)) => Header {
            preplaced_len: preplaced_len as usize,
            loose_count: loose_count as usize,
        },
        _ => Header::default(),
    }
}

/// The image must already hold a header. Both counts are bounded by the callers.
pub(crate) fn write_header(image: &mut [u8], header: Header) {
    image[0..2].copy_from_slice(&(header.preplaced_len as u16).to_le_bytes());
    image[2..4].copy_from_slice(&(header.loose_count as u16).to_le_bytes());
}

fn set_loose_count(image: &mut [u8], loose_count: usize) {
    let header = read_header(image);
    write_header(
        image,
        Header {
            loose_count,
            ..header
        },
    );
}

pub(crate) fn preplaced_region(image: &[u8]) -> &[u8] {
    let header = read_header(image);
    image
        .get(TUPLE_HEADER_BYTES..TUPLE_HEADER_BYTES + header.preplaced_len)
        .unwrap_or(&[])
}

pub(crate) fn loose_start(image: &[u8]) -> usize {
    if image.is_empty() {
        return 0;
    }
    TUPLE_HEADER_BYTES + read_header(image).preplaced_len
}

/* Loose entries */

#[derive(Deref, PartialEq, Eq, Clone, Copy, Debug)]
pub struct PayloadLen(u32);
impl PayloadLen {
    pub fn of(len: usize) -> Result<Self> {
        let int = u32::try_from(len).map_err(|_| TupleError::CapacityExceeded {
            needed: len,
            capacity: MAX_TUPLE_BYTES_NETTO,
            ceiling: MAX_TUPLE_BYTES_NETTO,
        })?;
        Ok(Self(int))
    }
    fn read(image: &[u8], at: usize) -> Option<Self> {
        let bytes = image.get(at..at + mem::size_of::<u32>())?;
        Some(Self(u32::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3],
        ])))
    }
    fn to_le_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }
}

/// One loose entry, borrowed from its image.
#[derive(Clone, Copy, Debug)]
pub struct LooseEntry<'a> {
    pub genus: Genus,
    pub flags: EntryFlags,
    pub tag: u16,
    /// Offset of the entry header within the image.
    pub start: usize,
    pub payload: &'a [u8],
}

impl<'a> LooseEntry<'a> {
    pub fn total_len(&self) -> usize {
        LOOSE_ENTRY_HEADER_BYTES + self.payload.len()
    }
    pub fn end(&self) -> usize {
        self.start + self.total_len()
    }
}

/// Decodes the entry whose header starts at `at`.
fn parse_entry(image: &[u8], at: usize) -> Result<LooseEntry<'_>> {
    let malformed = |offset, detail| TupleError::Malformed { offset, detail };

    let head = image
        .get(at..at + LOOSE_ENTRY_HEADER_BYTES)
        .ok_or_else(|| malformed(at, "truncated loose entry header"))?;
    let genus = Genus::try_from(GenusInt::from(head[0]))
        .map_err(|_| malformed(at, "unknown genus code"))?;
    let flags =
        EntryFlags::from_bits(head[1]).ok_or_else(|| malformed(at + 1, "unknown entry flags"))?;
    let tag = u16::from_le_bytes([head[2], head[3]]);
    let payload_len = PayloadLen::read(image, at + 4)
        .ok_or_else(|| malformed(at + 4, "truncated loose entry header"))?;

    let payload_start = at + LOOSE_ENTRY_HEADER_BYTES;
    let payload = image
        .get(payload_start..payload_start + *payload_len as usize)
        .ok_or_else(|| malformed(payload_start, "payload runs past the end of the image"))?;

    Ok(LooseEntry {
        genus,
        flags,
        tag,
        start: at,
        payload,
    })
}

/// All loose entries of an image in insertion order. Restartable by cloning.
///
/// Images reaching this iterator are trusted; a framing error silently ends it.
#[derive(Clone, Debug)]
pub struct LooseEntries<'a> {
    image: &'a [u8],
    pos: usize,
    remaining: usize,
}

impl<'a> LooseEntries<'a> {
    pub fn new(image: &'a [u8]) -> Self {
        Self {
            image,
            pos: loose_start(image),
            remaining: read_header(image).loose_count,
        }
    }
}

impl<'a> Iterator for LooseEntries<'a> {
    type Item = LooseEntry<'a>;
    fn next(&mut self) -> Option<LooseEntry<'a>> {
        if self.remaining == 0 {
            return None;
        }
        match parse_entry(self.image, self.pos) {
            Ok(entry) => {
                self.pos = entry.end();
                self.remaining -= 1;
                Some(entry)
            }
            Err(_) => {
                self.remaining = 0;
                None
            }
        }
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

pub(crate) fn find_first(image: &[u8], genus: Genus, tag: u16) -> Option<LooseEntry<'_>> {
    LooseEntries::new(image).find(|entry| entry.genus == genus && entry.tag == tag)
}

/* Mutation. Callers check room and conflicts first; nothing here fails half-way. */

pub(crate) fn entry_len<V: Encode + ?Sized>(value: &V) -> usize {
    LOOSE_ENTRY_HEADER_BYTES + value.encoded_len()
}

pub(crate) fn push_entry<V: Encode + ?Sized>(
    image: &mut Vec<u8>,
    token: Token,
    payload_len: PayloadLen,
    value: &V,
) {
    let start = image.len();
    image.push(*GenusInt::from(token.genus()));
    image.push(EntryFlags::from(token).bits());
    image.extend_from_slice(&token.tag().to_le_bytes());
    image.extend_from_slice(&payload_len.to_le_bytes());
    image.resize(start + LOOSE_ENTRY_HEADER_BYTES + *payload_len as usize, 0);
    value.encode_into(&mut image[start + LOOSE_ENTRY_HEADER_BYTES..]);

    let count = read_header(image).loose_count;
    set_loose_count(image, count + 1);
}

/// Replaces the payload of the entry at `start`, moving the tail if the length changes.
pub(crate) fn replace_payload<V: Encode + ?Sized>(
    image: &mut Vec<u8>,
    start: usize,
    old_len: usize,
    payload_len: PayloadLen,
    value: &V,
) {
    let payload_start = start + LOOSE_ENTRY_HEADER_BYTES;
    let new_len = *payload_len as usize;
    if new_len != old_len {
        image.splice(
            payload_start..payload_start + old_len,
            std::iter::repeat(0).take(new_len),
        );
        image[start + 4..payload_start].copy_from_slice(&payload_len.to_le_bytes());
    }
    value.encode_into(&mut image[payload_start..payload_start + new_len]);
}

/// Drops every loose entry matching `(genus, tag)`. Returns how many were dropped.
pub(crate) fn remove_entries(image: &mut Vec<u8>, genus: Genus, tag: u16) -> usize {
    let doomed = LooseEntries::new(image)
        .filter(|entry| entry.genus == genus && entry.tag == tag)
        .map(|entry| entry.start..entry.end())
        .collect::<Vec<_>>();
    for range in doomed.iter().rev() {
        image.drain(range.clone());
    }
    if !doomed.is_empty() {
        let count = read_header(image).loose_count;
        set_loose_count(image, count - doomed.len());
    }
    doomed.len()
}

/// Drops all loose entries and zeroes the preplaced region.
pub(crate) fn reset(image: &mut Vec<u8>) {
    if image.is_empty() {
        return;
    }
    let loose_start = loose_start(image);
    image.truncate(loose_start);
    image[TUPLE_HEADER_BYTES..].fill(0);
    set_loose_count(image, 0);
}

/* Validation of external images */

/// Checks framing of an image that did not come from a builder.
pub(crate) fn validate(image: &[u8], schema: &Schema) -> Result<()> {
    let malformed = |offset, detail| Err(TupleError::Malformed { offset, detail });

    if image.is_empty() {
        return Ok(());
    }
    if image.len() < TUPLE_HEADER_BYTES {
        return malformed(0, "truncated header");
    }
    if image.len() - TUPLE_HEADER_BYTES > MAX_TUPLE_BYTES_NETTO {
        return malformed(MAX_TUPLE_BYTES_NETTO, "image exceeds the tuple size ceiling");
    }

    let header = read_header(image);
    if header.preplaced_len != schema.preplaced_len() {
        return malformed(0, "preplaced region length differs from the schema");
    }
    let mut pos = TUPLE_HEADER_BYTES + header.preplaced_len;
    if pos > image.len() {
        return malformed(image.len(), "truncated preplaced region");
    }

    for _ in 0..header.loose_count {
        let entry = parse_entry(image, pos)?;
        if entry.genus.is_fixed() && entry.payload.len() != entry.genus.fixed_width() {
            return malformed(entry.start + 4, "fixed-width payload has the wrong length");
        }
        if entry.flags.contains(EntryFlags::INLAY) && entry.genus != Genus::Nested {
            return malformed(entry.start, "inlay entry is not of the nested genus");
        }
        pos = entry.end();
    }

    if pos != image.len() {
        return malformed(pos, "trailing bytes after the last loose entry");
    }
    Ok(())
}
