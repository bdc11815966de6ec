//! # Value codecs
//!
//! Every value stored in a tuple is written as raw little-endian bytes whose width is
//! either fixed by the [`Genus`] or carried by the entry's length prefix.
//! The tuple engine never interprets payloads; it only moves bytes of a known shape and
//! asks these codecs to produce or consume them.
//!
//! ```text
//! Genus::U16          [u8; 2]
//! Genus::DatetimeUtc  [u8; 8]                       32.32 fixed-point seconds
//! Genus::Text         [u8; payload_len]             UTF-8
//! Genus::Property     { value: i8, name: [u8; payload_len - 1] }
//! ```

use crate::Genus;
use thiserror::Error;

mod datetime;
mod fixed;
mod net;
mod property;
mod variable;

pub use datetime::*;
pub use fixed::*;
pub use net::*;
pub use property::*;

#[derive(Error, PartialEq, Eq, Clone, Debug)]
pub enum ValueError {
    #[error("unknown genus code {0}")]
    UnknownGenus(u8),

    #[error("wrong payload length: expected {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("payload is not valid UTF-8")]
    InvalidUtf8,
}

/// A value that can be written into a field of an accepted genus.
pub trait Encode {
    /// Whether a field of `genus` may hold this value.
    fn accepts_genus(&self, genus: Genus) -> bool;

    fn encoded_len(&self) -> usize;

    /// `out.len()` is always exactly `self.encoded_len()`.
    fn encode_into(&self, out: &mut [u8]);
}

impl<T> Encode for &T
where
    T: Encode + ?Sized,
{
    fn accepts_genus(&self, genus: Genus) -> bool {
        (**self).accepts_genus(genus)
    }
    fn encoded_len(&self) -> usize {
        (**self).encoded_len()
    }
    fn encode_into(&self, out: &mut [u8]) {
        (**self).encode_into(out)
    }
}

/// A value that can be read back from the payload of a field of an accepted genus.
pub trait Decode<'a>: Sized {
    fn accepts(genus: Genus) -> bool;

    fn decode(payload: &'a [u8]) -> Result<Self, ValueError>;
}

pub(crate) fn expect_len(payload: &[u8], expected: usize) -> Result<(), ValueError> {
    if payload.len() != expected {
        return Err(ValueError::WrongLength {
            expected,
            actual: payload.len(),
        });
    }
    Ok(())
}
