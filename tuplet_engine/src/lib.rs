//! # Tuple engine
//!
//! A tuple is one self-describing byte image holding two kinds of fields:
//!
//! - *Preplaced* fields sit at fixed offsets of a struct-like region declared by a
//!   [`Schema`]. They are addressed directly, either by a static token whose offset is a
//!   compile-time constant or by a dynamic token resolved through the schema.
//! - *Loose* fields are appended after that region and found by a linear scan on
//!   `(genus, tag)`. A collection token allows many entries with the same identity.
//!
//! Four variants own or borrow the image:
//!
//! | variant            | owns          | mutable | grows |
//! |--------------------|---------------|---------|-------|
//! | [`TupleRoWeak`]    | no (borrow)   | no      | -     |
//! | [`TupleRoManaged`] | shared, `Arc` | no      | -     |
//! | [`TupleRwFixed`]   | exclusive     | yes     | no    |
//! | [`TupleRwManaged`] | exclusive     | yes     | yes   |
//!
//! Builders freeze into read-only tuples with [`TupleWrite::take_weak`],
//! [`TupleWrite::take_managed_clone`] and [`TupleWrite::move_to_ro`], and resume from
//! them with `clone_from_ro` or `From<TupleRoManaged>`.

mod buffer;
mod config;
mod error;
mod layout;
mod limits;
mod read;
mod resolver;
mod ro_managed;
mod ro_weak;
mod rw_fixed;
mod rw_managed;
mod schema;
mod token;
mod write;

pub use config::*;
pub use error::*;
pub use limits::*;
pub use read::*;
pub use ro_managed::*;
pub use ro_weak::*;
pub use rw_fixed::*;
pub use rw_managed::*;
pub use schema::*;
pub use token::*;
pub use write::TupleWrite;

pub use tuplet_types::{self as types, Datetime, Decimal64, Decode, Encode, Genus, PropertyPair};

pub mod prelude {
    pub use crate::{
        static_token, Addressable, Genus, Schema, StaticToken, Token, TupleRead, TupleRoManaged,
        TupleRoWeak, TupleRwFixed, TupleRwManaged, TupleWrite,
    };
}
