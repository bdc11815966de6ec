use crate::error::{Result, TupleError};
use crate::limits::TUPLE_HEADER_BYTES;
use crate::schema::Schema;
use crate::token::{Address, Token};


/// Where an addressed field lives within an image.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub(crate) enum Resolved {
    /// A preplaced slot. `offset` is from the start of the image.
    Slot { offset: usize, width: usize },
    /// Entries to be found by scanning the loose area.
    Loose(Token),
}

/// Shared by the read and write paths. Looks at the schema only, never at image bytes.
pub(crate) fn resolve(addr: Address, schema: &Schema) -> Result<Resolved> {
    let token = addr.token();
    let not_declared = || TupleError::FieldNotDeclared {
        genus: token.genus(),
        tag: token.tag(),
    };

    match addr {
        Address::Static(slot) => {
            let width = token.genus().fixed_width();
            if slot.offset() + width > schema.preplaced_len() {
                return Err(not_declared());
            }
            debug_assert!(
                schema
                    .lookup(token.genus(), token.tag())
                    .map_or(true, |desc| desc.offset == slot.offset()),
                "static offset of {token} disagrees with the schema",
            );
            Ok(Resolved::Slot {
                offset: TUPLE_HEADER_BYTES + slot.offset(),
                width,
            })
        }
        Address::Dynamic(token) if token.is_preplaced() => {
            let desc = schema
                .lookup(token.genus(), token.tag())
                .ok_or_else(not_declared)?;
            Ok(Resolved::Slot {
                offset: TUPLE_HEADER_BYTES + desc.offset,
                width: desc.genus.fixed_width(),
            })
        }
        Address::Dynamic(token) => Ok(Resolved::Loose(token)),
    }
}
