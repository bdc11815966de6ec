use crate::error::Result;
use crate::layout;
use crate::read::TupleRead;
use crate::schema::Schema;
use std::sync::Arc;

mod test;

/// A read-only view borrowing someone else's image. Never copies, never owns.
///
/// Obtained from a builder with `take_weak()`, from raw bytes with
/// [`TupleRoWeak::from_bytes`], or from an embedded tuple.
/// The borrow keeps the source alive and unmutated for as long as the view exists.
#[derive(Clone, Debug)]
pub struct TupleRoWeak<'a> {
    image: &'a [u8],
    schema: Arc<Schema>,
}

impl<'a> TupleRoWeak<'a> {
    /// Validates an external image against `schema`.
    pub fn from_bytes(image: &'a [u8], schema: Arc<Schema>) -> Result<Self> {
        layout::validate(image, &schema)?;
        Ok(Self { image, schema })
    }

    /// Views the payload of an inlay entry. The embedded header decides the region length.
    pub fn from_embedded(image: &'a [u8]) -> Result<Self> {
        let schema = Schema::opaque(layout::read_header(image).preplaced_len);
        Self::from_bytes(image, schema)
    }

    /// For images produced by builders, which are well-formed by construction.
    pub(crate) fn trusted(image: &'a [u8], schema: Arc<Schema>) -> Self {
        Self { image, schema }
    }

    /// The image, with the lifetime of the source rather than of the view.
    pub fn data(&self) -> &'a [u8] {
        self.image
    }
}

impl Default for TupleRoWeak<'_> {
    fn default() -> Self {
        Self {
            image: &[],
            schema: Schema::empty(),
        }
    }
}

impl TupleRead for TupleRoWeak<'_> {
    fn image(&self) -> &[u8] {
        self.image
    }
    fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }
}
