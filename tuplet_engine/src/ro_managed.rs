use crate::buffer::TupleBuffer;
use crate::error::Result;
use crate::layout;
use crate::read::TupleRead;
use crate::ro_weak::TupleRoWeak;
use crate::schema::Schema;
use owning_ref::OwningRef;
use std::sync::Arc;


type SharedImage = OwningRef<Arc<TupleBuffer>, [u8]>;

/// A read-only tuple sharing its buffer with every clone of itself.
///
/// Cloning is shallow and increments [`TupleRoManaged::ref_counter`]. The buffer is freed
/// when the last holder drops or purges it.
#[derive(Clone, Debug)]
pub struct TupleRoManaged {
    shared: Option<SharedImage>,
    schema: Arc<Schema>,
}

impl TupleRoManaged {
    pub(crate) fn from_buffer(buffer: TupleBuffer, schema: Arc<Schema>) -> Self {
        let shared = OwningRef::new(Arc::new(buffer)).map(|buf| buf.image());
        Self {
            shared: Some(shared),
            schema,
        }
    }

    /// Validates an external image against `schema` and copies it.
    pub fn from_bytes(image: &[u8], schema: Arc<Schema>) -> Result<Self> {
        layout::validate(image, &schema)?;
        let buffer = TupleBuffer::copy_of(image, 0);
        Ok(Self::from_buffer(buffer, schema))
    }

    /// A deep copy of any tuple into a fresh shared buffer.
    pub fn copy_of<R: TupleRead + ?Sized>(tuple: &R) -> Self {
        let buffer = TupleBuffer::copy_of(tuple.image(), 0);
        Self::from_buffer(buffer, Arc::clone(tuple.schema()))
    }

    pub fn has_buffer(&self) -> bool {
        self.shared.is_some()
    }

    /// How many holders share the buffer. 0 once this instance is purged.
    pub fn ref_counter(&self) -> usize {
        self.shared
            .as_ref()
            .map_or(0, |shared| Arc::strong_count(shared.as_owner()))
    }

    /// Releases this instance's hold on the buffer now rather than at drop.
    /// Afterwards it reads as an empty tuple.
    pub fn purge(&mut self) {
        self.shared = None;
    }

    pub fn data(&self) -> &[u8] {
        self.shared.as_deref().unwrap_or(&[])
    }

    pub fn as_weak(&self) -> TupleRoWeak<'_> {
        TupleRoWeak::trusted(self.data(), Arc::clone(&self.schema))
    }

    /// Takes the buffer back for mutation. Copies it if other holders remain.
    pub(crate) fn into_parts(self) -> (Option<TupleBuffer>, Arc<Schema>) {
        let Some(shared) = self.shared else {
            return (None, self.schema);
        };
        let buffer = match Arc::try_unwrap(shared.into_owner()) {
            Ok(buffer) => {
                log::debug!("reclaimed the last reference to a {}-byte image", buffer.image().len());
                buffer
            }
            Err(arc) => {
                log::debug!(
                    "copied a {}-byte image shared by {} holders",
                    arc.image().len(),
                    Arc::strong_count(&arc)
                );
                TupleBuffer::clone(&arc)
            }
        };
        (Some(buffer), self.schema)
    }
}

impl Default for TupleRoManaged {
    fn default() -> Self {
        Self {
            shared: None,
            schema: Schema::empty(),
        }
    }
}

impl TupleRead for TupleRoManaged {
    fn image(&self) -> &[u8] {
        self.data()
    }
    fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }
}
