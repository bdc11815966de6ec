use crate::buffer::TupleBuffer;
use crate::config::{TupleConfig, DEFAULT_INITIAL_CAPACITY};
use crate::error::{Result, TupleError};
use crate::read::TupleRead;
use crate::ro_managed::TupleRoManaged;
use crate::schema::Schema;
use crate::write::{sealed::Storage, TupleWrite};
use std::cmp;
use std::sync::Arc;

mod test;

/// A builder over a buffer of fixed capacity. It never reallocates; a mutation that does
/// not fit fails with [`TupleError::CapacityExceeded`].
#[derive(Clone, Debug)]
pub struct TupleRwFixed {
    buffer: TupleBuffer,
    schema: Arc<Schema>,
    capacity: usize,
}

impl TupleRwFixed {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self::with_capacity(schema, DEFAULT_INITIAL_CAPACITY)
    }

    pub fn with_config(schema: Arc<Schema>, config: TupleConfig) -> Self {
        Self::with_capacity(schema, config.initial_capacity)
    }

    /// `capacity` is in netto bytes. It is raised to fit the preplaced region.
    pub fn with_capacity(schema: Arc<Schema>, capacity: usize) -> Self {
        let buffer = TupleBuffer::allocate(&schema, capacity);
        Self {
            capacity: buffer.capacity(),
            buffer,
            schema,
        }
    }

    /// A deep copy of `ro`, with room to grow up to the default capacity.
    pub fn clone_from_ro<R: TupleRead + ?Sized>(ro: &R) -> Self {
        let buffer = TupleBuffer::copy_of(ro.image(), DEFAULT_INITIAL_CAPACITY);
        Self {
            capacity: buffer.capacity(),
            buffer,
            schema: Arc::clone(ro.schema()),
        }
    }
}

impl Default for TupleRwFixed {
    fn default() -> Self {
        Self::new(Schema::empty())
    }
}

/// Reclaims the buffer if `ro` was its last holder, otherwise copies it.
/// Either way the builder gets at least the default capacity.
impl From<TupleRoManaged> for TupleRwFixed {
    fn from(ro: TupleRoManaged) -> Self {
        let (buffer, schema) = ro.into_parts();
        match buffer {
            Some(mut buffer) => {
                buffer.grow_to(cmp::max(DEFAULT_INITIAL_CAPACITY, buffer.capacity()));
                Self {
                    capacity: buffer.capacity(),
                    buffer,
                    schema,
                }
            }
            None => Self::new(schema),
        }
    }
}

impl TupleRead for TupleRwFixed {
    fn image(&self) -> &[u8] {
        self.buffer.image()
    }
    fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }
}

impl Storage for TupleRwFixed {
    fn buffer(&self) -> &TupleBuffer {
        &self.buffer
    }
    fn buffer_mut(&mut self) -> &mut TupleBuffer {
        &mut self.buffer
    }
    fn initial_capacity(&self) -> usize {
        self.capacity
    }
    fn make_room(&mut self, needed: usize) -> Result<()> {
        let capacity = self.buffer.capacity();
        if needed > capacity {
            return Err(TupleError::CapacityExceeded {
                needed,
                capacity,
                ceiling: capacity,
            });
        }
        Ok(())
    }
}

impl TupleWrite for TupleRwFixed {}
