use crate::buffer::TupleBuffer;
use crate::config::TupleConfig;
use crate::error::{Result, TupleError};
use crate::limits::MAX_TUPLE_BYTES_NETTO;
use crate::read::TupleRead;
use crate::ro_managed::TupleRoManaged;
use crate::schema::Schema;
use crate::write::{sealed::Storage, TupleWrite};
use std::sync::Arc;


/// A builder over a growable buffer.
///
/// Growth follows the configured [`GrowthPolicy`](crate::GrowthPolicy) and stops at
/// [`MAX_TUPLE_BYTES_NETTO`]. Past that a mutation fails with
/// [`TupleError::CapacityExceeded`].
#[derive(Clone, Debug)]
pub struct TupleRwManaged {
    buffer: TupleBuffer,
    schema: Arc<Schema>,
    config: TupleConfig,
}

impl TupleRwManaged {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self::with_config(schema, TupleConfig::default())
    }

    pub fn with_config(schema: Arc<Schema>, config: TupleConfig) -> Self {
        Self {
            buffer: TupleBuffer::allocate(&schema, config.initial_capacity),
            schema,
            config,
        }
    }

    pub fn with_capacity(schema: Arc<Schema>, initial_capacity: usize) -> Self {
        let config = TupleConfig {
            initial_capacity,
            ..TupleConfig::default()
        };
        Self::with_config(schema, config)
    }

    /// A deep copy of `ro` into a fresh buffer, growing by the default policy.
    pub fn clone_from_ro<R: TupleRead + ?Sized>(ro: &R) -> Self {
        Self::clone_from_ro_with_config(ro, TupleConfig::default())
    }

    pub fn clone_from_ro_with_config<R>(ro: &R, config: TupleConfig) -> Self
    where
        R: TupleRead + ?Sized,
    {
        Self {
            buffer: TupleBuffer::copy_of(ro.image(), config.initial_capacity),
            schema: Arc::clone(ro.schema()),
            config,
        }
    }

    /// Like `From<TupleRoManaged>`, but keeps growing by `config` instead of the default.
    pub fn from_ro_with_config(ro: TupleRoManaged, config: TupleConfig) -> Self {
        let (buffer, schema) = ro.into_parts();
        match buffer {
            Some(buffer) => Self {
                buffer,
                schema,
                config,
            },
            None => Self::with_config(schema, config),
        }
    }

    pub fn config(&self) -> &TupleConfig {
        &self.config
    }
}

impl Default for TupleRwManaged {
    fn default() -> Self {
        Self::new(Schema::empty())
    }
}

/// Reclaims the buffer if `ro` was its last holder, otherwise copies it.
/// Growth follows the default config; see [`TupleRwManaged::from_ro_with_config`].
impl From<TupleRoManaged> for TupleRwManaged {
    fn from(ro: TupleRoManaged) -> Self {
        Self::from_ro_with_config(ro, TupleConfig::default())
    }
}

impl TupleRead for TupleRwManaged {
    fn image(&self) -> &[u8] {
        self.buffer.image()
    }
    fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }
}

impl Storage for TupleRwManaged {
    fn buffer(&self) -> &TupleBuffer {
        &self.buffer
    }
    fn buffer_mut(&mut self) -> &mut TupleBuffer {
        &mut self.buffer
    }
    fn initial_capacity(&self) -> usize {
        self.config.initial_capacity
    }
    fn make_room(&mut self, needed: usize) -> Result<()> {
        let capacity = self.buffer.capacity();
        if needed <= capacity {
            return Ok(());
        }
        if needed > MAX_TUPLE_BYTES_NETTO {
            log::warn!(
                "tuple cannot grow to {needed} bytes, the ceiling is {MAX_TUPLE_BYTES_NETTO}"
            );
            return Err(TupleError::CapacityExceeded {
                needed,
                capacity,
                ceiling: MAX_TUPLE_BYTES_NETTO,
            });
        }

        let grown = self.config.growth.next_capacity(capacity, needed);
        log::debug!("growing tuple buffer from {capacity} to {grown} bytes");
        self.buffer.grow_to(grown);
        Ok(())
    }
}

impl TupleWrite for TupleRwManaged {}
