use crate::layout::{self, Header};
use crate::limits::{MAX_TUPLE_BYTES_NETTO, TUPLE_HEADER_BYTES};
use crate::schema::Schema;
use std::cmp;

/// Owned storage of one tuple image.
///
/// `image` holds exactly the bytes in use (header included); `capacity` is the number of
/// payload bytes the buffer may hold without reallocating. An unallocated buffer has an
/// empty image, which reads as an empty tuple.
#[derive(Debug, Default)]
pub struct TupleBuffer {
    image: Vec<u8>,
    capacity: usize,
}

impl TupleBuffer {
    /// A fresh image: the header and a zeroed preplaced region, no loose entries.
    /// The capacity is raised to fit the preplaced region if it is smaller.
    pub fn allocate(schema: &Schema, capacity: usize) -> Self {
        let preplaced_len = schema.preplaced_len();
        let capacity = cmp::min(cmp::max(capacity, preplaced_len), MAX_TUPLE_BYTES_NETTO);

        let mut image = Vec::with_capacity(TUPLE_HEADER_BYTES + capacity);
        image.resize(TUPLE_HEADER_BYTES + preplaced_len, 0);
        layout::write_header(
            &mut image,
            Header {
                preplaced_len,
                loose_count: 0,
            },
        );

        Self { image, capacity }
    }

    /// Copies an existing image. The capacity is raised to fit it if it is smaller.
    pub fn copy_of(image: &[u8], capacity: usize) -> Self {
        let used = image.len().saturating_sub(TUPLE_HEADER_BYTES);
        let capacity = cmp::min(cmp::max(capacity, used), MAX_TUPLE_BYTES_NETTO);

        let mut buf = Vec::with_capacity(TUPLE_HEADER_BYTES + capacity);
        buf.extend_from_slice(image);

        Self {
            image: buf,
            capacity,
        }
    }

    pub(crate) fn grow_to(&mut self, capacity: usize) {
        if capacity > self.capacity {
            self.image
                .reserve_exact(TUPLE_HEADER_BYTES + capacity - self.image.len());
            self.capacity = capacity;
        }
    }

    pub fn image(&self) -> &[u8] {
        &self.image
    }

    pub(crate) fn image_mut(&mut self) -> &mut Vec<u8> {
        &mut self.image
    }

    /// Netto bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Netto bytes in use.
    pub fn used(&self) -> usize {
        self.image.len().saturating_sub(TUPLE_HEADER_BYTES)
    }

    pub fn is_allocated(&self) -> bool {
        !self.image.is_empty()
    }
}

/// Keeps the capacity of the source, which `Vec::clone` would not.
impl Clone for TupleBuffer {
    fn clone(&self) -> Self {
        Self::copy_of(&self.image, self.capacity)
    }
}
