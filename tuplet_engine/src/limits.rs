/// Bytes of the image header: `preplaced_len: u16` and `loose_count: u16`.
pub const TUPLE_HEADER_BYTES: usize = 4;

/// Bytes in front of every loose payload: genus, flags, tag and payload length.
pub const LOOSE_ENTRY_HEADER_BYTES: usize = 8;

/// Hard ceiling of a whole tuple image, header included.
pub const MAX_TUPLE_BYTES_BRUTTO: usize = 4 * u16::MAX as usize;

/// Hard ceiling of a tuple's payload. No buffer grows past this, whatever the growth policy.
pub const MAX_TUPLE_BYTES_NETTO: usize = MAX_TUPLE_BYTES_BRUTTO - TUPLE_HEADER_BYTES;

/// The preplaced region length is persisted as a `u16`.
pub const MAX_PREPLACED_BYTES: usize = u16::MAX as usize;
