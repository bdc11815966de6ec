use crate::error::{Result, TupleError};
use crate::limits::{MAX_PREPLACED_BYTES, MAX_TUPLE_BYTES_NETTO};
use crate::token::StaticToken;
use itertools::Itertools;
use std::mem;
use std::sync::Arc;
use tuplet_types::Genus;


/// One declared preplaced slot. `offset` is relative to the start of the preplaced region.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct FieldDescriptor {
    pub genus: Genus,
    pub tag: u16,
    pub offset: usize,
}

impl FieldDescriptor {
    pub fn end(&self) -> usize {
        self.offset + self.genus.fixed_width()
    }
}

/// The struct-like layout of a tuple's preplaced region.
///
/// Every tuple built against a schema starts with a region of [`Schema::preplaced_len`]
/// bytes. Its slots are located by the descriptor table, or directly by static tokens.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct Schema {
    descriptors: Vec<FieldDescriptor>,
    preplaced_len: usize,
}

impl Schema {
    /// No preplaced region at all. Tuples are purely loose.
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A region of known length with no declared slots.
    /// Only static tokens can address it.
    pub fn opaque(preplaced_len: usize) -> Arc<Self> {
        Arc::new(Self {
            descriptors: vec![],
            preplaced_len,
        })
    }

    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    pub fn preplaced_len(&self) -> usize {
        self.preplaced_len
    }

    pub fn descriptors(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    /// Scans the descriptor table for a preplaced `(genus, tag)`.
    pub fn lookup(&self, genus: Genus, tag: u16) -> Option<&FieldDescriptor> {
        self.descriptors
            .iter()
            .find(|desc| desc.genus == genus && desc.tag == tag)
    }
}

#[derive(Default)]
pub struct SchemaBuilder {
    fields: Vec<FieldDescriptor>,
    next_offset: usize,
    region_len: Option<usize>,
}

impl SchemaBuilder {
    /// Appends a slot right after the previously declared one, with no padding.
    pub fn field(self, genus: Genus, tag: u16) -> Self {
        let offset = self.next_offset;
        self.push(FieldDescriptor { genus, tag, offset })
    }

    pub fn field_at(self, genus: Genus, tag: u16, offset: usize) -> Self {
        self.push(FieldDescriptor { genus, tag, offset })
    }

    /// Declares the slot a static token addresses.
    pub fn static_field<T: StaticToken>(self) -> Self {
        let token = T::TOKEN;
        self.field_at(token.genus(), token.tag(), T::OFFSET)
    }

    /// Sizes the region after the struct the static tokens were declared on.
    pub fn layout_of<S>(mut self) -> Self {
        self.region_len = Some(mem::size_of::<S>());
        self
    }

    fn push(mut self, desc: FieldDescriptor) -> Self {
        self.next_offset = self.next_offset.max(desc.end());
        self.fields.push(desc);
        self
    }

    pub fn build(self) -> Result<Arc<Schema>> {
        let violation = |msg: String| Err(TupleError::SchemaViolation(msg));

        for desc in self.fields.iter() {
            if !desc.genus.is_fixed() {
                return violation(format!(
                    "{:?}#{} is not fixed-width and cannot be preplaced",
                    desc.genus, desc.tag
                ));
            }
        }

        let by_identity = self
            .fields
            .iter()
            .sorted_by_key(|desc| (desc.genus, desc.tag))
            .collect_vec();
        for (a, b) in by_identity.iter().tuple_windows() {
            if (a.genus, a.tag) == (b.genus, b.tag) {
                return violation(format!("{:?}#{} is declared twice", a.genus, a.tag));
            }
        }

        let by_offset = self
            .fields
            .iter()
            .sorted_by_key(|desc| desc.offset)
            .collect_vec();
        for (a, b) in by_offset.iter().tuple_windows() {
            if a.end() > b.offset {
                return violation(format!(
                    "{:?}#{} at {} overlaps {:?}#{} at {}",
                    a.genus, a.tag, a.offset, b.genus, b.tag, b.offset
                ));
            }
        }

        let fields_end = by_offset.last().map_or(0, |desc| desc.end());
        let preplaced_len = self.region_len.unwrap_or(fields_end);
        if fields_end > preplaced_len {
            return violation(format!(
                "slots end at {fields_end}, past the {preplaced_len}-byte region"
            ));
        }
        if preplaced_len > MAX_PREPLACED_BYTES.min(MAX_TUPLE_BYTES_NETTO) {
            return violation(format!("{preplaced_len}-byte preplaced region is too large"));
        }

        Ok(Arc::new(Schema {
            descriptors: self.fields,
            preplaced_len,
        }))
    }
}
