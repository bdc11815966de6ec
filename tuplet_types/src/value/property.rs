use crate::value::{Decode, Encode, ValueError};
use crate::Genus;
use std::str;


/// A named small integer, e.g. a tag with a weight.
///
/// ```text
/// struct PropertyPair {
///     value:  i8,
///     name:   [u8; payload_len - 1],   // UTF-8
/// }
/// ```
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct PropertyPair<'a> {
    pub name: &'a str,
    pub value: i8,
}

impl<'a> PropertyPair<'a> {
    pub fn new(name: &'a str, value: i8) -> Self {
        Self { name, value }
    }
}

impl Encode for PropertyPair<'_> {
    fn accepts_genus(&self, genus: Genus) -> bool {
        genus == Genus::Property
    }
    fn encoded_len(&self) -> usize {
        1 + self.name.len()
    }
    fn encode_into(&self, out: &mut [u8]) {
        out[0] = self.value.to_le_bytes()[0];
        out[1..].copy_from_slice(self.name.as_bytes());
    }
}
impl<'a> Decode<'a> for PropertyPair<'a> {
    fn accepts(genus: Genus) -> bool {
        genus == Genus::Property
    }
    fn decode(payload: &'a [u8]) -> Result<Self, ValueError> {
        let (value, name) = payload.split_first().ok_or(ValueError::WrongLength {
            expected: 1,
            actual: 0,
        })?;
        let name = str::from_utf8(name).map_err(|_| ValueError::InvalidUtf8)?;
        Ok(Self {
            name,
            value: i8::from_le_bytes([*value]),
        })
    }
}
