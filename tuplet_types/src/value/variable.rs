use crate::value::{Decode, Encode, ValueError};
use crate::Genus;
use std::str;

/* Text */
impl Encode for str {
    fn accepts_genus(&self, genus: Genus) -> bool {
        genus == Genus::Text
    }
    fn encoded_len(&self) -> usize {
        self.len()
    }
    fn encode_into(&self, out: &mut [u8]) {
        out.copy_from_slice(self.as_bytes());
    }
}
impl Encode for String {
    fn accepts_genus(&self, genus: Genus) -> bool {
        genus == Genus::Text
    }
    fn encoded_len(&self) -> usize {
        self.len()
    }
    fn encode_into(&self, out: &mut [u8]) {
        out.copy_from_slice(self.as_bytes());
    }
}
impl<'a> Decode<'a> for &'a str {
    fn accepts(genus: Genus) -> bool {
        genus == Genus::Text
    }
    fn decode(payload: &'a [u8]) -> Result<Self, ValueError> {
        str::from_utf8(payload).map_err(|_| ValueError::InvalidUtf8)
    }
}
impl<'a> Decode<'a> for String {
    fn accepts(genus: Genus) -> bool {
        genus == Genus::Text
    }
    fn decode(payload: &'a [u8]) -> Result<Self, ValueError> {
        <&str>::decode(payload).map(String::from)
    }
}

/* Varbin */
impl Encode for [u8] {
    fn accepts_genus(&self, genus: Genus) -> bool {
        genus == Genus::Varbin
    }
    fn encoded_len(&self) -> usize {
        self.len()
    }
    fn encode_into(&self, out: &mut [u8]) {
        out.copy_from_slice(self);
    }
}
impl Encode for Vec<u8> {
    fn accepts_genus(&self, genus: Genus) -> bool {
        genus == Genus::Varbin
    }
    fn encoded_len(&self) -> usize {
        self.len()
    }
    fn encode_into(&self, out: &mut [u8]) {
        out.copy_from_slice(self);
    }
}
impl<'a> Decode<'a> for &'a [u8] {
    fn accepts(genus: Genus) -> bool {
        genus == Genus::Varbin
    }
    fn decode(payload: &'a [u8]) -> Result<Self, ValueError> {
        Ok(payload)
    }
}
impl<'a> Decode<'a> for Vec<u8> {
    fn accepts(genus: Genus) -> bool {
        genus == Genus::Varbin
    }
    fn decode(payload: &'a [u8]) -> Result<Self, ValueError> {
        Ok(payload.to_vec())
    }
}
