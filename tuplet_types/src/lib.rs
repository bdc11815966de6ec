//! Field kinds ("genera") and the codecs of the values a tuple can hold.

mod genus;
pub mod value;

pub use genus::*;
pub use value::{
    Datetime, Decimal64, Decode, Encode, IpNet, MacAddress, PropertyPair, Uuid, ValueError,
};
