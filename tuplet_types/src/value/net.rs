use crate::value::{expect_len, Decode, Encode, ValueError};
use crate::Genus;
use derive_more::{Deref, From};
use std::net::{Ipv4Addr, Ipv6Addr};

#[derive(From, Deref, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug, Default)]
pub struct Uuid(pub [u8; 16]);

#[derive(From, Deref, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug, Default)]
pub struct MacAddress(pub [u8; 6]);

/// An address with a prefix length. IPv4 networks are kept as IPv4-mapped IPv6.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
pub struct IpNet {
    pub addr: Ipv6Addr,
    pub prefix_len: u8,
}

macro_rules! impl_raw_bytes {
    ($($t:ty => $genus:path),* $(,)?) => {$(
        impl Encode for $t {
            fn accepts_genus(&self, genus: Genus) -> bool {
                genus == $genus
            }
            fn encoded_len(&self) -> usize {
                self.0.len()
            }
            fn encode_into(&self, out: &mut [u8]) {
                out.copy_from_slice(&self.0);
            }
        }
        impl<'a> Decode<'a> for $t {
            fn accepts(genus: Genus) -> bool {
                genus == $genus
            }
            fn decode(payload: &'a [u8]) -> Result<Self, ValueError> {
                expect_len(payload, ($genus).fixed_width())?;
                let mut raw = Self::default();
                raw.0.copy_from_slice(payload);
                Ok(raw)
            }
        }
    )*};
}

impl_raw_bytes!(
    Uuid => Genus::Uuid,
    MacAddress => Genus::Mac,
);

/* Addresses are stored in network byte order. */
impl Encode for Ipv6Addr {
    fn accepts_genus(&self, genus: Genus) -> bool {
        genus == Genus::Ip
    }
    fn encoded_len(&self) -> usize {
        16
    }
    fn encode_into(&self, out: &mut [u8]) {
        out.copy_from_slice(&self.octets());
    }
}
impl<'a> Decode<'a> for Ipv6Addr {
    fn accepts(genus: Genus) -> bool {
        genus == Genus::Ip
    }
    fn decode(payload: &'a [u8]) -> Result<Self, ValueError> {
        let octets = <[u8; 16]>::try_from(payload).map_err(|_| ValueError::WrongLength {
            expected: 16,
            actual: payload.len(),
        })?;
        Ok(Ipv6Addr::from(octets))
    }
}

impl Encode for Ipv4Addr {
    fn accepts_genus(&self, genus: Genus) -> bool {
        genus == Genus::Ip
    }
    fn encoded_len(&self) -> usize {
        16
    }
    fn encode_into(&self, out: &mut [u8]) {
        out.copy_from_slice(&self.to_ipv6_mapped().octets());
    }
}

impl Encode for IpNet {
    fn accepts_genus(&self, genus: Genus) -> bool {
        genus == Genus::IpNet
    }
    fn encoded_len(&self) -> usize {
        17
    }
    fn encode_into(&self, out: &mut [u8]) {
        out[..16].copy_from_slice(&self.addr.octets());
        out[16] = self.prefix_len;
    }
}
impl<'a> Decode<'a> for IpNet {
    fn accepts(genus: Genus) -> bool {
        genus == Genus::IpNet
    }
    fn decode(payload: &'a [u8]) -> Result<Self, ValueError> {
        expect_len(payload, 17)?;
        Ok(Self {
            addr: Ipv6Addr::decode(&payload[..16])?,
            prefix_len: payload[16],
        })
    }
}
