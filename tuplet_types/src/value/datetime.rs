use crate::value::{Decode, Encode, ValueError};
use crate::Genus;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

mod test;

const FRACTION_BITS: u32 = 32;
const FRACTION_ONE: u128 = 1 << FRACTION_BITS;
const NANOS_PER_SEC: u128 = 1_000_000_000;

/// A UTC timestamp: seconds since the UNIX epoch in 32.32 fixed point.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug, Default)]
pub struct Datetime(u64);

impl Datetime {
    pub const fn from_fixedpoint(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn fixedpoint(self) -> u64 {
        self.0
    }

    pub const fn from_seconds(seconds: u32) -> Self {
        Self((seconds as u64) << FRACTION_BITS)
    }

    pub const fn seconds(self) -> u32 {
        (self.0 >> FRACTION_BITS) as u32
    }

    pub fn nanoseconds(self) -> u32 {
        let fraction = (self.0 & (FRACTION_ONE as u64 - 1)) as u128;
        ((fraction * NANOS_PER_SEC) >> FRACTION_BITS) as u32
    }

    /// Current time at full clock resolution.
    pub fn now() -> Self {
        Self::now_fine()
    }

    /// Current time truncated to whole milliseconds.
    pub fn now_coarse() -> Self {
        let since_epoch = Self::since_epoch();
        let millis = since_epoch.subsec_millis();
        Self::from_duration(Duration::new(since_epoch.as_secs(), millis * 1_000_000))
    }

    /// Current time with nanosecond input resolution.
    pub fn now_fine() -> Self {
        Self::from_duration(Self::since_epoch())
    }

    pub fn from_duration(since_epoch: Duration) -> Self {
        let seconds = since_epoch.as_secs() & u64::from(u32::MAX);
        let fraction = (u128::from(since_epoch.subsec_nanos()) << FRACTION_BITS) / NANOS_PER_SEC;
        Self((seconds << FRACTION_BITS) | fraction as u64)
    }

    pub fn to_duration(self) -> Duration {
        Duration::new(u64::from(self.seconds()), self.nanoseconds())
    }

    fn since_epoch() -> Duration {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
    }
}

impl From<SystemTime> for Datetime {
    fn from(time: SystemTime) -> Self {
        let since_epoch = time.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO);
        Self::from_duration(since_epoch)
    }
}
impl From<Datetime> for SystemTime {
    fn from(dt: Datetime) -> Self {
        UNIX_EPOCH + dt.to_duration()
    }
}

impl Encode for Datetime {
    fn accepts_genus(&self, genus: Genus) -> bool {
        genus == Genus::DatetimeUtc
    }
    fn encoded_len(&self) -> usize {
        Genus::DatetimeUtc.fixed_width()
    }
    fn encode_into(&self, out: &mut [u8]) {
        out.copy_from_slice(&self.0.to_le_bytes());
    }
}
impl<'a> Decode<'a> for Datetime {
    fn accepts(genus: Genus) -> bool {
        genus == Genus::DatetimeUtc
    }
    fn decode(payload: &'a [u8]) -> Result<Self, ValueError> {
        u64::decode(payload).map(Self)
    }
}
