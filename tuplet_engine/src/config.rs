use crate::error::{Result, TupleError};
use crate::limits::MAX_TUPLE_BYTES_NETTO;
use std::cmp;
use std::env;
use std::str::FromStr;


pub const ENV_VAR_INITIAL_CAPACITY: &str = "TUPLET_INITIAL_CAPACITY";
pub const ENV_VAR_GROWTH: &str = "TUPLET_GROWTH";

pub const DEFAULT_INITIAL_CAPACITY: usize = 4096;

/// How a growable buffer picks its next capacity. The result is always capped at
/// [`MAX_TUPLE_BYTES_NETTO`].
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum GrowthPolicy {
    /// Twice the current capacity, or exactly what is needed if that is more.
    #[default]
    Doubling,
    /// What is needed, rounded up to a multiple of `step`.
    Linear { step: usize },
}

impl GrowthPolicy {
    pub fn next_capacity(self, current: usize, needed: usize) -> usize {
        let proposed = match self {
            GrowthPolicy::Doubling => cmp::max(current.saturating_mul(2), needed),
            GrowthPolicy::Linear { step } => {
                let step = cmp::max(step, 1);
                needed.div_ceil(step).saturating_mul(step)
            }
        };
        cmp::min(proposed, MAX_TUPLE_BYTES_NETTO)
    }
}

/// Accepts `doubling` or `linear:<step>`.
impl FromStr for GrowthPolicy {
    type Err = TupleError;
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || TupleError::InvalidConfig {
            var: ENV_VAR_GROWTH,
            value: s.to_string(),
        };
        match s.trim() {
            "doubling" => Ok(GrowthPolicy::Doubling),
            other => {
                let step = other.strip_prefix("linear:").ok_or_else(invalid)?;
                let step = step.parse::<usize>().map_err(|_| invalid())?;
                if step == 0 {
                    return Err(invalid());
                }
                Ok(GrowthPolicy::Linear { step })
            }
        }
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct TupleConfig {
    /// Payload capacity a builder allocates up front. Fixed builders never exceed it.
    pub initial_capacity: usize,
    pub growth: GrowthPolicy,
}

impl Default for TupleConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            growth: GrowthPolicy::default(),
        }
    }
}

impl TupleConfig {
    /// Reads [`ENV_VAR_INITIAL_CAPACITY`] and [`ENV_VAR_GROWTH`]; unset variables keep
    /// their defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(s) = env::var(ENV_VAR_INITIAL_CAPACITY) {
            config.initial_capacity = parse_capacity(&s)?;
        }
        if let Ok(s) = env::var(ENV_VAR_GROWTH) {
            config.growth = s.parse()?;
        }

        Ok(config)
    }
}

fn parse_capacity(s: &str) -> Result<usize> {
    match s.trim().parse::<usize>() {
        Ok(cap) if cap <= MAX_TUPLE_BYTES_NETTO => Ok(cap),
        _ => Err(TupleError::InvalidConfig {
            var: ENV_VAR_INITIAL_CAPACITY,
            value: s.to_string(),
        }),
    }
}
