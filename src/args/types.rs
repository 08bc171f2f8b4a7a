use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::num::{NonZeroU64, NonZeroUsize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

/// Non-zero integer newtypes for counts, limits and intervals.
macro_rules! positive_int {
    ($name:ident, $inner:ty, $nonzero:ty) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name($nonzero);

        impl $name {
            #[must_use]
            pub const fn get(self) -> $inner {
                self.0.get()
            }
        }

        impl TryFrom<$inner> for $name {
            type Error = ValidationError;

            fn try_from(value: $inner) -> Result<Self, Self::Error> {
                <$nonzero>::new(value)
                    .map($name)
                    .ok_or(ValidationError::ValueTooSmall { min: 1 })
            }
        }

        impl std::str::FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<$inner>()
                    .map_err(|source| ValidationError::InvalidNumber { source })
                    .and_then(Self::try_from)
            }
        }

        impl From<$name> for $inner {
            fn from(value: $name) -> Self {
                value.get()
            }
        }
    };
}

positive_int!(PositiveU64, u64, NonZeroU64);
positive_int!(PositiveUsize, usize, NonZeroUsize);

/// Probability in `[0, 1]`, used for per-request Bernoulli draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ratio(f64);

impl Ratio {
    pub const NEVER: Ratio = Ratio(0.0);
    pub const HALF: Ratio = Ratio(0.5);

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Ratio {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if (0.0..=1.0).contains(&value) {
            Ok(Ratio(value))
        } else {
            Err(ValidationError::RatioOutOfRange {
                value: value.to_string(),
            })
        }
    }
}

impl std::str::FromStr for Ratio {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|err| ValidationError::InvalidRatio {
                value: s.to_owned(),
                source: err,
            })?;
        Ratio::try_from(value)
    }
}
