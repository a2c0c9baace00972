use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Boundary polynomial, printed and parsed as `0x`-prefixed hex. The same
/// stream chunked under different polynomials is cut in different places.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pol(pub u64);

impl fmt::Display for Pol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid polynomial {0:?}: expected 0x-prefixed hex")]
pub struct ParsePolError(String);

impl FromStr for Pol {
    type Err = ParsePolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| ParsePolError(s.to_owned()))?;
        u64::from_str_radix(digits, 16)
            .map(Pol)
            .map_err(|_| ParsePolError(s.to_owned()))
    }
}

impl TryFrom<String> for Pol {
    type Error = ParsePolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Pol> for String {
    fn from(value: Pol) -> Self {
        value.to_string()
    }
}
