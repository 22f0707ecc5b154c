use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Identifier of a stored permalink.
///
/// Ids are assigned by the storage layer from a monotonically increasing
/// sequence and rendered in decimal, e.g. `?do_redir=7`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermalinkId(u64);

impl PermalinkId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for PermalinkId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Display for PermalinkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PermalinkId {
    type Err = CoreError;

    /// Parses a decimal id. Signs, whitespace and empty input are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoreError::InvalidPermalinkId(s.to_string()));
        }

        s.parse::<u64>()
            .map(Self)
            .map_err(|e| CoreError::InvalidPermalinkId(format!("{s}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_ids() {
        assert_eq!("7".parse::<PermalinkId>().unwrap(), PermalinkId::new(7));
        assert_eq!("0042".parse::<PermalinkId>().unwrap(), PermalinkId::new(42));
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!("".parse::<PermalinkId>().is_err());
        assert!("+7".parse::<PermalinkId>().is_err());
        assert!("-1".parse::<PermalinkId>().is_err());
        assert!(" 7".parse::<PermalinkId>().is_err());
        assert!("abc".parse::<PermalinkId>().is_err());
        assert!("99999999999999999999999".parse::<PermalinkId>().is_err());
    }

    #[test]
    fn displays_as_decimal() {
        assert_eq!(PermalinkId::new(999).to_string(), "999");
    }

    #[test]
    fn serializes_as_plain_number() {
        let json = serde_json::to_string(&PermalinkId::new(7)).unwrap();
        assert_eq!(json, "7");
    }
}
