//! Domain identifier types with validation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Weather station identifier newtype wrapper
///
/// Station names end up in archive dataset names and metric labels, so they
/// are restricted to ASCII letters, digits, `_` and `-`.
///
/// # Examples
///
/// ```
/// use almanac::domain::ids::StationId;
/// use std::str::FromStr;
///
/// let station = StationId::from_str("roof_east").unwrap();
/// assert_eq!(station.as_str(), "roof_east");
/// assert!(StationId::from_str("roof east").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StationId(String);

impl StationId {
    /// Creates a new StationId from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(StationId)` if the name is valid, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Station name cannot be empty".to_string());
        }
        if let Some(bad) = id
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(format!(
                "Invalid character '{bad}' in station name '{id}'. Use letters, digits, '_' or '-'"
            ));
        }
        Ok(Self(id))
    }

    /// Returns the station name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StationId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for StationId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StationId> for String {
    fn from(id: StationId) -> Self {
        id.0
    }
}

impl AsRef<str> for StationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
