//! Logical data source keys.
//!
//! A [`DataSourceKey`] names one logical database connection. Keys are opaque
//! strings; the conventional "master"/"slave"/"third" names used by typical
//! deployments are provided as constants, but any name that appears in the
//! configuration is valid.

use std::borrow::Cow;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier for one logical data source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DataSourceKey(Cow<'static, str>);

impl DataSourceKey {
    /// Conventional primary/write data source, also the usual default key.
    pub const MASTER: DataSourceKey = DataSourceKey::from_static("master");

    /// Conventional read replica.
    pub const SLAVE: DataSourceKey = DataSourceKey::from_static("slave");

    /// Create a key from a runtime string (e.g. a configuration map entry).
    pub fn new(name: impl Into<String>) -> Self {
        DataSourceKey(Cow::Owned(name.into()))
    }

    /// Create a key from a static string without allocating.
    pub const fn from_static(name: &'static str) -> Self {
        DataSourceKey(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DataSourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&'static str> for DataSourceKey {
    fn from(name: &'static str) -> Self {
        DataSourceKey::from_static(name)
    }
}

impl From<String> for DataSourceKey {
    fn from(name: String) -> Self {
        DataSourceKey(Cow::Owned(name))
    }
}

impl FromStr for DataSourceKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(DataSourceKey::new(s))
    }
}

impl Serialize for DataSourceKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DataSourceKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(DataSourceKey::new(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_and_owned_keys_compare_equal() {
        assert_eq!(DataSourceKey::MASTER, DataSourceKey::new("master"));
        assert_eq!(DataSourceKey::SLAVE, "slave".parse().unwrap());
        assert_ne!(DataSourceKey::MASTER, DataSourceKey::new("slave"));
    }

    #[test]
    fn display_matches_name() {
        assert_eq!(DataSourceKey::new("third").to_string(), "third");
    }

    #[test]
    fn owned_and_static_keys_hash_alike() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(DataSourceKey::new("master"), 1);
        assert_eq!(map.get(&DataSourceKey::MASTER), Some(&1));
    }
}
