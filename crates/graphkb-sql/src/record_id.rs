//! Record identifiers, `#<cluster>:<position>`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A persistent record identifier of the form `#cluster:position`.
///
/// Negative cluster ids denote abstract/unpersisted records (§6.5) and must never
/// be surfaced in a user-visible payload; that filtering is the caller's
/// responsibility, `RecordId` itself just parses and renders the literal form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId {
    pub cluster: i64,
    pub position: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed record id: {0:?}")]
pub struct RecordIdParseError(pub String);

impl RecordId {
    pub fn new(cluster: i64, position: i64) -> Self {
        Self { cluster, position }
    }

    /// Whether this id refers to an abstract (unpersisted) record.
    pub fn is_abstract(&self) -> bool {
        self.cluster < 0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}:{}", self.cluster, self.position)
    }
}

impl FromStr for RecordId {
    type Err = RecordIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix('#')
            .ok_or_else(|| RecordIdParseError(s.to_string()))?;
        let (cluster_str, position_str) = rest
            .split_once(':')
            .ok_or_else(|| RecordIdParseError(s.to_string()))?;
        let cluster = cluster_str
            .parse::<i64>()
            .map_err(|_| RecordIdParseError(s.to_string()))?;
        let position = position_str
            .parse::<i64>()
            .map_err(|_| RecordIdParseError(s.to_string()))?;
        Ok(Self { cluster, position })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_ids() {
        assert_eq!("#13:1".parse(), Ok(RecordId::new(13, 1)));
        assert_eq!("#0:0".parse(), Ok(RecordId::new(0, 0)));
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!("13:1".parse::<RecordId>().is_err());
        assert!("#13".parse::<RecordId>().is_err());
        assert!("#abc:1".parse::<RecordId>().is_err());
        assert!("#13:xyz".parse::<RecordId>().is_err());
    }

    #[test]
    fn round_trips_through_display() {
        let id = RecordId::new(13, 1);
        assert_eq!(id.to_string(), "#13:1");
        assert_eq!(id.to_string().parse::<RecordId>().unwrap(), id);
    }

    #[test]
    fn negative_cluster_is_abstract() {
        assert!(RecordId::new(-1, 0).is_abstract());
        assert!(!RecordId::new(0, 0).is_abstract());
    }
}
