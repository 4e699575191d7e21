//! Ordinal severity scale shared by every analyzer.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Severity of a rule, ordered `Hint < Info < Warning < Error`.
///
/// The discriminant doubles as the default scoring weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Hint = 1,
    Info = 2,
    Warning = 3,
    Error = 4,
}

/// Per-severity weights used when scoring one analyzer.
pub type SeverityWeights = BTreeMap<Severity, u32>;

impl Severity {
    /// All severities, lowest first.
    pub const ALL: [Severity; 4] = [
        Severity::Hint,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
    ];

    /// Lowercase name used in configuration and persisted results.
    pub fn name(self) -> &'static str {
        match self {
            Severity::Hint => "hint",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// Map a name back to a severity. Unknown names fall back to `Hint`.
    pub fn from_name(name: &str) -> Severity {
        match name.trim().to_ascii_lowercase().as_str() {
            "error" => Severity::Error,
            "warning" | "warn" => Severity::Warning,
            "info" | "information" => Severity::Info,
            _ => Severity::Hint,
        }
    }

    /// Ordinal value, 1 (hint) through 4 (error).
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Severity> {
        Severity::ALL.into_iter().find(|s| s.ordinal() == ordinal)
    }

    /// Default weight before any configured override.
    pub fn weight(self) -> u32 {
        u32::from(self.ordinal())
    }
}

/// `{hint: 1, info: 2, warning: 3, error: 4}`
pub fn default_severity_weights() -> SeverityWeights {
    Severity::ALL.into_iter().map(|s| (s, s.weight())).collect()
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for Severity {
    fn from(name: &str) -> Self {
        Severity::from_name(name)
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Severity::from_name(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for severity in Severity::ALL {
            assert_eq!(Severity::from_name(severity.name()), severity);
        }
    }

    #[test]
    fn test_unknown_name_defaults_to_hint() {
        assert_eq!(Severity::from_name("critical"), Severity::Hint);
        assert_eq!(Severity::from_name(""), Severity::Hint);
        assert_eq!(Severity::from_name(" ERROR "), Severity::Error);
    }

    #[test]
    fn test_ordering_and_weights() {
        assert!(Severity::Hint < Severity::Info);
        assert!(Severity::Warning < Severity::Error);
        assert_eq!(Severity::Error.weight(), 4);
        assert_eq!(Severity::from_ordinal(2), Some(Severity::Info));
        assert_eq!(Severity::from_ordinal(9), None);
    }

    #[test]
    fn test_default_weights() {
        let weights = default_severity_weights();
        assert_eq!(weights.len(), 4);
        assert_eq!(weights[&Severity::Hint], 1);
        assert_eq!(weights[&Severity::Error], 4);
    }

    #[test]
    fn test_serde_as_map_key() {
        let weights = default_severity_weights();
        let json = serde_json::to_string(&weights).unwrap();
        assert_eq!(json, r#"{"hint":1,"info":2,"warning":3,"error":4}"#);
        let back: SeverityWeights = serde_json::from_str(&json).unwrap();
        assert_eq!(back, weights);
    }
}
