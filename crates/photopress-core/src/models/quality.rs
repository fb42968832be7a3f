use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// User-facing quality tier, sent to the credential service as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QualityLevel {
    High,
    Medium,
    Low,
}

impl QualityLevel {
    pub const ALL: [QualityLevel; 3] = [QualityLevel::High, QualityLevel::Medium, QualityLevel::Low];

    /// Numeric level understood by the downstream image worker.
    pub fn level(self) -> u8 {
        match self {
            QualityLevel::High => 80,
            QualityLevel::Medium => 60,
            QualityLevel::Low => 40,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QualityLevel::High => "high",
            QualityLevel::Medium => "medium",
            QualityLevel::Low => "low",
        }
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(QualityLevel::High),
            "medium" => Ok(QualityLevel::Medium),
            "low" => Ok(QualityLevel::Low),
            other => Err(format!(
                "Invalid quality '{}'. Must be: high, medium, or low",
                other
            )),
        }
    }
}

impl Serialize for QualityLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.level())
    }
}
