use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// Classification of a macroprocess within the process map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Strategic,
    Operational,
    Support,
}

impl Category {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Strategic => "Strategic",
            Category::Operational => "Operational",
            Category::Support => "Support",
        }
    }
}

impl FromStr for Category {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Strategic" => Ok(Category::Strategic),
            "Operational" => Ok(Category::Operational),
            "Support" => Ok(Category::Support),
            _ => Err(ParseEnumError {
                kind: "category",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of reference document attached to a subprocess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocType {
    Manual,
    #[serde(rename = "SOP")]
    Sop,
    Format,
}

impl DocType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DocType::Manual => "Manual",
            DocType::Sop => "SOP",
            DocType::Format => "Format",
        }
    }
}

impl FromStr for DocType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Manual" => Ok(DocType::Manual),
            "SOP" => Ok(DocType::Sop),
            "Format" => Ok(DocType::Format),
            _ => Err(ParseEnumError {
                kind: "document type",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: '{}'", self.kind, self.value)
    }
}

impl std::error::Error for ParseEnumError {}

// Stored as TEXT; an out-of-set value in the database is a corruption, not a
// user error, so it surfaces as a conversion failure.

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for DocType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for DocType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        for c in [Category::Strategic, Category::Operational, Category::Support] {
            assert_eq!(c.as_str().parse::<Category>().unwrap(), c);
        }
    }

    #[test]
    fn test_category_rejects_unknown() {
        assert!("Tactical".parse::<Category>().is_err());
        assert!("strategic".parse::<Category>().is_err());
    }

    #[test]
    fn test_doc_type_serde_names() {
        assert_eq!(serde_json::to_string(&DocType::Sop).unwrap(), "\"SOP\"");
        assert_eq!(
            serde_json::from_str::<DocType>("\"Manual\"").unwrap(),
            DocType::Manual
        );
        assert!(serde_json::from_str::<DocType>("\"Sop\"").is_err());
    }
}
