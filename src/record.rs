//! Tank records and the raw form candidate they are built from
//!
//! Stored fields keep the form's textual form so that a save/load
//! round trip reproduces exactly what the user entered.

use serde::{Deserialize, Deserializer, Serialize};

use crate::validate::parse_leading_int;

/// One tracked aquarium entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Display name (trimmed)
    pub name: String,
    /// Tank size in liters, as entered
    #[serde(deserialize_with = "string_or_number")]
    pub tank_size: String,
    /// ISO-8601 calendar date (`YYYY-MM-DD`)
    pub last_water_change: String,
}

impl Record {
    pub fn new(
        name: impl Into<String>,
        tank_size: impl Into<String>,
        last_water_change: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            tank_size: tank_size.into(),
            last_water_change: last_water_change.into(),
        }
    }

    /// Tank size in liters under the lenient leading-integer parse.
    ///
    /// Returns `None` when the stored text has no leading digits.
    pub fn liters(&self) -> Option<i64> {
        parse_leading_int(&self.tank_size)
    }

    /// Current fields as a candidate, used to prefill the edit form
    pub fn to_candidate(&self) -> Candidate {
        Candidate {
            name: self.name.clone(),
            tank_size: self.tank_size.clone(),
            last_water_change: self.last_water_change.clone(),
        }
    }
}

/// Unvalidated raw input proposed for a create or update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub tank_size: String,
    pub last_water_change: String,
}

impl Candidate {
    pub fn new(
        name: impl Into<String>,
        tank_size: impl Into<String>,
        last_water_change: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            tank_size: tank_size.into(),
            last_water_change: last_water_change.into(),
        }
    }

    /// Build the record to store. Name and date are trimmed, the tank
    /// size is kept as entered.
    pub(crate) fn into_record(self) -> Record {
        Record {
            name: self.name.trim().to_string(),
            tank_size: self.tank_size,
            last_water_change: self.last_water_change.trim().to_string(),
        }
    }
}

/// Older saves may hold `tankSize` as a JSON number
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case_keys() {
        let record = Record::new("Nemo", "50", "2024-01-01");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"name":"Nemo","tankSize":"50","lastWaterChange":"2024-01-01"}"#
        );
    }

    #[test]
    fn test_numeric_tank_size_accepted() {
        let json = r#"{"name":"Dory","tankSize":120,"lastWaterChange":"2024-02-10"}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.tank_size, "120");
        assert_eq!(record.liters(), Some(120));
    }

    #[test]
    fn test_into_record_trims_name_and_date() {
        let record = Candidate::new("  Guppy ", " 40", " 2024-01-01 ").into_record();
        assert_eq!(record.name, "Guppy");
        assert_eq!(record.tank_size, " 40");
        assert_eq!(record.last_water_change, "2024-01-01");
    }

    #[test]
    fn test_lenient_liters() {
        assert_eq!(Record::new("Tetra", "50kg", "2024-01-01").liters(), Some(50));
        assert_eq!(Record::new("Tetra", "kg", "2024-01-01").liters(), None);
    }
}
