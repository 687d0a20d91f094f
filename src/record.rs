//! Levels as published in JSON.

use serde::Deserialize;

use crate::builder::LevelBuilder;
use crate::error::{ParseError, Result};
use crate::level::Level;

/// A level as published in JSON. Fields beyond these are ignored.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LevelRecord {
    /// Publisher's identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Rows separated by newlines.
    pub map: String,
    /// Signed so that a negative budget reaches validation instead of failing deserialization.
    pub budget: i64,
    /// Title of the level.
    #[serde(default)]
    pub name: Option<String>,
    /// Free text shown with the level.
    #[serde(default)]
    pub description: Option<String>,
    /// Who made the level.
    #[serde(default)]
    pub creator_name: Option<String>,
}

impl LevelRecord {
    /// Deserialize one record.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json).map_err(ParseError::from)?)
    }

    /// Parse the map and attach the budget.
    pub fn level(&self) -> Result<Level> {
        Ok(LevelBuilder::from_map(&self.map)?.with_budget(self.budget).build()?)
    }

    /// The name to show for this level.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().or(self.id.as_deref()).unwrap_or("Unknown")
    }
}

#[cfg(test)]
mod tests {
    use crate::error::{EnclosureError, ModelError, ParseError};
    use crate::record::LevelRecord;

    #[test]
    fn read_published_level() {
        let record = LevelRecord::from_json(r#"{"id":"abc","map":"...\n.H.\n...","budget":4,"name":"Tiny","creatorName":"someone","playCount":3,"isDaily":false}"#).unwrap();
        assert_eq!(record.display_name(), "Tiny");
        assert_eq!(record.creator_name.as_deref(), Some("someone"));

        let level = record.level().unwrap();
        assert_eq!(level.budget(), 4);
        assert_eq!(level.start(), 4);
    }

    #[test]
    fn missing_fields_are_malformed() {
        let err = LevelRecord::from_json(r#"{"map":"H"}"#).unwrap_err();
        assert!(matches!(err, EnclosureError::Parse(ParseError::Json(_))));
        assert!(LevelRecord::from_json("not json").is_err());
    }

    #[test]
    fn negative_budget() {
        let record = LevelRecord::from_json(r#"{"map":"...\n.H.\n...","budget":-2}"#).unwrap();
        assert_eq!(record.display_name(), "Unknown");
        assert!(matches!(record.level().unwrap_err(), EnclosureError::Model(ModelError::NegativeBudget(-2))));
    }
}
