use serde::{Deserialize, Serialize};

/// Operator-defined classification rule
///
/// `type_name` is the category label a matching column receives and `pattern` is
/// a regular expression tested against the column name. Rules are authored
/// case-insensitive by convention (`(?i)...`); the engine does not force it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRule {
    #[serde(default)]
    pub id: i64,
    pub type_name: String,
    #[serde(alias = "regex")]
    pub pattern: String,
}

impl ClassificationRule {
    pub fn new(type_name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            id: 0,
            type_name: type_name.into(),
            pattern: pattern.into(),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }
}
