//! Validated rule creation

use tracing::info;

use super::RegexClassifier;
use crate::error::{ColscanError, ColscanResult};
use crate::models::{ClassificationRule, NOT_APPLICABLE};
use crate::storage::RuleStore;

/// Compile-check a rule and persist it
///
/// A store must never hold a pattern that would abort every later scan, so
/// the rule is compiled before it is written. The type name is upper-cased.
pub async fn create_rule(
    store: &dyn RuleStore,
    type_name: &str,
    pattern: &str,
) -> ColscanResult<ClassificationRule> {
    let type_name = type_name.trim().to_ascii_uppercase();
    if type_name.is_empty() {
        return Err(ColscanError::invalid_input_field(
            "Rule type name must not be empty",
            "type_name",
        ));
    }
    if type_name == NOT_APPLICABLE {
        return Err(ColscanError::invalid_input_field(
            format!("'{}' is reserved", NOT_APPLICABLE),
            "type_name",
        ));
    }
    if pattern.is_empty() {
        return Err(ColscanError::invalid_input_field(
            "Rule pattern must not be empty",
            "pattern",
        ));
    }

    let rule = ClassificationRule::new(type_name, pattern);
    RegexClassifier::new(&rule)?;

    let id = store.create_rule(&rule.type_name, &rule.pattern).await?;
    info!(id, type_name = %rule.type_name, "rule created");
    Ok(rule.with_id(id))
}
