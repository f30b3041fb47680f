//! Regex classifiers compiled from classification rules

use crate::error::{ColscanError, ColscanResult};
use crate::models::{ClassificationRule, NOT_APPLICABLE};
use regex::Regex;

/// A compiled classification rule
#[derive(Debug, Clone)]
pub struct RegexClassifier {
    pattern: Regex,
    info_type: String,
}

impl RegexClassifier {
    /// Compile a single rule
    pub fn new(rule: &ClassificationRule) -> ColscanResult<Self> {
        let pattern = Regex::new(&rule.pattern).map_err(|e| {
            ColscanError::invalid_rule(&rule.type_name, &rule.pattern, e.to_string())
        })?;
        Ok(Self {
            pattern,
            info_type: rule.type_name.clone(),
        })
    }

    /// Whether the column name matches this rule
    pub fn matches(&self, column_name: &str) -> bool {
        self.pattern.is_match(column_name)
    }

    pub fn info_type(&self) -> &str {
        &self.info_type
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

/// Ordered set of compiled classifiers, evaluated first-match-wins
#[derive(Debug, Clone, Default)]
pub struct ClassifierSet {
    classifiers: Vec<RegexClassifier>,
}

impl ClassifierSet {
    /// Compile every rule, in input order
    ///
    /// Construction is all-or-nothing: the first invalid pattern aborts and no
    /// partial set is returned.
    pub fn build(rules: &[ClassificationRule]) -> ColscanResult<Self> {
        let classifiers = rules
            .iter()
            .map(RegexClassifier::new)
            .collect::<ColscanResult<Vec<_>>>()?;
        Ok(Self { classifiers })
    }

    /// Info type of the first matching classifier, or `N/A`
    pub fn classify(&self, column_name: &str) -> &str {
        self.classifiers
            .iter()
            .find(|c| c.matches(column_name))
            .map(RegexClassifier::info_type)
            .unwrap_or(NOT_APPLICABLE)
    }

    /// Whether any classifier matches the column name
    pub fn is_match(&self, column_name: &str) -> bool {
        self.classifiers.iter().any(|c| c.matches(column_name))
    }

    /// Distinct info types in rule order
    pub fn categories(&self) -> Vec<String> {
        let mut seen = Vec::<String>::new();
        for c in &self.classifiers {
            if !seen.iter().any(|t| t == c.info_type()) {
                seen.push(c.info_type().to_string());
            }
        }
        seen
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegexClassifier> {
        self.classifiers.iter()
    }

    pub fn len(&self) -> usize {
        self.classifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }
}
