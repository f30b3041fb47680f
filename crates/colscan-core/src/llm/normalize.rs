//! Normalisation of raw model answers
//!
//! Models are asked for a single bare label but still answer with quotes,
//! trailing periods, lowercase or extra words. The answer is cleaned, cut to
//! its first word and checked against the allowed set. A small substring
//! table recovers a few common near-misses; anything else becomes `N/A`.

use crate::models::NOT_APPLICABLE;

/// Substring → label recoveries, tried in order
///
/// Best effort only. A fallback applies only when its label is allowed for
/// the request, so it never introduces a category the operator did not ask
/// for.
pub const LABEL_FALLBACKS: [(&str, &str); 2] = [("EMAIL", "EMAIL_ADDRESS"), ("IP", "IP_ADDRESS")];

const STRIP: &[char] = &['"', '\'', '`', '.', ',', ';', ':'];

pub fn normalize_label(raw: &str, allowed: &[String]) -> String {
    let upper = raw.trim().to_uppercase();
    let first = upper.split_whitespace().next().unwrap_or("");
    let label = first.trim_matches(STRIP);

    if label.is_empty() {
        return NOT_APPLICABLE.to_string();
    }
    if label == NOT_APPLICABLE || allowed.iter().any(|a| a == label) {
        return label.to_string();
    }

    LABEL_FALLBACKS
        .iter()
        .find(|&&(needle, target)| label.contains(needle) && allowed.iter().any(|a| a == target))
        .map(|(_, target)| target.to_string())
        .unwrap_or_else(|| NOT_APPLICABLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_and_messy_answers() {
        let set = allowed(&["EMAIL_ADDRESS", "SSN", "N/A"]);
        assert_eq!(normalize_label("SSN", &set), "SSN");
        assert_eq!(normalize_label("  ssn\n", &set), "SSN");
        assert_eq!(normalize_label("\"EMAIL_ADDRESS\".", &set), "EMAIL_ADDRESS");
        assert_eq!(normalize_label("SSN because it has dashes", &set), "SSN");
        assert_eq!(normalize_label("n/a", &set), "N/A");
    }

    #[test]
    fn test_unknown_and_empty_answers_map_to_not_applicable() {
        let set = allowed(&["SSN", "N/A"]);
        assert_eq!(normalize_label("", &set), "N/A");
        assert_eq!(normalize_label("   ", &set), "N/A");
        assert_eq!(normalize_label("PHONE_NUMBER", &set), "N/A");
    }

    #[test]
    fn test_fallbacks_only_reach_allowed_labels() {
        let with_targets = allowed(&["EMAIL_ADDRESS", "IP_ADDRESS", "N/A"]);
        assert_eq!(normalize_label("EMAIL", &with_targets), "EMAIL_ADDRESS");
        assert_eq!(normalize_label("IPV4", &with_targets), "IP_ADDRESS");

        let without = allowed(&["SSN", "N/A"]);
        assert_eq!(normalize_label("EMAIL", &without), "N/A");
        assert_eq!(normalize_label("IPV4", &without), "N/A");
    }

    #[test]
    fn test_fallback_order_prefers_email() {
        let set = allowed(&["EMAIL_ADDRESS", "IP_ADDRESS", "N/A"]);
        assert_eq!(normalize_label("EMAIL_IP", &set), "EMAIL_ADDRESS");
    }
}
