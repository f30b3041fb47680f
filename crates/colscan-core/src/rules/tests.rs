//! Tests for rule compilation and first-match classification

use super::*;
use crate::error::ColscanError;
use crate::models::{ClassificationRule, NOT_APPLICABLE};
use crate::storage::{InMemoryStore, RuleStore};
use std::collections::HashMap;

fn rule(type_name: &str, pattern: &str) -> ClassificationRule {
    ClassificationRule::new(type_name, pattern)
}

fn default_rules() -> Vec<ClassificationRule> {
    vec![
        rule("EMAIL_ADDRESS", "(?i)email"),
        rule("USERNAME", "(?i)^user(name)?$"),
        rule(
            "CREDIT_CARD_NUMBER",
            "(?i)^(credit[_ ]?card(_?number)?|card[_ ]?number)$",
        ),
        rule("FIRST_NAME", "(?i)^first(_?name)?$"),
        rule("LAST_NAME", "(?i)^last(_?name)?$"),
        rule("IP_ADDRESS", "(?i)^ip(_address)?$"),
        rule("PHONE_NUMBER", "(?i)^phone(_number)?$"),
        rule("DATE", "(?i)^(created_at|updated_at|.*_date)$"),
        rule("ADDRESS", "(?i)^address(_.*)?$"),
        rule("POSTAL_CODE", "(?i)^(postal|zip)_?code$"),
        rule("SSN", "(?i)^ssn$"),
        rule("PASSWORD", "(?i)^password$"),
    ]
}

#[test]
fn test_build_with_valid_patterns() {
    let rules = default_rules();
    let set = ClassifierSet::build(&rules).unwrap();
    assert_eq!(set.len(), rules.len());
}

#[test]
fn test_each_rule_positive_and_negative() {
    let set = ClassifierSet::build(&default_rules()).unwrap();

    let positives: HashMap<&str, &str> = [
        ("EMAIL_ADDRESS", "useremail"),
        ("USERNAME", "username"),
        ("CREDIT_CARD_NUMBER", "credit_card_number"),
        ("FIRST_NAME", "first_name"),
        ("LAST_NAME", "last_name"),
        ("IP_ADDRESS", "ip_address"),
        ("PHONE_NUMBER", "phone"),
        ("DATE", "created_at"),
        ("ADDRESS", "address_line1"),
        ("POSTAL_CODE", "postal_code"),
        ("SSN", "ssn"),
        ("PASSWORD", "password"),
    ]
    .into_iter()
    .collect();

    // Look-alike names that must stay unmatched
    let negatives: HashMap<&str, &str> = [
        ("EMAIL_ADDRESS", "comment_text"),
        ("USERNAME", "user_id"),
        ("CREDIT_CARD_NUMBER", "cardboard_box"),
        ("FIRST_NAME", "nickname"),
        ("LAST_NAME", "lastname_hint"),
        ("IP_ADDRESS", "description"),
        ("PHONE_NUMBER", "microphone"),
        ("DATE", "validate"),
        ("ADDRESS", "email_address"),
        ("POSTAL_CODE", "code_review"),
        ("SSN", "session_id"),
        ("PASSWORD", "password_hint"),
    ]
    .into_iter()
    .collect();

    for c in set.iter() {
        let positive = positives[c.info_type()];
        assert!(c.matches(positive), "{} should match {}", positive, c.info_type());
        let negative = negatives[c.info_type()];
        assert!(!c.matches(negative), "{} should not match {}", negative, c.info_type());
    }
}

#[test]
fn test_invalid_pattern_aborts_whole_set() {
    let rules = vec![
        rule("USERNAME", "^user$"),
        rule("BROKEN", "(unclosed"),
        rule("SSN", "^ssn$"),
    ];

    let err = ClassifierSet::build(&rules).unwrap_err();
    match err {
        ColscanError::InvalidRule {
            type_name, pattern, ..
        } => {
            assert_eq!(type_name, "BROKEN");
            assert_eq!(pattern, "(unclosed");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_first_match_wins_in_rule_order() {
    let set = ClassifierSet::build(&[
        rule("USERNAME", "^user(name)?$"),
        rule("EMAIL_ADDRESS", "email"),
    ])
    .unwrap();

    assert_eq!(set.classify("username"), "USERNAME");
    assert_eq!(set.classify("user_email"), "EMAIL_ADDRESS");
    assert_eq!(set.classify("comment_text"), NOT_APPLICABLE);
}

#[test]
fn test_overlapping_rules_follow_operator_order() {
    let email_first = ClassifierSet::build(&[
        rule("EMAIL_ADDRESS", "(?i)email"),
        rule("ADDRESS", "(?i)address"),
    ])
    .unwrap();
    let address_first = ClassifierSet::build(&[
        rule("ADDRESS", "(?i)address"),
        rule("EMAIL_ADDRESS", "(?i)email"),
    ])
    .unwrap();

    assert_eq!(email_first.classify("email_address"), "EMAIL_ADDRESS");
    assert_eq!(address_first.classify("email_address"), "ADDRESS");
}

#[test]
fn test_case_policy_belongs_to_pattern() {
    let sensitive = ClassifierSet::build(&[rule("SSN", "^ssn$")]).unwrap();
    let insensitive = ClassifierSet::build(&[rule("SSN", "(?i)^ssn$")]).unwrap();

    assert_eq!(sensitive.classify("SSN"), NOT_APPLICABLE);
    assert_eq!(insensitive.classify("SSN"), "SSN");
}

#[test]
fn test_empty_rule_set_classifies_everything_as_na() {
    let set = ClassifierSet::build(&[]).unwrap();
    assert!(set.is_empty());
    assert_eq!(set.classify("email"), NOT_APPLICABLE);
    assert!(set.categories().is_empty());
}

#[test]
fn test_duplicate_types_are_evaluated_independently() {
    let set = ClassifierSet::build(&[
        rule("PHONE_NUMBER", "^phone$"),
        rule("PHONE_NUMBER", "^mobile$"),
        rule("SSN", "^ssn$"),
    ])
    .unwrap();

    assert_eq!(set.classify("phone"), "PHONE_NUMBER");
    assert_eq!(set.classify("mobile"), "PHONE_NUMBER");
    assert_eq!(set.categories(), vec!["PHONE_NUMBER", "SSN"]);
}

#[tokio::test]
async fn test_create_rule_rejects_invalid_pattern_before_storing() {
    let store = InMemoryStore::new();
    let err = create_rule(&store, "ssn", "(unclosed").await.unwrap_err();
    assert!(matches!(err, ColscanError::InvalidRule { .. }));
    assert!(store.get_all_rules().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_rule_normalizes_type_name() {
    let store = InMemoryStore::new();
    let created = create_rule(&store, " email_address ", "(?i)e-?mail").await.unwrap();
    assert_eq!(created.type_name, "EMAIL_ADDRESS");
    assert_eq!(created.id, 1);

    let stored = store.get_all_rules().await.unwrap();
    assert_eq!(stored, vec![created]);
}

#[tokio::test]
async fn test_create_rule_rejects_reserved_and_empty_input() {
    let store = InMemoryStore::new();
    assert!(create_rule(&store, "n/a", "x").await.is_err());
    assert!(create_rule(&store, "  ", "x").await.is_err());
    assert!(create_rule(&store, "SSN", "").await.is_err());
}
