//! Rule compiler and classifier set
//!
//! Operator rules are compiled once per scan into an ordered [`ClassifierSet`].
//! A column name takes the info type of the first rule that matches, so rule
//! order is how operators express priority between overlapping patterns.

mod classifier;
mod registry;

#[cfg(test)]
mod tests;

pub use classifier::{ClassifierSet, RegexClassifier};
pub use registry::create_rule;
