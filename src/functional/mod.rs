//! Rule evaluation: values, rules, subjects and rulesets.

pub mod prelude;
pub mod rule_value;
pub mod validation_engine;
pub mod validation_rules;
