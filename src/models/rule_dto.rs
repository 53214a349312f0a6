//! Rule DTOs
//!
//! Serializable shapes that let a UI show which rules apply to which fields.

use serde::{Deserialize, Serialize};

use crate::functional::validation_engine::RulesetSubject;
use crate::functional::validation_rules::Rule;

/// A rule as a `(kind, parameter)` pair, e.g. `("Range", "(1, 10)")`.
///
/// Regex rules that accept empty values render as `"<pattern> (optional)"`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RuleDto {
    pub rule: (String, String),
}

impl RuleDto {
    pub fn kind(&self) -> &str {
        &self.rule.0
    }

    pub fn parameter(&self) -> &str {
        &self.rule.1
    }
}

impl From<&Rule> for RuleDto {
    fn from(rule: &Rule) -> Self {
        RuleDto {
            rule: (rule.kind().to_string(), rule.parameter().to_string()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RulesetSubjectDto {
    pub name: String,
    pub rules: Vec<RuleDto>,
}

impl From<&RulesetSubject> for RulesetSubjectDto {
    fn from(subject: &RulesetSubject) -> Self {
        RulesetSubjectDto {
            name: subject.name().to_string(),
            rules: subject.rules().iter().map(RuleDto::from).collect(),
        }
    }
}
