//! Prelude for rule composition
//!
//! Re-exports the types needed to declare and run a ruleset.

pub use crate::config::ValidationConfig;
pub use crate::error::RuleError;
pub use crate::functional::rule_value::RuleValue;
pub use crate::functional::validation_engine::{
    BoundRuleset, RuleReport, Ruleset, RulesetBuilder, RulesetOutcome, RulesetSubject,
    SubjectOutcome, SubjectReport,
};
pub use crate::functional::validation_rules::{Rule, RuleKind, RuleOutcome, RuleParameter};
pub use crate::utils::error_sink::{CollectingSink, ErrorSink, TracingSink};
