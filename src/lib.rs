//! Layer supertypes for CRUD-oriented services.
//!
//! The [`functional`] module holds the rule engine: [`Rule`]s grouped into
//! named [`RulesetSubject`]s and evaluated against an instance by a
//! [`Ruleset`]. The [`services`] module builds domain and application
//! services that refuse to persist entities their ruleset rejects.

pub mod config;
pub mod error;
pub mod functional;
pub mod models;
pub mod services;
pub mod utils;

pub use config::ValidationConfig;
pub use error::{RuleError, ServiceError, ServiceResult};
pub use functional::rule_value::RuleValue;
pub use functional::validation_engine::{Ruleset, RulesetBuilder, RulesetOutcome, RulesetSubject};
pub use functional::validation_rules::{Rule, RuleKind, RuleOutcome};
pub use models::{RuleDto, RulesetSubjectDto};
pub use utils::error_sink::ErrorSink;
