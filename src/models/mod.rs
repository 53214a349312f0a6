pub mod rule_dto;

pub use rule_dto::{RuleDto, RulesetSubjectDto};
