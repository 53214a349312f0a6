//! Ruleset Validation Engine
//!
//! A [`Ruleset`] walks its declared [`RulesetSubject`]s in order, resolves each
//! subject's value on the instance through an explicit property accessor, and
//! lets the subject evaluate its rules. Evaluation is fail-fast by default:
//! a subject stops at its first invalid rule and the ruleset stops at its
//! first invalid subject, so callers see one coherent failure at a time.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::ValidationConfig;
use crate::error::RuleError;
use crate::functional::rule_value::RuleValue;
use crate::functional::validation_rules::{Rule, RuleOutcome};
use crate::models::rule_dto::RulesetSubjectDto;
use crate::utils::error_sink::ErrorSink;

type Accessor<T> = Arc<dyn Fn(&T) -> RuleValue + Send + Sync>;

/// Result of one rule, tagged with the rule that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleReport {
    pub rule: Rule,
    pub is_valid: bool,
    pub message: Option<String>,
}

impl RuleReport {
    fn new(rule: &Rule, outcome: RuleOutcome) -> Self {
        Self {
            rule: rule.clone(),
            is_valid: outcome.is_valid,
            message: outcome.message,
        }
    }
}

/// Result of validating one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectOutcome {
    pub is_valid: bool,
    pub valid_rules: Vec<RuleReport>,
    pub invalid_rules: Vec<RuleReport>,
}

/// A named group of rules applying to one property of the validated type.
///
/// Rules run in declared order and evaluation stops at the first invalid rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RulesetSubject {
    name: String,
    rules: Vec<Rule>,
}

impl RulesetSubject {
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    /// Appends a rule, keeping declaration order.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Names of the subjects referenced by this subject's cross-field rules.
    pub fn related_subjects(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().filter_map(Rule::related_subject)
    }

    /// Validates `value` against every rule in order, stopping at the first
    /// invalid one.
    ///
    /// Cross-field rules examine `related` and use `value` as their bound;
    /// all other rules examine `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// let subject = RulesetSubject::new("Name", vec![Rule::is_not_null(), Rule::max_length(3)]);
    /// let outcome = subject.validate(&RuleValue::from("abcd"), None).unwrap();
    /// assert!(!outcome.is_valid);
    /// assert_eq!(outcome.valid_rules.len(), 1);
    /// assert_eq!(outcome.invalid_rules.len(), 1);
    /// ```
    pub fn validate(
        &self,
        value: &RuleValue,
        related: Option<&RuleValue>,
    ) -> Result<SubjectOutcome, RuleError> {
        let related = |_: &str| related.cloned().unwrap_or_default();
        self.evaluate(value, &related, Some(1))
    }

    /// Like [`RulesetSubject::validate`] but evaluates every rule and collects
    /// every failure.
    pub fn validate_exhaustive(
        &self,
        value: &RuleValue,
        related: Option<&RuleValue>,
    ) -> Result<SubjectOutcome, RuleError> {
        let related = |_: &str| related.cloned().unwrap_or_default();
        self.evaluate(value, &related, None)
    }

    /// Stops once `max_invalid` invalid rules are collected; `None` evaluates
    /// every rule.
    fn evaluate(
        &self,
        value: &RuleValue,
        related: &dyn Fn(&str) -> RuleValue,
        max_invalid: Option<usize>,
    ) -> Result<SubjectOutcome, RuleError> {
        let mut valid_rules = Vec::new();
        let mut invalid_rules = Vec::new();

        for rule in &self.rules {
            let outcome = match rule.related_subject() {
                Some(name) => rule.validate_against(&related(name), value)?,
                None => rule.validate(value)?,
            };

            if outcome.is_valid {
                valid_rules.push(RuleReport::new(rule, outcome));
            } else {
                invalid_rules.push(RuleReport::new(rule, outcome));
                if max_invalid.is_some_and(|max| invalid_rules.len() >= max) {
                    break;
                }
            }
        }

        Ok(SubjectOutcome {
            is_valid: invalid_rules.is_empty(),
            valid_rules,
            invalid_rules,
        })
    }
}

/// Per-subject entry of a [`RulesetOutcome`].
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectReport {
    pub name: String,
    pub is_valid: bool,
    pub valid_rules: Vec<RuleReport>,
    pub invalid_rules: Vec<RuleReport>,
}

impl SubjectReport {
    fn new(name: &str, outcome: SubjectOutcome) -> Self {
        Self {
            name: name.to_string(),
            is_valid: outcome.is_valid,
            valid_rules: outcome.valid_rules,
            invalid_rules: outcome.invalid_rules,
        }
    }
}

/// Result of validating an instance against a ruleset.
#[derive(Debug, Clone, PartialEq)]
pub struct RulesetOutcome {
    pub result: bool,
    pub subjects: Vec<SubjectReport>,
}

impl RulesetOutcome {
    pub fn is_valid(&self) -> bool {
        self.result
    }

    /// Messages of every invalid rule, in evaluation order.
    pub fn error_messages(&self) -> Vec<String> {
        self.subjects
            .iter()
            .flat_map(|subject| subject.invalid_rules.iter())
            .filter_map(|report| report.message.clone())
            .collect()
    }

    pub fn first_failure(&self) -> Option<&SubjectReport> {
        self.subjects.iter().find(|subject| !subject.is_valid)
    }
}

/// Ordered subjects plus the property accessors of the validated type.
///
/// Built once through [`RulesetBuilder`] and shared; only the instance varies
/// between [`Ruleset::validate`] calls.
///
/// # Examples
///
/// ```
/// struct Room { name: Option<String>, beds: i32 }
///
/// let ruleset = Ruleset::builder()
///     .property("Name", |r: &Room| r.name.clone())
///     .property("Beds", |r: &Room| r.beds)
///     .subject(RulesetSubject::new("Name", vec![Rule::is_not_null()]))
///     .subject(RulesetSubject::new("Beds", vec![Rule::range(1, 4)]))
///     .build()
///     .unwrap();
///
/// let room = Room { name: Some("Blue".into()), beds: 2 };
/// assert!(ruleset.validate(&room, &TracingSink::new()).unwrap().result);
/// ```
pub struct Ruleset<T> {
    properties: HashMap<String, Accessor<T>>,
    subjects: Vec<RulesetSubject>,
    config: ValidationConfig,
}

impl<T> Clone for Ruleset<T> {
    fn clone(&self) -> Self {
        Self {
            properties: self.properties.clone(),
            subjects: self.subjects.clone(),
            config: self.config.clone(),
        }
    }
}

impl<T> fmt::Debug for Ruleset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut properties: Vec<&str> = self.properties.keys().map(String::as_str).collect();
        properties.sort_unstable();
        f.debug_struct("Ruleset")
            .field("properties", &properties)
            .field("subjects", &self.subjects)
            .field("config", &self.config)
            .finish()
    }
}

impl<T> Ruleset<T> {
    pub fn builder() -> RulesetBuilder<T> {
        RulesetBuilder::new()
    }

    pub fn subjects(&self) -> &[RulesetSubject] {
        &self.subjects
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Returns the ruleset with a different validation configuration.
    pub fn with_config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Current value of the named property, if an accessor is registered.
    pub fn value_of(&self, instance: &T, name: &str) -> Option<RuleValue> {
        self.properties.get(name).map(|accessor| accessor(instance))
    }

    /// Borrows `instance` for validation.
    pub fn bind<'a>(&'a self, instance: &'a T) -> BoundRuleset<'a, T> {
        BoundRuleset {
            ruleset: self,
            instance,
        }
    }

    /// Validates `instance`, sending the message of every invalid rule to
    /// `sink`.
    ///
    /// Subjects without a registered property are skipped and leave no entry
    /// in the outcome. In fail-fast mode validation stops after the first
    /// invalid subject; otherwise it continues until `max_errors` invalid
    /// rules have been collected.
    ///
    /// # Errors
    ///
    /// Propagates [`RuleError::TypeMismatch`] when a property yields a value
    /// a rule cannot check.
    pub fn validate(&self, instance: &T, sink: &dyn ErrorSink) -> Result<RulesetOutcome, RuleError> {
        let mut result = true;
        let mut subjects = Vec::with_capacity(self.subjects.len());
        let mut error_count = 0usize;

        for subject in &self.subjects {
            let Some(accessor) = self.properties.get(subject.name()) else {
                tracing::debug!(subject = subject.name(), "No property registered for subject, skipping");
                continue;
            };

            let value = accessor(instance);
            let related = |name: &str| self.value_of(instance, name).unwrap_or_default();
            let budget = if self.config.fail_fast {
                Some(1)
            } else {
                self.config
                    .max_errors
                    .map(|max| max.saturating_sub(error_count))
            };
            let outcome = subject.evaluate(&value, &related, budget)?;
            let is_valid = outcome.is_valid;

            if !is_valid {
                result = false;
                error_count += outcome.invalid_rules.len();
                for report in &outcome.invalid_rules {
                    if let Some(message) = &report.message {
                        sink.error(message);
                    }
                }
            }

            subjects.push(SubjectReport::new(subject.name(), outcome));

            if !is_valid {
                if self.config.fail_fast {
                    break;
                }
                if let Some(max) = self.config.max_errors {
                    if error_count >= max {
                        break;
                    }
                }
            }
        }

        Ok(RulesetOutcome { result, subjects })
    }

    /// Shorthand for `validate(..)?.result`.
    pub fn is_valid(&self, instance: &T, sink: &dyn ErrorSink) -> Result<bool, RuleError> {
        Ok(self.validate(instance, sink)?.result)
    }

    /// Transport shapes of every declared subject.
    pub fn describe(&self) -> Vec<RulesetSubjectDto> {
        self.subjects.iter().map(RulesetSubjectDto::from).collect()
    }
}

/// A ruleset bound to one instance for the duration of a validation.
pub struct BoundRuleset<'a, T> {
    ruleset: &'a Ruleset<T>,
    instance: &'a T,
}

impl<'a, T> BoundRuleset<'a, T> {
    pub fn instance(&self) -> &'a T {
        self.instance
    }

    pub fn subjects(&self) -> &'a [RulesetSubject] {
        self.ruleset.subjects()
    }

    pub fn validate(&self, sink: &dyn ErrorSink) -> Result<RulesetOutcome, RuleError> {
        self.ruleset.validate(self.instance, sink)
    }

    pub fn is_valid(&self, sink: &dyn ErrorSink) -> Result<bool, RuleError> {
        self.ruleset.is_valid(self.instance, sink)
    }
}

/// Builder for [`Ruleset`].
pub struct RulesetBuilder<T> {
    properties: HashMap<String, Accessor<T>>,
    subjects: Vec<RulesetSubject>,
    config: ValidationConfig,
}

impl<T> Default for RulesetBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RulesetBuilder<T> {
    pub fn new() -> Self {
        Self {
            properties: HashMap::new(),
            subjects: Vec::new(),
            config: ValidationConfig::default(),
        }
    }

    /// Registers the accessor resolving the property `name` on an instance.
    pub fn property<V, F>(mut self, name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> V + Send + Sync + 'static,
        V: Into<RuleValue>,
    {
        self.properties
            .insert(name.into(), Arc::new(move |instance: &T| accessor(instance).into()));
        self
    }

    pub fn subject(mut self, subject: RulesetSubject) -> Self {
        self.subjects.push(subject);
        self
    }

    pub fn subjects<I>(mut self, subjects: I) -> Self
    where
        I: IntoIterator<Item = RulesetSubject>,
    {
        self.subjects.extend(subjects);
        self
    }

    pub fn config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the ruleset.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::UnknownRelatedSubject`] when a cross-field rule
    /// names a property that has no registered accessor.
    pub fn build(self) -> Result<Ruleset<T>, RuleError> {
        for subject in &self.subjects {
            if let Some(related) = subject
                .related_subjects()
                .find(|related| !self.properties.contains_key(*related))
            {
                return Err(RuleError::UnknownRelatedSubject {
                    subject: subject.name().to_string(),
                    related: related.to_string(),
                });
            }
        }

        Ok(Ruleset {
            properties: self.properties,
            subjects: self.subjects,
            config: self.config,
        })
    }
}
