//! Declarative Validation Rules
//!
//! A [`Rule`] binds one [`RuleKind`] to its parameter and validates a single
//! [`RuleValue`]. Expected edge cases (null, empty text) are reported as
//! pass/fail outcomes; handing a rule a value of the wrong type is a
//! [`RuleError::TypeMismatch`].

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::RuleError;
use crate::functional::rule_value::RuleValue;

// Shared by every `Rule::email` / `Rule::phone`; compiled once.
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$").unwrap());
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9](?:[0-9 ().-]{5,18})[0-9]$").unwrap());

pub const NO_VALUE_TO_VALIDATE: &str = "No value to validate";
pub const RELATED_SUBJECT_NOT_PRESENT: &str = "Related subject has no value to compare";
pub const SUBJECT_VALUE_NOT_PRESENT: &str = "Subject has no value to compare against";
pub const REGEX_SKIPPED_FOR_EMPTY: &str = "Regular expression not evaluated for an empty value";

/// Kinds of rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Value must be a non-negative amount
    Currency,
    /// Related subject's value must be at least this subject's value
    GreaterThanSubject,
    /// Related subject's value must be at most this subject's value
    LowerThanSubject,
    MaxLength,
    MinLength,
    Min,
    Max,
    IsInteger,
    IsNotNull,
    Range,
    Regex,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Currency => "Currency",
            RuleKind::GreaterThanSubject => "GreaterThanSubject",
            RuleKind::LowerThanSubject => "LowerThanSubject",
            RuleKind::MaxLength => "MaxLength",
            RuleKind::MinLength => "MinLength",
            RuleKind::Min => "Min",
            RuleKind::Max => "Max",
            RuleKind::IsInteger => "IsInteger",
            RuleKind::IsNotNull => "IsNotNull",
            RuleKind::Range => "Range",
            RuleKind::Regex => "Regex",
        }
    }

    /// Cross-field kinds compare against another subject of the same instance.
    pub fn is_cross_field(&self) -> bool {
        matches!(self, RuleKind::GreaterThanSubject | RuleKind::LowerThanSubject)
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter bound to a rule at construction time.
#[derive(Debug, Clone)]
pub enum RuleParameter {
    None,
    Bound(i64),
    Range { min: i64, max: i64 },
    Length(usize),
    Pattern { regex: Regex, skip_when_empty: bool },
    Subject(String),
}

impl PartialEq for RuleParameter {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RuleParameter::None, RuleParameter::None) => true,
            (RuleParameter::Bound(a), RuleParameter::Bound(b)) => a == b,
            (
                RuleParameter::Range { min: a_min, max: a_max },
                RuleParameter::Range { min: b_min, max: b_max },
            ) => a_min == b_min && a_max == b_max,
            (RuleParameter::Length(a), RuleParameter::Length(b)) => a == b,
            (
                RuleParameter::Pattern { regex: a, skip_when_empty: a_skip },
                RuleParameter::Pattern { regex: b, skip_when_empty: b_skip },
            ) => a.as_str() == b.as_str() && a_skip == b_skip,
            (RuleParameter::Subject(a), RuleParameter::Subject(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for RuleParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleParameter::None => Ok(()),
            RuleParameter::Bound(bound) => write!(f, "{}", bound),
            RuleParameter::Range { min, max } => write!(f, "({}, {})", min, max),
            RuleParameter::Length(length) => write!(f, "{}", length),
            RuleParameter::Pattern {
                regex,
                skip_when_empty: true,
            } => write!(f, "{} (optional)", regex.as_str()),
            RuleParameter::Pattern { regex, .. } => f.write_str(regex.as_str()),
            RuleParameter::Subject(name) => f.write_str(name),
        }
    }
}

/// Result of evaluating one rule: whether it passed, plus an optional message.
///
/// A message is always present when `is_valid` is `false`. Passing outcomes
/// may carry an informational note (e.g. nothing to validate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub is_valid: bool,
    pub message: Option<String>,
}

impl RuleOutcome {
    pub fn passed() -> Self {
        Self {
            is_valid: true,
            message: None,
        }
    }

    /// A passing outcome carrying an informational note.
    pub fn noted(note: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            message: Some(note.into()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: Some(message.into()),
        }
    }

    pub fn into_tuple(self) -> (bool, Option<String>) {
        (self.is_valid, self.message)
    }
}

/// A single validator bound to a rule kind and its parameter.
///
/// Rules are immutable once built and cheap to clone; compiled regular
/// expressions are shared between clones.
///
/// # Examples
///
/// ```
/// let rule = Rule::max_length(5);
/// assert!(rule.validate(&RuleValue::from("hello")).unwrap().is_valid);
/// assert!(!rule.validate(&RuleValue::from("hello world")).unwrap().is_valid);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    kind: RuleKind,
    parameter: RuleParameter,
}

impl Rule {
    fn with(kind: RuleKind, parameter: RuleParameter) -> Self {
        Self { kind, parameter }
    }

    pub fn currency() -> Self {
        Self::with(RuleKind::Currency, RuleParameter::None)
    }

    pub fn is_not_null() -> Self {
        Self::with(RuleKind::IsNotNull, RuleParameter::None)
    }

    pub fn is_integer() -> Self {
        Self::with(RuleKind::IsInteger, RuleParameter::None)
    }

    pub fn min(min: i64) -> Self {
        Self::with(RuleKind::Min, RuleParameter::Bound(min))
    }

    pub fn max(max: i64) -> Self {
        Self::with(RuleKind::Max, RuleParameter::Bound(max))
    }

    /// Inclusive integer range.
    pub fn range(min: i64, max: i64) -> Self {
        Self::with(RuleKind::Range, RuleParameter::Range { min, max })
    }

    pub fn min_length(length: usize) -> Self {
        Self::with(RuleKind::MinLength, RuleParameter::Length(length))
    }

    pub fn max_length(length: usize) -> Self {
        Self::with(RuleKind::MaxLength, RuleParameter::Length(length))
    }

    /// Compiles `pattern` into a regex rule.
    ///
    /// When `skip_when_empty` is set, null and empty values pass without the
    /// expression being evaluated.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidPattern`] if the pattern does not compile.
    pub fn regex(pattern: &str, skip_when_empty: bool) -> Result<Self, RuleError> {
        let regex = Regex::new(pattern).map_err(|e| RuleError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::with(
            RuleKind::Regex,
            RuleParameter::Pattern {
                regex,
                skip_when_empty,
            },
        ))
    }

    /// Regex rule using the cached e-mail pattern.
    pub fn email(skip_when_empty: bool) -> Self {
        Self::with(
            RuleKind::Regex,
            RuleParameter::Pattern {
                regex: EMAIL_PATTERN.clone(),
                skip_when_empty,
            },
        )
    }

    /// Regex rule using the cached phone number pattern.
    pub fn phone(skip_when_empty: bool) -> Self {
        Self::with(
            RuleKind::Regex,
            RuleParameter::Pattern {
                regex: PHONE_PATTERN.clone(),
                skip_when_empty,
            },
        )
    }

    /// The named subject's value must be greater than or equal to the value of
    /// the subject declaring this rule.
    pub fn greater_than_subject(subject: impl Into<String>) -> Self {
        Self::with(
            RuleKind::GreaterThanSubject,
            RuleParameter::Subject(subject.into()),
        )
    }

    /// The named subject's value must be lower than or equal to the value of
    /// the subject declaring this rule.
    pub fn lower_than_subject(subject: impl Into<String>) -> Self {
        Self::with(
            RuleKind::LowerThanSubject,
            RuleParameter::Subject(subject.into()),
        )
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    pub fn parameter(&self) -> &RuleParameter {
        &self.parameter
    }

    /// Name of the related subject for cross-field rules.
    pub fn related_subject(&self) -> Option<&str> {
        match &self.parameter {
            RuleParameter::Subject(name) if self.kind.is_cross_field() => Some(name.as_str()),
            _ => None,
        }
    }

    /// Validates `value` against this rule.
    ///
    /// Cross-field rules validated this way have no subject value to compare
    /// against and pass with an informational note; use
    /// [`Rule::validate_against`] to supply one.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::TypeMismatch`] when the value's type cannot be
    /// checked by this rule kind (for example text handed to `Min`, or a
    /// float handed to `Range`).
    pub fn validate(&self, value: &RuleValue) -> Result<RuleOutcome, RuleError> {
        match (&self.kind, &self.parameter) {
            (RuleKind::IsNotNull, _) => Ok(if value.is_null() {
                RuleOutcome::failed("Value must not be null")
            } else {
                RuleOutcome::passed()
            }),
            (RuleKind::IsInteger, _) => Ok(self.validate_integer(value)),
            (RuleKind::Min, RuleParameter::Bound(bound)) => {
                self.validate_min(value, *bound as f64)
            }
            (RuleKind::Max, RuleParameter::Bound(bound)) => {
                self.validate_max(value, *bound as f64)
            }
            (RuleKind::Range, RuleParameter::Range { min, max }) => {
                self.validate_range(value, *min, *max)
            }
            (RuleKind::MinLength, RuleParameter::Length(length)) => {
                self.validate_length(value, *length, |len, bound| len >= bound)
            }
            (RuleKind::MaxLength, RuleParameter::Length(length)) => {
                self.validate_length(value, *length, |len, bound| len <= bound)
            }
            (RuleKind::Currency, _) => self.validate_currency(value),
            (
                RuleKind::Regex,
                RuleParameter::Pattern {
                    regex,
                    skip_when_empty,
                },
            ) => self.validate_pattern(value, regex, *skip_when_empty),
            (RuleKind::GreaterThanSubject | RuleKind::LowerThanSubject, _) => {
                self.validate_against(value, &RuleValue::Null)
            }
            _ => Err(self.mismatch(value)),
        }
    }

    /// Validates a cross-field rule: `related` is the value of the named
    /// subject, `own` the value of the subject declaring the rule.
    ///
    /// `GreaterThanSubject` applies `Min` logic with `own` as the bound, and
    /// `LowerThanSubject` applies `Max` logic. Non cross-field rules ignore
    /// `own` and validate `related` as a plain value.
    pub fn validate_against(
        &self,
        related: &RuleValue,
        own: &RuleValue,
    ) -> Result<RuleOutcome, RuleError> {
        if !self.kind.is_cross_field() {
            return self.validate(related);
        }

        if related.is_null() {
            return Ok(RuleOutcome::noted(RELATED_SUBJECT_NOT_PRESENT));
        }
        if own.is_null() {
            return Ok(RuleOutcome::noted(SUBJECT_VALUE_NOT_PRESENT));
        }

        let bound = own.as_f64().ok_or_else(|| self.mismatch(own))?;
        match self.kind {
            RuleKind::GreaterThanSubject => self.validate_min(related, bound),
            _ => self.validate_max(related, bound),
        }
    }

    fn mismatch(&self, value: &RuleValue) -> RuleError {
        RuleError::TypeMismatch {
            kind: self.kind,
            value_type: value.type_name(),
            value: value.to_string(),
        }
    }

    fn numeric(&self, value: &RuleValue) -> Result<f64, RuleError> {
        value.as_f64().ok_or_else(|| self.mismatch(value))
    }

    fn validate_integer(&self, value: &RuleValue) -> RuleOutcome {
        if value.is_null() {
            return RuleOutcome::noted(NO_VALUE_TO_VALIDATE);
        }

        let text = value.to_string();
        if text.trim().parse::<i64>().is_ok() {
            RuleOutcome::passed()
        } else {
            RuleOutcome::failed(format!("Value '{}' is not an integer", text))
        }
    }

    fn validate_min(&self, value: &RuleValue, bound: f64) -> Result<RuleOutcome, RuleError> {
        if value.is_null() {
            return Ok(RuleOutcome::noted(NO_VALUE_TO_VALIDATE));
        }

        if self.numeric(value)? >= bound {
            Ok(RuleOutcome::passed())
        } else {
            Ok(RuleOutcome::failed(format!(
                "Value {} is lower than the minimum allowed {}",
                value, bound
            )))
        }
    }

    fn validate_max(&self, value: &RuleValue, bound: f64) -> Result<RuleOutcome, RuleError> {
        if value.is_null() {
            return Ok(RuleOutcome::noted(NO_VALUE_TO_VALIDATE));
        }

        if self.numeric(value)? <= bound {
            Ok(RuleOutcome::passed())
        } else {
            Ok(RuleOutcome::failed(format!(
                "Value {} is greater than the maximum allowed {}",
                value, bound
            )))
        }
    }

    fn validate_range(&self, value: &RuleValue, min: i64, max: i64) -> Result<RuleOutcome, RuleError> {
        let RuleValue::Int(number) = value else {
            return Err(self.mismatch(value));
        };

        if (min..=max).contains(number) {
            Ok(RuleOutcome::passed())
        } else {
            Ok(RuleOutcome::failed(format!(
                "Value {} is out of the range [{}, {}]",
                number, min, max
            )))
        }
    }

    fn validate_length(
        &self,
        value: &RuleValue,
        length: usize,
        satisfies: fn(usize, usize) -> bool,
    ) -> Result<RuleOutcome, RuleError> {
        if value.is_null_or_empty() {
            return Ok(RuleOutcome::passed());
        }

        let text = value.as_text().ok_or_else(|| self.mismatch(value))?;
        if satisfies(text.chars().count(), length) {
            return Ok(RuleOutcome::passed());
        }

        let message = match self.kind {
            RuleKind::MinLength => format!(
                "Value '{}' is shorter than the minimum length of {}",
                text, length
            ),
            _ => format!("Value '{}' exceeds the maximum length of {}", text, length),
        };
        Ok(RuleOutcome::failed(message))
    }

    fn validate_currency(&self, value: &RuleValue) -> Result<RuleOutcome, RuleError> {
        if value.is_null() {
            return Ok(RuleOutcome::failed(
                "Value null is not a valid currency amount",
            ));
        }

        if self.numeric(value)? >= 0.0 {
            Ok(RuleOutcome::passed())
        } else {
            Ok(RuleOutcome::failed(format!(
                "Value {} is not a valid currency amount",
                value
            )))
        }
    }

    fn validate_pattern(
        &self,
        value: &RuleValue,
        regex: &Regex,
        skip_when_empty: bool,
    ) -> Result<RuleOutcome, RuleError> {
        if value.is_null_or_empty() {
            return Ok(if skip_when_empty {
                RuleOutcome::noted(REGEX_SKIPPED_FOR_EMPTY)
            } else {
                RuleOutcome::failed(format!(
                    "Empty value does not match pattern '{}'",
                    regex.as_str()
                ))
            });
        }

        let text = value.as_text().ok_or_else(|| self.mismatch(value))?;
        if regex.is_match(text) {
            Ok(RuleOutcome::passed())
        } else {
            Ok(RuleOutcome::failed(format!(
                "Value '{}' does not match pattern '{}'",
                text,
                regex.as_str()
            )))
        }
    }
}
