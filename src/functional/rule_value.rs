//! Rule Values
//!
//! Closed set of values a rule can inspect. Property accessors registered on a
//! [`Ruleset`](crate::functional::validation_engine::Ruleset) convert entity
//! fields into a `RuleValue`, so every rule is a total function over this enum.

use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// A dynamically-typed value handed to a rule.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RuleValue {
    /// No value present (an unset optional field).
    #[default]
    Null,
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Text(String),
    Bool(bool),
}

impl RuleValue {
    /// Returns `true` for [`RuleValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, RuleValue::Null)
    }

    /// Returns `true` for `Null` and for an empty text value.
    ///
    /// # Examples
    ///
    /// ```
    /// assert!(RuleValue::Null.is_null_or_empty());
    /// assert!(RuleValue::from("").is_null_or_empty());
    /// assert!(!RuleValue::from(0).is_null_or_empty());
    /// ```
    pub fn is_null_or_empty(&self) -> bool {
        match self {
            RuleValue::Null => true,
            RuleValue::Text(text) => text.is_empty(),
            _ => false,
        }
    }

    /// Numeric view of the value, widening integers and decimals to `f64`.
    ///
    /// Returns `None` for null, text and boolean values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RuleValue::Int(value) => Some(*value as f64),
            RuleValue::Float(value) => Some(*value),
            RuleValue::Decimal(value) => value.to_f64(),
            _ => None,
        }
    }

    /// Text view of the value. Only [`RuleValue::Text`] has one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RuleValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Short name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            RuleValue::Null => "null",
            RuleValue::Int(_) => "integer",
            RuleValue::Float(_) => "float",
            RuleValue::Decimal(_) => "decimal",
            RuleValue::Text(_) => "text",
            RuleValue::Bool(_) => "boolean",
        }
    }
}

impl fmt::Display for RuleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleValue::Null => write!(f, "null"),
            RuleValue::Int(value) => write!(f, "{}", value),
            RuleValue::Float(value) => write!(f, "{}", value),
            RuleValue::Decimal(value) => write!(f, "{}", value),
            RuleValue::Text(value) => write!(f, "{}", value),
            RuleValue::Bool(value) => write!(f, "{}", value),
        }
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for RuleValue {
                fn from(value: $ty) -> Self {
                    RuleValue::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for RuleValue {
    fn from(value: f32) -> Self {
        RuleValue::Float(f64::from(value))
    }
}

impl From<f64> for RuleValue {
    fn from(value: f64) -> Self {
        RuleValue::Float(value)
    }
}

impl From<Decimal> for RuleValue {
    fn from(value: Decimal) -> Self {
        RuleValue::Decimal(value)
    }
}

impl From<bool> for RuleValue {
    fn from(value: bool) -> Self {
        RuleValue::Bool(value)
    }
}

impl From<&str> for RuleValue {
    fn from(value: &str) -> Self {
        RuleValue::Text(value.to_string())
    }
}

impl From<String> for RuleValue {
    fn from(value: String) -> Self {
        RuleValue::Text(value)
    }
}

impl From<&String> for RuleValue {
    fn from(value: &String) -> Self {
        RuleValue::Text(value.clone())
    }
}

impl<T: Into<RuleValue>> From<Option<T>> for RuleValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(RuleValue::Null, Into::into)
    }
}
