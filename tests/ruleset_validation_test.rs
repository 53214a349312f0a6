//! Ruleset behaviour observed through the public API.

use layerkit::functional::prelude::*;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
struct Contact {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    age: Option<i32>,
    balance: Decimal,
    since_year: i32,
    until_year: Option<i32>,
}

fn contact() -> Contact {
    Contact {
        first_name: Some("Grace".to_string()),
        last_name: Some("Hopper".to_string()),
        email: Some("grace@navy.mil".to_string()),
        phone: None,
        age: Some(85),
        balance: Decimal::new(1050, 2),
        since_year: 1944,
        until_year: Some(1986),
    }
}

fn contact_rules() -> RulesetBuilder<Contact> {
    Ruleset::builder()
        .property("FirstName", |c: &Contact| c.first_name.clone())
        .property("LastName", |c: &Contact| c.last_name.clone())
        .property("Email", |c: &Contact| c.email.clone())
        .property("Phone", |c: &Contact| c.phone.clone())
        .property("Age", |c: &Contact| c.age)
        .property("Balance", |c: &Contact| c.balance)
        .property("SinceYear", |c: &Contact| c.since_year)
        .property("UntilYear", |c: &Contact| c.until_year)
        .subject(RulesetSubject::new(
            "FirstName",
            vec![Rule::is_not_null(), Rule::min_length(2), Rule::max_length(40)],
        ))
        .subject(RulesetSubject::new("LastName", vec![Rule::is_not_null()]))
        .subject(RulesetSubject::new("Email", vec![Rule::email(false)]))
        .subject(RulesetSubject::new("Phone", vec![Rule::phone(true)]))
        .subject(RulesetSubject::new("Age", vec![Rule::min(0), Rule::max(130)]))
        .subject(RulesetSubject::new("Balance", vec![Rule::currency()]))
        .subject(RulesetSubject::new(
            "SinceYear",
            vec![Rule::range(1900, 2100), Rule::greater_than_subject("UntilYear")],
        ))
}

#[test]
fn test_valid_contact_passes_every_subject() {
    let ruleset = contact_rules().build().unwrap();
    let sink = CollectingSink::new();

    let outcome = ruleset.validate(&contact(), &sink).unwrap();
    assert!(outcome.result);
    assert_eq!(outcome.subjects.len(), ruleset.subjects().len());
    assert!(sink.is_empty());
}

#[test]
fn test_two_null_subjects_report_only_the_first() {
    let ruleset = Ruleset::builder()
        .property("A", |c: &Contact| c.first_name.clone())
        .property("B", |c: &Contact| c.last_name.clone())
        .subject(RulesetSubject::new("A", vec![Rule::is_not_null()]))
        .subject(RulesetSubject::new("B", vec![Rule::is_not_null()]))
        .build()
        .unwrap();
    let instance = Contact {
        first_name: None,
        last_name: None,
        ..contact()
    };
    let sink = CollectingSink::new();

    let outcome = ruleset.validate(&instance, &sink).unwrap();
    assert!(!outcome.result);
    assert_eq!(outcome.subjects.len(), 1);
    assert_eq!(outcome.subjects[0].name, "A");
    assert_eq!(sink.messages(), vec!["Value must not be null".to_string()]);
}

#[test]
fn test_unmatched_subject_is_absent_and_harmless() {
    let ruleset = contact_rules()
        .subject(RulesetSubject::new("MiddleName", vec![Rule::is_not_null()]))
        .build()
        .unwrap();

    let outcome = ruleset.validate(&contact(), &CollectingSink::new()).unwrap();
    assert!(outcome.result);
    assert!(outcome.subjects.len() < ruleset.subjects().len());
    assert!(outcome.subjects.iter().all(|s| s.name != "MiddleName"));
}

#[test]
fn test_validation_is_idempotent() {
    let ruleset = contact_rules().build().unwrap();
    let instance = Contact {
        age: Some(200),
        ..contact()
    };

    let first = ruleset.validate(&instance, &CollectingSink::new()).unwrap();
    let second = ruleset.validate(&instance, &CollectingSink::new()).unwrap();
    assert_eq!(first, second);
    assert!(!first.result);
}

#[test]
fn test_subject_invariants_hold_across_values() {
    let subject = RulesetSubject::new(
        "Age",
        vec![Rule::is_not_null(), Rule::is_integer(), Rule::min(18), Rule::max(65)],
    );

    for value in [
        RuleValue::Null,
        RuleValue::from(10),
        RuleValue::from(30),
        RuleValue::from(99),
        RuleValue::from(42.5),
    ] {
        let outcome = subject.validate(&value, None).unwrap();
        assert!(outcome.invalid_rules.len() <= 1, "value {value}");
        assert!(outcome.valid_rules.len() + outcome.invalid_rules.len() <= subject.rules().len());
    }
}

#[test]
fn test_min_max_on_null_pass_with_note() {
    for rule in [Rule::min(1), Rule::max(1)] {
        let outcome = rule.validate(&RuleValue::Null).unwrap();
        assert!(outcome.is_valid);
        assert!(outcome.message.is_some());
    }
}

#[test]
fn test_reference_rule_outcomes() {
    let max_length = Rule::max_length(5);
    assert_eq!(
        max_length.validate(&"hello".into()).unwrap(),
        RuleOutcome::passed()
    );
    let failed = max_length.validate(&"hello world".into()).unwrap();
    assert!(!failed.is_valid);
    let message = failed.message.unwrap();
    assert!(message.contains("hello world"));
    assert!(message.contains('5'));

    let range = Rule::range(1, 10);
    assert_eq!(range.validate(&5.into()).unwrap(), RuleOutcome::passed());
    assert!(!range.validate(&15.into()).unwrap().is_valid);

    let digits = Rule::regex("^[0-9]+$", true).unwrap();
    let skipped = digits.validate(&"".into()).unwrap();
    assert!(skipped.is_valid);
    assert!(skipped.message.is_some());
    assert!(!digits.validate(&"abc".into()).unwrap().is_valid);
    assert_eq!(digits.validate(&"123".into()).unwrap(), RuleOutcome::passed());
}

#[test]
fn test_cross_field_rule_uses_own_value_as_bound() {
    let ruleset = contact_rules().build().unwrap();

    let reversed = Contact {
        since_year: 1990,
        until_year: Some(1986),
        ..contact()
    };
    let sink = CollectingSink::new();
    let outcome = ruleset.validate(&reversed, &sink).unwrap();
    assert!(!outcome.result);
    let failure = outcome.first_failure().unwrap();
    assert_eq!(failure.name, "SinceYear");
    assert_eq!(failure.invalid_rules[0].rule.kind(), RuleKind::GreaterThanSubject);
    assert_eq!(sink.len(), 1);
}

#[test]
fn test_exhaustive_configuration_collects_all_failures() {
    let ruleset = contact_rules()
        .config(ValidationConfig::exhaustive())
        .build()
        .unwrap();
    let broken = Contact {
        last_name: None,
        email: Some("not-an-email".to_string()),
        balance: Decimal::new(-1, 0),
        ..contact()
    };

    let outcome = ruleset.validate(&broken, &CollectingSink::new()).unwrap();
    let failing: Vec<&str> = outcome
        .subjects
        .iter()
        .filter(|s| !s.is_valid)
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(failing, vec!["LastName", "Email", "Balance"]);
    assert_eq!(outcome.subjects.len(), ruleset.subjects().len());
}

#[test]
fn test_build_rejects_unknown_related_subject() {
    let err = Ruleset::<Contact>::builder()
        .property("SinceYear", |c: &Contact| c.since_year)
        .subject(RulesetSubject::new(
            "SinceYear",
            vec![Rule::lower_than_subject("RetiredYear")],
        ))
        .build()
        .unwrap_err();
    assert!(matches!(err, RuleError::UnknownRelatedSubject { .. }));
    assert!(err.to_string().contains("RetiredYear"));
}

#[test]
fn test_describe_lists_subjects_in_order() {
    let ruleset = contact_rules().build().unwrap();
    let described = ruleset.describe();

    assert_eq!(described[0].name, "FirstName");
    assert_eq!(described[0].rules[1].rule, ("MinLength".to_string(), "2".to_string()));
    let json = serde_json::to_string(&described).unwrap();
    assert!(json.contains("\"GreaterThanSubject\",\"UntilYear\""));
}

#[test]
fn test_closure_sink_receives_messages() {
    let ruleset = contact_rules().build().unwrap();
    let seen = std::sync::Mutex::new(Vec::new());
    let sink = |message: &str| seen.lock().unwrap().push(message.to_string());

    let instance = Contact {
        first_name: Some("G".to_string()),
        ..contact()
    };
    assert!(!ruleset.is_valid(&instance, &sink).unwrap());
    assert_eq!(seen.lock().unwrap().len(), 1);
}
