use quarry::validator::{
    Alpha, AlphaNumeric, Between, Callback, CharFilter, Digit, Form, InList, Length, Rule,
    RuleKind, Validator,
};
use quarry::{Record, Value};

#[test]
fn filter_rule_contract() {
    let rule = AlphaNumeric::new("_-");
    // non-scalar input is rejected outright
    assert!(!rule.validate(&Value::Null));
    assert!(!rule.validate(&Value::from(vec!["a"])));
    // input that is empty after filtering passes
    assert!(rule.validate(&Value::from("__--")));
    assert!(rule.validate(&Value::from("user_name-1")));
    assert!(!rule.validate(&Value::from("user.name")));
}

#[test]
fn additional_chars_must_be_text() {
    let err = Digit::from_value(&Value::from(1)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Configuration error: Invalid list of additional characters to be loaded"
    );
    assert_eq!(CharFilter::new(" ,").filter("1, 2, 3"), "123");
}

#[test]
fn chain_and_form() {
    let status = Validator::new()
        .required()
        .rule(InList::new(["active", "pending"]));
    assert!(status.validate(&Value::from("active")));
    assert_eq!(
        status.messages(&Value::from("gone")),
        vec!["must be in list (active, pending)".to_string()]
    );

    let form = Form::new()
        .field("name", Validator::new().rule(Alpha::new(" ")).rule(Length::between(2, 10).unwrap()))
        .field("age", Validator::new().rule(Between::new(0.0, 150.0).unwrap()))
        .field(
            "code",
            Validator::new().rule_with_message(
                Callback::new("must start with Q", |v: &Value| {
                    v.as_str().is_some_and(|s| s.starts_with('Q'))
                }),
                "bad code",
            ),
        );

    let record = Record::from_pairs([
        ("name", Value::from("Ann Lee")),
        ("age", Value::from(200)),
        ("code", Value::from("X1")),
    ]);
    let errors = form.validate(&record).unwrap_err();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors.fields(), vec!["age", "code"]);
    assert_eq!(errors.messages("code"), vec!["bad code"]);
    assert!(errors.has("code", RuleKind::Callback));

    let json = serde_json::to_value(&errors).unwrap();
    assert_eq!(json["age"][0]["rule"], "between");
    assert_eq!(json["code"][0]["message"], "bad code");
}

#[cfg(feature = "validate")]
#[test]
fn text_rules() {
    use quarry::validator::{Email, Pattern, Url};

    let email = Validator::new().rule(Email);
    assert!(email.validate(&Value::Null));
    assert!(!email.validate(&Value::from("nope")));
    assert!(Validator::new().rule(Url).validate(&Value::from("https://example.com")));
    assert!(Pattern::new("[").is_err());
}
