use chrono::{NaiveDate, NaiveDateTime};
use passforge_core::{
    Candidates, Error, ExpandLimits, FieldSchema, FieldValue, FieldsSchema, SchemaEngine, expand,
};
use serde_json::json;

fn list<'a>(candidates: &'a passforge_core::CandidateSet, name: &str) -> &'a [FieldValue] {
    candidates
        .get(name)
        .and_then(Candidates::as_list)
        .unwrap_or_else(|| panic!("field {name} is not a flat list"))
}

fn date(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 1, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("valid date")
}

#[test]
fn number_range_is_inclusive_and_drops_excludes() {
    let schema = FieldsSchema::new()
        .with_field("plain", FieldSchema::number(18, 65))
        .with_field(
            "age",
            FieldSchema::Number {
                min: Some(18),
                max: Some(65),
                exclude_values: vec![30, 40, 99],
            },
        );

    let candidates = expand(&schema).expect("expand");

    assert_eq!(list(&candidates, "plain").len(), 65 - 18 + 1);
    let age = list(&candidates, "age");
    assert_eq!(age.len(), 65 - 18 + 1 - 2);
    assert!(!age.contains(&FieldValue::Int(30)));
    assert_eq!(age.first(), Some(&FieldValue::Int(18)));
    assert_eq!(age.last(), Some(&FieldValue::Int(65)));
}

#[test]
fn inverted_ranges_expand_to_empty_lists() {
    let schema = FieldsSchema::new()
        .with_field("number", FieldSchema::number(10, 1))
        .with_field(
            "date",
            FieldSchema::Date {
                start: date(10),
                end: date(1),
                exclude_values: Vec::new(),
            },
        );

    let candidates = expand(&schema).expect("inverted ranges are not errors");

    assert!(list(&candidates, "number").is_empty());
    assert!(list(&candidates, "date").is_empty());
}

#[test]
fn unbounded_number_hits_candidate_limit() {
    let schema = FieldsSchema::new().with_field(
        "anything",
        FieldSchema::Number {
            min: None,
            max: None,
            exclude_values: Vec::new(),
        },
    );

    let err = expand(&schema).expect_err("full safe-integer range cannot be enumerated");
    assert!(matches!(err, Error::CandidateLimit { ref path, .. } if path == "anything"));

    let small = SchemaEngine::new(ExpandLimits { max_candidates: 5 });
    let bounded = FieldsSchema::new().with_field("n", FieldSchema::number(1, 5));
    assert!(small.expand(&bounded).is_ok());
    let too_wide = FieldsSchema::new().with_field("n", FieldSchema::number(1, 6));
    assert!(small.expand(&too_wide).is_err());
}

#[test]
fn boolean_expands_true_then_false() {
    let schema = FieldsSchema::new()
        .with_field("both", FieldSchema::boolean())
        .with_field("only_true", FieldSchema::fixed_boolean(true));

    let candidates = expand(&schema).expect("expand");

    assert_eq!(
        list(&candidates, "both"),
        &[FieldValue::Bool(true), FieldValue::Bool(false)]
    );
    assert_eq!(list(&candidates, "only_true"), &[FieldValue::Bool(true)]);
}

#[test]
fn string_defaults_to_empty_and_can_be_excluded() {
    let schema = FieldsSchema::new()
        .with_field(
            "name",
            FieldSchema::String {
                exclude_values: vec!["John".to_string(), "Jane".to_string()],
            },
        )
        .with_field(
            "blank",
            FieldSchema::String {
                exclude_values: vec![String::new()],
            },
        );

    let candidates = expand(&schema).expect("expand");

    assert_eq!(list(&candidates, "name"), &[FieldValue::Text(String::new())]);
    assert!(list(&candidates, "blank").is_empty());
}

#[test]
fn enum_keeps_declared_order() {
    let schema = FieldsSchema::new().with_field(
        "role",
        FieldSchema::Enum {
            values: vec![json!("admin"), json!("manager"), json!("user")],
            exclude_values: vec![json!("user")],
        },
    );

    let candidates = expand(&schema).expect("expand");

    assert_eq!(
        list(&candidates, "role"),
        &[
            FieldValue::Text("admin".to_string()),
            FieldValue::Text("manager".to_string())
        ]
    );
}

#[test]
fn dates_step_daily_and_exclude_exact_instants() {
    let schema = FieldsSchema::new().with_field(
        "joinDate",
        FieldSchema::Date {
            start: date(1),
            end: date(10),
            exclude_values: vec![date(5), date(5) + chrono::TimeDelta::hours(1)],
        },
    );

    let candidates = expand(&schema).expect("expand");
    let dates = list(&candidates, "joinDate");

    assert_eq!(dates.len(), 9);
    assert!(!dates.contains(&FieldValue::Date(date(5))));
    assert_eq!(dates.first(), Some(&FieldValue::Date(date(1))));
    assert_eq!(dates.last(), Some(&FieldValue::Date(date(10))));
}

#[test]
fn custom_values_are_taken_verbatim() {
    let schema = FieldsSchema::new().with_field(
        "customField",
        FieldSchema::custom(vec![json!(100), json!("customValue"), json!(true), json!(100)]),
    );

    let candidates = expand(&schema).expect("expand");

    assert_eq!(
        list(&candidates, "customField"),
        &[
            FieldValue::Int(100),
            FieldValue::Text("customValue".to_string()),
            FieldValue::Bool(true),
            FieldValue::Int(100),
        ]
    );
}

#[test]
fn object_and_array_stay_nested_until_resolved() {
    let contact = FieldsSchema::new()
        .with_field("email", FieldSchema::string())
        .with_field("verified", FieldSchema::boolean());
    let schema = FieldsSchema::new()
        .with_field("contactInfo", FieldSchema::object(contact))
        .with_field("interests", FieldSchema::array(FieldSchema::boolean()));

    let candidates = expand(&schema).expect("expand");

    let nested = candidates
        .get("contactInfo")
        .and_then(Candidates::as_nested)
        .expect("object stays nested");
    assert_eq!(nested.len(), 2);
    let array = candidates
        .get("interests")
        .and_then(Candidates::as_nested)
        .expect("array stays nested");
    assert!(array.get("item").is_some());

    let resolved = candidates
        .resolve(ExpandLimits::default())
        .expect("resolve nested fields");
    let contacts = resolved.get("contactInfo").expect("contact list");
    assert_eq!(contacts.len(), 2);
    assert_eq!(
        contacts[0].to_json(),
        json!({"email": "", "verified": true})
    );
    let interests = resolved.get("interests").expect("interest list");
    assert_eq!(interests[1].to_json(), json!({"item": false}));
}

#[test]
fn one_of_and_all_of_concatenate_sub_expansions() {
    let schema = FieldsSchema::new()
        .with_field(
            "userType",
            FieldSchema::one_of(vec![
                FieldSchema::String {
                    exclude_values: vec!["guest".to_string()],
                },
                FieldSchema::enumeration(vec![json!("user"), json!("admin")]),
            ]),
        )
        .with_field(
            "multipleFields",
            FieldSchema::all_of(vec![
                FieldSchema::string(),
                FieldSchema::enumeration(vec![json!("A"), json!("B"), json!("C")]),
            ]),
        );

    let candidates = expand(&schema).expect("expand");

    assert_eq!(
        list(&candidates, "userType"),
        &[
            FieldValue::Text(String::new()),
            FieldValue::Text("user".to_string()),
            FieldValue::Text("admin".to_string()),
        ]
    );
    assert_eq!(list(&candidates, "multipleFields").len(), 4);
}

#[test]
fn one_of_flattens_nested_members() {
    let schema = FieldsSchema::new().with_field(
        "choice",
        FieldSchema::OneOf {
            schemas: vec![
                FieldSchema::number(1, 2),
                FieldSchema::object(FieldsSchema::new().with_field("flag", FieldSchema::boolean())),
            ],
            exclude_values: vec![json!({"flag": false})],
        },
    );

    let candidates = expand(&schema).expect("expand");
    let values = list(&candidates, "choice");

    assert_eq!(values.len(), 3);
    assert_eq!(values[2].to_json(), json!({"flag": true}));
}

#[test]
fn any_of_is_rejected_explicitly() {
    let nested = FieldsSchema::new().with_field(
        "inner",
        FieldSchema::any_of(vec![FieldSchema::boolean(), FieldSchema::string()]),
    );
    let schema = FieldsSchema::new()
        .with_field("ok", FieldSchema::boolean())
        .with_field("outer", FieldSchema::object(nested));

    let err = expand(&schema).expect_err("anyOf must not be dropped silently");

    match err {
        Error::UnsupportedVariant { variant, path } => {
            assert_eq!(variant, "anyOf");
            assert_eq!(path, "outer.inner");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn expansion_is_referentially_transparent() {
    let schema = FieldsSchema::new()
        .with_field("n", FieldSchema::number(1, 20))
        .with_field("b", FieldSchema::boolean())
        .with_field(
            "o",
            FieldSchema::object(FieldsSchema::new().with_field("s", FieldSchema::string())),
        );

    let first = expand(&schema).expect("first expand");
    let second = expand(&schema).expect("second expand");

    assert_eq!(first, second);
}
