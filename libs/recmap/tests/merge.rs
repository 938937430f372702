use std::collections::HashSet;

use recmap::{ConvertError, ConvertOptions, Converter, FailurePolicy, Record};

#[derive(Debug, Clone, Default, PartialEq, Record)]
struct Person {
    name: Option<String>,
    age: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Record)]
struct PersonDto {
    name: Option<String>,
    email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Record)]
struct Audit {
    updated_by: Option<String>,
    revision: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Record)]
struct Account {
    #[record(parent)]
    audit: Audit,
    owner: Option<String>,
    #[record(read_only)]
    balance: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Record)]
struct AgeAsText {
    age: String,
}

#[derive(Debug, Clone, Default, PartialEq, Record)]
struct Profile {
    name: Option<String>,
    age: String,
}

#[derive(Debug, Clone, Default, PartialEq, Record)]
struct Badge {
    name: String,
    age: Option<i32>,
}

#[test]
fn null_source_fields_keep_target_values() {
    let source = Person {
        name: Some("A".into()),
        age: None,
    };
    let mut target = Person {
        name: Some("B".into()),
        age: Some(30),
    };
    let copied = recmap::merge_non_null(&source, &mut target).unwrap();
    assert_eq!(copied, 1);
    assert_eq!(
        target,
        Person {
            name: Some("A".into()),
            age: Some(30)
        }
    );
    // Source is only read.
    assert_eq!(source.age, None);
}

#[test]
fn all_null_source_changes_nothing() {
    let mut target = Person {
        name: Some("B".into()),
        age: Some(30),
    };
    let before = target.clone();
    recmap::merge_non_null(&Person::default(), &mut target).unwrap();
    assert_eq!(target, before);
}

#[test]
fn null_names_cover_inherited_fields() {
    let account = Account {
        audit: Audit {
            updated_by: None,
            revision: 4,
        },
        owner: Some("kim".into()),
        balance: 10,
    };
    let names = Converter::default().null_property_names(&account).unwrap();
    assert_eq!(names, HashSet::from(["updatedBy"]));
}

#[test]
fn merge_walks_the_ancestor_chain() {
    let source = Account {
        audit: Audit {
            updated_by: None,
            revision: 5,
        },
        owner: Some("lee".into()),
        balance: 999,
    };
    let mut target = Account {
        audit: Audit {
            updated_by: Some("ops".into()),
            revision: 4,
        },
        owner: Some("kim".into()),
        balance: 10,
    };
    recmap::merge_non_null(&source, &mut target).unwrap();
    assert_eq!(target.audit.updated_by.as_deref(), Some("ops"));
    assert_eq!(target.audit.revision, 5);
    assert_eq!(target.owner.as_deref(), Some("lee"));
    // read_only: no write accessor on the target.
    assert_eq!(target.balance, 10);
}

#[test]
fn copy_between_types_matches_by_name() {
    let source = Person {
        name: Some("A".into()),
        age: Some(41),
    };
    let mut target = PersonDto {
        name: None,
        email: "a@example.com".into(),
    };
    let copied = recmap::copy_properties(&source, &mut target, &HashSet::new()).unwrap();
    assert_eq!(copied, 1);
    assert_eq!(target.name.as_deref(), Some("A"));
    assert_eq!(target.email, "a@example.com");
}

#[test]
fn copy_honors_ignore_set() {
    let source = Person {
        name: Some("A".into()),
        age: Some(41),
    };
    let mut target = Person::default();
    let copied = recmap::copy_properties(&source, &mut target, &HashSet::from(["age"])).unwrap();
    assert_eq!(copied, 1);
    assert_eq!(target.age, None);
}

#[test]
fn copy_null_overwrites_when_not_ignored() {
    let source = Person {
        name: None,
        age: Some(1),
    };
    let mut target = Person {
        name: Some("B".into()),
        age: None,
    };
    recmap::copy_properties(&source, &mut target, &HashSet::new()).unwrap();
    assert_eq!(target, source);
}

#[test]
fn mismatched_field_types_fail_copy() {
    let source = Person {
        name: None,
        age: Some(41),
    };
    let mut target = AgeAsText::default();
    let err = recmap::copy_properties(&source, &mut target, &HashSet::new()).unwrap_err();
    assert!(matches!(err, ConvertError::Coerce { ref field, .. } if field == "age"));
}

#[test]
fn mismatched_field_types_are_skipped_under_best_effort() {
    let converter = Converter::new(ConvertOptions {
        failure_policy: FailurePolicy::BestEffort,
        ..ConvertOptions::default()
    });
    let source = Person {
        name: Some("A".into()),
        age: Some(41),
    };
    let mut target = AgeAsText::default();
    let converted = converter.merge_non_null(&source, &mut target).unwrap();
    assert_eq!(converted.value, 0);
    assert_eq!(converted.errors.len(), 1);
    assert_eq!(target.age, "");
}

#[test]
fn strict_failure_leaves_target_untouched() {
    let source = Person {
        name: Some("A".into()),
        age: Some(41),
    };
    let mut target = Profile {
        name: Some("B".into()),
        age: "x".into(),
    };
    let before = target.clone();
    let err = recmap::merge_non_null(&source, &mut target).unwrap_err();
    assert!(matches!(err, ConvertError::Coerce { ref field, .. } if field == "age"));
    assert_eq!(target, before);
}

#[test]
fn null_into_non_nullable_target_is_rejected_before_writing() {
    let source = Person {
        name: None,
        age: Some(7),
    };
    let mut target = Badge {
        name: "kept".into(),
        age: None,
    };
    let before = target.clone();
    let err = recmap::copy_properties(&source, &mut target, &HashSet::new()).unwrap_err();
    assert!(matches!(err, ConvertError::Coerce { ref field, .. } if field == "name"));
    assert_eq!(target, before);
}
