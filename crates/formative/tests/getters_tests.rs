//! Integration tests for `#[getters]` and writers derived from accessors
//!
//! Types here have private fields and expose them only through methods, so
//! the getter path is the only way to derive a writer for them.

use formative::prelude::*;
use formative::{derive, writer_from_getters};
use serde_json::json;

pub struct Account {
    owner: String,
    cents: i64,
    tags: Vec<String>,
    closed_on: Option<String>,
    audit: Vec<String>,
}

#[getters]
impl Account {
    pub fn new(owner: &str, cents: i64) -> Self {
        Self {
            owner: owner.to_string(),
            cents,
            tags: Vec::new(),
            closed_on: None,
            audit: vec!["opened".to_string()],
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[getter(rename = "balance")]
    pub fn cents(&self) -> i64 {
        self.cents
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn closed_on(&self) -> &Option<String> {
        &self.closed_on
    }

    #[getter(skip)]
    pub fn audit(&self) -> &[String] {
        &self.audit
    }

    pub fn deposit(&mut self, cents: i64) {
        self.cents += cents;
    }

    pub fn is_overdrawn(&self, limit: i64) -> bool {
        self.cents < -limit
    }
}

pub struct Profile {
    display_name: String,
    login_count: u32,
}

#[getters(rename_all = "camelCase")]
impl Profile {
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn login_count(&self) -> u32 {
        self.login_count
    }
}

pub struct Member {
    profile: Profile,
    rank: u8,
}

#[getters]
impl Member {
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }
}

pub struct Opaque {
    payload: u64,
}

#[getters]
impl Opaque {
    #[allow(dead_code)]
    fn payload(&self) -> u64 {
        self.payload
    }

    pub fn scaled(&self, factor: u64) -> u64 {
        self.payload * factor
    }
}

#[test]
fn test_getters_writer_uses_public_accessors() {
    let writer = derive::writer_from_getters::<Account>(&CodecRegistry::with_defaults())
        .expect("derive Account writer");
    let mut account = Account::new("ann", 1_200);
    account.tags.push("vip".to_string());
    account.deposit(300);

    let tree = writer.write(&account);

    assert_eq!(
        tree,
        json!({"owner": "ann", "balance": 1_500, "tags": ["vip"]})
    );
}

#[test]
fn test_getters_writer_includes_present_optional() {
    let writer = derive::writer_from_getters::<Account>(&CodecRegistry::with_defaults())
        .expect("derive Account writer");
    let mut account = Account::new("bo", 0);
    account.closed_on = Some("2024-01-01".to_string());

    let tree = writer.write(&account);

    assert_eq!(tree["closed_on"], json!("2024-01-01"));
    assert!(tree.get("audit").is_none());
}

#[test]
fn test_getters_field_order_follows_methods() {
    let writer = derive::writer_from_getters::<Account>(&CodecRegistry::with_defaults())
        .expect("derive Account writer");

    assert_eq!(
        writer.codec().field_names(),
        vec!["owner", "balance", "tags", "closed_on"]
    );
}

#[test]
fn test_getters_rename_all_applied() {
    let writer = derive::writer_from_getters::<Profile>(&CodecRegistry::with_defaults())
        .expect("derive Profile writer");

    let text = writer.write_string(&Profile {
        display_name: "Ann".to_string(),
        login_count: 4,
    });

    assert_eq!(text, r#"{"displayName":"Ann","loginCount":4}"#);
}

#[test]
fn test_getters_nested_writer_from_registry() {
    let registry = CodecRegistry::with_defaults();
    assert!(matches!(
        derive::writer_from_getters::<Member>(&registry),
        Err(DeriveError::MissingCodecs { .. })
    ));

    let profile = derive::writer_from_getters::<Profile>(&registry).expect("derive Profile writer");
    registry.register_writer::<Profile, _>(profile);
    let member = derive::writer_from_getters::<Member>(&registry).expect("derive Member writer");

    let tree = member.write(&Member {
        profile: Profile {
            display_name: "Cy".to_string(),
            login_count: 1,
        },
        rank: 2,
    });

    assert_eq!(
        tree,
        json!({"profile": {"displayName": "Cy", "loginCount": 1}, "rank": 2})
    );
}

#[test]
fn test_getters_without_accessors_rejected() {
    let err = derive::writer_from_getters::<Opaque>(&CodecRegistry::with_defaults()).unwrap_err();

    assert!(matches!(err, DeriveError::NoAccessors { .. }));
    assert_eq!(Opaque { payload: 2 }.scaled(3), 6);
}

#[test]
fn test_getters_global_entry_point() {
    let writer = writer_from_getters::<Account>().expect("derive Account writer");

    assert_eq!(writer.write(&Account::new("dee", 5))["owner"], json!("dee"));
}
