#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

// TypeKey tests

#[test]
fn TypeKey___same_type___compares_equal() {
    assert_eq!(TypeKey::of::<String>(), TypeKey::of::<String>());
    assert_ne!(TypeKey::of::<String>(), TypeKey::of::<i32>());
}

#[test]
fn TypeKey___tuple_types___are_tuple_like() {
    assert!(TypeKey::of::<(i32, String)>().is_tuple_like());
    assert!(TypeKey::of::<()>().is_tuple_like());
    assert!(!TypeKey::of::<Vec<i32>>().is_tuple_like());
}

// FieldType tests

#[test]
fn FieldType___optional___keys_on_option_type() {
    let ty = FieldType::optional::<u32>(FieldType::plain::<u32>());

    assert_eq!(ty.key(), TypeKey::of::<Option<u32>>());
    assert!(matches!(ty.shape(), Shape::Optional { .. }));
}

#[test_case(FieldType::list::<i32>(), ContainerKind::List, TypeKey::of::<Vec<i32>>())]
#[test_case(FieldType::sequence::<i32>(), ContainerKind::Sequence, TypeKey::of::<VecDeque<i32>>())]
#[test_case(FieldType::hash_set::<i32>(), ContainerKind::Set, TypeKey::of::<HashSet<i32>>())]
#[test_case(FieldType::btree_set::<i32>(), ContainerKind::Set, TypeKey::of::<BTreeSet<i32>>())]
#[test_case(FieldType::hash_map::<i32>(), ContainerKind::Map, TypeKey::of::<HashMap<String, i32>>())]
#[test_case(FieldType::btree_map::<i32>(), ContainerKind::Map, TypeKey::of::<BTreeMap<String, i32>>())]
fn FieldType___container___records_kind_key_and_element(
    ty: FieldType,
    kind: ContainerKind,
    key: TypeKey,
) {
    assert_eq!(ty.container_kind(), Some(kind));
    assert_eq!(ty.key(), key);
    assert_eq!(ty.element().map(FieldType::key), Some(TypeKey::of::<i32>()));
}

#[test]
fn FieldType___boxed___keys_on_box_type() {
    let ty = FieldType::boxed::<u32>(FieldType::plain::<u32>());

    assert_eq!(ty.key(), TypeKey::of::<Box<u32>>());
    let Shape::Boxed { inner, .. } = ty.shape() else {
        panic!("expected boxed shape");
    };
    assert_eq!(inner.key(), TypeKey::of::<u32>());
}

#[test]
fn FieldType___with_element___replaces_container_element() {
    let ty = FieldType::list::<Box<u32>>()
        .with_element(FieldType::boxed::<u32>(FieldType::plain::<u32>()));

    let element = ty.element().unwrap();
    assert_eq!(element.key(), TypeKey::of::<Box<u32>>());
    assert!(matches!(element.shape(), Shape::Boxed { .. }));
}

#[test]
fn FieldType___with_element_on_plain___unchanged() {
    let ty = FieldType::plain::<u32>().with_element(FieldType::plain::<u32>());

    assert!(matches!(ty.shape(), Shape::Plain));
}

#[test]
fn FieldType___plain___has_no_element() {
    let ty = FieldType::plain::<String>();

    assert!(ty.element().is_none());
    assert!(ty.container_kind().is_none());
}

// Adapter tests

#[test]
fn OptionAdapter___wrap_some___builds_option() {
    let adapter = OptionAdapter::of::<i32>();

    let wrapped = adapter.wrap(Some(Box::new(7i32))).unwrap();

    assert_eq!(wrapped.downcast_ref::<Option<i32>>(), Some(&Some(7)));
}

#[test]
fn OptionAdapter___wrap_none___builds_empty_option() {
    let adapter = OptionAdapter::of::<i32>();

    let wrapped = adapter.wrap(None).unwrap();

    assert_eq!(wrapped.downcast_ref::<Option<i32>>(), Some(&None));
}

#[test]
fn OptionAdapter___wrap_wrong_type___reports_mismatch() {
    let adapter = OptionAdapter::of::<i32>();

    let result = adapter.wrap(Some(Box::new("text")));

    assert!(matches!(result, Err(ReadError::ArgumentMismatch(_))));
}

#[test]
fn OptionAdapter___unwrap___borrows_inner_value() {
    let adapter = OptionAdapter::of::<String>();
    let value: Option<String> = Some("x".into());

    let inner = adapter.unwrap(&value).unwrap().unwrap();

    assert_eq!(inner.downcast_ref::<String>().map(String::as_str), Some("x"));
}

#[test]
fn OptionAdapter___unwrap_foreign_type___returns_none() {
    let adapter = OptionAdapter::of::<String>();

    assert!(adapter.unwrap(&5u8).is_none());
}

#[test]
fn ContainerAdapter___list_collect___preserves_order() {
    let ty = FieldType::list::<i32>();
    let Shape::Container { adapter, .. } = ty.shape() else {
        panic!("list is a container");
    };

    let items: Vec<AnyValue> = vec![Box::new(3i32), Box::new(1i32), Box::new(2i32)];
    let collected = adapter.collect(Collected::Items(items)).unwrap();

    assert_eq!(collected.downcast_ref::<Vec<i32>>(), Some(&vec![3, 1, 2]));
}

#[test]
fn ContainerAdapter___map_members___exposes_keys() {
    let ty = FieldType::btree_map::<i32>();
    let Shape::Container { adapter, .. } = ty.shape() else {
        panic!("map is a container");
    };
    let value: BTreeMap<String, i32> = [("a".to_string(), 1), ("b".to_string(), 2)].into();

    let Some(Members::Entries(entries)) = adapter.members(&value) else {
        panic!("map exposes entries");
    };

    let keys: Vec<&str> = entries.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec!["a", "b"]);
    assert_eq!(entries[1].1.downcast_ref::<i32>(), Some(&2));
}

#[test]
fn ContainerAdapter___collect_items_into_map___reports_mismatch() {
    let ty = FieldType::hash_map::<i32>();
    let Shape::Container { adapter, .. } = ty.shape() else {
        panic!("map is a container");
    };

    let result = adapter.collect(Collected::Items(vec![]));

    assert!(matches!(result, Err(ReadError::ArgumentMismatch(_))));
}

#[test]
fn BoxAdapter___wrap___boxes_decoded_value() {
    let adapter = BoxAdapter::of::<i32>();

    let boxed = adapter.wrap(Box::new(7i32)).unwrap();

    assert_eq!(*boxed.downcast::<Box<i32>>().unwrap(), Box::new(7));
}

#[test]
fn BoxAdapter___wrap_foreign___argument_mismatch() {
    let adapter = BoxAdapter::of::<i32>();

    let err = adapter.wrap(Box::new("seven")).unwrap_err();

    assert!(matches!(err, ReadError::ArgumentMismatch(_)));
}

#[test]
fn BoxAdapter___unwrap___borrows_contents() {
    let adapter = BoxAdapter::of::<String>();
    let value: Box<String> = Box::new("inside".to_string());

    let inner = adapter.unwrap(&value).unwrap();

    assert_eq!(inner.downcast_ref::<String>().map(String::as_str), Some("inside"));
    assert!(adapter.unwrap(&"inside".to_string()).is_none());
}
