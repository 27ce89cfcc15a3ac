mod common;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use specimen::{parse_type_ref, SpecimenError, TypeDescriptor, TypeRef};

fn hash_of(descriptor: &TypeDescriptor) -> u64 {
    let mut hasher = DefaultHasher::new();
    descriptor.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn descriptors_over_domain_types_compare_structurally() {
    let registry = common::domain_registry();

    let a = TypeDescriptor::parse(registry.clone(), "Pair<String, Contact>").unwrap();
    let b = TypeDescriptor::parse(registry.clone(), "Pair<String, Contact>").unwrap();
    let c = TypeDescriptor::parse(registry, "Pair<String, Address>").unwrap();

    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
    assert_ne!(a, c);
}

#[test]
fn descriptor_equality_ignores_the_registry_handle() {
    // Two independently built registries with the same registrations yield
    // equal cache keys for the same type expression.
    let a = TypeDescriptor::parse(common::domain_registry(), "Vec<Contact>").unwrap();
    let b = TypeDescriptor::parse(common::domain_registry(), "Vec<Contact>").unwrap();

    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[test]
fn nested_expressions_parse_and_render() {
    let registry = common::domain_registry();
    for text in [
        "Contact",
        "Vec<Contact>",
        "HashMap<String, Vec<i64>>",
        "[Address]",
        "Pair<Status, [String]>",
        "_: AuditLog",
        "Box<i32>",
    ] {
        let descriptor = TypeDescriptor::parse(registry.clone(), text).unwrap();
        assert_eq!(descriptor.display_name(), text);
    }
}

#[test]
fn unknown_names_inside_nested_arguments_are_rejected() {
    let registry = common::domain_registry();
    assert!(matches!(
        TypeDescriptor::parse(registry, "HashMap<String, Vec<Ghost>>"),
        Err(SpecimenError::UnknownType(name)) if name == "Ghost"
    ));
}

#[test]
fn arity_mismatch_reports_the_offending_raw_type() {
    let registry = common::domain_registry();
    let err = TypeDescriptor::parse(registry, "Pair<String>").unwrap_err();
    assert!(err.to_string().contains("Pair"), "unexpected error: {err}");
}

fn ident() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9]{0,7}"
}

fn type_ref() -> impl Strategy<Value = TypeRef> {
    let leaf = prop_oneof![
        ident().prop_map(TypeRef::named),
        Just(TypeRef::wildcard()),
    ];
    leaf.prop_recursive(3, 24, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(TypeRef::array),
            inner.clone().prop_map(TypeRef::wildcard_with_upper),
            (ident(), prop::collection::vec(inner, 1..4))
                .prop_map(|(raw, args)| TypeRef::parameterized(raw, args)),
        ]
    })
}

proptest! {
    #[test]
    fn rendering_then_parsing_is_lossless(reference in type_ref()) {
        let parsed = parse_type_ref(&reference.to_string()).unwrap();
        prop_assert_eq!(parsed, reference);
    }

    #[test]
    fn equal_references_yield_equal_descriptor_hashes(reference in type_ref()) {
        let mut a = DefaultHasher::new();
        let mut b = DefaultHasher::new();
        reference.hash(&mut a);
        reference.clone().hash(&mut b);
        prop_assert_eq!(a.finish(), b.finish());
    }
}
