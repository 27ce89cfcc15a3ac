mod common;

use std::rc::Rc;

use pretty_assertions::assert_eq;
use specimen::{
    AbstractTypeStrategy, Configuration, Context, CustomizationContext, SpecimenError,
    SpecimenFactory, SpecimenStrategy, TypeDescriptor, Value,
};

fn session() -> SpecimenFactory {
    let context = Rc::new(Context::with_seed(Configuration::default(), 7));
    SpecimenFactory::new(common::domain_registry(), context)
}

fn strategy(specimens: &SpecimenFactory, name: &str) -> AbstractTypeStrategy {
    let descriptor = TypeDescriptor::from_class(specimens.registry().clone(), name).unwrap();
    AbstractTypeStrategy::new(descriptor, specimens.context().clone(), specimens.clone()).unwrap()
}

fn create(specimens: &SpecimenFactory, name: &str) -> Value {
    strategy(specimens, name)
        .create(&CustomizationContext::none(), &[])
        .unwrap()
}

#[test]
fn map_types_are_rejected_by_name() {
    let specimens = session();
    let descriptor =
        TypeDescriptor::parse(specimens.registry().clone(), "HashMap<String, i64>").unwrap();

    match AbstractTypeStrategy::new(descriptor, specimens.context().clone(), specimens) {
        Err(SpecimenError::InvalidArgument { argument, value }) => {
            assert_eq!(argument, "descriptor");
            assert_eq!(value, "HashMap<String, i64>");
        }
        _ => panic!("map types must not be eligible"),
    }
}

#[test]
fn concrete_structs_are_rejected() {
    let specimens = session();
    let descriptor = TypeDescriptor::from_class(specimens.registry().clone(), "Contact").unwrap();
    assert!(
        AbstractTypeStrategy::new(descriptor, specimens.context().clone(), specimens).is_err()
    );
}

#[test]
fn interfaces_become_stand_ins_with_populated_members() {
    let specimens = session();
    let log = create(&specimens, "AuditLog");

    assert!(matches!(log, Value::StandIn(_)));
    let entry = log.invoke("entry").unwrap();
    assert!(!entry.as_str().unwrap().trim().is_empty());
}

#[test]
fn default_members_run_registered_logic() {
    let specimens = session();
    let log = create(&specimens, "AuditLog");
    assert_eq!(log.invoke("category").unwrap().as_str(), Some("audit"));
}

#[test]
fn self_referential_member_returns_the_instance_itself() {
    let specimens = session();
    let log = create(&specimens, "AuditLog");
    let previous = log.invoke("previous").unwrap();
    assert!(log.same_instance(&previous));
}

#[test]
fn stand_in_members_share_the_session_cache() {
    // the Contact reached through the stand-in is the session's Contact
    let specimens = session();
    let log = create(&specimens, "AuditLog");
    let source = log.invoke("source").unwrap();

    let descriptor = TypeDescriptor::from_class(specimens.registry().clone(), "Contact").unwrap();
    let contact = specimens
        .create(&descriptor, &CustomizationContext::none(), &[])
        .unwrap();
    assert!(source.same_instance(&contact));
}

#[test]
fn two_strategies_for_one_type_share_one_instance() {
    let specimens = session();
    let first = create(&specimens, "AuditLog");
    let second = create(&specimens, "AuditLog");
    assert!(first.same_instance(&second));
}

#[test]
fn abstract_class_with_accessible_constructor_is_synthesized() {
    let specimens = session();
    let template = create(&specimens, "Template");

    assert!(matches!(template, Value::StandIn(_)));
    assert!(!template
        .invoke("render")
        .unwrap()
        .as_str()
        .unwrap()
        .is_empty());
    assert_eq!(
        template.invoke("mime_type").unwrap().as_str(),
        Some("text/plain")
    );
}

#[test]
fn inaccessible_constructors_trigger_the_factory_method_fallback() {
    let specimens = session();
    let ledger = create(&specimens, "Ledger");

    assert!(matches!(ledger, Value::Object(_)));
    assert!(matches!(ledger.field("opened"), Some(Value::Bool(true))));

    // the fallback result is cached like a synthesized one
    let again = create(&specimens, "Ledger");
    assert!(ledger.same_instance(&again));
}
