//! Shared domain registry for integration tests

use std::sync::Arc;

use specimen::{ConstructorSpec, FactoryMethodSpec, TypeInfo, TypeRef, TypeRegistry, Value};

/// A small domain with a reference cycle (Contact <-> Address), an enum, an
/// interface with a self-referential member, and an abstract class that can
/// only be manufactured through a factory method.
pub fn domain_registry() -> Arc<TypeRegistry> {
    TypeRegistry::builder()
        .register(TypeInfo::enum_type(
            "Status",
            ["Active", "Suspended", "Closed"],
        ))
        .register(
            TypeInfo::struct_type("Address")
                .with_field("street", TypeRef::named("String"))
                .with_field("city", TypeRef::named("String"))
                .with_field("resident", TypeRef::named("Contact")),
        )
        .register(
            TypeInfo::struct_type("Contact")
                .with_field("name", TypeRef::named("String"))
                .with_field("age", TypeRef::named("u8"))
                .with_field("status", TypeRef::named("Status"))
                .with_field("address", TypeRef::named("Address"))
                .with_field(
                    "nicknames",
                    TypeRef::parameterized("Vec", vec![TypeRef::named("String")]),
                )
                .with_field(
                    "scores",
                    TypeRef::parameterized(
                        "HashMap",
                        vec![TypeRef::named("String"), TypeRef::named("i64")],
                    ),
                )
                .with_field("created", TypeRef::named("DateTime"))
                .with_field("balance", TypeRef::named("Decimal"))
                .with_field("homepage", TypeRef::named("Uri")),
        )
        .register(
            TypeInfo::interface("AuditLog")
                .with_member("entry", TypeRef::named("String"))
                .with_member("previous", TypeRef::named("AuditLog"))
                .with_member("source", TypeRef::named("Contact"))
                .with_default_member("category", TypeRef::named("String"), |_| {
                    Value::Str("audit".into())
                }),
        )
        .register(
            TypeInfo::abstract_class("Ledger")
                .with_constructor(
                    ConstructorSpec::new(vec![], |_| Ok(Value::object("Ledger"))).private(),
                )
                .with_factory_method(FactoryMethodSpec::new("open", vec![], |_| {
                    let ledger = Value::object("Ledger");
                    ledger.set_field("opened", Value::Bool(true));
                    Ok(ledger)
                })),
        )
        .register(
            TypeInfo::abstract_class("Template")
                .with_constructor(ConstructorSpec::new(vec![], |_| Ok(Value::object("Template"))))
                .with_member("render", TypeRef::named("String"))
                .with_default_member("mime_type", TypeRef::named("String"), |_| {
                    Value::Str("text/plain".into())
                }),
        )
        .register(
            TypeInfo::struct_type("Pair")
                .with_generic_params(["A", "B"])
                .with_field("first", TypeRef::param("A"))
                .with_field("second", TypeRef::param("B")),
        )
        .build()
}
