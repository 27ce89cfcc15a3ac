//! Test fixture generation from registered type metadata.
//!
//! Register the shapes of your domain types once, then ask a [`Fixture`]
//! for populated specimens: primitives get randomized values, containers get
//! a bounded number of elements, structs get recursively populated fields,
//! and interfaces or abstract classes get a synthesized stand-in (or a
//! manufactured concrete instance when no stand-in is possible). Within one
//! creation call, repeated requests for the same type resolve to the same
//! cached instance, which is what makes cyclic object graphs terminate.
//!
//! ```
//! use specimen::{Fixture, TypeInfo, TypeRef, TypeRegistry};
//!
//! let registry = TypeRegistry::builder()
//!     .register(
//!         TypeInfo::struct_type("Contact")
//!             .with_field("name", TypeRef::named("String"))
//!             .with_field("age", TypeRef::named("u8")),
//!     )
//!     .build();
//!
//! let fixture = Fixture::new(registry);
//! let contact = fixture.create("Contact").unwrap();
//! assert!(contact.field("name").is_some());
//! ```

pub mod config;
pub mod context;
pub mod descriptor;
pub mod errors;
pub mod factory;
pub mod fixture;
pub mod registry;
pub mod strategies;
pub mod value;

mod random;

pub use crate::config::Configuration;
pub use crate::context::{CacheStats, Constraint, Context, CustomizationContext};
pub use crate::descriptor::{parse_type_ref, TypeDescriptor, TypeRef};
pub use crate::errors::{Result, SpecimenError};
pub use crate::factory::InstanceFactory;
pub use crate::fixture::Fixture;
pub use crate::registry::{
    builtin, ClassId, ConstructorSpec, FactoryMethodSpec, FieldSpec, MemberSpec, PrimitiveKind,
    TypeInfo, TypeKind, TypeRegistry, TypeRegistryBuilder,
};
pub use crate::strategies::{AbstractTypeStrategy, SpecimenFactory, SpecimenStrategy};
pub use crate::value::{ObjectData, StandIn, Value};
