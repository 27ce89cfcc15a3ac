//! Concrete object population.
//!
//! A struct specimen is an object shell that is cached under its descriptor
//! *before* its fields are populated, so a field (directly or transitively)
//! of the same type resolves to the shell instead of recursing forever.
//! Population depth is bounded by the session configuration; beyond the
//! limit nested objects are left as Null.

use tracing::debug;

use crate::context::{Constraint, CustomizationContext};
use crate::descriptor::TypeDescriptor;
use crate::errors::Result;
use crate::factory::InstanceFactory;
use crate::strategies::{SpecimenFactory, SpecimenStrategy};
use crate::value::Value;

pub struct ObjectStrategy {
    descriptor: TypeDescriptor,
    factory: SpecimenFactory,
}

impl ObjectStrategy {
    pub fn new(descriptor: TypeDescriptor, factory: SpecimenFactory) -> Self {
        Self {
            descriptor,
            factory,
        }
    }
}

impl SpecimenStrategy for ObjectStrategy {
    fn create(
        &self,
        customization: &CustomizationContext,
        _constraints: &[Constraint],
    ) -> Result<Value> {
        let context = self.factory.context().clone();
        if let Some(existing) = context.cached(&self.descriptor) {
            return Ok(existing);
        }

        let info = self.descriptor.class_info();
        if customization.use_constructor()
            && (!info.constructors().is_empty() || !info.factory_methods().is_empty())
        {
            let made =
                InstanceFactory::new(self.factory.clone()).manufacture(&self.descriptor, customization)?;
            return Ok(context.cache(&self.descriptor, made));
        }

        let Some(_guard) = context.descend() else {
            debug!(descriptor = %self.descriptor, "nesting limit reached, leaving Null");
            return Ok(Value::Null);
        };

        // install the shell before populating any field
        let shell = Value::object(self.descriptor.display_name());
        let cached = context.cache(&self.descriptor, shell);

        for field in info.fields() {
            let value = if customization.is_omitted(&field.name) {
                Value::Null
            } else if let Some(overridden) = customization.override_for(&field.name) {
                overridden
            } else {
                let field_descriptor = self.descriptor.resolve_inner(&field.ty)?;
                self.factory
                    .create(&field_descriptor, &CustomizationContext::none(), &[])?
            };
            cached.set_field(&field.name, value);
        }
        Ok(cached)
    }
}
