//! Specimen strategy for interfaces and abstract classes.
//!
//! The value for an abstract type is produced at most once per session.
//! The first request synthesizes a stand-in (or falls back to concrete
//! manufacturing) and installs it in the context; every later request for
//! the same descriptor, including requests made while the first instance is
//! still being populated, returns that same instance. That install-first
//! discipline is what makes self-referential and mutually-recursive object
//! graphs terminate.

use std::rc::Rc;

use tracing::debug;

use crate::context::{Constraint, Context, CustomizationContext};
use crate::descriptor::TypeDescriptor;
use crate::errors::{Result, SpecimenError};
use crate::factory::InstanceFactory;
use crate::strategies::{SpecimenFactory, SpecimenStrategy};
use crate::value::Value;

pub struct AbstractTypeStrategy {
    descriptor: TypeDescriptor,
    context: Rc<Context>,
    factory: InstanceFactory,
}

impl AbstractTypeStrategy {
    /// Eligibility is checked here, not at creation time: the descriptor
    /// must be an interface or abstract class and must not be map-like or
    /// collection-like (containers have their own strategies).
    pub fn new(
        descriptor: TypeDescriptor,
        context: Rc<Context>,
        specimens: SpecimenFactory,
    ) -> Result<Self> {
        if !descriptor.is_abstract() || descriptor.is_map_like() || descriptor.is_collection_like()
        {
            return Err(SpecimenError::invalid_argument(
                "descriptor",
                descriptor.display_name(),
            ));
        }
        Ok(Self {
            descriptor,
            context,
            factory: InstanceFactory::new(specimens),
        })
    }
}

impl SpecimenStrategy for AbstractTypeStrategy {
    fn create(
        &self,
        customization: &CustomizationContext,
        _constraints: &[Constraint],
    ) -> Result<Value> {
        if let Some(existing) = self.context.cached(&self.descriptor) {
            return Ok(existing);
        }

        match self.factory.proxy(&self.descriptor) {
            Ok(shell) => {
                // install before populating: a member of this same type
                // resolves to the shell instead of re-entering synthesis
                let installed = self.context.cache(&self.descriptor, shell);
                self.factory.populate_stand_in(&installed)?;
                Ok(installed)
            }
            Err(SpecimenError::CannotSynthesize { reason, .. }) => {
                debug!(
                    descriptor = %self.descriptor,
                    reason = %reason,
                    "synthesis not possible, manufacturing a concrete instance"
                );
                let manufactured = self.factory.manufacture(&self.descriptor, customization)?;
                Ok(self.context.cache(&self.descriptor, manufactured))
            }
            Err(other) => Err(other),
        }
    }
}
