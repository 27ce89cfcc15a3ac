//! Per-shape generation strategies and their dispatch.
//!
//! Every descriptor shape is served by one strategy behind the
//! [`SpecimenStrategy`] trait; [`SpecimenFactory::strategy_for`] picks it
//! from the descriptor's predicate family. Strategies are cheap, per-request
//! objects: they borrow the session context and recurse through the factory
//! for any nested values they need.

use std::rc::Rc;
use std::sync::Arc;

use tracing::trace;

use crate::context::{Constraint, Context, CustomizationContext};
use crate::descriptor::TypeDescriptor;
use crate::errors::Result;
use crate::registry::{TypeKind, TypeRegistry};
use crate::value::Value;

pub mod abstract_type;
pub mod collection;
pub mod enum_type;
pub mod map;
pub mod object;
pub mod primitive;
pub mod special;
pub mod time;

pub use abstract_type::AbstractTypeStrategy;

/// One way of producing a value for one descriptor
pub trait SpecimenStrategy {
    fn create(
        &self,
        customization: &CustomizationContext,
        constraints: &[Constraint],
    ) -> Result<Value>;
}

/// Chooses and runs strategies for one generation session
#[derive(Clone)]
pub struct SpecimenFactory {
    registry: Arc<TypeRegistry>,
    context: Rc<Context>,
}

impl SpecimenFactory {
    pub fn new(registry: Arc<TypeRegistry>, context: Rc<Context>) -> Self {
        Self { registry, context }
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    pub fn context(&self) -> &Rc<Context> {
        &self.context
    }

    /// Pick the strategy serving this descriptor's shape.
    ///
    /// Collection-like and map-like types win over abstractness: an abstract
    /// container is still a container and is served by the container
    /// strategies, never by [`AbstractTypeStrategy`].
    pub fn strategy_for(&self, descriptor: &TypeDescriptor) -> Result<Box<dyn SpecimenStrategy>> {
        let kind = descriptor.class_info().kind();
        trace!(descriptor = %descriptor, ?kind, "dispatching strategy");

        if descriptor.is_primitive()
            || descriptor.is_boxed_primitive()
            || matches!(kind, TypeKind::Text | TypeKind::Any | TypeKind::Wrapper)
        {
            return Ok(Box::new(primitive::PrimitiveStrategy::new(
                descriptor.clone(),
                self.clone(),
            )));
        }
        if descriptor.is_enum() {
            return Ok(Box::new(enum_type::EnumStrategy::new(
                descriptor.clone(),
                self.clone(),
            )));
        }
        if descriptor.is_array() || descriptor.is_collection_like() {
            return Ok(Box::new(collection::CollectionStrategy::new(
                descriptor.clone(),
                self.clone(),
            )));
        }
        if descriptor.is_map_like() {
            return Ok(Box::new(map::MapStrategy::new(
                descriptor.clone(),
                self.clone(),
            )));
        }
        if descriptor.is_time_like() {
            return Ok(Box::new(time::TimeStrategy::new(
                descriptor.clone(),
                self.clone(),
            )));
        }
        if descriptor.is_specially_handled() {
            return Ok(Box::new(special::SpecialStrategy::new(
                descriptor.clone(),
                self.clone(),
            )));
        }
        if descriptor.is_abstract() {
            return Ok(Box::new(AbstractTypeStrategy::new(
                descriptor.clone(),
                self.context.clone(),
                self.clone(),
            )?));
        }
        Ok(Box::new(object::ObjectStrategy::new(
            descriptor.clone(),
            self.clone(),
        )))
    }

    /// Dispatch and create in one step
    pub fn create(
        &self,
        descriptor: &TypeDescriptor,
        customization: &CustomizationContext,
        constraints: &[Constraint],
    ) -> Result<Value> {
        self.strategy_for(descriptor)?
            .create(customization, constraints)
    }
}
