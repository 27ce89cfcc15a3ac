//! Instance synthesis and manufacturing.
//!
//! Two construction paths live here. `proxy` builds a stand-in shell for an
//! abstract type from its registered member table and signals
//! `CannotSynthesize` when no stand-in can represent the type (an abstract
//! class with no accessible declared constructor to delegate to). `manufacture`
//! is the fallback: it tries, in a fixed documented order, a registered
//! concrete implementor, then declared accessible constructors with the
//! fewest parameters first, then static factory methods in declaration
//! order, and fails with `CannotManufacture` when all of them are exhausted.

use std::rc::Rc;

use tracing::{debug, trace};

use crate::context::CustomizationContext;
use crate::descriptor::{TypeDescriptor, TypeRef};
use crate::errors::{Result, SpecimenError};
use crate::registry::TypeKind;
use crate::strategies::SpecimenFactory;
use crate::value::{StandIn, Value};

pub struct InstanceFactory {
    specimens: SpecimenFactory,
}

impl InstanceFactory {
    pub fn new(specimens: SpecimenFactory) -> Self {
        Self { specimens }
    }

    /// Build an unpopulated stand-in for an abstract type.
    ///
    /// The shell is returned before any member is generated so a caller can
    /// install it into the context first; `populate_stand_in` then fills the
    /// abstract member slots.
    pub fn proxy(&self, descriptor: &TypeDescriptor) -> Result<Value> {
        let info = descriptor.class_info();
        match info.kind() {
            TypeKind::Interface => {}
            TypeKind::AbstractClass => {
                if !info.constructors().iter().any(|c| c.is_accessible()) {
                    return Err(SpecimenError::cannot_synthesize(
                        descriptor.display_name(),
                        "abstract class has no accessible declared constructor",
                    ));
                }
            }
            _ => {
                return Err(SpecimenError::cannot_synthesize(
                    descriptor.display_name(),
                    "not an interface or abstract class",
                ))
            }
        }
        trace!(descriptor = %descriptor, "synthesizing stand-in");
        Ok(Value::StandIn(Rc::new(StandIn::from_members(
            descriptor.clone(),
            info.members(),
        ))))
    }

    /// Fill the abstract member slots of an installed stand-in with
    /// generated values of their declared return types. Nested requests for
    /// the stand-in's own type resolve to the already-cached instance.
    pub fn populate_stand_in(&self, value: &Value) -> Result<()> {
        let Value::StandIn(stand_in) = value else {
            return Ok(());
        };
        for (member, returns) in stand_in.pending_members() {
            let member_descriptor = stand_in.descriptor().resolve_inner(&returns)?;
            let generated =
                self.specimens
                    .create(&member_descriptor, &CustomizationContext::none(), &[])?;
            stand_in.fill(&member, generated);
        }
        Ok(())
    }

    /// Manufacture a concrete instance for the descriptor.
    ///
    /// Precedence is fixed: registered implementors, then declared
    /// accessible constructors (fewest parameters first), then static
    /// factory methods in declaration order. A failing candidate is skipped
    /// and the next one tried; exhaustion is `CannotManufacture`.
    pub fn manufacture(
        &self,
        descriptor: &TypeDescriptor,
        customization: &CustomizationContext,
    ) -> Result<Value> {
        let info = descriptor.class_info();

        for implementor in info.implementors() {
            let Ok(implementor_descriptor) =
                TypeDescriptor::from_class(self.specimens.registry().clone(), implementor)
            else {
                debug!(implementor = %implementor, "implementor is not registered, skipping");
                continue;
            };
            match self
                .specimens
                .create(&implementor_descriptor, customization, &[])
            {
                Ok(value) => return Ok(value),
                Err(err) => {
                    debug!(implementor = %implementor, error = %err, "implementor failed, trying next candidate")
                }
            }
        }

        let mut constructors: Vec<_> = info
            .constructors()
            .iter()
            .filter(|c| c.is_accessible())
            .cloned()
            .collect();
        constructors.sort_by_key(|c| c.params().len());
        for constructor in constructors {
            match self.invoke_with_args(descriptor, constructor.params(), |args| {
                constructor.invoke(args)
            }) {
                Ok(value) => return Ok(value),
                Err(err) => trace!(error = %err, "constructor failed, trying next candidate"),
            }
        }

        for method in info.factory_methods() {
            match self.invoke_with_args(descriptor, method.params(), |args| method.invoke(args)) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    trace!(method = method.name(), error = %err, "factory method failed, trying next candidate")
                }
            }
        }

        Err(SpecimenError::cannot_manufacture(
            descriptor.display_name(),
            "no usable constructor, factory method, or registered implementor",
        ))
    }

    fn invoke_with_args<F>(
        &self,
        descriptor: &TypeDescriptor,
        params: &[TypeRef],
        call: F,
    ) -> Result<Value>
    where
        F: FnOnce(&[Value]) -> anyhow::Result<Value>,
    {
        let mut args = Vec::with_capacity(params.len());
        for param in params {
            let param_descriptor = descriptor.resolve_inner(param)?;
            args.push(
                self.specimens
                    .create(&param_descriptor, &CustomizationContext::none(), &[])?,
            );
        }
        call(&args).map_err(SpecimenError::from)
    }
}
