//! Public fixture-creation surface.
//!
//! A [`Fixture`] owns a frozen type registry and a configuration. Every
//! creation call is its own generation session: a fresh context with its own
//! cache and its own randomness, so unrelated calls never share instances
//! and never influence each other's values.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use tracing::debug;

use crate::config::Configuration;
use crate::context::{Context, CustomizationContext};
use crate::descriptor::TypeDescriptor;
use crate::errors::Result;
use crate::registry::TypeRegistry;
use crate::strategies::SpecimenFactory;
use crate::value::Value;

pub struct Fixture {
    registry: Arc<TypeRegistry>,
    configuration: Configuration,
    seed: Option<u64>,
    calls: Cell<u64>,
}

impl Fixture {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            configuration: Configuration::default(),
            seed: None,
            calls: Cell::new(0),
        }
    }

    pub fn with_configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = configuration;
        self
    }

    /// Deterministic sessions: call `n` of a fixture seeded with `s` draws
    /// the same values as call `n` of any other fixture seeded with `s`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Descriptor for a type expression such as `Contact` or `Vec<Contact>`
    pub fn descriptor(&self, type_expr: &str) -> Result<TypeDescriptor> {
        TypeDescriptor::parse(self.registry.clone(), type_expr)
    }

    /// Generate one specimen for the type expression
    pub fn create(&self, type_expr: &str) -> Result<Value> {
        self.create_customized(type_expr, &CustomizationContext::none())
    }

    pub fn create_customized(
        &self,
        type_expr: &str,
        customization: &CustomizationContext,
    ) -> Result<Value> {
        let descriptor = self.descriptor(type_expr)?;
        self.create_descriptor_customized(&descriptor, customization)
    }

    /// Generate one specimen for an already-built descriptor
    pub fn create_descriptor(&self, descriptor: &TypeDescriptor) -> Result<Value> {
        self.create_descriptor_customized(descriptor, &CustomizationContext::none())
    }

    pub fn create_descriptor_customized(
        &self,
        descriptor: &TypeDescriptor,
        customization: &CustomizationContext,
    ) -> Result<Value> {
        let context = Rc::new(self.fresh_context());
        debug!(descriptor = %descriptor, "starting generation session");
        let specimens = SpecimenFactory::new(self.registry.clone(), context);
        specimens.create(descriptor, customization, &[])
    }

    /// Generate independent specimens, each in its own session
    pub fn create_many(&self, type_expr: &str, count: usize) -> Result<Vec<Value>> {
        let descriptor = self.descriptor(type_expr)?;
        (0..count)
            .map(|_| self.create_descriptor(&descriptor))
            .collect()
    }

    fn fresh_context(&self) -> Context {
        let call = self.calls.get();
        self.calls.set(call + 1);
        match self.seed {
            Some(seed) => Context::with_seed(self.configuration.clone(), seed.wrapping_add(call)),
            None => Context::new(self.configuration.clone()),
        }
    }
}
