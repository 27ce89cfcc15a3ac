//! Uniform selection of a registered enum constant

use rand::Rng;

use crate::context::{Constraint, CustomizationContext};
use crate::descriptor::TypeDescriptor;
use crate::errors::Result;
use crate::strategies::{SpecimenFactory, SpecimenStrategy};
use crate::value::Value;

pub struct EnumStrategy {
    descriptor: TypeDescriptor,
    factory: SpecimenFactory,
}

impl EnumStrategy {
    pub fn new(descriptor: TypeDescriptor, factory: SpecimenFactory) -> Self {
        Self {
            descriptor,
            factory,
        }
    }
}

impl SpecimenStrategy for EnumStrategy {
    fn create(&self, _: &CustomizationContext, _: &[Constraint]) -> Result<Value> {
        let constants = self.descriptor.enum_constants()?;
        if constants.is_empty() {
            return Ok(Value::Null);
        }
        let index = self
            .factory
            .context()
            .with_rng(|rng| rng.random_range(0..constants.len()));
        Ok(constants[index].clone())
    }
}
