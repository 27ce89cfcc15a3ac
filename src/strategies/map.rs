//! Bounded population of map-like types

use std::collections::HashSet;

use rand::Rng;

use crate::context::{Constraint, CustomizationContext};
use crate::descriptor::{TypeDescriptor, TypeRef};
use crate::errors::Result;
use crate::strategies::{SpecimenFactory, SpecimenStrategy};
use crate::value::Value;

pub struct MapStrategy {
    descriptor: TypeDescriptor,
    factory: SpecimenFactory,
}

impl MapStrategy {
    pub fn new(descriptor: TypeDescriptor, factory: SpecimenFactory) -> Self {
        Self {
            descriptor,
            factory,
        }
    }

    fn key_value_descriptors(&self) -> Result<(TypeDescriptor, TypeDescriptor)> {
        if self.descriptor.is_generic() {
            return Ok((
                self.descriptor.generic_argument(0)?,
                self.descriptor.generic_argument(1)?,
            ));
        }
        let top = TypeDescriptor::new(self.factory.registry().clone(), TypeRef::wildcard())?;
        Ok((top.clone(), top))
    }
}

impl SpecimenStrategy for MapStrategy {
    fn create(&self, _: &CustomizationContext, _: &[Constraint]) -> Result<Value> {
        let (key_descriptor, value_descriptor) = self.key_value_descriptors()?;
        let config = self.factory.context().configuration().clone();
        let min = config.min_collection_size;
        let max = config.max_collection_size.max(min);
        let count = self.factory.context().with_rng(|rng| rng.random_range(min..=max));

        // duplicate generated keys collapse, matching map semantics
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let key = self
                .factory
                .create(&key_descriptor, &CustomizationContext::none(), &[])?;
            if !seen.insert(key.to_json_string()) {
                continue;
            }
            let value = self
                .factory
                .create(&value_descriptor, &CustomizationContext::none(), &[])?;
            entries.push((key, value));
        }
        Ok(Value::Map(entries))
    }
}
