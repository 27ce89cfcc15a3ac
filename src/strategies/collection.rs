//! Bounded population of collection-like types and arrays

use rand::Rng;

use crate::context::{Constraint, CustomizationContext};
use crate::descriptor::{TypeDescriptor, TypeRef};
use crate::errors::Result;
use crate::strategies::{SpecimenFactory, SpecimenStrategy};
use crate::value::Value;

pub struct CollectionStrategy {
    descriptor: TypeDescriptor,
    factory: SpecimenFactory,
}

impl CollectionStrategy {
    pub fn new(descriptor: TypeDescriptor, factory: SpecimenFactory) -> Self {
        Self {
            descriptor,
            factory,
        }
    }

    /// Element type: array component, first generic argument, or the top
    /// type for raw containers
    fn element_descriptor(&self) -> Result<TypeDescriptor> {
        if self.descriptor.is_array() {
            return self.descriptor.component_type();
        }
        if self.descriptor.is_generic() {
            return self.descriptor.generic_argument(0);
        }
        TypeDescriptor::new(self.factory.registry().clone(), TypeRef::wildcard())
    }
}

impl SpecimenStrategy for CollectionStrategy {
    fn create(&self, _: &CustomizationContext, _: &[Constraint]) -> Result<Value> {
        let element = self.element_descriptor()?;
        let config = self.factory.context().configuration().clone();
        let min = config.min_collection_size;
        let max = config.max_collection_size.max(min);
        let count = self.factory.context().with_rng(|rng| rng.random_range(min..=max));

        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(
                self.factory
                    .create(&element, &CustomizationContext::none(), &[])?,
            );
        }
        Ok(Value::List(items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::context::Context;
    use crate::registry::TypeRegistry;
    use std::rc::Rc;

    fn create(expr: &str, config: Configuration) -> Value {
        let registry = TypeRegistry::built_ins();
        let context = Rc::new(Context::with_seed(config, 5));
        let factory = SpecimenFactory::new(registry.clone(), context);
        let descriptor = TypeDescriptor::parse(registry, expr).unwrap();
        factory
            .create(&descriptor, &CustomizationContext::none(), &[])
            .unwrap()
    }

    #[test]
    fn element_count_respects_configured_bounds() {
        let config = Configuration::default().with_collection_sizes(2, 4);
        for _ in 0..10 {
            let Value::List(items) = create("Vec<i64>", config.clone()) else {
                panic!("expected list");
            };
            assert!((2..=4).contains(&items.len()));
            assert!(items.iter().all(|i| matches!(i, Value::Int(_))));
        }
    }

    #[test]
    fn arrays_use_their_component_type() {
        let Value::List(items) = create("[bool]", Configuration::default()) else {
            panic!("expected list");
        };
        assert!(items.iter().all(|i| matches!(i, Value::Bool(_))));
    }

    #[test]
    fn nested_containers_recurse() {
        let config = Configuration::default().with_collection_sizes(1, 2);
        let Value::List(outer) = create("Vec<Vec<String>>", config) else {
            panic!("expected list");
        };
        for inner in outer {
            assert!(matches!(inner, Value::List(_)));
        }
    }

    #[test]
    fn raw_containers_fall_back_to_top_type_elements() {
        let Value::List(items) = create("Vec", Configuration::default()) else {
            panic!("expected list");
        };
        assert!(items.iter().all(|i| matches!(i, Value::Str(_))));
    }
}
