//! Specially handled library types: arbitrary-precision numbers, filesystem
//! paths, and URIs. These never go through field population; they are built
//! directly, or through their registered factory paths for user-registered
//! special types.

use std::path::PathBuf;

use rand::Rng;

use crate::context::{Constraint, CustomizationContext};
use crate::descriptor::TypeDescriptor;
use crate::errors::Result;
use crate::factory::InstanceFactory;
use crate::random::{digit_string, lowercase_token};
use crate::registry::builtin;
use crate::strategies::{SpecimenFactory, SpecimenStrategy};
use crate::value::Value;

pub struct SpecialStrategy {
    descriptor: TypeDescriptor,
    factory: SpecimenFactory,
}

impl SpecialStrategy {
    pub fn new(descriptor: TypeDescriptor, factory: SpecimenFactory) -> Self {
        Self {
            descriptor,
            factory,
        }
    }
}

impl SpecimenStrategy for SpecialStrategy {
    fn create(
        &self,
        customization: &CustomizationContext,
        _constraints: &[Constraint],
    ) -> Result<Value> {
        let class = self.descriptor.class_info().name().to_string();
        match class.as_str() {
            builtin::BIG_INT => Ok(self.factory.context().with_rng(|rng| {
                let len = rng.random_range(20..=40);
                let digits = digit_string(rng, len);
                if rng.random_bool(0.5) {
                    Value::BigInt(format!("-{digits}"))
                } else {
                    Value::BigInt(digits)
                }
            })),
            builtin::DECIMAL => Ok(self.factory.context().with_rng(|rng| {
                let whole_len = rng.random_range(1..=18);
                let whole = digit_string(rng, whole_len);
                let fraction_len = rng.random_range(1..=12);
                let fraction = digit_string(rng, fraction_len);
                Value::Decimal(format!("{whole}.{fraction}"))
            })),
            builtin::PATH_BUF => Ok(self.factory.context().with_rng(|rng| {
                let dir = lowercase_token(rng, 8);
                let file = lowercase_token(rng, 12);
                Value::Path(PathBuf::from(format!("/tmp/{dir}/{file}")))
            })),
            builtin::URI => Ok(self.factory.context().with_rng(|rng| {
                let host = lowercase_token(rng, 10);
                let path = lowercase_token(rng, 8);
                Value::Uri(format!("https://{host}.example.com/{path}"))
            })),
            // user-registered special types are built through their
            // registered constructors or factory methods
            _ => InstanceFactory::new(self.factory.clone()).manufacture(&self.descriptor, customization),
        }
    }
}
