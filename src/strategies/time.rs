//! Time-like specimen values

use chrono::{Duration, NaiveDate, Utc};
use rand::Rng;

use crate::context::{Constraint, CustomizationContext};
use crate::descriptor::TypeDescriptor;
use crate::errors::Result;
use crate::registry::builtin;
use crate::strategies::{SpecimenFactory, SpecimenStrategy};
use crate::value::Value;

// generated instants stay within roughly a year of now
const MAX_OFFSET_SECONDS: i64 = 365 * 24 * 60 * 60;

pub struct TimeStrategy {
    descriptor: TypeDescriptor,
    factory: SpecimenFactory,
}

impl TimeStrategy {
    pub fn new(descriptor: TypeDescriptor, factory: SpecimenFactory) -> Self {
        Self {
            descriptor,
            factory,
        }
    }
}

impl SpecimenStrategy for TimeStrategy {
    fn create(&self, _: &CustomizationContext, _: &[Constraint]) -> Result<Value> {
        let class = self.descriptor.class_info().name().to_string();
        Ok(self.factory.context().with_rng(|rng| {
            let offset = Duration::seconds(rng.random_range(-MAX_OFFSET_SECONDS..=MAX_OFFSET_SECONDS));
            match class.as_str() {
                builtin::NAIVE_DATE => {
                    let date = NaiveDate::from_ymd_opt(
                        rng.random_range(1970..=2070),
                        rng.random_range(1..=12),
                        rng.random_range(1..=28),
                    )
                    .unwrap_or_default();
                    Value::Date(date)
                }
                builtin::DURATION => {
                    Value::Duration(Duration::seconds(rng.random_range(0..=MAX_OFFSET_SECONDS)))
                }
                // DateTime and any user-registered time-like type
                _ => Value::Timestamp(Utc::now() + offset),
            }
        }))
    }
}
