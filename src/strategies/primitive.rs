//! Randomized primitive, text, and wrapper values

use rand::Rng;

use crate::context::{Constraint, CustomizationContext};
use crate::descriptor::TypeDescriptor;
use crate::errors::Result;
use crate::random::alphanumeric_string;
use crate::registry::{PrimitiveKind, TypeKind};
use crate::strategies::{SpecimenFactory, SpecimenStrategy};
use crate::value::Value;

const STRING_MIN_LEN: usize = 10;
const STRING_MAX_LEN: usize = 20;

pub struct PrimitiveStrategy {
    descriptor: TypeDescriptor,
    factory: SpecimenFactory,
}

impl PrimitiveStrategy {
    pub fn new(descriptor: TypeDescriptor, factory: SpecimenFactory) -> Self {
        Self {
            descriptor,
            factory,
        }
    }

    fn random_string(&self) -> Value {
        self.factory.context().with_rng(|rng| {
            let len = rng.random_range(STRING_MIN_LEN..=STRING_MAX_LEN);
            Value::Str(alphanumeric_string(rng, len))
        })
    }
}

impl SpecimenStrategy for PrimitiveStrategy {
    fn create(
        &self,
        customization: &CustomizationContext,
        constraints: &[Constraint],
    ) -> Result<Value> {
        match self.descriptor.class_info().kind() {
            TypeKind::Primitive(kind) => Ok(self
                .factory
                .context()
                .with_rng(|rng| random_primitive(rng, kind))),
            TypeKind::Text | TypeKind::Any => Ok(self.random_string()),
            // wrappers generate their payload type; a raw wrapper has no
            // payload and degrades to the top type
            TypeKind::Wrapper => {
                if self.descriptor.is_generic() {
                    let inner = self.descriptor.generic_argument(0)?;
                    self.factory.create(&inner, customization, constraints)
                } else {
                    Ok(self.random_string())
                }
            }
            _ => Ok(self.random_string()),
        }
    }
}

fn random_primitive(rng: &mut rand_chacha::ChaCha8Rng, kind: PrimitiveKind) -> Value {
    match kind {
        PrimitiveKind::Bool => Value::Bool(rng.random_bool(0.5)),
        PrimitiveKind::Char => Value::Char(char::from(rng.sample(rand::distr::Alphanumeric))),
        PrimitiveKind::I8 => Value::Int(rng.random::<i8>() as i64),
        PrimitiveKind::I16 => Value::Int(rng.random::<i16>() as i64),
        PrimitiveKind::I32 => Value::Int(rng.random::<i32>() as i64),
        PrimitiveKind::I64 => Value::Int(rng.random::<i64>()),
        PrimitiveKind::U8 => Value::Uint(rng.random::<u8>() as u64),
        PrimitiveKind::U16 => Value::Uint(rng.random::<u16>() as u64),
        PrimitiveKind::U32 => Value::Uint(rng.random::<u32>() as u64),
        PrimitiveKind::U64 => Value::Uint(rng.random::<u64>()),
        PrimitiveKind::F32 => Value::Float(rng.random::<f32>() as f64),
        PrimitiveKind::F64 => Value::Float(rng.random::<f64>()),
    }
}
