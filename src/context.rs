//! Per-session generation context: memoization, cycle breaking, randomness.
//!
//! One [`Context`] belongs to exactly one top-level fixture-creation call.
//! Its cache maps a [`TypeDescriptor`] to the value already produced for it;
//! the first value stored for a descriptor wins for the whole session, which
//! is what lets a strategy install a still-being-populated instance before
//! recursing into its members and have every nested request converge on that
//! same instance.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::config::Configuration;
use crate::descriptor::TypeDescriptor;
use crate::value::Value;

/// Memoization and cycle-breaking boundary for one generation session
pub struct Context {
    configuration: Configuration,
    cache: RefCell<HashMap<TypeDescriptor, Value>>,
    depth: Cell<usize>,
    rng: RefCell<ChaCha8Rng>,
    hits: Cell<usize>,
    misses: Cell<usize>,
}

impl Context {
    /// Fresh context with OS-seeded randomness
    pub fn new(configuration: Configuration) -> Self {
        Self::from_rng(configuration, ChaCha8Rng::from_os_rng())
    }

    /// Fresh context with deterministic randomness
    pub fn with_seed(configuration: Configuration, seed: u64) -> Self {
        Self::from_rng(configuration, ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_rng(configuration: Configuration, rng: ChaCha8Rng) -> Self {
        Self {
            configuration,
            cache: RefCell::new(HashMap::new()),
            depth: Cell::new(0),
            rng: RefCell::new(rng),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn is_cached(&self, descriptor: &TypeDescriptor) -> bool {
        self.cache.borrow().contains_key(descriptor)
    }

    /// Lookup without storing
    pub fn cached(&self, descriptor: &TypeDescriptor) -> Option<Value> {
        let found = self.cache.borrow().get(descriptor).cloned();
        match &found {
            Some(_) => {
                self.hits.set(self.hits.get() + 1);
                trace!(descriptor = %descriptor, "cache hit");
            }
            None => self.misses.set(self.misses.get() + 1),
        }
        found
    }

    /// Idempotent store-then-return: the first value stored for a descriptor
    /// is returned by every later call, even when a different value is
    /// offered. Once stored, an entry is never replaced or evicted for the
    /// lifetime of the context.
    pub fn cache(&self, descriptor: &TypeDescriptor, value: Value) -> Value {
        let mut cache = self.cache.borrow_mut();
        if let Some(existing) = cache.get(descriptor) {
            return existing.clone();
        }
        debug!(descriptor = %descriptor, "caching generated value");
        cache.insert(descriptor.clone(), value.clone());
        value
    }

    /// Enter one level of nested object population; `None` once the
    /// configured maximum depth is reached.
    pub fn descend(&self) -> Option<DepthGuard<'_>> {
        if self.depth.get() >= self.configuration.max_nesting_depth {
            debug!(depth = self.depth.get(), "maximum nesting depth reached");
            return None;
        }
        self.depth.set(self.depth.get() + 1);
        Some(DepthGuard { depth: &self.depth })
    }

    pub fn with_rng<R>(&self, f: impl FnOnce(&mut ChaCha8Rng) -> R) -> R {
        f(&mut self.rng.borrow_mut())
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.cache.borrow().len(),
            hits: self.hits.get(),
            misses: self.misses.get(),
        }
    }
}

/// Decrements the nesting depth when population of one level completes
pub struct DepthGuard<'a> {
    depth: &'a Cell<usize>,
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

/// Cache accounting for one session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: usize,
    pub misses: usize,
}

/// Request-scoped overrides, passed through to strategies opaquely.
///
/// The default ([`CustomizationContext::none`]) means "no override": every
/// field is populated with a generated value.
#[derive(Clone, Debug, Default)]
pub struct CustomizationContext {
    omitted_fields: HashSet<String>,
    overrides: HashMap<String, Value>,
    use_constructor: bool,
}

impl CustomizationContext {
    /// The documented no-override default
    pub fn none() -> Self {
        Self::default()
    }

    /// Leave the named field unpopulated (Null)
    pub fn omit(mut self, field: impl Into<String>) -> Self {
        self.omitted_fields.insert(field.into());
        self
    }

    /// Use the given value for the named field instead of generating one
    pub fn with_field(mut self, field: impl Into<String>, value: Value) -> Self {
        self.overrides.insert(field.into(), value);
        self
    }

    /// Construct objects through a declared constructor instead of
    /// field-by-field population
    pub fn with_constructor(mut self) -> Self {
        self.use_constructor = true;
        self
    }

    pub fn is_omitted(&self, field: &str) -> bool {
        self.omitted_fields.contains(field)
    }

    pub fn override_for(&self, field: &str) -> Option<Value> {
        self.overrides.get(field).cloned()
    }

    pub fn use_constructor(&self) -> bool {
        self.use_constructor
    }
}

/// Opaque constraint token carried through strategy signatures; constraint
/// interpretation happens outside the generation core.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Constraint {
    pub name: String,
    pub argument: Option<String>,
}

impl Constraint {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            argument: None,
        }
    }

    pub fn with_argument(name: impl Into<String>, argument: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            argument: Some(argument.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TypeRegistry;
    use pretty_assertions::assert_eq;

    fn descriptor(name: &str) -> TypeDescriptor {
        TypeDescriptor::from_class(TypeRegistry::built_ins(), name).unwrap()
    }

    #[test]
    fn first_stored_value_wins() {
        let context = Context::new(Configuration::default());
        let key = descriptor("String");

        let first = context.cache(&key, Value::object("A"));
        let second = context.cache(&key, Value::object("B"));

        assert!(first.same_instance(&second));
        assert!(context.is_cached(&key));
        assert!(context.cached(&key).unwrap().same_instance(&first));
    }

    #[test]
    fn distinct_descriptors_have_distinct_entries() {
        let context = Context::new(Configuration::default());
        let a = context.cache(&descriptor("String"), Value::object("A"));
        let b = context.cache(&descriptor("i64"), Value::object("B"));
        assert!(!a.same_instance(&b));
        assert_eq!(context.stats().entries, 2);
    }

    #[test]
    fn descend_is_bounded_and_restores_on_drop() {
        let context = Context::new(Configuration::default().with_max_nesting_depth(2));

        let g1 = context.descend().expect("depth 1");
        let g2 = context.descend().expect("depth 2");
        assert!(context.descend().is_none(), "limit reached");

        drop(g2);
        let g2_again = context.descend().expect("released depth is reusable");
        drop(g2_again);
        drop(g1);
    }

    #[test]
    fn seeded_contexts_draw_identical_sequences() {
        use rand::Rng;
        let a = Context::with_seed(Configuration::default(), 42);
        let b = Context::with_seed(Configuration::default(), 42);
        let draw = |ctx: &Context| ctx.with_rng(|rng| (0..8).map(|_| rng.random::<u64>()).collect::<Vec<_>>());
        assert_eq!(draw(&a), draw(&b));
    }

    #[test]
    fn customization_defaults_to_no_override() {
        let none = CustomizationContext::none();
        assert!(!none.is_omitted("name"));
        assert!(none.override_for("name").is_none());
        assert!(!none.use_constructor());

        let custom = CustomizationContext::none()
            .omit("secret")
            .with_field("name", Value::Str("Ada".into()));
        assert!(custom.is_omitted("secret"));
        assert_eq!(
            custom.override_for("name").unwrap().as_str(),
            Some("Ada")
        );
    }
}
