//! Type metadata registry: the lookup table behind every structural query.
//!
//! There is no runtime reflection to lean on, so every type that can be
//! requested as a specimen is described up front by a [`TypeInfo`] record:
//! its kind, its predicate flags, its fields, its members, and the closures
//! that know how to construct it. The registry is built once through
//! [`TypeRegistryBuilder`] and then frozen behind an `Arc`; descriptors hold
//! a handle to it and answer all structural questions from these records.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::descriptor::TypeRef;
use crate::value::{StandIn, Value};

/// Interned identity of a registered class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(u32);

/// Construction closure shared by constructors and factory methods
pub type ConstructorFn = Arc<dyn Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync>;

/// Body of a concrete (non-abstract) member, invoked against the stand-in
pub type MemberBody = Arc<dyn Fn(&StandIn) -> Value + Send + Sync>;

/// Kind of a registered type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Primitive(PrimitiveKind),
    /// Character strings; not primitive, generated like one
    Text,
    Struct,
    Enum,
    Interface,
    AbstractClass,
    /// Generic single-argument wrapper such as `Box`
    Wrapper,
    /// The top type; what unbounded wildcards resolve to
    Any,
}

/// The primitive value kinds the generator can randomize directly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl PrimitiveKind {
    /// The eight fixed-width numeric/boolean/character kinds that may appear
    /// boxed (`Box<p>`); unsigned kinds are excluded.
    pub fn is_boxable(self) -> bool {
        matches!(
            self,
            Self::Bool
                | Self::Char
                | Self::I8
                | Self::I16
                | Self::I32
                | Self::I64
                | Self::F32
                | Self::F64
        )
    }
}

/// A field declared on a struct registration
#[derive(Clone, Debug)]
pub struct FieldSpec {
    pub name: String,
    pub ty: TypeRef,
}

/// A member declared on an interface or abstract-class registration.
///
/// A member with a body is concrete: stand-ins run the registered logic.
/// A member without a body is abstract: stand-ins fill it with a generated
/// value of the declared return type.
#[derive(Clone)]
pub struct MemberSpec {
    pub name: String,
    pub returns: TypeRef,
    pub body: Option<MemberBody>,
}

impl fmt::Debug for MemberSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberSpec")
            .field("name", &self.name)
            .field("returns", &self.returns)
            .field("concrete", &self.body.is_some())
            .finish()
    }
}

/// A constructor declared directly on a type
#[derive(Clone)]
pub struct ConstructorSpec {
    params: Vec<TypeRef>,
    accessible: bool,
    build: ConstructorFn,
}

impl ConstructorSpec {
    pub fn new<F>(params: Vec<TypeRef>, build: F) -> Self
    where
        F: Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self {
            params,
            accessible: true,
            build: Arc::new(build),
        }
    }

    /// Mark the constructor as not callable from outside the type
    pub fn private(mut self) -> Self {
        self.accessible = false;
        self
    }

    pub fn params(&self) -> &[TypeRef] {
        &self.params
    }

    pub fn is_accessible(&self) -> bool {
        self.accessible
    }

    pub fn invoke(&self, args: &[Value]) -> anyhow::Result<Value> {
        (self.build)(args)
    }
}

impl fmt::Debug for ConstructorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorSpec")
            .field("params", &self.params)
            .field("accessible", &self.accessible)
            .finish()
    }
}

/// A static factory method whose return type is the declaring type itself
#[derive(Clone)]
pub struct FactoryMethodSpec {
    name: String,
    params: Vec<TypeRef>,
    build: ConstructorFn,
}

impl FactoryMethodSpec {
    pub fn new<F>(name: impl Into<String>, params: Vec<TypeRef>, build: F) -> Self
    where
        F: Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params,
            build: Arc::new(build),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[TypeRef] {
        &self.params
    }

    pub fn invoke(&self, args: &[Value]) -> anyhow::Result<Value> {
        (self.build)(args)
    }
}

impl fmt::Debug for FactoryMethodSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryMethodSpec")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish()
    }
}

/// Metadata record for one registered type
#[derive(Clone, Debug)]
pub struct TypeInfo {
    name: String,
    kind: TypeKind,
    collection_like: bool,
    map_like: bool,
    time_like: bool,
    specially_handled: bool,
    generic_params: Vec<String>,
    fields: Vec<FieldSpec>,
    enum_constants: Vec<String>,
    members: Vec<MemberSpec>,
    constructors: Vec<ConstructorSpec>,
    factory_methods: Vec<FactoryMethodSpec>,
    implementors: Vec<String>,
}

impl TypeInfo {
    fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            collection_like: false,
            map_like: false,
            time_like: false,
            specially_handled: false,
            generic_params: Vec::new(),
            fields: Vec::new(),
            enum_constants: Vec::new(),
            members: Vec::new(),
            constructors: Vec::new(),
            factory_methods: Vec::new(),
            implementors: Vec::new(),
        }
    }

    /// Register a plain struct
    pub fn struct_type(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Struct)
    }

    /// Register an enum with its constants
    pub fn enum_type<S: Into<String>>(
        name: impl Into<String>,
        constants: impl IntoIterator<Item = S>,
    ) -> Self {
        let mut info = Self::new(name, TypeKind::Enum);
        info.enum_constants = constants.into_iter().map(Into::into).collect();
        info
    }

    /// Register an interface (all members abstract unless given a body)
    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    /// Register an abstract class
    pub fn abstract_class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::AbstractClass)
    }

    pub(crate) fn primitive(name: impl Into<String>, kind: PrimitiveKind) -> Self {
        Self::new(name, TypeKind::Primitive(kind))
    }

    pub(crate) fn text(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Text)
    }

    pub(crate) fn wrapper(name: impl Into<String>, params: Vec<String>) -> Self {
        let mut info = Self::new(name, TypeKind::Wrapper);
        info.generic_params = params;
        info
    }

    pub(crate) fn any(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Any)
    }

    pub fn with_generic_params<S: Into<String>>(
        mut self,
        params: impl IntoIterator<Item = S>,
    ) -> Self {
        self.generic_params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            ty,
        });
        self
    }

    /// Declare an abstract member: stand-ins fill it with a generated value
    pub fn with_member(mut self, name: impl Into<String>, returns: TypeRef) -> Self {
        self.members.push(MemberSpec {
            name: name.into(),
            returns,
            body: None,
        });
        self
    }

    /// Declare a concrete member whose registered body is real logic
    pub fn with_default_member<F>(
        mut self,
        name: impl Into<String>,
        returns: TypeRef,
        body: F,
    ) -> Self
    where
        F: Fn(&StandIn) -> Value + Send + Sync + 'static,
    {
        self.members.push(MemberSpec {
            name: name.into(),
            returns,
            body: Some(Arc::new(body)),
        });
        self
    }

    pub fn with_constructor(mut self, constructor: ConstructorSpec) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn with_factory_method(mut self, method: FactoryMethodSpec) -> Self {
        self.factory_methods.push(method);
        self
    }

    /// Name a registered concrete type that implements this abstract type
    pub fn with_implementor(mut self, name: impl Into<String>) -> Self {
        self.implementors.push(name.into());
        self
    }

    pub fn collection_like(mut self) -> Self {
        self.collection_like = true;
        self
    }

    pub fn map_like(mut self) -> Self {
        self.map_like = true;
        self
    }

    pub fn time_like(mut self) -> Self {
        self.time_like = true;
        self
    }

    pub fn specially_handled(mut self) -> Self {
        self.specially_handled = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn is_collection_like(&self) -> bool {
        self.collection_like
    }

    pub fn is_map_like(&self) -> bool {
        self.map_like
    }

    pub fn is_time_like(&self) -> bool {
        self.time_like
    }

    pub fn is_specially_handled(&self) -> bool {
        self.specially_handled
    }

    /// Whether values of this type cannot be instantiated directly
    pub fn is_abstract(&self) -> bool {
        matches!(self.kind, TypeKind::Interface | TypeKind::AbstractClass)
    }

    pub fn generic_params(&self) -> &[String] {
        &self.generic_params
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn enum_constants(&self) -> &[String] {
        &self.enum_constants
    }

    pub fn members(&self) -> &[MemberSpec] {
        &self.members
    }

    pub fn constructors(&self) -> &[ConstructorSpec] {
        &self.constructors
    }

    pub fn factory_methods(&self) -> &[FactoryMethodSpec] {
        &self.factory_methods
    }

    pub fn implementors(&self) -> &[String] {
        &self.implementors
    }
}

/// Well-known class names pre-registered by the builder
pub mod builtin {
    pub const ANY: &str = "any";
    pub const STRING: &str = "String";
    pub const BOX: &str = "Box";
    pub const VEC: &str = "Vec";
    pub const VEC_DEQUE: &str = "VecDeque";
    pub const HASH_SET: &str = "HashSet";
    pub const BTREE_SET: &str = "BTreeSet";
    pub const HASH_MAP: &str = "HashMap";
    pub const BTREE_MAP: &str = "BTreeMap";
    pub const DATE_TIME: &str = "DateTime";
    pub const NAIVE_DATE: &str = "NaiveDate";
    pub const DURATION: &str = "Duration";
    pub const BIG_INT: &str = "BigInt";
    pub const DECIMAL: &str = "Decimal";
    pub const PATH_BUF: &str = "PathBuf";
    pub const URI: &str = "Uri";
}

/// Immutable table of registered types, shared behind an `Arc`
#[derive(Debug)]
pub struct TypeRegistry {
    infos: Vec<TypeInfo>,
    index: HashMap<String, ClassId>,
}

impl TypeRegistry {
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::new()
    }

    /// A registry containing only the built-in types
    pub fn built_ins() -> Arc<Self> {
        Self::builder().build()
    }

    pub fn resolve(&self, name: &str) -> Option<ClassId> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn info(&self, id: ClassId) -> &TypeInfo {
        &self.infos[id.0 as usize]
    }

    pub fn name(&self, id: ClassId) -> &str {
        self.info(id).name()
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }
}

/// Builder for [`TypeRegistry`]; pre-registers the built-in types
#[derive(Debug)]
pub struct TypeRegistryBuilder {
    infos: Vec<TypeInfo>,
    index: HashMap<String, ClassId>,
}

impl TypeRegistryBuilder {
    fn new() -> Self {
        let mut builder = Self {
            infos: Vec::new(),
            index: HashMap::new(),
        };
        builder.register_built_ins();
        builder
    }

    fn register_built_ins(&mut self) {
        use PrimitiveKind::*;

        self.push(TypeInfo::any(builtin::ANY));

        for (name, kind) in [
            ("bool", Bool),
            ("char", Char),
            ("i8", I8),
            ("i16", I16),
            ("i32", I32),
            ("i64", I64),
            ("u8", U8),
            ("u16", U16),
            ("u32", U32),
            ("u64", U64),
            ("f32", F32),
            ("f64", F64),
        ] {
            self.push(TypeInfo::primitive(name, kind));
        }

        self.push(TypeInfo::text(builtin::STRING));
        self.push(TypeInfo::wrapper(builtin::BOX, vec!["T".to_string()]));

        for name in [
            builtin::VEC,
            builtin::VEC_DEQUE,
            builtin::HASH_SET,
            builtin::BTREE_SET,
        ] {
            self.push(
                TypeInfo::struct_type(name)
                    .with_generic_params(["T"])
                    .collection_like(),
            );
        }

        for name in [builtin::HASH_MAP, builtin::BTREE_MAP] {
            self.push(
                TypeInfo::struct_type(name)
                    .with_generic_params(["K", "V"])
                    .map_like(),
            );
        }

        for name in [builtin::DATE_TIME, builtin::NAIVE_DATE, builtin::DURATION] {
            self.push(TypeInfo::struct_type(name).time_like());
        }

        for name in [
            builtin::BIG_INT,
            builtin::DECIMAL,
            builtin::PATH_BUF,
            builtin::URI,
        ] {
            self.push(TypeInfo::struct_type(name).specially_handled());
        }
    }

    fn push(&mut self, info: TypeInfo) -> ClassId {
        let id = ClassId(self.infos.len() as u32);
        self.index.insert(info.name().to_string(), id);
        self.infos.push(info);
        id
    }

    /// Register a type; re-registering a name replaces the earlier record
    pub fn register(mut self, info: TypeInfo) -> Self {
        match self.index.get(info.name()) {
            Some(id) => self.infos[id.0 as usize] = info,
            None => {
                self.push(info);
            }
        }
        self
    }

    pub fn build(self) -> Arc<TypeRegistry> {
        Arc::new(TypeRegistry {
            infos: self.infos,
            index: self.index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_ins_are_pre_registered() {
        let registry = TypeRegistry::built_ins();
        for name in [
            "bool", "i64", "f32", "char", "String", "Box", "Vec", "HashMap", "DateTime",
            "Decimal", "PathBuf", "Uri", "any",
        ] {
            assert!(registry.contains(name), "missing built-in {name}");
        }
    }

    #[test]
    fn predicate_flags_are_independent() {
        let registry = TypeRegistry::built_ins();
        let vec = registry.info(registry.resolve("Vec").unwrap());
        assert!(vec.is_collection_like());
        assert!(!vec.is_map_like());
        assert!(!vec.is_time_like());
        assert!(!vec.is_specially_handled());

        let map = registry.info(registry.resolve("HashMap").unwrap());
        assert!(map.is_map_like());
        assert!(!map.is_collection_like());
    }

    #[test]
    fn registering_a_type_makes_it_resolvable() {
        let registry = TypeRegistry::builder()
            .register(TypeInfo::struct_type("Contact").with_field("name", TypeRef::named("String")))
            .build();

        let id = registry.resolve("Contact").expect("registered");
        assert_eq!(registry.name(id), "Contact");
        assert_eq!(registry.info(id).fields().len(), 1);
    }

    #[test]
    fn re_registering_replaces_the_record() {
        let registry = TypeRegistry::builder()
            .register(TypeInfo::struct_type("Contact"))
            .register(TypeInfo::struct_type("Contact").with_field("name", TypeRef::named("String")))
            .build();

        let id = registry.resolve("Contact").unwrap();
        assert_eq!(registry.info(id).fields().len(), 1);
    }

    #[test]
    fn unsigned_kinds_are_not_boxable() {
        assert!(PrimitiveKind::I32.is_boxable());
        assert!(PrimitiveKind::Bool.is_boxable());
        assert!(!PrimitiveKind::U32.is_boxable());
        assert!(!PrimitiveKind::U64.is_boxable());
    }
}
