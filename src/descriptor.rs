//! Structural type references and the descriptor over them.
//!
//! A [`TypeRef`] is the value-level shape of a requested type: a plain named
//! class, a parameterized type with its actual arguments, an array, a
//! wildcard, or a not-yet-bound type parameter. A [`TypeDescriptor`] pairs a
//! reference with the registry that can answer questions about it, and is
//! the cache key for one generation session, so its equality and hashing are
//! structural over the reference alone (`Vec<String>` != `Vec<i64>`).

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::errors::{Result, SpecimenError};
use crate::registry::{
    builtin, ClassId, ConstructorSpec, FactoryMethodSpec, TypeInfo, TypeKind, TypeRegistry,
};
use crate::value::Value;

/// Value-level reference to a type shape
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A plain registered class
    Named(String),
    /// A registered class applied to actual type arguments
    Parameterized { raw: String, args: Vec<TypeRef> },
    /// An array of some component type
    Array(Box<TypeRef>),
    /// A wildcard, optionally bounded from above
    Wildcard { upper: Option<Box<TypeRef>> },
    /// A type parameter by name, bound at the use site
    Param(String),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn parameterized(raw: impl Into<String>, args: Vec<TypeRef>) -> Self {
        Self::Parameterized {
            raw: raw.into(),
            args,
        }
    }

    pub fn array(component: TypeRef) -> Self {
        Self::Array(Box::new(component))
    }

    pub fn wildcard() -> Self {
        Self::Wildcard { upper: None }
    }

    pub fn wildcard_with_upper(upper: TypeRef) -> Self {
        Self::Wildcard {
            upper: Some(Box::new(upper)),
        }
    }

    pub fn param(name: impl Into<String>) -> Self {
        Self::Param(name.into())
    }

    /// Replace type parameters by name; unmatched parameters are left as-is
    pub fn substitute(&self, bindings: &HashMap<String, TypeRef>) -> TypeRef {
        match self {
            Self::Named(_) => self.clone(),
            Self::Parameterized { raw, args } => Self::Parameterized {
                raw: raw.clone(),
                args: args.iter().map(|a| a.substitute(bindings)).collect(),
            },
            Self::Array(component) => Self::Array(Box::new(component.substitute(bindings))),
            Self::Wildcard { upper } => Self::Wildcard {
                upper: upper
                    .as_ref()
                    .map(|u| Box::new(u.substitute(bindings))),
            },
            Self::Param(name) => bindings.get(name).cloned().unwrap_or_else(|| self.clone()),
        }
    }

    fn render(&self) -> String {
        match self {
            Self::Named(name) => name.clone(),
            Self::Parameterized { raw, args } => {
                let rendered: Vec<String> = args.iter().map(TypeRef::render).collect();
                format!("{}<{}>", raw, rendered.join(", "))
            }
            Self::Array(component) => format!("[{}]", component.render()),
            Self::Wildcard { upper: None } => "_".to_string(),
            Self::Wildcard { upper: Some(u) } => format!("_: {}", u.render()),
            Self::Param(name) => name.clone(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Immutable descriptor of a requested type; the cache key for a session
#[derive(Clone)]
pub struct TypeDescriptor {
    type_ref: TypeRef,
    raw: ClassId,
    registry: Arc<TypeRegistry>,
}

impl TypeDescriptor {
    /// Build a descriptor, validating that every named class in the
    /// reference is registered and that argument counts match the
    /// registration's generic parameters.
    pub fn new(registry: Arc<TypeRegistry>, type_ref: TypeRef) -> Result<Self> {
        validate(&registry, &type_ref)?;
        let raw = resolve_raw(&registry, &type_ref);
        Ok(Self {
            type_ref,
            raw,
            registry,
        })
    }

    /// Descriptor for a plain registered class by name
    pub fn from_class(registry: Arc<TypeRegistry>, name: impl Into<String>) -> Result<Self> {
        Self::new(registry, TypeRef::named(name))
    }

    /// Parse a type expression such as `Contact`, `Vec<String>`,
    /// `HashMap<String, [i64]>`, `[Contact]`, `_` or `_: Shape`.
    pub fn parse(registry: Arc<TypeRegistry>, text: &str) -> Result<Self> {
        let type_ref = parse_type_ref(text)?;
        Self::new(registry, type_ref)
    }

    // Trusted constructor for references already validated as part of a
    // larger reference.
    fn trusted(registry: Arc<TypeRegistry>, type_ref: TypeRef) -> Self {
        let raw = resolve_raw(&registry, &type_ref);
        Self {
            type_ref,
            raw,
            registry,
        }
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.type_ref
    }

    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// The underlying class: wildcards resolve to their upper bound (or the
    /// top type when unbounded), parameterized types to their raw class,
    /// arrays and unbound parameters to the top type.
    pub fn raw_class(&self) -> ClassId {
        self.raw
    }

    pub fn class_info(&self) -> &TypeInfo {
        self.registry.info(self.raw)
    }

    /// Generic-argument-aware readable name; diagnostics only, never equality
    pub fn display_name(&self) -> String {
        self.type_ref.render()
    }

    pub fn is_generic(&self) -> bool {
        matches!(&self.type_ref, TypeRef::Parameterized { args, .. } if !args.is_empty())
    }

    pub fn generic_arguments(&self) -> Result<Vec<TypeDescriptor>> {
        match &self.type_ref {
            TypeRef::Parameterized { args, .. } if !args.is_empty() => Ok(args
                .iter()
                .map(|a| Self::trusted(self.registry.clone(), a.clone()))
                .collect()),
            _ => Err(SpecimenError::NotGenericType {
                type_name: self.display_name(),
            }),
        }
    }

    pub fn generic_argument(&self, index: usize) -> Result<TypeDescriptor> {
        let args = self.generic_arguments()?;
        args.get(index).cloned().ok_or(SpecimenError::IndexOutOfRange {
            type_name: self.display_name(),
            index,
            available: args.len(),
        })
    }

    pub fn generic_parameter_names(&self) -> Result<Vec<String>> {
        if !self.is_generic() {
            return Err(SpecimenError::NotGenericType {
                type_name: self.display_name(),
            });
        }
        Ok(self.class_info().generic_params().to_vec())
    }

    pub fn generic_parameter_name(&self, index: usize) -> Result<String> {
        let names = self.generic_parameter_names()?;
        let available = names.len();
        names
            .into_iter()
            .nth(index)
            .ok_or(SpecimenError::IndexOutOfRange {
                type_name: self.display_name(),
                index,
                available,
            })
    }

    pub fn component_type(&self) -> Result<TypeDescriptor> {
        match &self.type_ref {
            TypeRef::Array(component) => Ok(Self::trusted(
                self.registry.clone(),
                (**component).clone(),
            )),
            _ => Err(SpecimenError::NotAnArray {
                type_name: self.display_name(),
            }),
        }
    }

    pub fn enum_constants(&self) -> Result<Vec<Value>> {
        if !self.is_enum() {
            return Err(SpecimenError::NotAnEnum {
                type_name: self.display_name(),
            });
        }
        let info = self.class_info();
        Ok(info
            .enum_constants()
            .iter()
            .map(|constant| Value::EnumConstant {
                class: info.name().to_string(),
                constant: constant.clone(),
            })
            .collect())
    }

    /// Constructors declared directly on the raw class
    pub fn declared_constructors(&self) -> Vec<ConstructorSpec> {
        self.class_info().constructors().to_vec()
    }

    /// Static factory methods declared on the raw class whose return type is
    /// the class itself
    pub fn static_factory_methods(&self) -> Vec<FactoryMethodSpec> {
        self.class_info().factory_methods().to_vec()
    }

    pub fn is_collection_like(&self) -> bool {
        self.class_info().is_collection_like()
    }

    pub fn is_map_like(&self) -> bool {
        self.class_info().is_map_like()
    }

    pub fn is_time_like(&self) -> bool {
        self.class_info().is_time_like()
    }

    pub fn is_specially_handled(&self) -> bool {
        self.class_info().is_specially_handled()
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.class_info().kind(), TypeKind::Primitive(_))
    }

    /// `Box<p>` over one of the eight fixed-width primitive kinds
    pub fn is_boxed_primitive(&self) -> bool {
        let TypeRef::Parameterized { raw, args } = &self.type_ref else {
            return false;
        };
        if raw != builtin::BOX || args.len() != 1 {
            return false;
        }
        let TypeRef::Named(inner) = &args[0] else {
            return false;
        };
        match self.registry.resolve(inner) {
            Some(id) => match self.registry.info(id).kind() {
                TypeKind::Primitive(kind) => kind.is_boxable(),
                _ => false,
            },
            None => false,
        }
    }

    pub fn is_enum(&self) -> bool {
        self.class_info().kind() == TypeKind::Enum
    }

    pub fn is_array(&self) -> bool {
        matches!(&self.type_ref, TypeRef::Array(_))
    }

    pub fn is_interface(&self) -> bool {
        self.class_info().kind() == TypeKind::Interface
    }

    /// True for interfaces and abstract classes alike
    pub fn is_abstract(&self) -> bool {
        self.class_info().is_abstract()
    }

    /// Bindings from the raw class's generic parameter names to the actual
    /// arguments of this descriptor; empty for non-generic descriptors.
    pub(crate) fn generic_bindings(&self) -> HashMap<String, TypeRef> {
        let TypeRef::Parameterized { args, .. } = &self.type_ref else {
            return HashMap::new();
        };
        self.class_info()
            .generic_params()
            .iter()
            .cloned()
            .zip(args.iter().cloned())
            .collect()
    }

    /// Descriptor for a reference appearing inside this descriptor's
    /// registration, with this descriptor's generic arguments bound.
    pub(crate) fn resolve_inner(&self, inner: &TypeRef) -> Result<TypeDescriptor> {
        let bound = inner.substitute(&self.generic_bindings());
        TypeDescriptor::new(self.registry.clone(), bound)
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.type_ref == other.type_ref
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_ref.hash(state);
    }
}

// Keeps the registry handle out of debug output.
impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_ref", &self.type_ref)
            .finish()
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

fn resolve_raw(registry: &Arc<TypeRegistry>, type_ref: &TypeRef) -> ClassId {
    let top = || registry.resolve(builtin::ANY).expect("top type registered");
    match type_ref {
        TypeRef::Named(name) | TypeRef::Parameterized { raw: name, .. } => {
            registry.resolve(name).unwrap_or_else(top)
        }
        TypeRef::Wildcard { upper: Some(u) } => resolve_raw(registry, u),
        TypeRef::Wildcard { upper: None } | TypeRef::Array(_) | TypeRef::Param(_) => top(),
    }
}

fn validate(registry: &Arc<TypeRegistry>, type_ref: &TypeRef) -> Result<()> {
    match type_ref {
        TypeRef::Named(name) => {
            registry
                .resolve(name)
                .ok_or_else(|| SpecimenError::UnknownType(name.clone()))?;
            Ok(())
        }
        TypeRef::Parameterized { raw, args } => {
            let id = registry
                .resolve(raw)
                .ok_or_else(|| SpecimenError::UnknownType(raw.clone()))?;
            let expected = registry.info(id).generic_params().len();
            if expected != args.len() {
                return Err(SpecimenError::invalid_argument(
                    "type",
                    format!(
                        "{}: expected {} generic arguments, got {}",
                        raw,
                        expected,
                        args.len()
                    ),
                ));
            }
            args.iter().try_for_each(|a| validate(registry, a))
        }
        TypeRef::Array(component) => validate(registry, component),
        TypeRef::Wildcard { upper } => match upper {
            Some(u) => validate(registry, u),
            None => Ok(()),
        },
        TypeRef::Param(_) => Ok(()),
    }
}

/// Parse a type expression into a [`TypeRef`] without registry validation
pub fn parse_type_ref(text: &str) -> Result<TypeRef> {
    let mut parser = TypeExprParser {
        text,
        bytes: text.as_bytes(),
        pos: 0,
    };
    let parsed = parser.parse_ref()?;
    parser.skip_ws();
    if parser.pos != parser.bytes.len() {
        return Err(parser.error());
    }
    Ok(parsed)
}

struct TypeExprParser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl TypeExprParser<'_> {
    fn error(&self) -> SpecimenError {
        SpecimenError::invalid_argument("type expression", self.text)
    }

    fn skip_ws(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        self.skip_ws();
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error())
        }
    }

    fn parse_ref(&mut self) -> Result<TypeRef> {
        self.skip_ws();
        match self.peek() {
            Some(b'[') => {
                self.pos += 1;
                let component = self.parse_ref()?;
                self.expect(b']')?;
                Ok(TypeRef::array(component))
            }
            Some(b'_') if !self.ident_continues(self.pos + 1) => {
                self.pos += 1;
                self.skip_ws();
                if self.peek() == Some(b':') {
                    self.pos += 1;
                    let upper = self.parse_ref()?;
                    Ok(TypeRef::wildcard_with_upper(upper))
                } else {
                    Ok(TypeRef::wildcard())
                }
            }
            Some(c) if c.is_ascii_alphabetic() || c == b'_' => {
                let name = self.parse_ident();
                self.skip_ws();
                if self.peek() == Some(b'<') {
                    self.pos += 1;
                    let mut args = vec![self.parse_ref()?];
                    loop {
                        self.skip_ws();
                        match self.peek() {
                            Some(b',') => {
                                self.pos += 1;
                                args.push(self.parse_ref()?);
                            }
                            Some(b'>') => {
                                self.pos += 1;
                                break;
                            }
                            _ => return Err(self.error()),
                        }
                    }
                    Ok(TypeRef::parameterized(name, args))
                } else {
                    Ok(TypeRef::named(name))
                }
            }
            _ => Err(self.error()),
        }
    }

    fn ident_continues(&self, pos: usize) -> bool {
        matches!(self.bytes.get(pos), Some(c) if c.is_ascii_alphanumeric() || *c == b'_')
    }

    fn parse_ident(&mut self) -> String {
        let start = self.pos;
        while self.ident_continues(self.pos) {
            self.pos += 1;
        }
        self.text[start..self.pos].to_string()
    }
}
