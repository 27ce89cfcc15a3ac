//! Dynamic specimen values.
//!
//! Generated fixtures are represented as [`Value`]s: primitives carry their
//! randomized payloads, containers carry generated elements, and user types
//! become shared objects (`Rc<RefCell<ObjectData>>`) so that a value cached
//! mid-population is the same instance every later lookup observes. A
//! [`StandIn`] is the synthesized implementation of an interface or abstract
//! class: concrete members run their registered bodies, abstract members
//! hold slots filled after the stand-in is installed in the context.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;

use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;

use crate::descriptor::{TypeDescriptor, TypeRef};
use crate::errors::{Result, SpecimenError};
use crate::registry::MemberSpec;

/// A generated fixture value
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Char(char),
    Str(String),
    /// Arbitrary-precision integer, kept as its decimal digit string
    BigInt(String),
    /// Arbitrary-precision decimal, kept as its digit string
    Decimal(String),
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
    Duration(chrono::Duration),
    Path(PathBuf),
    Uri(String),
    EnumConstant {
        class: String,
        constant: String,
    },
    List(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Object(Rc<RefCell<ObjectData>>),
    StandIn(Rc<StandIn>),
}

/// Field storage for a generated object
#[derive(Clone, Debug)]
pub struct ObjectData {
    class: String,
    fields: IndexMap<String, Value>,
}

impl ObjectData {
    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn fields(&self) -> &IndexMap<String, Value> {
        &self.fields
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }
}

impl Value {
    /// An empty object shell for the given class, ready to be cached and
    /// then populated in place
    pub fn object(class: impl Into<String>) -> Self {
        Self::Object(Rc::new(RefCell::new(ObjectData {
            class: class.into(),
            fields: IndexMap::new(),
        })))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Reference identity: true only when both sides are the same shared
    /// object or stand-in instance
    pub fn same_instance(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b),
            (Self::StandIn(a), Self::StandIn(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Rc<RefCell<ObjectData>>> {
        match self {
            Self::Object(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_stand_in(&self) -> Option<&Rc<StandIn>> {
        match self {
            Self::StandIn(stand_in) => Some(stand_in),
            _ => None,
        }
    }

    /// Read a field of a generated object
    pub fn field(&self, name: &str) -> Option<Value> {
        match self {
            Self::Object(data) => data.borrow().fields.get(name).cloned(),
            _ => None,
        }
    }

    pub fn set_field(&self, name: impl Into<String>, value: Value) -> bool {
        match self {
            Self::Object(data) => {
                data.borrow_mut().set_field(name, value);
                true
            }
            _ => false,
        }
    }

    /// Invoke a member on a stand-in value
    pub fn invoke(&self, member: &str) -> Result<Value> {
        match self {
            Self::StandIn(stand_in) => stand_in.invoke(member),
            _ => Err(SpecimenError::UnknownMember {
                type_name: self.kind_name().to_string(),
                member: member.to_string(),
            }),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Float(_) => "float",
            Self::Char(_) => "char",
            Self::Str(_) => "string",
            Self::BigInt(_) => "bigint",
            Self::Decimal(_) => "decimal",
            Self::Timestamp(_) => "timestamp",
            Self::Date(_) => "date",
            Self::Duration(_) => "duration",
            Self::Path(_) => "path",
            Self::Uri(_) => "uri",
            Self::EnumConstant { .. } => "enum",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Object(_) => "object",
            Self::StandIn(_) => "stand-in",
        }
    }

    /// Cycle-safe JSON rendering for diagnostics and snapshots; back-edges
    /// in the object graph render as `"<cycle>"`.
    pub fn to_json(&self) -> serde_json::Value {
        let mut visited = HashSet::new();
        self.render_json(&mut visited)
    }

    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(&self.to_json()).unwrap_or_else(|_| "null".to_string())
    }

    fn render_json(&self, visited: &mut HashSet<usize>) -> serde_json::Value {
        use serde_json::json;
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => json!(b),
            Self::Int(i) => json!(i),
            Self::Uint(u) => json!(u),
            Self::Float(f) => json!(f),
            Self::Char(c) => json!(c.to_string()),
            Self::Str(s) => json!(s),
            Self::BigInt(digits) => json!(digits),
            Self::Decimal(digits) => json!(digits),
            Self::Timestamp(ts) => json!(ts.to_rfc3339()),
            Self::Date(date) => json!(date.to_string()),
            Self::Duration(duration) => json!(duration.num_seconds()),
            Self::Path(path) => json!(path.display().to_string()),
            Self::Uri(uri) => json!(uri),
            Self::EnumConstant { class, constant } => json!(format!("{class}::{constant}")),
            Self::List(items) => serde_json::Value::Array(
                items.iter().map(|v| v.render_json(visited)).collect(),
            ),
            Self::Map(entries) => serde_json::Value::Array(
                entries
                    .iter()
                    .map(|(k, v)| json!([k.render_json(visited), v.render_json(visited)]))
                    .collect(),
            ),
            Self::Object(data) => {
                let key = Rc::as_ptr(data) as usize;
                if !visited.insert(key) {
                    return json!("<cycle>");
                }
                let borrowed = data.borrow();
                let mut map = serde_json::Map::new();
                for (name, value) in &borrowed.fields {
                    map.insert(name.clone(), value.render_json(visited));
                }
                visited.remove(&key);
                serde_json::Value::Object(map)
            }
            Self::StandIn(stand_in) => {
                let key = Rc::as_ptr(stand_in) as usize;
                if !visited.insert(key) {
                    return json!("<cycle>");
                }
                let mut map = serde_json::Map::new();
                for member in &stand_in.members {
                    let rendered = match &member.body {
                        Some(_) => json!("<concrete>"),
                        None => member
                            .slot
                            .borrow()
                            .as_ref()
                            .map(|v| v.render_json(visited))
                            .unwrap_or(serde_json::Value::Null),
                    };
                    map.insert(member.name.clone(), rendered);
                }
                visited.remove(&key);
                serde_json::Value::Object(map)
            }
        }
    }
}

/// Synthesized implementation of an abstract type.
///
/// Built from the type's registered member table: a member with a body keeps
/// its real logic, a member without one gets a generated value of its
/// declared return type once the stand-in has been installed in the context.
pub struct StandIn {
    descriptor: TypeDescriptor,
    members: Vec<StandInMember>,
}

struct StandInMember {
    name: String,
    returns: TypeRef,
    body: Option<crate::registry::MemberBody>,
    slot: RefCell<Option<Value>>,
}

impl StandIn {
    pub(crate) fn from_members(descriptor: TypeDescriptor, members: &[MemberSpec]) -> Self {
        Self {
            members: members
                .iter()
                .map(|spec| StandInMember {
                    name: spec.name.clone(),
                    returns: spec.returns.clone(),
                    body: spec.body.clone(),
                    slot: RefCell::new(None),
                })
                .collect(),
            descriptor,
        }
    }

    /// The abstract type this stand-in implements
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn member_names(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.name.as_str()).collect()
    }

    /// Invoke a member: concrete members run their registered body, abstract
    /// members return their populated slot (Null while still mid-population).
    pub fn invoke(&self, member: &str) -> Result<Value> {
        let found = self
            .members
            .iter()
            .find(|m| m.name == member)
            .ok_or_else(|| SpecimenError::UnknownMember {
                type_name: self.descriptor.display_name(),
                member: member.to_string(),
            })?;
        match &found.body {
            Some(body) => Ok(body(self)),
            None => Ok(found.slot.borrow().clone().unwrap_or(Value::Null)),
        }
    }

    /// Abstract members whose slots are still unfilled
    pub(crate) fn pending_members(&self) -> Vec<(String, TypeRef)> {
        self.members
            .iter()
            .filter(|m| m.body.is_none() && m.slot.borrow().is_none())
            .map(|m| (m.name.clone(), m.returns.clone()))
            .collect()
    }

    pub(crate) fn fill(&self, member: &str, value: Value) {
        if let Some(found) = self.members.iter().find(|m| m.name == member) {
            *found.slot.borrow_mut() = Some(value);
        }
    }
}

impl fmt::Debug for StandIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StandIn")
            .field("descriptor", &self.descriptor)
            .field("members", &self.member_names())
            .finish()
    }
}
