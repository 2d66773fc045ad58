//! Auxiliary payload stored alongside an authorization request.
//!
//! The storage contract does not constrain the shape of this data. Structured data is best kept
//! as json, anything else can be carried as an opaque value which is passed through untouched.
use std::any::{self, Any};
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::Value as Json;

/// Caller defined data attached to a session at creation and expected back at retrieval.
#[derive(Clone, Debug, PartialEq)]
pub enum Extra {
    /// No extra data.
    None,

    /// Structured data.
    Json(Json),

    /// Any other value, never inspected.
    Opaque(Opaque),
}

/// A shared value of arbitrary type.
///
/// Two opaque values are equal only if they are the same allocation. The name of the wrapped type
/// is kept for diagnostics.
#[derive(Clone)]
pub struct Opaque {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Extra {
    /// Wrap an arbitrary value.
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Extra::Opaque(Opaque::new(value))
    }

    /// Whether there is no data.
    pub fn is_none(&self) -> bool {
        match self {
            Extra::None => true,
            _ => false,
        }
    }

    /// The json content, if any.
    pub fn as_json(&self) -> Option<&Json> {
        match self {
            Extra::Json(json) => Some(json),
            _ => None,
        }
    }

    /// Borrow the opaque content as `T`.
    ///
    /// Returns `None` when this is not opaque data or holds a different type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Extra::Opaque(opaque) => opaque.downcast_ref(),
            _ => None,
        }
    }
}

impl Default for Extra {
    fn default() -> Self {
        Extra::None
    }
}

impl From<Json> for Extra {
    fn from(json: Json) -> Self {
        Extra::Json(json)
    }
}

impl Opaque {
    /// Move a value behind a shared pointer.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Opaque {
            value: Arc::new(value),
            type_name: any::type_name::<T>(),
        }
    }

    /// The name of the wrapped type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Borrow the content as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_tuple("Opaque").field(&self.type_name).finish()
    }
}

impl fmt::Display for Extra {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Extra::None => fmt.write_str("none"),
            Extra::Json(json) => write!(fmt, "{}", json),
            Extra::Opaque(opaque) => write!(fmt, "<{}>", opaque.type_name),
        }
    }
}

// Opaque data is written as its type name, the content stays hidden.
impl Serialize for Extra {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Extra::None => serializer.serialize_none(),
            Extra::Json(json) => json.serialize(serializer),
            Extra::Opaque(opaque) => serializer.collect_str(&format_args!("<{}>", opaque.type_name)),
        }
    }
}
