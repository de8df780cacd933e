use serde::{Deserialize, Serialize};

use geo_types::Geometry;
use uuid::Uuid;

/// A single heterogeneous attribute value.
///
/// Feature attributes and node extra-attributes are opaque to the revision
/// model: it stores them, hashes them (via the external serializer), and
/// hands out deep copies. Geometries are carried as `geo-types` values
/// behind a `Box`; cloning a `Value` always yields an independent copy, which
/// is the defensive-copy guarantee every read boundary relies on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    Uuid(Uuid),
    Geometry(Box<Geometry<f64>>),
}

impl Value {
    /// The kind tag for this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Long(_) => ValueKind::Long,
            Self::Float(_) => ValueKind::Float,
            Self::Double(_) => ValueKind::Double,
            Self::String(_) => ValueKind::String,
            Self::Bytes(_) => ValueKind::Bytes,
            Self::Uuid(_) => ValueKind::Uuid,
            Self::Geometry(_) => ValueKind::Geometry,
        }
    }

    /// Returns `true` for the null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<Geometry<f64>> for Value {
    fn from(g: Geometry<f64>) -> Self {
        Self::Geometry(Box::new(g))
    }
}

/// Discriminator for [`Value`] variants, used in schema descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Long,
    Float,
    Double,
    String,
    Bytes,
    Uuid,
    Geometry,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Uuid => "uuid",
            Self::Geometry => "geometry",
        };
        write!(f, "{name}")
    }
}
