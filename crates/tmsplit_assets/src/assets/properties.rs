//! Custom properties attached to maps, layers, objects and tilesets.
//!
//! Tiled stores properties as a list of `{ name, type, value }` records where
//! the meaning of `value` depends on `type`. Here the pair is folded into a
//! closed [`PropertyValue`] enum so a mismatched value is rejected when the
//! map is decoded instead of surfacing later.

use serde::{Deserialize, Serialize};

/// An ordered list of named properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(pub Vec<Property>);

impl Properties {
    /// Create an empty property list.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.0.iter()
    }

    pub fn push(&mut self, name: impl Into<String>, value: PropertyValue) {
        self.0.push(Property {
            name: name.into(),
            value,
        });
    }

    /// Get the value of the first property called `name`.
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.0.iter().find(|p| p.name == name).map(|p| &p.value)
    }

    /// Check for a string-typed property with exactly this value.
    ///
    /// Non-string properties never match, so an `int` property holding `1`
    /// is not equal to the string `"1"`.
    pub fn has_string(&self, name: &str, value: &str) -> bool {
        self.0.iter().any(|p| {
            p.name == name && matches!(&p.value, PropertyValue::String(s) if s == value)
        })
    }
}

impl FromIterator<Property> for Properties {
    fn from_iter<I: IntoIterator<Item = Property>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A single named property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawProperty", into = "RawProperty")]
pub struct Property {
    pub name: String,
    pub value: PropertyValue,
}

/// Typed property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Hex color as written by Tiled, `#AARRGGBB` or `#RRGGBB`.
    Color(String),
    /// Path relative to the file that declared it.
    File(String),
    /// Reference to another object by id (0 = none).
    Object(u32),
    /// Custom class instance; members are kept as written.
    Class {
        property_type: String,
        members: serde_json::Map<String, serde_json::Value>,
    },
}

impl PropertyValue {
    /// The Tiled `type` tag for this value.
    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::String(_) => PropertyKind::String,
            PropertyValue::Int(_) => PropertyKind::Int,
            PropertyValue::Float(_) => PropertyKind::Float,
            PropertyValue::Bool(_) => PropertyKind::Bool,
            PropertyValue::Color(_) => PropertyKind::Color,
            PropertyValue::File(_) => PropertyKind::File,
            PropertyValue::Object(_) => PropertyKind::Object,
            PropertyValue::Class { .. } => PropertyKind::Class,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) | PropertyValue::Color(s) | PropertyValue::File(s) => Some(s),
            _ => None,
        }
    }
}

/// Property type tags used on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    #[default]
    String,
    Int,
    Float,
    Bool,
    Color,
    File,
    Object,
    Class,
}

/// Wire shape of a property record.
#[derive(Serialize, Deserialize)]
struct RawProperty {
    name: String,
    #[serde(rename = "type", default)]
    kind: PropertyKind,
    #[serde(rename = "propertytype", default, skip_serializing_if = "Option::is_none")]
    property_type: Option<String>,
    #[serde(default)]
    value: serde_json::Value,
}

impl TryFrom<RawProperty> for Property {
    type Error = String;

    fn try_from(raw: RawProperty) -> Result<Self, Self::Error> {
        use serde_json::Value;

        let mismatch = |expected: &str| {
            format!(
                "property '{}' of type {:?} has a non-{} value: {}",
                raw.name, raw.kind, expected, raw.value
            )
        };

        let value = match (raw.kind, &raw.value) {
            (PropertyKind::String, Value::String(s)) => PropertyValue::String(s.clone()),
            // Tiled omits empty string values in some exports
            (PropertyKind::String, Value::Null) => PropertyValue::String(String::new()),
            (PropertyKind::Int, Value::Number(n)) => {
                PropertyValue::Int(n.as_i64().ok_or_else(|| mismatch("integer"))?)
            }
            (PropertyKind::Float, Value::Number(n)) => {
                PropertyValue::Float(n.as_f64().ok_or_else(|| mismatch("float"))?)
            }
            (PropertyKind::Bool, Value::Bool(b)) => PropertyValue::Bool(*b),
            (PropertyKind::Color, Value::String(s)) => PropertyValue::Color(s.clone()),
            (PropertyKind::File, Value::String(s)) => PropertyValue::File(s.clone()),
            (PropertyKind::Object, Value::Number(n)) => PropertyValue::Object(
                n.as_u64()
                    .and_then(|id| u32::try_from(id).ok())
                    .ok_or_else(|| mismatch("object id"))?,
            ),
            (PropertyKind::Class, Value::Object(members)) => PropertyValue::Class {
                property_type: raw.property_type.clone().unwrap_or_default(),
                members: members.clone(),
            },
            (PropertyKind::Class, Value::Null) => PropertyValue::Class {
                property_type: raw.property_type.clone().unwrap_or_default(),
                members: serde_json::Map::new(),
            },
            (kind, _) => return Err(mismatch(&format!("{kind:?}").to_lowercase())),
        };

        Ok(Property {
            name: raw.name,
            value,
        })
    }
}

impl From<Property> for RawProperty {
    fn from(property: Property) -> Self {
        use serde_json::Value;

        let kind = property.value.kind();
        let (property_type, value) = match property.value {
            PropertyValue::String(s) | PropertyValue::Color(s) | PropertyValue::File(s) => {
                (None, Value::String(s))
            }
            PropertyValue::Int(i) => (None, Value::from(i)),
            PropertyValue::Float(f) => (None, Value::from(f)),
            PropertyValue::Bool(b) => (None, Value::Bool(b)),
            PropertyValue::Object(id) => (None, Value::from(id)),
            PropertyValue::Class {
                property_type,
                members,
            } => (Some(property_type), Value::Object(members)),
        };

        RawProperty {
            name: property.name,
            kind,
            property_type,
            value,
        }
    }
}
