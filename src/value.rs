use serde::Serialize;

use crate::TagType;

/// A fully decoded NBT tag: its type, its name and its value.
///
/// Serializes to JSON as
///
/// ```txt
/// { "tagType": 1, "name": "a", "value": 7 }
/// ```
///
/// End tags have neither name nor value, so both fields are left out for them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NbtTag {
    #[serde(rename = "tagType")]
    pub tag_type: TagType,

    /// `None` only for End tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Payload::is_end")]
    pub value: Payload,
}

impl NbtTag {
    /// The name of the tag, or the empty string for End tags.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Find a direct child of a compound tag by name.
    pub fn get(&self, name: &str) -> Option<&NbtTag> {
        match &self.value {
            Payload::Compound(children) => children.iter().find(|c| c.name() == name),
            _ => None,
        }
    }
}

/// The elements of an NBT list. Elements are anonymous, so only their values
/// are kept.
///
/// Serializes to JSON as `{ "tagListType": 3, "list": [1, 2] }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagList {
    #[serde(rename = "tagListType")]
    pub element_type: TagType,

    #[serde(rename = "list")]
    pub elements: Vec<Payload>,
}

/// The value part of a tag. Which variant a tag has is decided entirely by
/// its tag type.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(TagList),
    /// Children in the order they appeared, without the closing End tag.
    Compound(Vec<NbtTag>),
    IntArray(Vec<i32>),
}

impl Payload {
    pub fn tag_type(&self) -> TagType {
        match self {
            Payload::End => TagType::End,
            Payload::Byte(_) => TagType::Byte,
            Payload::Short(_) => TagType::Short,
            Payload::Int(_) => TagType::Int,
            Payload::Long(_) => TagType::Long,
            Payload::Float(_) => TagType::Float,
            Payload::Double(_) => TagType::Double,
            Payload::ByteArray(_) => TagType::ByteArray,
            Payload::String(_) => TagType::String,
            Payload::List(_) => TagType::List,
            Payload::Compound(_) => TagType::Compound,
            Payload::IntArray(_) => TagType::IntArray,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Payload::End)
    }

    /// Any of the integer types, widened to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Payload::Byte(v) => Some(v.into()),
            Payload::Short(v) => Some(v.into()),
            Payload::Int(v) => Some(v.into()),
            Payload::Long(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Payload::Float(v) => Some(v.into()),
            Payload::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Payload::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Serialize for Payload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Payload::End => serializer.serialize_unit(),
            Payload::Byte(v) => serializer.serialize_i8(*v),
            Payload::Short(v) => serializer.serialize_i16(*v),
            Payload::Int(v) => serializer.serialize_i32(*v),
            Payload::Long(v) => serializer.serialize_i64(*v),
            Payload::Float(v) => serializer.serialize_f32(*v),
            Payload::Double(v) => serializer.serialize_f64(*v),
            Payload::ByteArray(v) => serializer.collect_seq(v),
            Payload::String(v) => serializer.serialize_str(v),
            Payload::List(v) => v.serialize(serializer),
            Payload::Compound(v) => serializer.collect_seq(v),
            Payload::IntArray(v) => serializer.collect_seq(v),
        }
    }
}
