use serde::Deserialize;
use serde_json::{Map, Number, Value};
use std::fmt;

/// A leaf value. JSON `null` is kept as a leaf so it renders instead of
/// breaking the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Number(Number),
    Bool(bool),
    Null,
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Null => f.write_str("null"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Scalar(Scalar),
    Record(Record),
    Sequence(Vec<Field>),
}

impl From<Value> for Field {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Field::Scalar(Scalar::Null),
            Value::Bool(b) => Field::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Field::Scalar(Scalar::Number(n)),
            Value::String(s) => Field::Scalar(Scalar::Text(s)),
            Value::Array(items) => Field::Sequence(items.into_iter().map(Field::from).collect()),
            Value::Object(map) => Field::Record(Record::from(map)),
        }
    }
}

/// An ordered set of named fields, in the order the source document listed
/// them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct Record {
    fields: Vec<(String, Field)>,
}

impl Record {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, field)| field)
    }

    /// Text form of the `id` field when it is a scalar.
    pub fn id(&self) -> Option<String> {
        match self.get("id")? {
            Field::Scalar(s) => Some(s.to_string()),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            fields: map
                .into_iter()
                .map(|(name, value)| (name, Field::from(value)))
                .collect(),
        }
    }
}

impl FromIterator<(String, Field)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Field)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NotARecord {
    pub found: &'static str,
}

impl fmt::Display for NotARecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected a JSON object, found {}", self.found)
    }
}

impl std::error::Error for NotARecord {}

impl TryFrom<Value> for Record {
    type Error = NotARecord;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let found = match value {
            Value::Object(map) => return Ok(Record::from(map)),
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "an array",
        };
        Err(NotARecord { found })
    }
}
