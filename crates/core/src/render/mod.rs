//! Record → labeled tree rendering.
//!
//! The output is plain data. The web crate turns it into HTML and
//! [`text::to_text`] turns it into indented lines for the terminal.

pub mod text;

use crate::domain::record::{Field, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nesting {
    TopLevel,
    Nested,
}

impl Nesting {
    pub fn margin_bottom_rem(self) -> u8 {
        match self {
            Nesting::TopLevel => 5,
            Nesting::Nested => 1,
        }
    }

    pub fn margin_left_rem(self) -> u8 {
        match self {
            Nesting::TopLevel => 0,
            Nesting::Nested => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub nesting: Nesting,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Stable identity within the page: `{id}-{field}` at the top level,
    /// the bare field name below it.
    pub key: String,
    pub label: String,
    pub body: RowBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowBody {
    Value(String),
    Group(Group),
}

impl Row {
    /// Scalar rows render label and value on one line.
    pub fn is_inline(&self) -> bool {
        matches!(self.body, RowBody::Value(_))
    }
}

pub fn render_record(record: &Record, nesting: Nesting) -> Group {
    let id = match nesting {
        Nesting::TopLevel => record.id(),
        Nesting::Nested => None,
    };

    let rows = record
        .iter()
        .map(|(name, field)| {
            let key = match &id {
                Some(id) => format!("{id}-{name}"),
                None => name.to_string(),
            };
            render_field(name.to_string(), key, field)
        })
        .collect();

    Group { nesting, rows }
}

/// One top-level group per record, in order.
pub fn render_records(records: &[Record]) -> Vec<Group> {
    records
        .iter()
        .map(|r| render_record(r, Nesting::TopLevel))
        .collect()
}

fn render_field(label: String, key: String, field: &Field) -> Row {
    let body = match field {
        Field::Scalar(value) => RowBody::Value(value.to_string()),
        Field::Record(nested) => RowBody::Group(render_record(nested, Nesting::Nested)),
        Field::Sequence(items) => RowBody::Group(render_sequence(items)),
    };
    Row { key, label, body }
}

// Elements are labeled by index and rendered like fields of a nested record.
fn render_sequence(items: &[Field]) -> Group {
    let rows = items
        .iter()
        .enumerate()
        .map(|(i, item)| render_field(i.to_string(), i.to_string(), item))
        .collect();

    Group {
        nesting: Nesting::Nested,
        rows,
    }
}
