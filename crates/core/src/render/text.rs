use crate::render::{Group, RowBody};

const INDENT: &str = "  ";

/// Plain-text form of a rendered group, two spaces per nesting level.
pub fn to_text(group: &Group) -> String {
    let mut out = String::new();
    write_group(&mut out, group, 0);
    out
}

fn write_group(out: &mut String, group: &Group, depth: usize) {
    for row in &group.rows {
        out.push_str(&INDENT.repeat(depth));
        out.push_str(&row.label);
        out.push(':');
        match &row.body {
            RowBody::Value(v) => {
                out.push(' ');
                out.push_str(v);
                out.push('\n');
            }
            RowBody::Group(nested) => {
                out.push('\n');
                write_group(out, nested, depth + 1);
            }
        }
    }
}
