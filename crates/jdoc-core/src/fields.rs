//! Flattens nested field descriptors into table rows.
//!
//! A field may carry two independent child lists: nested body fields and
//! nested param fields. Both are emitted after the field's own row, body block
//! first, each one level deeper. Traversal is pre-order and keeps author
//! order at every level.

use std::fmt;

use serde::Serialize;

use crate::model::FieldDescriptor;

/// Separator placed between the visible description entries.
pub const DESCRIPTION_JOINER: &str = ", ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RequiredLabel {
    Yes,
    No,
}

impl RequiredLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            RequiredLabel::Yes => "Yes",
            RequiredLabel::No => "No",
        }
    }
}

impl fmt::Display for RequiredLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub required: RequiredLabel,
    pub description: String,
    /// Nesting depth. Cosmetic only.
    pub level: usize,
}

impl DisplayRow {
    pub fn from_field(field: &FieldDescriptor, level: usize) -> Self {
        let required = if field.is_required() {
            RequiredLabel::Yes
        } else {
            RequiredLabel::No
        };
        Self {
            name: field.field.clone(),
            kind: field.kind.clone(),
            required,
            description: field
                .visible_description()
                .collect::<Vec<_>>()
                .join(DESCRIPTION_JOINER),
            level,
        }
    }

    /// Leading whitespace for plain-text tables, two spaces per level.
    pub fn indent(&self) -> String {
        "  ".repeat(self.level)
    }
}

/// Flatten `fields` into display rows, starting at depth `level`.
///
/// Uses an explicit stack, so depth is limited by memory only.
pub fn flatten(fields: &[FieldDescriptor], level: usize) -> Vec<DisplayRow> {
    let mut rows = Vec::new();
    let mut stack = vec![(fields.iter(), level)];

    while let Some((siblings, depth)) = stack.last_mut() {
        let depth = *depth;
        let Some(field) = siblings.next() else {
            stack.pop();
            continue;
        };
        rows.push(DisplayRow::from_field(field, depth));

        // Pushed in reverse so the body block drains before the params block.
        if !field.params.is_empty() {
            stack.push((field.params.iter(), depth + 1));
        }
        if !field.body.is_empty() {
            stack.push((field.body.iter(), depth + 1));
        }
    }

    rows
}

/// Number of descriptors in the whole tree, i.e. the row count `flatten` yields.
pub fn tree_size(fields: &[FieldDescriptor]) -> usize {
    fields
        .iter()
        .map(|f| 1 + tree_size(&f.body) + tree_size(&f.params))
        .sum()
}
