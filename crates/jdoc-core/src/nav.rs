//! Maps the selected section id to its bound content.

use std::collections::HashSet;

use crate::model::{ApiEndpointSpec, Bound, DescriptivePage, Section};

/// Content bound to the active section, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Active<'a> {
    Endpoint(&'a ApiEndpointSpec),
    Page(&'a DescriptivePage),
    /// Unknown id, or a group header. Rendered as the neutral empty state.
    Nothing,
}

impl<'a> Active<'a> {
    pub fn spec(self) -> Option<&'a ApiEndpointSpec> {
        match self {
            Active::Endpoint(spec) => Some(spec),
            _ => None,
        }
    }

    pub fn page(self) -> Option<&'a DescriptivePage> {
        match self {
            Active::Page(page) => Some(page),
            _ => None,
        }
    }
}

impl<'a> From<&'a Bound> for Active<'a> {
    fn from(bound: &'a Bound) -> Self {
        match bound {
            Bound::Endpoint(spec) => Active::Endpoint(spec),
            Bound::Page(page) => Active::Page(page),
        }
    }
}

/// Locate the content for `active_id`.
///
/// Sections are scanned in order. A group's children are checked before the
/// group's own id, and the first match wins. Duplicate ids resolve to the
/// first occurrence in that order.
pub fn resolve<'a>(sections: &'a [Section], active_id: &str) -> Active<'a> {
    for section in sections {
        match section {
            Section::Group(group) => {
                if let Some(child) = group.children.iter().find(|c| c.id == active_id) {
                    return Active::from(&child.content);
                }
                if group.id == active_id {
                    return Active::Nothing;
                }
            }
            Section::Leaf(leaf) => {
                if leaf.id == active_id {
                    return Active::from(&leaf.content);
                }
            }
        }
    }
    Active::Nothing
}

/// Display title of the section with `id`, using the same scan order as [`resolve`].
pub fn find_title<'a>(sections: &'a [Section], id: &str) -> Option<&'a str> {
    for section in sections {
        if let Section::Group(group) = section {
            if let Some(child) = group.children.iter().find(|c| c.id == id) {
                return Some(&child.title);
            }
        }
        if section.id() == id {
            return Some(section.title());
        }
    }
    None
}

/// Every id that resolves to content, in sidebar order.
pub fn leaf_ids(sections: &[Section]) -> Vec<&str> {
    let mut ids = Vec::new();
    for section in sections {
        match section {
            Section::Leaf(leaf) => ids.push(leaf.id.as_str()),
            Section::Group(group) => ids.extend(group.children.iter().map(|c| c.id.as_str())),
        }
    }
    ids
}

/// Ids that appear more than once anywhere in the tree, each reported once.
pub fn duplicate_ids(sections: &[Section]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut dups = Vec::new();
    for section in sections {
        let mut ids = vec![section.id()];
        if let Section::Group(group) = section {
            ids.extend(group.children.iter().map(|c| c.id.as_str()));
        }
        for id in ids {
            if !seen.insert(id) && !dups.contains(&id) {
                dups.push(id);
            }
        }
    }
    dups
}
