//! Content model: endpoint specs, descriptive pages and the navigation tree.
//!
//! Everything here is built once when the site configuration is loaded and is
//! read-only afterwards. Deserialization accepts the authoring shape
//! (camelCase keys, `config` / `descriptiveConfig` / `children` on sections)
//! and converts it into the typed tree, so the rest of the crate never sees a
//! section bound to two kinds of content or a group nested inside a group.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

/// Legacy description entry marking a field as required. Never displayed.
pub const REQUIRED_SENTINEL: &str = "REQUIRED";

/// Section shown when nothing else has been selected.
pub const DEFAULT_SECTION: &str = "getting-started";

/// Sidebar heading used when the site does not name itself.
pub const DEFAULT_TITLE: &str = "API Documentation";

// -- Fields and examples ------------------------------------------------------

/// One parameter or body field, possibly with nested children.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldDescriptor {
    pub field: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: Vec<String>,
    /// `None` counts as required; only an explicit `false` makes it optional.
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default, rename = "characterJsonBodySend")]
    pub body: Vec<FieldDescriptor>,
    #[serde(default, rename = "characterJsonParamsSend")]
    pub params: Vec<FieldDescriptor>,
}

impl FieldDescriptor {
    pub fn is_required(&self) -> bool {
        self.required != Some(false)
    }

    /// Description entries with the legacy sentinel removed, in author order.
    pub fn visible_description(&self) -> impl Iterator<Item = &str> {
        self.description
            .iter()
            .map(String::as_str)
            .filter(|entry| *entry != REQUIRED_SENTINEL)
    }
}

/// A request/response pair. Valid and invalid examples share this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Example {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub body_send: Option<Value>,
    #[serde(default)]
    pub body_response: Value,
}

// -- Endpoint specs -----------------------------------------------------------

/// Ordered header map. Author order is kept through every code sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new(entries: Vec<(String, String)>) -> Self {
        Self(entries)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        let entries = map
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect();
        Ok(Self(entries))
    }
}

/// Requirements may be authored as bare strings or `{ "description": ... }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawRequirement {
    Text(String),
    Described { description: String },
}

fn requirement_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let raw = Vec::<RawRequirement>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|r| match r {
            RawRequirement::Text(text) => text,
            RawRequirement::Described { description } => description,
        })
        .collect())
}

/// A documented REST endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEndpointSpec {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub method: String,
    pub url_definition: String,
    #[serde(default)]
    pub headers: Option<Headers>,
    #[serde(default, deserialize_with = "requirement_list")]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub valid_examples: Vec<Example>,
    #[serde(default)]
    pub invalid_examples: Vec<Example>,
    #[serde(default, rename = "characterJsonBodySend")]
    pub body_fields: Vec<FieldDescriptor>,
    #[serde(default, rename = "characterJsonParamsSend")]
    pub param_fields: Vec<FieldDescriptor>,
}

impl ApiEndpointSpec {
    /// HTTP verb as shown to readers.
    pub fn display_method(&self) -> String {
        self.method.to_uppercase()
    }

    pub fn badge(&self) -> MethodBadge {
        MethodBadge::for_method(&self.method)
    }
}

/// Color coding for the method badge. Matching is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodBadge {
    Get,
    Post,
    Put,
    Delete,
    Other,
}

impl MethodBadge {
    pub fn for_method(method: &str) -> Self {
        match method.to_lowercase().as_str() {
            "get" => MethodBadge::Get,
            "post" => MethodBadge::Post,
            "put" => MethodBadge::Put,
            "delete" => MethodBadge::Delete,
            _ => MethodBadge::Other,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            MethodBadge::Get => "green",
            MethodBadge::Post => "blue",
            MethodBadge::Put => "yellow",
            MethodBadge::Delete => "red",
            MethodBadge::Other => "gray",
        }
    }
}

// -- Descriptive pages --------------------------------------------------------

/// A narrative guide page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptivePage {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: Vec<ContentItem>,
}

/// One block of narrative content.
///
/// Authored as `{ "type": <tag>, "content": <payload> }`. A tag this crate does
/// not know becomes [`ContentItem::Unsupported`] and renders as nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum ContentItem {
    Paragraph(String),
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    List {
        items: Vec<String>,
    },
    Code {
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        code: String,
    },
    Unsupported(String),
}

#[derive(Deserialize)]
struct RawContentItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Value,
}

#[derive(Deserialize)]
struct TablePayload {
    #[serde(default)]
    headers: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<String>>,
}

#[derive(Deserialize)]
struct ListPayload {
    #[serde(default)]
    items: Vec<String>,
}

#[derive(Deserialize)]
struct CodePayload {
    title: Option<String>,
    description: Option<String>,
    label: Option<String>,
    code: String,
}

impl<'de> Deserialize<'de> for ContentItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawContentItem::deserialize(deserializer)?;
        ContentItem::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<RawContentItem> for ContentItem {
    type Error = Error;

    fn try_from(raw: RawContentItem) -> Result<Self, Self::Error> {
        let wrap = |source| Error::ContentItem {
            tag: raw.kind.clone(),
            source,
        };
        let item = match raw.kind.as_str() {
            "paragraph" => ContentItem::Paragraph(
                serde_json::from_value(raw.content.clone()).map_err(wrap)?,
            ),
            "table" => {
                let t: TablePayload = serde_json::from_value(raw.content.clone()).map_err(wrap)?;
                ContentItem::Table {
                    headers: t.headers,
                    rows: t.rows,
                }
            }
            "list" => {
                let l: ListPayload = serde_json::from_value(raw.content.clone()).map_err(wrap)?;
                ContentItem::List { items: l.items }
            }
            "code" => {
                let c: CodePayload = serde_json::from_value(raw.content.clone()).map_err(wrap)?;
                ContentItem::Code {
                    title: c.title,
                    description: c.description,
                    label: c.label,
                    code: c.code,
                }
            }
            other => ContentItem::Unsupported(other.to_string()),
        };
        Ok(item)
    }
}

// -- Navigation tree ----------------------------------------------------------

/// Content a leaf section is bound to.
#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    Endpoint(ApiEndpointSpec),
    Page(DescriptivePage),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeafSection {
    pub id: String,
    pub title: String,
    pub content: Bound,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupSection {
    pub id: String,
    pub title: String,
    pub children: Vec<LeafSection>,
}

/// A top-level navigation node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawSection")]
pub enum Section {
    Leaf(LeafSection),
    Group(GroupSection),
}

impl Section {
    pub fn id(&self) -> &str {
        match self {
            Section::Leaf(leaf) => &leaf.id,
            Section::Group(group) => &group.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Section::Leaf(leaf) => &leaf.title,
            Section::Group(group) => &group.title,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSection {
    id: String,
    title: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    config: Option<ApiEndpointSpec>,
    #[serde(default)]
    descriptive_config: Option<DescriptivePage>,
    #[serde(default)]
    children: Option<Vec<RawSection>>,
}

impl RawSection {
    fn is_group(&self) -> bool {
        self.kind.as_deref() == Some("group") || self.children.is_some()
    }

    fn into_leaf(self) -> Result<LeafSection, Error> {
        let content = match (self.config, self.descriptive_config) {
            (Some(_), Some(_)) => return Err(Error::BothBindings(self.id)),
            (None, None) => return Err(Error::NoBinding(self.id)),
            (Some(spec), None) => Bound::Endpoint(spec),
            (None, Some(page)) => Bound::Page(page),
        };
        Ok(LeafSection {
            id: self.id,
            title: self.title,
            content,
        })
    }
}

impl TryFrom<RawSection> for Section {
    type Error = Error;

    fn try_from(raw: RawSection) -> Result<Self, Self::Error> {
        if !raw.is_group() {
            return raw.into_leaf().map(Section::Leaf);
        }
        if raw.config.is_some() || raw.descriptive_config.is_some() {
            return Err(Error::GroupWithContent(raw.id));
        }
        let mut children = Vec::new();
        for child in raw.children.unwrap_or_default() {
            if child.is_group() {
                return Err(Error::NestedGroup {
                    group: raw.id,
                    child: child.id,
                });
            }
            children.push(child.into_leaf()?);
        }
        Ok(Section::Group(GroupSection {
            id: raw.id,
            title: raw.title,
            children,
        }))
    }
}

/// The whole documentation site as loaded from configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub default_section: Option<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Site {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    pub fn default_section(&self) -> &str {
        self.default_section.as_deref().unwrap_or(DEFAULT_SECTION)
    }
}
