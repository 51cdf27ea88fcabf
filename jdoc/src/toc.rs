//! Heading anchors and the "on this page" index.

use jdoc_core::model::{ApiEndpointSpec, ContentItem, DescriptivePage};

/// GitHub-style heading slug: lowercase, keep alphanumerics, spaces and
/// hyphens, then turn spaces into hyphens.
pub fn slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() || c == ' ' || c == '-' {
            slug.push(c);
        }
    }
    slug.replace(' ', "-")
}

/// Markdown list entry linking to a heading on the same page.
pub fn render_toc_item(title: &str) -> String {
    format!("* [{}](#{})", title, slug(title))
}

/// Headings an endpoint page shows, in display order. Empty blocks are skipped.
pub fn endpoint_headings(spec: &ApiEndpointSpec) -> Vec<&'static str> {
    let mut headings = Vec::new();
    if !spec.param_fields.is_empty() {
        headings.push("Params");
    }
    if !spec.body_fields.is_empty() {
        headings.push("Body");
    }
    if !spec.requirements.is_empty() {
        headings.push("Requirements");
    }
    if !spec.valid_examples.is_empty() {
        headings.push("Valid Examples");
    }
    if !spec.invalid_examples.is_empty() {
        headings.push("Error Examples");
    }
    headings
}

/// Titled code blocks of a descriptive page.
pub fn page_headings(page: &DescriptivePage) -> Vec<&str> {
    page.content
        .iter()
        .filter_map(|item| match item {
            ContentItem::Code { title: Some(t), .. } => Some(t.as_str()),
            _ => None,
        })
        .collect()
}
