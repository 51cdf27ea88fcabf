//! Markdown renderer. Readable as-is in a terminal; `jdoc browse` uses it by default.
//!
//! Follows the narrow-layout rules of the HTML page: an open menu covers the
//! content, and the code toggle replaces the detail view with the code panel.

use jdoc_core::codegen::{pretty_json, Lang};
use jdoc_core::fields::DisplayRow;
use jdoc_core::model::{ContentItem, DescriptivePage, Example, Section};
use jdoc_core::surface::{EndpointView, Surface, View};

use crate::render::html::EMPTY_STATE;
use crate::render::{code_label, page_file, url_placeholders, Renderer};
use crate::toc;

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, surface: &Surface) -> String {
        let state = surface.state();
        let mut lines: Vec<String> = Vec::new();

        if state.mobile_menu_open() {
            render_navigation(&mut lines, surface);
        } else {
            match surface.view() {
                View::Page(page) => render_page(&mut lines, page),
                View::Endpoint(view) if view.showing_code_samples => {
                    lines.push("# Code Examples\n".to_string());
                    render_code_panel(&mut lines, &view);
                }
                View::Endpoint(view) => {
                    render_endpoint(&mut lines, &view);
                    lines.push("---\n".to_string());
                    render_code_panel(&mut lines, &view);
                }
                View::Empty => lines.push(format!("_{}_\n", EMPTY_STATE)),
            }
        }

        let mut output = lines.join("\n");
        if !output.ends_with('\n') {
            output.push('\n');
        }
        output
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

fn render_navigation(lines: &mut Vec<String>, surface: &Surface) {
    let site = surface.site();
    let active = surface.state().active_section();
    lines.push(format!("# {}\n", site.title()));
    for section in &site.sections {
        match section {
            Section::Leaf(leaf) => lines.push(nav_item("", &leaf.id, &leaf.title, active)),
            Section::Group(group) => {
                lines.push(format!("* **{}**", group.title));
                for child in &group.children {
                    lines.push(nav_item("  ", &child.id, &child.title, active));
                }
            }
        }
    }
    lines.push(String::new());
}

fn nav_item(indent: &str, id: &str, title: &str, active: &str) -> String {
    let marker = if id == active { " (current)" } else { "" };
    format!("{}* [{}]({}){}", indent, title, page_file(id, "md"), marker)
}

fn render_page(lines: &mut Vec<String>, page: &DescriptivePage) {
    lines.push(format!("# {}\n", page.title));
    if !page.description.is_empty() {
        lines.push(format!("{}\n", page.description));
    }
    on_this_page(lines, &toc::page_headings(page));

    for item in &page.content {
        match item {
            ContentItem::Paragraph(text) => lines.push(format!("{}\n", text)),
            ContentItem::Table { headers, rows } => {
                lines.push(table_row(headers.iter().map(String::as_str)));
                lines.push(table_row(headers.iter().map(|_| "---")));
                for row in rows {
                    lines.push(table_row(row.iter().map(String::as_str)));
                }
                lines.push(String::new());
            }
            ContentItem::List { items } => {
                for entry in items {
                    lines.push(format!("- {}", entry));
                }
                lines.push(String::new());
            }
            ContentItem::Code {
                title,
                description,
                label,
                code,
            } => {
                if let Some(title) = title {
                    lines.push(format!("### {}\n", title));
                }
                if let Some(description) = description {
                    lines.push(format!("{}\n", description));
                }
                lines.push(format!("**{}**\n", code_label(label.as_deref())));
                lines.push(fenced("", code));
            }
            ContentItem::Unsupported(_) => {}
        }
    }
}

fn render_endpoint(lines: &mut Vec<String>, view: &EndpointView) {
    let spec = view.spec;
    lines.push(format!("# {}\n", spec.title));
    lines.push(format!("`{}` {}\n", view.code.method, spec.url_definition));
    if !spec.description.is_empty() {
        lines.push(format!("{}\n", spec.description));
    }

    let placeholders = url_placeholders(&spec.url_definition);
    if !placeholders.is_empty() {
        let names: Vec<String> = placeholders.iter().map(|p| format!("`{}`", p)).collect();
        lines.push(format!("Path parameters: {}\n", names.join(", ")));
    }

    on_this_page(lines, &toc::endpoint_headings(spec));

    render_field_table(lines, "Params", &view.params);
    render_field_table(lines, "Body", &view.body);

    if !spec.requirements.is_empty() {
        lines.push("## Requirements\n".to_string());
        for requirement in &spec.requirements {
            lines.push(format!("- {}", requirement));
        }
        lines.push(String::new());
    }

    render_examples(lines, "Valid Examples", "Response", &spec.valid_examples);
    render_examples(lines, "Error Examples", "Error Response", &spec.invalid_examples);
}

fn on_this_page(lines: &mut Vec<String>, headings: &[&str]) {
    if headings.len() < 2 {
        return;
    }
    for heading in headings {
        lines.push(toc::render_toc_item(heading));
    }
    lines.push(String::new());
}

fn render_field_table(lines: &mut Vec<String>, heading: &str, rows: &[DisplayRow]) {
    if rows.is_empty() {
        return;
    }
    lines.push(format!("## {}\n", heading));
    lines.push("| Parameter | Type | Required | Description |".to_string());
    lines.push("| --- | --- | --- | --- |".to_string());
    for row in rows {
        let nested = if row.level > 0 { "↳ " } else { "" };
        lines.push(format!(
            "| {}{}`{}` | {} | {} | {} |",
            row.indent(),
            nested,
            row.name,
            row.kind,
            row.required,
            escape_cell(&row.description)
        ));
    }
    lines.push(String::new());
}

fn render_examples(lines: &mut Vec<String>, heading: &str, response_label: &str, examples: &[Example]) {
    if examples.is_empty() {
        return;
    }
    lines.push(format!("## {}\n", heading));
    for example in examples {
        lines.push(format!("### {}\n", example.title));
        if !example.description.is_empty() {
            lines.push(format!("{}\n", example.description));
        }
        if let Some(body) = &example.body_send {
            lines.push("**Request**\n".to_string());
            lines.push(fenced("json", &pretty_json(body)));
        }
        lines.push(format!("**{}**\n", response_label));
        lines.push(fenced("json", &pretty_json(&example.body_response)));
    }
}

fn render_code_panel(lines: &mut Vec<String>, view: &EndpointView) {
    let code = &view.code;
    lines.push("## Definition\n".to_string());
    lines.push(format!("`{}` {}\n", code.method, code.url));

    lines.push("## Example Request\n".to_string());
    let tabs: Vec<String> = Lang::ALL
        .iter()
        .map(|lang| {
            if *lang == code.tab {
                format!("**{}**", lang)
            } else {
                lang.to_string()
            }
        })
        .collect();
    lines.push(format!("{}\n", tabs.join(" | ")));
    lines.push(fenced(code.tab.syntax(), &code.snippet));

    if let Some(response) = &code.example_response {
        lines.push("## Example Response\n".to_string());
        lines.push(fenced("json", response));
    }
}

fn fenced(syntax: &str, body: &str) -> String {
    format!("```{}\n{}\n```\n", syntax, body)
}

fn table_row<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    let cells: Vec<String> = cells.map(escape_cell).collect();
    format!("| {} |", cells.join(" | "))
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdoc_core::model::Site;
    use serde_json::json;

    fn site() -> Site {
        serde_json::from_value(json!({
            "title": "Acme API",
            "sections": [
                {
                    "id": "getting-started",
                    "title": "Getting Started",
                    "descriptiveConfig": {
                        "title": "Welcome",
                        "description": "Start here",
                        "content": [
                            {"type": "table", "content": {"headers": ["Code", "Meaning"], "rows": [["401", "a|b"]]}},
                            {"type": "list", "content": {"items": ["one", "two"]}},
                            {"type": "code", "content": {"label": "Shell", "code": "npm i"}}
                        ]
                    }
                },
                {
                    "id": "users",
                    "title": "Users",
                    "type": "group",
                    "children": [{
                        "id": "post-user",
                        "title": "POST - User",
                        "config": {
                            "title": "Create user",
                            "method": "post",
                            "urlDefinition": "https://api.example.com/v1/orgs/{org}/users",
                            "requirements": [{"description": "admin token"}],
                            "validExamples": [{"title": "ok", "bodySend": {"name": "A"}, "bodyResponse": {"id": 1}}],
                            "invalidExamples": [{"title": "dup", "bodyResponse": {"success": false}}],
                            "characterJsonBodySend": [{
                                "field": "profile",
                                "type": "object",
                                "description": ["profile data"],
                                "characterJsonBodySend": [{"field": "bio", "type": "string", "required": false}]
                            }]
                        }
                    }]
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn page_content_items() {
        let site = site();
        let out = MarkdownRenderer.render(&Surface::new(&site));
        assert!(out.starts_with("# Welcome\n\nStart here\n"));
        assert!(out.contains("| Code | Meaning |\n| --- | --- |\n| 401 | a\\|b |\n"));
        assert!(out.contains("- one\n- two\n"));
        assert!(out.contains("**Shell**\n\n```\nnpm i\n```\n"));
    }

    #[test]
    fn unlabelled_code_block_falls_back_to_code() {
        let site: Site = serde_json::from_value(json!({
            "sections": [{
                "id": "getting-started",
                "title": "Getting Started",
                "descriptiveConfig": {"title": "Welcome", "content": [{"type": "code", "content": {"code": "npm i"}}]}
            }]
        }))
        .unwrap();
        let out = MarkdownRenderer.render(&Surface::new(&site));
        assert_eq!(out, "# Welcome\n\n**Code**\n\n```\nnpm i\n```\n");
    }

    #[test]
    fn endpoint_detail_and_code_panel() {
        let site = site();
        let mut surface = Surface::new(&site);
        surface.state_mut().select("post-user");
        let out = MarkdownRenderer.render(&surface);

        assert!(out.contains("`POST` https://api.example.com/v1/orgs/{org}/users\n"));
        assert!(out.contains("Path parameters: `org`\n"));
        assert!(out.contains("* [Body](#body)\n* [Requirements](#requirements)\n"));
        assert!(out.contains("| `profile` | object | Yes | profile data |\n"));
        assert!(out.contains("|   ↳ `bio` | string | No |  |\n"));
        assert!(out.contains("- admin token\n"));
        assert!(out.contains("**Request**\n\n```json\n{\n  \"name\": \"A\"\n}\n```\n"));
        assert!(out.contains("**Error Response**\n"));
        assert!(out.contains("**HTTP** | JavaScript | PHP | Python | Go\n"));
        assert!(out.contains("```http\nPOST https://api.example.com/v1/orgs/{org}/users\n"));
        assert!(out.contains("## Example Response\n\n```json\n{\n  \"id\": 1\n}\n```\n"));
    }

    #[test]
    fn code_toggle_replaces_detail() {
        let site = site();
        let mut surface = Surface::new(&site);
        surface.state_mut().select("post-user");
        surface.state_mut().toggle_code_samples();
        surface.state_mut().select_tab(Lang::Go);
        let out = MarkdownRenderer.render(&surface);
        assert!(out.starts_with("# Code Examples\n"));
        assert!(!out.contains("## Requirements"));
        assert!(out.contains("```go\npackage main\n"));
    }

    #[test]
    fn open_menu_covers_content() {
        let site = site();
        let mut surface = Surface::new(&site);
        surface.state_mut().open_mobile_menu();
        let out = MarkdownRenderer.render(&surface);
        assert_eq!(
            out,
            "# Acme API\n\n\
             * [Getting Started](getting-started.md) (current)\n\
             * **Users**\n\
             \x20\x20* [POST - User](post-user.md)\n"
        );
    }

    #[test]
    fn empty_state() {
        let site = site();
        let mut surface = Surface::new(&site);
        surface.state_mut().select("missing");
        let out = MarkdownRenderer.render(&surface);
        assert_eq!(out, format!("_{}_\n", EMPTY_STATE));
    }
}
