//! HTML renderer. Produces a standalone page with sidebar, content and code panel.
//!
//! Output is static. Language tabs are radio inputs styled with CSS; a short
//! inline script wires the copy buttons and the two mobile toggles.

use jdoc_core::codegen::{self, pretty_json, Lang};
use jdoc_core::fields::DisplayRow;
use jdoc_core::model::{ContentItem, DescriptivePage, Example, Section};
use jdoc_core::surface::{CodePanel, EndpointView, Surface, View};

use crate::render::{code_label, mark_placeholders, page_file, Renderer};
use crate::toc;

pub const EMPTY_STATE: &str = "Select an endpoint from the sidebar to view its documentation.";

pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, surface: &Surface) -> String {
        let site = surface.site();
        let state = surface.state();
        let view = surface.view();
        let mut out = String::new();

        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        out.push_str("<meta charset=\"utf-8\">\n");
        out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        let title = match surface.active_title() {
            Some(section) => format!("{} - {}", section, site.title()),
            None => site.title().to_string(),
        };
        out.push_str(&format!("<title>{}</title>\n", html_escape(&title)));
        out.push_str("<style>\n");
        out.push_str(STYLE);
        out.push_str("</style>\n");
        out.push_str("</head>\n");

        let mut classes = Vec::new();
        if state.mobile_menu_open() {
            classes.push("menu-open");
        }
        if state.showing_code_samples() {
            classes.push("code-open");
        }
        out.push_str(&format!("<body class=\"{}\">\n", classes.join(" ")));

        // Mobile header
        out.push_str("<header class=\"mobile-bar\">\n");
        out.push_str("  <button type=\"button\" class=\"menu-toggle\" aria-label=\"Toggle navigation\">&#9776;</button>\n");
        out.push_str(&format!("  <span class=\"site-title\">{}</span>\n", html_escape(site.title())));
        if matches!(view, View::Endpoint(_)) {
            out.push_str("  <button type=\"button\" class=\"code-toggle\">Code</button>\n");
        }
        out.push_str("</header>\n");

        out.push_str("<div class=\"layout\">\n");
        render_sidebar(&mut out, site.title(), &site.sections, state.active_section());

        out.push_str("<main class=\"content\">\n");
        match &view {
            View::Page(page) => render_page(&mut out, page),
            View::Endpoint(endpoint) => render_endpoint(&mut out, endpoint),
            View::Empty => {
                out.push_str(&format!("<p class=\"empty\">{}</p>\n", EMPTY_STATE));
            }
        }
        out.push_str("</main>\n");

        if let View::Endpoint(endpoint) = &view {
            render_code_panel(&mut out, endpoint);
        }

        out.push_str("</div>\n");
        out.push_str("<script>\n");
        out.push_str(SCRIPT);
        out.push_str("</script>\n");
        out.push_str("</body>\n</html>\n");
        out
    }

    fn file_extension(&self) -> &str {
        "html"
    }
}

// -- Sidebar ------------------------------------------------------------------

fn render_sidebar(out: &mut String, title: &str, sections: &[Section], active: &str) {
    out.push_str("<nav class=\"sidebar\">\n");
    out.push_str(&format!("<h1>{}</h1>\n<ul>\n", html_escape(title)));
    for section in sections {
        match section {
            Section::Leaf(leaf) => {
                out.push_str(&nav_link(&leaf.id, &leaf.title, active));
            }
            Section::Group(group) => {
                out.push_str(&format!(
                    "  <li class=\"group\"><span>{}</span>\n  <ul>\n",
                    html_escape(&group.title)
                ));
                for child in &group.children {
                    out.push_str("  ");
                    out.push_str(&nav_link(&child.id, &child.title, active));
                }
                out.push_str("  </ul></li>\n");
            }
        }
    }
    out.push_str("</ul>\n</nav>\n");
}

fn nav_link(id: &str, title: &str, active: &str) -> String {
    let class = if id == active { " class=\"active\"" } else { "" };
    format!(
        "  <li><a href=\"{}\"{}>{}</a></li>\n",
        html_escape(&page_file(id, "html")),
        class,
        html_escape(title)
    )
}

// -- Descriptive pages --------------------------------------------------------

fn render_page(out: &mut String, page: &DescriptivePage) {
    out.push_str(&format!("<h1>{}</h1>\n", html_escape(&page.title)));
    if !page.description.is_empty() {
        out.push_str(&format!("<p class=\"lead\">{}</p>\n", html_escape(&page.description)));
    }
    on_this_page(out, &toc::page_headings(page));

    let mut code_index = 0;
    for item in &page.content {
        match item {
            ContentItem::Paragraph(text) => {
                out.push_str(&format!("<p>{}</p>\n", html_escape(text)));
            }
            ContentItem::Table { headers, rows } => {
                out.push_str("<table>\n<thead><tr>");
                for header in headers {
                    out.push_str(&format!("<th>{}</th>", html_escape(header)));
                }
                out.push_str("</tr></thead>\n<tbody>\n");
                for row in rows {
                    out.push_str("<tr>");
                    for cell in row {
                        out.push_str(&format!("<td>{}</td>", html_escape(cell)));
                    }
                    out.push_str("</tr>\n");
                }
                out.push_str("</tbody>\n</table>\n");
            }
            ContentItem::List { items } => {
                out.push_str("<ul>\n");
                for entry in items {
                    out.push_str(&format!("  <li>{}</li>\n", html_escape(entry)));
                }
                out.push_str("</ul>\n");
            }
            ContentItem::Code {
                title,
                description,
                label,
                code,
            } => {
                if let Some(title) = title {
                    out.push_str(&format!(
                        "<h3 id=\"{}\">{}</h3>\n",
                        toc::slug(title),
                        html_escape(title)
                    ));
                }
                if let Some(description) = description {
                    out.push_str(&format!("<p>{}</p>\n", html_escape(description)));
                }
                out.push_str(&format!("<div class=\"code-block\" id=\"code-{}\">\n", code_index));
                out.push_str(&format!(
                    "<div class=\"code-label\">{}</div>\n",
                    html_escape(code_label(label.as_deref()))
                ));
                out.push_str(&copy_button());
                out.push_str(&format!("<pre><code>{}</code></pre>\n", html_escape(code)));
                out.push_str("</div>\n");
                code_index += 1;
            }
            ContentItem::Unsupported(_) => {}
        }
    }
}

// -- Endpoints ----------------------------------------------------------------

fn render_endpoint(out: &mut String, view: &EndpointView) {
    let spec = view.spec;
    out.push_str(&format!("<h1>{}</h1>\n", html_escape(&spec.title)));
    out.push_str(&format!(
        "<div class=\"definition\">{} <code class=\"url\">{}</code></div>\n",
        method_badge(&view.code),
        highlight_url(&spec.url_definition)
    ));
    if !spec.description.is_empty() {
        out.push_str(&format!("<p class=\"lead\">{}</p>\n", html_escape(&spec.description)));
    }

    on_this_page(out, &toc::endpoint_headings(spec));

    render_field_table(out, "Params", &view.params);
    render_field_table(out, "Body", &view.body);

    if !spec.requirements.is_empty() {
        out.push_str("<h2 id=\"requirements\">Requirements</h2>\n<ul>\n");
        for requirement in &spec.requirements {
            out.push_str(&format!("  <li>{}</li>\n", html_escape(requirement)));
        }
        out.push_str("</ul>\n");
    }

    render_examples(out, "Valid Examples", "Response", &spec.valid_examples);
    render_examples(out, "Error Examples", "Error Response", &spec.invalid_examples);
}

/// Jump list, shown once a page has more than one heading.
fn on_this_page(out: &mut String, headings: &[&str]) {
    if headings.len() < 2 {
        return;
    }
    out.push_str("<ul class=\"on-this-page\">\n");
    for heading in headings {
        out.push_str(&format!(
            "  <li><a href=\"#{}\">{}</a></li>\n",
            toc::slug(heading),
            html_escape(heading)
        ));
    }
    out.push_str("</ul>\n");
}

fn render_field_table(out: &mut String, heading: &str, rows: &[DisplayRow]) {
    if rows.is_empty() {
        return;
    }
    out.push_str(&format!("<h2 id=\"{}\">{}</h2>\n", toc::slug(heading), heading));
    out.push_str("<table class=\"fields\">\n");
    out.push_str("<thead><tr><th>Parameter</th><th>Type</th><th>Required</th><th>Description</th></tr></thead>\n<tbody>\n");
    for row in rows {
        out.push_str(&format!(
            "<tr class=\"level-{}\"><td style=\"padding-left: {}em\"><code>{}</code></td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            row.level,
            0.5 + row.level as f32 * 1.5,
            html_escape(&row.name),
            html_escape(&row.kind),
            row.required,
            html_escape(&row.description)
        ));
    }
    out.push_str("</tbody>\n</table>\n");
}

fn render_examples(out: &mut String, heading: &str, response_label: &str, examples: &[Example]) {
    if examples.is_empty() {
        return;
    }
    out.push_str(&format!("<h2 id=\"{}\">{}</h2>\n", toc::slug(heading), heading));
    for example in examples {
        out.push_str("<div class=\"example\">\n");
        out.push_str(&format!("<h4>{}</h4>\n", html_escape(&example.title)));
        if !example.description.is_empty() {
            out.push_str(&format!("<p>{}</p>\n", html_escape(&example.description)));
        }
        if let Some(body) = &example.body_send {
            out.push_str("<div class=\"code-label\">Request</div>\n");
            out.push_str(&copy_button());
            out.push_str(&json_block(&pretty_json(body)));
        }
        out.push_str(&format!("<div class=\"code-label\">{}</div>\n", response_label));
        out.push_str(&copy_button());
        out.push_str(&json_block(&pretty_json(&example.body_response)));
        out.push_str("</div>\n");
    }
}

// -- Code panel ---------------------------------------------------------------

fn render_code_panel(out: &mut String, view: &EndpointView) {
    let code = &view.code;
    out.push_str("<aside class=\"code-panel\">\n");
    out.push_str("<h2 class=\"mobile-only\">Code Examples</h2>\n");

    out.push_str("<h3>Definition</h3>\n");
    out.push_str(&format!(
        "<div class=\"definition\">{} <code class=\"url\">{}</code> {}</div>\n",
        method_badge(code),
        highlight_url(&code.url),
        copy_button().trim_end()
    ));

    out.push_str("<h3>Example Request</h3>\n<div class=\"tabs\">\n");
    for lang in Lang::ALL {
        let checked = if lang == code.tab { " checked" } else { "" };
        out.push_str(&format!(
            "<input type=\"radio\" name=\"lang\" id=\"tab-{0}\" class=\"tab-input\"{1}><label for=\"tab-{0}\">{2}</label>\n",
            lang.syntax(),
            checked,
            lang.label()
        ));
    }
    for lang in Lang::ALL {
        // The active tab reuses the snippet the surface already generated.
        let snippet = if lang == code.tab {
            code.snippet.clone()
        } else {
            codegen::generate(view.spec, lang)
        };
        out.push_str(&format!("<div class=\"tab-panel panel-{}\">\n", lang.syntax()));
        out.push_str(&copy_button());
        out.push_str(&format!(
            "<pre><code class=\"language-{}\">{}</code></pre>\n</div>\n",
            lang.syntax(),
            html_escape(&snippet)
        ));
    }
    out.push_str("</div>\n");

    if let Some(response) = &code.example_response {
        out.push_str("<h3>Example Response</h3>\n");
        out.push_str(&copy_button());
        out.push_str(&json_block(response));
    }
    out.push_str("</aside>\n");
}

fn method_badge(code: &CodePanel) -> String {
    format!(
        "<span class=\"method method-{}\">{}</span>",
        code.badge.color(),
        html_escape(&code.method)
    )
}

fn highlight_url(url: &str) -> String {
    mark_placeholders(&html_escape(url), |p| format!("<span class=\"placeholder\">{}</span>", p))
}

fn copy_button() -> String {
    "<button type=\"button\" class=\"copy\">Copy</button>\n".to_string()
}

fn json_block(json: &str) -> String {
    format!("<pre><code class=\"language-json\">{}</code></pre>\n", html_escape(json))
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const STYLE: &str = r#"body { margin: 0; font-family: system-ui, sans-serif; color: #1a1a1a; }
.layout { display: grid; grid-template-columns: 16em 1fr 32em; min-height: 100vh; }
.sidebar { border-right: 1px solid #e5e5e5; padding: 1em; }
.sidebar h1 { font-size: 1.1em; }
.sidebar ul { list-style: none; padding-left: 0.75em; }
.sidebar a { color: inherit; text-decoration: none; display: block; padding: 0.2em 0.4em; border-radius: 4px; }
.sidebar a.active { background: #eef2ff; font-weight: 600; }
.sidebar .group > span { font-weight: 600; text-transform: uppercase; font-size: 0.8em; color: #666; }
.content { padding: 1.5em 2em; max-width: 56em; }
.code-panel { background: #0f172a; color: #e2e8f0; padding: 1em; }
code { font-family: ui-monospace, monospace; }
pre { background: #f4f4f4; padding: 1em; border-radius: 5px; overflow-x: auto; }
.code-panel pre { background: #1e293b; }
table { border-collapse: collapse; width: 100%; }
th, td { border-bottom: 1px solid #e5e5e5; padding: 0.4em 0.5em; text-align: left; vertical-align: top; }
.method { display: inline-block; font-size: 0.75em; font-weight: 700; padding: 0.15em 0.5em; border-radius: 3px; color: white; }
.method-green { background: #16a34a; }
.method-blue { background: #2563eb; }
.method-yellow { background: #ca8a04; }
.method-red { background: #dc2626; }
.method-gray { background: #6b7280; }
.placeholder { color: #d97706; }
.code-label { font-size: 0.8em; font-weight: 600; margin-top: 0.5em; }
.tab-input { display: none; }
.tabs label { display: inline-block; padding: 0.3em 0.7em; cursor: pointer; }
.tab-input:checked + label { border-bottom: 2px solid #60a5fa; }
.tab-panel { display: none; }
#tab-http:checked ~ .panel-http, #tab-javascript:checked ~ .panel-javascript,
#tab-php:checked ~ .panel-php, #tab-python:checked ~ .panel-python,
#tab-go:checked ~ .panel-go { display: block; }
.empty { color: #666; margin-top: 4em; text-align: center; }
.mobile-bar, .mobile-only { display: none; }
@media (max-width: 900px) {
  .layout { grid-template-columns: 1fr; }
  .mobile-bar { display: flex; gap: 1em; align-items: center; padding: 0.5em 1em; border-bottom: 1px solid #e5e5e5; }
  .sidebar { display: none; }
  .menu-open .sidebar { display: block; position: fixed; inset: 3em 0 0 0; background: white; z-index: 10; }
  .code-panel { display: none; }
  .code-open .content { display: none; }
  .code-open .code-panel, .code-open .mobile-only { display: block; }
}
"#;

const SCRIPT: &str = r#"document.querySelectorAll('button.copy').forEach(function (btn) {
  btn.addEventListener('click', function () {
    var next = btn.nextElementSibling;
    var code = next && next.tagName === 'PRE' ? next : btn.parentElement.querySelector('code');
    if (code && navigator.clipboard) { navigator.clipboard.writeText(code.textContent); btn.textContent = 'Copied'; }
  });
});
document.querySelectorAll('.sidebar a').forEach(function (a) {
  a.addEventListener('click', function () { document.body.classList.remove('menu-open'); });
});
var menu = document.querySelector('.menu-toggle');
if (menu) menu.addEventListener('click', function () { document.body.classList.toggle('menu-open'); });
var code = document.querySelector('.code-toggle');
if (code) code.addEventListener('click', function () { document.body.classList.toggle('code-open'); });
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use jdoc_core::model::Site;
    use serde_json::json;

    fn site() -> Site {
        serde_json::from_value(json!({
            "title": "Acme <API>",
            "sections": [
                {
                    "id": "getting-started",
                    "title": "Getting Started",
                    "descriptiveConfig": {
                        "title": "Welcome",
                        "description": "Start here",
                        "content": [
                            {"type": "paragraph", "content": "a < b"},
                            {"type": "code", "content": {"title": "Install", "label": "Shell", "code": "npm i"}},
                            {"type": "video", "content": {}}
                        ]
                    }
                },
                {
                    "id": "users",
                    "title": "Users",
                    "type": "group",
                    "children": [{
                        "id": "get-user",
                        "title": "GET - User",
                        "config": {
                            "title": "Get user",
                            "method": "get",
                            "urlDefinition": "https://api.example.com/v1/users/{id}",
                            "validExamples": [{"title": "ok", "bodyResponse": {"id": 1}}],
                            "characterJsonParamsSend": [{"field": "id", "type": "string", "description": ["REQUIRED", "user id"]}]
                        }
                    }]
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn page_view() {
        let site = site();
        let surface = Surface::new(&site);
        let out = HtmlRenderer.render(&surface);
        assert!(out.starts_with("<!DOCTYPE html>"));
        assert!(out.contains("<title>Getting Started - Acme &lt;API&gt;</title>"));
        assert!(out.contains("<p>a &lt; b</p>"));
        assert!(out.contains("<h3 id=\"install\">Install</h3>"));
        assert!(out.contains("<div class=\"code-label\">Shell</div>"));
        assert!(out.contains("<a href=\"getting-started.html\" class=\"active\">"));
        assert!(!out.contains("video"));
        assert!(!out.contains("<aside"));
    }

    #[test]
    fn unlabelled_code_block_falls_back_to_code() {
        let site: Site = serde_json::from_value(json!({
            "sections": [{
                "id": "getting-started",
                "title": "Getting Started",
                "descriptiveConfig": {
                    "title": "Welcome",
                    "content": [
                        {"type": "code", "content": {"code": "npm i"}},
                        {"type": "code", "content": {"label": "", "code": "yarn add"}}
                    ]
                }
            }]
        }))
        .unwrap();
        let out = HtmlRenderer.render(&Surface::new(&site));
        assert_eq!(out.matches("<div class=\"code-label\">Code</div>").count(), 2);
    }

    #[test]
    fn endpoint_view_has_tabs_and_placeholders() {
        let site = site();
        let mut surface = Surface::new(&site);
        surface.state_mut().select("get-user");
        surface.state_mut().select_tab(Lang::Python);
        let out = HtmlRenderer.render(&surface);

        assert!(out.contains("<span class=\"method method-green\">GET</span>"));
        assert!(out.contains("/v1/users/<span class=\"placeholder\">{id}</span>"));
        assert!(out.contains("<h2 id=\"params\">Params</h2>"));
        assert!(out.contains("<td>Yes</td><td>user id</td>"));
        assert!(out.contains("id=\"tab-python\" class=\"tab-input\" checked"));
        assert!(!out.contains("id=\"tab-http\" class=\"tab-input\" checked"));
        assert_eq!(out.matches("class=\"tab-panel").count(), 5);
        assert!(out.contains("<h3>Example Response</h3>"));
        assert!(out.contains("import requests"));
    }

    #[test]
    fn mobile_state_classes() {
        let site = site();
        let mut surface = Surface::new(&site);
        surface.state_mut().select("get-user");
        surface.state_mut().toggle_code_samples();
        surface.state_mut().open_mobile_menu();
        let out = HtmlRenderer.render(&surface);
        assert!(out.contains("<body class=\"menu-open code-open\">"));
    }

    #[test]
    fn empty_state() {
        let site = site();
        let mut surface = Surface::new(&site);
        surface.state_mut().select("users");
        let out = HtmlRenderer.render(&surface);
        assert!(out.contains(EMPTY_STATE));
        assert!(out.contains("<title>Users - Acme &lt;API&gt;</title>"));
    }

    #[test]
    fn escape() {
        assert_eq!(html_escape("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }
}
