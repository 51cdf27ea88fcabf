//! Renderer module with trait-based format dispatch.

pub mod html;
pub mod json;
pub mod markdown;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{anyhow, bail, Context, Result};
use jdoc_core::codegen::Lang;
use jdoc_core::model::Site;
use jdoc_core::nav;
use jdoc_core::surface::Surface;
use regex::Regex;
use tracing::debug;

/// `{name}` path placeholders inside an endpoint URL.
static RE_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_-]*)\}").unwrap());

/// Renders the surface's current view into a specific output format.
pub trait Renderer {
    fn render(&self, surface: &Surface) -> String;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer)),
        "html" => Ok(Box::new(html::HtmlRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!(
            "unknown format: {}. Use markdown, html, or json",
            format
        )),
    }
}

/// Label shown above a page code block; blank labels fall back to `Code`.
pub fn code_label(label: Option<&str>) -> &str {
    label.filter(|l| !l.is_empty()).unwrap_or("Code")
}

/// File stem of the page written for the default section.
pub const INDEX_PAGE: &str = "index";

/// Why `id` cannot name a page file inside the output directory, if it cannot.
pub fn page_id_problem(id: &str) -> Option<&'static str> {
    if id.is_empty() {
        Some("is empty")
    } else if id == INDEX_PAGE {
        Some("is reserved for the index page")
    } else if id.contains(['/', '\\']) {
        Some("contains a path separator")
    } else if id == "." || id == ".." {
        Some("is not a file name")
    } else if id.chars().any(char::is_control) {
        Some("contains control characters")
    } else {
        None
    }
}

/// Output file name for the section `id`.
pub fn page_file(id: &str, ext: &str) -> String {
    format!("{}.{}", id, ext)
}

/// Placeholder names in `url`, in order of appearance.
pub fn url_placeholders(url: &str) -> Vec<&str> {
    RE_PLACEHOLDER
        .captures_iter(url)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect()
}

/// Rewrite every `{name}` placeholder in `url` with `wrap(name)`.
pub fn mark_placeholders(url: &str, wrap: impl Fn(&str) -> String) -> String {
    RE_PLACEHOLDER
        .replace_all(url, |caps: &regex::Captures| wrap(&caps[0]))
        .into_owned()
}

/// Write one file per addressable section plus `index.<ext>` for the default
/// section. Returns the written paths.
pub fn write_site(
    site: &Site,
    renderer: &dyn Renderer,
    tab: Lang,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let ext = renderer.file_extension();
    let mut written = Vec::new();

    let mut pages: Vec<(String, Option<&str>)> = vec![(page_file(INDEX_PAGE, ext), None)];
    for id in nav::leaf_ids(&site.sections) {
        if let Some(problem) = page_id_problem(id) {
            bail!("section id '{}' {}", id, problem);
        }
        pages.push((page_file(id, ext), Some(id)));
    }

    for (name, id) in pages {
        let mut surface = Surface::new(site);
        surface.state_mut().select_tab(tab);
        if let Some(id) = id {
            surface.state_mut().select(id);
        }
        let out_path = output_dir.join(&name);
        fs::write(&out_path, renderer.render(&surface))
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        debug!(file = %out_path.display(), "wrote page");
        written.push(out_path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn site_with_leaf(id: &str) -> Site {
        serde_json::from_value(serde_json::json!({
            "sections": [
                {"id": "getting-started", "title": "Getting Started", "descriptiveConfig": {"title": "Welcome", "content": []}},
                {"id": id, "title": "Leaf", "descriptiveConfig": {"title": "Leaf", "content": []}}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn known_formats() {
        assert_eq!(create_renderer("md").unwrap().file_extension(), "md");
        assert_eq!(create_renderer("markdown").unwrap().file_extension(), "md");
        assert_eq!(create_renderer("html").unwrap().file_extension(), "html");
        assert_eq!(create_renderer("json").unwrap().file_extension(), "json");
    }

    #[test]
    fn unknown_format_lists_choices() {
        let err = create_renderer("xml").err().unwrap();
        assert_eq!(err.to_string(), "unknown format: xml. Use markdown, html, or json");
    }

    #[test]
    fn placeholders() {
        let url = "https://api.example.com/v1/users/{id}/posts/{post_id}";
        assert_eq!(url_placeholders(url), vec!["id", "post_id"]);
        assert_eq!(
            mark_placeholders(url, |p| format!("<{}>", p)),
            "https://api.example.com/v1/users/<{id}>/posts/<{post_id}>"
        );
        assert!(url_placeholders("https://api.example.com/v1/users").is_empty());
    }

    #[test]
    fn page_id_rules() {
        assert_eq!(page_id_problem("get-users"), None);
        assert_eq!(page_id_problem("v1.users"), None);
        assert_eq!(page_id_problem(""), Some("is empty"));
        assert_eq!(page_id_problem("index"), Some("is reserved for the index page"));
        assert_eq!(page_id_problem("../escaped"), Some("contains a path separator"));
        assert_eq!(page_id_problem("users/list"), Some("contains a path separator"));
        assert_eq!(page_id_problem("users\\list"), Some("contains a path separator"));
        assert_eq!(page_id_problem(".."), Some("is not a file name"));
        assert_eq!(page_id_problem("a\nb"), Some("contains control characters"));
    }

    #[test]
    fn write_site_writes_index_and_leaves() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("site");
        let site = site_with_leaf("faq");
        let written = write_site(&site, &markdown::MarkdownRenderer, Lang::Http, &out).unwrap();
        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["index.md", "getting-started.md", "faq.md"]);
        let index = fs::read_to_string(out.join("index.md")).unwrap();
        assert!(index.starts_with("# Welcome"));
    }

    #[test]
    fn write_site_refuses_ids_that_leave_the_output_dir() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("site");
        let site = site_with_leaf("../escaped");
        let err = write_site(&site, &markdown::MarkdownRenderer, Lang::Http, &out).unwrap_err();
        assert_eq!(err.to_string(), "section id '../escaped' contains a path separator");
        assert!(!dir.path().join("escaped.md").exists());
        assert!(!out.join("index.md").exists());
    }

    #[test]
    fn write_site_keeps_the_index_page() {
        let dir = TempDir::new().unwrap();
        let site = site_with_leaf("index");
        let err = write_site(&site, &markdown::MarkdownRenderer, Lang::Http, dir.path()).unwrap_err();
        assert!(err.to_string().contains("reserved for the index page"));
        assert!(!dir.path().join("index.md").exists());
    }

    #[test]
    fn write_site_refuses_nested_paths() {
        let dir = TempDir::new().unwrap();
        let site = site_with_leaf("users/list");
        let err = write_site(&site, &markdown::MarkdownRenderer, Lang::Http, dir.path()).unwrap_err();
        assert!(err.to_string().contains("'users/list' contains a path separator"));
    }
}
