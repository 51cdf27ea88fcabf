//! Site loading: input discovery, format dispatch, merging and validation.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use jdoc_core::model::{Bound, Section, Site};
use jdoc_core::nav;
use tracing::{debug, info, warn};

use crate::render::page_id_problem;

/// File extensions recognized as site files.
const SUPPORTED_EXTENSIONS: &[&str] = &["json", "yaml", "yml", "toml"];

/// Expand file paths, directories and glob patterns into a sorted list of
/// site files. Directories are scanned (non-recursively) for supported
/// extensions.
pub fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() && has_supported_extension(&p) {
                    files.push(p);
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            warn!(pattern = %pattern, "no files matched");
        }
        files.extend(matches);
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}

/// Parse one site file based on its extension.
pub fn parse_file(path: &Path, content: &str) -> Result<Site> {
    let site = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(content).map_err(anyhow::Error::from),
        Some("yaml" | "yml") => serde_yaml::from_str(content).map_err(anyhow::Error::from),
        Some("toml") => toml::from_str(content).map_err(anyhow::Error::from),
        _ => return Err(anyhow!("unsupported file type: {}", path.display())),
    };
    site.with_context(|| format!("failed to parse {}", path.display()))
}

/// Combine several sites in order. Sections are concatenated; the first
/// title and default section found win.
pub fn merge(sites: Vec<Site>) -> Site {
    let mut merged = Site::default();
    for site in sites {
        if merged.title.is_none() {
            merged.title = site.title;
        }
        if merged.default_section.is_none() {
            merged.default_section = site.default_section;
        }
        merged.sections.extend(site.sections);
    }
    merged
}

/// Expand `patterns`, parse every file and merge the result.
pub fn load(patterns: &[String]) -> Result<Site> {
    let files = expand_globs(patterns)?;
    if files.is_empty() {
        bail!("no site files found");
    }

    let mut sites = Vec::with_capacity(files.len());
    for path in &files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let site = parse_file(path, &content)?;
        debug!(file = %path.display(), sections = site.sections.len(), "loaded site file");
        sites.push(site);
    }

    let site = merge(sites);
    info!(files = files.len(), sections = site.sections.len(), "site loaded");
    Ok(site)
}

// -- Validation ---------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    fn error(message: String) -> Self {
        Self {
            severity: Severity::Error,
            message,
        }
    }

    fn warning(message: String) -> Self {
        Self {
            severity: Severity::Warning,
            message,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", label, self.message)
    }
}

/// Problems the content model's own conversion does not catch.
pub fn validate(site: &Site) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for id in nav::duplicate_ids(&site.sections) {
        diagnostics.push(Diagnostic::error(format!("duplicate section id '{}'", id)));
    }

    for section in &site.sections {
        let leaves = match section {
            Section::Leaf(leaf) => std::slice::from_ref(leaf),
            Section::Group(group) => {
                if group.children.is_empty() {
                    diagnostics.push(Diagnostic::error(format!(
                        "group '{}' has no children",
                        group.id
                    )));
                }
                group.children.as_slice()
            }
        };
        for leaf in leaves {
            if let Some(problem) = page_id_problem(&leaf.id) {
                diagnostics.push(Diagnostic::error(format!(
                    "section id '{}' {}",
                    leaf.id, problem
                )));
            }
            match &leaf.content {
                Bound::Endpoint(spec) if spec.valid_examples.is_empty() => {
                    diagnostics.push(Diagnostic::warning(format!(
                        "endpoint '{}' has no valid examples; samples will send {{}}",
                        leaf.id
                    )));
                }
                Bound::Page(page) if page.content.is_empty() => {
                    diagnostics.push(Diagnostic::warning(format!(
                        "page '{}' has no content",
                        leaf.id
                    )));
                }
                _ => {}
            }
        }
    }

    if !nav::leaf_ids(&site.sections).contains(&site.default_section()) {
        diagnostics.push(Diagnostic::warning(format!(
            "default section '{}' does not match any page or endpoint",
            site.default_section()
        )));
    }

    diagnostics
}

/// Log every diagnostic and fail if any of them is an error.
pub fn ensure_valid(site: &Site) -> Result<()> {
    let diagnostics = validate(site);
    let mut errors = 0;
    for diagnostic in &diagnostics {
        if diagnostic.is_error() {
            errors += 1;
            tracing::error!("{}", diagnostic.message);
        } else {
            warn!("{}", diagnostic.message);
        }
    }
    if errors > 0 {
        bail!("site has {} error(s); run `jdoc check` for details", errors);
    }
    Ok(())
}
