//! JSON renderer: structured output for tooling integration.
//!
//! Serializes the navigation, UI state and current view. Endpoint views carry
//! every language's sample so consumers can build their own tab bar.

use jdoc_core::codegen::{self, Lang};
use jdoc_core::fields::DisplayRow;
use jdoc_core::model::{ContentItem, DescriptivePage, Example, Section};
use jdoc_core::surface::{Surface, View};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::render::Renderer;

pub struct JsonRenderer;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Document<'a> {
    title: &'a str,
    state: State<'a>,
    navigation: Vec<NavEntry<'a>>,
    view: ViewDoc<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct State<'a> {
    active_section: &'a str,
    active_tab: Lang,
    mobile_menu_open: bool,
    showing_code_samples: bool,
}

#[derive(Serialize)]
struct NavEntry<'a> {
    id: &'a str,
    title: &'a str,
    active: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<NavEntry<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum ViewDoc<'a> {
    Page(PageDoc<'a>),
    Endpoint(Box<EndpointDoc<'a>>),
    Empty,
}

/// Page content without the items no renderer displays.
#[derive(Serialize)]
struct PageDoc<'a> {
    title: &'a str,
    description: &'a str,
    content: Vec<&'a ContentItem>,
}

impl<'a> From<&'a DescriptivePage> for PageDoc<'a> {
    fn from(page: &'a DescriptivePage) -> Self {
        Self {
            title: &page.title,
            description: &page.description,
            content: page
                .content
                .iter()
                .filter(|item| !matches!(item, ContentItem::Unsupported(_)))
                .collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EndpointDoc<'a> {
    title: &'a str,
    description: &'a str,
    method: String,
    badge: &'static str,
    url: &'a str,
    headers: Map<String, Value>,
    requirements: &'a [String],
    params: Vec<DisplayRow>,
    body: Vec<DisplayRow>,
    valid_examples: &'a [Example],
    invalid_examples: &'a [Example],
    code: CodeDoc,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CodeDoc {
    tab: Lang,
    snippet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    example_response: Option<String>,
    snippets: Map<String, Value>,
}

impl Renderer for JsonRenderer {
    fn render(&self, surface: &Surface) -> String {
        let state = surface.state();
        let doc = Document {
            title: surface.site().title(),
            state: State {
                active_section: state.active_section(),
                active_tab: state.active_tab(),
                mobile_menu_open: state.mobile_menu_open(),
                showing_code_samples: state.showing_code_samples(),
            },
            navigation: navigation(&surface.site().sections, state.active_section()),
            view: view_doc(surface.view()),
        };
        let mut out = serde_json::to_string_pretty(&doc).unwrap_or_default();
        out.push('\n');
        out
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

fn navigation<'a>(sections: &'a [Section], active: &str) -> Vec<NavEntry<'a>> {
    sections
        .iter()
        .map(|section| NavEntry {
            id: section.id(),
            title: section.title(),
            active: section.id() == active,
            children: match section {
                Section::Leaf(_) => Vec::new(),
                Section::Group(group) => group
                    .children
                    .iter()
                    .map(|child| NavEntry {
                        id: &child.id,
                        title: &child.title,
                        active: child.id == active,
                        children: Vec::new(),
                    })
                    .collect(),
            },
        })
        .collect()
}

fn view_doc(view: View<'_>) -> ViewDoc<'_> {
    match view {
        View::Page(page) => ViewDoc::Page(PageDoc::from(page)),
        View::Empty => ViewDoc::Empty,
        View::Endpoint(endpoint) => {
            let spec = endpoint.spec;
            let snippets = Lang::ALL
                .iter()
                .map(|lang| (lang.label().to_string(), Value::String(codegen::generate(spec, *lang))))
                .collect();
            let code = endpoint.code;
            ViewDoc::Endpoint(Box::new(EndpointDoc {
                title: &spec.title,
                description: &spec.description,
                method: code.method,
                badge: code.badge.color(),
                url: &spec.url_definition,
                headers: codegen::merged_headers(spec),
                requirements: &spec.requirements,
                params: endpoint.params,
                body: endpoint.body,
                valid_examples: &spec.valid_examples,
                invalid_examples: &spec.invalid_examples,
                code: CodeDoc {
                    tab: code.tab,
                    snippet: code.snippet,
                    example_response: code.example_response,
                    snippets,
                },
            }))
        }
    }
}
