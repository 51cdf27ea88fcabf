//! The viewer's UI state and the view it selects.
//!
//! All mutable state lives here and changes only through named transitions.
//! The site itself is borrowed read-only; deriving a [`View`] never touches it.

use crate::clipboard::{copy_to_clipboard, Clipboard, Notice};
use crate::codegen::{self, pretty_json, Lang};
use crate::fields::{flatten, DisplayRow};
use crate::model::{ApiEndpointSpec, ContentItem, DescriptivePage, Example, MethodBadge, Site};
use crate::nav::{self, Active};
use crate::simulate::SimulationResult;

// -- UI state -----------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    active_section: String,
    active_tab: Lang,
    mobile_menu_open: bool,
    showing_code_samples: bool,
}

impl UiState {
    pub fn new(default_section: &str) -> Self {
        Self {
            active_section: default_section.to_string(),
            active_tab: Lang::Http,
            mobile_menu_open: false,
            showing_code_samples: false,
        }
    }

    pub fn active_section(&self) -> &str {
        &self.active_section
    }

    pub fn active_tab(&self) -> Lang {
        self.active_tab
    }

    pub fn mobile_menu_open(&self) -> bool {
        self.mobile_menu_open
    }

    pub fn showing_code_samples(&self) -> bool {
        self.showing_code_samples
    }

    /// Sidebar click. Also dismisses the mobile menu.
    pub fn select(&mut self, id: impl Into<String>) {
        self.active_section = id.into();
        self.mobile_menu_open = false;
    }

    pub fn select_tab(&mut self, lang: Lang) {
        self.active_tab = lang;
    }

    pub fn open_mobile_menu(&mut self) {
        self.mobile_menu_open = true;
    }

    pub fn close_mobile_menu(&mut self) {
        self.mobile_menu_open = false;
    }

    pub fn toggle_mobile_menu(&mut self) {
        self.mobile_menu_open = !self.mobile_menu_open;
    }

    pub fn toggle_code_samples(&mut self) {
        self.showing_code_samples = !self.showing_code_samples;
    }
}

// -- Mock submission form -----------------------------------------------------

/// Input, last result and in-flight count of the mock submission form.
///
/// Requests are not serialized: every completion overwrites the stored
/// result, so whichever simulation finishes last is the one displayed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulatorPanel {
    input: String,
    result: Option<SimulationResult>,
    pending: usize,
}

impl SimulatorPanel {
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn result(&self) -> Option<&SimulationResult> {
        self.result.as_ref()
    }

    pub fn in_flight(&self) -> bool {
        self.pending > 0
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Start a simulation. Returns the input to submit.
    pub fn begin(&mut self) -> String {
        self.pending += 1;
        self.input.clone()
    }

    pub fn complete(&mut self, result: SimulationResult) {
        self.pending = self.pending.saturating_sub(1);
        self.result = Some(result);
    }
}

// -- Views --------------------------------------------------------------------

/// Right-hand panel for an endpoint (or the mobile code view).
#[derive(Debug, Clone, PartialEq)]
pub struct CodePanel {
    pub tab: Lang,
    pub method: String,
    pub badge: MethodBadge,
    pub url: String,
    pub snippet: String,
    /// First valid example's response, pretty-printed.
    pub example_response: Option<String>,
}

impl CodePanel {
    pub fn for_spec(spec: &ApiEndpointSpec, tab: Lang) -> Self {
        Self {
            tab,
            method: spec.display_method(),
            badge: spec.badge(),
            url: spec.url_definition.clone(),
            snippet: codegen::generate(spec, tab),
            example_response: spec
                .valid_examples
                .first()
                .map(|example| pretty_json(&example.body_response)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EndpointView<'a> {
    pub spec: &'a ApiEndpointSpec,
    pub params: Vec<DisplayRow>,
    pub body: Vec<DisplayRow>,
    pub code: CodePanel,
    /// Narrow layouts swap the detail view for the code panel.
    pub showing_code_samples: bool,
}

impl<'a> EndpointView<'a> {
    pub fn new(spec: &'a ApiEndpointSpec, tab: Lang, showing_code_samples: bool) -> Self {
        Self {
            spec,
            params: flatten(&spec.param_fields, 0),
            body: flatten(&spec.body_fields, 0),
            code: CodePanel::for_spec(spec, tab),
            showing_code_samples,
        }
    }
}

/// What the main pane shows.
#[derive(Debug, Clone, PartialEq)]
pub enum View<'a> {
    Page(&'a DescriptivePage),
    Endpoint(EndpointView<'a>),
    /// Nothing selected, or the selection has no content.
    Empty,
}

/// Something a copy button can place on the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyTarget {
    Snippet,
    Url,
    ExampleRequest(usize),
    ExampleResponse(usize),
    ErrorRequest(usize),
    ErrorResponse(usize),
    /// The n-th code block of a descriptive page.
    PageCode(usize),
}

// -- Surface ------------------------------------------------------------------

pub struct Surface<'a> {
    site: &'a Site,
    state: UiState,
    simulator: SimulatorPanel,
}

impl<'a> Surface<'a> {
    pub fn new(site: &'a Site) -> Self {
        Self {
            site,
            state: UiState::new(site.default_section()),
            simulator: SimulatorPanel::default(),
        }
    }

    pub fn site(&self) -> &'a Site {
        self.site
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut UiState {
        &mut self.state
    }

    pub fn simulator(&self) -> &SimulatorPanel {
        &self.simulator
    }

    pub fn simulator_mut(&mut self) -> &mut SimulatorPanel {
        &mut self.simulator
    }

    pub fn active(&self) -> Active<'a> {
        nav::resolve(&self.site.sections, self.state.active_section())
    }

    pub fn active_title(&self) -> Option<&'a str> {
        nav::find_title(&self.site.sections, self.state.active_section())
    }

    /// A descriptive page wins over an endpoint; neither gives the empty state.
    pub fn view(&self) -> View<'a> {
        let active = self.active();
        if let Some(page) = active.page() {
            return View::Page(page);
        }
        match active.spec() {
            Some(spec) => View::Endpoint(EndpointView::new(
                spec,
                self.state.active_tab(),
                self.state.showing_code_samples(),
            )),
            None => View::Empty,
        }
    }

    /// Text a copy button would place on the clipboard, if the target exists
    /// in the current view.
    pub fn copy_text(&self, target: CopyTarget) -> Option<String> {
        let active = self.active();
        if let CopyTarget::PageCode(n) = target {
            return active.page()?.content.iter().filter_map(code_of).nth(n).map(str::to_string);
        }
        let spec = active.spec()?;
        let request = |examples: &[Example], i: usize| -> Option<String> {
            examples.get(i)?.body_send.as_ref().map(pretty_json)
        };
        let response = |examples: &[Example], i: usize| -> Option<String> {
            examples.get(i).map(|e| pretty_json(&e.body_response))
        };
        match target {
            CopyTarget::Snippet => Some(codegen::generate(spec, self.state.active_tab())),
            CopyTarget::Url => Some(spec.url_definition.clone()),
            CopyTarget::ExampleRequest(i) => request(&spec.valid_examples, i),
            CopyTarget::ExampleResponse(i) => response(&spec.valid_examples, i),
            CopyTarget::ErrorRequest(i) => request(&spec.invalid_examples, i),
            CopyTarget::ErrorResponse(i) => response(&spec.invalid_examples, i),
            CopyTarget::PageCode(_) => None,
        }
    }

    /// Copy `target` and return the confirmation, or `None` when the target
    /// is not on screen.
    pub fn copy(&self, target: CopyTarget, clipboard: &mut dyn Clipboard) -> Option<Notice> {
        let text = self.copy_text(target)?;
        Some(copy_to_clipboard(clipboard, &text))
    }
}

fn code_of(item: &ContentItem) -> Option<&str> {
    match item {
        ContentItem::Code { code, .. } => Some(code),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::testing::RecordingClipboard;
    use crate::clipboard::COPIED;
    use crate::simulate::evaluate;
    use serde_json::json;

    fn site() -> Site {
        serde_json::from_value(json!({
            "sections": [
                {
                    "id": "getting-started",
                    "title": "Getting Started",
                    "descriptiveConfig": {
                        "title": "Welcome",
                        "description": "Start here",
                        "content": [
                            {"type": "paragraph", "content": "Hello"},
                            {"type": "code", "content": {"code": "npm install"}},
                            {"type": "code", "content": {"label": "Run", "code": "npm run dev"}}
                        ]
                    }
                },
                {
                    "id": "examples",
                    "title": "Examples",
                    "type": "group",
                    "children": [{
                        "id": "post-users",
                        "title": "POST - Users",
                        "config": {
                            "title": "Create user",
                            "description": "Creates a user",
                            "method": "post",
                            "urlDefinition": "https://api.example.com/v1/users",
                            "headers": {"Authorization": "Bearer t"},
                            "requirements": ["admin token"],
                            "validExamples": [{
                                "title": "ok",
                                "description": "",
                                "bodySend": {"name": "Alice"},
                                "bodyResponse": {"success": true, "data": {"id": "user_1"}}
                            }],
                            "invalidExamples": [{
                                "title": "dup",
                                "description": "",
                                "bodySend": null,
                                "bodyResponse": {"success": false}
                            }],
                            "characterJsonBodySend": [
                                {"field": "name", "type": "string", "description": ["REQUIRED", "full name"]}
                            ],
                            "characterJsonParamsSend": []
                        }
                    }]
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn initial_state() {
        let site = site();
        let surface = Surface::new(&site);
        assert_eq!(surface.state().active_section(), "getting-started");
        assert_eq!(surface.state().active_tab(), Lang::Http);
        assert!(!surface.state().mobile_menu_open());
        assert!(!surface.state().showing_code_samples());
        assert!(!surface.simulator().in_flight());
        assert!(matches!(surface.view(), View::Page(p) if p.title == "Welcome"));
    }

    #[test]
    fn selecting_closes_mobile_menu() {
        let site = site();
        let mut surface = Surface::new(&site);
        surface.state_mut().open_mobile_menu();
        assert!(surface.state().mobile_menu_open());
        surface.state_mut().select("post-users");
        assert!(!surface.state().mobile_menu_open());
        assert_eq!(surface.active_title(), Some("POST - Users"));
    }

    #[test]
    fn toggles_flip() {
        let mut state = UiState::new("x");
        state.toggle_mobile_menu();
        state.toggle_code_samples();
        assert!(state.mobile_menu_open() && state.showing_code_samples());
        state.toggle_mobile_menu();
        state.toggle_code_samples();
        assert!(!state.mobile_menu_open() && !state.showing_code_samples());
        state.open_mobile_menu();
        state.close_mobile_menu();
        assert!(!state.mobile_menu_open());
    }

    #[test]
    fn endpoint_view_follows_tab() {
        let site = site();
        let mut surface = Surface::new(&site);
        surface.state_mut().select("post-users");

        let View::Endpoint(view) = surface.view() else {
            panic!("expected endpoint view");
        };
        assert_eq!(view.code.tab, Lang::Http);
        assert_eq!(view.code.method, "POST");
        assert_eq!(view.code.badge, MethodBadge::Post);
        assert!(view.code.snippet.starts_with("POST https://api.example.com/v1/users\n"));
        assert_eq!(view.body.len(), 1);
        assert_eq!(view.body[0].description, "full name");
        assert!(view.params.is_empty());
        assert_eq!(
            view.code.example_response.as_deref(),
            Some("{\n  \"success\": true,\n  \"data\": {\n    \"id\": \"user_1\"\n  }\n}")
        );

        surface.state_mut().select_tab(Lang::Go);
        let View::Endpoint(view) = surface.view() else {
            panic!("expected endpoint view");
        };
        assert!(view.code.snippet.starts_with("package main"));
    }

    #[test]
    fn unknown_and_group_ids_render_empty() {
        let site = site();
        let mut surface = Surface::new(&site);
        surface.state_mut().select("unknown-id");
        assert_eq!(surface.view(), View::Empty);
        surface.state_mut().select("examples");
        assert_eq!(surface.view(), View::Empty);
    }

    #[test]
    fn last_completion_wins() {
        let mut panel = SimulatorPanel::default();
        panel.set_input("not json");
        let first = panel.begin();
        panel.set_input(r#"{"name":"A","email":"b@c.com","age":30}"#);
        let second = panel.begin();
        assert_eq!(panel.pending(), 2);

        panel.complete(evaluate(&second));
        assert!(panel.in_flight());
        assert!(panel.result().is_some_and(SimulationResult::is_success));

        // The earlier request finishes later and replaces the shown result.
        panel.complete(evaluate(&first));
        assert!(!panel.in_flight());
        assert!(panel.result().is_some_and(|r| !r.is_success()));
    }

    #[test]
    fn copy_targets() {
        let site = site();
        let mut surface = Surface::new(&site);
        let mut clip = RecordingClipboard::default();

        assert_eq!(surface.copy(CopyTarget::PageCode(1), &mut clip), Some(COPIED));
        assert_eq!(surface.copy(CopyTarget::Url, &mut clip), None);

        surface.state_mut().select("post-users");
        surface.copy(CopyTarget::Url, &mut clip);
        surface.copy(CopyTarget::ExampleRequest(0), &mut clip);
        surface.copy(CopyTarget::ErrorResponse(0), &mut clip);
        assert_eq!(surface.copy(CopyTarget::ErrorRequest(0), &mut clip), None);
        assert_eq!(surface.copy(CopyTarget::ExampleResponse(3), &mut clip), None);

        assert_eq!(
            clip.writes,
            vec![
                "npm run dev",
                "https://api.example.com/v1/users",
                "{\n  \"name\": \"Alice\"\n}",
                "{\n  \"success\": false\n}",
            ]
        );
    }

    #[test]
    fn copy_snippet_uses_active_tab() {
        let site = site();
        let mut surface = Surface::new(&site);
        surface.state_mut().select("post-users");
        surface.state_mut().select_tab(Lang::Python);
        let text = surface.copy_text(CopyTarget::Snippet).unwrap();
        assert!(text.starts_with("import requests"));
    }
}
