//! jdoc rendering core.
//!
//! Turns a statically loaded documentation site (REST endpoint specs and
//! descriptive guide pages arranged in a navigation tree) into render-ready
//! views: flattened field tables, per-language code samples, and the UI state
//! machine behind the three-pane viewer. Also hosts the mock call simulator
//! used by the "try it" form.
//!
//! Nothing in this crate performs I/O except the simulator's artificial delay;
//! renderers for concrete output formats live in the `jdoc` binary.

pub mod clipboard;
pub mod codegen;
pub mod error;
pub mod fields;
pub mod model;
pub mod nav;
pub mod simulate;
pub mod surface;

pub use error::{Error, Result};
