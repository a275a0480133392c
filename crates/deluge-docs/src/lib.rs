//! `deluge-docs` - Markdown directives for the Deluge documentation site
//!
//! This library turns `:key[...]` button-combo directives into inline HTML
//! with a search-friendly text form, and `:screen[...]` directives into PNG
//! mockups of the Deluge OLED display.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod controls;
pub mod directive;
pub mod error;
pub mod logging;
pub mod render;
pub mod screen;
pub mod sequence;

pub use config::Config;
pub use controls::{Action, Control, ControlTable, Press};
pub use directive::{DirectiveProcessor, ProcessStats, Processed};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use render::{IconRegistry, RenderedShortcut, Renderer};
pub use screen::{OledFrame, ScreenImage, ScreenStyle};
pub use sequence::{Chord, Sequence};
