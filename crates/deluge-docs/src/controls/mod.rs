//! The hardware control table and keyword resolution.
//!
//! A [`ControlTable`] is built once at startup and handed by reference to the
//! sequence parser. Resolution is case-insensitive:
//!
//! - names and aliases are accepted,
//! - did-you-mean hints are rejected with a suggestion naming the control,
//! - anything else is an "unknown action".
//!
//! # Example
//!
//! ```
//! use deluge_docs::controls::ControlTable;
//!
//! let table = ControlTable::deluge();
//! let press = table.resolve_token("turn SELECT left").unwrap();
//! assert_eq!(press.control(), "Select");
//! assert_eq!(press.action().icon(), Some("turn-select-left"));
//! ```

mod action;
mod data;
mod kind;

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

pub use action::{Action, Press};
pub use kind::{title_case, ControlKind, KnobIds};

use crate::error::{Error, Result};

/// A named hardware input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Control {
    name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    aliases: Vec<String>,
    #[serde(rename = "did_you_mean", skip_serializing_if = "Vec::is_empty")]
    hints: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    display: Option<String>,
    #[serde(flatten)]
    kind: ControlKind,
}

impl Control {
    /// A button shown by its label.
    #[must_use]
    pub fn button(name: &str) -> Self {
        Self::new(name, ControlKind::LabelledButton { icon: None })
    }

    /// A button shown by an icon.
    #[must_use]
    pub fn icon_button(name: &str, icon: &str) -> Self {
        Self::new(
            name,
            ControlKind::LabelledButton {
                icon: Some(icon.to_string()),
            },
        )
    }

    /// A knob without identifiers.
    #[must_use]
    pub fn knob(name: &str) -> Self {
        Self::new(name, ControlKind::Knob { ids: KnobIds::None })
    }

    /// A knob that is one of an upper/lower pair.
    #[must_use]
    pub fn paired_knob(name: &str) -> Self {
        Self::new(
            name,
            ControlKind::Knob {
                ids: KnobIds::UpperLower,
            },
        )
    }

    /// A pad.
    #[must_use]
    pub fn pad(name: &str) -> Self {
        Self::new(name, ControlKind::Pad)
    }

    fn new(name: &str, kind: ControlKind) -> Self {
        Self {
            name: name.to_string(),
            aliases: Vec::new(),
            hints: Vec::new(),
            display: None,
            kind,
        }
    }

    /// Set the label shown instead of the name.
    #[must_use]
    pub fn display(mut self, display: &str) -> Self {
        self.display = Some(display.to_string());
        self
    }

    /// Add accepted alternative names.
    #[must_use]
    pub fn aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases.extend(aliases.iter().map(|a| (*a).to_string()));
        self
    }

    /// Add rejected names that should suggest this control.
    #[must_use]
    pub fn did_you_mean(mut self, hints: &[&str]) -> Self {
        self.hints.extend(hints.iter().map(|h| (*h).to_string()));
        self
    }

    /// Canonical name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Label used when rendering.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.name)
    }

    /// Accepted alternative names.
    #[must_use]
    pub fn alias_names(&self) -> &[String] {
        &self.aliases
    }

    /// The control's kind.
    #[must_use]
    pub fn kind(&self) -> &ControlKind {
        &self.kind
    }

    /// Validate modifiers and build a press of this control.
    ///
    /// # Errors
    ///
    /// Returns an error if the modifiers are not valid for this control.
    pub fn press(&self, modifiers: &[&str]) -> Result<Press> {
        self.kind
            .to_press(&self.name, self.display_name(), modifiers)
    }
}

/// Every control a shortcut may name.
#[derive(Debug, Clone)]
pub struct ControlTable {
    controls: Vec<Control>,
    /// Lower-cased name or alias -> index into `controls`.
    names: HashMap<String, usize>,
    /// Lower-cased hint -> index into `controls`.
    hints: HashMap<String, usize>,
}

impl ControlTable {
    /// Build a table, checking that names and aliases are unique.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateControl`] if two controls share a name or
    /// alias, compared case-insensitively.
    pub fn new(controls: Vec<Control>) -> Result<Self> {
        let mut names = HashMap::new();
        let mut hints = HashMap::new();

        for (index, control) in controls.iter().enumerate() {
            for name in std::iter::once(&control.name).chain(&control.aliases) {
                if names.insert(name.to_lowercase(), index).is_some() {
                    return Err(Error::DuplicateControl { name: name.clone() });
                }
            }
            for hint in &control.hints {
                hints.entry(hint.to_lowercase()).or_insert(index);
            }
        }

        debug!(controls = controls.len(), "built control table");
        Ok(Self {
            controls,
            names,
            hints,
        })
    }

    /// The built-in Deluge control table.
    #[must_use]
    pub fn deluge() -> Self {
        data::deluge_table()
    }

    /// All controls, in table order.
    pub fn iter(&self) -> impl Iterator<Item = &Control> {
        self.controls.iter()
    }

    /// Number of controls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.controls.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Look up a control by exact name or alias.
    #[must_use]
    pub fn get(&self, keyword: &str) -> Option<&Control> {
        self.names
            .get(&keyword.to_lowercase())
            .map(|&index| &self.controls[index])
    }

    /// The control a rejected keyword hints at.
    #[must_use]
    pub fn suggest(&self, keyword: &str) -> Option<&Control> {
        self.hints
            .get(&keyword.to_lowercase())
            .map(|&index| &self.controls[index])
    }

    /// Resolve a single keyword to a control.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownControl`], with a suggestion if the keyword is
    /// a known hint.
    pub fn resolve(&self, keyword: &str) -> Result<&Control> {
        self.get(keyword).ok_or_else(|| Error::UnknownControl {
            keyword: keyword.to_string(),
            suggestion: self.suggest(keyword).map(|c| c.name.clone()),
        })
    }

    /// Resolve a chord token such as `turn Select left` into a press.
    ///
    /// Exactly one keyword must name a control; the others are its modifiers.
    ///
    /// # Errors
    ///
    /// Returns an error if no keyword or several keywords name a control, or
    /// if the modifiers are invalid for the control.
    pub fn resolve_token(&self, token: &str) -> Result<Press> {
        let keywords: Vec<&str> = token.split_whitespace().collect();

        let found: Vec<(usize, &Control)> = keywords
            .iter()
            .enumerate()
            .filter_map(|(position, keyword)| self.get(keyword).map(|c| (position, c)))
            .collect();

        let (position, control) = match found.as_slice() {
            [single] => *single,
            [] => return Err(self.unknown_token(&keywords)),
            many => {
                return Err(Error::AmbiguousControls {
                    token: keywords.join(" "),
                    controls: many.iter().map(|(_, c)| c.name.clone()).collect(),
                })
            }
        };

        let modifiers: Vec<&str> = keywords
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != position)
            .map(|(_, keyword)| *keyword)
            .collect();

        control.press(&modifiers)
    }

    fn unknown_token(&self, keywords: &[&str]) -> Error {
        if let Some((keyword, control)) = keywords
            .iter()
            .find_map(|k| self.suggest(k).map(|c| (*k, c)))
        {
            return Error::UnknownControl {
                keyword: keyword.to_string(),
                suggestion: Some(control.name.clone()),
            };
        }
        Error::unknown_control(keywords.join(" "))
    }
}
