//! Resolved, renderable control usages.

use std::fmt;

use serde::Serialize;

/// What a single control usage looks like once rendered.
///
/// Actions are built by the control kinds in [`super::kind`], which keep two
/// invariants: a pad never carries an icon, and every other action has at
/// least a label or an icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    label_before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    search_text: Option<String>,
    is_pad: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    ids: Vec<String>,
}

impl Action {
    /// A button shown by its label, or by an icon when it has one.
    pub(crate) fn button(label: String, icon: Option<String>) -> Self {
        Self {
            icon,
            label_before: None,
            search_text: Some(label.clone()),
            label: Some(label),
            is_pad: false,
            ids: Vec::new(),
        }
    }

    /// A knob: always drawn as an icon, with text around it.
    pub(crate) fn knob(
        icon: String,
        label_before: Option<String>,
        label: String,
        search_text: String,
        ids: Vec<String>,
    ) -> Self {
        Self {
            icon: Some(icon),
            label_before: label_before.filter(|s| !s.is_empty()),
            label: Some(label),
            search_text: Some(search_text),
            is_pad: false,
            ids,
        }
    }

    /// A pad badge. The renderer falls back to "Pad" when `label` is `None`.
    pub(crate) fn pad(label: Option<String>, search_text: String, ids: Vec<String>) -> Self {
        Self {
            icon: None,
            label_before: None,
            label,
            search_text: Some(search_text),
            is_pad: true,
            ids,
        }
    }

    /// Icon identifier, looked up in the icon registry.
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Text shown before the icon or label.
    #[must_use]
    pub fn label_before(&self) -> Option<&str> {
        self.label_before.as_deref()
    }

    /// Main label. Used as alt text when the action has an icon.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Text the search indexer sees for this action.
    #[must_use]
    pub fn search_text(&self) -> Option<&str> {
        self.search_text.as_deref()
    }

    /// Whether this renders as a pad badge.
    #[must_use]
    pub fn is_pad(&self) -> bool {
        self.is_pad
    }

    /// Identifiers distinguishing visually identical controls.
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}

/// One control usage inside a chord: the control plus its modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Press {
    control: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    before: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    extra: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    after: Vec<String>,
    action: Action,
}

impl Press {
    /// `before` and `after` hold modifiers written around the control name,
    /// `extra` the ones that follow it (knob ids, pad coordinates).
    pub(crate) fn new(
        control: &str,
        before: Vec<String>,
        extra: Vec<String>,
        after: Vec<String>,
        action: Action,
    ) -> Self {
        Self {
            control: control.to_string(),
            before,
            extra,
            after,
            action,
        }
    }

    /// Canonical name of the pressed control.
    #[must_use]
    pub fn control(&self) -> &str {
        &self.control
    }

    /// All modifiers in canonical order.
    #[must_use]
    pub fn modifiers(&self) -> Vec<&str> {
        self.before
            .iter()
            .chain(&self.extra)
            .chain(&self.after)
            .map(String::as_str)
            .collect()
    }

    /// The renderable action.
    #[must_use]
    pub fn action(&self) -> &Action {
        &self.action
    }
}

impl fmt::Display for Press {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words: Vec<&str> = self
            .before
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.control.as_str()))
            .chain(self.extra.iter().map(String::as_str))
            .chain(self.after.iter().map(String::as_str))
            .collect();
        write!(f, "{}", words.join(" "))
    }
}
