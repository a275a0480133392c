//! Per-kind modifier validation and action building.

use serde::Serialize;
use tracing::trace;

use super::action::{Action, Press};
use crate::error::{Error, Result};

/// Knob modifiers written before the knob name, in display order.
const KNOB_MODIFIERS_BEFORE: [&str; 2] = ["press", "turn"];

/// Knob modifiers written after the knob name, in display order.
const KNOB_MODIFIERS_AFTER: [&str; 2] = ["left", "right"];

/// Which identifiers a knob accepts as extra modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KnobIds {
    /// No identifiers; any extra modifier is an error.
    None,
    /// At most one of `Upper` / `Lower` (the gold knobs).
    UpperLower,
}

/// How a control behaves and renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControlKind {
    /// A button drawn as its label, or as `icon` when set. Takes no modifiers.
    LabelledButton {
        /// Icon shown instead of the label.
        icon: Option<String>,
    },
    /// A knob that can be pressed and turned.
    Knob {
        /// Identifiers the knob accepts.
        ids: KnobIds,
    },
    /// A grid, audition or mute pad.
    Pad,
}

impl ControlKind {
    /// Modifier keywords this kind understands, for listings.
    #[must_use]
    pub fn modifier_keywords(&self) -> Vec<&'static str> {
        match self {
            Self::LabelledButton { .. } => Vec::new(),
            Self::Knob { ids } => {
                let mut words: Vec<&str> = KNOB_MODIFIERS_BEFORE
                    .iter()
                    .chain(&KNOB_MODIFIERS_AFTER)
                    .copied()
                    .collect();
                if *ids == KnobIds::UpperLower {
                    words.extend(["Upper", "Lower"]);
                }
                words
            }
            Self::Pad => vec!["<pad coordinate>"],
        }
    }

    /// Validate `modifiers` for a control of this kind and build its press.
    ///
    /// # Errors
    ///
    /// Returns an error if the modifiers are not valid for this kind.
    pub fn to_press(&self, name: &str, display: &str, modifiers: &[&str]) -> Result<Press> {
        trace!(control = name, ?modifiers, "building action");
        match self {
            Self::LabelledButton { icon } => {
                labelled_button(name, display, icon.as_deref(), modifiers)
            }
            Self::Knob { ids } => knob(name, display, *ids, modifiers),
            Self::Pad => Ok(pad(name, modifiers)),
        }
    }
}

fn labelled_button(
    name: &str,
    display: &str,
    icon: Option<&str>,
    modifiers: &[&str],
) -> Result<Press> {
    if !modifiers.is_empty() {
        return Err(Error::ModifiersNotAccepted {
            control: name.to_string(),
            modifiers: modifiers.join(" "),
        });
    }

    let action = Action::button(display.to_string(), icon.map(str::to_string));
    Ok(Press::new(name, Vec::new(), Vec::new(), Vec::new(), action))
}

fn knob(name: &str, display: &str, ids: KnobIds, modifiers: &[&str]) -> Result<Press> {
    let has = |word: &str| modifiers.iter().any(|m| m.eq_ignore_ascii_case(word));

    let before: Vec<&str> = KNOB_MODIFIERS_BEFORE.into_iter().filter(|m| has(*m)).collect();
    let after: Vec<&str> = KNOB_MODIFIERS_AFTER.into_iter().filter(|m| has(*m)).collect();
    let remaining: Vec<&str> = modifiers
        .iter()
        .copied()
        .filter(|m| {
            !KNOB_MODIFIERS_BEFORE
                .iter()
                .chain(&KNOB_MODIFIERS_AFTER)
                .any(|known| m.eq_ignore_ascii_case(known))
        })
        .collect();

    let turned = before.contains(&"turn");
    if before.contains(&"press") && !turned {
        return Err(Error::invalid_modifiers(
            name,
            &before,
            "\"press\" needs \"turn\"; pressing is already the default for knobs",
        ));
    }
    if !after.is_empty() && !turned {
        return Err(Error::invalid_modifiers(
            name,
            &after,
            "\"left\" and \"right\" need \"turn\"",
        ));
    }
    if after.len() > 1 {
        return Err(Error::invalid_modifiers(
            name,
            &after,
            "a knob turns either left or right",
        ));
    }

    let id_list = knob_ids(name, ids, &remaining)?;

    let icon = before
        .iter()
        .map(|m| (*m).to_string())
        .chain(std::iter::once(name.to_lowercase()))
        .chain(after.iter().map(|m| (*m).to_string()))
        .collect::<Vec<_>>()
        .join("-");

    let label_before = before
        .iter()
        .map(|m| if *m == "press" { "press\u{a0}&" } else { *m })
        .chain(id_list.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ");

    let label = std::iter::once(display)
        .chain(after.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");

    let search_text = before
        .iter()
        .map(|m| (*m).to_string())
        .chain(id_list.iter().cloned())
        .chain(std::iter::once(title_case(name)))
        .chain(after.iter().map(|m| (*m).to_string()))
        .collect::<Vec<_>>()
        .join(" ");

    let action = Action::knob(icon, Some(label_before), label, search_text, id_list.clone());
    Ok(Press::new(
        name,
        to_owned(&before),
        id_list,
        to_owned(&after),
        action,
    ))
}

fn knob_ids(name: &str, ids: KnobIds, remaining: &[&str]) -> Result<Vec<String>> {
    if remaining.is_empty() {
        return Ok(Vec::new());
    }

    match ids {
        KnobIds::None => Err(Error::invalid_modifiers(
            name,
            remaining,
            format!(
                "available modifiers: {}",
                KNOB_MODIFIERS_BEFORE
                    .iter()
                    .chain(&KNOB_MODIFIERS_AFTER)
                    .copied()
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        )),
        KnobIds::UpperLower => {
            let id = match remaining {
                [one] if one.eq_ignore_ascii_case("upper") => "Upper",
                [one] if one.eq_ignore_ascii_case("lower") => "Lower",
                _ => {
                    return Err(Error::invalid_modifiers(
                        name,
                        remaining,
                        "at most one of Upper, Lower",
                    ))
                }
            };
            Ok(vec![id.to_string()])
        }
    }
}

fn pad(name: &str, modifiers: &[&str]) -> Press {
    let label = (!modifiers.is_empty()).then(|| title_case(&modifiers.join(" ")));
    let search_text = modifiers
        .iter()
        .map(|m| title_case(m))
        .chain(std::iter::once(title_case(name)))
        .collect::<Vec<_>>()
        .join(" ");
    let ids = pad_id(modifiers).into_iter().collect();

    Press::new(
        name,
        Vec::new(),
        to_owned(modifiers),
        Vec::new(),
        Action::pad(label, search_text, ids),
    )
}

/// Grid pads are `A1`..`P8`; audition and mute pads are `AUDITION1`..`8` and
/// `MUTE1`..`8`.
fn pad_id(modifiers: &[&str]) -> Option<String> {
    match modifiers {
        [coord] => {
            let bytes = coord.as_bytes();
            let column_ok = bytes.len() == 2
                && matches!(bytes[0].to_ascii_uppercase(), b'A'..=b'P')
                && is_pad_row(&coord[1..]);
            column_ok.then(|| coord.to_ascii_uppercase())
        }
        [column, row] if is_pad_row(row) => ["audition", "mute"]
            .into_iter()
            .find(|c| column.eq_ignore_ascii_case(c))
            .map(|c| format!("{}{row}", c.to_ascii_uppercase())),
        _ => None,
    }
}

fn is_pad_row(s: &str) -> bool {
    matches!(s.as_bytes(), [b'1'..=b'8'])
}

fn to_owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

/// `"SYNC_scaling"` -> `"Sync Scaling"`.
#[must_use]
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        let c = if c == '_' || c == '-' { ' ' } else { c };
        if c.is_alphanumeric() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
