//! Rendering of parsed shortcuts to inline HTML.
//!
//! A rendered shortcut is a `span.button-sequence` holding the visual markup
//! plus a flattened search string. The visual parts are hidden from the
//! search indexer (`data-pagefind-ignore`) and the search string is exposed
//! through `data-shortcut-sequence` instead, so the index reads
//! `Shift + Load > Load` rather than a jumble of image alt texts.

mod icons;
mod markup;

use tracing::trace;

pub use icons::IconRegistry;
pub use markup::{escape, Element, Node};

use crate::controls::Action;
use crate::error::{Error, Result};
use crate::sequence::Sequence;

/// Label shown on a pad without coordinates.
pub const DEFAULT_PAD_LABEL: &str = "Pad";

/// Visual joiner between presses of one chord.
const PRESS_JOINER: &str = "\u{a0}+ ";

/// Visual joiner between chords.
const CHORD_JOINER: &str = " > ";

/// Search-text joiner between presses of one chord.
const SEARCH_PRESS_JOINER: &str = " + ";

/// Search-text joiner between chords.
const SEARCH_CHORD_JOINER: &str = " > ";

/// A rendered shortcut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedShortcut {
    node: Node,
    search_text: String,
}

impl RenderedShortcut {
    /// The markup tree.
    #[must_use]
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// The flattened text the search indexer sees.
    #[must_use]
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Serialize the markup to HTML.
    #[must_use]
    pub fn to_html(&self) -> String {
        self.node.to_html()
    }
}

/// Renders sequences using a fixed icon registry.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    icons: &'a IconRegistry,
}

impl<'a> Renderer<'a> {
    /// Create a renderer that resolves icons through `icons`.
    #[must_use]
    pub fn new(icons: &'a IconRegistry) -> Self {
        Self { icons }
    }

    /// Render a sequence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownIcon`] if any action's icon has no registered
    /// asset. Nothing is rendered in that case.
    pub fn render(&self, sequence: &Sequence) -> Result<RenderedShortcut> {
        let mut children = Vec::new();
        let mut search_chords = Vec::new();

        for (i, chord) in sequence.chords().iter().enumerate() {
            if i > 0 {
                children.push(joiner("chord-joiner", CHORD_JOINER));
            }

            let mut chord_node = Element::span().class("chord").attr("data-pagefind-ignore", "");
            let mut search_presses = Vec::new();
            for (j, press) in chord.presses().iter().enumerate() {
                if j > 0 {
                    chord_node = chord_node.child(joiner("press-joiner", PRESS_JOINER));
                }
                chord_node = chord_node.child(self.render_action(press.action())?);
                if let Some(text) = press.action().search_text() {
                    search_presses.push(text);
                }
            }
            children.push(chord_node.into());
            search_chords.push(search_presses.join(SEARCH_PRESS_JOINER));
        }

        let search_text = search_chords.join(SEARCH_CHORD_JOINER);
        trace!(shortcut = %sequence, search = %search_text, "rendered shortcut");

        let root = children.into_iter().fold(
            Element::span()
                .class("button-sequence")
                .attr("data-shortcut", sequence.to_string())
                .attr("data-shortcut-sequence", search_text.clone())
                .attr("data-pagefind-index-attrs", "data-shortcut-sequence"),
            Element::child,
        );

        Ok(RenderedShortcut {
            node: root.into(),
            search_text,
        })
    }

    fn render_action(&self, action: &Action) -> Result<Node> {
        let ids = action.ids().join(" ");

        if action.is_pad() {
            let pad = Element::span()
                .class("pad")
                .text(action.label().unwrap_or(DEFAULT_PAD_LABEL));
            return Ok(with_ids(pad, ids).into());
        }

        let mut node = with_ids(Element::span().class("action"), ids);
        if let Some(before) = action.label_before() {
            node = node.child(Element::span().class("label-before").text(format!("{before}\u{a0}")));
        }

        match action.icon() {
            Some(icon) => {
                let alt = action
                    .label()
                    .or(action.search_text())
                    .unwrap_or(icon)
                    .to_string();
                let src = self.icons.get(icon).ok_or_else(|| Error::UnknownIcon {
                    icon: icon.to_string(),
                    alt: alt.clone(),
                })?;
                node = node.child(
                    Element::img()
                        .class("icon")
                        .attr("src", src)
                        .attr("alt", alt),
                );
            }
            None => {
                node = node.child(
                    Element::span()
                        .class("label")
                        .text(action.label().unwrap_or_default()),
                );
            }
        }

        Ok(node.into())
    }
}

fn joiner(class: &str, text: &str) -> Node {
    Element::span()
        .class(class)
        .attr("data-pagefind-ignore", "")
        .text(text)
        .into()
}

fn with_ids(element: Element, ids: String) -> Element {
    if ids.is_empty() {
        element
    } else {
        element.attr("data-control-id", ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::ControlTable;

    fn icons() -> IconRegistry {
        [
            ("button-keyboard", "/icons/button-keyboard.svg"),
            ("select", "/icons/select.svg"),
            ("turn-select-left", "/icons/turn-select-left.svg"),
            ("turn-gold", "/icons/turn-gold.svg"),
        ]
        .into_iter()
        .collect()
    }

    fn render(text: &str) -> Result<RenderedShortcut> {
        let table = ControlTable::deluge();
        let sequence = Sequence::parse(text, &table)?;
        Renderer::new(&icons()).render(&sequence)
    }

    #[test]
    fn test_render_buttons() {
        let rendered = render("Shift + Load > Load").unwrap();
        let html = rendered.to_html();
        assert!(html.starts_with("<span class=\"button-sequence\""));
        assert!(html.contains("<span class=\"label\">Shift</span>"));
        assert!(html.contains("&nbsp;+ "));
        assert!(html.contains(" &gt; "));
        assert_eq!(rendered.search_text(), "Shift + Load > Load");
    }

    #[test]
    fn test_search_text_joiners() {
        let rendered = render("Shift + Load > Shift + Save").unwrap();
        let search = rendered.search_text();
        let chords: Vec<&str> = search.split(" > ").collect();
        assert_eq!(chords.len(), 2);
        for chord in chords {
            assert_eq!(chord.matches(" + ").count(), 1);
        }
        assert_eq!(search.matches('>').count(), 1);
    }

    #[test]
    fn test_visual_joiners_match_search_text() {
        let rendered = render("Shift + Load > Shift + Save").unwrap();
        let text = rendered.node().text_content();
        assert_eq!(text.matches("\u{a0}+ ").count(), 2);
        assert_eq!(text.matches(" > ").count(), 1);
    }

    #[test]
    fn test_pad_defaults_to_pad_label() {
        let rendered = render("Pad").unwrap();
        assert!(rendered
            .to_html()
            .contains("<span class=\"pad\">Pad</span>"));
    }

    #[test]
    fn test_pad_with_coordinate() {
        let rendered = render("Shift + Pad c4").unwrap();
        let html = rendered.to_html();
        assert!(html.contains("<span class=\"pad\" data-control-id=\"C4\">C4</span>"));
        assert_eq!(rendered.search_text(), "Shift + C4 Pad");
    }

    #[test]
    fn test_knob_icon_and_label_before() {
        let rendered = render("Turn Select Left").unwrap();
        let html = rendered.to_html();
        assert!(html.contains("<span class=\"label-before\">turn&nbsp;</span>"));
        assert!(html.contains("src=\"/icons/turn-select-left.svg\""));
        assert!(html.contains("alt=\"Select left\""));
        assert_eq!(rendered.search_text(), "turn Select left");
    }

    #[test]
    fn test_gold_knob_id() {
        let rendered = render("turn gold lower").unwrap();
        assert!(rendered.to_html().contains("data-control-id=\"Lower\""));
    }

    #[test]
    fn test_icon_button() {
        let html = render("Shift + Keyboard").unwrap().to_html();
        assert!(html.contains("src=\"/icons/button-keyboard.svg\""));
        assert!(html.contains("alt=\"Keyboard\""));
    }

    #[test]
    fn test_unknown_icon_fails_whole_render() {
        let err = render("Shift + Turn Select Right").unwrap_err();
        match err {
            Error::UnknownIcon { icon, alt } => {
                assert_eq!(icon, "turn-select-right");
                assert_eq!(alt, "Select right");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rendered_shortcut_parses_back() {
        let table = ControlTable::deluge();
        let original = Sequence::parse("shift + turn select left > pad audition 1", &table).unwrap();
        let rendered = Renderer::new(&icons()).render(&original).unwrap();

        let Node::Element(root) = rendered.node() else {
            panic!("root is not an element");
        };
        let canonical = root.attribute("data-shortcut").unwrap();
        assert_eq!(Sequence::parse(canonical, &table).unwrap(), original);
    }

    #[test]
    fn test_visual_parts_hidden_from_index() {
        let rendered = render("Shift + Play").unwrap();
        let Node::Element(root) = rendered.node() else {
            panic!("root is not an element");
        };
        assert_eq!(
            root.attribute("data-pagefind-index-attrs"),
            Some("data-shortcut-sequence")
        );
        for child in root.children() {
            let Node::Element(element) = child else {
                panic!("unexpected text child");
            };
            assert_eq!(element.attribute("data-pagefind-ignore"), Some(""));
        }
    }
}
