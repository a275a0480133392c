//! Markdown directive substitution.
//!
//! Finds `:key[...]` and `:screen[...]{...}` directives in markdown source and
//! replaces them with rendered HTML. Leaf (`::key[...]`) and container
//! (`:::key[...]`) spellings are handled the same way. Fenced code blocks and
//! inline code spans are copied through untouched, as are directives with
//! other names.
//!
//! Any failing directive fails the whole document.

use std::collections::HashMap;

use regex::Regex;
use tracing::{debug, trace};

use crate::config::ScreenConfig;
use crate::controls::ControlTable;
use crate::error::{Error, Result};
use crate::render::{IconRegistry, Renderer};
use crate::screen::{parse_scale, rasterize, OledFrame, ScreenStyle};
use crate::sequence::Sequence;

/// `:name[content]{attributes}` with one to three colons.
const DIRECTIVE_PATTERN: &str = r":{1,3}([A-Za-z][A-Za-z0-9_-]*)\[([^\]]*)\](?:\{([^}\n]*)\})?";

/// A `:key[` or `:screen[` whose content runs past the end of the text.
const UNCLOSED_PATTERN: &str = r"(?:^|[^A-Za-z0-9:]):{1,3}(key|screen)\[[^\]]*$";

/// `name`, `name=value`, `name="value"` or `name='value'`.
const ATTRIBUTE_PATTERN: &str =
    r#"([A-Za-z_][A-Za-z0-9_-]*)(?:=(?:"([^"]*)"|'([^']*)'|([^\s"']+)))?"#;

/// Directive name for shortcuts.
pub const KEY_DIRECTIVE: &str = "key";

/// Directive name for OLED screens.
pub const SCREEN_DIRECTIVE: &str = "screen";

/// Alt text for screens without an `alt` attribute.
pub const DEFAULT_SCREEN_ALT: &str = "OLED screen";

/// How many directives of each kind were rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessStats {
    /// `:key` directives rendered.
    pub keys: usize,
    /// `:screen` directives rendered.
    pub screens: usize,
}

impl ProcessStats {
    /// Total directives rendered.
    #[must_use]
    pub fn total(&self) -> usize {
        self.keys + self.screens
    }
}

impl std::ops::AddAssign for ProcessStats {
    fn add_assign(&mut self, other: Self) {
        self.keys += other.keys;
        self.screens += other.screens;
    }
}

/// A processed markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    /// The document with directives replaced by HTML.
    pub output: String,
    /// What was rendered.
    pub stats: ProcessStats,
}

/// Substitutes directives in markdown documents.
#[derive(Debug)]
pub struct DirectiveProcessor<'a> {
    controls: &'a ControlTable,
    renderer: Renderer<'a>,
    style: ScreenStyle,
    default_scale: u32,
    directive: Regex,
    unclosed: Regex,
    attribute: Regex,
}

impl<'a> DirectiveProcessor<'a> {
    /// Create a processor.
    ///
    /// # Errors
    ///
    /// Returns an error if the screen configuration has invalid colours.
    ///
    /// # Panics
    ///
    /// Panics if the built-in directive patterns fail to compile.
    pub fn new(
        controls: &'a ControlTable,
        icons: &'a IconRegistry,
        screen: &ScreenConfig,
    ) -> Result<Self> {
        Ok(Self {
            controls,
            renderer: Renderer::new(icons),
            style: ScreenStyle::from_config(screen)?,
            default_scale: screen.default_scale,
            directive: Regex::new(DIRECTIVE_PATTERN).expect("Invalid directive pattern"),
            unclosed: Regex::new(UNCLOSED_PATTERN).expect("Invalid unclosed pattern"),
            attribute: Regex::new(ATTRIBUTE_PATTERN).expect("Invalid attribute pattern"),
        })
    }

    /// Replace every directive in `markdown`.
    ///
    /// A `:key[` or `:screen[` left open at the end of a line continues on
    /// the following lines until its `]`, so long screen payloads can be
    /// wrapped.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Directive`] for the first directive that fails,
    /// including one that is never closed.
    pub fn process(&self, markdown: &str) -> Result<Processed> {
        let mut output = String::with_capacity(markdown.len());
        let mut stats = ProcessStats::default();
        let mut fence: Option<(char, usize)> = None;
        let mut pending: Option<(usize, String)> = None;

        for (index, line) in markdown.split_inclusive('\n').enumerate() {
            if pending.is_none() {
                if let Some(marker) = fence_marker(line) {
                    fence = match fence {
                        None => Some(marker),
                        Some((c, n)) if marker.0 == c && marker.1 >= n => None,
                        open => open,
                    };
                    output.push_str(line);
                    continue;
                }
                if fence.is_some() {
                    output.push_str(line);
                    continue;
                }
            }

            let (start, mut block) = pending.take().unwrap_or((index + 1, String::new()));
            block.push_str(line);
            if self.unclosed_directive(&block).is_some() {
                pending = Some((start, block));
                continue;
            }
            self.substitute_block(&block, start, &mut output, &mut stats)?;
        }

        if let Some((start, block)) = pending {
            let name = self.unclosed_directive(&block).unwrap_or(KEY_DIRECTIVE);
            return Err(Error::UnclosedDirective.in_directive(start, name));
        }

        debug!(keys = stats.keys, screens = stats.screens, "processed markdown");
        Ok(Processed { output, stats })
    }

    /// Render the content of a `:key` directive.
    ///
    /// # Errors
    ///
    /// Returns an error if the shortcut does not parse or render.
    pub fn render_key(&self, content: &str) -> Result<String> {
        let sequence = Sequence::parse(content, self.controls)?;
        Ok(self.renderer.render(&sequence)?.to_html())
    }

    /// Render the content and attributes of a `:screen` directive.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload or the `scale` attribute is invalid.
    pub fn render_screen(
        &self,
        content: &str,
        attributes: &HashMap<String, String>,
    ) -> Result<String> {
        let scale = attributes
            .get("scale")
            .map_or(Ok(self.default_scale), |s| parse_scale(s))?;
        let alt = attributes
            .get("alt")
            .map_or(DEFAULT_SCREEN_ALT, String::as_str);

        let frame = OledFrame::decode(content)?;
        Ok(rasterize(&frame, scale, &self.style)?.to_html(alt))
    }

    /// Parse a `{...}` attribute list.
    #[must_use]
    pub fn parse_attributes(&self, text: &str) -> HashMap<String, String> {
        self.attribute
            .captures_iter(text)
            .map(|caps| {
                let value = [2, 3, 4]
                    .into_iter()
                    .find_map(|i| caps.get(i))
                    .map_or_else(String::new, |m| m.as_str().to_string());
                (caps[1].to_string(), value)
            })
            .collect()
    }

    /// The name of a directive opened but not closed at the end of `block`.
    fn unclosed_directive<'b>(&self, block: &'b str) -> Option<&'b str> {
        let (is_code, tail) = code_spans(block).pop()?;
        if is_code {
            return None;
        }
        self.unclosed
            .captures(tail)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Substitute directives in `block`, whose first line is `first_line`.
    fn substitute_block(
        &self,
        block: &str,
        first_line: usize,
        output: &mut String,
        stats: &mut ProcessStats,
    ) -> Result<()> {
        let mut line = first_line;
        for (is_code, segment) in code_spans(block) {
            if is_code {
                output.push_str(segment);
            } else {
                self.substitute(segment, line, output, stats)?;
            }
            line += segment.matches('\n').count();
        }
        Ok(())
    }

    fn substitute(
        &self,
        text: &str,
        first_line: usize,
        output: &mut String,
        stats: &mut ProcessStats,
    ) -> Result<()> {
        let mut last = 0;
        for caps in self.directive.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let preceded_by_word = text[..whole.start()]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric() || c == ':');
            if preceded_by_word {
                continue;
            }

            let line = first_line + text[..whole.start()].matches('\n').count();
            let name = &caps[1];
            let content = &caps[2];
            let attributes = caps.get(3).map_or("", |m| m.as_str());

            let html = match name {
                KEY_DIRECTIVE => {
                    stats.keys += 1;
                    self.render_key(content)
                }
                SCREEN_DIRECTIVE => {
                    stats.screens += 1;
                    self.render_screen(content, &self.parse_attributes(attributes))
                }
                _ => continue,
            }
            .map_err(|e| e.in_directive(line, name))?;

            trace!(line, name, "rendered directive");
            output.push_str(&text[last..whole.start()]);
            output.push_str(&html);
            last = whole.end();
        }
        output.push_str(&text[last..]);
        Ok(())
    }
}

/// The fence character and length if `line` opens or closes a code fence.
fn fence_marker(line: &str) -> Option<(char, usize)> {
    let trimmed = line.trim_start();
    let c = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let count = trimmed.chars().take_while(|x| *x == c).count();
    (count >= 3).then_some((c, count))
}

/// Split a line into `(is_code, text)` segments at inline code spans.
///
/// A span opened by N backticks closes at the next run of exactly N; an
/// unclosed run is plain text.
fn code_spans(line: &str) -> Vec<(bool, &str)> {
    let bytes = line.as_bytes();
    let run_at = |from: usize| bytes[from..].iter().take_while(|b| **b == b'`').count();

    let mut segments = Vec::new();
    let mut plain_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }
        let open = run_at(i);
        let mut j = i + open;
        let mut close = None;
        while j < bytes.len() {
            if bytes[j] == b'`' {
                let run = run_at(j);
                if run == open {
                    close = Some(j + run);
                    break;
                }
                j += run;
            } else {
                j += 1;
            }
        }
        match close {
            Some(end) => {
                if plain_start < i {
                    segments.push((false, &line[plain_start..i]));
                }
                segments.push((true, &line[i..end]));
                plain_start = end;
                i = end;
            }
            None => i += open,
        }
    }
    if plain_start < line.len() {
        segments.push((false, &line[plain_start..]));
    }
    segments
}
