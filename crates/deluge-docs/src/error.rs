//! Error types for deluge-docs.
//!
//! Every failure while parsing, rendering or rasterizing a directive is fatal
//! to the site build, so the variants here carry enough context to point the
//! author at the offending markdown.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for deluge-docs operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Shortcut Errors ===
    /// A keyword did not name any known control.
    #[error("unknown action \"{keyword}\"{}", suggestion_suffix(.suggestion.as_deref()))]
    UnknownControl {
        /// The keyword as written.
        keyword: String,
        /// The canonical control the author probably meant.
        suggestion: Option<String>,
    },

    /// A chord token named more than one control.
    #[error("\"{token}\" names more than one control ({})", .controls.join(", "))]
    AmbiguousControls {
        /// The chord token as written.
        token: String,
        /// Canonical names of every control found in the token.
        controls: Vec<String>,
    },

    /// A control was given modifiers it does not understand.
    #[error("invalid modifiers for {control}: \"{modifiers}\" ({reason})")]
    InvalidModifiers {
        /// Canonical control name.
        control: String,
        /// The offending modifiers, space separated.
        modifiers: String,
        /// What is wrong with them.
        reason: String,
    },

    /// A control that accepts no modifiers was given some.
    #[error("can't add modifiers to {control} (modifiers used: {modifiers})")]
    ModifiersNotAccepted {
        /// Canonical control name.
        control: String,
        /// The offending modifiers, space separated.
        modifiers: String,
    },

    /// The shortcut text contained characters outside the allowed set.
    #[error("invalid character(s) in shortcut: {characters}")]
    InvalidCharacters {
        /// Each offending character once, in order of appearance.
        characters: String,
    },

    /// The shortcut text was empty.
    #[error("shortcut is empty")]
    EmptyShortcut,

    /// A chord or key between separators was empty.
    #[error("empty key in chord {chord} of \"{text}\"")]
    EmptyKey {
        /// 1-based chord position.
        chord: usize,
        /// The full shortcut text.
        text: String,
    },

    /// Two controls share a name or alias.
    #[error("duplicate control name or alias: {name}")]
    DuplicateControl {
        /// The clashing name.
        name: String,
    },

    // === Rendering Errors ===
    /// An action referenced an icon that has no registered asset.
    #[error("no icon registered for \"{icon}\" (alt text: \"{alt}\")")]
    UnknownIcon {
        /// The icon identifier.
        icon: String,
        /// Alt text of the image that could not be rendered.
        alt: String,
    },

    /// Failed to read the icon asset directory.
    #[error("failed to read icon directory {path}: {source}")]
    IconDirectory {
        /// Path to the icon directory.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Screen Errors ===
    /// The screen payload decompressed to the wrong number of bytes.
    #[error("screen data is {actual} bytes, expected {expected}")]
    ScreenLength {
        /// Number of bytes after decompression.
        actual: usize,
        /// Number of bytes a full frame needs.
        expected: usize,
    },

    /// The screen payload could not be decoded.
    #[error("invalid screen payload: {message}")]
    ScreenPayload {
        /// Description of what went wrong.
        message: String,
    },

    /// A screen scale was zero or not a number.
    #[error("invalid screen scale: {value}")]
    InvalidScale {
        /// The scale as written.
        value: String,
    },

    /// PNG encoding failed.
    #[error("failed to encode PNG: {0}")]
    ImageEncode(#[from] png::EncodingError),

    // === Directive Errors ===
    /// A directive's content was never closed with `]`.
    #[error("content is never closed with \"]\"")]
    UnclosedDirective,

    /// A directive in a markdown document failed.
    #[error("line {line}: :{name} directive: {source}")]
    Directive {
        /// 1-based line of the directive.
        line: usize,
        /// Directive name.
        name: String,
        /// The underlying error.
        #[source]
        source: Box<Error>,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },
}

/// A specialized Result type for deluge-docs operations.
pub type Result<T> = std::result::Result<T, Error>;

fn suggestion_suffix(suggestion: Option<&str>) -> String {
    suggestion.map_or_else(String::new, |s| format!(". Did you mean \"{s}\"?"))
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Self::ScreenPayload {
            message: format!("base64: {err}"),
        }
    }
}

impl Error {
    /// Create an unknown control error without a suggestion.
    #[must_use]
    pub fn unknown_control(keyword: impl Into<String>) -> Self {
        Self::UnknownControl {
            keyword: keyword.into(),
            suggestion: None,
        }
    }

    /// Create an invalid modifiers error.
    #[must_use]
    pub fn invalid_modifiers(
        control: impl Into<String>,
        modifiers: &[&str],
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidModifiers {
            control: control.into(),
            modifiers: modifiers.join(" "),
            reason: reason.into(),
        }
    }

    /// Create a screen payload error.
    #[must_use]
    pub fn screen_payload(message: impl Into<String>) -> Self {
        Self::ScreenPayload {
            message: message.into(),
        }
    }

    /// Wrap this error with the location of the directive that raised it.
    #[must_use]
    pub fn in_directive(self, line: usize, name: impl Into<String>) -> Self {
        Self::Directive {
            line,
            name: name.into(),
            source: Box::new(self),
        }
    }

    /// Check if this error is an unknown control.
    #[must_use]
    pub fn is_unknown_control(&self) -> bool {
        matches!(self.root(), Self::UnknownControl { .. })
    }

    /// Check if this error is a modifier problem.
    #[must_use]
    pub fn is_modifier_error(&self) -> bool {
        matches!(
            self.root(),
            Self::InvalidModifiers { .. } | Self::ModifiersNotAccepted { .. }
        )
    }

    /// The innermost error, looking through directive locations.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Directive { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_control_display() {
        let err = Error::unknown_control("Frobnicate");
        assert_eq!(err.to_string(), "unknown action \"Frobnicate\"");
    }

    #[test]
    fn test_unknown_control_with_suggestion_display() {
        let err = Error::UnknownControl {
            keyword: "Rec".to_string(),
            suggestion: Some("Record".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "unknown action \"Rec\". Did you mean \"Record\"?"
        );
    }

    #[test]
    fn test_invalid_modifiers_display() {
        let err = Error::invalid_modifiers("Gold", &["Upper", "Lower"], "at most one of Upper, Lower");
        let msg = err.to_string();
        assert!(msg.contains("invalid modifiers"));
        assert!(msg.contains("Upper Lower"));
    }

    #[test]
    fn test_ambiguous_controls_display() {
        let err = Error::AmbiguousControls {
            token: "Learn Input".to_string(),
            controls: vec!["Learn".to_string(), "Input".to_string()],
        };
        assert!(err.to_string().contains("Learn, Input"));
    }

    #[test]
    fn test_screen_length_display() {
        let err = Error::ScreenLength {
            actual: 12,
            expected: 768,
        };
        assert_eq!(err.to_string(), "screen data is 12 bytes, expected 768");
    }

    #[test]
    fn test_directive_wraps_source() {
        let err = Error::unknown_control("Nope").in_directive(7, "key");
        let msg = err.to_string();
        assert!(msg.starts_with("line 7: :key directive"));
        assert!(msg.contains("Nope"));
        assert!(err.is_unknown_control());
    }

    #[test]
    fn test_unclosed_directive_display() {
        let err = Error::UnclosedDirective.in_directive(4, "screen");
        assert_eq!(
            err.to_string(),
            "line 4: :screen directive: content is never closed with \"]\""
        );
    }

    #[test]
    fn test_is_modifier_error() {
        assert!(Error::ModifiersNotAccepted {
            control: "Shift".to_string(),
            modifiers: "turn".to_string(),
        }
        .is_modifier_error());
        assert!(!Error::EmptyShortcut.is_modifier_error());
    }

    #[test]
    fn test_from_base64_error() {
        let err: Error = base64::DecodeError::InvalidLength(3).into();
        assert!(matches!(err, Error::ScreenPayload { .. }));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "density must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("density"));
    }
}
