//! Output line classification.
//!
//! Tools write plain text, except for lines carrying the private structured
//! prefix [`STRUCTURED_PREFIX`]. Those are emitted by the MSBuild logger and
//! hold base64 of a level byte followed by the UTF-8 message:
//!
//! ```text
//! <BM>AkNTMDE2ODogdW51c2VkIHZhcmlhYmxl
//!     └── [2]"CS0168: unused variable" → Warning
//! ```

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use std::sync::LazyLock;

use super::invocation::{LogLevel, OutputLine, OutputStream};

/// Prefix marking a structured (encoded severity + message) output line.
pub const STRUCTURED_PREFIX: &str = "<BM>";

static WARNING_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bwarning\b").expect("valid warning pattern"));

/// Per-tool rules for assigning a level to each output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputClassifier {
    /// Level for ordinary stdout lines
    pub default_level: LogLevel,
    /// Level for ordinary stderr lines
    pub stderr_level: LogLevel,
    /// Promote lines mentioning "warning" to [`LogLevel::Warning`]
    pub promote_warnings: bool,
    /// Decode lines starting with [`STRUCTURED_PREFIX`]
    pub decode_structured: bool,
}

impl Default for OutputClassifier {
    fn default() -> Self {
        Self {
            default_level: LogLevel::Information,
            stderr_level: LogLevel::Error,
            promote_warnings: false,
            decode_structured: false,
        }
    }
}

impl OutputClassifier {
    pub fn new(default_level: LogLevel) -> Self {
        Self {
            default_level,
            ..Default::default()
        }
    }

    pub fn with_warning_promotion(mut self) -> Self {
        self.promote_warnings = true;
        self
    }

    pub fn with_structured_lines(mut self) -> Self {
        self.decode_structured = true;
        self
    }

    /// Classify one raw line.
    pub fn classify(&self, stream: OutputStream, raw: &str) -> OutputLine {
        let raw = raw.trim_end_matches(['\r', '\n']);

        if self.decode_structured
            && let Some(encoded) = raw.strip_prefix(STRUCTURED_PREFIX)
            && let Some((level, text)) = decode_structured(encoded)
        {
            return OutputLine {
                level,
                stream,
                text,
            };
        }

        let base = match stream {
            OutputStream::Stdout => self.default_level,
            OutputStream::Stderr => self.stderr_level,
        };
        let level = if self.promote_warnings
            && base < LogLevel::Warning
            && WARNING_WORD.is_match(raw)
        {
            LogLevel::Warning
        } else {
            base
        };

        OutputLine {
            level,
            stream,
            text: raw.to_string(),
        }
    }
}

fn decode_structured(encoded: &str) -> Option<(LogLevel, String)> {
    let bytes = STANDARD.decode(encoded.trim()).ok()?;
    let (&code, message) = bytes.split_first()?;
    let level = LogLevel::from_code(code)?;
    let text = String::from_utf8(message.to_vec()).ok()?;
    Some((level, text))
}

/// Encode a message the way the structured logger does.
pub fn encode_structured(level: LogLevel, message: &str) -> String {
    let mut payload = Vec::with_capacity(message.len() + 1);
    payload.push(level.code());
    payload.extend_from_slice(message.as_bytes());
    format!("{}{}", STRUCTURED_PREFIX, STANDARD.encode(payload))
}
