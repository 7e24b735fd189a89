//! Command-line assembly for external build tools.
//!
//! [`CommandLine`] accumulates argument tokens and renders them into the single
//! argument string handed to the process executor. Rendering follows the
//! Windows `CommandLineToArgvW` conventions that MSBuild, dotnet and
//! vstest.console parse with:
//!
//! | Token | Rendered |
//! |-------|----------|
//! | `/t:Build` | `/t:Build ` |
//! | `My Project.csproj` | `"My Project.csproj" ` |
//! | `say "hi"` | `"say \"hi\"" ` |
//! | `C:\out dir\` | `"C:\out dir\\" ` |
//! | (empty) | ` ` |
//!
//! Every token is followed by exactly one space, including the last one.
//!
//! Executors that start children without a Windows command line use
//! [`CommandLine::argv`] instead, which yields the tokens themselves.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
enum Token {
    /// Quoted on render when it contains whitespace or a double quote
    Value(String),
    /// User-supplied argument text, rendered verbatim
    Raw(String),
}

/// An ordered sequence of argument tokens.
///
/// The same tokens always render to the same string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandLine {
    tokens: Vec<Token>,
}

impl CommandLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single token.
    pub fn append(&mut self, token: impl Into<String>) {
        self.tokens.push(Token::Value(token.into()));
    }

    /// Append already-formed argument text without quoting.
    ///
    /// Used for free-form "additional arguments" entered by the user; blank
    /// text is ignored.
    pub fn append_raw(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !text.trim().is_empty() {
            self.tokens.push(Token::Raw(text.trim().to_string()));
        }
    }

    /// Builder form of [`append`](Self::append).
    pub fn arg(mut self, token: impl Into<String>) -> Self {
        self.append(token);
        self
    }

    /// Append every token in order.
    pub fn args<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for token in tokens {
            self.append(token);
        }
        self
    }

    /// Append `name value` when `value` is present and non-empty.
    pub fn option(mut self, name: &str, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.append(name);
            self.append(value);
        }
        self
    }

    /// Append `name` only when `enabled`.
    pub fn flag(mut self, name: &str, enabled: bool) -> Self {
        if enabled {
            self.append(name);
        }
        self
    }

    /// Append an MSBuild property as a single `/p:Name=value` token.
    pub fn msbuild_property(mut self, name: &str, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.append(format!("/p:{}={}", name, value));
        }
        self
    }

    /// Builder form of [`append_raw`](Self::append_raw).
    pub fn raw(mut self, text: Option<&str>) -> Self {
        if let Some(text) = text {
            self.append_raw(text);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// The tokens as an argument vector.
    ///
    /// Values are passed through untouched. Raw text is split the way a
    /// Windows child would split it, so it means the same on every host.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.tokens.len());
        for token in &self.tokens {
            match token {
                Token::Value(value) => argv.push(value.clone()),
                Token::Raw(text) => argv.extend(split_windows(text)),
            }
        }
        argv
    }

    /// Render the accumulated tokens.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            match token {
                Token::Value(value) => push_quoted(&mut out, value),
                Token::Raw(text) => out.push_str(text),
            }
            out.push(' ');
        }
        out
    }
}

impl std::fmt::Display for CommandLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// Whether a token must be wrapped in double quotes.
pub fn needs_quoting(token: &str) -> bool {
    token.chars().any(|c| c.is_whitespace() || c == '"')
}

fn push_quoted(out: &mut String, token: &str) {
    if !needs_quoting(token) {
        out.push_str(token);
        return;
    }

    out.push('"');
    for c in token.chars() {
        if c == '"' {
            out.push('\\');
        }
        out.push(c);
    }

    // An odd run of trailing backslashes would escape the closing quote.
    let trailing = token.chars().rev().take_while(|&c| c == '\\').count();
    if trailing % 2 == 1 {
        out.push('\\');
    }
    out.push('"');
}

/// Split argument text with `CommandLineToArgvW` rules.
///
/// `2n` backslashes before a quote become `n` and the quote toggles quoting;
/// `2n + 1` become `n` and a literal quote. Other backslashes are literal.
pub fn split_windows(text: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;
    let mut backslashes = 0usize;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                backslashes += 1;
                in_token = true;
            }
            '"' => {
                current.extend(std::iter::repeat_n('\\', backslashes / 2));
                if backslashes % 2 == 1 {
                    current.push('"');
                } else if quoted && chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    quoted = !quoted;
                }
                backslashes = 0;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                current.extend(std::iter::repeat_n('\\', backslashes));
                backslashes = 0;
                if in_token {
                    args.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.extend(std::iter::repeat_n('\\', backslashes));
                backslashes = 0;
                current.push(c);
                in_token = true;
            }
        }
    }
    current.extend(std::iter::repeat_n('\\', backslashes));
    if in_token {
        args.push(current);
    }
    args
}
