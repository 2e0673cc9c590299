//! Repair of common JSON syntax errors.
//!
//! Hand-edited or scraped JSON often contains JavaScript-isms (comments,
//! single quotes, unquoted keys, trailing commas, `NaN`). [`JsonFixer`]
//! rewrites those into strict JSON, least aggressive step first.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{Serializer, Value, ser::PrettyFormatter};

static UNQUOTED_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([{,]\s*)([a-zA-Z_][a-zA-Z0-9_]*)(\s*:)").expect("failed to compile key regex")
});
static TRAILING_COMMA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r",(\s*[\]}])").expect("failed to compile trailing comma regex")
});
static MULTIPLE_COMMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*,)+").expect("failed to compile comma run regex"));
static LEADING_COMMA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\[{]\s*),+").expect("failed to compile leading comma regex")
});
static NON_JSON_LITERAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:Infinity|NaN|undefined)\b").expect("failed to compile literal regex")
});

/// Passes over the unquoted key pattern; nested objects need more than one.
const UNQUOTED_KEY_PASSES: usize = 5;

/// Outcome of [`JsonFixer::fix_and_validate`].
#[derive(Debug, Clone)]
pub struct FixReport {
    pub content: String,
    pub valid: bool,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct JsonFixer {
    verbose: bool,
    fixes_applied: Vec<String>,
}

impl JsonFixer {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            fixes_applied: Vec::new(),
        }
    }

    pub fn fixes_applied(&self) -> &[String] {
        &self.fixes_applied
    }

    fn log(&mut self, message: String) {
        if self.verbose {
            eprintln!("  [FIX] {}", message);
        }
        self.fixes_applied.push(message);
    }

    pub fn fix_bom(&mut self, content: &str) -> String {
        match content.strip_prefix('\u{feff}') {
            Some(rest) => {
                self.log("Removed BOM (Byte Order Mark)".to_string());
                rest.to_string()
            }
            None => content.to_string(),
        }
    }

    /// Removes `//` and `/* */` comments that are not inside a string.
    pub fn fix_comments(&mut self, content: &str) -> String {
        let chars: Vec<char> = content.chars().collect();
        let mut out = String::with_capacity(content.len());
        let mut in_string = false;
        let mut escape_next = false;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];

            if escape_next {
                out.push(c);
                escape_next = false;
                i += 1;
                continue;
            }

            if c == '\\' && in_string {
                escape_next = true;
                out.push(c);
                i += 1;
                continue;
            }

            if c == '"' {
                in_string = !in_string;
                out.push(c);
                i += 1;
                continue;
            }

            if !in_string && c == '/' && i + 1 < chars.len() {
                match chars[i + 1] {
                    '/' => {
                        while i < chars.len() && chars[i] != '\n' {
                            i += 1;
                        }
                        continue;
                    }
                    '*' => {
                        i += 2;
                        while i + 1 < chars.len() && !(chars[i] == '*' && chars[i + 1] == '/') {
                            i += 1;
                        }
                        i += 2;
                        continue;
                    }
                    _ => {}
                }
            }

            out.push(c);
            i += 1;
        }

        if out != content {
            self.log("Removed JavaScript-style comments".to_string());
        }
        out
    }

    /// Drops C0 control characters other than newline and tab.
    ///
    /// Tabs between tokens are whitespace and stay; tabs inside a string
    /// literal are written as `\t`.
    pub fn fix_control_characters(&mut self, content: &str) -> String {
        let mut out = String::with_capacity(content.len());
        let mut in_string = false;
        let mut escape_next = false;

        for c in content.chars() {
            if c == '\t' {
                if escape_next {
                    out.push('t');
                    escape_next = false;
                } else if in_string {
                    out.push_str("\\t");
                } else {
                    out.push(c);
                }
                continue;
            }

            if c < ' ' && c != '\n' {
                continue;
            }

            if escape_next {
                escape_next = false;
                out.push(c);
                continue;
            }

            if c == '\\' && in_string {
                escape_next = true;
            } else if c == '"' {
                in_string = !in_string;
            }
            out.push(c);
        }

        if out != content {
            self.log("Removed control characters".to_string());
        }
        out
    }

    pub fn fix_infinity_nan(&mut self, content: &str) -> String {
        let out = NON_JSON_LITERAL_RE.replace_all(content, "null").into_owned();
        if out != content {
            self.log("Replaced Infinity/NaN/undefined with null".to_string());
        }
        out
    }

    /// Rewrites single-quoted strings as double-quoted ones.
    ///
    /// Double quotes inside a converted string are escaped and `\'` becomes a
    /// plain apostrophe. Apostrophes inside double-quoted strings are kept.
    pub fn fix_single_quotes(&mut self, content: &str) -> String {
        let mut out = String::with_capacity(content.len());
        let mut in_double = false;
        let mut in_single = false;
        let mut escape_next = false;

        for c in content.chars() {
            if escape_next {
                escape_next = false;
                if in_single && c == '\'' {
                    out.pop();
                }
                out.push(c);
                continue;
            }

            match c {
                '\\' => {
                    escape_next = true;
                    out.push(c);
                }
                '"' if in_single => out.push_str("\\\""),
                '"' => {
                    in_double = !in_double;
                    out.push(c);
                }
                '\'' if !in_double => {
                    in_single = !in_single;
                    out.push('"');
                }
                _ => out.push(c),
            }
        }

        if out != content {
            self.log("Converted single quotes to double quotes".to_string());
        }
        out
    }

    pub fn fix_unquoted_keys(&mut self, content: &str) -> String {
        let mut out = content.to_string();

        for _ in 0..UNQUOTED_KEY_PASSES {
            let next = UNQUOTED_KEY_RE
                .replace_all(&out, r#"${1}"${2}"${3}"#)
                .into_owned();
            if next == out {
                break;
            }
            out = next;
        }

        if out != content {
            self.log("Added quotes to unquoted keys".to_string());
        }
        out
    }

    pub fn fix_multiple_commas(&mut self, content: &str) -> String {
        let (out, count) = replace_until_stable(&MULTIPLE_COMMA_RE, content, ",");
        if count > 0 {
            self.log(format!("Fixed {} sequence(s) of multiple commas", count));
        }
        out
    }

    pub fn fix_leading_commas(&mut self, content: &str) -> String {
        let (out, count) = replace_until_stable(&LEADING_COMMA_RE, content, "${1}");
        if count > 0 {
            self.log(format!("Removed {} leading comma(s)", count));
        }
        out
    }

    pub fn fix_trailing_commas(&mut self, content: &str) -> String {
        let (out, count) = replace_until_stable(&TRAILING_COMMA_RE, content, "${1}");
        if count > 0 {
            self.log(format!("Removed {} trailing comma(s)", count));
        }
        out
    }

    /// Applies every fix in order, from least to most aggressive.
    pub fn fix_all(&mut self, content: &str) -> String {
        self.fixes_applied.clear();

        let content = self.fix_bom(content);
        let content = self.fix_comments(&content);
        let content = self.fix_control_characters(&content);
        let content = self.fix_infinity_nan(&content);
        let content = self.fix_single_quotes(&content);
        let content = self.fix_unquoted_keys(&content);
        let content = self.fix_multiple_commas(&content);
        let content = self.fix_leading_commas(&content);
        self.fix_trailing_commas(&content)
    }

    pub fn validate(content: &str) -> Result<(), String> {
        serde_json::from_str::<Value>(content)
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    /// Returns valid input untouched, otherwise repairs and re-validates it.
    pub fn fix_and_validate(&mut self, content: &str) -> FixReport {
        if Self::validate(content).is_ok() {
            self.fixes_applied.clear();
            return FixReport {
                content: content.to_string(),
                valid: true,
                message: "JSON is already valid".to_string(),
            };
        }

        let fixed = self.fix_all(content);
        match Self::validate(&fixed) {
            Ok(()) => FixReport {
                content: fixed,
                valid: true,
                message: format!(
                    "JSON repaired successfully ({} fix(es) applied)",
                    self.fixes_applied.len()
                ),
            },
            Err(e) => FixReport {
                content: fixed,
                valid: false,
                message: format!("Could not fully repair JSON: {}", e),
            },
        }
    }
}

/// Re-serializes valid JSON with `indent` spaces, keeping key order.
pub fn pretty(content: &str, indent: usize) -> Result<String, String> {
    let value: Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    let indent = " ".repeat(indent);

    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser).map_err(|e| e.to_string())?;

    String::from_utf8(buf).map_err(|e| e.to_string())
}

/// Decodes file bytes as UTF-8, falling back to Latin-1.
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

fn replace_until_stable(re: &Regex, content: &str, replacement: &str) -> (String, usize) {
    let mut out = content.to_string();
    let mut count = 0;

    loop {
        let matches = re.find_iter(&out).count();
        if matches == 0 {
            break;
        }
        let next = re.replace_all(&out, replacement).into_owned();
        if next == out {
            break;
        }
        count += matches;
        out = next;
    }

    (out, count)
}
