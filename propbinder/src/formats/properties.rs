//! Support for Java-style `.properties` files.
//!
//! Reading follows the usual property file rules: `#` and `!` comments,
//! backslash line continuation, `=`, `:` or whitespace between key and value,
//! and backslash escapes. A value spread over continuation lines is kept as a
//! list of fragments, one per physical line, and only flattened when it
//! becomes a translation (see [`flatten_value`]).

use std::io::{BufRead, Write};

use indoc::indoc;

use crate::{config::EscapingMode, error::Error, traits::Parser};

const GENERATED_HEADER: &str = indoc! {"
    # This file is generated by propbinder from a translation spreadsheet.
    # Edit the spreadsheet and import it again instead of changing this file.
"};

/// A property file as an ordered list of key/value pairs.
///
/// Duplicate keys are kept in file order; deciding which one wins is left to
/// the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    pub properties: Vec<Property>,
}

/// One `key=value` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub key: String,
    /// Value fragments, one per physical line of the logical line.
    pub fragments: Vec<String>,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            fragments: vec![value.into()],
        }
    }

    /// The value as stored in a translation.
    pub fn value(&self) -> String {
        flatten_value(&self.fragments)
    }
}

/// Joins list fragments with a comma.
///
/// This cannot tell a list apart from a single string that contains a comma,
/// so it is lossy. Every place that turns a property into a translation goes
/// through here.
pub fn flatten_value(fragments: &[String]) -> String {
    fragments.join(",")
}

impl Format {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            properties: pairs
                .into_iter()
                .map(|(key, value)| Property::new(key, value))
                .collect(),
        }
    }

    /// Flattened key/value pairs in file order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, String)> {
        self.properties.iter().map(|p| (p.key.as_str(), p.value()))
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.properties
            .iter()
            .rev()
            .find(|p| p.key == key)
            .map(Property::value)
    }
}

impl Parser for Format {
    type Options = EscapingMode;

    fn from_reader<R: BufRead>(reader: R, options: &EscapingMode) -> Result<Self, Error> {
        let mut properties = Vec::new();
        let mut lines = reader.lines();

        while let Some(line) = lines.next() {
            let line = line?;
            let trimmed = line.trim_start_matches([' ', '\t', '\u{c}']);
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }

            // Collect the physical lines of this logical line.
            let mut physical = vec![trimmed.to_string()];
            while ends_with_continuation(physical.last().map_or("", String::as_str)) {
                let Some(next) = lines.next() else {
                    break;
                };
                let next = next?;
                if let Some(last) = physical.last_mut() {
                    last.pop();
                }
                physical.push(next.trim_start_matches([' ', '\t', '\u{c}']).to_string());
            }
            if let Some(last) = physical.last_mut()
                && ends_with_continuation(last)
            {
                // Continuation at end of input.
                last.pop();
            }

            properties.push(parse_logical_line(&physical, *options));
        }

        Ok(Format { properties })
    }

    fn to_writer<W: Write>(&self, mut writer: W, options: &EscapingMode) -> Result<(), Error> {
        let mut content = String::from(GENERATED_HEADER);
        for property in &self.properties {
            content.push_str(&escape(&property.key, true, *options));
            content.push('=');
            content.push_str(&escape(&property.value(), false, *options));
            content.push('\n');
        }
        writer.write_all(content.as_bytes()).map_err(Error::Io)
    }
}

/// An odd number of trailing backslashes continues the line.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn parse_logical_line(physical: &[String], mode: EscapingMode) -> Property {
    let first = physical.first().map_or("", String::as_str);
    let (raw_key, first_value) = split_key_value(first);

    let mut fragments = Vec::with_capacity(physical.len());
    fragments.push(unescape(first_value, mode));
    for line in physical.iter().skip(1) {
        fragments.push(unescape(line, mode));
    }
    // A key followed by nothing but a continuation leaves an empty first fragment.
    if fragments.len() > 1 && first_value.is_empty() {
        fragments.remove(0);
    }

    Property {
        key: unescape(raw_key, mode),
        fragments,
    }
}

/// Splits at the first unescaped `=`, `:` or whitespace, then skips the
/// separator and surrounding whitespace.
fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\u{c}' => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let mut rest = line[key_end..].trim_start_matches([' ', '\t', '\u{c}']);
    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped.trim_start_matches([' ', '\t', '\u{c}']);
    }
    (key, rest)
}

fn unescape(text: &str, mode: EscapingMode) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut pending_high: Option<u16> = None;

    while let Some(c) = chars.next() {
        if c != '\\' {
            flush_surrogate(&mut out, &mut pending_high);
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            break;
        };
        match next {
            'u' if mode == EscapingMode::JavaUnicode => {
                let hex: String = chars.clone().take(4).collect();
                match u16::from_str_radix(&hex, 16) {
                    Ok(unit) if hex.len() == 4 => {
                        for _ in 0..4 {
                            chars.next();
                        }
                        push_utf16_unit(&mut out, &mut pending_high, unit);
                    }
                    _ => {
                        // Malformed escape, keep the text.
                        flush_surrogate(&mut out, &mut pending_high);
                        out.push('u');
                    }
                }
            }
            other => {
                flush_surrogate(&mut out, &mut pending_high);
                let unescaped = match other {
                    't' => '\t',
                    'n' => '\n',
                    'r' => '\r',
                    'f' => '\u{c}',
                    'u' => {
                        // Native mode keeps `\u` as written.
                        out.push('\\');
                        'u'
                    }
                    c => c,
                };
                out.push(unescaped);
            }
        }
    }
    flush_surrogate(&mut out, &mut pending_high);
    out
}

fn push_utf16_unit(out: &mut String, pending_high: &mut Option<u16>, unit: u16) {
    match unit {
        0xD800..=0xDBFF => {
            flush_surrogate(out, pending_high);
            *pending_high = Some(unit);
        }
        0xDC00..=0xDFFF => match pending_high.take() {
            Some(high) => {
                let decoded = char::decode_utf16([high, unit])
                    .next()
                    .and_then(Result::ok)
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                out.push(decoded);
            }
            None => out.push(char::REPLACEMENT_CHARACTER),
        },
        _ => {
            flush_surrogate(out, pending_high);
            out.push(char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER));
        }
    }
}

fn flush_surrogate(out: &mut String, pending_high: &mut Option<u16>) {
    if pending_high.take().is_some() {
        out.push(char::REPLACEMENT_CHARACTER);
    }
}

fn escape(text: &str, is_key: bool, mode: EscapingMode) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, c) in text.chars().enumerate() {
        match c {
            '\\' => out.push_str(r"\\"),
            '\t' => out.push_str(r"\t"),
            '\n' => out.push_str(r"\n"),
            '\r' => out.push_str(r"\r"),
            '\u{c}' => out.push_str(r"\f"),
            ' ' if is_key || i == 0 => out.push_str(r"\ "),
            '=' | ':' if is_key => {
                out.push('\\');
                out.push(c);
            }
            '#' | '!' if i == 0 => {
                out.push('\\');
                out.push(c);
            }
            c if mode == EscapingMode::JavaUnicode && !c.is_ascii() => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{:04X}", unit));
                }
            }
            c => out.push(c),
        }
    }
    out
}
