//! Terminal escape sequence handling.
//!
//! Container and build output is often coloured with SGR sequences
//! (`ESC [ ... m`). [`to_html`] turns them into inline `<span style>` markup
//! using a fixed 16-colour palette; [`strip`] removes them for classification
//! and plain-text output. Anything the palette cannot express is dropped,
//! including cursor movement, OSC titles and colours beyond index 15.

use crate::renderer::escape_html;

/// Palette keyed by terminal colour index: 0–7 normal, 8–15 bright.
pub const PALETTE: [&str; 16] = [
    "#000000", "#cd3131", "#0dbc79", "#e5e510", "#2472c8", "#bc3fbc", "#11a8cd", "#e5e5e5",
    "#666666", "#f14c4c", "#23d18b", "#f5f543", "#3b8eea", "#d670d6", "#29b8db", "#ffffff",
];

const ESC: char = '\x1b';
const BEL: char = '\x07';

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
enum Token<'a> {
    Text(&'a str),
    /// Parameters of an SGR (`m`) sequence.
    Sgr(&'a str),
    /// Any other escape sequence; dropped.
    Other,
}

struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.rest.is_empty() {
            return None;
        }
        if !self.rest.starts_with(ESC) {
            let end = self.rest.find(ESC).unwrap_or(self.rest.len());
            let (text, rest) = self.rest.split_at(end);
            self.rest = rest;
            return Some(Token::Text(text));
        }

        let body = &self.rest[ESC.len_utf8()..];
        let (token, consumed) = match body.chars().next() {
            Some('[') => csi(&body[1..]),
            Some(']') => (Token::Other, 1 + osc_len(&body[1..])),
            Some(c) if ('@'..='_').contains(&c) => (Token::Other, c.len_utf8()),
            _ => (Token::Other, 0),
        };
        self.rest = &body[consumed..];
        Some(token)
    }
}

/// Parse a CSI sequence after `ESC [`. Returns the token and the number of
/// bytes consumed including the leading `[`.
fn csi(s: &str) -> (Token<'_>, usize) {
    for (i, b) in s.bytes().enumerate() {
        match b {
            0x20..=0x3f => continue,
            0x40..=0x7e => {
                let token = if b == b'm' { Token::Sgr(&s[..i]) } else { Token::Other };
                return (token, 1 + i + 1);
            }
            // Malformed: stop before the offending byte so it is kept as text.
            _ => return (Token::Other, 1 + i),
        }
    }
    (Token::Other, 1 + s.len())
}

/// Length of an OSC payload including its terminator (BEL or `ESC \`).
fn osc_len(s: &str) -> usize {
    let bel = s.find(BEL).map(|i| (i, BEL.len_utf8()));
    let st = s.find("\x1b\\").map(|i| (i, 2));
    match (bel, st) {
        (Some(a), Some(b)) => {
            let (i, n) = if a.0 < b.0 { a } else { b };
            i + n
        }
        (Some((i, n)), None) | (None, Some((i, n))) => i + n,
        (None, None) => s.len(),
    }
}

fn tokens(s: &str) -> Tokens<'_> {
    Tokens { rest: s }
}

// ---------------------------------------------------------------------------
// SGR state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SgrState {
    fg: Option<u8>,
    bg: Option<u8>,
    bold: bool,
}

impl SgrState {
    fn apply(&mut self, params: &str) {
        let codes: Vec<u16> = if params.is_empty() {
            vec![0]
        } else {
            params
                .split([';', ':'])
                .map(|p| p.parse().unwrap_or(0))
                .collect()
        };

        let mut i = 0;
        while i < codes.len() {
            match codes[i] {
                0 => *self = SgrState::default(),
                1 => self.bold = true,
                22 => self.bold = false,
                n @ 30..=37 => self.fg = Some((n - 30) as u8),
                39 => self.fg = None,
                n @ 40..=47 => self.bg = Some((n - 40) as u8),
                49 => self.bg = None,
                n @ 90..=97 => self.fg = Some((n - 90 + 8) as u8),
                n @ 100..=107 => self.bg = Some((n - 100 + 8) as u8),
                n @ (38 | 48) => {
                    let (color, skip) = extended_color(&codes[i + 1..]);
                    if let Some(idx) = color {
                        if n == 38 {
                            self.fg = Some(idx);
                        } else {
                            self.bg = Some(idx);
                        }
                    }
                    i += skip;
                }
                _ => {}
            }
            i += 1;
        }
    }

    fn css(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(fg) = self.fg {
            parts.push(format!("color:{}", PALETTE[fg as usize]));
        }
        if let Some(bg) = self.bg {
            parts.push(format!("background-color:{}", PALETTE[bg as usize]));
        }
        if self.bold {
            parts.push("font-weight:bold".to_string());
        }
        (!parts.is_empty()).then(|| parts.join(";"))
    }
}

/// Decode the arguments following 38/48. Returns a palette index when the
/// colour fits the palette, and how many arguments were consumed.
fn extended_color(args: &[u16]) -> (Option<u8>, usize) {
    match args {
        [5, n, ..] => ((*n < 16).then_some(*n as u8), 2),
        [2, ..] => (None, args.len().min(4)),
        [_, ..] => (None, 1),
        [] => (None, 0),
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Remove every escape sequence from `s`.
pub fn strip(s: &str) -> String {
    if !s.contains(ESC) {
        return s.to_string();
    }
    tokens(s)
        .filter_map(|t| match t {
            Token::Text(text) => Some(text),
            _ => None,
        })
        .collect()
}

/// HTML-escape `s` and convert its SGR colouring into inline styles.
pub fn to_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut state = SgrState::default();

    for token in tokens(s) {
        match token {
            Token::Text(text) => match state.css() {
                Some(css) => {
                    out.push_str("<span style=\"");
                    out.push_str(&css);
                    out.push_str("\">");
                    out.push_str(&escape_html(text));
                    out.push_str("</span>");
                }
                None => out.push_str(&escape_html(text)),
            },
            Token::Sgr(params) => state.apply(params),
            Token::Other => {}
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
