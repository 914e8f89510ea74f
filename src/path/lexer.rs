//! Byte-level scanner over SVG path data.
//!
//! The parser pulls tokens on demand instead of lexing up front: arc flags may be packed
//! without separators (`a1 1 0 0110 10`), so whether `0110` is one number or two flags
//! followed by a number depends on the grammar position.

use crate::foundation::error::{DrawonError, DrawonResult};

pub(crate) struct Scanner<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    pub(crate) fn offset(&self) -> usize {
        self.pos
    }

    pub(crate) fn skip_ws(&mut self) {
        while self.pos < self.bytes.len() && is_ws(self.bytes[self.pos]) {
            self.pos += 1;
        }
    }

    /// Skip whitespace and at most one comma (the SVG `comma-wsp` production).
    pub(crate) fn skip_comma_ws(&mut self) {
        self.skip_ws();
        if self.pos < self.bytes.len() && self.bytes[self.pos] == b',' {
            self.pos += 1;
            self.skip_ws();
        }
    }

    pub(crate) fn at_end(&mut self) -> bool {
        self.skip_ws();
        self.pos >= self.bytes.len()
    }

    /// Next non-whitespace byte without consuming it.
    pub(crate) fn peek(&mut self) -> Option<u8> {
        self.skip_ws();
        self.bytes.get(self.pos).copied()
    }

    /// Consume one ASCII letter. The caller decides whether it names a command.
    pub(crate) fn letter(&mut self) -> Option<(char, usize)> {
        match self.peek() {
            Some(b) if b.is_ascii_alphabetic() => {
                let at = self.pos;
                self.pos += 1;
                Some((b as char, at))
            }
            _ => None,
        }
    }

    /// Parse one number: `[+-]? (digits ('.' digits?)? | '.' digits) ([eE] [+-]? digits)?`.
    pub(crate) fn number(&mut self) -> DrawonResult<f64> {
        self.skip_ws();
        let start = self.pos;
        let bytes = self.bytes;
        let mut i = start;

        if i < bytes.len() && matches!(bytes[i], b'+' | b'-') {
            i += 1;
        }

        let int_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        let mut digits = i - int_start;

        if i < bytes.len() && bytes[i] == b'.' {
            i += 1;
            let frac_start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            digits += i - frac_start;
        }

        if digits == 0 {
            return Err(match bytes.get(start) {
                Some(_) => DrawonError::malformed(
                    start,
                    format!("expected number, found '{}'", self.token_at(start)),
                ),
                None => DrawonError::malformed(start, "expected number, found end of data"),
            });
        }

        // Only treat `e` as an exponent when digits follow; otherwise leave it for the caller.
        if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
            let mut j = i + 1;
            if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
                j += 1;
            }
            let exp_start = j;
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            if j > exp_start {
                i = j;
            }
        }

        let text = &self.input[start..i];
        let v: f64 = text
            .parse()
            .map_err(|_| DrawonError::malformed(start, format!("invalid number '{text}'")))?;
        if !v.is_finite() {
            return Err(DrawonError::malformed(
                start,
                format!("number '{text}' is out of range"),
            ));
        }
        self.pos = i;
        Ok(v)
    }

    /// Parse a single arc flag digit (`0` or `1`), which needs no trailing separator.
    pub(crate) fn flag(&mut self) -> DrawonResult<bool> {
        self.skip_ws();
        let at = self.pos;
        match self.bytes.get(at) {
            Some(b'0') => {
                self.pos += 1;
                Ok(false)
            }
            Some(b'1') => {
                self.pos += 1;
                Ok(true)
            }
            Some(_) => Err(DrawonError::malformed(
                at,
                format!("expected arc flag 0 or 1, found '{}'", self.token_at(at)),
            )),
            None => Err(DrawonError::malformed(
                at,
                "expected arc flag, found end of data",
            )),
        }
    }

    fn token_at(&self, at: usize) -> &'a str {
        let rest = &self.input[at..];
        let end = rest
            .char_indices()
            .skip(1)
            .find(|&(_, c)| c.is_whitespace() || c == ',')
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        &rest[..end]
    }
}

fn is_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0C')
}

#[cfg(test)]
#[path = "../../tests/unit/path/lexer.rs"]
mod tests;
