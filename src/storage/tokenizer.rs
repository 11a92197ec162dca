//! Splitting GEDCOM text into numbered lines and whitespace-separated words.

use crate::storage::error::Cause;

/// One physical line of input, without its terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    number: usize,
    text: &'a str,
}

impl<'a> Line<'a> {
    /// The 1-based physical line number.
    pub const fn number(&self) -> usize {
        self.number
    }

    /// Length of the line in bytes.
    pub const fn length(&self) -> usize {
        self.text.len()
    }

    /// Whether the line holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim_matches(is_separator).is_empty()
    }

    /// The level number that starts the line.
    pub fn level(&self) -> Result<usize, Cause> {
        let word = self.word(0).unwrap_or_default();
        if word.is_empty() || !word.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Cause::InvalidLevel(word.to_string()));
        }
        word.parse()
            .map_err(|_| Cause::InvalidLevel(word.to_string()))
    }

    /// The `index`-th word; word 0 is the level.
    pub fn word(&self, index: usize) -> Option<&'a str> {
        let text = self.text;
        bounds(text).nth(index).map(|(start, end)| &text[start..end])
    }

    /// The word after the level: a tag, or an identifier on a record line.
    pub fn tag(&self) -> Option<&'a str> {
        self.word(1)
    }

    /// Everything after the `index`-th word, surrounding whitespace removed.
    ///
    /// Empty when the line has no such word or nothing follows it.
    pub fn rest_after(&self, index: usize) -> &'a str {
        let text = self.text;
        bounds(text)
            .nth(index)
            .map_or("", |(_, end)| text[end..].trim_matches(is_separator))
    }

    /// Everything after the tag.
    pub fn value(&self) -> &'a str {
        self.rest_after(1)
    }
}

/// Byte ranges of the words in `text`.
fn bounds(text: &str) -> impl Iterator<Item = (usize, usize)> + '_ {
    let mut position = 0;
    std::iter::from_fn(move || {
        let rest = &text[position..];
        let start = position + rest.find(|c| !is_separator(c))?;
        let end = text[start..]
            .find(is_separator)
            .map_or(text.len(), |offset| start + offset);
        position = end;
        Some((start, end))
    })
}

const fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t')
}

/// Iterator over the lines of a buffer.
///
/// `CR`, `LF` and `CRLF` all end a line. A terminator at the very end of the
/// buffer does not start another line.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    rest: &'a str,
    number: usize,
}

/// Splits `buffer` into numbered lines.
pub const fn lines(buffer: &str) -> Lines<'_> {
    Lines {
        rest: buffer,
        number: 0,
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        self.number += 1;

        let (text, rest) = match self.rest.find(['\r', '\n']) {
            Some(end) => {
                let terminator = if self.rest[end..].starts_with("\r\n") { 2 } else { 1 };
                (&self.rest[..end], &self.rest[end + terminator..])
            }
            None => (self.rest, ""),
        };
        self.rest = rest;

        Some(Line {
            number: self.number,
            text,
        })
    }
}
