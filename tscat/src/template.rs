/* Copyright (C) 2025 Olivier Goffart <ogoffart@woboq.com>

Permission is hereby granted, free of charge, to any person obtaining a copy of this software and
associated documentation files (the "Software"), to deal in the Software without restriction,
including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense,
and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so,
subject to the following conditions:

The above copyright notice and this permission notice shall be included in all copies or substantial
portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT
NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES
OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
*/

//! Placeholder substitution.
//!
//! Catalog strings use the Qt placeholder syntax:
//!
//!  * `%1` to `%99` are replaced by the positional arguments,
//!  * `%n` is replaced by the count of a plural message,
//!  * `%L1` and `%Ln` do the same with locale digit grouping.
//!
//! A [`Template`] is scanned once, when the catalog is loaded. Rendering only walks the
//! segments. Placeholders without a matching argument are copied verbatim.

use crate::locale::NumberFormat;
use std::borrow::Cow;
use std::fmt;
use std::ops::Range;

/// Separates the length variants of one translation. The first variant is the one displayed.
pub const LENGTH_VARIANT_SEPARATOR: char = '\u{9c}';

/// One argument for a `%1`..`%99` placeholder.
#[derive(Clone, Debug, PartialEq)]
pub enum Arg<'a> {
    Text(Cow<'a, str>),
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Arg<'_> {
    fn write(&self, out: &mut String, localized: bool, numbers: &NumberFormat) {
        match (self, localized) {
            (Arg::Text(text), _) => out.push_str(text),
            (Arg::Int(i), true) => out.push_str(&numbers.format_i64(*i)),
            (Arg::UInt(u), true) => out.push_str(&numbers.format_u64(*u)),
            (Arg::Float(x), true) => out.push_str(&numbers.format_f64(*x)),
            (arg, false) => {
                use fmt::Write;
                // writing into a String cannot fail
                let _ = write!(out, "{arg}");
            }
        }
    }
}

impl fmt::Display for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Text(text) => f.write_str(text),
            Arg::Int(i) => i.fmt(f),
            Arg::UInt(u) => u.fmt(f),
            Arg::Float(x) => x.fmt(f),
        }
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(text: &'a str) -> Self {
        Arg::Text(Cow::Borrowed(text))
    }
}

impl<'a> From<&'a String> for Arg<'a> {
    fn from(text: &'a String) -> Self {
        Arg::Text(Cow::Borrowed(text))
    }
}

impl From<String> for Arg<'_> {
    fn from(text: String) -> Self {
        Arg::Text(Cow::Owned(text))
    }
}

impl<'a> From<Cow<'a, str>> for Arg<'a> {
    fn from(text: Cow<'a, str>) -> Self {
        Arg::Text(text)
    }
}

macro_rules! arg_from_number {
    ($variant:ident => $($t:ty),*) => {
        $(impl From<$t> for Arg<'_> {
            fn from(value: $t) -> Self {
                Arg::$variant(value as _)
            }
        })*
    };
}

arg_from_number!(Int => i8, i16, i32, i64, isize);
arg_from_number!(UInt => u8, u16, u32, u64, usize);
arg_from_number!(Float => f32, f64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Placeholder {
    Literal,
    /// `%1` is index 0
    Arg { index: usize, localized: bool },
    Count { localized: bool },
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Segment {
    span: Range<usize>,
    kind: Placeholder,
}

/// A catalog string with its placeholders already located.
#[derive(Clone)]
pub struct Template {
    text: String,
    segments: Box<[Segment]>,
    /// Number of segments that make up the first length variant.
    primary: usize,
}

impl Template {
    pub fn parse(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.find(LENGTH_VARIANT_SEPARATOR).unwrap_or(text.len());
        let mut segments = Vec::new();
        scan(&text, 0..end, &mut segments);
        let primary = segments.len();
        scan(&text, end..text.len(), &mut segments);
        Self {
            text,
            segments: segments.into_boxed_slice(),
            primary,
        }
    }

    /// The full text, including every length variant.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The text shown by default: the first length variant.
    pub fn primary(&self) -> &str {
        self.length_variants().next().unwrap_or_default()
    }

    pub fn length_variants(&self) -> impl Iterator<Item = &str> {
        self.text.split(LENGTH_VARIANT_SEPARATOR)
    }

    /// Highest `%N` used, or zero if the text has no positional placeholder.
    pub fn highest_argument(&self) -> usize {
        self.segments[..self.primary]
            .iter()
            .filter_map(|s| match s.kind {
                Placeholder::Arg { index, .. } => Some(index + 1),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Returns true if the primary text contains `%n` or `%Ln`.
    pub fn uses_count(&self) -> bool {
        self.segments[..self.primary]
            .iter()
            .any(|s| matches!(s.kind, Placeholder::Count { .. }))
    }

    /// Substitutes the placeholders of the primary text.
    pub fn render(&self, args: &[Arg<'_>], count: Option<u64>, numbers: &NumberFormat) -> String {
        self.render_segments(&self.segments[..self.primary], args, count, numbers)
    }

    /// Substitutes the placeholders of the whole text. Length variant separators are kept.
    pub fn render_all(&self, args: &[Arg<'_>], count: Option<u64>, numbers: &NumberFormat) -> String {
        self.render_segments(&self.segments, args, count, numbers)
    }

    fn render_segments(
        &self,
        segments: &[Segment],
        args: &[Arg<'_>],
        count: Option<u64>,
        numbers: &NumberFormat,
    ) -> String {
        let mut out = String::with_capacity(self.text.len());
        for segment in segments {
            let verbatim = &self.text[segment.span.clone()];
            match segment.kind {
                Placeholder::Literal => out.push_str(verbatim),
                Placeholder::Arg { index, localized } => match args.get(index) {
                    Some(arg) => arg.write(&mut out, localized, numbers),
                    None => out.push_str(verbatim),
                },
                Placeholder::Count { localized } => match count {
                    Some(n) if localized => out.push_str(&numbers.format_u64(n)),
                    Some(n) => out.push_str(&n.to_string()),
                    None => out.push_str(verbatim),
                },
            }
        }
        out
    }
}

impl PartialEq for Template {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Template {}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.text, f)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.primary())
    }
}

impl From<&str> for Template {
    fn from(text: &str) -> Self {
        Template::parse(text)
    }
}

impl From<String> for Template {
    fn from(text: String) -> Self {
        Template::parse(text)
    }
}

fn scan(text: &str, range: Range<usize>, segments: &mut Vec<Segment>) {
    let Range { start, end } = range;
    let bytes = text.as_bytes();
    let mut literal_start = start;
    let mut pos = start;
    while let Some(offset) = text[pos..end].find('%') {
        let percent = pos + offset;
        let Some((kind, len)) = placeholder_at(&bytes[percent + 1..end]) else {
            pos = percent + 1;
            continue;
        };
        if literal_start < percent {
            segments.push(Segment {
                span: literal_start..percent,
                kind: Placeholder::Literal,
            });
        }
        pos = percent + 1 + len;
        segments.push(Segment {
            span: percent..pos,
            kind,
        });
        literal_start = pos;
    }
    if literal_start < end {
        segments.push(Segment {
            span: literal_start..end,
            kind: Placeholder::Literal,
        });
    }
}

/// Recognizes what follows a '%'. Returns the placeholder and the number of bytes it spans.
fn placeholder_at(rest: &[u8]) -> Option<(Placeholder, usize)> {
    let (localized, skip) = match rest.first() {
        Some(b'L') => (true, 1),
        _ => (false, 0),
    };
    let rest = &rest[skip..];
    match rest {
        [b'n', ..] => Some((Placeholder::Count { localized }, skip + 1)),
        [d @ b'1'..=b'9', e @ b'0'..=b'9', ..] => {
            let index = ((d - b'0') * 10 + (e - b'0')) as usize;
            Some((Placeholder::Arg { index: index - 1, localized }, skip + 2))
        }
        [d @ b'1'..=b'9', ..] => {
            let index = (d - b'0') as usize;
            Some((Placeholder::Arg { index: index - 1, localized }, skip + 1))
        }
        _ => None,
    }
}
