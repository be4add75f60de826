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

use std::fmt;

/// What went wrong while reading a `.ts` catalog.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ParseErrorKind {
    /// The input is not well-formed XML, or ends inside an element.
    #[error("malformed XML: {0}")]
    Xml(String),
    /// The document has no root element.
    #[error("missing <TS> root element")]
    MissingRoot,
    /// The root element is not `<TS>`.
    #[error("root element is <{0}>, expected <TS>")]
    NotACatalog(String),
    #[error("unexpected <{found}> inside <{parent}>")]
    UnexpectedElement { found: String, parent: &'static str },
    #[error("<context> has no <name>")]
    MissingContextName,
    #[error("<message> has no <source>")]
    MissingSource,
    #[error("unterminated <{0}>")]
    Unterminated(&'static str),
    #[error("invalid value '{value}' for attribute '{attribute}'")]
    InvalidAttribute { attribute: &'static str, value: String },
    #[error("<numerusform> in a message that is not numerus")]
    UnexpectedNumerusForm,
}

/// Where a [`ParseError`] happened.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseLocation {
    /// 1-based line in the input.
    pub line: u64,
    /// 1-based column in the input.
    pub column: u64,
    /// Index of the `<context>` being read, counting from 0.
    pub context: Option<usize>,
    /// Index of the `<message>` within that context, counting from 0.
    pub message: Option<usize>,
}

impl fmt::Display for ParseLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)?;
        match (self.context, self.message) {
            (Some(context), Some(message)) => write!(f, " (context #{context}, message #{message})"),
            (Some(context), None) => write!(f, " (context #{context})"),
            _ => Ok(()),
        }
    }
}

/// A catalog could not be parsed. No part of it was loaded.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at {location}")]
pub struct ParseError {
    kind: ParseErrorKind,
    location: ParseLocation,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, location: ParseLocation) -> Self {
        Self { kind, location }
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    pub fn location(&self) -> ParseLocation {
        self.location
    }
}

/// This error type is returned when loading a catalog from a file or from memory.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("could not read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("error parsing `ts` file: {0}")]
    Parse(#[from] ParseError),
    /// This variant describes a failure during parsing of the `.po` file.
    #[error("error parsing `po` file: {0}")]
    PoParse(String),
    /// The plural rules given by the catalog could not be compiled.
    #[error(transparent)]
    InvalidPluralRules(#[from] crate::plural::PluralRuleError),
}

/// Failure while serializing a catalog.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum WriteError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("XML emitter error: {0}")]
    Xml(#[from] xml::writer::Error),
}
