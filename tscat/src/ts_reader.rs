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

//! Reader for the Qt Linguist `.ts` format.
//!
//! The XML is pulled event by event and the catalog is built in the same pass. Entities are
//! decoded by the XML parser; `<byte value="x1f"/>` elements, which `lupdate` writes for
//! characters XML cannot carry, are decoded here.

use crate::catalog::{Catalog, CatalogHeader, Context, Location, Message, Status};
use crate::error::{ParseError, ParseErrorKind, ParseLocation};
use crate::template::{Template, LENGTH_VARIANT_SEPARATOR};
use std::io::Read;
use xml::attribute::OwnedAttribute;
use xml::common::Position;
use xml::reader::{EventReader, ParserConfig, XmlEvent};

pub(crate) fn read_catalog<R: Read>(source: R) -> Result<Catalog, ParseError> {
    let mut reader = TsReader::new(source);
    let catalog = loop {
        match reader.next()? {
            XmlEvent::StartElement {
                name, attributes, ..
            } => {
                if name.local_name != "TS" {
                    return Err(reader.error(ParseErrorKind::NotACatalog(name.local_name)));
                }
                break reader.read_ts(&attributes)?;
            }
            XmlEvent::EndDocument => return Err(reader.error(ParseErrorKind::MissingRoot)),
            _ => {}
        }
    };
    // let the XML parser check what follows the root element
    while !matches!(reader.next()?, XmlEvent::EndDocument) {}

    tracing::debug!(
        contexts = catalog.contexts().len(),
        messages = catalog.len(),
        language = catalog.language().unwrap_or_default(),
        "loaded catalog"
    );
    Ok(catalog)
}

/// Text and children collected from a `<translation>` or `<numerusform>`.
#[derive(Default)]
struct Body {
    text: String,
    length_variants: Vec<String>,
    numerus_forms: Vec<String>,
}

impl Body {
    fn into_variant(self) -> String {
        if self.length_variants.is_empty() {
            self.text
        } else {
            let mut separator = [0; 4];
            self.length_variants
                .join(LENGTH_VARIANT_SEPARATOR.encode_utf8(&mut separator))
        }
    }
}

struct TsReader<R: Read> {
    events: EventReader<R>,
    context: Option<usize>,
    message: Option<usize>,
}

impl<R: Read> TsReader<R> {
    fn new(source: R) -> Self {
        let events = ParserConfig::new()
            .trim_whitespace(false)
            .whitespace_to_characters(true)
            .cdata_to_characters(true)
            .coalesce_characters(true)
            .ignore_comments(true)
            .create_reader(source);
        Self {
            events,
            context: None,
            message: None,
        }
    }

    fn location(&self, line: u64, column: u64) -> ParseLocation {
        ParseLocation {
            line: line + 1,
            column: column + 1,
            context: self.context,
            message: self.message,
        }
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        let position = self.events.position();
        ParseError::new(kind, self.location(position.row, position.column))
    }

    fn unexpected(&self, found: String, parent: &'static str) -> ParseError {
        self.error(ParseErrorKind::UnexpectedElement { found, parent })
    }

    fn invalid_attribute(&self, attribute: &'static str, value: &str) -> ParseError {
        self.error(ParseErrorKind::InvalidAttribute {
            attribute,
            value: value.to_owned(),
        })
    }

    fn next(&mut self) -> Result<XmlEvent, ParseError> {
        self.events.next().map_err(|e| {
            let position = e.position();
            ParseError::new(
                ParseErrorKind::Xml(e.msg().to_owned()),
                self.location(position.row, position.column),
            )
        })
    }

    /// Consumes events up to and including the end of the current element.
    fn skip_element(&mut self, element: &'static str) -> Result<(), ParseError> {
        let mut depth = 0usize;
        loop {
            match self.next()? {
                XmlEvent::StartElement { .. } => depth += 1,
                XmlEvent::EndElement { .. } if depth == 0 => return Ok(()),
                XmlEvent::EndElement { .. } => depth -= 1,
                XmlEvent::EndDocument => {
                    return Err(self.error(ParseErrorKind::Unterminated(element)))
                }
                _ => {}
            }
        }
    }

    fn read_ts(&mut self, attributes: &[OwnedAttribute]) -> Result<Catalog, ParseError> {
        let header = CatalogHeader {
            version: attribute(attributes, "version"),
            language: attribute(attributes, "language"),
            source_language: attribute(attributes, "sourcelanguage"),
        };
        let mut contexts = Vec::new();
        loop {
            match self.next()? {
                XmlEvent::StartElement { name, .. } => match name.local_name.as_str() {
                    "context" => {
                        self.context = Some(contexts.len());
                        contexts.push(self.read_context()?);
                        self.context = None;
                    }
                    "defaultcodec" | "dependencies" => self.skip_element("TS")?,
                    other if other.starts_with("extra-") => self.skip_element("TS")?,
                    _ => return Err(self.unexpected(name.local_name, "TS")),
                },
                XmlEvent::EndElement { .. } => break,
                XmlEvent::EndDocument => return Err(self.error(ParseErrorKind::Unterminated("TS"))),
                _ => {}
            }
        }
        Ok(Catalog::new(header, contexts))
    }

    fn read_context(&mut self) -> Result<Context, ParseError> {
        let mut name = None;
        let mut comment = None;
        let mut messages = Vec::new();
        loop {
            match self.next()? {
                XmlEvent::StartElement {
                    name: element,
                    attributes,
                    ..
                } => match element.local_name.as_str() {
                    "name" => name = Some(self.read_text("name")?),
                    "comment" => comment = Some(self.read_text("comment")?),
                    "message" => {
                        self.message = Some(messages.len());
                        messages.push(self.read_message(&attributes)?);
                        self.message = None;
                    }
                    other if other.starts_with("extra-") => self.skip_element("context")?,
                    _ => return Err(self.unexpected(element.local_name, "context")),
                },
                XmlEvent::EndElement { .. } => break,
                XmlEvent::EndDocument => {
                    return Err(self.error(ParseErrorKind::Unterminated("context")))
                }
                _ => {}
            }
        }
        let name = name.ok_or_else(|| self.error(ParseErrorKind::MissingContextName))?;
        Ok(Context {
            name,
            comment,
            messages,
        })
    }

    fn read_message(&mut self, attributes: &[OwnedAttribute]) -> Result<Message, ParseError> {
        let numerus = match attribute_str(attributes, "numerus") {
            None => false,
            Some("yes" | "true") => true,
            Some("no" | "false") => false,
            Some(value) => return Err(self.invalid_attribute("numerus", value)),
        };
        let mut message = Message::new(String::new()).with_numerus(numerus);
        message.id = attribute(attributes, "id");

        let mut source = None;
        let mut translation = None;
        loop {
            match self.next()? {
                XmlEvent::StartElement {
                    name, attributes, ..
                } => match name.local_name.as_str() {
                    "location" => {
                        message.locations.push(Location {
                            filename: attribute(&attributes, "filename"),
                            line: attribute(&attributes, "line"),
                        });
                        self.skip_element("location")?;
                    }
                    "source" => source = Some(self.read_text("source")?),
                    "oldsource" => message.old_source = Some(self.read_text("oldsource")?),
                    "comment" => message.disambiguation = Some(self.read_text("comment")?),
                    "oldcomment" => message.old_comment = Some(self.read_text("oldcomment")?),
                    "extracomment" => {
                        message.extra_comment = Some(self.read_text("extracomment")?)
                    }
                    "translatorcomment" => {
                        message.translator_comment = Some(self.read_text("translatorcomment")?)
                    }
                    "translation" => {
                        translation = Some(self.read_translation(&attributes, numerus)?)
                    }
                    "userdata" => self.skip_element("userdata")?,
                    other if other.starts_with("extra-") => self.skip_element("message")?,
                    _ => return Err(self.unexpected(name.local_name, "message")),
                },
                XmlEvent::EndElement { .. } => break,
                XmlEvent::EndDocument => {
                    return Err(self.error(ParseErrorKind::Unterminated("message")))
                }
                _ => {}
            }
        }

        let source = source.ok_or_else(|| self.error(ParseErrorKind::MissingSource))?;
        message.source = Template::parse(source);
        let (status, variants) = translation.unwrap_or_default();
        message.translations = variants.into_iter().map(Template::parse).collect();
        message.status = status.unwrap_or(if message.has_translation() {
            Status::Finished
        } else {
            Status::Unfinished
        });
        Ok(message)
    }

    /// Returns the `type` attribute and the variants of a `<translation>`.
    fn read_translation(
        &mut self,
        attributes: &[OwnedAttribute],
        numerus: bool,
    ) -> Result<(Option<Status>, Vec<String>), ParseError> {
        let status = match attribute_str(attributes, "type") {
            None => None,
            Some(value) => Some(
                value
                    .parse::<Status>()
                    .map_err(|()| self.invalid_attribute("type", value))?,
            ),
        };
        let mut body = self.read_body("translation", numerus)?;
        let variants = if !body.numerus_forms.is_empty() {
            std::mem::take(&mut body.numerus_forms)
        } else {
            let variant = body.into_variant();
            // whitespace between the elements of an empty numerus translation is not a form
            if variant.is_empty() || (numerus && variant.trim().is_empty()) {
                Vec::new()
            } else {
                vec![variant]
            }
        };
        Ok((status, variants))
    }

    fn read_body(&mut self, element: &'static str, numerus: bool) -> Result<Body, ParseError> {
        let mut body = Body::default();
        loop {
            match self.next()? {
                XmlEvent::Characters(text) | XmlEvent::Whitespace(text) | XmlEvent::CData(text) => {
                    body.text.push_str(&text)
                }
                XmlEvent::StartElement {
                    name, attributes, ..
                } => match name.local_name.as_str() {
                    "byte" => self.read_byte(&attributes, &mut body.text)?,
                    "lengthvariant" => body.length_variants.push(self.read_text("lengthvariant")?),
                    "numerusform" if numerus => body
                        .numerus_forms
                        .push(self.read_body("numerusform", false)?.into_variant()),
                    "numerusform" => return Err(self.error(ParseErrorKind::UnexpectedNumerusForm)),
                    _ => return Err(self.unexpected(name.local_name, element)),
                },
                XmlEvent::EndElement { .. } => return Ok(body),
                XmlEvent::EndDocument => return Err(self.error(ParseErrorKind::Unterminated(element))),
                _ => {}
            }
        }
    }

    /// Reads the content of an element that only holds text.
    fn read_text(&mut self, element: &'static str) -> Result<String, ParseError> {
        let mut text = String::new();
        loop {
            match self.next()? {
                XmlEvent::Characters(chunk) | XmlEvent::Whitespace(chunk) | XmlEvent::CData(chunk) => {
                    text.push_str(&chunk)
                }
                XmlEvent::StartElement {
                    name, attributes, ..
                } => {
                    if name.local_name != "byte" {
                        return Err(self.unexpected(name.local_name, element));
                    }
                    self.read_byte(&attributes, &mut text)?;
                }
                XmlEvent::EndElement { .. } => return Ok(text),
                XmlEvent::EndDocument => return Err(self.error(ParseErrorKind::Unterminated(element))),
                _ => {}
            }
        }
    }

    /// `<byte value="x9c"/>`: hexadecimal with an `x` or `0x` prefix, decimal otherwise.
    fn read_byte(&mut self, attributes: &[OwnedAttribute], out: &mut String) -> Result<(), ParseError> {
        let value = attribute_str(attributes, "value").unwrap_or_default();
        let (digits, radix) = if let Some(hex) = value.strip_prefix("0x") {
            (hex, 16)
        } else if let Some(hex) = value.strip_prefix('x') {
            (hex, 16)
        } else {
            (value, 10)
        };
        let c = u32::from_str_radix(digits, radix)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.invalid_attribute("value", value))?;
        if c != '\0' {
            out.push(c);
        }
        self.skip_element("byte")
    }
}

fn attribute_str<'a>(attributes: &'a [OwnedAttribute], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|a| a.name.local_name == name)
        .map(|a| a.value.as_str())
}

fn attribute(attributes: &[OwnedAttribute], name: &str) -> Option<String> {
    attribute_str(attributes, name).map(str::to_owned)
}
