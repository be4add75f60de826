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

//! Serializes a [`Catalog`] back to `.ts`, laid out the way `lupdate` does.

use crate::catalog::{Catalog, Context, Message};
use crate::error::WriteError;
use crate::template::{Template, LENGTH_VARIANT_SEPARATOR};
use std::io::Write;
use xml::writer::{EmitterConfig, EventWriter, XmlEvent};

const HEADER: &[u8] = b"<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n";

pub(crate) fn write_catalog<W: Write>(catalog: &Catalog, mut sink: W) -> Result<(), WriteError> {
    sink.write_all(HEADER)?;
    let events = EmitterConfig::new()
        .write_document_declaration(false)
        .perform_indent(false)
        .pad_self_closing(false)
        .create_writer(&mut sink);
    let mut writer = TsWriter { events };

    let header = catalog.header();
    let mut root = XmlEvent::start_element("TS");
    if let Some(version) = &header.version {
        root = root.attr("version", version);
    }
    if let Some(language) = &header.language {
        root = root.attr("language", language);
    }
    if let Some(source_language) = &header.source_language {
        root = root.attr("sourcelanguage", source_language);
    }
    writer.events.write(root)?;
    writer.events.write(XmlEvent::characters("\n"))?;
    for context in catalog.contexts() {
        writer.context(context)?;
    }
    writer.events.write(XmlEvent::end_element())?;
    drop(writer);

    sink.write_all(b"\n")?;
    sink.flush()?;
    Ok(())
}

struct TsWriter<W: Write> {
    events: EventWriter<W>,
}

impl<W: Write> TsWriter<W> {
    fn indent(&mut self, level: usize) -> Result<(), WriteError> {
        let indent = format!("\n{}", "    ".repeat(level));
        self.events.write(XmlEvent::characters(&indent))?;
        Ok(())
    }

    fn context(&mut self, context: &Context) -> Result<(), WriteError> {
        self.events.write(XmlEvent::start_element("context"))?;
        self.indent(1)?;
        self.text_element("name", context.name())?;
        if let Some(comment) = context.comment() {
            self.indent(1)?;
            self.text_element("comment", comment)?;
        }
        for message in context.messages() {
            self.indent(1)?;
            self.message(message)?;
        }
        self.indent(0)?;
        self.events.write(XmlEvent::end_element())?;
        self.events.write(XmlEvent::characters("\n"))?;
        Ok(())
    }

    fn message(&mut self, message: &Message) -> Result<(), WriteError> {
        let mut start = XmlEvent::start_element("message");
        if let Some(id) = message.id() {
            start = start.attr("id", id);
        }
        if message.is_numerus() {
            start = start.attr("numerus", "yes");
        }
        self.events.write(start)?;

        for location in message.locations() {
            self.indent(2)?;
            let mut element = XmlEvent::start_element("location");
            if let Some(filename) = &location.filename {
                element = element.attr("filename", filename);
            }
            if let Some(line) = &location.line {
                element = element.attr("line", line);
            }
            self.events.write(element)?;
            self.events.write(XmlEvent::end_element())?;
        }
        let optional = [
            ("source", Some(message.source())),
            ("oldsource", message.old_source()),
            ("comment", message.disambiguation()),
            ("oldcomment", message.old_comment()),
            ("extracomment", message.extra_comment()),
            ("translatorcomment", message.translator_comment()),
        ];
        for (name, text) in optional {
            if let Some(text) = text {
                self.indent(2)?;
                self.text_element(name, text)?;
            }
        }

        self.indent(2)?;
        let mut translation = XmlEvent::start_element("translation");
        if let Some(kind) = message.status().type_attribute() {
            translation = translation.attr("type", kind);
        }
        let translations = message.translations();
        if message.is_numerus() {
            self.events.write(translation)?;
            for form in translations {
                self.indent(3)?;
                self.variants(form, XmlEvent::start_element("numerusform"), 4)?;
            }
            if !translations.is_empty() {
                self.indent(2)?;
            }
            self.events.write(XmlEvent::end_element())?;
        } else {
            match translations.first() {
                Some(text) => self.variants(text, translation, 3)?,
                None => {
                    self.events.write(translation)?;
                    self.events.write(XmlEvent::end_element())?;
                }
            }
        }

        self.indent(1)?;
        self.events.write(XmlEvent::end_element())?;
        Ok(())
    }

    /// Writes `start`, then the text, or one `<lengthvariant>` per variant, and closes it.
    fn variants(
        &mut self,
        text: &Template,
        start: xml::writer::events::StartElementBuilder<'_>,
        level: usize,
    ) -> Result<(), WriteError> {
        if !text.as_str().contains(LENGTH_VARIANT_SEPARATOR) {
            self.events.write(start)?;
            self.text(text.as_str())?;
            self.events.write(XmlEvent::end_element())?;
            return Ok(());
        }
        self.events.write(start.attr("variants", "yes"))?;
        for variant in text.length_variants() {
            self.indent(level)?;
            self.text_element("lengthvariant", variant)?;
        }
        self.indent(level - 1)?;
        self.events.write(XmlEvent::end_element())?;
        Ok(())
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<(), WriteError> {
        self.events.write(XmlEvent::start_element(name))?;
        self.text(text)?;
        self.events.write(XmlEvent::end_element())?;
        Ok(())
    }

    /// Characters XML cannot carry, and carriage returns it would normalize away, become
    /// `<byte>` elements.
    fn text(&mut self, text: &str) -> Result<(), WriteError> {
        let mut rest = text;
        while let Some(pos) = rest.find(needs_byte_element) {
            if pos > 0 {
                self.events.write(XmlEvent::characters(&rest[..pos]))?;
            }
            let c = rest[pos..].chars().next().unwrap_or_default();
            let value = format!("x{:x}", u32::from(c));
            self.events
                .write(XmlEvent::start_element("byte").attr("value", &value))?;
            self.events.write(XmlEvent::end_element())?;
            rest = &rest[pos + c.len_utf8()..];
        }
        if !rest.is_empty() {
            self.events.write(XmlEvent::characters(rest))?;
        }
        Ok(())
    }
}

fn needs_byte_element(c: char) -> bool {
    (c < ' ' && c != '\t' && c != '\n') || c == LENGTH_VARIANT_SEPARATOR
}

#[cfg(test)]
mod tests {
    use crate::catalog::{Catalog, CatalogHeader, Context, Location, Message, Status};

    fn sample() -> Catalog {
        let header = CatalogHeader {
            version: Some("2.1".into()),
            language: Some("es_ES".into()),
            source_language: None,
        };
        let about = Context::new(
            "AboutDialog",
            vec![
                Message::new("Authors")
                    .with_location(Location {
                        filename: Some("../ui/about_dialog.ui".into()),
                        line: Some("17".into()),
                    })
                    .with_status(Status::Finished)
                    .with_translation("Autores"),
                Message::new("%Ln byte(s)")
                    .with_numerus(true)
                    .with_status(Status::Finished)
                    .with_translation("%Ln byte")
                    .with_translation("%Ln bytes"),
                Message::new("Gone & <done>")
                    .with_disambiguation("old")
                    .with_status(Status::Obsolete)
                    .with_translation("Ido"),
            ],
        );
        Catalog::new(header, vec![about])
    }

    #[test]
    fn lupdate_layout() {
        let text = sample().to_ts_string().unwrap();
        let expected = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="es_ES">
<context>
    <name>AboutDialog</name>
    <message>
        <location filename="../ui/about_dialog.ui" line="17"/>
        <source>Authors</source>
        <translation>Autores</translation>
    </message>
    <message numerus="yes">
        <source>%Ln byte(s)</source>
        <translation>
            <numerusform>%Ln byte</numerusform>
            <numerusform>%Ln bytes</numerusform>
        </translation>
    </message>
    <message>
        <source>Gone &amp; &lt;done></source>
        <comment>old</comment>
        <translation type="obsolete">Ido</translation>
    </message>
</context>
</TS>
"#;
        // '>' needs no escaping in text; accept both spellings
        assert_eq!(text.replace("&gt;", ">"), expected);
    }

    #[test]
    fn written_catalog_reads_back() {
        let catalog = sample();
        let text = catalog.to_ts_string().unwrap();
        let reread: Catalog = text.parse().unwrap();
        assert_eq!(reread, catalog);
    }

    #[test]
    fn control_characters_and_length_variants() {
        let catalog = Catalog::new(
            CatalogHeader::default(),
            vec![Context::new(
                "Ctx",
                vec![Message::new("tab\there\r\u{1b}")
                    .with_status(Status::Unfinished)
                    .with_translation("Largo\u{9c}Corto")],
            )],
        );
        let text = catalog.to_ts_string().unwrap();
        assert!(text.contains(r#"<source>tab	here<byte value="xd"/><byte value="x1b"/></source>"#), "{text}");
        assert!(text.contains(r#"<translation type="unfinished" variants="yes">"#), "{text}");
        assert!(text.contains("<lengthvariant>Corto</lengthvariant>"), "{text}");
        let reread: Catalog = text.parse().unwrap();
        assert_eq!(reread, catalog);
    }
}
