/* Copyright (C) 2025 SixtyFPS GmbH <info@slint.dev>

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

//! Loading gettext `.po` files into a [`Catalog`].

use crate::catalog::{Catalog, CatalogHeader, Context, Message, Status};
use crate::error::LoadError;
use crate::plural::PluralRules;
use crate::template::Template;
use std::collections::HashMap;

impl Catalog {
    /// Loads a `.po` file.
    ///
    /// `msgctxt` holds the context, optionally followed by `|` and the disambiguation.
    /// Fuzzy entries are unfinished.
    pub fn from_po_path(path: &std::path::Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_po_str(&text)
    }

    /// Loads a `.po` file from its raw contents, which must be UTF-8.
    pub fn from_po_data(data: Vec<u8>) -> Result<Self, LoadError> {
        let text = String::from_utf8(data).map_err(|e| LoadError::PoParse(e.to_string()))?;
        Self::from_po_str(&text)
    }

    fn from_po_str(text: &str) -> Result<Self, LoadError> {
        // rspolib only parses in-memory content given as text
        rspolib::pofile(text)
            .map_err(|parse_error| LoadError::PoParse(parse_error.to_string()))
            .and_then(Catalog::try_from)
    }
}

impl TryFrom<rspolib::POFile> for Catalog {
    type Error = LoadError;

    fn try_from(pofile: rspolib::POFile) -> Result<Self, Self::Error> {
        let mut contexts: Vec<Context> = Vec::new();
        let mut by_name: HashMap<String, usize> = HashMap::new();

        for entry in pofile.entries {
            let rspolib::POEntry {
                msgid,
                msgstr,
                msgid_plural,
                msgstr_plural,
                msgctxt,
                obsolete,
                flags,
                comment,
                tcomment,
                ..
            } = entry;
            if msgid.is_empty() && msgctxt.is_none() {
                // the header entry
                continue;
            }

            let (context, disambiguation) = match msgctxt {
                Some(msgctxt) => match msgctxt.split_once('|') {
                    Some((context, disambiguation)) => {
                        (context.to_owned(), Some(disambiguation.to_owned()))
                    }
                    None => (msgctxt, None),
                },
                None => (String::new(), None),
            };

            let numerus = msgid_plural.is_some();
            let translations: Vec<Template> = if numerus {
                msgstr_plural.into_iter().map(Template::parse).collect()
            } else {
                msgstr
                    .filter(|s| !s.is_empty())
                    .into_iter()
                    .map(Template::parse)
                    .collect()
            };
            let status = if obsolete {
                Status::Obsolete
            } else if flags.iter().any(|f| f == "fuzzy")
                || translations.iter().all(Template::is_empty)
            {
                Status::Unfinished
            } else {
                Status::Finished
            };

            let mut message = Message::new(msgid).with_numerus(numerus).with_status(status);
            message.disambiguation = disambiguation;
            message.extra_comment = comment.filter(|c| !c.is_empty());
            message.translator_comment = tcomment.filter(|c| !c.is_empty());
            message.translations = translations;

            let index = *by_name.entry(context.clone()).or_insert_with(|| {
                contexts.push(Context::new(context, Vec::new()));
                contexts.len() - 1
            });
            contexts[index].messages.push(message);
        }

        let header = CatalogHeader {
            version: None,
            language: pofile.metadata.get("Language").filter(|l| !l.is_empty()).cloned(),
            source_language: None,
        };
        let mut catalog = Catalog::new(header, contexts);
        if let Some(plural_forms) = pofile.metadata.get("Plural-Forms") {
            catalog = catalog.with_plural_rules(PluralRules::from_plural_forms(plural_forms)?);
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Resolver;

    const PO: &str = r#"msgid ""
msgstr ""
"Language: pl\n"
"Content-Type: text/plain; charset=UTF-8\n"
"Plural-Forms: nplurals=3; plural=(n==1 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2);\n"

#. Window title
msgctxt "MainWindow"
msgid "Capture"
msgstr "Przechwytywanie"

# check with the style guide
msgctxt "MainWindow|verb"
msgid "Open"
msgstr "Otwórz"

#, fuzzy
msgctxt "MainWindow"
msgid "Close"
msgstr "Zamknij"

msgctxt "MainWindow"
msgid "%n file(s)"
msgid_plural "%n files"
msgstr[0] "%n plik"
msgstr[1] "%n pliki"
msgstr[2] "%n plików"

msgid "Quit"
msgstr ""

#~ msgid "Old"
#~ msgstr "Stary"
"#;

    #[test]
    fn po_entries() {
        let catalog = Catalog::from_po_data(PO.as_bytes().to_vec()).unwrap();
        assert_eq!(catalog.language(), Some("pl"));
        assert_eq!(catalog.plural_rules().map(PluralRules::category_count), Some(3));

        let capture = catalog.find_message("MainWindow", "Capture", None).unwrap();
        assert_eq!(capture.status(), Status::Finished);
        assert_eq!(capture.extra_comment(), Some("Window title"));

        let open = catalog.find_message("MainWindow", "Open", Some("verb")).unwrap();
        assert_eq!(open.translator_comment(), Some("check with the style guide"));

        let close = catalog.find_message("MainWindow", "Close", None).unwrap();
        assert_eq!(close.status(), Status::Unfinished);

        let quit = catalog.find_message("", "Quit", None).unwrap();
        assert_eq!(quit.status(), Status::Unfinished);
        assert!(quit.translations().is_empty());

        let old = catalog.find_message("", "Old", None).unwrap();
        assert_eq!(old.status(), Status::Obsolete);
    }

    #[test]
    fn po_catalog_resolves() {
        let resolver = Resolver::new(Catalog::from_po_data(PO.as_bytes().to_vec()).unwrap());
        assert_eq!(resolver.resolve("MainWindow", "%n file(s)", None, Some(1)), "1 plik");
        assert_eq!(resolver.resolve("MainWindow", "%n file(s)", None, Some(3)), "3 pliki");
        assert_eq!(resolver.resolve("MainWindow", "%n file(s)", None, Some(12)), "12 plików");
        assert_eq!(resolver.resolve("", "Old", None, None), "Old");
        assert_eq!(resolver.resolve("", "Quit", None, None), "Quit");
    }

    #[test]
    fn po_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pl.po");
        std::fs::write(&path, PO).unwrap();
        let catalog = Catalog::from_po_path(&path).unwrap();
        assert_eq!(catalog.language(), Some("pl"));
        assert_eq!(catalog.len(), Catalog::from_po_data(PO.as_bytes().to_vec()).unwrap().len());
        assert!(catalog.find_message("MainWindow", "Capture", None).is_some());
    }

    #[test]
    fn po_data_must_be_utf8() {
        let error = Catalog::from_po_data(vec![b'm', b's', b'g', 0xff, 0xfe]).unwrap_err();
        assert!(matches!(error, LoadError::PoParse(_)), "{error}");
    }
}
