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

//! In-memory catalog.
//!
//! A [`Catalog`] is built once and never modified. Messages are kept in file order, grouped
//! by [`Context`], and indexed by (context, source, disambiguation) for constant time lookup.

use crate::error::{LoadError, ParseError, WriteError};
use crate::plural::PluralRules;
use crate::template::Template;
use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

/// Lifecycle state of a message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Status {
    /// Not translated yet, or the translation still needs review.
    #[default]
    Unfinished,
    Finished,
    /// The source text disappeared from the application; kept for reference only.
    Obsolete,
    /// Same as [`Status::Obsolete`], written by newer versions of `lupdate`.
    Vanished,
}

impl Status {
    /// Obsolete and vanished messages are never resolved.
    pub fn is_live(self) -> bool {
        matches!(self, Status::Unfinished | Status::Finished)
    }

    /// The value of the `type` attribute of `<translation>`; finished messages have none.
    pub fn type_attribute(self) -> Option<&'static str> {
        match self {
            Status::Unfinished => Some("unfinished"),
            Status::Finished => None,
            Status::Obsolete => Some("obsolete"),
            Status::Vanished => Some("vanished"),
        }
    }
}

impl FromStr for Status {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unfinished" => Ok(Status::Unfinished),
            "obsolete" => Ok(Status::Obsolete),
            "vanished" => Ok(Status::Vanished),
            _ => Err(()),
        }
    }
}

/// A `<location>` reference. The line is kept as written since it may be relative (`+3`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Location {
    pub filename: Option<String>,
    pub line: Option<String>,
}

/// One translatable unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub(crate) id: Option<String>,
    pub(crate) source: Template,
    pub(crate) disambiguation: Option<String>,
    pub(crate) old_source: Option<String>,
    pub(crate) old_comment: Option<String>,
    pub(crate) extra_comment: Option<String>,
    pub(crate) translator_comment: Option<String>,
    pub(crate) locations: Vec<Location>,
    pub(crate) numerus: bool,
    pub(crate) status: Status,
    pub(crate) translations: Vec<Template>,
}

impl Message {
    /// An unfinished message without translation.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            id: None,
            source: Template::parse(source),
            disambiguation: None,
            old_source: None,
            old_comment: None,
            extra_comment: None,
            translator_comment: None,
            locations: Vec::new(),
            numerus: false,
            status: Status::Unfinished,
            translations: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_disambiguation(mut self, disambiguation: impl Into<String>) -> Self {
        self.disambiguation = Some(disambiguation.into());
        self
    }

    pub fn with_extra_comment(mut self, comment: impl Into<String>) -> Self {
        self.extra_comment = Some(comment.into());
        self
    }

    pub fn with_translator_comment(mut self, comment: impl Into<String>) -> Self {
        self.translator_comment = Some(comment.into());
        self
    }

    pub fn with_old_source(mut self, source: impl Into<String>) -> Self {
        self.old_source = Some(source.into());
        self
    }

    pub fn with_old_comment(mut self, comment: impl Into<String>) -> Self {
        self.old_comment = Some(comment.into());
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.locations.push(location);
        self
    }

    pub fn with_numerus(mut self, numerus: bool) -> Self {
        self.numerus = numerus;
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Appends a translation variant. Plural messages get one variant per plural category.
    pub fn with_translation(mut self, text: impl Into<String>) -> Self {
        self.translations.push(Template::parse(text));
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn source(&self) -> &str {
        self.source.as_str()
    }

    pub fn source_template(&self) -> &Template {
        &self.source
    }

    pub fn disambiguation(&self) -> Option<&str> {
        self.disambiguation.as_deref()
    }

    pub fn old_source(&self) -> Option<&str> {
        self.old_source.as_deref()
    }

    pub fn old_comment(&self) -> Option<&str> {
        self.old_comment.as_deref()
    }

    /// Comment for the translator, extracted from the application source.
    pub fn extra_comment(&self) -> Option<&str> {
        self.extra_comment.as_deref()
    }

    pub fn translator_comment(&self) -> Option<&str> {
        self.translator_comment.as_deref()
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn is_numerus(&self) -> bool {
        self.numerus
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn translations(&self) -> &[Template] {
        &self.translations
    }

    /// Returns true if at least one variant holds some text.
    pub fn has_translation(&self) -> bool {
        self.translations.iter().any(|t| !t.is_empty())
    }
}

/// Messages of one UI component.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Context {
    pub(crate) name: String,
    pub(crate) comment: Option<String>,
    pub(crate) messages: Vec<Message>,
}

impl Context {
    pub fn new(name: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            name: name.into(),
            comment: None,
            messages,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}

/// Attributes of the `<TS>` root element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogHeader {
    pub version: Option<String>,
    /// Target language, such as `es_ES`. Selects the plural rules.
    pub language: Option<String>,
    pub source_language: Option<String>,
}

/// Message counts, as reported by `lrelease`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    pub contexts: usize,
    pub finished: usize,
    pub unfinished: usize,
    /// Unfinished messages that already carry some text.
    pub unfinished_with_text: usize,
    pub obsolete: usize,
    pub vanished: usize,
    pub numerus: usize,
}

impl Statistics {
    pub fn messages(&self) -> usize {
        self.finished + self.unfinished + self.obsolete + self.vanished
    }
}

/// A live plural message whose variant count differs from the plural rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PluralMismatch {
    pub context: String,
    pub source: String,
    pub disambiguation: Option<String>,
    pub expected: usize,
    pub found: usize,
}

/// A translation whose placeholders do not fit its source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaceholderMismatch {
    pub context: String,
    pub source: String,
    pub disambiguation: Option<String>,
    /// Index of the translation (the plural form) at fault.
    pub form: usize,
    pub problem: PlaceholderProblem,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaceholderProblem {
    /// The source has `%n` and the translation drops it.
    MissingCount,
    /// The translation uses `%N` above the highest argument of the source.
    UnknownArgument { used: usize, available: usize },
}

impl std::fmt::Display for PlaceholderProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaceholderProblem::MissingCount => f.write_str("%n is missing"),
            PlaceholderProblem::UnknownArgument { used, available } => {
                write!(f, "uses %{used} but the source only has {available} argument(s)")
            }
        }
    }
}

/// A parsed message catalog.
///
/// ```
/// use tscat::Catalog;
///
/// let catalog: Catalog = r#"<TS version="2.1" language="es">
///     <context>
///         <name>AboutDialog</name>
///         <message>
///             <source>Authors</source>
///             <translation>Autores</translation>
///         </message>
///     </context>
/// </TS>"#
///     .parse()
///     .unwrap();
/// let message = catalog.find_message("AboutDialog", "Authors", None).unwrap();
/// assert_eq!(message.translations()[0].as_str(), "Autores");
/// ```
#[derive(Clone, Debug)]
pub struct Catalog {
    header: CatalogHeader,
    contexts: Vec<Context>,
    index: HashMap<MessageKey, (usize, usize)>,
    ids: HashMap<String, (usize, usize)>,
    plural_rules: Option<PluralRules>,
}

impl Catalog {
    pub fn new(header: CatalogHeader, contexts: Vec<Context>) -> Self {
        let mut index: HashMap<MessageKey, (usize, usize)> = HashMap::new();
        let mut ids = HashMap::new();
        for (c, context) in contexts.iter().enumerate() {
            for (m, message) in context.messages.iter().enumerate() {
                let key = MessageKey {
                    context: context.name.clone(),
                    source: message.source().to_owned(),
                    disambiguation: message.disambiguation.clone(),
                };
                let existing = index.get(&key).copied();
                match existing {
                    None => {
                        index.insert(key, (c, m));
                    }
                    Some((pc, pm)) => {
                        let previous = &contexts[pc].messages[pm];
                        if message.status.is_live() && previous.status.is_live() {
                            tracing::warn!(
                                context = %context.name,
                                source = message.source(),
                                "duplicate message, keeping the first one"
                            );
                        }
                        if !previous.status.is_live() && message.status.is_live() {
                            index.insert(key, (c, m));
                        }
                    }
                }
                if let Some(id) = &message.id {
                    ids.entry(id.clone()).or_insert((c, m));
                }
            }
        }
        Self {
            header,
            contexts,
            index,
            ids,
            plural_rules: None,
        }
    }

    /// A catalog without any message. Every lookup falls back to the source text.
    pub fn empty() -> Self {
        Self::new(CatalogHeader::default(), Vec::new())
    }

    /// Attaches explicit plural rules, which take precedence over the rules of the language.
    pub fn with_plural_rules(mut self, rules: PluralRules) -> Self {
        self.plural_rules = Some(rules);
        self
    }

    /// Reads a `.ts` catalog. Either the whole catalog is loaded or an error is returned.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ParseError> {
        crate::ts_reader::read_catalog(reader)
    }

    pub fn from_slice(data: &[u8]) -> Result<Self, ParseError> {
        Self::from_reader(data)
    }

    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let file = std::fs::File::open(path)?;
        Ok(Self::from_reader(std::io::BufReader::new(file))?)
    }

    /// Serializes the catalog as `.ts` XML.
    pub fn write_to<W: Write>(&self, sink: W) -> Result<(), WriteError> {
        crate::ts_writer::write_catalog(self, sink)
    }

    pub fn to_ts_string(&self) -> Result<String, WriteError> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        // the emitter only produces UTF-8
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    pub fn header(&self) -> &CatalogHeader {
        &self.header
    }

    pub fn version(&self) -> Option<&str> {
        self.header.version.as_deref()
    }

    pub fn language(&self) -> Option<&str> {
        self.header.language.as_deref()
    }

    pub fn source_language(&self) -> Option<&str> {
        self.header.source_language.as_deref()
    }

    pub fn plural_rules(&self) -> Option<&PluralRules> {
        self.plural_rules.as_ref()
    }

    pub fn contexts(&self) -> &[Context] {
        &self.contexts
    }

    /// The first context called `name`.
    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == name)
    }

    /// All messages in file order, with their context.
    pub fn messages(&self) -> impl Iterator<Item = (&Context, &Message)> {
        self.contexts
            .iter()
            .flat_map(|c| c.messages.iter().map(move |m| (c, m)))
    }

    /// Number of messages, obsolete ones included.
    pub fn len(&self) -> usize {
        self.contexts.iter().map(|c| c.messages.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Exact lookup: no trimming, no case folding. `None` means no such key, which is not the
    /// same as a key whose translation is unfinished.
    pub fn find_message(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
    ) -> Option<&Message> {
        self.index
            .get(&(context, source, disambiguation) as &dyn KeyLookup)
            .map(|&(c, m)| &self.contexts[c].messages[m])
    }

    /// Looks up a message by its `id` attribute.
    pub fn find_by_id(&self, id: &str) -> Option<(&Context, &Message)> {
        self.ids.get(id).map(|&(c, m)| {
            let context = &self.contexts[c];
            (context, &context.messages[m])
        })
    }

    pub fn statistics(&self) -> Statistics {
        let mut stats = Statistics {
            contexts: self.contexts.len(),
            ..Default::default()
        };
        for (_, message) in self.messages() {
            match message.status {
                Status::Finished => stats.finished += 1,
                Status::Unfinished => {
                    stats.unfinished += 1;
                    if message.has_translation() {
                        stats.unfinished_with_text += 1;
                    }
                }
                Status::Obsolete => stats.obsolete += 1,
                Status::Vanished => stats.vanished += 1,
            }
            if message.numerus {
                stats.numerus += 1;
            }
        }
        stats
    }

    /// Live plural messages that have some translation but not one variant per category.
    pub fn plural_mismatches(&self, rules: &PluralRules) -> Vec<PluralMismatch> {
        let expected = rules.category_count();
        self.messages()
            .filter(|(_, m)| m.numerus && m.status.is_live() && m.has_translation())
            .filter(|(_, m)| m.translations.len() != expected)
            .map(|(c, m)| PluralMismatch {
                context: c.name.clone(),
                source: m.source().to_owned(),
                disambiguation: m.disambiguation.clone(),
                expected,
                found: m.translations.len(),
            })
            .collect()
    }

    /// Live translations that drop `%n` or refer to arguments their source lacks.
    pub fn placeholder_mismatches(&self) -> Vec<PlaceholderMismatch> {
        let mut found = Vec::new();
        for (context, message) in self.messages().filter(|(_, m)| m.status.is_live()) {
            let source = &message.source;
            for (form, translation) in message.translations.iter().enumerate() {
                if translation.is_empty() {
                    continue;
                }
                let problem = if source.uses_count() && !translation.uses_count() {
                    PlaceholderProblem::MissingCount
                } else if translation.highest_argument() > source.highest_argument() {
                    PlaceholderProblem::UnknownArgument {
                        used: translation.highest_argument(),
                        available: source.highest_argument(),
                    }
                } else {
                    continue;
                };
                found.push(PlaceholderMismatch {
                    context: context.name.clone(),
                    source: message.source().to_owned(),
                    disambiguation: message.disambiguation.clone(),
                    form,
                    problem,
                });
            }
        }
        found
    }
}

impl FromStr for Catalog {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slice(s.as_bytes())
    }
}

impl PartialEq for Catalog {
    fn eq(&self, other: &Self) -> bool {
        self.header == other.header
            && self.contexts == other.contexts
            && self.plural_rules == other.plural_rules
    }
}

#[derive(Clone, Debug)]
struct MessageKey {
    context: String,
    source: String,
    disambiguation: Option<String>,
}

/// Helper trait to permit lookup of messages without copying the key,
/// by using a dyn trait object as the borrowed type for the owned key.
trait KeyLookup {
    fn context(&self) -> &str;
    fn source(&self) -> &str;
    fn disambiguation(&self) -> Option<&str>;
}

impl KeyLookup for MessageKey {
    fn context(&self) -> &str {
        &self.context
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn disambiguation(&self) -> Option<&str> {
        self.disambiguation.as_deref()
    }
}

impl<'a> KeyLookup for (&'a str, &'a str, Option<&'a str>) {
    fn context(&self) -> &str {
        self.0
    }

    fn source(&self) -> &str {
        self.1
    }

    fn disambiguation(&self) -> Option<&str> {
        self.2
    }
}

impl std::hash::Hash for dyn KeyLookup + '_ {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.context().hash(state);
        self.source().hash(state);
        self.disambiguation().hash(state);
    }
}

impl PartialEq for dyn KeyLookup + '_ {
    fn eq(&self, other: &Self) -> bool {
        self.context() == other.context()
            && self.source() == other.source()
            && self.disambiguation() == other.disambiguation()
    }
}

impl Eq for dyn KeyLookup + '_ {}

// The owned key hashes through the trait object so both sides always agree.
impl std::hash::Hash for MessageKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        (self as &dyn KeyLookup).hash(state)
    }
}

impl PartialEq for MessageKey {
    fn eq(&self, other: &Self) -> bool {
        (self as &dyn KeyLookup) == (other as &dyn KeyLookup)
    }
}

impl Eq for MessageKey {}

impl<'a> std::borrow::Borrow<dyn KeyLookup + 'a> for MessageKey {
    fn borrow(&self) -> &(dyn KeyLookup + 'a) {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::new(
            CatalogHeader {
                language: Some("de".into()),
                ..Default::default()
            },
            vec![
                Context::new(
                    "MainWindow",
                    vec![
                        Message::new("Open")
                            .with_disambiguation("File Menu")
                            .with_translation("Öffnen")
                            .with_status(Status::Finished),
                        Message::new("Open")
                            .with_disambiguation("Document State")
                            .with_translation("Offen")
                            .with_status(Status::Finished),
                        Message::new("Open")
                            .with_translation("Auf")
                            .with_status(Status::Finished),
                        Message::new("").with_translation("Leer").with_status(Status::Finished),
                        Message::new("Save ").with_id("save-trailing"),
                    ],
                ),
                Context::new(
                    "Other",
                    vec![Message::new("Open")
                        .with_translation("Öffne")
                        .with_status(Status::Obsolete)],
                ),
            ],
        )
    }

    #[test]
    fn keys_are_scoped_by_context_and_disambiguation() {
        let catalog = sample();
        let text = |c, s, d| {
            catalog
                .find_message(c, s, d)
                .map(|m| m.translations()[0].as_str().to_owned())
        };
        assert_eq!(text("MainWindow", "Open", Some("File Menu")).as_deref(), Some("Öffnen"));
        assert_eq!(text("MainWindow", "Open", Some("Document State")).as_deref(), Some("Offen"));
        assert_eq!(text("MainWindow", "Open", None).as_deref(), Some("Auf"));
        assert_eq!(text("Other", "Open", None).as_deref(), Some("Öffne"));
        assert_eq!(text("MainWindow", "", None).as_deref(), Some("Leer"));
        assert!(catalog.find_message("MainWindow", "Open", Some("")).is_none());
        assert!(catalog.find_message("Missing", "Open", None).is_none());
    }

    #[test]
    fn lookup_is_exact() {
        let catalog = sample();
        assert!(catalog.find_message("MainWindow", "Save ", None).is_some());
        assert!(catalog.find_message("MainWindow", "Save", None).is_none());
        assert!(catalog.find_message("MainWindow", "open", None).is_none());
        assert!(catalog.find_message("mainwindow", "Open", None).is_none());
    }

    #[test]
    fn duplicates_prefer_live_messages() {
        let catalog = Catalog::new(
            CatalogHeader::default(),
            vec![Context::new(
                "Ctx",
                vec![
                    Message::new("Quit").with_translation("Old").with_status(Status::Vanished),
                    Message::new("Quit").with_translation("Beenden").with_status(Status::Finished),
                    Message::new("Quit").with_translation("Later").with_status(Status::Finished),
                ],
            )],
        );
        let found = catalog.find_message("Ctx", "Quit", None).unwrap();
        assert_eq!(found.translations()[0].as_str(), "Beenden");
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn id_lookup() {
        let catalog = sample();
        let (context, message) = catalog.find_by_id("save-trailing").unwrap();
        assert_eq!(context.name(), "MainWindow");
        assert_eq!(message.source(), "Save ");
        assert!(catalog.find_by_id("nope").is_none());
    }

    #[test]
    fn statistics_and_mismatches() {
        let catalog = Catalog::new(
            CatalogHeader::default(),
            vec![Context::new(
                "Ctx",
                vec![
                    Message::new("%n file(s)")
                        .with_numerus(true)
                        .with_translation("%n Datei")
                        .with_status(Status::Finished),
                    Message::new("%n dir(s)")
                        .with_numerus(true)
                        .with_translation("%n Ordner")
                        .with_translation("%n Ordner")
                        .with_status(Status::Finished),
                    Message::new("%n gone")
                        .with_numerus(true)
                        .with_translation("x")
                        .with_status(Status::Obsolete),
                    Message::new("Draft").with_translation("Entwurf"),
                    Message::new("Empty"),
                ],
            )],
        );
        let stats = catalog.statistics();
        assert_eq!(
            stats,
            Statistics {
                contexts: 1,
                finished: 2,
                unfinished: 2,
                unfinished_with_text: 1,
                obsolete: 1,
                vanished: 0,
                numerus: 3,
            }
        );
        assert_eq!(stats.messages(), 5);

        let mismatches = catalog.plural_mismatches(&PluralRules::one_other());
        assert_eq!(
            mismatches,
            vec![PluralMismatch {
                context: "Ctx".into(),
                source: "%n file(s)".into(),
                disambiguation: None,
                expected: 2,
                found: 1,
            }]
        );
    }

    #[test]
    fn placeholders_checked_against_the_source() {
        let catalog = Catalog::new(
            CatalogHeader::default(),
            vec![Context::new(
                "Ctx",
                vec![
                    Message::new("%n file(s) in %1")
                        .with_numerus(true)
                        .with_status(Status::Finished)
                        .with_translation("%n archivo en %1")
                        .with_translation("archivos en %1"),
                    Message::new("Open %1")
                        .with_status(Status::Unfinished)
                        .with_translation("Abrir %2"),
                    Message::new("Close %1")
                        .with_status(Status::Obsolete)
                        .with_translation("Cerrar %3"),
                    Message::new("Save %1")
                        .with_status(Status::Finished)
                        .with_translation("Guardar"),
                ],
            )],
        );
        let mismatches = catalog.placeholder_mismatches();
        assert_eq!(mismatches.len(), 2, "{mismatches:?}");
        assert_eq!(mismatches[0].source, "%n file(s) in %1");
        assert_eq!(mismatches[0].form, 1);
        assert_eq!(mismatches[0].problem, PlaceholderProblem::MissingCount);
        assert_eq!(
            mismatches[1].problem,
            PlaceholderProblem::UnknownArgument { used: 2, available: 1 }
        );
        assert_eq!(
            mismatches[1].problem.to_string(),
            "uses %2 but the source only has 1 argument(s)"
        );
    }

    #[test]
    fn status_attribute() {
        assert_eq!("vanished".parse::<Status>(), Ok(Status::Vanished));
        assert!("finished".parse::<Status>().is_err());
        assert_eq!(Status::Finished.type_attribute(), None);
        assert!(!Status::Obsolete.is_live());
        assert!(Status::Unfinished.is_live());
    }
}
