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

//! Turns a lookup key into the string to display.

use crate::catalog::{Catalog, Message, Status};
use crate::locale::{LocaleRules, LocaleTable};
use crate::template::{Arg, Template};
use crate::Lookup;
use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, PoisonError, RwLock};

/// Why a [`ResolvedText`] holds what it holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Provenance {
    /// A translation from the catalog.
    Translated,
    /// The catalog has no such message. The text is the source.
    Missing,
    /// The message exists but has no usable translation. The text is the source.
    Untranslated,
    /// The message is obsolete or vanished. The text is the source.
    Obsolete,
}

/// The outcome of a lookup. Dereferences to the text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedText {
    text: String,
    provenance: Provenance,
}

impl ResolvedText {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Returns true if the source text was used.
    pub fn is_fallback(&self) -> bool {
        self.provenance != Provenance::Translated
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for ResolvedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Deref for ResolvedText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.text
    }
}

impl PartialEq<str> for ResolvedText {
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl PartialEq<&str> for ResolvedText {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}

impl From<ResolvedText> for String {
    fn from(resolved: ResolvedText) -> Self {
        resolved.text
    }
}

/// Knobs of the resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Use unfinished translations that carry text, as `lrelease` does unless given
    /// `-nounfinished`. Defaults to true.
    pub include_unfinished: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            include_unfinished: true,
        }
    }
}

/// Resolves lookups against one immutable catalog.
///
/// A missing message is never an error: the source text is returned instead.
///
/// ```
/// use tscat::{Catalog, Provenance, Resolver};
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
/// let resolver = Resolver::new(catalog);
/// assert_eq!(resolver.resolve("AboutDialog", "Authors", None, None), "Autores");
///
/// let missing = resolver.resolve("AboutDialog", "License", None, None);
/// assert_eq!(missing, "License");
/// assert_eq!(missing.provenance(), Provenance::Missing);
/// ```
#[derive(Clone, Debug)]
pub struct Resolver {
    catalog: Catalog,
    rules: Arc<LocaleRules>,
    options: ResolveOptions,
}

impl Resolver {
    /// Uses the plural rules carried by the catalog, or else the builtin rules of its language.
    pub fn new(catalog: Catalog) -> Self {
        Self::with_table(catalog, LocaleTable::builtin())
    }

    /// Like [`Resolver::new`], with the locale rules taken from `table`.
    pub fn with_table(catalog: Catalog, table: &LocaleTable) -> Self {
        let locale = catalog.language().unwrap_or_default().to_owned();
        Self::with_locale(catalog, table, &locale)
    }

    /// Uses the rules of `locale` instead of the catalog's language. Plural rules carried by
    /// the catalog still take precedence.
    pub fn with_locale(catalog: Catalog, table: &LocaleTable, locale: &str) -> Self {
        let mut rules = table.lookup(locale);
        if let Some(plural) = catalog.plural_rules() {
            rules = Arc::new(LocaleRules::new(plural.clone(), rules.numbers().clone()));
        }
        Self {
            catalog,
            rules,
            options: ResolveOptions::default(),
        }
    }

    /// A resolver without catalog: every lookup returns its source text.
    pub fn untranslated() -> Self {
        Self::new(Catalog::empty())
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn rules(&self) -> &LocaleRules {
        &self.rules
    }

    pub fn options(&self) -> ResolveOptions {
        self.options
    }

    /// Resolves `source` in `context`. `count` must be given for plural messages, and only
    /// for them; `%n` is replaced by it.
    pub fn resolve(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
        count: Option<u64>,
    ) -> ResolvedText {
        self.resolve_lookup(&Lookup {
            context,
            source,
            disambiguation,
            count,
            args: &[],
        })
    }

    /// Resolves a lookup and substitutes its arguments.
    pub fn resolve_lookup(&self, lookup: &Lookup<'_>) -> ResolvedText {
        match self
            .catalog
            .find_message(lookup.context, lookup.source, lookup.disambiguation)
        {
            Some(message) => self.resolve_message(message, lookup.count, lookup.args),
            None => ResolvedText {
                text: Template::parse(lookup.source).render_all(
                    lookup.args,
                    lookup.count,
                    self.rules.numbers(),
                ),
                provenance: Provenance::Missing,
            },
        }
    }

    /// Resolves a message by its `id` attribute. Unknown ids resolve to the id itself.
    pub fn resolve_id(&self, id: &str, count: Option<u64>) -> ResolvedText {
        match self.catalog.find_by_id(id) {
            Some((_, message)) => self.resolve_message(message, count, &[]),
            None => ResolvedText {
                text: id.to_owned(),
                provenance: Provenance::Missing,
            },
        }
    }

    fn resolve_message(&self, message: &Message, count: Option<u64>, args: &[Arg<'_>]) -> ResolvedText {
        let numbers = self.rules.numbers();
        match self.select(message, count) {
            Ok(template) => ResolvedText {
                text: template.render(args, count, numbers),
                provenance: Provenance::Translated,
            },
            // the source comes back whole, separators included
            Err(provenance) => ResolvedText {
                text: message.source_template().render_all(args, count, numbers),
                provenance,
            },
        }
    }

    /// The translation to use, or why the source must be used instead.
    fn select<'m>(&self, message: &'m Message, count: Option<u64>) -> Result<&'m Template, Provenance> {
        match message.status() {
            Status::Obsolete | Status::Vanished => return Err(Provenance::Obsolete),
            Status::Unfinished if !self.options.include_unfinished => {
                return Err(Provenance::Untranslated)
            }
            Status::Unfinished | Status::Finished => {}
        }
        let translations = message.translations();
        let Some(last) = translations.len().checked_sub(1) else {
            return Err(Provenance::Untranslated);
        };
        let index = if message.is_numerus() {
            debug_assert!(
                count.is_some(),
                "plural message {:?} resolved without a count",
                message.source()
            );
            let index = self.rules.plural().select(count);
            if index > last {
                tracing::debug!(
                    source = message.source(),
                    index,
                    forms = translations.len(),
                    "plural message has fewer forms than the locale, using the last one"
                );
            }
            index.min(last)
        } else {
            debug_assert!(
                count.is_none(),
                "message {:?} is not plural but was given a count",
                message.source()
            );
            0
        };
        let template = &translations[index];
        if template.is_empty() {
            Err(Provenance::Untranslated)
        } else {
            Ok(template)
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::untranslated()
    }
}

/// A [`Resolver`] that can be replaced while other threads use it.
///
/// Readers take a snapshot with [`SharedResolver::load`] and never hold the lock while
/// resolving. A reader sees either the old catalog or the new one, never a mix.
#[derive(Debug, Default)]
pub struct SharedResolver {
    current: RwLock<Arc<Resolver>>,
}

impl SharedResolver {
    pub fn new(resolver: Resolver) -> Self {
        Self {
            current: RwLock::new(Arc::new(resolver)),
        }
    }

    /// The resolver in use right now.
    pub fn load(&self) -> Arc<Resolver> {
        // the lock only guards an Arc swap, a poisoned one still holds a valid value
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Installs `resolver` and returns the previous one.
    pub fn replace(&self, resolver: Resolver) -> Arc<Resolver> {
        let resolver = Arc::new(resolver);
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, resolver)
    }
}

impl From<Resolver> for SharedResolver {
    fn from(resolver: Resolver) -> Self {
        Self::new(resolver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogHeader, Context};
    use crate::locale::NumberFormat;
    use crate::plural::PluralRules;

    fn catalog(language: &str, messages: Vec<Message>) -> Catalog {
        let header = CatalogHeader {
            version: Some("2.1".into()),
            language: Some(language.into()),
            source_language: None,
        };
        Catalog::new(header, vec![Context::new("Ctx", messages)])
    }

    #[test]
    fn translated_and_missing() {
        let resolver = Resolver::new(catalog(
            "es",
            vec![Message::new("Open %1")
                .with_status(Status::Finished)
                .with_translation("Abrir %1")],
        ));
        let open = resolver.resolve_lookup(&Lookup::new("Ctx", "Open %1").args(&["a.txt".into()]));
        assert_eq!(open, "Abrir a.txt");
        assert_eq!(open.provenance(), Provenance::Translated);
        assert!(!open.is_fallback());

        let other = resolver.resolve_lookup(&Lookup::new("Other", "Open %1").args(&["a.txt".into()]));
        assert_eq!(other, "Open a.txt");
        assert_eq!(other.provenance(), Provenance::Missing);
        assert!(other.is_fallback());
    }

    #[test]
    fn unfinished_can_be_excluded() {
        let messages = vec![Message::new("Save")
            .with_status(Status::Unfinished)
            .with_translation("Guardar")];
        let resolver = Resolver::new(catalog("es", messages));
        assert_eq!(resolver.resolve("Ctx", "Save", None, None), "Guardar");

        let strict = resolver.with_options(ResolveOptions {
            include_unfinished: false,
        });
        let save = strict.resolve("Ctx", "Save", None, None);
        assert_eq!(save, "Save");
        assert_eq!(save.provenance(), Provenance::Untranslated);
    }

    #[test]
    fn plural_forms_are_clamped() {
        // Polish has three forms, the catalog only two
        let messages = vec![Message::new("%n file(s)")
            .with_numerus(true)
            .with_status(Status::Finished)
            .with_translation("%n plik")
            .with_translation("%n pliki")];
        let resolver = Resolver::new(catalog("pl_PL", messages));
        assert_eq!(resolver.resolve("Ctx", "%n file(s)", None, Some(1)), "1 plik");
        assert_eq!(resolver.resolve("Ctx", "%n file(s)", None, Some(3)), "3 pliki");
        assert_eq!(resolver.resolve("Ctx", "%n file(s)", None, Some(5)), "5 pliki");
    }

    #[test]
    fn empty_plural_form_falls_back() {
        let messages = vec![Message::new("%n row(s)")
            .with_numerus(true)
            .with_status(Status::Unfinished)
            .with_translation("%n fila")
            .with_translation("")];
        let resolver = Resolver::new(catalog("es", messages));
        assert_eq!(resolver.resolve("Ctx", "%n row(s)", None, Some(1)), "1 fila");
        let many = resolver.resolve("Ctx", "%n row(s)", None, Some(4));
        assert_eq!(many, "4 row(s)");
        assert_eq!(many.provenance(), Provenance::Untranslated);
    }

    #[test]
    fn catalog_rules_override_the_locale() {
        let rules = PluralRules::new(["one", "other"], "n > 1").unwrap();
        let messages = vec![Message::new("%n day(s)")
            .with_numerus(true)
            .with_status(Status::Finished)
            .with_translation("%n jour")
            .with_translation("%n jours")];
        let catalog = catalog("xx", messages).with_plural_rules(rules);
        let resolver = Resolver::new(catalog);
        assert_eq!(resolver.resolve("Ctx", "%n day(s)", None, Some(0)), "0 jour");
        assert_eq!(resolver.resolve("Ctx", "%n day(s)", None, Some(2)), "2 jours");
    }

    #[test]
    fn locale_override_and_custom_table() {
        let messages = vec![Message::new("%Ln item(s)")
            .with_numerus(true)
            .with_status(Status::Finished)
            .with_translation("%Ln Element")
            .with_translation("%Ln Elemente")];
        let mut table = LocaleTable::empty();
        table.insert(
            "de",
            LocaleRules::new(PluralRules::one_other(), NumberFormat::new(".", ",")),
        );
        let resolver = Resolver::with_locale(catalog("en", messages), &table, "de-DE");
        assert_eq!(
            resolver.resolve("Ctx", "%Ln item(s)", None, Some(12345)),
            "12.345 Elemente"
        );
    }

    #[test]
    fn resolve_by_id() {
        let messages = vec![Message::new("Quit")
            .with_id("app.quit")
            .with_status(Status::Finished)
            .with_translation("Salir")];
        let resolver = Resolver::new(catalog("es", messages));
        assert_eq!(resolver.resolve_id("app.quit", None), "Salir");
        let unknown = resolver.resolve_id("app.nope", None);
        assert_eq!(unknown, "app.nope");
        assert_eq!(unknown.provenance(), Provenance::Missing);
    }

    #[test]
    fn untranslated_resolver() {
        let resolver = Resolver::untranslated();
        assert_eq!(resolver.resolve("Ctx", "%n file(s)", None, Some(2)), "2 file(s)");
        assert!(resolver.catalog().is_empty());
    }

    #[test]
    fn source_fallback_keeps_length_variants() {
        let untranslated = Resolver::untranslated();
        let prefs = untranslated.resolve("Ctx", "Preferences\u{9c}Prefs", None, None);
        assert_eq!(prefs, "Preferences\u{9c}Prefs");
        assert_eq!(prefs.provenance(), Provenance::Missing);

        let messages = vec![
            Message::new("Open %1\u{9c}%1")
                .with_status(Status::Finished)
                .with_translation("Abrir %1\u{9c}%1"),
            Message::new("Close\u{9c}X").with_status(Status::Unfinished),
            Message::new("Old\u{9c}O")
                .with_status(Status::Obsolete)
                .with_translation("Viejo"),
        ];
        let resolver = Resolver::new(catalog("es", messages));
        let open = resolver.resolve_lookup(&Lookup::new("Ctx", "Open %1\u{9c}%1").args(&["a".into()]));
        assert_eq!(open, "Abrir a");
        let close = resolver.resolve("Ctx", "Close\u{9c}X", None, None);
        assert_eq!(close, "Close\u{9c}X");
        assert_eq!(close.provenance(), Provenance::Untranslated);
        let old = resolver.resolve("Ctx", "Old\u{9c}O", None, None);
        assert_eq!(old, "Old\u{9c}O");
        assert_eq!(old.provenance(), Provenance::Obsolete);
    }

    #[test]
    fn shared_resolver_swaps() {
        let shared = SharedResolver::new(Resolver::untranslated());
        let before = shared.load();
        let previous = shared.replace(Resolver::new(catalog(
            "es",
            vec![Message::new("Yes")
                .with_status(Status::Finished)
                .with_translation("Sí")],
        )));
        assert!(Arc::ptr_eq(&before, &previous));
        assert_eq!(before.resolve("Ctx", "Yes", None, None), "Yes");
        assert_eq!(shared.load().resolve("Ctx", "Yes", None, None), "Sí");
    }

    #[test]
    fn resolved_text_conversions() {
        let resolved = Resolver::untranslated().resolve("Ctx", "Hello", None, None);
        assert_eq!(resolved.len(), 5);
        assert_eq!(resolved.to_string(), "Hello");
        assert_eq!(&*resolved, "Hello");
        let owned: String = resolved.into();
        assert_eq!(owned, "Hello");
    }
}
