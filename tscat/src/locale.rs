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

//! Per-locale data: plural rules and number formatting.
//!
//! The builtin table is plain data. Supporting the grammar of another language means adding a
//! row to it, or calling [`LocaleTable::insert`] at runtime.

use crate::plural::PluralRules;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Digit grouping used by the localized placeholders (`%Ln`, `%L1`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NumberFormat {
    group_separator: String,
    decimal_separator: String,
}

impl NumberFormat {
    pub fn new(group_separator: impl Into<String>, decimal_separator: impl Into<String>) -> Self {
        Self {
            group_separator: group_separator.into(),
            decimal_separator: decimal_separator.into(),
        }
    }

    pub fn format_u64(&self, n: u64) -> String {
        self.group(&n.to_string())
    }

    pub fn format_i64(&self, n: i64) -> String {
        if n < 0 {
            format!("-{}", self.format_u64(n.unsigned_abs()))
        } else {
            self.format_u64(n as u64)
        }
    }

    pub fn format_f64(&self, x: f64) -> String {
        if !x.is_finite() {
            return x.to_string();
        }
        let plain = x.abs().to_string();
        let (integer, fraction) = match plain.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (plain.as_str(), None),
        };
        let mut out = String::new();
        if x.is_sign_negative() && x != 0.0 {
            out.push('-');
        }
        out.push_str(&self.group(integer));
        if let Some(fraction) = fraction {
            out.push_str(&self.decimal_separator);
            out.push_str(fraction);
        }
        out
    }

    fn group(&self, digits: &str) -> String {
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push_str(&self.group_separator);
            }
            out.push(c);
        }
        out
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::new(",", ".")
    }
}

/// Everything the resolver needs to know about the target language.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocaleRules {
    plural: PluralRules,
    numbers: NumberFormat,
}

impl LocaleRules {
    pub fn new(plural: PluralRules, numbers: NumberFormat) -> Self {
        Self { plural, numbers }
    }

    pub fn plural(&self) -> &PluralRules {
        &self.plural
    }

    pub fn numbers(&self) -> &NumberFormat {
        &self.numbers
    }
}

struct LocaleData {
    locales: &'static [&'static str],
    categories: &'static [&'static str],
    rule: &'static str,
    group_separator: &'static str,
    decimal_separator: &'static str,
}

const ONE_OTHER: &[&str] = &["one", "other"];
const ONE_FEW_MANY: &[&str] = &["one", "few", "many"];
const ONE_FEW_OTHER: &[&str] = &["one", "few", "other"];
const SLAVIC: &str =
    "n%10==1 && n%100!=11 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2";

const NBSP: &str = "\u{a0}";

#[rustfmt::skip]
const BUILTIN: &[LocaleData] = &[
    LocaleData { locales: &["en", "he"], categories: ONE_OTHER, rule: "n != 1", group_separator: ",", decimal_separator: "." },
    LocaleData { locales: &["de", "es", "it", "nl", "da", "el", "tr", "ca", "eu", "gl", "id"], categories: ONE_OTHER, rule: "n != 1", group_separator: ".", decimal_separator: "," },
    LocaleData { locales: &["sv", "nb", "nn", "no", "fi", "et", "hu", "bg", "pt"], categories: ONE_OTHER, rule: "n != 1", group_separator: NBSP, decimal_separator: "," },
    LocaleData { locales: &["fr"], categories: ONE_OTHER, rule: "n > 1", group_separator: "\u{202f}", decimal_separator: "," },
    LocaleData { locales: &["pt_br"], categories: ONE_OTHER, rule: "n > 1", group_separator: ".", decimal_separator: "," },
    LocaleData { locales: &["ja", "zh", "ko", "th"], categories: &["other"], rule: "0", group_separator: ",", decimal_separator: "." },
    LocaleData { locales: &["vi"], categories: &["other"], rule: "0", group_separator: ".", decimal_separator: "," },
    LocaleData { locales: &["ru", "uk", "be"], categories: ONE_FEW_MANY, rule: SLAVIC, group_separator: NBSP, decimal_separator: "," },
    LocaleData { locales: &["sr", "hr", "bs"], categories: ONE_FEW_MANY, rule: SLAVIC, group_separator: ".", decimal_separator: "," },
    LocaleData { locales: &["pl"], categories: ONE_FEW_MANY, rule: "n==1 ? 0 : n%10>=2 && n%10<=4 && (n%100<10 || n%100>=20) ? 1 : 2", group_separator: NBSP, decimal_separator: "," },
    LocaleData { locales: &["cs", "sk"], categories: ONE_FEW_OTHER, rule: "n==1 ? 0 : n>=2 && n<=4 ? 1 : 2", group_separator: NBSP, decimal_separator: "," },
    LocaleData { locales: &["lt"], categories: ONE_FEW_OTHER, rule: "n%10==1 && n%100!=11 ? 0 : n%10>=2 && (n%100<10 || n%100>=20) ? 1 : 2", group_separator: NBSP, decimal_separator: "," },
    LocaleData { locales: &["ro"], categories: ONE_FEW_OTHER, rule: "n==1 ? 0 : n==0 || (n%100>0 && n%100<20) ? 1 : 2", group_separator: ".", decimal_separator: "," },
    LocaleData { locales: &["sl"], categories: &["one", "two", "few", "other"], rule: "n%100==1 ? 0 : n%100==2 ? 1 : n%100==3 || n%100==4 ? 2 : 3", group_separator: ".", decimal_separator: "," },
    LocaleData { locales: &["ga"], categories: &["one", "two", "few", "many", "other"], rule: "n==1 ? 0 : n==2 ? 1 : n>2 && n<7 ? 2 : n>6 && n<11 ? 3 : 4", group_separator: ",", decimal_separator: "." },
    LocaleData { locales: &["ar"], categories: &["zero", "one", "two", "few", "many", "other"], rule: "n==0 ? 0 : n==1 ? 1 : n==2 ? 2 : n%100>=3 && n%100<=10 ? 3 : n%100>=11 ? 4 : 5", group_separator: ",", decimal_separator: "." },
];

/// Maps locale identifiers to [`LocaleRules`].
///
/// Lookups accept `es_ES`, `es-ES`, `es_ES.UTF-8` or `es_ES@euro` alike. A region specific
/// entry (`pt_BR`) wins over the language entry (`pt`). Unknown locales get the default
/// two-category rule.
#[derive(Clone, Debug)]
pub struct LocaleTable {
    entries: HashMap<String, Arc<LocaleRules>>,
    default: Arc<LocaleRules>,
}

impl LocaleTable {
    /// A table without any locale; every lookup returns the default rules.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
            default: Arc::new(LocaleRules::default()),
        }
    }

    /// The table built from the builtin locale data.
    pub fn builtin() -> &'static LocaleTable {
        static BUILTIN_TABLE: OnceLock<LocaleTable> = OnceLock::new();
        BUILTIN_TABLE.get_or_init(|| {
            let mut table = LocaleTable::empty();
            for data in BUILTIN {
                let plural = PluralRules::new(data.categories.iter().copied(), data.rule)
                    .expect("builtin plural rules are valid");
                let rules = Arc::new(LocaleRules::new(
                    plural,
                    NumberFormat::new(data.group_separator, data.decimal_separator),
                ));
                for locale in data.locales {
                    table.entries.insert((*locale).to_owned(), rules.clone());
                }
            }
            table
        })
    }

    /// Adds or replaces the rules of `locale`.
    pub fn insert(&mut self, locale: &str, rules: LocaleRules) {
        self.entries.insert(normalize(locale), Arc::new(rules));
    }

    /// Returns true if `locale` (or its language) has an entry of its own.
    pub fn contains(&self, locale: &str) -> bool {
        self.find(locale).is_some()
    }

    /// The rules for `locale`, falling back to the language subtag, then to the default
    /// two-category rule.
    pub fn lookup(&self, locale: &str) -> Arc<LocaleRules> {
        match self.find(locale) {
            Some(rules) => rules,
            None => {
                tracing::debug!(locale, "no plural rules for locale, using the default");
                self.default.clone()
            }
        }
    }

    fn find(&self, locale: &str) -> Option<Arc<LocaleRules>> {
        let locale = normalize(locale);
        if let Some(rules) = self.entries.get(&locale) {
            return Some(rules.clone());
        }
        let language = locale.split('_').next().unwrap_or_default();
        self.entries.get(language).cloned()
    }
}

impl Default for LocaleTable {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

fn normalize(locale: &str) -> String {
    let end = locale.find(['.', '@']).unwrap_or(locale.len());
    locale[..end].trim().replace('-', "_").to_ascii_lowercase()
}
