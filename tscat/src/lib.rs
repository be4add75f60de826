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

//! # Qt message catalogs
//!
//! This crate loads the `.ts` translation catalogs written by Qt Linguist and `lupdate`, and
//! resolves UI strings against them.
//!
//! A string is identified by its context (usually the class or dialog it appears in), its
//! source text, and an optional disambiguation comment. When no usable translation exists
//! the source text is returned, so the UI always has something to show.
//!
//! ```
//! use tscat::{tr, Catalog, Resolver};
//!
//! let catalog: Catalog = r#"<?xml version="1.0" encoding="utf-8"?>
//! <!DOCTYPE TS>
//! <TS version="2.1" language="es_ES">
//! <context>
//!     <name>ByteView</name>
//!     <message numerus="yes">
//!         <source>%Ln byte(s)</source>
//!         <translation>
//!             <numerusform>%Ln byte</numerusform>
//!             <numerusform>%Ln bytes</numerusform>
//!         </translation>
//!     </message>
//!     <message>
//!         <source>Packet %1 of %2</source>
//!         <translation>Paquete %1 de %2</translation>
//!     </message>
//! </context>
//! </TS>"#
//!     .parse()
//!     .unwrap();
//!
//! let resolver = Resolver::new(catalog);
//! assert_eq!(tr!(resolver, "ByteView" => "%Ln byte(s)" % 1), "1 byte");
//! assert_eq!(tr!(resolver, "ByteView" => "%Ln byte(s)" % 5), "5 bytes");
//! assert_eq!(tr!(resolver, "ByteView" => "Packet %1 of %2", 3, 10), "Paquete 3 de 10");
//! // not in the catalog
//! assert_eq!(tr!(resolver, "ByteView" => "Hex"), "Hex");
//! ```
//!
//! A running application can swap catalogs with [`SharedResolver`].
//!
//! ## Features
//!
//! * `po-catalog`: load gettext `.po` files into a [`Catalog`] as well.

mod catalog;
mod error;
mod locale;
mod plural;
#[cfg(feature = "po-catalog")]
mod po_catalog;
mod resolver;
mod template;
mod ts_reader;
mod ts_writer;

pub use catalog::{
    Catalog, CatalogHeader, Context, Location, Message, PlaceholderMismatch, PlaceholderProblem,
    PluralMismatch, Statistics, Status,
};
pub use error::{LoadError, ParseError, ParseErrorKind, ParseLocation, WriteError};
pub use locale::{LocaleRules, LocaleTable, NumberFormat};
pub use plural::{PluralRuleError, PluralRules};
pub use resolver::{Provenance, ResolveOptions, ResolvedText, Resolver, SharedResolver};
pub use template::{Arg, Template, LENGTH_VARIANT_SEPARATOR};

use std::sync::Arc;

/// The key of a string to translate, with what is needed to render it.
#[derive(Clone, Copy, Debug)]
pub struct Lookup<'a> {
    pub context: &'a str,
    pub source: &'a str,
    pub disambiguation: Option<&'a str>,
    /// The count of a plural message. Must be `None` for other messages.
    pub count: Option<u64>,
    /// Values for `%1`, `%2`, ...
    pub args: &'a [Arg<'a>],
}

impl<'a> Lookup<'a> {
    pub fn new(context: &'a str, source: &'a str) -> Self {
        Self {
            context,
            source,
            disambiguation: None,
            count: None,
            args: &[],
        }
    }

    pub fn disambiguation(mut self, disambiguation: &'a str) -> Self {
        self.disambiguation = Some(disambiguation);
        self
    }

    pub fn count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn args(mut self, args: &'a [Arg<'a>]) -> Self {
        self.args = args;
        self
    }
}

/// Converts the count given to [`tr!`]. Negative counts are a bug in the caller: they
/// panic in debug builds and count as zero otherwise.
#[doc(hidden)]
pub fn plural_count<N: TryInto<u64>>(n: N) -> u64 {
    match n.try_into() {
        Ok(n) => n,
        Err(_) => {
            debug_assert!(false, "negative count given to a plural message");
            0
        }
    }
}

/// Something that can translate a [`Lookup`]. This is what the [`tr!`] macro calls.
pub trait Translate {
    fn translate(&self, lookup: &Lookup<'_>) -> String;
}

impl Translate for Resolver {
    fn translate(&self, lookup: &Lookup<'_>) -> String {
        self.resolve_lookup(lookup).into_string()
    }
}

impl Translate for SharedResolver {
    fn translate(&self, lookup: &Lookup<'_>) -> String {
        self.load().resolve_lookup(lookup).into_string()
    }
}

impl<T: Translate + ?Sized> Translate for &T {
    fn translate(&self, lookup: &Lookup<'_>) -> String {
        (**self).translate(lookup)
    }
}

impl<T: Translate + ?Sized> Translate for Arc<T> {
    fn translate(&self, lookup: &Lookup<'_>) -> String {
        (**self).translate(lookup)
    }
}

/// Macro used to translate a string.
///
/// The first argument is the translator: anything implementing [`Translate`], such as a
/// [`Resolver`] or a [`SharedResolver`]. Then comes the context and the source text, separated
/// by `=>`.
///
/// ```
/// # use tscat::{tr, Resolver};
/// let resolver = Resolver::untranslated();
/// // Prints "Open", or a translated version of it.
/// println!("{}", tr!(resolver, "FileMenu" => "Open"));
/// ```
///
/// If the same string appears several times in one context with different meanings, a
/// disambiguation comment is added with `|`:
///
/// ```
/// # use tscat::{tr, Resolver};
/// # let resolver = Resolver::untranslated();
/// let action = tr!(resolver, "Document" => "Open" | "verb");
/// let state = tr!(resolver, "Document" => "Open" | "adjective");
/// # assert_eq!(action, state);
/// ```
///
/// Plural messages take their count after `%`. `%n` is replaced by it:
///
/// ```
/// # use tscat::{tr, Resolver};
/// # let resolver = Resolver::untranslated();
/// let files = 42;
/// assert_eq!(tr!(resolver, "Folder" => "%n file(s)" % files), "42 file(s)");
/// ```
///
/// Arguments for `%1`, `%2`, ... follow, separated by commas:
///
/// ```
/// # use tscat::{tr, Resolver};
/// # let resolver = Resolver::untranslated();
/// let folder = "/tmp";
/// assert_eq!(
///     tr!(resolver, "Folder" => "%n file(s) in %1" % 3, folder),
///     "3 file(s) in /tmp"
/// );
/// ```
#[macro_export]
macro_rules! tr {
    ($r:expr, $ctx:tt => $src:tt | $dis:tt % $n:expr $(, $arg:expr)* $(,)?) => {
        $crate::Translate::translate(
            &$r,
            &$crate::Lookup::new($ctx, $src)
                .disambiguation($dis)
                .count($crate::plural_count($n))
                .args(&[$($crate::Arg::from($arg)),*]),
        )
    };
    ($r:expr, $ctx:tt => $src:tt | $dis:tt $(, $arg:expr)* $(,)?) => {
        $crate::Translate::translate(
            &$r,
            &$crate::Lookup::new($ctx, $src)
                .disambiguation($dis)
                .args(&[$($crate::Arg::from($arg)),*]),
        )
    };
    ($r:expr, $ctx:tt => $src:tt % $n:expr $(, $arg:expr)* $(,)?) => {
        $crate::Translate::translate(
            &$r,
            &$crate::Lookup::new($ctx, $src)
                .count($crate::plural_count($n))
                .args(&[$($crate::Arg::from($arg)),*]),
        )
    };
    ($r:expr, $ctx:tt => $src:tt $(, $arg:expr)* $(,)?) => {
        $crate::Translate::translate(
            &$r,
            &$crate::Lookup::new($ctx, $src).args(&[$($crate::Arg::from($arg)),*]),
        )
    };
}
