use proptest::prelude::*;
use std::sync::OnceLock;
use tscat::{
    Catalog, CatalogHeader, Context, LocaleTable, Message, Provenance, Resolver, Status,
};

fn spanish() -> &'static Resolver {
    static RESOLVER: OnceLock<Resolver> = OnceLock::new();
    RESOLVER.get_or_init(|| Resolver::new(include_str!("data/es.ts").parse().unwrap()))
}

/// Text that survives XML, control characters included.
fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 %&<>\"'.éß€\t\n\r\u{1}\u{1f}]{0,16}"
}

fn status() -> impl Strategy<Value = Status> {
    prop_oneof![
        Just(Status::Unfinished),
        Just(Status::Finished),
        Just(Status::Obsolete),
        Just(Status::Vanished),
    ]
}

prop_compose! {
    fn message()(
        source in text(),
        disambiguation in proptest::option::of(text()),
        numerus in any::<bool>(),
        translations in proptest::collection::vec(text(), 0..4),
        status in status(),
    ) -> Message {
        let mut message = Message::new(source).with_numerus(numerus);
        if let Some(disambiguation) = disambiguation {
            message = message.with_disambiguation(disambiguation);
        }
        for (i, text) in translations.into_iter().enumerate() {
            // a singular message has at most one non-empty translation
            if numerus || (i == 0 && !text.is_empty()) {
                message = message.with_translation(text);
            }
        }
        let status = if status == Status::Finished && !message.has_translation() {
            Status::Unfinished
        } else {
            status
        };
        message.with_status(status)
    }
}

prop_compose! {
    fn catalog()(
        language in proptest::option::of("[a-z]{2}(_[A-Z]{2})?"),
        contexts in proptest::collection::vec(
            ("[A-Za-z:_ ]{0,12}", proptest::collection::vec(message(), 0..6)),
            0..4,
        ),
    ) -> Catalog {
        let header = CatalogHeader {
            version: Some("2.1".into()),
            language,
            source_language: None,
        };
        let contexts = contexts
            .into_iter()
            .map(|(name, messages)| Context::new(name, messages))
            .collect();
        Catalog::new(header, contexts)
    }
}

proptest! {
    #[test]
    fn written_catalogs_read_back(catalog in catalog()) {
        let written = catalog.to_ts_string().unwrap();
        let reread: Catalog = written.parse().unwrap();
        prop_assert_eq!(reread, catalog);
    }

    #[test]
    fn unknown_keys_resolve_to_their_source(
        context in "[A-Za-z]{1,12}",
        source in "([^%]|\u{9c}){0,40}",
    ) {
        let resolver = spanish();
        prop_assume!(resolver.catalog().find_message(&context, &source, None).is_none());
        let resolved = resolver.resolve(&context, &source, None, None);
        prop_assert_eq!(resolved.as_str(), source.as_str());
        prop_assert_eq!(resolved.provenance(), Provenance::Missing);
    }

    #[test]
    fn obsolete_messages_resolve_to_their_source(include_unfinished in any::<bool>()) {
        let resolver = spanish().clone().with_options(tscat::ResolveOptions { include_unfinished });
        for (context, message) in resolver.catalog().messages() {
            if message.status().is_live() {
                continue;
            }
            let resolved = resolver.resolve(context.name(), message.source(), message.disambiguation(), None);
            prop_assert_eq!(resolved.as_str(), message.source());
            prop_assert_eq!(resolved.provenance(), Provenance::Obsolete);
        }
    }

    #[test]
    fn plural_resolution_is_total(count in any::<u64>(), locale in "[a-z]{2}(_[A-Z]{2})?") {
        // any locale, including unknown ones, picks an existing form
        let resolver = Resolver::with_locale(
            spanish().catalog().clone(),
            LocaleTable::builtin(),
            &locale,
        );
        let bytes = resolver.resolve("ByteViewTab", "%Ln byte(s)", None, Some(count));
        prop_assert_eq!(bytes.provenance(), Provenance::Translated);
        let layers = resolver.resolve("ByteViewTab", "%n layer(s)", None, Some(count));
        prop_assert_eq!(layers.as_str(), format!("{count} capa"));
    }

    #[test]
    fn resolution_is_idempotent(count in 0u64..10_000) {
        let resolver = spanish();
        let first = resolver.resolve("ByteViewTab", "%Ln byte(s)", None, Some(count));
        let second = resolver.resolve("ByteViewTab", "%Ln byte(s)", None, Some(count));
        prop_assert_eq!(&first, &second);
        let expected = if count == 1 { "byte" } else { "bytes" };
        prop_assert!(first.ends_with(expected), "{}", first);
    }
}
