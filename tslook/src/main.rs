use anyhow::{bail, Context as _, Result};
use clap::{crate_authors, crate_description, crate_version, value_parser, Arg, ArgAction, ArgMatches, Command};
use std::io::Write;
use std::path::{Path, PathBuf};
use tscat::{Catalog, LoadError, LocaleTable, Lookup, ResolveOptions, Resolver, Status};

fn command() -> Command {
    let file = || {
        Arg::new("FILE")
            .help("Catalog to read (.ts, or .po when built with the po-catalog feature)")
            .required(true)
            .value_parser(value_parser!(PathBuf))
    };
    Command::new("tslook")
        .version(crate_version!())
        .author(crate_authors!())
        .about(crate_description!())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("locale")
                .long("locale")
                .value_name("LOCALE")
                .env("TSLOOK_LOCALE")
                .global(true)
                .help("Plural and number rules to use instead of the catalog language"),
        )
        .arg(
            Arg::new("no-unfinished")
                .long("no-unfinished")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Do not use unfinished translations, like `lrelease -nounfinished`"),
        )
        .subcommand(
            Command::new("stats")
                .about("Print message counts per status")
                .arg(file()),
        )
        .subcommand(
            Command::new("check")
                .about("Report plural messages whose form count does not match the locale")
                .arg(file()),
        )
        .subcommand(
            Command::new("resolve")
                .about("Resolve one message the way an application would")
                .arg(file())
                .arg(
                    Arg::new("context")
                        .short('c')
                        .long("context")
                        .value_name("CONTEXT")
                        .required(true),
                )
                .arg(
                    Arg::new("source")
                        .short('s')
                        .long("source")
                        .value_name("TEXT")
                        .required(true),
                )
                .arg(
                    Arg::new("disambiguation")
                        .short('d')
                        .long("disambiguation")
                        .value_name("COMMENT"),
                )
                .arg(
                    Arg::new("count")
                        .short('n')
                        .long("count")
                        .value_name("N")
                        .value_parser(value_parser!(u64))
                        .help("Count for a plural message"),
                )
                .arg(
                    Arg::new("arg")
                        .short('a')
                        .long("arg")
                        .value_name("VALUE")
                        .action(ArgAction::Append)
                        .help("Value for %1, %2, ... in order"),
                ),
        )
        .subcommand(
            Command::new("dump")
                .about("Write the catalog back as .ts")
                .arg(file())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf))
                        .help("Write to this file instead of stdout"),
                ),
        )
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = command().get_matches();
    let Some((name, sub)) = matches.subcommand() else {
        bail!("no subcommand given");
    };
    let path = sub
        .get_one::<PathBuf>("FILE")
        .context("missing catalog file")?;
    let catalog = read_catalog(path).with_context(|| format!("could not load {}", path.display()))?;

    match name {
        "stats" => stats(&catalog),
        "check" => check(&resolver(catalog, sub)),
        "resolve" => resolve(&resolver(catalog, sub), sub),
        "dump" => dump(&catalog, sub.get_one::<PathBuf>("output")),
        _ => bail!("unknown subcommand {name}"),
    }
}

fn read_catalog(path: &Path) -> Result<Catalog, LoadError> {
    #[cfg(feature = "po-catalog")]
    if path.extension().is_some_and(|ext| ext == "po") {
        return Catalog::from_po_path(path);
    }
    Catalog::from_path(path)
}

fn resolver(catalog: Catalog, matches: &ArgMatches) -> Resolver {
    let resolver = match matches.get_one::<String>("locale") {
        Some(locale) => Resolver::with_locale(catalog, LocaleTable::builtin(), locale),
        None => Resolver::new(catalog),
    };
    resolver.with_options(ResolveOptions {
        include_unfinished: !matches.get_flag("no-unfinished"),
    })
}

fn stats(catalog: &Catalog) -> Result<()> {
    let stats = catalog.statistics();
    let mut out = std::io::stdout().lock();
    if let Some(language) = catalog.language() {
        writeln!(out, "language:    {language}")?;
    }
    writeln!(out, "contexts:    {}", stats.contexts)?;
    writeln!(out, "messages:    {}", stats.messages())?;
    writeln!(out, "  finished:   {}", stats.finished)?;
    writeln!(
        out,
        "  unfinished: {} ({} with text)",
        stats.unfinished, stats.unfinished_with_text
    )?;
    writeln!(out, "  obsolete:   {}", stats.obsolete)?;
    writeln!(out, "  vanished:   {}", stats.vanished)?;
    writeln!(out, "plural:      {}", stats.numerus)?;
    Ok(())
}

fn check(resolver: &Resolver) -> Result<()> {
    let rules = resolver.rules().plural();
    let catalog = resolver.catalog();
    let mismatches = catalog.plural_mismatches(rules);
    let placeholders = catalog.placeholder_mismatches();
    let mut out = std::io::stdout().lock();
    for mismatch in &mismatches {
        writeln!(
            out,
            "{}: {:?}{}: {} plural form(s), expected {}",
            mismatch.context,
            mismatch.source,
            describe(mismatch.disambiguation.as_deref()),
            mismatch.found,
            mismatch.expected
        )?;
    }
    for mismatch in &placeholders {
        writeln!(
            out,
            "{}: {:?}{}: translation {} {}",
            mismatch.context,
            mismatch.source,
            describe(mismatch.disambiguation.as_deref()),
            mismatch.form,
            mismatch.problem
        )?;
    }
    let categories = rules.categories().collect::<Vec<_>>().join(", ");
    if !mismatches.is_empty() || !placeholders.is_empty() {
        bail!(
            "{} plural message(s) do not match the rules ({categories}), {} translation(s) with bad placeholders",
            mismatches.len(),
            placeholders.len()
        );
    }
    writeln!(out, "plural forms match: {categories}")?;
    Ok(())
}

fn describe(disambiguation: Option<&str>) -> String {
    disambiguation.map(|d| format!(" ({d})")).unwrap_or_default()
}

fn resolve(resolver: &Resolver, matches: &ArgMatches) -> Result<()> {
    let context = matches.get_one::<String>("context").context("missing --context")?;
    let source = matches.get_one::<String>("source").context("missing --source")?;
    let disambiguation = matches.get_one::<String>("disambiguation").map(String::as_str);
    let count = matches.get_one::<u64>("count").copied();
    let args: Vec<tscat::Arg> = matches
        .get_many::<String>("arg")
        .unwrap_or_default()
        .map(tscat::Arg::from)
        .collect();

    if let Some(message) = resolver.catalog().find_message(context, source, disambiguation) {
        if message.status().is_live() {
            match (message.is_numerus(), count) {
                (true, None) => bail!("{source:?} is a plural message, pass --count"),
                (false, Some(_)) => bail!("{source:?} is not a plural message, drop --count"),
                _ => {}
            }
        }
    }

    let mut lookup = Lookup::new(context, source).args(&args);
    lookup.disambiguation = disambiguation;
    lookup.count = count;
    let resolved = resolver.resolve_lookup(&lookup);
    tracing::info!(provenance = ?resolved.provenance(), "resolved");
    println!("{resolved}");
    Ok(())
}

fn dump(catalog: &Catalog, output: Option<&PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("could not create {}", path.display()))?;
            catalog
                .write_to(std::io::BufWriter::new(file))
                .with_context(|| format!("could not write {}", path.display()))?;
        }
        None => catalog.write_to(std::io::stdout().lock())?,
    }
    let unfinished = catalog
        .messages()
        .filter(|(_, m)| m.status() == Status::Unfinished)
        .count();
    tracing::debug!(messages = catalog.len(), unfinished, "catalog written");
    Ok(())
}
