//! # mirror-cli
//!
//! `mirror-query` loads a host model file and resolves type, method and field
//! queries against it through one shared [`MirrorResolver`], printing what
//! was found and, optionally, the resulting cache statistics.
//!
//! Set `MIRROR_RS_LOG` (an `EnvFilter` directive, default `warn`) to see the
//! resolver's tracing output on stderr.
use clap::{CommandFactory, FromArgMatches, Parser};
use mirror_model::{ModelError, ModelProvider, ModelType};
use mirror_resolver::{CacheStats, MirrorConfig, MirrorResolver, ReflectionProvider, SignatureMatching};
use mirror_types::MirrorError;
use serde::Serialize;
use std::{
    ffi::OsString,
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub mod query;

pub use query::{FieldQuery, MethodQuery, Query, QueryKind, TypeQuery};

pub const ENV_LOG: &str = "MIRROR_RS_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "mirror-query",
    author,
    version,
    about = "Resolve versioned host types and members against a model file"
)]
pub struct Args {
    #[arg(value_name = "MODEL.json")]
    pub model: PathBuf,
    /// Type query, `CAT:NAME` (CAT is `nms` or `obc`).
    #[arg(long = "type", value_name = "CAT:NAME")]
    pub types: Vec<String>,
    /// Method query, `CAT:NAME#method(T1,T2)` with qualified parameter types.
    #[arg(long = "method", value_name = "CAT:NAME#method(..)")]
    pub methods: Vec<String>,
    /// Field query, `CAT:NAME#field`.
    #[arg(long = "field", value_name = "CAT:NAME#field")]
    pub fields: Vec<String>,
    /// Require parameter types to match exactly instead of by assignability.
    #[arg(long)]
    pub exact: bool,
    /// Rescan on every lookup of a method that was not found.
    #[arg(long)]
    pub no_negative_method_cache: bool,
    /// Print cache statistics after the queries.
    #[arg(long)]
    pub stats: bool,
    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
    /// Query kinds in command-line order. Empty unless parsed with
    /// [`Args::try_parse_ordered_from`].
    #[arg(skip)]
    pub order: Vec<QueryKind>,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Malformed query `{query}`: {reason}")]
    Query { query: String, reason: &'static str },
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Resolve(#[from] MirrorError),
    #[error("Could not write output: {0}")]
    Output(#[from] io::Error),
    #[error("Could not encode report: {0}")]
    Json(#[from] serde_json::Error),
}

/// The outcome of one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub kind: QueryKind,
    pub query: String,
    pub found: bool,
    /// Qualified owner or type name when resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub results: Vec<QueryResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<CacheStats>,
}

impl Args {
    /// Parses `argv` and records the position of every query so they can be
    /// answered in the order they were given.
    pub fn try_parse_ordered_from<I, T>(argv: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::command().try_get_matches_from(argv)?;
        let mut args = Self::from_arg_matches(&matches)?;

        let mut order = Vec::new();
        for (id, kind) in [
            ("types", QueryKind::Type),
            ("methods", QueryKind::Method),
            ("fields", QueryKind::Field),
        ] {
            if let Some(indices) = matches.indices_of(id) {
                order.extend(indices.map(|index| (index, kind)));
            }
        }
        order.sort_unstable_by_key(|&(index, _)| index);
        args.order = order.into_iter().map(|(_, kind)| kind).collect();
        Ok(args)
    }

    /// Parses every query string. Without a recorded order the queries are
    /// grouped by kind: types, then methods, then fields.
    pub fn queries(&self) -> Result<Vec<Query>, CliError> {
        let total = self.types.len() + self.methods.len() + self.fields.len();
        let kinds: Vec<QueryKind> = if self.order.len() == total {
            self.order.clone()
        } else {
            std::iter::repeat(QueryKind::Type)
                .take(self.types.len())
                .chain(std::iter::repeat(QueryKind::Method).take(self.methods.len()))
                .chain(std::iter::repeat(QueryKind::Field).take(self.fields.len()))
                .collect()
        };

        let (mut types, mut methods, mut fields) =
            (self.types.iter(), self.methods.iter(), self.fields.iter());
        kinds
            .into_iter()
            .filter_map(|kind| {
                let texts = match kind {
                    QueryKind::Type => &mut types,
                    QueryKind::Method => &mut methods,
                    QueryKind::Field => &mut fields,
                };
                texts.next().map(|text| Query::parse(kind, text))
            })
            .collect()
    }

    /// Environment configuration with the command-line switches applied on top.
    pub fn config(&self) -> MirrorConfig {
        let mut config = MirrorConfig::from_env();
        if self.exact {
            config = config.with_matching(SignatureMatching::Exact);
        }
        if self.no_negative_method_cache {
            config = config.with_missing_methods_cached(false);
        }
        config
    }
}

pub fn run_cli() -> ExitCode {
    init_tracing();
    let stdout = io::stdout();
    ExitCode::from(run_from(std::env::args_os(), &mut stdout.lock()))
}

/// Parses `argv`, runs it and returns the process exit code: 0 on success,
/// 1 for a malformed query or a failed run, and clap's own code (2) for a
/// bad command line.
pub fn run_from<I, T>(argv: I, out: &mut impl Write) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = match Args::try_parse_ordered_from(argv) {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return u8::try_from(e.exit_code()).unwrap_or(2);
        }
    };

    match run(&args, out) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

/// Loads the model, runs every query in order and writes the report to `out`.
pub fn run(args: &Args, out: &mut impl Write) -> Result<(), CliError> {
    let queries = args.queries()?;
    let provider = ModelProvider::from_path(&args.model)?;
    let resolver = MirrorResolver::new(provider, args.config());
    debug!(model = %args.model.display(), config = ?resolver.config(), "running queries");

    let report = Report {
        results: resolve_all(&resolver, &queries)?,
        stats: args.stats.then(|| resolver.stats()),
    };

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    for result in &report.results {
        match &result.resolved {
            Some(resolved) => writeln!(out, "{:<6} {} found {}", result.kind.label(), result.query, resolved)?,
            None => writeln!(out, "{:<6} {} absent", result.kind.label(), result.query)?,
        }
    }
    if let Some(stats) = &report.stats {
        write!(out, "{}", stats)?;
    }
    Ok(())
}

pub fn resolve_all(
    resolver: &MirrorResolver<ModelProvider>,
    queries: &[Query],
) -> Result<Vec<QueryResult>, CliError> {
    let mut results = Vec::with_capacity(queries.len());

    for query in queries {
        let resolved = match query {
            Query::Type(query) => resolver
                .resolve_type(query.category, &query.name)?
                .map(|t| t.name().to_string()),
            Query::Method(query) => match resolve_owner(resolver, &query.owner)? {
                Some(owner) => match parameter_types(resolver, &query.parameters) {
                    Some(parameters) => resolver
                        .resolve_method(&owner, &query.name, parameters)?
                        .map(|m| m.to_string()),
                    None => None,
                },
                None => None,
            },
            Query::Field(query) => match resolve_owner(resolver, &query.owner)? {
                Some(owner) => resolver.resolve_field(&owner, &query.name)?.map(|f| f.to_string()),
                None => None,
            },
        };
        results.push(QueryResult {
            kind: query.kind(),
            query: query.to_string(),
            found: resolved.is_some(),
            resolved,
        });
    }

    Ok(results)
}

fn resolve_owner(
    resolver: &MirrorResolver<ModelProvider>,
    owner: &TypeQuery,
) -> Result<Option<ModelType>, MirrorError> {
    resolver.resolve_type(owner.category, &owner.name)
}

/// Parameter types are named in full, so they bypass the type cache.
fn parameter_types(
    resolver: &MirrorResolver<ModelProvider>,
    names: &[String],
) -> Option<Vec<ModelType>> {
    names
        .iter()
        .map(|name| match resolver.provider().find_type(name) {
            Ok(ty) => Some(ty),
            Err(e) => {
                debug!(name = %name, error = %e, "unknown parameter type");
                None
            }
        })
        .collect()
}
