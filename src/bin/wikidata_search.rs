//! Wikidata Search CLI
//!
//! Looks up one or more terms in Wikidata and prints each hit with its type.
//!
//! Usage:
//!   cargo run --bin wikidata_search -- tokamak "nuclear reactor"
//!
//! Examples:
//!   # Default queries (tokamak, stellarator, nuclear reactor), first 5 hits each
//!   cargo run --bin wikidata_search
//!
//!   # Full results as JSON
//!   cargo run --bin wikidata_search -- --json tokamak_reactor
//!
//!   # Point at another Wikibase instance
//!   WIKIDATA_API_URL=https://test.wikidata.org/w/api.php \
//!     cargo run --bin wikidata_search -- stellarator
//!
//! Environment Variables:
//!   WIKIDATA_API_URL, WIKIDATA_USER_AGENT, WIKIDATA_TIMEOUT_SECS,
//!   WIKIDATA_LANGUAGE (a `.env` file is honoured); RUST_LOG for logging.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use fuel_wikidata::{EntityResolver, SearchHit, WikidataConfig};

const DEFAULT_QUERIES: &[&str] = &["tokamak", "stellarator", "nuclear reactor"];

/// Search Wikidata entities and resolve their types
#[derive(Parser, Debug)]
#[command(name = "wikidata_search")]
#[command(about = "Search Wikidata entities and resolve their types")]
struct Args {
    /// Queries to search (default: tokamak, stellarator, "nuclear reactor")
    queries: Vec<String>,

    /// Number of hits shown per query in text output
    #[arg(long, short = 'l', default_value_t = 5)]
    limit: usize,

    /// Output all results as JSON, one entry per query in argument order
    #[arg(long)]
    json: bool,

    /// YAML config file (default: environment / built-in defaults)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Override the api.php endpoint
    #[arg(long)]
    api_url: Option<Url>,

    /// Override the search and label language
    #[arg(long)]
    language: Option<String>,

    /// Override the per-request timeout
    #[arg(long)]
    timeout_secs: Option<u64>,
}

/// Results for one query, in `--json` output
#[derive(Debug, Serialize)]
struct QueryResults {
    query: String,
    results: Vec<SearchHit>,
}

impl Args {
    fn resolve_config(&self) -> Result<WikidataConfig> {
        let base = match &self.config {
            Some(path) => WikidataConfig::from_file(path)?,
            None => WikidataConfig::from_env()?,
        };
        self.apply_overrides(base)
    }

    /// Layer command-line overrides on `config` and re-validate the result
    fn apply_overrides(&self, mut config: WikidataConfig) -> Result<WikidataConfig> {
        if let Some(api_url) = &self.api_url {
            config = config.with_api_url(api_url.clone());
        }
        if let Some(language) = &self.language {
            config = config.with_language(language.clone());
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config = config.with_timeout_secs(timeout_secs);
        }
        config
            .validate()
            .context("Invalid command-line override")?;
        Ok(config)
    }

    fn queries(&self) -> Vec<String> {
        if self.queries.is_empty() {
            DEFAULT_QUERIES.iter().map(|q| q.to_string()).collect()
        } else {
            self.queries.clone()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fuel_wikidata=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = args.resolve_config()?;

    tracing::info!(
        api_url = %config.api_url,
        language = %config.language,
        timeout_secs = config.timeout_secs,
        "Configuration loaded"
    );

    let resolver = EntityResolver::from_config(config)?;

    let mut all_results = Vec::new();
    for query in args.queries() {
        let results = resolver.search(&query).await;
        if !args.json {
            print_results(&query, &results, args.limit);
        }
        all_results.push(QueryResults { query, results });
    }

    if args.json {
        let json = serde_json::to_string_pretty(&all_results)
            .context("Failed to serialize results")?;
        println!("{}", json);
    }

    Ok(())
}

fn print_results(query: &str, results: &[SearchHit], limit: usize) {
    println!(
        "\n{} {} {}",
        "=== Results for:".cyan().bold(),
        query.bold(),
        "===".cyan().bold()
    );

    if results.is_empty() {
        println!("{}", "(no results)".dimmed());
        return;
    }

    for hit in results.iter().take(limit) {
        println!("- {} ({})", hit.label.green(), hit.id);
        println!("  {} {}", "Type:".cyan(), hit.entity_type);
        println!("  {} {}", "Desc:".cyan(), hit.description);
        println!("  {} {}\n", "URL :".cyan(), hit.url);
    }

    if results.len() > limit {
        println!(
            "{}",
            format!("... {} more (use --limit or --json)", results.len() - limit).dimmed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_queries() {
        let args = Args::parse_from(["wikidata_search"]);
        assert_eq!(args.queries(), vec!["tokamak", "stellarator", "nuclear reactor"]);
        assert_eq!(args.limit, 5);
        assert!(!args.json);
    }

    #[test]
    fn test_overrides_apply_on_top_of_config() {
        let args = Args::parse_from([
            "wikidata_search",
            "--api-url",
            "http://localhost:8181/w/api.php",
            "--language",
            "de",
            "--timeout-secs",
            "3",
            "stellarator",
        ]);
        let config = args.apply_overrides(WikidataConfig::default()).unwrap();

        assert_eq!(args.queries(), vec!["stellarator"]);
        assert_eq!(config.api_url.as_str(), "http://localhost:8181/w/api.php");
        assert_eq!(config.language, "de");
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.user_agent, WikidataConfig::default().user_agent);
    }

    #[test]
    fn test_config_file_is_the_base() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "language: fr\ntimeout_secs: 7").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let args = Args::parse_from(["wikidata_search", "--config", &path, "--timeout-secs", "2"]);
        let config = args.resolve_config().unwrap();

        assert_eq!(config.language, "fr");
        assert_eq!(config.timeout_secs, 2);
    }

    #[test]
    fn test_invalid_overrides_are_rejected() {
        let zero_timeout = Args::parse_from(["wikidata_search", "--timeout-secs", "0"]);
        let err = zero_timeout
            .apply_overrides(WikidataConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("Invalid command-line override"));

        let empty_language = Args::parse_from(["wikidata_search", "--language", ""]);
        assert!(empty_language
            .apply_overrides(WikidataConfig::default())
            .is_err());
    }

    #[test]
    fn test_json_output_keeps_argument_order() {
        let results = vec![
            QueryResults { query: "tokamak".into(), results: vec![] },
            QueryResults { query: "stellarator".into(), results: vec![] },
            QueryResults { query: "tokamak".into(), results: vec![] },
        ];
        let value = serde_json::to_value(&results).unwrap();

        let queries: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["query"].as_str().unwrap())
            .collect();
        assert_eq!(queries, vec!["tokamak", "stellarator", "tokamak"]);
    }
}
