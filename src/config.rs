use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_OUTPUT: &str = "result.txt";

/// Command-line options.
#[derive(Debug, Parser)]
#[command(name = "listing-matcher")]
#[command(about = "Matches marketplace listings to a product catalog")]
pub struct Cli {
    /// File containing the products, one JSON object per line
    #[arg(short, long, value_name = "FILE")]
    pub products: Option<PathBuf>,

    /// File containing the listings, one JSON object per line
    #[arg(short, long, value_name = "FILE")]
    pub listings: Option<PathBuf>,

    /// File where the results will be written [default: result.txt]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print match / no-match counts after the run
    #[arg(short, long)]
    pub debug: bool,

    /// Also write the unmatched listings to this file (implies --debug)
    #[arg(long, value_name = "FILE")]
    pub debug_report: Option<PathBuf>,

    /// Number of matching workers
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// JSON config file; command-line flags take precedence
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Settings that may come from the config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub products: Option<PathBuf>,
    pub listings: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub debug: bool,
    pub debug_report: Option<PathBuf>,
    pub workers: Option<usize>,
}

/// Fully resolved run settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub products: PathBuf,
    pub listings: PathBuf,
    pub output: PathBuf,
    pub debug: bool,
    pub debug_report: Option<PathBuf>,
    pub workers: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("no {0} file given (use --{0} or the config file)")]
    MissingInput(&'static str),
    #[error("workers must be at least 1")]
    ZeroWorkers,
}

pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

impl AppConfig {
    /// Reads the config file named on the command line, if any, and lays the
    /// command-line flags over it.
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => load_config(path)?,
            None => FileConfig::default(),
        };
        Self::merge(cli, file)
    }

    fn merge(cli: Cli, file: FileConfig) -> Result<Self, ConfigError> {
        let products = cli
            .products
            .or(file.products)
            .ok_or(ConfigError::MissingInput("products"))?;
        let listings = cli
            .listings
            .or(file.listings)
            .ok_or(ConfigError::MissingInput("listings"))?;
        let workers = cli.workers.or(file.workers).unwrap_or(1);
        if workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        let debug_report = cli.debug_report.or(file.debug_report);

        Ok(Self {
            products,
            listings,
            output: cli
                .output
                .or(file.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            debug: cli.debug || file.debug || debug_report.is_some(),
            debug_report,
            workers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("listing-matcher").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn short_flags_and_defaults() {
        let config = AppConfig::from_cli(parse(&["-p", "products.txt", "-l", "listings.txt"])).unwrap();
        assert_eq!(
            config,
            AppConfig {
                products: "products.txt".into(),
                listings: "listings.txt".into(),
                output: "result.txt".into(),
                debug: false,
                debug_report: None,
                workers: 1,
            }
        );
    }

    #[test]
    fn debug_report_implies_debug() {
        let config = AppConfig::from_cli(parse(&[
            "-p", "p", "-l", "l", "--debug-report", "unmatched.json",
        ]))
        .unwrap();
        assert!(config.debug);
        assert_eq!(config.debug_report, Some("unmatched.json".into()));
    }

    #[test]
    fn missing_inputs_are_rejected() {
        let err = AppConfig::from_cli(parse(&["-l", "l"])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingInput("products")));
        let err = AppConfig::from_cli(parse(&["-p", "p", "-l", "l", "-w", "0"])).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroWorkers));
    }

    #[test]
    fn flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"products": "cfg-products.txt", "listings": "cfg-listings.txt", "output": "cfg-out.txt", "workers": 4}}"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = AppConfig::from_cli(parse(&["-c", &path, "-o", "cli-out.txt"])).unwrap();
        assert_eq!(config.products, PathBuf::from("cfg-products.txt"));
        assert_eq!(config.output, PathBuf::from("cli-out.txt"));
        assert_eq!(config.workers, 4);
    }

    #[test]
    fn bad_config_file_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
