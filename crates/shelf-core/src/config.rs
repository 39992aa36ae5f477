//! Configuration types for shelf.
//!
//! [`Config::load`] reads `~/.config/shelf/config.toml`, creating it with
//! built-in defaults if it does not yet exist, then applies `SHELF_*`
//! environment overrides (`SHELF_INDEX__TOKEN`, `SHELF_CATALOG__TOP_K`, …).
//! [`Config::load_from`] does the same for an explicit path without creating
//! anything. [`Config::defaults`] returns the defaults without touching the
//! filesystem (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::validate::is_safe_label;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[catalog]
average_price = 25
maximum_price = 50
top_k         = 12

[facets]
colors = ["white", "beige", "blue", "green", "purple"]
sizes  = ["S", "M", "L"]

[server]
listen = "127.0.0.1:3000"

[index]
url        = "http://127.0.0.1:8080"
token      = ""
timeout_ms = 10000

[session]
debounce_ms = 500
"#;

const ENV_PREFIX: &str = "SHELF";

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration, loaded from `~/.config/shelf/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub facets: FacetsConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// `[catalog]` section: the constants the query planner is built with.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogConfig {
    /// Mean item price; the bias target when no sort is requested.
    #[serde(default = "default_average_price")]
    pub average_price: f64,
    /// Highest item price; the bias target for descending sort.
    #[serde(default = "default_maximum_price")]
    pub maximum_price: f64,
    /// Page size requested from the index.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_average_price() -> f64 { 25.0 }
fn default_maximum_price() -> f64 { 50.0 }
fn default_top_k() -> usize { 12 }

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            average_price: default_average_price(),
            maximum_price: default_maximum_price(),
            top_k: default_top_k(),
        }
    }
}

/// `[facets]` section: accepted labels per facet. An empty list accepts any
/// label that is safe to quote.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FacetsConfig {
    #[serde(default = "default_colors")]
    pub colors: Vec<String>,
    #[serde(default = "default_sizes")]
    pub sizes: Vec<String>,
}

fn default_colors() -> Vec<String> {
    ["white", "beige", "blue", "green", "purple"].map(String::from).to_vec()
}
fn default_sizes() -> Vec<String> {
    ["S", "M", "L"].map(String::from).to_vec()
}

impl Default for FacetsConfig {
    fn default() -> Self {
        Self {
            colors: default_colors(),
            sizes: default_sizes(),
        }
    }
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_listen() -> String { "127.0.0.1:3000".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

/// `[index]` section: where the hosted vector index lives.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexConfig {
    #[serde(default = "default_index_url")]
    pub url: String,
    /// Bearer token; empty means no `Authorization` header.
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_index_url() -> String { "http://127.0.0.1:8080".to_string() }
fn default_timeout_ms() -> u64 { 10_000 }

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            url: default_index_url(),
            token: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// `[session]` section: client-side request scheduling.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 { 500 }

impl Default for SessionConfig {
    fn default() -> Self {
        Self { debounce_ms: default_debounce_ms() }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/shelf/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::load_from(&path)
    }

    /// Load an explicit config file, layered on top of the built-in defaults
    /// and under the environment overrides. The file must exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        Self::load_layered(path, environment())
    }

    fn load_layered(path: &Path, env: config::Environment) -> anyhow::Result<Self> {
        let cfg: Config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path))
            .add_source(env)
            .build()?
            .try_deserialize()?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Reject settings the planner or validator cannot work with.
    pub fn validate(&self) -> anyhow::Result<()> {
        let catalog = &self.catalog;
        anyhow::ensure!(catalog.top_k > 0, "catalog.top_k must be greater than 0");
        anyhow::ensure!(
            catalog.average_price >= 0.0 && catalog.maximum_price >= 0.0,
            "catalog prices must be non-negative"
        );
        anyhow::ensure!(
            catalog.average_price <= catalog.maximum_price,
            "catalog.average_price ({}) exceeds catalog.maximum_price ({})",
            catalog.average_price,
            catalog.maximum_price
        );
        for label in self.facets.colors.iter().chain(&self.facets.sizes) {
            anyhow::ensure!(
                is_safe_label(label),
                "facet label {label:?} contains a quote, backslash or control character"
            );
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// `SHELF_<SECTION>__<KEY>` overrides, e.g. `SHELF_INDEX__TOKEN`.
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("shelf")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
