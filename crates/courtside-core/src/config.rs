// Configuration loading and parsing (config/courtside.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Name of the single configuration file under `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "courtside.toml";

/// Upper bound for the search debounce window.
pub const MAX_DEBOUNCE_MS: u64 = 10_000;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data: DataConfig,
    pub search: SearchConfig,
    pub simulation: SimulationConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataConfig {
    /// Career-stats table location: a file path or an http(s) URL.
    pub trade_source: String,
    /// Optional player catalog; the bundled sample is used when absent.
    #[serde(default)]
    pub players_catalog: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub debounce_ms: u64,
    pub min_query_len: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            debounce_ms: 300,
            min_query_len: 2,
        }
    }
}

/// Trade factor keys. Kept as strings here; unknown keys resolve to the
/// neutral entry when the simulator reads them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub system_fit: String,
    pub role_change: String,
    pub minutes_change: String,
    pub team_quality: String,
    pub coaching: String,
    pub usage_rate: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            system_fit: "NEUTRAL".into(),
            role_change: "SAME_ROLE".into(),
            minutes_change: "SAME_MINUTES".into(),
            team_quality: "SAME_LEVEL".into(),
            coaching: "AVERAGE_COACH".into(),
            usage_rate: "AVERAGE_USAGE".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl ReportFormat {
    pub const ALLOWED: &'static [&'static str] = &["text", "json"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportConfig {
    pub format: ReportFormat,
    /// Player ids to report on; empty means the whole catalog.
    pub players: Vec<u64>,
    pub filters: ReportFilters,
    pub sliders: SliderSettings,
}

/// Attribute filters applied to the selected players. `"all"` means no
/// constraint; unrecognized values are treated the same way.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportFilters {
    pub conference: String,
    pub position: String,
    pub games_played: String,
}

impl Default for ReportFilters {
    fn default() -> Self {
        ReportFilters {
            conference: "all".into(),
            position: "all".into(),
            games_played: "all".into(),
        }
    }
}

/// What-if slider positions applied to every reported player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct SliderSettings {
    pub scoring: i32,
    pub rebounding: i32,
    pub assists: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: "courtside=info,warn".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Raw TOML shape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ConfigFile {
    data: DataConfig,
    #[serde(default)]
    search: SearchConfig,
    #[serde(default)]
    simulation: SimulationConfig,
    #[serde(default)]
    report: ReportSection,
    #[serde(default)]
    logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ReportSection {
    format: String,
    players: Vec<u64>,
    filters: ReportFilters,
    sliders: SliderSettings,
}

impl Default for ReportSection {
    fn default() -> Self {
        ReportSection {
            format: "text".into(),
            players: Vec::new(),
            filters: ReportFilters::default(),
            sliders: SliderSettings::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/courtside.toml` relative to
/// `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    parse_config(&text, &path)
}

fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let file: ConfigFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let format =
        ReportFormat::from_name(&file.report.format).ok_or_else(|| ConfigError::ValidationError {
            field: "report.format".into(),
            message: format!(
                "must be one of {:?}, got {:?}",
                ReportFormat::ALLOWED,
                file.report.format
            ),
        })?;

    let config = Config {
        data: file.data,
        search: file.search,
        simulation: file.simulation,
        report: ReportConfig {
            format,
            players: file.report.players,
            filters: file.report.filters,
            sliders: file.report.sliders,
        },
        logging: file.logging,
    };

    validate(&config)?;

    Ok(config)
}

/// Seed `config/courtside.toml` from `defaults/courtside.toml` when it does
/// not exist yet. Returns the path written, or `None` when nothing was
/// copied. An existing config is never overwritten.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }

    let seed = base_dir.join("defaults").join(CONFIG_FILE);
    if !seed.is_file() {
        warn!(
            "No {} to seed {} from",
            seed.display(),
            target.display()
        );
        return Ok(None);
    }
    let content = std::fs::read(&seed).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read {}: {e}", seed.display()),
    })?;

    let config_dir = base_dir.join("config");
    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create {}: {e}", config_dir.display()),
    })?;

    // create_new so a config written concurrently is left alone
    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(dest) => dest,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(None),
        Err(e) => {
            return Err(ConfigError::DefaultsCopyError {
                message: format!("failed to create {}: {e}", target.display()),
            })
        }
    };
    std::io::Write::write_all(&mut dest, &content).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to write {}: {e}", target.display()),
    })?;

    info!("Seeded {} from {}", target.display(), seed.display());
    Ok(Some(target))
}

/// Seed the config from `defaults/` under `base_dir` if needed, then load.
pub fn load_config_in(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_file(base_dir)?;
    load_config_from(base_dir)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Seeds the config from `defaults/` before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    load_config_in(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.data.trade_source.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.trade_source".into(),
            message: "must not be empty".into(),
        });
    }

    if config
        .data
        .players_catalog
        .as_deref()
        .is_some_and(|p| p.trim().is_empty())
    {
        return Err(ConfigError::ValidationError {
            field: "data.players_catalog".into(),
            message: "must not be empty when set".into(),
        });
    }

    let debounce = config.search.debounce_ms;
    if debounce == 0 || debounce > MAX_DEBOUNCE_MS {
        return Err(ConfigError::ValidationError {
            field: "search.debounce_ms".into(),
            message: format!("must be between 1 and {MAX_DEBOUNCE_MS}, got {debounce}"),
        });
    }

    if config.search.min_query_len == 0 {
        return Err(ConfigError::ValidationError {
            field: "search.min_query_len".into(),
            message: "must be > 0".into(),
        });
    }

    if config.logging.filter.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "logging.filter".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
