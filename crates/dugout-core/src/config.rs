// Configuration loading and parsing (settings.toml, credentials.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

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

#[derive(Debug, Clone)]
pub struct Config {
    pub data: DataConfig,
    pub weights: WeightsConfig,
    pub backtest: BacktestConfig,
    pub optimizer: OptimizerConfig,
    pub scoring: ScoringConfig,
    pub recommend: RecommendConfig,
    pub collect: CollectConfig,
    pub yahoo: YahooConfig,
    pub credentials: CredentialsConfig,
}

// ---------------------------------------------------------------------------
// settings.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire settings.toml file.
#[derive(Debug, Clone, Deserialize)]
struct SettingsFile {
    data: DataConfig,
    weights: WeightsConfig,
    backtest: BacktestConfig,
    optimizer: OptimizerConfig,
    scoring: ScoringConfig,
    recommend: RecommendConfig,
    collect: CollectConfig,
    #[serde(default)]
    yahoo: YahooConfig,
}

/// Where collected CSVs are read from and where generated output goes.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub dir: String,
    pub output_dir: String,
    pub logs_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    pub global_path: String,
    pub player_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BacktestConfig {
    pub start_year: i32,
    /// Last season replayed. Defaults to the current year when omitted.
    #[serde(default)]
    pub end_year: Option<i32>,
    pub min_games: usize,
}

/// Differential evolution settings used by weight tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct OptimizerConfig {
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub max_iter: usize,
    pub pop_size: usize,
    pub tol: f64,
    pub mutation_min: f64,
    pub mutation_max: f64,
    pub recombination: f64,
    pub seed: u64,
}

/// Fantasy points awarded per batting event.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    pub single: f64,
    pub double: f64,
    pub triple: f64,
    pub home_run: f64,
    pub rbi: f64,
    pub run: f64,
    pub stolen_base: f64,
    pub walk: f64,
    pub strikeout: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendConfig {
    pub strong_start: f64,
    pub start: f64,
    pub sit: f64,
    pub strong_sit: f64,
    /// Minutes before first pitch that the daily run should be scheduled.
    pub lead_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectConfig {
    pub requests_per_pause: usize,
    pub pause_ms: u64,
    pub timeout_secs: u64,
    #[serde(default)]
    pub season: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct YahooConfig {
    #[serde(default)]
    pub team_keys: Vec<String>,
}

// ---------------------------------------------------------------------------
// credentials.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    pub yahoo_access_token: Option<String>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            single: 3.0,
            double: 5.0,
            triple: 8.0,
            home_run: 10.0,
            rbi: 2.0,
            run: 2.0,
            stolen_base: 5.0,
            walk: 2.0,
            strikeout: -1.0,
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        OptimizerConfig {
            lower_bound: 0.0,
            upper_bound: 0.3,
            max_iter: 20,
            pop_size: 10,
            tol: 0.01,
            mutation_min: 0.5,
            mutation_max: 1.0,
            recombination: 0.7,
            seed: 42,
        }
    }
}

impl Default for RecommendConfig {
    fn default() -> Self {
        RecommendConfig {
            strong_start: 0.25,
            start: 0.10,
            sit: -0.10,
            strong_sit: -0.25,
            lead_minutes: 30,
        }
    }
}

impl BacktestConfig {
    /// The last season to replay, falling back to the current calendar year.
    pub fn resolved_end_year(&self) -> i32 {
        self.end_year.unwrap_or_else(current_year)
    }
}

impl CollectConfig {
    pub fn resolved_season(&self) -> i32 {
        self.season.unwrap_or_else(current_year)
    }
}

fn current_year() -> i32 {
    use chrono::Datelike;
    chrono::Local::now().year()
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/settings.toml` and
/// (optionally) `config/credentials.toml`, relative to the given `base_dir`.
///
/// This does not auto-copy defaults; `load_config()` does.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- settings.toml (required) ---
    let settings_path = config_dir.join("settings.toml");
    let settings_text = read_file(&settings_path)?;
    let settings: SettingsFile =
        toml::from_str(&settings_text).map_err(|e| ConfigError::ParseError {
            path: settings_path.clone(),
            source: e,
        })?;

    // --- credentials.toml (optional) ---
    let credentials_path = config_dir.join("credentials.toml");
    let credentials = if credentials_path.exists() {
        let cred_text = read_file(&credentials_path)?;
        toml::from_str(&cred_text).map_err(|e| ConfigError::ParseError {
            path: credentials_path.clone(),
            source: e,
        })?
    } else {
        CredentialsConfig::default()
    };

    let config = Config {
        data: settings.data,
        weights: settings.weights,
        backtest: settings.backtest,
        optimizer: settings.optimizer,
        scoring: settings.scoring,
        recommend: settings.recommend,
        collect: settings.collect,
        yahoo: settings.yahoo,
        credentials,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working directory,
/// copying default config files first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: String) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message,
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    // Backtest range
    let bt = &config.backtest;
    if let Some(end) = bt.end_year {
        if end < bt.start_year {
            return Err(invalid(
                "backtest.end_year",
                format!("must be >= start_year ({}), got {end}", bt.start_year),
            ));
        }
    }

    // Optimizer bounds and DE parameters
    let opt = &config.optimizer;
    for (name, val) in [
        ("optimizer.lower_bound", opt.lower_bound),
        ("optimizer.upper_bound", opt.upper_bound),
    ] {
        if !(0.0..=1.0).contains(&val) {
            return Err(invalid(name, format!("must be between 0.0 and 1.0, got {val}")));
        }
    }
    if opt.lower_bound >= opt.upper_bound {
        return Err(invalid(
            "optimizer.upper_bound",
            format!(
                "must be greater than lower_bound ({}), got {}",
                opt.lower_bound, opt.upper_bound
            ),
        ));
    }
    let count_fields: &[(&str, usize)] = &[
        ("optimizer.max_iter", opt.max_iter),
        ("optimizer.pop_size", opt.pop_size),
        ("collect.requests_per_pause", config.collect.requests_per_pause),
    ];
    for (name, val) in count_fields {
        if *val == 0 {
            return Err(invalid(name, "must be greater than 0".into()));
        }
    }
    if !(opt.tol > 0.0) {
        return Err(invalid("optimizer.tol", format!("must be > 0, got {}", opt.tol)));
    }
    if !(opt.mutation_min > 0.0 && opt.mutation_min <= opt.mutation_max && opt.mutation_max <= 2.0)
    {
        return Err(invalid(
            "optimizer.mutation_min",
            format!(
                "mutation range must satisfy 0 < min <= max <= 2, got [{}, {}]",
                opt.mutation_min, opt.mutation_max
            ),
        ));
    }
    if !(0.0..=1.0).contains(&opt.recombination) {
        return Err(invalid(
            "optimizer.recombination",
            format!("must be between 0.0 and 1.0, got {}", opt.recombination),
        ));
    }

    // Recommendation thresholds must be ordered
    let r = &config.recommend;
    if !(r.strong_sit <= r.sit && r.sit < r.start && r.start <= r.strong_start) {
        return Err(invalid(
            "recommend",
            format!(
                "thresholds must satisfy strong_sit <= sit < start <= strong_start, \
                 got {} / {} / {} / {}",
                r.strong_sit, r.sit, r.start, r.strong_start
            ),
        ));
    }
    if r.lead_minutes < 0 {
        return Err(invalid(
            "recommend.lead_minutes",
            format!("must be >= 0, got {}", r.lead_minutes),
        ));
    }

    if config.collect.timeout_secs == 0 {
        return Err(invalid("collect.timeout_secs", "must be greater than 0".into()));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Helper: returns the workspace root holding `defaults/`
    /// (works whether `cargo test` runs from the crate dir or the workspace root).
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("defaults").exists() {
            cwd
        } else if cwd.join("../../defaults").exists() {
            cwd.join("../..")
        } else {
            panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
        }
    }

    /// Create a temp base dir with `config/settings.toml` copied from defaults,
    /// then apply `edit` to the settings text.
    fn temp_base_with_settings(name: &str, edit: impl Fn(String) -> String) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        let text = fs::read_to_string(project_root().join("defaults/settings.toml")).unwrap();
        fs::write(tmp.join("config/settings.toml"), edit(text)).unwrap();
        tmp
    }

    fn expect_validation_field(result: Result<Config, ConfigError>, expected: &str) {
        match result {
            Err(ConfigError::ValidationError { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected ValidationError for {expected}, got {other:?}"),
        }
    }

    #[test]
    fn load_default_settings() {
        let tmp = temp_base_with_settings("dugout_config_defaults", |t| t);
        let config = load_config_from(&tmp).expect("should load default settings");

        assert_eq!(config.data.dir, "data");
        assert_eq!(config.weights.global_path, "config/factor_weights.json");
        assert_eq!(config.weights.player_path, "config/player_weights.json");
        assert_eq!(config.backtest.start_year, 2022);
        assert!(config.backtest.end_year.is_none());
        assert_eq!(config.backtest.min_games, 10);
        assert_eq!(config.optimizer.max_iter, 20);
        assert_eq!(config.optimizer.pop_size, 10);
        assert_eq!(config.optimizer.seed, 42);
        assert!((config.optimizer.upper_bound - 0.3).abs() < f64::EPSILON);
        assert!((config.scoring.home_run - 10.0).abs() < f64::EPSILON);
        assert!((config.scoring.strikeout + 1.0).abs() < f64::EPSILON);
        assert!((config.recommend.strong_start - 0.25).abs() < f64::EPSILON);
        assert_eq!(config.recommend.lead_minutes, 30);
        assert_eq!(config.collect.requests_per_pause, 10);
        assert!(config.yahoo.team_keys.is_empty());
        assert!(config.credentials.yahoo_access_token.is_none());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn credentials_toml_with_token() {
        let tmp = temp_base_with_settings("dugout_config_creds", |t| t);
        fs::write(
            tmp.join("config/credentials.toml"),
            "yahoo_access_token = \"abc123\"\n",
        )
        .unwrap();

        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.credentials.yahoo_access_token.as_deref(), Some("abc123"));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_inverted_optimizer_bounds() {
        let tmp = temp_base_with_settings("dugout_config_bounds", |t| {
            t.replace("upper_bound = 0.3", "upper_bound = 0.0")
        });
        expect_validation_field(load_config_from(&tmp), "optimizer.upper_bound");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_pop_size() {
        let tmp = temp_base_with_settings("dugout_config_popsize", |t| {
            t.replace("pop_size = 10", "pop_size = 0")
        });
        expect_validation_field(load_config_from(&tmp), "optimizer.pop_size");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_unordered_thresholds() {
        let tmp = temp_base_with_settings("dugout_config_thresholds", |t| {
            t.replace("start = 0.10", "start = -0.50")
        });
        expect_validation_field(load_config_from(&tmp), "recommend");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_end_year_before_start_year() {
        let tmp = temp_base_with_settings("dugout_config_years", |t| {
            t.replace("start_year = 2022", "start_year = 2022\nend_year = 2020")
        });
        expect_validation_field(load_config_from(&tmp), "backtest.end_year");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_settings() {
        let tmp = std::env::temp_dir().join("dugout_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();

        match load_config_from(&tmp) {
            Err(ConfigError::FileNotFound { path }) => {
                assert!(path.ends_with("settings.toml"));
            }
            other => panic!("expected FileNotFound, got {other:?}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = temp_base_with_settings("dugout_config_parse", |_| "[data\ndir = ".into());
        assert!(matches!(
            load_config_from(&tmp),
            Err(ConfigError::ParseError { .. })
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    // -- ensure_config_files --

    #[test]
    fn ensure_config_files_copies_missing_and_skips_examples() {
        let tmp = std::env::temp_dir().join("dugout_config_ensure");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults/settings.toml"), "x = 1").unwrap();
        fs::write(tmp.join("defaults/factor_weights.json"), "{}").unwrap();
        fs::write(tmp.join("defaults/credentials.toml.example"), "y = 2").unwrap();

        let copied = ensure_config_files(&tmp).unwrap();
        assert_eq!(copied.len(), 2);
        assert!(tmp.join("config/settings.toml").exists());
        assert!(tmp.join("config/factor_weights.json").exists());
        assert!(!tmp.join("config/credentials.toml.example").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_never_overwrites() {
        let tmp = std::env::temp_dir().join("dugout_config_no_overwrite");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("defaults/settings.toml"), "default").unwrap();
        fs::write(tmp.join("config/settings.toml"), "custom").unwrap();

        let copied = ensure_config_files(&tmp).unwrap();
        assert!(copied.is_empty());
        assert_eq!(
            fs::read_to_string(tmp.join("config/settings.toml")).unwrap(),
            "custom"
        );

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("dugout_config_nothing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        assert!(matches!(
            ensure_config_files(&tmp),
            Err(ConfigError::DefaultsCopyError { .. })
        ));
        let _ = fs::remove_dir_all(&tmp);
    }
}
