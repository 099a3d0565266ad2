//! Benchmark configuration: TOML file plus environment overrides.
//!
//! Driver identifiers are resolved to concrete backend kinds here, at parse
//! time; an unknown identifier aborts the invocation before any connection is
//! attempted.

use querybench_core::{DatabaseTarget, DriverKind, ScheduleMode};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while loading the benchmark configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    Read {
        /// Configuration file path.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for the expected schema.
    #[error("failed to parse configuration {path}: {source}")]
    Parse {
        /// Configuration file path.
        path: PathBuf,
        /// Underlying TOML failure.
        source: toml::de::Error,
    },

    /// An environment override carried an unusable value.
    #[error("invalid value in {var}: {value}")]
    Env {
        /// Environment variable name.
        var: String,
        /// The rejected value.
        value: String,
    },

    /// Semantically invalid configuration (zero runs, unknown driver, ...).
    #[error(transparent)]
    Invalid(#[from] querybench_core::Error),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

fn default_runs() -> u32 {
    1
}

// The original harness's per-statement budget: 5 minutes.
fn default_timeout_secs() -> u64 {
    300
}

/// One `[[target]]` entry, with the driver identifier still unresolved.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetEntry {
    /// Name used to tag log lines.
    pub name: String,
    /// Driver identifier, e.g. "postgres" or "sqlite".
    pub driver: String,
    /// Connection URL.
    pub url: String,
    /// User name; defaults to empty.
    #[serde(default)]
    pub user: String,
    /// Password; defaults to empty.
    #[serde(default)]
    pub password: String,
}

/// The full benchmark configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BenchConfig {
    /// Path of the append-only benchmark log.
    pub log_file: PathBuf,
    /// How many times each query runs per database.
    #[serde(default = "default_runs")]
    pub runs: u32,
    /// Execution ordering policy.
    #[serde(default)]
    pub schedule: ScheduleMode,
    /// Per-statement execution budget in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Ordered list of SQL statements to measure.
    pub queries: Vec<String>,
    /// Ordered list of database targets.
    #[serde(rename = "target")]
    pub targets: Vec<TargetEntry>,
}

impl BenchConfig {
    /// Load, override from the environment, and validate.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: BenchConfig =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `QBENCH_`-prefixed environment overrides on top of the file.
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(value) = std::env::var("QBENCH_LOG_FILE") {
            self.log_file = PathBuf::from(value);
        }
        if let Ok(value) = std::env::var("QBENCH_RUNS") {
            self.runs = value.parse().map_err(|_| ConfigError::Env {
                var: "QBENCH_RUNS".to_string(),
                value,
            })?;
        }
        if let Ok(value) = std::env::var("QBENCH_TIMEOUT_SECS") {
            self.timeout_secs = value.parse().map_err(|_| ConfigError::Env {
                var: "QBENCH_TIMEOUT_SECS".to_string(),
                value,
            })?;
        }
        if let Ok(value) = std::env::var("QBENCH_SCHEDULE") {
            self.schedule = ScheduleMode::try_from(value.as_str())?;
        }
        Ok(())
    }

    /// Reject configurations that cannot produce a benchmark.
    fn validate(&self) -> Result<()> {
        if self.runs == 0 {
            return Err(querybench_core::Error::invalid_input("run count must be positive").into());
        }
        if self.queries.is_empty() {
            return Err(querybench_core::Error::invalid_input("no queries configured").into());
        }
        if self.targets.is_empty() {
            return Err(querybench_core::Error::invalid_input("no targets configured").into());
        }
        // Driver resolution happens at parse time, never at first use.
        self.resolved_targets()?;
        Ok(())
    }

    /// Resolve every `[[target]]` entry's driver identifier.
    pub fn resolved_targets(&self) -> Result<Vec<DatabaseTarget>> {
        self.targets
            .iter()
            .map(|t| {
                let driver = DriverKind::try_from(t.driver.as_str())?;
                Ok(DatabaseTarget::new(
                    &t.name, driver, &t.url, &t.user, &t.password,
                ))
            })
            .collect()
    }

    /// The per-statement budget as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // Environment overrides are process-global; serialize the tests that
    // touch them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const FULL: &str = r#"
log_file = "benchmark.log"
runs = 5
schedule = "round-robin"
timeout_secs = 60
queries = ["SELECT * FROM crash_data"]

[[target]]
name = "local-postgres"
driver = "postgres"
url = "postgres://localhost:5432/crashdb"
user = "bench"
password = "secret"

[[target]]
name = "local-sqlite"
driver = "sqlite"
url = "sqlite:crashdb.sqlite"
"#;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_full_config_parses() {
        let _guard = ENV_LOCK.lock().unwrap();
        let (_dir, path) = write_config(FULL);
        let config = BenchConfig::load(&path).unwrap();

        assert_eq!(config.runs, 5);
        assert_eq!(config.schedule, ScheduleMode::RoundRobin);
        assert_eq!(config.timeout(), Duration::from_secs(60));

        let targets = config.resolved_targets().unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].driver, DriverKind::Postgres);
        assert_eq!(targets[1].driver, DriverKind::Sqlite);
        assert_eq!(targets[1].user, "");
    }

    #[test]
    fn test_defaults_apply() {
        let _guard = ENV_LOCK.lock().unwrap();
        let (_dir, path) = write_config(
            r#"
log_file = "benchmark.log"
queries = ["SELECT 1"]

[[target]]
name = "mem"
driver = "sqlite"
url = "sqlite::memory:"
"#,
        );
        let config = BenchConfig::load(&path).unwrap();
        assert_eq!(config.runs, 1);
        assert_eq!(config.schedule, ScheduleMode::Sequential);
        assert_eq!(config.timeout_secs, 300);
    }

    #[test]
    fn test_unknown_driver_fails_at_parse_time() {
        let _guard = ENV_LOCK.lock().unwrap();
        let (_dir, path) = write_config(
            r#"
log_file = "benchmark.log"
queries = ["SELECT 1"]

[[target]]
name = "legacy"
driver = "hsqldb"
url = "hsql://localhost/"
"#,
        );
        let err = BenchConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("hsqldb"));
    }

    #[test]
    fn test_empty_queries_are_rejected() {
        let _guard = ENV_LOCK.lock().unwrap();
        let (_dir, path) = write_config(
            r#"
log_file = "benchmark.log"
queries = []

[[target]]
name = "mem"
driver = "sqlite"
url = "sqlite::memory:"
"#,
        );
        assert!(BenchConfig::load(&path).is_err());
    }

    #[test]
    fn test_zero_runs_are_rejected() {
        let _guard = ENV_LOCK.lock().unwrap();
        let (_dir, path) = write_config(
            r#"
log_file = "benchmark.log"
runs = 0
queries = ["SELECT 1"]

[[target]]
name = "mem"
driver = "sqlite"
url = "sqlite::memory:"
"#,
        );
        assert!(BenchConfig::load(&path).is_err());
    }

    #[test]
    fn test_env_overrides_take_precedence() {
        let _guard = ENV_LOCK.lock().unwrap();
        let (_dir, path) = write_config(FULL);

        std::env::set_var("QBENCH_RUNS", "9");
        std::env::set_var("QBENCH_SCHEDULE", "sequential");
        let config = BenchConfig::load(&path);
        std::env::remove_var("QBENCH_RUNS");
        std::env::remove_var("QBENCH_SCHEDULE");

        let config = config.unwrap();
        assert_eq!(config.runs, 9);
        assert_eq!(config.schedule, ScheduleMode::Sequential);
    }

    #[test]
    fn test_invalid_env_override_is_an_error() {
        let _guard = ENV_LOCK.lock().unwrap();
        let (_dir, path) = write_config(FULL);

        std::env::set_var("QBENCH_RUNS", "many");
        let result = BenchConfig::load(&path);
        std::env::remove_var("QBENCH_RUNS");

        assert!(matches!(result, Err(ConfigError::Env { .. })));
    }
}
