use std::collections::HashSet;

use serde::Deserialize;

use statline_core::{Error, Result, ScalarKind, Value};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggerConfig {
    pub version: u32,

    #[serde(default)]
    pub logger: LoggerSection,

    #[serde(default)]
    pub metrics: Vec<MetricSpec>,
}

impl LoggerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(Error::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }
        self.logger.validate()?;

        let mut seen = HashSet::new();
        for m in &self.metrics {
            if m.name.is_empty() {
                return Err(Error::Config("metric name must not be empty".into()));
            }
            if !seen.insert(m.name.as_str()) {
                return Err(Error::Config(format!("duplicate metric name: {}", m.name)));
            }
            // Surface kind/default conflicts at load time, not at the first
            // update.
            m.resolved_default()?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggerSection {
    #[serde(default = "default_request_log")]
    pub request_log: String,

    #[serde(default = "default_periodic_log")]
    pub periodic_log: String,

    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    #[serde(default = "default_run_secs")]
    pub run_secs: u64,
}

impl Default for LoggerSection {
    fn default() -> Self {
        Self {
            request_log: default_request_log(),
            periodic_log: default_periodic_log(),
            interval_secs: default_interval_secs(),
            run_secs: default_run_secs(),
        }
    }
}

impl LoggerSection {
    pub fn validate(&self) -> Result<()> {
        if self.interval_secs == 0 {
            return Err(Error::Config("logger.interval_secs must be at least 1".into()));
        }
        if self.run_secs == 0 {
            return Err(Error::Config("logger.run_secs must be at least 1".into()));
        }
        Ok(())
    }
}

fn default_request_log() -> String {
    "standard_logger.log".into()
}
fn default_periodic_log() -> String {
    "periodic_logger.log".into()
}
fn default_interval_secs() -> u64 {
    1
}
fn default_run_secs() -> u64 {
    5
}

/// One metric registration for the scheduled pipeline.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricSpec {
    pub name: String,
    pub kind: ScalarKind,
    #[serde(default)]
    pub default: Option<Value>,
}

impl MetricSpec {
    /// Default value for registration: the declared one when compatible
    /// with `kind`, else the kind's zero value. YAML integers are accepted
    /// for float metrics.
    pub fn resolved_default(&self) -> Result<Value> {
        match (&self.default, self.kind) {
            (None, ScalarKind::Int) => Ok(Value::Int(0)),
            (None, ScalarKind::Float) => Ok(Value::Float(0.0)),
            (None, ScalarKind::Text) => Ok(Value::Text(String::new())),
            (Some(Value::Int(v)), ScalarKind::Float) => Ok(Value::Float(*v as f64)),
            (Some(v), kind) if v.kind() == kind => Ok(v.clone()),
            (Some(v), kind) => Err(Error::Config(format!(
                "metric {}: default is {}, declared kind is {}",
                self.name,
                v.kind(),
                kind
            ))),
        }
    }
}
