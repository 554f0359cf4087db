use std::env;

use crate::telemetry::config::json_mode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl OutputConfig {
    pub fn from_env() -> Self {
        Self::from_values(env::var("DONMIG_OUTPUT_FORMAT").ok().as_deref(), env::var("DONMIG_OUTPUT_PRETTY").ok().as_deref())
    }

    /// `--json` forces the JSON presenter regardless of `DONMIG_OUTPUT_FORMAT`.
    pub fn for_json_mode() -> Self {
        let mut cfg = Self::from_env();
        if json_mode() { cfg.format = OutputFormat::Json; }
        cfg
    }

    fn from_values(format: Option<&str>, pretty: Option<&str>) -> Self {
        let format = match format {
            Some("json") => OutputFormat::Json,
            _ => OutputFormat::Text,
        };
        let pretty = matches!(pretty, Some(v) if ["1", "true", "yes"].iter().any(|t| v.eq_ignore_ascii_case(t)));
        OutputConfig { format, pretty }
    }
}
