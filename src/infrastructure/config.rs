use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub analyzer: AnalyzerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalyzerSettings {
    /// Executable that performs the actual analysis.
    pub command: String,
    /// Arguments placed before the temp file path (e.g. a script path).
    #[serde(default)]
    pub args: Vec<String>,
    /// Directory for per-request temp files, created on demand.
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,
    /// Upper bound on one analyzer run, in seconds. 0 disables the bound.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl AnalyzerSettings {
    pub fn time_limit(&self) -> Option<Duration> {
        match self.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_scratch_dir() -> PathBuf {
    PathBuf::from("temp")
}

fn default_timeout_secs() -> u64 {
    120
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/analyzer"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
