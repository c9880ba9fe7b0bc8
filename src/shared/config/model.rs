use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub codec: CodecConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodecConfig {
    pub protocol_revision: u64,
    /// `none` or `lz4`
    pub compression: String,
    pub default_timezone: String,
    pub trim_fixed_string_zeros: bool,
    /// `throw` or `saturate`
    pub datetime64_extra_nanos: String,
    /// `name` or `key`
    pub enum_resolution: String,
    pub days_in_year: i64,
    pub days_in_quarter: i64,
    pub days_in_month: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: String,
    pub stdout_level: String,
    pub file_level: String,
    #[serde(default)]
    pub file_enabled: bool,
}

use std::env;

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let config_path = env::var("CH_NATIVE_CONFIG").unwrap_or_else(|_| "config".to_string());

    let settings: Settings = config::Config::builder()
        .set_default("codec.protocol_revision", 54448)?
        .set_default("codec.compression", "none")?
        .set_default("codec.default_timezone", "UTC")?
        .set_default("codec.trim_fixed_string_zeros", true)?
        .set_default("codec.datetime64_extra_nanos", "throw")?
        .set_default("codec.enum_resolution", "name")?
        .set_default("codec.days_in_year", 365)?
        .set_default("codec.days_in_quarter", 120)?
        .set_default("codec.days_in_month", 30)?
        .set_default("logging.log_dir", "logs")?
        .set_default("logging.stdout_level", "info")?
        .set_default("logging.file_level", "debug")?
        .set_default("logging.file_enabled", false)?
        .add_source(config::File::with_name(&config_path).required(false))
        .add_source(config::Environment::with_prefix("CH_NATIVE").separator("__"))
        .build()?
        .try_deserialize()?;

    Ok(settings)
}
