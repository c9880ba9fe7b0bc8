use chrono_tz::Tz;
use thiserror::Error;

use crate::shared::config::{CONFIG, CodecConfig};

pub const DEFAULT_PROTOCOL_REVISION: u64 = 54448;
pub const REVISION_WITH_BLOCK_INFO: u64 = 51903;
pub const REVISION_WITH_TEMPORARY_TABLES: u64 = 50264;
pub const REVISION_WITH_TOTAL_ROWS_IN_PROGRESS: u64 = 51554;
pub const REVISION_WITH_CLIENT_WRITE_INFO: u64 = 54420;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Unknown timezone '{0}'")]
    UnknownTimezone(String),

    #[error("Invalid value '{value}' for '{key}'")]
    InvalidValue { key: &'static str, value: String },
}

/// How native enum values are rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnumResolution {
    Name,
    Key,
}

/// Framing applied to compressible block payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compression {
    None,
    Lz4,
}

/// Per-session codec behavior.
#[derive(Clone, Debug, PartialEq)]
pub struct CodecSettings {
    /// Negotiated revision, never above `DEFAULT_PROTOCOL_REVISION`.
    pub protocol_revision: u64,
    pub compression: Compression,
    /// Zone applied to `DateTime`/`DateTime64` columns without an explicit one.
    pub default_timezone: Tz,
    pub trim_fixed_string_zeros: bool,
    /// Truncate instead of failing when a timestamp is finer than the column precision.
    pub saturate_extra_nanos: bool,
    pub enum_resolution: EnumResolution,
    pub days_in_year: i64,
    pub days_in_quarter: i64,
    pub days_in_month: i64,
}

impl Default for CodecSettings {
    fn default() -> Self {
        Self {
            protocol_revision: DEFAULT_PROTOCOL_REVISION,
            compression: Compression::None,
            default_timezone: Tz::UTC,
            trim_fixed_string_zeros: true,
            saturate_extra_nanos: false,
            enum_resolution: EnumResolution::Name,
            days_in_year: 365,
            days_in_quarter: 120,
            days_in_month: 30,
        }
    }
}

impl CodecSettings {
    pub fn from_config() -> Result<Self, SettingsError> {
        Self::from_section(&CONFIG.codec)
    }

    pub fn from_section(cfg: &CodecConfig) -> Result<Self, SettingsError> {
        let default_timezone = cfg
            .default_timezone
            .parse::<Tz>()
            .map_err(|_| SettingsError::UnknownTimezone(cfg.default_timezone.clone()))?;
        let saturate_extra_nanos = match cfg.datetime64_extra_nanos.as_str() {
            "throw" => false,
            "saturate" => true,
            other => {
                return Err(SettingsError::InvalidValue {
                    key: "datetime64_extra_nanos",
                    value: other.to_string(),
                });
            }
        };
        let compression = match cfg.compression.as_str() {
            "none" => Compression::None,
            "lz4" => Compression::Lz4,
            other => {
                return Err(SettingsError::InvalidValue {
                    key: "compression",
                    value: other.to_string(),
                });
            }
        };
        let enum_resolution = match cfg.enum_resolution.as_str() {
            "name" => EnumResolution::Name,
            "key" => EnumResolution::Key,
            other => {
                return Err(SettingsError::InvalidValue {
                    key: "enum_resolution",
                    value: other.to_string(),
                });
            }
        };
        Ok(Self {
            protocol_revision: negotiate(cfg.protocol_revision),
            compression,
            default_timezone,
            trim_fixed_string_zeros: cfg.trim_fixed_string_zeros,
            saturate_extra_nanos,
            enum_resolution,
            days_in_year: cfg.days_in_year,
            days_in_quarter: cfg.days_in_quarter,
            days_in_month: cfg.days_in_month,
        })
    }

    /// The server answers with the lower of its own revision and ours.
    pub fn with_revision(mut self, revision: u64) -> Self {
        self.protocol_revision = negotiate(revision);
        self
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn has_block_info(&self) -> bool {
        self.protocol_revision >= REVISION_WITH_BLOCK_INFO
    }
}

fn negotiate(revision: u64) -> u64 {
    revision.min(DEFAULT_PROTOCOL_REVISION)
}
