use chrono_tz::Tz;

use super::settings::{
    CodecSettings, Compression, DEFAULT_PROTOCOL_REVISION, EnumResolution,
    REVISION_WITH_BLOCK_INFO, SettingsError,
};
use crate::shared::config::CodecConfig;

fn section() -> CodecConfig {
    CodecConfig {
        protocol_revision: DEFAULT_PROTOCOL_REVISION,
        compression: "lz4".to_string(),
        default_timezone: "Asia/Tokyo".to_string(),
        trim_fixed_string_zeros: false,
        datetime64_extra_nanos: "saturate".to_string(),
        enum_resolution: "key".to_string(),
        days_in_year: 366,
        days_in_quarter: 91,
        days_in_month: 31,
    }
}

#[test]
fn maps_config_section_into_runtime_settings() {
    let settings = CodecSettings::from_section(&section()).unwrap();
    assert_eq!(settings.default_timezone, Tz::Asia__Tokyo);
    assert!(!settings.trim_fixed_string_zeros);
    assert!(settings.saturate_extra_nanos);
    assert_eq!(settings.enum_resolution, EnumResolution::Key);
    assert_eq!(settings.days_in_quarter, 91);
    assert_eq!(settings.compression, Compression::Lz4);
}

#[test]
fn rejects_unknown_zone_and_modes() {
    let mut cfg = section();
    cfg.default_timezone = "Mars/Olympus".to_string();
    assert!(matches!(
        CodecSettings::from_section(&cfg),
        Err(SettingsError::UnknownTimezone(_))
    ));

    let mut cfg = section();
    cfg.datetime64_extra_nanos = "round".to_string();
    assert!(matches!(
        CodecSettings::from_section(&cfg),
        Err(SettingsError::InvalidValue { key: "datetime64_extra_nanos", .. })
    ));

    let mut cfg = section();
    cfg.compression = "zstd".to_string();
    assert!(matches!(
        CodecSettings::from_section(&cfg),
        Err(SettingsError::InvalidValue { key: "compression", .. })
    ));
}

#[test]
fn block_info_depends_on_revision() {
    let settings = CodecSettings::default();
    assert!(settings.has_block_info());
    assert!(!settings.with_revision(REVISION_WITH_BLOCK_INFO - 1).has_block_info());
}

#[test]
fn revision_never_exceeds_the_supported_one() {
    let settings = CodecSettings::default().with_revision(54460);
    assert_eq!(settings.protocol_revision, DEFAULT_PROTOCOL_REVISION);

    let mut cfg = section();
    cfg.protocol_revision = u64::MAX;
    let settings = CodecSettings::from_section(&cfg).unwrap();
    assert_eq!(settings.protocol_revision, DEFAULT_PROTOCOL_REVISION);

    let older = CodecSettings::default().with_revision(REVISION_WITH_BLOCK_INFO);
    assert_eq!(older.protocol_revision, REVISION_WITH_BLOCK_INFO);
}
