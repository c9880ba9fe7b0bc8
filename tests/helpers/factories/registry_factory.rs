use chrono_tz::Tz;

use crate::codec::column::TypeRegistry;
use crate::codec::settings::{CodecSettings, Compression, EnumResolution};

pub struct RegistryFactory {
    settings: CodecSettings,
}

impl RegistryFactory {
    pub fn new() -> Self {
        Self {
            settings: CodecSettings::default(),
        }
    }

    pub fn with_revision(mut self, revision: u64) -> Self {
        self.settings = self.settings.with_revision(revision);
        self
    }

    pub fn with_lz4(mut self) -> Self {
        self.settings.compression = Compression::Lz4;
        self
    }

    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.settings.default_timezone = tz;
        self
    }

    pub fn with_enum_resolution(mut self, resolution: EnumResolution) -> Self {
        self.settings.enum_resolution = resolution;
        self
    }

    pub fn with_trim_fixed_strings(mut self, trim: bool) -> Self {
        self.settings.trim_fixed_string_zeros = trim;
        self
    }

    pub fn with_saturated_nanos(mut self, saturate: bool) -> Self {
        self.settings.saturate_extra_nanos = saturate;
        self
    }

    pub fn create(self) -> TypeRegistry {
        TypeRegistry::new(self.settings)
    }
}
