mod global;
mod model;


pub use global::CONFIG;
pub use model::{CodecConfig, LoggingConfig, Settings, load_settings};
