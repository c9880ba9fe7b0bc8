pub mod block;
pub mod column;
pub mod compression;
pub mod cursor;
pub mod errors;
pub mod packet;
pub mod reader;
pub mod settings;
pub mod types;
pub mod writer;

#[cfg(test)]
mod settings_test;

pub use block::{Block, BlockInfo, BlockReader, BlockWriter};
pub use column::{ColumnDescriptor, Representation, TypeRegistry};
pub use errors::{CodecError, ServerException};
pub use settings::{CodecSettings, Compression};
pub use types::Value;
