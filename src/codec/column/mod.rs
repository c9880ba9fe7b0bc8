mod decoded;
pub mod descriptor;
pub mod format;
mod nulls_map;
mod registry;
pub mod representation;
mod type_spec;
mod values;

#[cfg(test)]
mod nulls_map_test;
#[cfg(test)]
mod registry_test;
#[cfg(test)]
mod representation_test;
#[cfg(test)]
mod type_spec_test;

pub use decoded::{Column, ColumnData};
pub use descriptor::{ColumnDescriptor, EnumTable, IntervalUnit, TypeKind};
pub use format::PhysicalType;
pub use nulls_map::NullsMap;
pub use registry::{ColumnKind, Shape, TypeRegistry};
pub use representation::Representation;
pub use type_spec::parse_descriptor;
pub use values::ColumnValues;
