use std::sync::Arc;

use crate::codec::column::{ColumnDescriptor, parse_descriptor};

pub struct DescriptorFactory {
    name: String,
    spec: String,
}

impl DescriptorFactory {
    pub fn new() -> Self {
        Self {
            name: "col".to_string(),
            spec: "String".to_string(),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_type(mut self, spec: &str) -> Self {
        self.spec = spec.to_string();
        self
    }

    pub fn of(spec: &str) -> Arc<ColumnDescriptor> {
        Arc::new(Self::new().with_type(spec).create())
    }

    pub fn create(self) -> ColumnDescriptor {
        parse_descriptor(&self.name, &self.spec).expect("valid type spec")
    }
}
