pub use super::factories::{BlockBytesFactory, DescriptorFactory, RegistryFactory};

pub struct Factory;

impl Factory {
    pub fn descriptor() -> DescriptorFactory {
        DescriptorFactory::new()
    }

    pub fn registry() -> RegistryFactory {
        RegistryFactory::new()
    }

    pub fn block_bytes() -> BlockBytesFactory {
        BlockBytesFactory::new()
    }
}
