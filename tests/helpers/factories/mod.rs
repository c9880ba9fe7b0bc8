pub mod block_bytes_factory;
pub mod descriptor_factory;
pub mod registry_factory;

#[cfg(test)]
mod block_bytes_factory_test;

pub use block_bytes_factory::BlockBytesFactory;
pub use descriptor_factory::DescriptorFactory;
pub use registry_factory::RegistryFactory;
