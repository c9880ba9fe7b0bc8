pub mod chunked;
pub mod factories;
pub mod factory;
