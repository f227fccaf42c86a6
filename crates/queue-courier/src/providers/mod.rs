//! Queue provider implementations.

pub mod aws;
pub mod memory;

pub use aws::AwsSqsProvider;
pub use memory::InMemoryProvider;
