// Adapters layer: concrete implementations for external systems.

pub mod dapr;

pub use dapr::DaprClient;
