//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod classifier_port;

#[cfg(test)]
pub use classifier_port::MockClassifierPort;
pub use classifier_port::ClassifierPort;
