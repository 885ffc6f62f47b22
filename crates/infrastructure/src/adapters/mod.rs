//! Adapters implementing application ports

mod classifier_adapter;

pub use classifier_adapter::ClassifierAdapter;
