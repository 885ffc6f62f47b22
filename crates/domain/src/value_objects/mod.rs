//! Value Objects - Immutable, identity-less domain primitives

mod class_table;

pub use class_table::{ClassTable, TOMATO_LEAF_CLASSES};
