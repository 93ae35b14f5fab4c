//! Template resolution

pub mod resolver;

pub use resolver::{FsResourceLookup, Resource, ResourceLookup};
