//! Concrete implementations of the service traits.

pub mod backend;
