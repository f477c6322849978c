//! REST client for the emissions dashboard backend.

mod client;

pub use client::{ApiError, BackendClient};
