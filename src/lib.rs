pub mod analyzers;
pub mod config;
pub mod fetch;
pub mod import;
pub mod infra;
pub mod output;
pub mod parser;
pub mod record;
pub mod services;
pub mod stats;
