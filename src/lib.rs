pub mod aggregate;
pub mod classify;
pub mod config;
pub mod error;
pub mod geo;
pub mod ingest;
pub mod numeric;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod stats;
pub mod temporal;
