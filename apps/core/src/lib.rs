pub mod autocomplete;
pub mod classify;
pub mod config;
pub mod contract;
pub mod core_service;
pub mod error;
pub mod favicon;
pub mod feedback;
pub mod logging;
pub mod model;
pub mod query_dsl;
pub mod runtime;
pub mod shell;
pub mod transport;
