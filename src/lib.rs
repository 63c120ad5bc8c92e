pub mod analysis;
pub mod classify;
pub mod complexity;
pub mod config;
pub mod errors;
pub mod mcp;
pub mod report;
pub mod scan;
pub mod types;
