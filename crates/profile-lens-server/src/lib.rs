//! ProfileLens server: fetches profile pages and serves lookups over HTTP,
//! the command line and an interactive REPL.

pub mod acquisition;
pub mod config;
pub mod render;
pub mod repl;
pub mod rest;
pub mod service;

pub use acquisition::HttpClient;
pub use config::LensConfig;
pub use service::ProfileLens;
