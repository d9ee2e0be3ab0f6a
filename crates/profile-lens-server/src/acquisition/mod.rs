//! Page acquisition: the single outbound GET behind every automated lookup.

pub mod http_client;

pub use http_client::{HttpClient, RawPage, DEFAULT_USER_AGENT};
