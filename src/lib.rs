//! Static file server that decorates every response with permissive CORS headers.
//!
//! Serves `./frontend` on port 8000 by default. Every `OPTIONS` request is
//! answered as a successful preflight.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::ServerError;
pub use server::Server;
