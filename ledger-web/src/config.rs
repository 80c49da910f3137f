//! Configuration for ledger-web.

use std::net::SocketAddr;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the web server.
    pub address: SocketAddr,
}
