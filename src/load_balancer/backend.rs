//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single upstream server
//! - Track its liveness flag (the only mutable state)

use std::sync::atomic::{AtomicBool, Ordering};

use axum::http::uri::Authority;
use thiserror::Error;
use url::Url;

/// Error raised for a backend address that cannot be used.
#[derive(Debug, Error)]
pub enum AddressError {
    #[error("invalid backend url: {0}")]
    Url(#[from] url::ParseError),

    #[error("unsupported scheme '{0}', only http is proxied")]
    Scheme(String),

    #[error("invalid backend authority: {0}")]
    Authority(#[from] axum::http::uri::InvalidUri),
}

/// A single upstream server.
///
/// The URL and authority are immutable after construction; health probes
/// and forwarding failures only ever flip the `alive` flag.
#[derive(Debug)]
pub struct Backend {
    url: Url,
    authority: Authority,
    alive: AtomicBool,
}

impl Backend {
    /// Parse a configured address into a backend. New backends start alive
    /// and are demoted by the first failed probe or forward.
    pub fn from_addr(addr: &str) -> Result<Self, AddressError> {
        let url = Url::parse(addr)?;
        if url.scheme() != "http" {
            return Err(AddressError::Scheme(url.scheme().to_string()));
        }

        // http URLs always carry a host; an explicit port wins over :80.
        let host = url.host_str().unwrap_or_default();
        let authority = match url.port() {
            Some(port) => Authority::try_from(format!("{host}:{port}").as_str())?,
            None => Authority::try_from(host)?,
        };

        Ok(Self {
            url,
            authority,
            alive: AtomicBool::new(true),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Non-blocking read of the current liveness flag.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Non-blocking, idempotent liveness update, visible to all readers
    /// immediately after return.
    pub fn set_alive(&self, alive: bool) {
        self.alive.store(alive, Ordering::SeqCst);
    }
}
