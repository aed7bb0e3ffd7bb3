//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single upstream server
//! - Parse `host[:port]` addresses from configuration
//! - Provide the authority used for the upstream URI and Host header

use std::fmt;
use std::str::FromStr;

use axum::http::uri::Authority;

/// Port assumed when an address carries none.
pub const DEFAULT_PORT: u16 = 80;

/// Error returned when a backend address cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseBackendError {
    #[error("backend address is empty")]
    Empty,
    #[error("backend address '{0}' has an empty host")]
    EmptyHost(String),
    #[error("backend address '{0}' has an invalid port")]
    InvalidPort(String),
    #[error("backend address '{0}' is not a valid URI authority")]
    InvalidAuthority(String),
}

/// A single upstream server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backend {
    host: String,
    port: u16,
    authority: Authority,
}

impl Backend {
    /// Create a backend from an already split host and port.
    pub fn new(host: &str, port: u16) -> Result<Self, ParseBackendError> {
        let display = format!("{}:{}", host, port);
        if host.is_empty() {
            return Err(ParseBackendError::EmptyHost(display));
        }
        if port == 0 {
            return Err(ParseBackendError::InvalidPort(display));
        }
        let authority = Authority::from_str(&display)
            .map_err(|_| ParseBackendError::InvalidAuthority(display.clone()))?;

        Ok(Self {
            host: host.to_string(),
            port,
            authority,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The `host:port` authority requests to this backend are sent to.
    pub fn authority(&self) -> &Authority {
        &self.authority
    }
}

impl FromStr for Backend {
    type Err = ParseBackendError;

    /// Parse `host`, `host:port`, `ipv4:port` or `[ipv6]:port`.
    /// An optional `http://` prefix and trailing `/` are tolerated.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let trimmed = trimmed.strip_prefix("http://").unwrap_or(trimmed);
        let trimmed = trimmed.trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ParseBackendError::Empty);
        }

        let (host, port) = if let Some(rest) = trimmed.strip_prefix('[') {
            // Bracketed IPv6 literal
            let (inner, after) = rest
                .split_once(']')
                .ok_or_else(|| ParseBackendError::InvalidAuthority(s.to_string()))?;
            let port = match after {
                "" => DEFAULT_PORT,
                _ => parse_port(after.strip_prefix(':').unwrap_or("x"), s)?,
            };
            (format!("[{}]", inner), port)
        } else {
            match trimmed.rsplit_once(':') {
                Some((host, port)) => (host.to_string(), parse_port(port, s)?),
                None => (trimmed.to_string(), DEFAULT_PORT),
            }
        };

        if host.is_empty() || host == "[]" {
            return Err(ParseBackendError::EmptyHost(s.to_string()));
        }

        Backend::new(&host, port)
    }
}

fn parse_port(port: &str, original: &str) -> Result<u16, ParseBackendError> {
    match port.parse::<u16>() {
        Ok(p) if p > 0 => Ok(p),
        _ => Err(ParseBackendError::InvalidPort(original.to_string())),
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.authority)
    }
}
