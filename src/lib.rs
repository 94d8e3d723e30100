//! Thin async client for the memoQ Server Web Service API.
//!
//! memoQ Server exposes its functionality through a set of SOAP 1.1 services
//! (`ServerProjectService`, `FileManagerService`, ...). This crate marshals
//! Rust calls and option structures to and from those services:
//!
//! - [`memoq::api`]: one async method per remote operation.
//! - [`memoq::MemoQProject`]: a stateful wrapper that keeps the "current
//!   project" and the last fetched document list, the way a caller scripting
//!   project creation, import, statistics and export usually needs it.
//! - [`soap`]: the envelope writer and response reader shared by both.
//!
//! # Example
//!
//! ```no_run
//! use memoq_wsapi::memoq::{ClientConfig, MemoQProject};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let config = ClientConfig::from_env()?;
//! let mut memoq = MemoQProject::new(config)?;
//!
//! memoq.project.languages.source = Some("eng".to_string());
//! memoq.project.languages.target = vec!["ger".to_string()];
//!
//! if memoq.create_project().await? {
//!     memoq.import_document("testFiles/sample.docx").await?;
//!     let statistics = memoq.run_statistics().await?;
//!     memoq.save_statistics(".", &statistics)?;
//!     memoq.delete().await?;
//! }
//! # Ok(())
//! # }
//! ```

use std::net::IpAddr;
use std::time::Duration;

pub mod memoq;
pub mod soap;
pub mod types;

pub use memoq::{MemoQProject, MemoqError};
pub use types::{Languages, Project};

/// Network settings for the underlying HTTP client.
///
/// Useful on multi-homed hosts where the memoQ server is only reachable from
/// a specific address or interface.
///
/// # Example
///
/// ```
/// use memoq_wsapi::HttpClientConfig;
/// use std::time::Duration;
///
/// let config = HttpClientConfig::new()
///     .local_address("10.0.0.5".parse().unwrap())
///     .timeout(Duration::from_secs(120));
/// assert!(config.interface.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Local IP address to bind outgoing connections to.
    pub local_address: Option<IpAddr>,
    /// Network interface to bind outgoing connections to (Unix-like systems only).
    pub interface: Option<String>,
    /// Request timeout. Defaults to 30 seconds when unset.
    pub timeout: Option<Duration>,
}

impl HttpClientConfig {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds outgoing connections to the given local address.
    pub fn local_address(mut self, addr: IpAddr) -> Self {
        self.local_address = Some(addr);
        self
    }

    /// Binds outgoing connections to the given network interface.
    pub fn interface(mut self, iface: impl Into<String>) -> Self {
        self.interface = Some(iface.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds a `reqwest::Client` from this configuration.
    pub(crate) fn build_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("memoq-wsapi/", env!("CARGO_PKG_VERSION")))
            .timeout(self.timeout.unwrap_or(Self::DEFAULT_TIMEOUT));

        if let Some(addr) = self.local_address {
            builder = builder.local_address(addr);
        }

        #[cfg(any(
            target_os = "android",
            target_os = "fuchsia",
            target_os = "linux",
            target_os = "macos",
            target_os = "ios",
            target_os = "tvos",
            target_os = "watchos",
            target_os = "illumos",
            target_os = "solaris",
        ))]
        if let Some(ref iface) = self.interface {
            builder = builder.interface(iface);
        }

        builder.build()
    }
}
