//! # avdecc
//!
//! A minimal IEEE 1722.1 (AVDECC) end-station entity.
//!
//! ## Features
//!
//! - Periodic ENTITY_AVAILABLE advertisements over ADP
//! - Answers to ENTITY_DISCOVER requests
//! - AEM descriptor enumeration through READ_DESCRIPTOR
//! - Blanket answers for the common AEM housekeeping commands
//! - NOT_SUPPORTED answers for ACMP connection commands
//! - Persistent `available_index` across restarts
//!
//! ## Example
//!
//! ```rust,no_run
//! # #[cfg(all(target_os = "linux", feature = "raw-socket"))]
//! # async fn example() -> Result<(), avdecc::AvdeccError> {
//! use avdecc::net::{MonotonicClock, RawSocketTransport};
//! use avdecc::{EntityConfig, Orchestrator};
//!
//! let config = EntityConfig::builder()
//!     .interface("eth0")
//!     .entity_name("Stage box")
//!     .build()?;
//!
//! let transport = RawSocketTransport::open(&config.interface)?;
//! let mut entity = Orchestrator::start(&config, transport, MonotonicClock::new()).await?;
//!
//! let (_stop, shutdown) = tokio::sync::watch::channel(false);
//! entity.run(shutdown).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Loop**: [`Orchestrator`] owns everything and runs on one task
//! - **Entity**: identity, descriptor tree and the persisted available index
//! - **Protocol**: wire codecs and per-protocol handlers
//! - **Net**: the [`TransportPort`](net::TransportPort) seam and its raw socket implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Public modules
/// Entity identity, state and persistence
pub mod entity;
/// Error types
pub mod error;
pub mod net;
pub mod orchestrator;
pub mod protocol;
/// Core types
pub mod types;

/// Testing utilities
pub mod testing;

// Re-exports
pub use entity::{EntityIdentity, EntityState};
pub use error::AvdeccError;
pub use orchestrator::{Orchestrator, OrchestratorConfig, OrchestratorStats};
pub use types::{EntityConfig, EntityConfigBuilder, MacAddress};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for common imports
///
/// Convenient re-exports
pub mod prelude {
    pub use crate::net::{MonotonicClock, Timestamper, TransportPort};
    pub use crate::{
        AvdeccError, EntityConfig, EntityState, MacAddress, Orchestrator, OrchestratorStats,
    };
}
