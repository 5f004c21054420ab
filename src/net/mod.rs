//! Frame transport and time sources.
//!
//! The protocol engine only sees [`TransportPort`] and [`Timestamper`];
//! hardware and OS specifics live behind them.

pub mod clock;
#[cfg(all(target_os = "linux", feature = "raw-socket"))]
pub mod raw_socket;
pub mod transport;

pub use clock::{MonotonicClock, Timestamper};
#[cfg(all(target_os = "linux", feature = "raw-socket"))]
pub use raw_socket::RawSocketTransport;
pub use transport::{MAX_FRAME_SIZE, TransportError, TransportPort};
