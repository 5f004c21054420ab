//! IEEE 1722.1 protocol layer.
//!
//! - [`codec`]: Ethernet and AVTP control header framing
//! - [`adp`]: discovery advertisements
//! - [`aem`]: entity model descriptors
//! - [`aecp`]: enumeration and control responses
//! - [`acmp`]: connection management

pub mod acmp;
pub mod adp;
pub mod aecp;
pub mod aem;
pub mod codec;
