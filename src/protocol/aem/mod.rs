//! AVDECC Entity Model (AEM).
//!
//! The descriptor data model a controller enumerates with READ_DESCRIPTOR:
//! capability bitfields, descriptor records with their checksum, and the
//! tree that holds them.

pub mod capabilities;
pub mod checksum;
pub mod descriptor;
pub mod tree;

#[cfg(test)]
mod tests;

pub use capabilities::{
    Capabilities, ControllerCapabilities, EntityCapabilities, ListenerCapabilities,
    TalkerCapabilities,
};
pub use checksum::{compute_checksum, verify_checksum};
pub use descriptor::{
    AvbInterfaceDescriptor, BackupTalker, ConfigurationDescriptor, Descriptor, DescriptorCount,
    DescriptorType, EntityDescriptor, NAME_LENGTH, NO_STRING, StreamDescriptor, stream_flags,
};
pub use tree::{DescriptorTree, TreeError};
