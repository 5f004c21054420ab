//! Capability bitfields advertised in ADP and the ENTITY descriptor.
//!
//! Values follow IEEE 1722.1 Tables 6.2-6.5. The standard numbers bits from
//! the most significant end; the constants here are plain masks.

use serde::{Deserialize, Serialize};

macro_rules! capability_set {
    ($(#[$meta:meta])* $name:ident, $raw:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name($raw);

        impl $name {
            /// No flags set.
            pub const NONE: Self = Self(0);

            /// Wrap a raw bitfield.
            #[must_use]
            pub const fn from_raw(raw: $raw) -> Self {
                Self(raw)
            }

            /// Raw bitfield value.
            #[must_use]
            pub const fn raw(&self) -> $raw {
                self.0
            }

            /// Whether every bit of `other` is set.
            #[must_use]
            pub const fn has(&self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            /// Set the bits of `other`.
            pub fn set(&mut self, other: Self) -> &mut Self {
                self.0 |= other.0;
                self
            }

            /// Clear the bits of `other`.
            pub fn clear(&mut self, other: Self) -> &mut Self {
                self.0 &= !other.0;
                self
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }
    };
}

capability_set!(
    /// `entity_capabilities` (32 bits).
    EntityCapabilities,
    u32
);

impl EntityCapabilities {
    /// Supports firmware upgrade mode.
    pub const EFU_MODE: Self = Self(0x0000_0001);
    /// Supports the ADDRESS_ACCESS AECP message.
    pub const ADDRESS_ACCESS_SUPPORTED: Self = Self(0x0000_0002);
    /// Acts as a gateway to another protocol.
    pub const GATEWAY_ENTITY: Self = Self(0x0000_0004);
    /// Supports the AVDECC Entity Model.
    pub const AEM_SUPPORTED: Self = Self(0x0000_0008);
    /// Supports legacy AV/C.
    pub const LEGACY_AVC: Self = Self(0x0000_0010);
    /// Supports association ids.
    pub const ASSOCIATION_ID_SUPPORTED: Self = Self(0x0000_0020);
    /// `association_id` field is valid.
    pub const ASSOCIATION_ID_VALID: Self = Self(0x0000_0040);
    /// Supports vendor unique AECP messages.
    pub const VENDOR_UNIQUE_SUPPORTED: Self = Self(0x0000_0080);
    /// Supports SR class A.
    pub const CLASS_A_SUPPORTED: Self = Self(0x0000_0100);
    /// Supports SR class B.
    pub const CLASS_B_SUPPORTED: Self = Self(0x0000_0200);
    /// Uses gPTP.
    pub const GPTP_SUPPORTED: Self = Self(0x0000_0400);
    /// Supports AEM authentication.
    pub const AEM_AUTHENTICATION_SUPPORTED: Self = Self(0x0000_0800);
    /// Requires AEM authentication.
    pub const AEM_AUTHENTICATION_REQUIRED: Self = Self(0x0000_1000);
    /// Supports persistent acquire.
    pub const AEM_PERSISTENT_ACQUIRE_SUPPORTED: Self = Self(0x0000_2000);
    /// `identify_control_index` field is valid.
    pub const AEM_IDENTIFY_CONTROL_INDEX_VALID: Self = Self(0x0000_4000);
    /// `interface_index` field is valid.
    pub const AEM_INTERFACE_INDEX_VALID: Self = Self(0x0000_8000);
    /// General controllers should ignore this entity.
    pub const GENERAL_CONTROLLER_IGNORE: Self = Self(0x0001_0000);
    /// Entity is not ready to be enumerated.
    pub const ENTITY_NOT_READY: Self = Self(0x0002_0000);
}

capability_set!(
    /// `talker_capabilities` (16 bits).
    TalkerCapabilities,
    u16
);

impl TalkerCapabilities {
    /// Talker is implemented.
    pub const IMPLEMENTED: Self = Self(0x0001);
    /// Sources other streams.
    pub const OTHER_SOURCE: Self = Self(0x0200);
    /// Sources control streams.
    pub const CONTROL_SOURCE: Self = Self(0x0400);
    /// Sources media clock streams.
    pub const MEDIA_CLOCK_SOURCE: Self = Self(0x0800);
    /// Sources SMPTE time code streams.
    pub const SMPTE_SOURCE: Self = Self(0x1000);
    /// Sources MIDI streams.
    pub const MIDI_SOURCE: Self = Self(0x2000);
    /// Sources audio streams.
    pub const AUDIO_SOURCE: Self = Self(0x4000);
    /// Sources video streams.
    pub const VIDEO_SOURCE: Self = Self(0x8000);
}

capability_set!(
    /// `listener_capabilities` (16 bits).
    ListenerCapabilities,
    u16
);

impl ListenerCapabilities {
    /// Listener is implemented.
    pub const IMPLEMENTED: Self = Self(0x0001);
    /// Sinks other streams.
    pub const OTHER_SINK: Self = Self(0x0200);
    /// Sinks control streams.
    pub const CONTROL_SINK: Self = Self(0x0400);
    /// Sinks media clock streams.
    pub const MEDIA_CLOCK_SINK: Self = Self(0x0800);
    /// Sinks SMPTE time code streams.
    pub const SMPTE_SINK: Self = Self(0x1000);
    /// Sinks MIDI streams.
    pub const MIDI_SINK: Self = Self(0x2000);
    /// Sinks audio streams.
    pub const AUDIO_SINK: Self = Self(0x4000);
    /// Sinks video streams.
    pub const VIDEO_SINK: Self = Self(0x8000);
}

capability_set!(
    /// `controller_capabilities` (32 bits).
    ControllerCapabilities,
    u32
);

impl ControllerCapabilities {
    /// Controller is implemented.
    pub const IMPLEMENTED: Self = Self(0x0000_0001);
}

/// All four capability bitfields of an entity.
///
/// Fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    /// Entity capabilities.
    pub entity: EntityCapabilities,
    /// Talker capabilities.
    pub talker: TalkerCapabilities,
    /// Listener capabilities.
    pub listener: ListenerCapabilities,
    /// Controller capabilities.
    pub controller: ControllerCapabilities,
}

impl Capabilities {
    /// Typical AEM audio endpoint: class A, gPTP, audio talker and/or listener.
    #[must_use]
    pub fn audio_endpoint(has_talker: bool, has_listener: bool) -> Self {
        let entity = EntityCapabilities::AEM_SUPPORTED
            | EntityCapabilities::CLASS_A_SUPPORTED
            | EntityCapabilities::GPTP_SUPPORTED
            | EntityCapabilities::AEM_INTERFACE_INDEX_VALID;
        let talker = if has_talker {
            TalkerCapabilities::IMPLEMENTED | TalkerCapabilities::AUDIO_SOURCE
        } else {
            TalkerCapabilities::NONE
        };
        let listener = if has_listener {
            ListenerCapabilities::IMPLEMENTED | ListenerCapabilities::AUDIO_SINK
        } else {
            ListenerCapabilities::NONE
        };
        Self {
            entity,
            talker,
            listener,
            controller: ControllerCapabilities::NONE,
        }
    }
}
