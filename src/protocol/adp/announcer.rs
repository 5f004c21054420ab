//! Periodic ENTITY_AVAILABLE advertisement.
//!
//! The announcer is a two-state machine (`Idle` waiting for the timer,
//! `Sending` while a PDU is built and handed to the transport). It owns the
//! advertisement schedule; the available index lives in [`EntityState`].

use std::time::Duration;

use super::message::{AdpMessageType, AdpPdu, valid_time_from_secs};
use crate::entity::EntityState;
use crate::net::{TransportError, TransportPort};
use crate::protocol::codec::CodecError;

/// Announcer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnouncerState {
    /// Waiting for the next advertisement to fall due.
    Idle,
    /// Building and transmitting an advertisement.
    Sending,
}

/// Result of a tick or an out-of-cycle announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnounceOutcome {
    /// Nothing was due.
    NotDue,
    /// An ENTITY_AVAILABLE went out with this index.
    Sent {
        /// Advertised available index.
        available_index: u32,
    },
    /// Transmission failed; the index is not reused.
    Failed {
        /// Index that was consumed.
        available_index: u32,
    },
}

/// What an inbound ADPDU caused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdpEvent {
    /// A DISCOVER for us (or everyone) was answered.
    Discovered(AnnounceOutcome),
    /// Another entity's advertisement or departure, or a discover for
    /// someone else.
    Ignored,
}

/// Drives periodic ENTITY_AVAILABLE advertisements.
#[derive(Debug, Clone)]
pub struct AdpAnnouncer {
    interval_ns: u64,
    valid_time: u8,
    state: AnnouncerState,
    last_sent_at: Option<u64>,
    next_due_ns: Option<u64>,
}

#[allow(clippy::cast_possible_truncation)]
fn duration_ns(duration: Duration) -> u64 {
    duration.as_nanos().min(u128::from(u64::MAX)) as u64
}

impl AdpAnnouncer {
    /// Announcer advertising every `interval` with the given validity.
    #[must_use]
    pub fn new(interval: Duration, valid_time: Duration) -> Self {
        Self {
            interval_ns: duration_ns(interval).max(1),
            valid_time: valid_time_from_secs(valid_time.as_secs()),
            state: AnnouncerState::Idle,
            last_sent_at: None,
            next_due_ns: None,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> AnnouncerState {
        self.state
    }

    /// Time of the last successful periodic advertisement.
    #[must_use]
    pub fn last_sent_at(&self) -> Option<u64> {
        self.last_sent_at
    }

    /// When the next periodic advertisement falls due, once armed.
    #[must_use]
    pub fn next_due_ns(&self) -> Option<u64> {
        self.next_due_ns
    }

    /// `valid_time` field carried in advertisements (2-second units).
    #[must_use]
    pub fn valid_time(&self) -> u8 {
        self.valid_time
    }

    /// Start the schedule: the first advertisement is due one interval from `now_ns`.
    pub fn arm(&mut self, now_ns: u64) {
        self.next_due_ns = Some(now_ns.saturating_add(self.interval_ns));
    }

    /// Whether a periodic advertisement is due.
    #[must_use]
    pub fn is_due(&self, now_ns: u64) -> bool {
        self.next_due_ns.is_some_and(|due| now_ns >= due)
    }

    /// Time left until the next advertisement (zero when due or unarmed).
    #[must_use]
    pub fn time_until_due(&self, now_ns: u64) -> Duration {
        self.next_due_ns
            .map_or(Duration::ZERO, |due| Duration::from_nanos(due.saturating_sub(now_ns)))
    }

    /// Send an advertisement if one is due.
    ///
    /// Arms the schedule on first use. Whether the send succeeds or fails the
    /// next attempt is one interval after `now_ns`; a failure leaves
    /// `last_sent_at` untouched and is not retried early.
    pub async fn tick<T>(
        &mut self,
        now_ns: u64,
        entity: &mut EntityState,
        transport: &mut T,
    ) -> AnnounceOutcome
    where
        T: TransportPort + ?Sized,
    {
        if self.next_due_ns.is_none() {
            self.arm(now_ns);
        }
        if !self.is_due(now_ns) {
            return AnnounceOutcome::NotDue;
        }

        let outcome = self.send_available(entity, transport).await;
        if let AnnounceOutcome::Sent { .. } = outcome {
            self.last_sent_at = Some(now_ns);
        }
        self.next_due_ns = Some(now_ns.saturating_add(self.interval_ns));
        outcome
    }

    /// Send an out-of-cycle advertisement without moving the schedule.
    pub async fn announce_now<T>(&mut self, entity: &mut EntityState, transport: &mut T) -> AnnounceOutcome
    where
        T: TransportPort + ?Sized,
    {
        self.send_available(entity, transport).await
    }

    /// React to an inbound ADPDU (starting at the subtype byte).
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] when the PDU does not decode.
    pub async fn handle_adp<T>(
        &mut self,
        pdu: &[u8],
        entity: &mut EntityState,
        transport: &mut T,
    ) -> Result<AdpEvent, CodecError>
    where
        T: TransportPort + ?Sized,
    {
        let adp = AdpPdu::decode(pdu)?;
        match adp.message_type {
            AdpMessageType::EntityDiscover
                if adp.entity_id == 0 || adp.entity_id == entity.entity_id() =>
            {
                tracing::debug!("ENTITY_DISCOVER for 0x{:016X}, advertising", adp.entity_id);
                Ok(AdpEvent::Discovered(self.announce_now(entity, transport).await))
            }
            message_type => {
                tracing::trace!("Ignoring ADP {} from 0x{:016X}", message_type, adp.entity_id);
                Ok(AdpEvent::Ignored)
            }
        }
    }

    /// Announce that the entity is leaving.
    ///
    /// Carries the current available index without advancing it.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the transport rejects the frame.
    pub async fn depart<T>(&mut self, entity: &EntityState, transport: &mut T) -> Result<(), TransportError>
    where
        T: TransportPort + ?Sized,
    {
        let pdu = entity.adp_pdu(AdpMessageType::EntityDeparting, 0, entity.available_index());
        self.state = AnnouncerState::Sending;
        let result = transport.send(&pdu.encode_frame(entity.mac())).await;
        self.state = AnnouncerState::Idle;
        self.next_due_ns = None;
        result
    }

    async fn send_available<T>(&mut self, entity: &mut EntityState, transport: &mut T) -> AnnounceOutcome
    where
        T: TransportPort + ?Sized,
    {
        self.state = AnnouncerState::Sending;
        let available_index = entity.next_available_index();
        let pdu = entity.adp_pdu(AdpMessageType::EntityAvailable, self.valid_time, available_index);
        let frame = pdu.encode_frame(entity.mac());
        let outcome = match transport.send(&frame).await {
            Ok(()) => {
                tracing::trace!("Sent ENTITY_AVAILABLE, available_index={}", available_index);
                AnnounceOutcome::Sent { available_index }
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to send ENTITY_AVAILABLE (available_index={}): {}",
                    available_index,
                    e
                );
                AnnounceOutcome::Failed { available_index }
            }
        };
        self.state = AnnouncerState::Idle;
        outcome
    }
}
