//! The entity event loop.
//!
//! One task owns the [`EntityState`], the transport and the protocol
//! handlers. Each iteration waits a bounded time for one inbound frame,
//! dispatches it, then lets the ADP announcer check its schedule. No frame
//! is read before the response to the previous one has been sent.

use std::time::Duration;

use tokio::sync::watch;

use crate::entity::EntityState;
use crate::error::{AvdeccError, Result};
use crate::net::{Timestamper, TransportError, TransportPort};
use crate::protocol::acmp::{AcmpHandler, AcmpOutcome};
use crate::protocol::adp::{AdpAnnouncer, AdpEvent, AnnounceOutcome};
use crate::protocol::aecp::{AecpResponder, HandleOutcome};
use crate::protocol::codec::{AvtpSubtype, EthernetHeader, classify_frame};
use crate::types::{EntityConfig, MacAddress};

/// Loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Longest wait for an inbound frame per iteration.
    pub poll_timeout: Duration,
    /// Interval between ENTITY_AVAILABLE advertisements.
    pub advertise_interval: Duration,
    /// Validity carried in advertisements.
    pub valid_time: Duration,
    /// Interval for persisting the available index, if any.
    pub persist_interval: Option<Duration>,
}

impl From<&EntityConfig> for OrchestratorConfig {
    fn from(config: &EntityConfig) -> Self {
        Self {
            poll_timeout: config.poll_timeout,
            advertise_interval: config.advertise_interval,
            valid_time: config.valid_time,
            persist_interval: config.persist_interval,
        }
    }
}

/// Counters kept by the loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrchestratorStats {
    /// Frames handed over by the transport.
    pub frames_received: u64,
    /// Frames that produced no action.
    pub frames_dropped: u64,
    /// AECP responses transmitted.
    pub aecp_responses: u64,
    /// ACMP responses transmitted.
    pub acmp_responses: u64,
    /// Responses the transport refused.
    pub response_failures: u64,
    /// ENTITY_AVAILABLE advertisements transmitted (periodic and solicited).
    pub advertisements_sent: u64,
    /// ENTITY_AVAILABLE advertisements the transport refused.
    pub advertisements_failed: u64,
    /// ENTITY_DISCOVER requests answered.
    pub discovers_answered: u64,
    /// Failed periodic persists.
    pub persist_failures: u64,
}

/// Event loop binding transport, clock and protocol handlers.
pub struct Orchestrator<T, C> {
    entity: EntityState,
    transport: T,
    clock: C,
    announcer: AdpAnnouncer,
    responder: AecpResponder,
    acmp: AcmpHandler,
    config: OrchestratorConfig,
    next_persist_ns: Option<u64>,
    started: bool,
    stats: OrchestratorStats,
}

#[allow(clippy::cast_possible_truncation)]
fn duration_ns(duration: Duration) -> u64 {
    duration.as_nanos().min(u128::from(u64::MAX)) as u64
}

impl<T, C> Orchestrator<T, C>
where
    T: TransportPort,
    C: Timestamper,
{
    /// Assemble a loop around an existing entity.
    #[must_use]
    pub fn new(entity: EntityState, transport: T, clock: C, config: OrchestratorConfig) -> Self {
        Self {
            entity,
            transport,
            clock,
            announcer: AdpAnnouncer::new(config.advertise_interval, config.valid_time),
            responder: AecpResponder::new(),
            acmp: AcmpHandler::new(),
            config,
            next_persist_ns: None,
            started: false,
            stats: OrchestratorStats::default(),
        }
    }

    /// Load the entity for `config` and assemble the loop.
    ///
    /// The MAC comes from `config.mac_address` or else from the transport.
    ///
    /// # Errors
    ///
    /// Returns [`AvdeccError::NoMacAddress`] when neither provides an
    /// address, or [`AvdeccError::Tree`] when the configured descriptor
    /// tree is inconsistent.
    pub async fn start(config: &EntityConfig, transport: T, clock: C) -> Result<Self> {
        let mac = config.mac_address.unwrap_or_else(|| transport.local_mac());
        if mac == MacAddress::ZERO {
            return Err(AvdeccError::NoMacAddress {
                interface: config.interface.clone(),
            });
        }
        let entity = EntityState::load_or_create(config, mac).await?;
        Ok(Self::new(entity, transport, clock, OrchestratorConfig::from(config)))
    }

    /// Entity state.
    #[must_use]
    pub fn entity(&self) -> &EntityState {
        &self.entity
    }

    /// Transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// ADP announcer.
    #[must_use]
    pub fn announcer(&self) -> &AdpAnnouncer {
        &self.announcer
    }

    /// Counters.
    #[must_use]
    pub fn stats(&self) -> OrchestratorStats {
        self.stats
    }

    /// Run one loop iteration.
    ///
    /// The first call arms the advertisement and persist timers.
    ///
    /// # Errors
    ///
    /// Returns [`AvdeccError::Transport`] only when the transport reports it
    /// is closed; every other failure is logged and absorbed.
    pub async fn step(&mut self) -> Result<()> {
        if !self.started {
            self.begin();
        }

        let now = self.clock.now_ns();
        let wait = self
            .config
            .poll_timeout
            .min(self.announcer.time_until_due(now));
        match self.transport.receive(wait).await {
            Ok(Some(frame)) => self.dispatch(&frame).await,
            Ok(None) => {}
            Err(TransportError::Closed) => {
                return Err(AvdeccError::Transport(TransportError::Closed));
            }
            Err(e) => {
                tracing::warn!("Receive failed: {}", e);
                tokio::time::sleep(self.config.poll_timeout).await;
            }
        }

        let now = self.clock.now_ns();
        match self
            .announcer
            .tick(now, &mut self.entity, &mut self.transport)
            .await
        {
            AnnounceOutcome::NotDue => {}
            outcome => self.count_advertisement(outcome),
        }

        if self.next_persist_ns.is_some_and(|due| now >= due) {
            if let Err(e) = self.entity.persist().await {
                self.stats.persist_failures += 1;
                tracing::warn!("Periodic persist failed: {}", e);
            }
            self.next_persist_ns = self
                .config
                .persist_interval
                .map(|interval| now.saturating_add(duration_ns(interval)));
        }

        Ok(())
    }

    /// Run until `shutdown` turns `true`, then depart and persist.
    ///
    /// # Errors
    ///
    /// Returns the error that stopped the loop early; shutdown steps run
    /// either way.
    pub async fn run(&mut self, shutdown: watch::Receiver<bool>) -> Result<()> {
        tracing::info!(
            "AVDECC entity 0x{:016X} running",
            self.entity.entity_id()
        );
        let mut result = Ok(());
        while !*shutdown.borrow() {
            if let Err(e) = self.step().await {
                tracing::warn!("Entity loop stopped: {}", e);
                result = Err(e);
                break;
            }
        }
        self.shutdown().await;
        result
    }

    /// Send ENTITY_DEPARTING and persist the available index.
    ///
    /// Failures are logged; shutdown always completes.
    pub async fn shutdown(&mut self) {
        if let Err(e) = self.announcer.depart(&self.entity, &mut self.transport).await {
            tracing::warn!("Failed to send ENTITY_DEPARTING: {}", e);
        }
        match self.entity.persist().await {
            Ok(()) => tracing::info!(
                "Entity stopped, available index {} persisted",
                self.entity.available_index()
            ),
            Err(e) => tracing::warn!("Failed to persist available index on shutdown: {}", e),
        }
        self.started = false;
    }

    fn begin(&mut self) {
        let now = self.clock.now_ns();
        self.announcer.arm(now);
        self.next_persist_ns = self
            .config
            .persist_interval
            .map(|interval| now.saturating_add(duration_ns(interval)));
        self.started = true;
    }

    fn count_advertisement(&mut self, outcome: AnnounceOutcome) {
        match outcome {
            AnnounceOutcome::Sent { .. } => self.stats.advertisements_sent += 1,
            AnnounceOutcome::Failed { .. } => self.stats.advertisements_failed += 1,
            AnnounceOutcome::NotDue => {}
        }
    }

    async fn dispatch(&mut self, frame: &[u8]) {
        self.stats.frames_received += 1;

        let (ethernet, subtype) = match classify_frame(frame) {
            Ok(classified) => classified,
            Err(e) => {
                tracing::trace!("Dropping frame: {}", e);
                self.stats.frames_dropped += 1;
                return;
            }
        };
        if ethernet.source == self.entity.mac() {
            self.stats.frames_dropped += 1;
            return;
        }

        match subtype {
            Some(AvtpSubtype::Aecp) => match self.responder.handle(frame, &self.entity) {
                HandleOutcome::Responded(response) => {
                    if self.send_response(&response).await {
                        self.stats.aecp_responses += 1;
                    }
                }
                HandleOutcome::Dropped(reason) => {
                    tracing::trace!("AECP frame dropped: {}", reason);
                    self.stats.frames_dropped += 1;
                }
            },
            Some(AvtpSubtype::Adp) => {
                let pdu = &frame[EthernetHeader::SIZE..];
                match self
                    .announcer
                    .handle_adp(pdu, &mut self.entity, &mut self.transport)
                    .await
                {
                    Ok(AdpEvent::Discovered(outcome)) => {
                        self.stats.discovers_answered += 1;
                        self.count_advertisement(outcome);
                    }
                    Ok(AdpEvent::Ignored) => {}
                    Err(e) => {
                        tracing::debug!("Dropping malformed ADPDU: {}", e);
                        self.stats.frames_dropped += 1;
                    }
                }
            }
            Some(AvtpSubtype::Acmp) => match self.acmp.handle(frame, &self.entity) {
                AcmpOutcome::Responded(response) => {
                    if self.send_response(&response).await {
                        self.stats.acmp_responses += 1;
                    }
                }
                AcmpOutcome::Malformed(_) | AcmpOutcome::NotAcmp | AcmpOutcome::Ignored => {
                    self.stats.frames_dropped += 1;
                }
            },
            Some(AvtpSubtype::Maap) | None => {
                self.stats.frames_dropped += 1;
            }
        }
    }

    async fn send_response(&mut self, frame: &[u8]) -> bool {
        match self.transport.send(frame).await {
            Ok(()) => true,
            Err(e) => {
                self.stats.response_failures += 1;
                tracing::warn!("Failed to send response: {}", e);
                false
            }
        }
    }
}
