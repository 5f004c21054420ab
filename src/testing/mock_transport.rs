//! In-memory frame transport.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::net::transport::check_frame_len;
use crate::net::{TransportError, TransportPort};
use crate::types::MacAddress;

#[derive(Debug, Default)]
struct MockState {
    inbound: VecDeque<Vec<u8>>,
    sent: Vec<Vec<u8>>,
    fail_sends: bool,
    closed: bool,
}

/// Transport backed by in-memory queues.
///
/// Clones share the queues: hand one to the entity and keep another to
/// inject frames and inspect what was sent.
#[derive(Debug, Clone)]
pub struct MockTransport {
    mac: MacAddress,
    state: Arc<Mutex<MockState>>,
    arrived: Arc<Notify>,
}

impl MockTransport {
    /// Transport reporting `mac` as its local address.
    #[must_use]
    pub fn new(mac: MacAddress) -> Self {
        Self {
            mac,
            state: Arc::default(),
            arrived: Arc::new(Notify::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a frame for the entity to receive.
    pub fn push_inbound(&self, frame: Vec<u8>) {
        self.lock().inbound.push_back(frame);
        self.arrived.notify_one();
    }

    /// Frames still waiting to be received.
    #[must_use]
    pub fn pending_inbound(&self) -> usize {
        self.lock().inbound.len()
    }

    /// Every frame sent so far.
    #[must_use]
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.lock().sent.clone()
    }

    /// Remove and return every frame sent so far.
    pub fn take_sent(&self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.lock().sent)
    }

    /// Make subsequent sends fail (or succeed again).
    pub fn set_fail_sends(&self, fail: bool) {
        self.lock().fail_sends = fail;
    }

    /// Close the transport; receives then report [`TransportError::Closed`].
    pub fn close(&self) {
        self.lock().closed = true;
        self.arrived.notify_one();
    }

    fn pop(&self) -> Result<Option<Vec<u8>>, TransportError> {
        let mut state = self.lock();
        if state.closed {
            return Err(TransportError::Closed);
        }
        Ok(state.inbound.pop_front())
    }
}

#[async_trait]
impl TransportPort for MockTransport {
    async fn send(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        check_frame_len(frame)?;
        let mut state = self.lock();
        if state.closed {
            return Err(TransportError::Closed);
        }
        if state.fail_sends {
            return Err(TransportError::SendFailed("injected failure".to_string()));
        }
        state.sent.push(frame.to_vec());
        Ok(())
    }

    async fn receive(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, TransportError> {
        if let Some(frame) = self.pop()? {
            return Ok(Some(frame));
        }
        tokio::select! {
            () = self.arrived.notified() => self.pop(),
            () = tokio::time::sleep(timeout) => Ok(None),
        }
    }

    fn local_mac(&self) -> MacAddress {
        self.mac
    }
}
