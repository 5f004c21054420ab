//! Linux `AF_PACKET` transport.

use std::io::{self, Read, Write};
use std::mem;
use std::os::fd::AsRawFd;
use std::time::Duration;

use async_trait::async_trait;
use nix::libc;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::io::unix::AsyncFd;

use super::transport::{MAX_FRAME_SIZE, TransportError, TransportPort, check_frame_len};
use crate::protocol::codec::{AVDECC_MULTICAST_MAC, ETHERTYPE_AVTP};
use crate::types::MacAddress;
use crate::types::mac::interface_mac;

/// Raw socket bound to one interface for EtherType `0x22F0`.
///
/// Needs `CAP_NET_RAW`.
pub struct RawSocketTransport {
    socket: AsyncFd<Socket>,
    interface: String,
    mac: MacAddress,
}

impl std::fmt::Debug for RawSocketTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawSocketTransport")
            .field("interface", &self.interface)
            .field("mac", &self.mac)
            .finish_non_exhaustive()
    }
}

impl RawSocketTransport {
    /// Open the socket, bind it to `interface` and join the AVDECC
    /// multicast group.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the interface does not exist or the
    /// socket cannot be created, bound, or registered with the reactor.
    pub fn open(interface: &str) -> Result<Self, TransportError> {
        let interface_error = |message: String| TransportError::Interface {
            interface: interface.to_string(),
            message,
        };

        let ifindex = nix::net::if_::if_nametoindex(interface)
            .map_err(|e| interface_error(format!("no such interface: {e}")))?;
        let ifindex = i32::try_from(ifindex)
            .map_err(|_| interface_error(format!("interface index {ifindex} out of range")))?;
        let mac = interface_mac(interface)
            .map_err(|e| interface_error(format!("cannot read MAC address: {e}")))?;

        let protocol = i32::from(ETHERTYPE_AVTP.to_be());
        let socket = Socket::new(Domain::PACKET, Type::RAW, Some(Protocol::from(protocol)))?;
        socket.set_nonblocking(true)?;
        bind_to_interface(&socket, ifindex)?;
        join_multicast(&socket, ifindex, AVDECC_MULTICAST_MAC)?;

        tracing::info!("Raw socket bound to {} ({})", interface, mac);
        Ok(Self {
            socket: AsyncFd::new(socket)?,
            interface: interface.to_string(),
            mac,
        })
    }

    /// Name of the bound interface.
    #[must_use]
    pub fn interface(&self) -> &str {
        &self.interface
    }

    async fn recv_frame(&self) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; MAX_FRAME_SIZE];
        loop {
            let mut guard = self.socket.readable().await?;
            match guard.try_io(|inner| (&*inner.get_ref()).read(&mut buf)) {
                Ok(result) => {
                    let len = result?;
                    buf.truncate(len);
                    return Ok(buf);
                }
                Err(_would_block) => {}
            }
        }
    }
}

#[async_trait]
impl TransportPort for RawSocketTransport {
    async fn send(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        check_frame_len(frame)?;
        loop {
            let mut guard = self.socket.writable().await?;
            match guard.try_io(|inner| (&*inner.get_ref()).write(frame)) {
                Ok(result) => {
                    let written = result?;
                    if written != frame.len() {
                        return Err(TransportError::Io(io::Error::new(
                            io::ErrorKind::WriteZero,
                            format!("short write: {written} of {} bytes", frame.len()),
                        )));
                    }
                    return Ok(());
                }
                Err(_would_block) => {}
            }
        }
    }

    async fn receive(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, TransportError> {
        match tokio::time::timeout(timeout, self.recv_frame()).await {
            Ok(frame) => Ok(Some(frame?)),
            Err(_elapsed) => Ok(None),
        }
    }

    fn local_mac(&self) -> MacAddress {
        self.mac
    }
}

#[allow(clippy::cast_possible_truncation)]
fn bind_to_interface(socket: &Socket, ifindex: i32) -> io::Result<()> {
    // SAFETY: sockaddr_ll is plain old data; all-zero is a valid value.
    let mut addr: libc::sockaddr_ll = unsafe { mem::zeroed() };
    addr.sll_family = libc::AF_PACKET as u16;
    addr.sll_protocol = ETHERTYPE_AVTP.to_be();
    addr.sll_ifindex = ifindex;

    // SAFETY: `addr` is a valid sockaddr_ll and the length matches it.
    let rc = unsafe {
        libc::bind(
            socket.as_raw_fd(),
            std::ptr::from_ref(&addr).cast::<libc::sockaddr>(),
            mem::size_of::<libc::sockaddr_ll>() as libc::socklen_t,
        )
    };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[allow(clippy::cast_possible_truncation)]
fn join_multicast(socket: &Socket, ifindex: i32, group: MacAddress) -> io::Result<()> {
    // SAFETY: packet_mreq is plain old data; all-zero is a valid value.
    let mut mreq: libc::packet_mreq = unsafe { mem::zeroed() };
    mreq.mr_ifindex = ifindex;
    mreq.mr_type = libc::PACKET_MR_MULTICAST as u16;
    mreq.mr_alen = 6;
    mreq.mr_address[..6].copy_from_slice(group.as_bytes());

    // SAFETY: `mreq` outlives the call and the length matches its type.
    let rc = unsafe {
        libc::setsockopt(
            socket.as_raw_fd(),
            libc::SOL_PACKET,
            libc::PACKET_ADD_MEMBERSHIP,
            std::ptr::from_ref(&mreq).cast::<libc::c_void>(),
            mem::size_of::<libc::packet_mreq>() as libc::socklen_t,
        )
    };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}
