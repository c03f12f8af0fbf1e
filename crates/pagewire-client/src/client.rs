use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use pagewire_frame::{MessageKind, Request, Response, ACK, SEQ_SPACE};
use pagewire_transport::{TransportError, UdpTransport};
use tracing::debug;

use crate::error::{ClientError, Result};
use crate::waiters::WaiterTable;

/// What the reader hands the dispatch loop. The reader is the sole producer,
/// so queue order is arrival order and a terminal event is always last.
enum Event {
    /// One raw datagram from the configured peer.
    Datagram(Bytes),
    /// End of stream (`None`) or the receive error that ended it.
    Closed(Option<TransportError>),
}

/// Client for one paging terminal.
///
/// Associates requests with responses by sequence number and hands out
/// sequence numbers from a bounded pool. The client is inert until
/// [`Client::run`] is executing; see the crate docs for the lifecycle.
pub struct Client {
    transport: UdpTransport,
    waiters: WaiterTable,
    seq: AtomicU64,
}

impl Client {
    /// Resolve `addr` and connect the underlying transport.
    ///
    /// The returned client cannot complete requests until [`Client::run`]
    /// is started.
    pub fn connect(addr: &str) -> Result<Self> {
        let transport = UdpTransport::connect(addr)?;
        Ok(Self {
            transport,
            waiters: WaiterTable::new(usize::from(SEQ_SPACE)),
            seq: AtomicU64::new(seq_seed()),
        })
    }

    /// The client's main loop. Must be running for the client to operate;
    /// usually spawned on its own thread:
    ///
    /// ```ignore
    /// let dispatch = thread::spawn({
    ///     let client = Arc::clone(&client);
    ///     move || client.run()
    /// });
    /// ```
    ///
    /// Returns `Ok(())` after a clean shutdown via [`Client::close`], or the
    /// transport/decode error that terminated the loop. Either way the
    /// client is finished: requests issued afterwards are never resolved.
    pub fn run(&self) -> Result<()> {
        let (events_tx, events) = mpsc::channel();
        let reader = self.transport.try_clone()?;
        let peer = self.transport.peer_addr();
        let reader_thread = thread::spawn(move || read_loop(reader, peer, events_tx));

        let result = self.dispatch(events);

        // The reader only exits at end of stream; force one if the loop
        // died on a decode error.
        if self.transport.shutdown().is_ok() {
            let _ = reader_thread.join();
        }
        result
    }

    /// Route events until a terminal signal or a decode failure.
    ///
    /// This is the only place that decodes frames and the only consumer of
    /// the correlation table's `take` side.
    fn dispatch(&self, events: Receiver<Event>) -> Result<()> {
        loop {
            match events.recv() {
                Ok(Event::Datagram(datagram)) => {
                    let response = Response::decode(&datagram)?;
                    let seq = response.seq();
                    match self.waiters.take(seq) {
                        Some(waiter) => {
                            let _ = waiter.send(Some(response));
                        }
                        None => debug!(seq, "reply without pending request; dropping"),
                    }
                }
                Ok(Event::Closed(error)) => {
                    for waiter in self.waiters.drain_all() {
                        let _ = waiter.send(None);
                    }
                    return match error {
                        Some(err) => Err(err.into()),
                        None => Ok(()),
                    };
                }
                // The reader hung up without a terminal event; treat as a
                // clean close so nobody stays blocked.
                Err(_) => {
                    for waiter in self.waiters.drain_all() {
                        let _ = waiter.send(None);
                    }
                    return Ok(());
                }
            }
        }
    }

    /// Check the status of a pager using the `v` command.
    ///
    /// The returned byte is one of:
    ///
    /// - `N`: no such pager
    /// - `I`: in service
    /// - `O`: out of service
    pub fn verify(&self, pager: &str) -> Result<u8> {
        let response = self.request(Request::Verify {
            pager: pager.to_string(),
        })?;
        match response {
            Response::Verify { status, .. } => Ok(status),
            other => Err(ClientError::unexpected(MessageKind::Verify, other.kind())),
        }
    }

    /// Send a message to a pager using the `m` command.
    ///
    /// `true` means the remote queued the message for delivery, not that it
    /// reached the pager; it only made it onto the queue.
    pub fn send_message(&self, pager: &str, message: &str) -> Result<bool> {
        let response = self.request(Request::SendMessage {
            pager: pager.to_string(),
            message: message.to_string(),
        })?;
        match response {
            Response::SendMessage { status, .. } => Ok(status == ACK),
            other => Err(ClientError::unexpected(
                MessageKind::SendMessage,
                other.kind(),
            )),
        }
    }

    /// Page a destination directly using the `d` command.
    ///
    /// Returns the remote's raw status byte.
    pub fn page_direct(&self, dest: &str, pager: &str, message: &str) -> Result<u8> {
        let response = self.request(Request::PageDirect {
            dest: dest.to_string(),
            pager: pager.to_string(),
            message: message.to_string(),
        })?;
        match response {
            Response::PageDirect { status, .. } => Ok(status),
            other => Err(ClientError::unexpected(
                MessageKind::PageDirect,
                other.kind(),
            )),
        }
    }

    /// Shut down the transport, driving [`Client::run`] to its clean exit.
    ///
    /// Every caller still blocked on a reply is resolved with a
    /// "no response" error.
    pub fn close(&self) -> Result<()> {
        self.transport.shutdown().map_err(Into::into)
    }

    /// The local socket address (diagnostics).
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.transport.local_addr().map_err(Into::into)
    }

    /// Allocate a sequence number, encode, register, transmit, and block
    /// until the dispatch loop resolves the waiter.
    fn request(&self, request: Request) -> Result<Response> {
        let seq = self.next_seq();
        let frame = request.encode(seq)?;

        let (waiter, slot) = mpsc::sync_channel(1);
        // Register before transmitting so a reply can never beat its waiter.
        self.waiters.register(seq, waiter);
        self.transport.send(&frame)?;

        match slot.recv() {
            Ok(Some(response)) => Ok(response),
            Ok(None) | Err(_) => Err(ClientError::NoResponse),
        }
    }

    /// Increment-and-wrap sequence allocation, shared by all callers.
    fn next_seq(&self) -> u8 {
        (self.seq.fetch_add(1, Ordering::Relaxed) % u64::from(SEQ_SPACE)) as u8
    }
}

/// Pull datagrams off the transport and forward qualifying ones to the
/// dispatch loop. Never decodes; runs until end of stream or a receive
/// error, either of which it forwards as the terminal event.
fn read_loop(transport: UdpTransport, peer: SocketAddr, events: Sender<Event>) {
    let mut buf = [0u8; UdpTransport::RECV_BUFFER_SIZE];
    loop {
        match transport.recv_from(&mut buf) {
            Ok(Some((len, from))) => {
                if from != peer {
                    debug!(%from, "dropping datagram from unexpected sender");
                    continue;
                }
                if events
                    .send(Event::Datagram(Bytes::copy_from_slice(&buf[..len])))
                    .is_err()
                {
                    // Dispatch loop is gone; nothing left to feed.
                    return;
                }
            }
            Ok(None) => {
                let _ = events.send(Event::Closed(None));
                return;
            }
            Err(err) => {
                let _ = events.send(Event::Closed(Some(err)));
                return;
            }
        }
    }
}

/// Starting point for the sequence counter: randomized so a restarted
/// process does not collide with replies still in flight for its
/// predecessor. The counter only needs to be unpredictable, not secure.
fn seq_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    nanos ^ u64::from(std::process::id())
}
