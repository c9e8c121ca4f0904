//! TCP Transport
//!
//! Line-delimited exchanges over a single TCP connection.

use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use crate::error::{IdsError, Result};
use super::{EomReason, Exchange, Transport, LINE_TERMINATOR};

/// Transport over one TCP connection, opened once
pub struct TcpTransport {
    /// TCP stream reader (buffered for line reads)
    reader: BufReader<TcpStream>,

    /// TCP stream writer
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: String,
}

impl TcpTransport {
    /// Connect to `endpoint` (host:port)
    pub fn connect(endpoint: &str, timeout: Duration) -> Result<Self> {
        let addr = endpoint
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| IdsError::Transport(format!("{} did not resolve", endpoint)))?;

        let stream = TcpStream::connect_timeout(&addr, timeout)
            .map_err(|e| IdsError::Transport(format!("connect to {} failed: {}", endpoint, e)))?;

        Self::from_stream(stream)
    }

    /// Wrap an already-connected stream
    pub fn from_stream(stream: TcpStream) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Replies are small and latency-bound
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        tracing::debug!("Connected to {}", peer_addr);

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            peer_addr,
        })
    }

    /// Drop anything left over from an earlier exchange (e.g. a reply that
    /// arrived after its read timed out, or the tail of a truncated reply) so
    /// it is not taken as the next reply.
    fn discard_stale_input(&mut self, deadline: Instant) -> Result<()> {
        let buffered = self.reader.buffer().len();
        if buffered > 0 {
            tracing::debug!("Discarding {} stale bytes from {}", buffered, self.peer_addr);
            self.reader.consume(buffered);
        }

        let stream = self.reader.get_ref();
        stream.set_nonblocking(true)?;
        let mut scratch = [0u8; 256];
        let drained = loop {
            if Instant::now() >= deadline {
                break Err(timed_out("drain", &self.peer_addr));
            }
            match (&*stream).read(&mut scratch) {
                Ok(0) => break Ok(()),
                Ok(n) => tracing::debug!("Discarding {} stale bytes from {}", n, self.peer_addr),
                Err(e) if e.kind() == ErrorKind::WouldBlock => break Ok(()),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => break Err(IdsError::Io(e)),
            }
        };
        stream.set_nonblocking(false)?;
        drained
    }

    /// Time left until `deadline`, or a timeout error once it has passed
    fn remaining(&self, what: &str, deadline: Instant) -> Result<Duration> {
        let left = deadline.saturating_duration_since(Instant::now());
        if left.is_zero() {
            return Err(timed_out(what, &self.peer_addr));
        }
        Ok(left)
    }
}

impl Transport for TcpTransport {
    /// One exchange, bounded as a whole by `timeout`
    ///
    /// The reply is read straight into `reply` and reading stops once it is
    /// full (`EomReason::BufferFull`); the rest of that line is discarded at
    /// the start of the next exchange.
    fn write_read(&mut self, request: &[u8], reply: &mut [u8], timeout: Duration)
        -> Result<Exchange> {
        let deadline = Instant::now() + timeout;

        self.discard_stale_input(deadline)?;

        // Write
        let left = self.remaining("write to", deadline)?;
        self.writer.get_ref().set_write_timeout(Some(left))?;
        self.writer
            .write_all(request)
            .and_then(|_| self.writer.write_all(&[LINE_TERMINATOR]))
            .and_then(|_| self.writer.flush())
            .map_err(|e| transport_error("write to", &self.peer_addr, e))?;

        // Read one line, re-arming the read timeout with what is left
        let mut bytes_read = 0;
        loop {
            let left = self.remaining("read from", deadline)?;
            self.reader.get_ref().set_read_timeout(Some(left))?;

            let available = match self.reader.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(transport_error("read from", &self.peer_addr, e)),
            };

            if available.is_empty() {
                let when = if bytes_read == 0 { "" } else { " mid-reply" };
                return Err(IdsError::Transport(format!(
                    "{} closed the connection{}",
                    self.peer_addr, when
                )));
            }

            // Buffer full: only a terminator right here still ends the line
            if bytes_read == reply.len() {
                if available[0] == LINE_TERMINATOR {
                    self.reader.consume(1);
                    return Ok(finish(request, reply, bytes_read, EomReason::Terminator));
                }
                return Ok(finish(request, reply, bytes_read, EomReason::BufferFull));
            }

            let (line_part, terminated) =
                match available.iter().position(|&b| b == LINE_TERMINATOR) {
                    Some(end) => (end, true),
                    None => (available.len(), false),
                };
            let take = line_part.min(reply.len() - bytes_read);
            reply[bytes_read..bytes_read + take].copy_from_slice(&available[..take]);
            bytes_read += take;

            if terminated && take == line_part {
                self.reader.consume(take + 1);
                return Ok(finish(request, reply, bytes_read, EomReason::Terminator));
            }
            self.reader.consume(take);
        }
    }

    fn peer(&self) -> &str {
        &self.peer_addr
    }
}

/// Build the exchange result, dropping a `\r` before the terminator
fn finish(request: &[u8], reply: &[u8], mut bytes_read: usize, eom: EomReason) -> Exchange {
    if eom == EomReason::Terminator && reply[..bytes_read].last() == Some(&b'\r') {
        bytes_read -= 1;
    }
    Exchange {
        bytes_written: request.len(),
        bytes_read,
        eom,
    }
}

fn timed_out(what: &str, peer: &str) -> IdsError {
    IdsError::Transport(format!("{} {} timed out", what, peer))
}

fn transport_error(what: &str, peer: &str, e: std::io::Error) -> IdsError {
    match e.kind() {
        // Unix reports a read timeout as WouldBlock, Windows as TimedOut
        ErrorKind::WouldBlock | ErrorKind::TimedOut => timed_out(what, peer),
        _ => IdsError::Transport(format!("{} {} failed: {}", what, peer, e)),
    }
}
