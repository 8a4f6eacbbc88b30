//! UDP and TCP transports.
//!
//! One attempt owns its socket exclusively and releases it on every exit
//! path. Every blocking operation races the attempt deadline and the
//! caller's cancellation signal; the engine decides what to do with
//! truncation and continuation, the transports only move bytes.

use crate::error::{Error, Result};
use corvid_proto::Message;
use std::future::Future;
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};
use tokio::time::{timeout_at, Instant};
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Largest TCP frame a server can announce (16-bit length prefix).
const MAX_TCP_FRAME: usize = u16::MAX as usize;

/// Runs one socket operation, racing it against the deadline and the
/// cancellation signal.
async fn io<T, F>(deadline: Instant, cancel: &CancellationToken, operation: F) -> Result<T>
where
    F: Future<Output = std::io::Result<T>>,
{
    tokio::select! {
        () = cancel.cancelled() => Err(Error::Cancelled),
        outcome = timeout_at(deadline, operation) => match outcome {
            Ok(inner) => inner.map_err(Error::from),
            Err(_) => Err(Error::Timeout),
        },
    }
}

/// Sends `wire` to `server` over a fresh ephemeral UDP socket and waits for
/// a datagram that answers `query`.
///
/// Datagrams whose transaction ID or first question do not match the query
/// are stale or spoofed; they are dropped and the wait continues until the
/// deadline. The response is returned as parsed, TC flag included.
pub(crate) async fn udp_exchange(
    server: SocketAddr,
    query: &Message,
    wire: &[u8],
    payload_cap: usize,
    deadline: Instant,
    cancel: &CancellationToken,
) -> Result<Message> {
    let bind_addr: SocketAddr = if server.is_ipv4() {
        (std::net::Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
    };

    let socket = UdpSocket::bind(bind_addr).await?;
    socket.connect(server).await?;

    io(deadline, cancel, socket.send(wire)).await?;

    let mut buf = vec![0u8; payload_cap];
    loop {
        let len = io(deadline, cancel, socket.recv(&mut buf)).await?;
        let response = Message::parse(&buf[..len])?;

        if !response_matches(query, &response) {
            trace!(server = %server, id = response.id(), "dropping non-matching datagram");
            continue;
        }

        return Ok(response);
    }
}

/// Returns true if `response` answers `query`: same transaction ID and, when
/// the response carries a question, the same first question.
fn response_matches(query: &Message, response: &Message) -> bool {
    if response.id() != query.id() || !response.is_response() {
        return false;
    }
    match (query.question(), response.question()) {
        (Some(asked), Some(echoed)) => asked.matches(echoed),
        // Continuation frames may omit the question section
        (_, None) => true,
        (None, Some(_)) => false,
    }
}

/// One TCP connection to a server, carrying length-prefixed DNS frames.
///
/// A single logical query may consume several frames (zone transfers); the
/// same connection serves the whole continuation stream. The connection
/// closes when the value drops.
pub(crate) struct TcpExchange {
    stream: TcpStream,
    server: SocketAddr,
}

impl TcpExchange {
    /// Connects to the server within the deadline.
    pub(crate) async fn connect(
        server: SocketAddr,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> Result<Self> {
        let stream = io(deadline, cancel, TcpStream::connect(server)).await?;
        Ok(Self { stream, server })
    }

    /// Sends one message, prefixed with its 16-bit big-endian length.
    pub(crate) async fn send(
        &mut self,
        wire: &[u8],
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> Result<()> {
        if wire.len() > MAX_TCP_FRAME {
            return Err(Error::InvalidArgument(format!(
                "message of {} bytes exceeds the TCP frame limit",
                wire.len()
            )));
        }

        let len = (wire.len() as u16).to_be_bytes();
        io(deadline, cancel, self.stream.write_all(&len)).await?;
        io(deadline, cancel, self.stream.write_all(wire)).await?;
        Ok(())
    }

    /// Reads the next framed message that answers `query`.
    ///
    /// Returns `Ok(None)` if the server closed the stream at a frame
    /// boundary; EOF inside a frame is a transport error.
    pub(crate) async fn read_message(
        &mut self,
        query: &Message,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> Result<Option<Message>> {
        let mut len_buf = [0u8; 2];
        match io(deadline, cancel, self.stream.read_exact(&mut len_buf)).await {
            Ok(_) => {}
            Err(Error::Transport(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                trace!(server = %self.server, "stream closed at frame boundary");
                return Ok(None);
            }
            Err(e) => return Err(e),
        }

        let frame_len = usize::from(u16::from_be_bytes(len_buf));
        let mut frame = vec![0u8; frame_len];
        io(deadline, cancel, self.stream.read_exact(&mut frame)).await?;

        let response = Message::parse(&frame)?;
        if !response_matches(query, &response) {
            return Err(Error::Format(corvid_proto::Error::invalid_data(
                0,
                "TCP frame does not answer the query",
            )));
        }

        Ok(Some(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corvid_proto::{Name, Question};
    use std::str::FromStr;

    fn query() -> Message {
        let mut msg = Message::query(Question::a(Name::from_str("example.com").unwrap()));
        msg.set_id(0x2222);
        msg
    }

    fn response_to(query: &Message) -> Message {
        let mut response = query.clone();
        response.header_mut().set_response(true);
        response
    }

    #[test]
    fn test_response_matches() {
        let query = query();
        let response = response_to(&query);
        assert!(response_matches(&query, &response));
    }

    #[test]
    fn test_id_mismatch_rejected() {
        let query = query();
        let mut response = response_to(&query);
        response.set_id(0x3333);
        assert!(!response_matches(&query, &response));
    }

    #[test]
    fn test_question_mismatch_rejected() {
        let query = query();
        let mut other = Message::query(Question::a(Name::from_str("other.com").unwrap()));
        other.set_id(query.id());
        other.header_mut().set_response(true);
        assert!(!response_matches(&query, &other));
    }

    #[test]
    fn test_query_flag_required() {
        let query = query();
        // A reflected query (QR=0) must not be accepted as an answer
        assert!(!response_matches(&query, &query.clone()));
    }

    #[test]
    fn test_question_free_continuation_accepted() {
        let query = query();
        let mut continuation = Message::default();
        continuation.set_id(query.id());
        continuation.header_mut().set_response(true);
        assert!(response_matches(&query, &continuation));
    }
}
