//! The resolution engine.
//!
//! Walks the configured servers strictly in order, giving each attempt a
//! fair slice of the remaining time budget. For each server, UDP goes first
//! when the query fits the payload cap; a truncated UDP answer upgrades to
//! TCP against the same server, and TCP frames are read until the combined
//! response stops expecting continuations. Per-attempt failures demote to
//! the next server with the last cause retained; cancellation and caller
//! errors propagate immediately.

use crate::error::{Error, Result};
use crate::transport::{self, TcpExchange};
use corvid_proto::{Message, MAX_UDP_MESSAGE_SIZE};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Engine configuration: the server list and transport policy.
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    /// Resolver endpoints, tried strictly in order.
    pub servers: Vec<SocketAddr>,

    /// Total time budget for the whole query.
    pub timeout: Duration,

    /// Whether UDP may be used.
    pub udp_enabled: bool,

    /// Whether TCP may be used.
    pub tcp_enabled: bool,

    /// Largest datagram the client is willing to send or receive over UDP.
    pub udp_payload_cap: usize,
}

impl ExchangeConfig {
    /// Creates a configuration with both transports enabled and the
    /// RFC 1035 payload cap.
    pub fn new(servers: Vec<SocketAddr>, timeout: Duration) -> Self {
        Self {
            servers,
            timeout,
            udp_enabled: true,
            tcp_enabled: true,
            udp_payload_cap: MAX_UDP_MESSAGE_SIZE,
        }
    }
}

/// Sends `query` to the configured servers and returns the first usable
/// response.
pub(crate) async fn exchange(
    config: &ExchangeConfig,
    query: &Message,
    cancel: &CancellationToken,
) -> Result<Message> {
    if config.servers.is_empty() {
        return Err(Error::InvalidArgument("server list is empty".into()));
    }
    if !config.udp_enabled && !config.tcp_enabled {
        return Err(Error::InvalidArgument(
            "both transports are disabled".into(),
        ));
    }

    // Swapping the transaction ID never changes the encoded size, so the
    // UDP fit check holds for every attempt.
    let fits_udp = query.to_wire()?.len() <= config.udp_payload_cap;
    if config.udp_enabled && !config.tcp_enabled && !fits_udp {
        return Err(Error::Truncated);
    }

    let overall_deadline = Instant::now() + config.timeout;
    let total = config.servers.len() as u32;
    let mut query = query.clone();
    let mut last_error: Option<Error> = None;

    for (index, &server) in config.servers.iter().enumerate() {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let now = Instant::now();
        if now >= overall_deadline {
            return Err(Error::Timeout);
        }

        // Fair share of the remaining budget across the servers not yet
        // tried; the last server gets whatever is left.
        let servers_left = total - index as u32;
        let attempt_deadline = now + (overall_deadline - now) / servers_left;

        // A fresh unpredictable ID per attempt keeps stale datagrams from a
        // previous server out of this one's match window.
        query.set_id(rand::random());
        let wire = query.to_wire()?;

        if config.udp_enabled && fits_udp {
            match transport::udp_exchange(
                server,
                &query,
                &wire,
                config.udp_payload_cap,
                attempt_deadline,
                cancel,
            )
            .await
            {
                Ok(response) if response.is_truncated() && config.tcp_enabled => {
                    // Discard the partial contents and re-ask over TCP
                    debug!(server = %server, "UDP response truncated, upgrading to TCP");
                }
                Ok(response) => {
                    if response.is_truncated() {
                        debug!(server = %server, "TCP disabled, returning truncated response");
                    } else {
                        trace!(server = %server, rcode = %response.rcode(), "UDP response");
                    }
                    return Ok(response);
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    debug!(server = %server, error = %e, "UDP attempt failed");
                    last_error = Some(e);
                }
            }
        }

        if config.tcp_enabled {
            match tcp_query(server, &query, &wire, attempt_deadline, cancel).await {
                Ok(response) => {
                    trace!(server = %server, rcode = %response.rcode(), "TCP response");
                    return Ok(response);
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    debug!(server = %server, error = %e, "TCP attempt failed");
                    last_error = Some(e);
                }
            }
        }
    }

    Err(Error::NoResponse {
        source: last_error.map(Box::new),
    })
}

/// Runs one query over a single TCP connection, folding continuation frames
/// into the first response until the stream is complete.
async fn tcp_query(
    server: SocketAddr,
    query: &Message,
    wire: &[u8],
    deadline: Instant,
    cancel: &CancellationToken,
) -> Result<Message> {
    let mut tcp = TcpExchange::connect(server, deadline, cancel).await?;
    tcp.send(wire, deadline, cancel).await?;

    let mut combined = tcp
        .read_message(query, deadline, cancel)
        .await?
        .ok_or_else(|| {
            Error::Transport(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "server closed the stream before answering",
            ))
        })?;

    while combined.next_message_pending() {
        match tcp.read_message(query, deadline, cancel).await? {
            Some(next) => combined.absorb(next),
            // The server ended the stream; deliver what arrived
            None => break,
        }
    }

    Ok(combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use corvid_proto::{Name, Question};
    use std::str::FromStr;

    fn config(servers: Vec<SocketAddr>) -> ExchangeConfig {
        ExchangeConfig::new(servers, Duration::from_millis(250))
    }

    fn query() -> Message {
        Message::query(Question::a(Name::from_str("example.com").unwrap()))
    }

    #[tokio::test]
    async fn test_empty_server_list_rejected() {
        let result = exchange(&config(Vec::new()), &query(), &CancellationToken::new()).await;
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_all_transports_disabled_rejected() {
        let mut config = config(vec!["127.0.0.1:53".parse().unwrap()]);
        config.udp_enabled = false;
        config.tcp_enabled = false;

        let result = exchange(&config, &query(), &CancellationToken::new()).await;
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_oversized_query_without_tcp_rejected() {
        let mut config = config(vec!["127.0.0.1:53".parse().unwrap()]);
        config.tcp_enabled = false;
        config.udp_payload_cap = 16;

        let result = exchange(&config, &query(), &CancellationToken::new()).await;
        assert!(matches!(result, Err(Error::Truncated)));
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_short_circuits() {
        let token = CancellationToken::new();
        token.cancel();

        let result = exchange(
            &config(vec!["127.0.0.1:53".parse().unwrap()]),
            &query(),
            &token,
        )
        .await;
        assert!(matches!(result, Err(Error::Cancelled)));
    }
}
