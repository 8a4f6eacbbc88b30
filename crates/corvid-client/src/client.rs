//! The client facade.
//!
//! Builds query messages from caller parameters and hands them to the
//! resolution engine. Synchronous entry points wrap the async engine with a
//! current-thread runtime.

use crate::error::{Error, Result};
use crate::exchange::{self, ExchangeConfig};
use corvid_proto::{Message, Name, Question, RecordClass, RecordType};
use std::net::SocketAddr;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Recognized per-query options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Ask the server to resolve recursively (the RD flag).
    pub recursion_desired: bool,

    /// Ask the server to skip DNSSEC validation (the CD flag).
    pub checking_disabled: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            recursion_desired: true,
            checking_disabled: false,
        }
    }
}

/// A DNS stub-resolver client.
///
/// Holds an ordered list of resolver endpoints, a total query timeout, and
/// the transport policy. The client keeps no mutable state across queries;
/// concurrent queries from one client are independent.
///
/// # Example
///
/// ```rust,no_run
/// use corvid_client::DnsClient;
/// use corvid_proto::{Name, RecordClass, RecordType};
/// use std::str::FromStr;
/// use std::time::Duration;
///
/// let client = DnsClient::new(
///     vec!["9.9.9.9:53".parse().unwrap()],
///     Duration::from_secs(5),
/// );
/// let response = client
///     .resolve(
///         Name::from_str("example.com").unwrap(),
///         RecordType::A,
///         RecordClass::IN,
///         Default::default(),
///     )
///     .unwrap();
/// for addr in response.a_records() {
///     println!("{addr}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DnsClient {
    config: ExchangeConfig,
}

impl DnsClient {
    /// Creates a client with the given resolver endpoints and total query
    /// timeout. Both transports start enabled.
    pub fn new(servers: Vec<SocketAddr>, timeout: Duration) -> Self {
        Self {
            config: ExchangeConfig::new(servers, timeout),
        }
    }

    /// Creates a client for a single resolver endpoint.
    pub fn single(server: SocketAddr, timeout: Duration) -> Self {
        Self::new(vec![server], timeout)
    }

    /// Returns true if UDP is enabled.
    #[inline]
    pub fn is_udp_enabled(&self) -> bool {
        self.config.udp_enabled
    }

    /// Enables or disables the UDP transport.
    pub fn set_udp_enabled(&mut self, enabled: bool) -> &mut Self {
        self.config.udp_enabled = enabled;
        self
    }

    /// Returns true if TCP is enabled.
    #[inline]
    pub fn is_tcp_enabled(&self) -> bool {
        self.config.tcp_enabled
    }

    /// Enables or disables the TCP transport.
    pub fn set_tcp_enabled(&mut self, enabled: bool) -> &mut Self {
        self.config.tcp_enabled = enabled;
        self
    }

    /// Sets the largest datagram the client will use over UDP.
    ///
    /// The default is the 512-byte RFC 1035 limit; raise it only when the
    /// server is known to accept more.
    pub fn set_udp_payload_cap(&mut self, cap: usize) -> &mut Self {
        self.config.udp_payload_cap = cap;
        self
    }

    /// Returns the configured resolver endpoints.
    pub fn servers(&self) -> &[SocketAddr] {
        &self.config.servers
    }

    /// Builds a query message for the given parameters.
    fn build_query(
        name: Name,
        rtype: RecordType,
        class: RecordClass,
        options: QueryOptions,
    ) -> Message {
        let mut query = Message::query(Question::new(name, rtype, class));
        query
            .header_mut()
            .set_recursion_desired(options.recursion_desired);
        query
            .header_mut()
            .set_checking_disabled(options.checking_disabled);
        query
    }

    /// Resolves a query, blocking until a response arrives or the timeout
    /// elapses.
    ///
    /// Must not be called from inside an async runtime; use
    /// [`resolve_async`](Self::resolve_async) there instead.
    pub fn resolve(
        &self,
        name: Name,
        rtype: RecordType,
        class: RecordClass,
        options: QueryOptions,
    ) -> Result<Message> {
        let query = Self::build_query(name, rtype, class, options);
        self.send_message(&query)
    }

    /// Resolves a query asynchronously.
    ///
    /// Returns [`Error::Cancelled`] as soon as `cancel` fires, releasing any
    /// in-flight socket.
    pub async fn resolve_async(
        &self,
        name: Name,
        rtype: RecordType,
        class: RecordClass,
        options: QueryOptions,
        cancel: &CancellationToken,
    ) -> Result<Message> {
        let query = Self::build_query(name, rtype, class, options);
        self.send_message_async(&query, cancel).await
    }

    /// Sends a prebuilt query message, blocking until the response arrives.
    ///
    /// Must not be called from inside an async runtime; use
    /// [`send_message_async`](Self::send_message_async) there instead.
    pub fn send_message(&self, query: &Message) -> Result<Message> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.send_message_async(query, &CancellationToken::new()))
    }

    /// Sends a prebuilt query message asynchronously.
    pub async fn send_message_async(
        &self,
        query: &Message,
        cancel: &CancellationToken,
    ) -> Result<Message> {
        if query.questions().is_empty() {
            return Err(Error::InvalidArgument(
                "message carries no question".into(),
            ));
        }
        if !query.is_query() {
            return Err(Error::InvalidArgument(
                "message is a response, not a query".into(),
            ));
        }

        exchange::exchange(&self.config, query, cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn client() -> DnsClient {
        DnsClient::single("127.0.0.1:53".parse().unwrap(), Duration::from_millis(100))
    }

    #[test]
    fn test_default_options() {
        let options = QueryOptions::default();
        assert!(options.recursion_desired);
        assert!(!options.checking_disabled);
    }

    #[test]
    fn test_transport_flags() {
        let mut client = client();
        assert!(client.is_udp_enabled());
        assert!(client.is_tcp_enabled());

        client.set_udp_enabled(false).set_tcp_enabled(false);
        assert!(!client.is_udp_enabled());
        assert!(!client.is_tcp_enabled());
    }

    #[test]
    fn test_server_list_and_payload_cap() {
        let servers: Vec<std::net::SocketAddr> =
            vec!["127.0.0.1:53".parse().unwrap(), "127.0.0.2:53".parse().unwrap()];
        let mut client = DnsClient::new(servers.clone(), Duration::from_secs(1));

        assert_eq!(client.servers(), servers.as_slice());

        client.set_udp_payload_cap(1232);
        // The cap only matters once a query is in flight; here it must just
        // stick on the configuration
        assert_eq!(client.config.udp_payload_cap, 1232);
    }

    #[test]
    fn test_build_query_flags() {
        let name = Name::from_str("example.com").unwrap();

        let query = DnsClient::build_query(
            name.clone(),
            RecordType::A,
            RecordClass::IN,
            QueryOptions::default(),
        );
        assert!(query.is_query());
        assert!(query.header().recursion_desired());
        assert!(!query.header().checking_disabled());
        assert_eq!(query.questions().len(), 1);

        let query = DnsClient::build_query(
            name,
            RecordType::A,
            RecordClass::IN,
            QueryOptions {
                recursion_desired: false,
                checking_disabled: true,
            },
        );
        assert!(!query.header().recursion_desired());
        assert!(query.header().checking_disabled());
    }

    #[tokio::test]
    async fn test_empty_question_rejected() {
        let empty = Message::default();
        let result = client()
            .send_message_async(&empty, &CancellationToken::new())
            .await;
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_response_message_rejected() {
        let mut msg = Message::query(Question::a(Name::from_str("example.com").unwrap()));
        msg.header_mut().set_response(true);

        let result = client()
            .send_message_async(&msg, &CancellationToken::new())
            .await;
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }
}
