//! Broker reachability probe.
//!
//! Opens and immediately closes a TCP connection to the configured broker.
//! No TLS or MQTT traffic is exchanged; a successful probe only proves the
//! host resolves and the port accepts connections.

use core::net::Ipv4Addr;

use embassy_net::{
    dns::{DnsQueryType, Error as DNSError},
    tcp::{ConnectError, TcpSocket},
    IpAddress, Stack,
};
use embassy_time::{Duration, Instant};

use crate::config::Config;
use crate::constants::{RX_BUFFER_SIZE, SOCKET_TIMEOUT_SECS, TX_BUFFER_SIZE};

#[derive(Debug)]
pub enum Error {
    #[allow(dead_code)]
    DNSQueryFailed(DNSError),
    DNSLookupFailed,
    #[allow(dead_code)]
    SocketConnectionError(ConnectError),
}

pub struct BrokerProbe {
    stack: Stack<'static>,
    rx_buffer: [u8; RX_BUFFER_SIZE],
    tx_buffer: [u8; TX_BUFFER_SIZE],
}

impl BrokerProbe {
    pub fn new(stack: Stack<'static>) -> Self {
        Self {
            stack,
            rx_buffer: [0; RX_BUFFER_SIZE],
            tx_buffer: [0; TX_BUFFER_SIZE],
        }
    }

    async fn resolve(&self, hostname: &str) -> Result<IpAddress, Error> {
        if let Ok(addr) = hostname.parse::<Ipv4Addr>() {
            return Ok(IpAddress::Ipv4(addr));
        }

        self.stack
            .dns_query(hostname, DnsQueryType::A)
            .await
            .map_err(Error::DNSQueryFailed)?
            .first()
            .copied()
            .ok_or(Error::DNSLookupFailed)
    }

    /// Returns the time taken to establish the connection.
    pub async fn check(&mut self, config: &Config) -> Result<Duration, Error> {
        let addr = self.resolve(config.server_host).await?;

        let mut socket = TcpSocket::new(self.stack, &mut self.rx_buffer, &mut self.tx_buffer);
        socket.set_timeout(Some(Duration::from_secs(SOCKET_TIMEOUT_SECS)));

        log::debug!(
            "Probing broker {} ({}) on port {}",
            config.server_host,
            addr,
            config.server_port
        );
        let started = Instant::now();
        let result = socket
            .connect((addr, config.server_port))
            .await
            .map_err(Error::SocketConnectionError);
        let elapsed = started.elapsed();

        if result.is_ok() {
            // wait for our FIN to leave before the buffers are reused
            socket.close();
            if let Err(e) = socket.flush().await {
                log::debug!("Broker close error: {:?}", e);
            }
        }

        result.map(|_| elapsed)
    }
}
