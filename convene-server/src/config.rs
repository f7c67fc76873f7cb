use convene_core::IceServerConfig;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DEFAULT_PORT: u16 = 3001;

pub const DEFAULT_STUN_SERVERS: [&str; 3] = [
    "stun:stun.l.google.com:19302",
    "stun:stun1.l.google.com:19302",
    "stun:stun2.l.google.com:19302",
];

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Handed to clients on connect. Credentials are only sent over the
    /// signaling socket, never through the public config endpoint.
    pub ice_servers: Vec<IceServerConfig>,
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn default_ice_servers() -> Vec<IceServerConfig> {
        DEFAULT_STUN_SERVERS
            .iter()
            .map(|url| IceServerConfig::stun(*url))
            .collect()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            ice_servers: Self::default_ice_servers(),
        }
    }
}
