use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(default)]
pub struct Http {
    /// **Environment variable**: `MURMUR_HTTP_ADDRESS`
    pub address: IpAddr,
    /// **Environment variable**: `MURMUR_HTTP_PORT`
    pub port: u16,
    /// Amount of HTTP workers. Defaults to the number of
    /// physical CPU cores.
    ///
    /// **Environment variable**: `MURMUR_HTTP_WORKERS`
    #[validate(range(min = 1, max = 1024))]
    pub workers: Option<usize>,
}

impl Default for Http {
    fn default() -> Self {
        Self {
            address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
            workers: None,
        }
    }
}
