/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::net::{IpAddr, Ipv6Addr};
use std::str::FromStr;

use thiserror::Error;

pub const FTP_DEFAULT_PORT: u16 = 21;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FtpServerAddrParseError {
    #[error("empty string")]
    EmptyString,
    #[error("invalid ipv6 ip in squared brackets")]
    InvalidBracketedIpv6,
    #[error("invalid port: {0}")]
    InvalidPort(String),
    #[error("invalid host: {0}")]
    InvalidHost(String),
}

/// Host and port of a ftp server.
///
/// The host is kept as given by the user so that data connections can be
/// made to the very same host the control connection was made to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FtpServerAddr {
    host: String,
    port: u16,
}

impl FtpServerAddr {
    pub fn new(host: &str, port: u16) -> Self {
        FtpServerAddr {
            host: host.to_string(),
            port,
        }
    }

    #[inline]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[inline]
    pub fn port(&self) -> u16 {
        self.port
    }

    #[inline]
    pub fn set_port(&mut self, port: u16) {
        self.port = port;
    }

    /// The address used for a passive data connection: same host, new port.
    pub fn with_port(&self, port: u16) -> Self {
        FtpServerAddr {
            host: self.host.clone(),
            port,
        }
    }

    fn is_ipv6_host(&self) -> bool {
        matches!(IpAddr::from_str(&self.host), Ok(IpAddr::V6(_)))
    }
}

impl fmt::Display for FtpServerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ipv6_host() {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

fn parse_port(s: &str) -> Result<u16, FtpServerAddrParseError> {
    u16::from_str(s).map_err(|_| FtpServerAddrParseError::InvalidPort(s.to_string()))
}

fn check_host(host: &str) -> Result<(), FtpServerAddrParseError> {
    if host.is_empty() {
        return Err(FtpServerAddrParseError::EmptyString);
    }
    if host
        .bytes()
        .any(|b| b.is_ascii_whitespace() || b.is_ascii_control() || b == b'/')
    {
        return Err(FtpServerAddrParseError::InvalidHost(host.to_string()));
    }
    Ok(())
}

impl FromStr for FtpServerAddr {
    type Err = FtpServerAddrParseError;

    /// Parse `host`, `host:port`, `ip6`, or `[ip6]:port`.
    /// The default ftp port is used if no port is given.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(FtpServerAddrParseError::EmptyString);
        }

        if let Some(left) = s.strip_prefix('[') {
            let Some((ip6, rest)) = left.split_once(']') else {
                return Err(FtpServerAddrParseError::InvalidBracketedIpv6);
            };
            let ip6 = Ipv6Addr::from_str(ip6)
                .map_err(|_| FtpServerAddrParseError::InvalidBracketedIpv6)?;
            let port = match rest {
                "" => FTP_DEFAULT_PORT,
                _ => match rest.strip_prefix(':') {
                    Some(p) => parse_port(p)?,
                    None => return Err(FtpServerAddrParseError::InvalidPort(rest.to_string())),
                },
            };
            return Ok(FtpServerAddr {
                host: ip6.to_string(),
                port,
            });
        }

        if let Ok(ip6) = Ipv6Addr::from_str(s) {
            // bare ipv6 address, no port can be attached
            return Ok(FtpServerAddr {
                host: ip6.to_string(),
                port: FTP_DEFAULT_PORT,
            });
        }

        match s.rsplit_once(':') {
            Some((host, port)) => {
                check_host(host)?;
                Ok(FtpServerAddr {
                    host: host.to_string(),
                    port: parse_port(port)?,
                })
            }
            None => {
                check_host(s)?;
                Ok(FtpServerAddr {
                    host: s.to_string(),
                    port: FTP_DEFAULT_PORT,
                })
            }
        }
    }
}
