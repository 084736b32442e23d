/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::net::Ipv4Addr;
use std::str::FromStr;

/// The address advertised in a `227` reply to `PASV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FtpPassiveAddr {
    ip: Ipv4Addr,
    port: u16,
}

fn parse_number(s: &str) -> Option<u8> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    u8::from_str(s).ok()
}

impl FtpPassiveAddr {
    /// Parse the `(h1,h2,h3,h4,p1,p2)` group out of a `227` reply message.
    ///
    /// Exactly six decimal numbers in range 0-255 are required. Spaces around
    /// a number are tolerated.
    pub fn parse_reply(msg: &str) -> Option<Self> {
        let p_start = memchr::memchr(b'(', msg.as_bytes())?;
        let p_end = memchr::memchr(b')', &msg.as_bytes()[p_start..])? + p_start;

        let mut numbers = [0u8; 6];
        let mut count = 0usize;
        for part in msg[p_start + 1..p_end].split(',') {
            if count >= numbers.len() {
                return None;
            }
            numbers[count] = parse_number(part.trim_matches(' '))?;
            count += 1;
        }
        if count != numbers.len() {
            return None;
        }

        let [h1, h2, h3, h4, p1, p2] = numbers;
        Some(FtpPassiveAddr {
            ip: Ipv4Addr::new(h1, h2, h3, h4),
            port: ((p1 as u16) << 8) + (p2 as u16),
        })
    }

    /// The host advertised by the server. It is not used as the data
    /// connection target, as servers behind NAT often advertise an internal
    /// address.
    #[inline]
    pub fn advertised_ip(&self) -> Ipv4Addr {
        self.ip
    }

    #[inline]
    pub fn port(&self) -> u16 {
        self.port
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ok() {
        let addr =
            FtpPassiveAddr::parse_reply("227 Entering Passive Mode (10,0,0,1,200,15)").unwrap();
        assert_eq!(addr.port(), 51215);
        assert_eq!(addr.advertised_ip(), Ipv4Addr::new(10, 0, 0, 1));

        let addr = FtpPassiveAddr::parse_reply("227 =(192,0,2,7,0,21).").unwrap();
        assert_eq!(addr.port(), 21);

        let addr = FtpPassiveAddr::parse_reply("227 ok (127, 0, 0, 1, 4, 1)").unwrap();
        assert_eq!(addr.port(), 1025);

        let addr =
            FtpPassiveAddr::parse_reply("227-Entering Passive Mode\n227 (1,2,3,4,255,255)")
                .unwrap();
        assert_eq!(addr.port(), 65535);
    }

    #[test]
    fn parse_err() {
        assert!(FtpPassiveAddr::parse_reply("227 Entering Passive Mode").is_none());
        assert!(FtpPassiveAddr::parse_reply("227 (10,0,0,1,200,15").is_none());
        assert!(FtpPassiveAddr::parse_reply("227 (10,0,0,1,200)").is_none());
        assert!(FtpPassiveAddr::parse_reply("227 (10,0,0,1,200,15,1)").is_none());
        assert!(FtpPassiveAddr::parse_reply("227 (10,0,0,1,256,15)").is_none());
        assert!(FtpPassiveAddr::parse_reply("227 (10,0,0,1,+2,15)").is_none());
        assert!(FtpPassiveAddr::parse_reply("227 (10,0,0,1,,15)").is_none());
        assert!(FtpPassiveAddr::parse_reply("227 (a,b,c,d,e,f)").is_none());
        assert!(FtpPassiveAddr::parse_reply("227 )10,0,0,1,200,15(").is_none());
    }
}
