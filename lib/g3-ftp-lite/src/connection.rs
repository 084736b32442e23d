/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::net::{IpAddr, SocketAddr};

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpSocket, TcpStream};

use crate::FtpServerAddr;

#[async_trait]
pub trait FtpConnectionProvider<T: AsyncRead + AsyncWrite> {
    async fn new_control_connection(&mut self, server: &FtpServerAddr) -> io::Result<T>;
    /// `server` is always the control connection host with the negotiated
    /// passive port.
    async fn new_data_connection(&mut self, server: &FtpServerAddr) -> io::Result<T>;
}

#[derive(Debug, Default)]
pub struct TcpConnectionProvider {
    bind_ip: Option<IpAddr>,
    remote_addr: Option<SocketAddr>,
}

impl TcpConnectionProvider {
    pub fn set_bind_ip(&mut self, ip: IpAddr) {
        self.bind_ip = Some(ip);
    }

    async fn connect(&self, addr: SocketAddr) -> io::Result<TcpStream> {
        let socket = match addr {
            SocketAddr::V4(_) => TcpSocket::new_v4()?,
            SocketAddr::V6(_) => TcpSocket::new_v6()?,
        };
        if let Some(ip) = self.bind_ip {
            socket.bind(SocketAddr::new(ip, 0))?;
        }
        socket.connect(addr).await
    }
}

#[async_trait]
impl FtpConnectionProvider<TcpStream> for TcpConnectionProvider {
    async fn new_control_connection(&mut self, server: &FtpServerAddr) -> io::Result<TcpStream> {
        let mut err = io::Error::new(io::ErrorKind::AddrNotAvailable, "no addr resolved");
        for addr in tokio::net::lookup_host((server.host(), server.port())).await? {
            if let Some(bind_ip) = self.bind_ip {
                if bind_ip.is_ipv4() != addr.is_ipv4() {
                    continue;
                }
            }
            match self.connect(addr).await {
                Ok(stream) => {
                    log::debug!("control connection to {server} established via {addr}");
                    self.remote_addr = Some(addr);
                    return Ok(stream);
                }
                Err(e) => err = e,
            }
        }

        Err(err)
    }

    async fn new_data_connection(&mut self, server: &FtpServerAddr) -> io::Result<TcpStream> {
        match self.remote_addr {
            Some(addr) => {
                // use the resolved control peer ip, so no new dns lookup happens
                let data_addr = SocketAddr::new(addr.ip(), server.port());
                self.connect(data_addr).await
            }
            None => Err(io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                "no resolved control peer addr found",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn data_connection_reuses_control_peer() {
        let control_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let data_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let control_port = control_listener.local_addr().unwrap().port();
        let data_port = data_listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (_control, _) = control_listener.accept().await.unwrap();
            let (mut data, _) = data_listener.accept().await.unwrap();
            data.write_all(b"data").await.unwrap();
        });

        let mut provider = TcpConnectionProvider::default();
        let server_addr = FtpServerAddr::new("localhost", control_port);
        assert!(provider.new_data_connection(&server_addr).await.is_err());

        let server_addr = FtpServerAddr::new("127.0.0.1", control_port);
        let _control = provider.new_control_connection(&server_addr).await.unwrap();
        let mut data = provider
            .new_data_connection(&server_addr.with_port(data_port))
            .await
            .unwrap();
        let mut buf = Vec::new();
        data.read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf.as_slice(), b"data");

        server.await.unwrap();
    }
}
