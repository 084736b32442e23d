/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::control::FtpControlChannel;
use crate::error::{
    FtpCommandError, FtpConnectError, FtpFileListError, FtpFileRetrieveStartError,
    FtpRawResponseError, FtpTransferSetupError,
};
use crate::transfer::FtpLineDataTransfer;
use crate::{
    FtpClientConfig, FtpCommand, FtpConnectionProvider, FtpDataStream, FtpDirEntry,
    FtpDirEntryCollector, FtpLineDataReceiver, FtpRawIoTracer, FtpServerAddr, LogRawIoTracer,
};

const TRANSFER_PRELIMINARY_CODES: &[u16] = &[125, 150];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FtpSessionState {
    /// Greeting received, not logged in yet.
    Ready,
    Authenticated,
    /// The control channel is out of sync or closed, only close is useful.
    Broken,
}

pub struct FtpClient<CP, T>
where
    CP: FtpConnectionProvider<T>,
    T: AsyncRead + AsyncWrite + Unpin,
{
    server: FtpServerAddr,
    config: Arc<FtpClientConfig>,
    conn_provider: CP,
    control: FtpControlChannel<T>,
    logged_in: bool,
}

impl<CP, T> FtpClient<CP, T>
where
    CP: FtpConnectionProvider<T>,
    T: AsyncRead + AsyncWrite + Unpin,
{
    pub async fn connect_to(
        server: FtpServerAddr,
        conn_provider: CP,
        config: &Arc<FtpClientConfig>,
    ) -> Result<Self, FtpConnectError> {
        Self::connect_with_tracer(server, conn_provider, config, Arc::new(LogRawIoTracer)).await
    }

    pub async fn connect_with_tracer(
        server: FtpServerAddr,
        mut conn_provider: CP,
        config: &Arc<FtpClientConfig>,
        tracer: Arc<dyn FtpRawIoTracer>,
    ) -> Result<Self, FtpConnectError> {
        let stream = match tokio::time::timeout(
            config.connect_timeout,
            conn_provider.new_control_connection(&server),
        )
        .await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(FtpConnectError::ConnectIoError(e)),
            Err(_) => return Err(FtpConnectError::ConnectTimedOut),
        };

        let mut control = FtpControlChannel::new(stream, config.control, tracer);
        let reply = match control.wait_greetings(config.greeting_timeout).await {
            Ok(reply) => reply,
            Err(FtpRawResponseError::ReadResponseTimedOut(_)) => {
                return Err(FtpConnectError::GreetingTimedOut);
            }
            Err(e) => {
                return Err(FtpConnectError::GreetingFailed(
                    FtpCommandError::RecvFailed(e),
                ));
            }
        };
        match reply.code() {
            220 => {}
            421 => return Err(FtpConnectError::ServiceNotAvailable),
            _ => {
                return Err(FtpConnectError::GreetingFailed(
                    FtpCommandError::UnexpectedReply(FtpCommand::GREETING, reply),
                ));
            }
        }
        log::debug!("connected to ftp server {server}");

        Ok(FtpClient {
            server,
            config: Arc::clone(config),
            conn_provider,
            control,
            logged_in: false,
        })
    }

    #[inline]
    pub fn server(&self) -> &FtpServerAddr {
        &self.server
    }

    pub fn state(&self) -> FtpSessionState {
        if self.control.is_broken() {
            FtpSessionState::Broken
        } else if self.logged_in {
            FtpSessionState::Authenticated
        } else {
            FtpSessionState::Ready
        }
    }

    /// Send USER and then PASS. The session is unusable after a failed login.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), FtpCommandError> {
        let r = self.do_login(username, password).await;
        if r.is_err() {
            self.control.mark_broken();
        }
        r
    }

    async fn do_login(&mut self, username: &str, password: &str) -> Result<(), FtpCommandError> {
        self.control.send_username(username).await?;
        self.control.send_password(password).await?;
        self.logged_in = true;
        Ok(())
    }

    /// Negotiate a passive port, open the data connection to the control host
    /// at that port, then send `cmd` which should get one of the `preliminary`
    /// reply codes.
    pub async fn open_data_stream(
        &mut self,
        cmd: FtpCommand,
        path: &str,
        preliminary: &[u16],
    ) -> Result<FtpDataStream<'_, T>, FtpTransferSetupError> {
        let pasv = self
            .control
            .request_pasv_port()
            .await
            .map_err(FtpTransferSetupError::PassiveNegotiationFailed)?;
        let data_server = self.server.with_port(pasv.port());
        log::debug!(
            "passive port negotiated, server advertised {}, will connect to {data_server}",
            pasv.advertised_ip()
        );

        let mut data = match tokio::time::timeout(
            self.config.transfer.data_connect_timeout,
            self.conn_provider.new_data_connection(&data_server),
        )
        .await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(FtpTransferSetupError::DataConnectFailed(data_server, e)),
            Err(_) => return Err(FtpTransferSetupError::DataConnectTimedOut(data_server)),
        };

        if let Err(e) = self.control.start_transfer(cmd, path, preliminary).await {
            let _ = data.shutdown().await;
            return Err(FtpTransferSetupError::TransferStartFailed(e));
        }

        let end_wait_timeout = self.config.transfer.end_wait_timeout;
        Ok(FtpDataStream::new(
            &mut self.control,
            data,
            cmd,
            end_wait_timeout,
        ))
    }

    /// Send each raw line of the `LIST` output of `path` to `receiver`.
    pub async fn list_lines<R>(
        &mut self,
        path: &str,
        receiver: &mut R,
    ) -> Result<(), FtpFileListError>
    where
        R: FtpLineDataReceiver,
    {
        let transfer_config = self.config.transfer;
        let mut data_stream = self
            .open_data_stream(FtpCommand::LIST, path, TRANSFER_PRELIMINARY_CODES)
            .await?;

        let transfer = FtpLineDataTransfer::new(&mut data_stream, &transfer_config);
        let read_result = match tokio::time::timeout(
            transfer_config.list_all_timeout,
            transfer.read_to_end(receiver),
        )
        .await
        {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(FtpFileListError::DataReadFailed(e)),
            Err(_) => Err(FtpFileListError::TimeoutToWaitAllData),
        };

        // the end reply is sent even if the transfer is aborted
        let end_result = data_stream.finish().await;
        read_result?;
        end_result?;
        Ok(())
    }

    pub async fn list(&mut self, path: &str) -> Result<Vec<FtpDirEntry>, FtpFileListError> {
        let mut collector = FtpDirEntryCollector::default();
        self.list_lines(path, &mut collector).await?;
        Ok(collector.into_entries())
    }

    /// Start a binary download of `path`.
    ///
    /// The caller should read the returned stream to the end and then call
    /// [`FtpDataStream::finish`] to check the transfer result.
    pub async fn retrieve(
        &mut self,
        path: &str,
    ) -> Result<FtpDataStream<'_, T>, FtpFileRetrieveStartError> {
        self.control.request_binary_type().await?;
        let stream = self
            .open_data_stream(FtpCommand::RETR, path, TRANSFER_PRELIMINARY_CODES)
            .await?;
        Ok(stream)
    }

    pub async fn quit_and_close(mut self) -> Result<(), FtpCommandError> {
        self.control.send_quit().await?;
        self.close().await.map_err(FtpCommandError::SendFailed)
    }

    pub async fn close(self) -> io::Result<()> {
        self.control.shutdown().await
    }
}
