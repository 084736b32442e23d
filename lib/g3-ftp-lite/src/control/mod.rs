/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufStream};

use crate::error::{FtpCommandError, FtpRawResponseError, FtpTransferEndError};
use crate::{FtpControlConfig, FtpRawIoTracer};

mod response;
pub use response::FtpReply;

mod command;
pub use command::FtpCommand;

mod passive;
pub use passive::FtpPassiveAddr;

pub(crate) struct FtpControlChannel<T>
where
    T: AsyncRead + AsyncWrite,
{
    config: FtpControlConfig,
    stream: BufStream<T>,
    tracer: Arc<dyn FtpRawIoTracer>,
    broken: bool,
    pending_end_reply: Option<FtpCommand>,
}

impl<T> FtpControlChannel<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    pub(crate) fn new(
        stream: T,
        config: FtpControlConfig,
        tracer: Arc<dyn FtpRawIoTracer>,
    ) -> Self {
        FtpControlChannel {
            config,
            stream: BufStream::new(stream),
            tracer,
            broken: false,
            pending_end_reply: None,
        }
    }

    #[inline]
    pub(crate) fn is_broken(&self) -> bool {
        self.broken
    }

    #[inline]
    pub(crate) fn mark_broken(&mut self) {
        self.broken = true;
    }

    /// The data stream of `cmd` was dropped before its end reply was read.
    pub(crate) fn set_end_reply_pending(&mut self, cmd: FtpCommand) {
        self.pending_end_reply = Some(cmd);
    }

    async fn drain_pending_end_reply(&mut self) -> Result<(), FtpCommandError> {
        let Some(cmd) = self.pending_end_reply.take() else {
            return Ok(());
        };
        match self.timed_read_raw_response("drain end reply").await {
            Ok(reply) => {
                log::warn!("drained pending end reply to {cmd}: {reply}");
                Ok(())
            }
            Err(e) => {
                self.broken = true;
                Err(FtpCommandError::RecvFailed(e))
            }
        }
    }

    fn check_result<R>(&mut self, r: Result<R, FtpCommandError>) -> Result<R, FtpCommandError> {
        if let Err(e) = &r {
            if e.breaks_control_channel() {
                self.broken = true;
            }
        }
        r
    }

    /// One command / reply cycle: send `cmd` (with an optional parameter) and
    /// read the reply, which must carry one of the `accepted` codes.
    pub(crate) async fn exchange(
        &mut self,
        cmd: FtpCommand,
        param: Option<&str>,
        accepted: &[u16],
        stage: &'static str,
    ) -> Result<FtpReply, FtpCommandError> {
        if self.broken {
            return Err(FtpCommandError::ControlChannelBroken);
        }
        if let Some(p) = param {
            if p.contains(|c: char| c == '\r' || c == '\n') {
                return Err(FtpCommandError::InvalidParameter(cmd));
            }
        }
        self.drain_pending_end_reply().await?;

        let r = self.do_exchange(cmd, param, accepted, stage).await;
        self.check_result(r)
    }

    async fn do_exchange(
        &mut self,
        cmd: FtpCommand,
        param: Option<&str>,
        accepted: &[u16],
        stage: &'static str,
    ) -> Result<FtpReply, FtpCommandError> {
        let sent = match param {
            Some(p) => self.send_cmd1(cmd, p).await,
            None => self.send_cmd(cmd).await,
        };
        sent.map_err(FtpCommandError::SendFailed)?;

        let reply = self.timed_read_raw_response(stage).await?;
        if accepted.contains(&reply.code()) {
            Ok(reply)
        } else {
            Err(FtpCommandError::UnexpectedReply(cmd, reply))
        }
    }

    async fn read_greetings(&mut self) -> Result<FtpReply, FtpRawResponseError> {
        loop {
            let reply = self.read_raw_response().await?;
            if reply.code() == 120 {
                log::debug!("server not ready yet: {reply}");
                continue;
            }
            return Ok(reply);
        }
    }

    pub(crate) async fn wait_greetings(
        &mut self,
        timeout: Duration,
    ) -> Result<FtpReply, FtpRawResponseError> {
        let r = match tokio::time::timeout(timeout, self.read_greetings()).await {
            Ok(r) => r,
            Err(_) => Err(FtpRawResponseError::ReadResponseTimedOut("wait greetings")),
        };
        if r.is_err() {
            self.broken = true;
        }
        r
    }

    pub(crate) async fn send_username(&mut self, name: &str) -> Result<FtpReply, FtpCommandError> {
        self.exchange(FtpCommand::USER, Some(name), &[230, 331, 332], "send username").await
    }

    pub(crate) async fn send_password(&mut self, pass: &str) -> Result<FtpReply, FtpCommandError> {
        self.exchange(FtpCommand::PASS, Some(pass), &[230, 202], "send password").await
    }

    pub(crate) async fn send_quit(&mut self) -> Result<(), FtpCommandError> {
        self.exchange(FtpCommand::QUIT, None, &[221], "send quit").await?;
        Ok(())
    }

    pub(crate) async fn request_binary_type(&mut self) -> Result<(), FtpCommandError> {
        self.exchange(FtpCommand::TYPE_I, None, &[200], "request binary type").await?;
        Ok(())
    }

    pub(crate) async fn request_pasv_port(&mut self) -> Result<FtpPassiveAddr, FtpCommandError> {
        let cmd = FtpCommand::PASV;
        let reply = self.exchange(cmd, None, &[227], "request pasv port").await?;
        match FtpPassiveAddr::parse_reply(reply.message()) {
            Some(addr) => Ok(addr),
            None => Err(FtpCommandError::InvalidReplySyntax(cmd, reply.code())),
        }
    }

    pub(crate) async fn start_transfer(
        &mut self,
        cmd: FtpCommand,
        path: &str,
        accepted: &[u16],
    ) -> Result<FtpReply, FtpCommandError> {
        let param = if path.is_empty() { None } else { Some(path) };
        self.exchange(cmd, param, accepted, "start transfer").await
    }

    /// Read the reply sent after the data connection of `cmd` has been closed.
    pub(crate) async fn wait_transfer_end(
        &mut self,
        cmd: FtpCommand,
        timeout: Duration,
    ) -> Result<FtpReply, FtpTransferEndError> {
        let reply = match tokio::time::timeout(timeout, self.read_raw_response()).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                self.broken = true;
                return Err(FtpTransferEndError::RecvFailed(e));
            }
            Err(_) => {
                self.broken = true;
                return Err(FtpTransferEndError::RecvFailed(
                    FtpRawResponseError::ReadResponseTimedOut("wait transfer end"),
                ));
            }
        };
        match reply.code() {
            226 => Ok(reply),
            _ => Err(FtpTransferEndError::UnexpectedEndReply(cmd, reply)),
        }
    }

    pub(crate) async fn shutdown(mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }
}
