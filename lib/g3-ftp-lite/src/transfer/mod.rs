/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, ReadBuf};

use crate::control::{FtpCommand, FtpControlChannel, FtpReply};
use crate::error::FtpTransferEndError;

mod line;
pub(crate) use line::FtpLineDataTransfer;
pub use line::FtpLineDataReceiver;

/// The data connection of one `LIST` or `RETR` command.
///
/// The control channel stays borrowed until [`FtpDataStream::finish`] is
/// called, which closes the data connection and then checks the end reply
/// the server sends on the control channel. If the stream is dropped without
/// being finished, that end reply will be drained before the next command.
pub struct FtpDataStream<'a, T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    control: &'a mut FtpControlChannel<T>,
    data: Option<T>,
    command: FtpCommand,
    end_wait_timeout: Duration,
    finished: bool,
}

impl<'a, T> FtpDataStream<'a, T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    pub(crate) fn new(
        control: &'a mut FtpControlChannel<T>,
        data: T,
        command: FtpCommand,
        end_wait_timeout: Duration,
    ) -> Self {
        FtpDataStream {
            control,
            data: Some(data),
            command,
            end_wait_timeout,
            finished: false,
        }
    }

    #[inline]
    pub fn command(&self) -> FtpCommand {
        self.command
    }

    /// Close the data connection and wait for the `226` end reply.
    pub async fn finish(mut self) -> Result<FtpReply, FtpTransferEndError> {
        self.finished = true;

        let close_result = match self.data.take() {
            Some(mut data) => data.shutdown().await,
            None => Ok(()),
        };

        let reply = self
            .control
            .wait_transfer_end(self.command, self.end_wait_timeout)
            .await?;

        match close_result {
            Ok(_) => Ok(reply),
            // the server may have closed its side already
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(reply),
            Err(e) => Err(FtpTransferEndError::DataCloseFailed(e)),
        }
    }
}

impl<T> AsyncRead for FtpDataStream<'_, T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match &mut self.get_mut().data {
            Some(data) => Pin::new(data).poll_read(cx, buf),
            None => Poll::Ready(Ok(())),
        }
    }
}

impl<T> Drop for FtpDataStream<'_, T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    fn drop(&mut self) {
        if !self.finished {
            log::debug!("data stream of {} dropped before finish", self.command);
            self.control.set_end_reply_pending(self.command);
        }
    }
}
