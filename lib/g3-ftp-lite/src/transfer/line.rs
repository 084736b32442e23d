/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use async_trait::async_trait;
use tokio::io::{AsyncRead, BufReader};

use crate::config::FtpTransferConfig;
use crate::error::FtpLineDataReadError;
use crate::io::LimitedBufReadExt;

#[async_trait]
pub trait FtpLineDataReceiver {
    /// `line` keeps its line terminator, if any.
    async fn recv_line(&mut self, line: &str);
    fn should_return_early(&self) -> bool;
}

pub(crate) struct FtpLineDataTransfer<R: AsyncRead> {
    io: BufReader<R>,
    max_lines: usize,
    max_line_len: usize,
    line_buf: Vec<u8>,
}

impl<R> FtpLineDataTransfer<R>
where
    R: AsyncRead + Unpin,
{
    pub(crate) fn new(io: R, config: &FtpTransferConfig) -> Self {
        FtpLineDataTransfer {
            io: BufReader::new(io),
            max_lines: config.list_max_entries,
            max_line_len: config.list_max_line_len,
            line_buf: Vec::with_capacity(config.list_max_line_len),
        }
    }

    async fn send_buf_to_receiver<V>(
        &mut self,
        receiver: &mut V,
    ) -> Result<(), FtpLineDataReadError>
    where
        V: FtpLineDataReceiver,
    {
        // names in legacy encodings are kept, with invalid bytes replaced
        receiver
            .recv_line(&String::from_utf8_lossy(&self.line_buf))
            .await;
        self.line_buf.clear();
        if receiver.should_return_early() {
            return Err(FtpLineDataReadError::AbortedByCallback);
        }
        Ok(())
    }

    pub(crate) async fn read_to_end<V>(
        mut self,
        receiver: &mut V,
    ) -> Result<(), FtpLineDataReadError>
    where
        V: FtpLineDataReceiver,
    {
        for i in 0..self.max_lines {
            let (found, nr) = self
                .io
                .limited_read_until(b'\n', self.max_line_len, &mut self.line_buf)
                .await?;
            if nr == 0 {
                return Ok(());
            }

            if !found {
                if nr >= self.max_line_len {
                    return Err(FtpLineDataReadError::LineTooLong(i + 1));
                }
                // last line without line terminator
                self.send_buf_to_receiver(receiver).await?;
                return Ok(());
            }

            self.send_buf_to_receiver(receiver).await?;
        }

        // all lines are received if the data connection is at eof now
        let (_, nr) = self
            .io
            .limited_read_until(b'\n', 1, &mut self.line_buf)
            .await?;
        if nr == 0 {
            Ok(())
        } else {
            Err(FtpLineDataReadError::TooManyLines)
        }
    }
}
