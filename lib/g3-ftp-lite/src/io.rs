/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub(crate) trait LimitedBufReadExt: AsyncBufRead + Unpin {
    /// Read until `delimiter` (included) or until `max_len` bytes have been read.
    ///
    /// Returns whether the delimiter was found and the number of bytes appended
    /// to `buf`. `(false, 0)` means the stream is at eof.
    async fn limited_read_until(
        &mut self,
        delimiter: u8,
        max_len: usize,
        buf: &mut Vec<u8>,
    ) -> io::Result<(bool, usize)> {
        let mut nr = 0usize;
        while nr < max_len {
            let (found, used) = {
                let available = self.fill_buf().await?;
                if available.is_empty() {
                    return Ok((false, nr));
                }
                let to_check = &available[..available.len().min(max_len - nr)];
                match memchr::memchr(delimiter, to_check) {
                    Some(p) => {
                        buf.extend_from_slice(&to_check[..=p]);
                        (true, p + 1)
                    }
                    None => {
                        buf.extend_from_slice(to_check);
                        (false, to_check.len())
                    }
                }
            };
            self.consume(used);
            nr += used;
            if found {
                return Ok((true, nr));
            }
        }
        Ok((false, nr))
    }
}

impl<R: AsyncBufRead + Unpin> LimitedBufReadExt for R {}
