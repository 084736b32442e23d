/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;

use tokio::io::{AsyncRead, AsyncWrite};

use super::FtpControlChannel;
use crate::error::FtpRawResponseError;
use crate::io::LimitedBufReadExt;

/// A complete server reply.
///
/// `message` holds every line of the reply, continuation lines included,
/// with the line terminators removed and the lines joined by `\n`. The
/// leading reply code of each line is kept, so for a single line reply
/// `"220 Welcome\r\n"` the message is `"220 Welcome"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtpReply {
    code: u16,
    message: String,
}

impl FtpReply {
    pub(crate) fn new(code: u16, message: String) -> Self {
        FtpReply { code, message }
    }

    #[inline]
    pub fn code(&self) -> u16 {
        self.code
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.message.split('\n')
    }

    #[inline]
    pub fn is_multi_line(&self) -> bool {
        self.message.contains('\n')
    }
}

impl fmt::Display for FtpReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let mut end = line.len();
    while end > 0 && matches!(line[end - 1], b'\r' | b'\n') {
        end -= 1;
    }
    &line[..end]
}

/// Accumulates reply lines until the terminal `<code> ` line shows up.
pub(super) struct FtpReplyParser {
    max_lines: usize,
    lines: Vec<String>,
}

impl FtpReplyParser {
    pub(super) fn new(max_lines: usize) -> Self {
        FtpReplyParser {
            max_lines,
            lines: Vec::new(),
        }
    }

    pub(super) fn parse_code(line: &[u8]) -> Result<u16, FtpRawResponseError> {
        let prefix = &line[..line.len().min(3)];
        if prefix.len() != 3 || !prefix.iter().all(u8::is_ascii_digit) {
            return Err(FtpRawResponseError::InvalidReplyCode(
                String::from_utf8_lossy(prefix).to_string(),
            ));
        }
        let code = prefix
            .iter()
            .fold(0u16, |acc, c| acc * 10 + (c - b'0') as u16);
        if !(100..600).contains(&code) {
            return Err(FtpRawResponseError::InvalidReplyCode(code.to_string()));
        }
        Ok(code)
    }

    /// Feed one line read from the control channel.
    ///
    /// Returns the complete reply if `line` is the terminal one.
    /// Only `<code> ` ends a reply, any other line after the code is a
    /// continuation.
    pub(super) fn feed_line(
        &mut self,
        line: &[u8],
    ) -> Result<Option<FtpReply>, FtpRawResponseError> {
        let line = trim_line_end(line);
        let code = Self::parse_code(line)?;
        let terminal = line.get(3) == Some(&b' ');

        let msg = std::str::from_utf8(line).map_err(|_| FtpRawResponseError::LineIsNotUtf8)?;
        self.lines.push(msg.to_string());

        if terminal {
            let message = self.lines.join("\n");
            let message = message.trim_matches(|c| c == '\r' || c == '\n');
            Ok(Some(FtpReply::new(code, message.to_string())))
        } else if self.lines.len() >= self.max_lines {
            Err(FtpRawResponseError::TooManyLines)
        } else {
            Ok(None)
        }
    }
}

impl<T> FtpControlChannel<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    async fn read_line(&mut self, buf: &mut Vec<u8>) -> Result<(), FtpRawResponseError> {
        buf.clear();

        let max_len = self.config.max_line_len;
        let (found, len) = self
            .stream
            .limited_read_until(b'\n', max_len, buf)
            .await
            .map_err(FtpRawResponseError::ReadFailed)?;
        if found {
            Ok(())
        } else if len >= max_len {
            Err(FtpRawResponseError::LineTooLong)
        } else {
            // eof, with or without a partial line
            Err(FtpRawResponseError::ConnectionClosed)
        }
    }

    pub(super) async fn read_raw_response(&mut self) -> Result<FtpReply, FtpRawResponseError> {
        let mut parser = FtpReplyParser::new(self.config.max_multi_lines);
        let mut buf = Vec::<u8>::with_capacity(self.config.max_line_len);
        loop {
            self.read_line(&mut buf).await?;
            if let Some(reply) = parser.feed_line(&buf)? {
                self.tracer.trace_reply(&reply);
                return Ok(reply);
            }
        }
    }

    pub(super) async fn timed_read_raw_response(
        &mut self,
        stage: &'static str,
    ) -> Result<FtpReply, FtpRawResponseError> {
        let timeout = self.config.command_timeout;
        match tokio::time::timeout(timeout, self.read_raw_response()).await {
            Ok(r) => r,
            Err(_) => Err(FtpRawResponseError::ReadResponseTimedOut(stage)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(lines: &[&str]) -> Result<FtpReply, FtpRawResponseError> {
        let mut parser = FtpReplyParser::new(16);
        for line in lines {
            if let Some(reply) = parser.feed_line(line.as_bytes())? {
                return Ok(reply);
            }
        }
        panic!("no terminal line")
    }

    #[test]
    fn single_line() {
        let reply = parse_all(&["220 Welcome\n"]).unwrap();
        assert_eq!(reply.code(), 220);
        assert_eq!(reply.message(), "220 Welcome");
        assert!(!reply.is_multi_line());

        let reply = parse_all(&["230 Login successful.\r\n"]).unwrap();
        assert_eq!(reply.code(), 230);
        assert_eq!(reply.message(), "230 Login successful.");
    }

    #[test]
    fn multi_line() {
        let reply = parse_all(&[
            "220-Welcome to the archive\r\n",
            "220-Local time is 10:00\r\n",
            "220 Ready\r\n",
        ])
        .unwrap();
        assert_eq!(reply.code(), 220);
        assert_eq!(
            reply.message(),
            "220-Welcome to the archive\n220-Local time is 10:00\n220 Ready"
        );
        assert_eq!(reply.lines().count(), 3);

        let mut lines = vec!["230-first\r\n"; 10];
        lines.push("230 done\r\n");
        let reply = parse_all(&lines).unwrap();
        assert_eq!(reply.code(), 230);
        assert_eq!(reply.lines().count(), 11);
        assert!(reply.message().ends_with("230-first\n230 done"));
    }

    #[test]
    fn terminal_code_wins() {
        let reply = parse_all(&["150-opening\r\n", "226 done\r\n"]).unwrap();
        assert_eq!(reply.code(), 226);
    }

    #[test]
    fn invalid_code() {
        assert!(matches!(
            parse_all(&["abc hello\r\n"]),
            Err(FtpRawResponseError::InvalidReplyCode(_))
        ));
        assert!(matches!(
            parse_all(&["22\r\n"]),
            Err(FtpRawResponseError::InvalidReplyCode(_))
        ));
        assert!(matches!(
            parse_all(&["220-hello\r\n", " indented text\r\n"]),
            Err(FtpRawResponseError::InvalidReplyCode(_))
        ));
        assert!(matches!(
            parse_all(&["999 hello\r\n"]),
            Err(FtpRawResponseError::InvalidReplyCode(_))
        ));
    }

    #[test]
    fn loose_continuation() {
        let reply = parse_all(&["220\r\n", "220_hello\r\n", "220 Ready\r\n"]).unwrap();
        assert_eq!(reply.code(), 220);
        assert_eq!(reply.message(), "220\n220_hello\n220 Ready");
        assert!(reply.is_multi_line());
    }

    #[test]
    fn not_utf8() {
        let mut parser = FtpReplyParser::new(2);
        assert!(matches!(
            parser.feed_line(b"220 \xff\xfe\r\n"),
            Err(FtpRawResponseError::LineIsNotUtf8)
        ));
    }

    #[test]
    fn too_many_lines() {
        let mut parser = FtpReplyParser::new(2);
        assert!(parser.feed_line(b"220-one\r\n").unwrap().is_none());
        assert!(matches!(
            parser.feed_line(b"220-two\r\n"),
            Err(FtpRawResponseError::TooManyLines)
        ));
    }
}
