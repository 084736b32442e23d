/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use log::Level;

use crate::control::FtpReply;

pub const FTP_DEBUG_LOG_LEVEL: Level = Level::Debug;
pub const FTP_RAW_IO_LOG_TARGET: &str = "g3_ftp_lite::raw";

/// Receives every command line sent and every full reply received on the
/// control channel.
pub trait FtpRawIoTracer: Send + Sync {
    /// The command line without line terminator, password already masked.
    fn trace_command(&self, line: &str);
    fn trace_reply(&self, reply: &FtpReply);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogRawIoTracer;

impl FtpRawIoTracer for LogRawIoTracer {
    fn trace_command(&self, line: &str) {
        log::log!(target: FTP_RAW_IO_LOG_TARGET, FTP_DEBUG_LOG_LEVEL, "> {line}");
    }

    fn trace_reply(&self, reply: &FtpReply) {
        for line in reply.lines() {
            log::log!(target: FTP_RAW_IO_LOG_TARGET, FTP_DEBUG_LOG_LEVEL, "< {line}");
        }
    }
}
