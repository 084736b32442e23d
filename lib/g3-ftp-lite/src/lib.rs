/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod addr;
pub use addr::{FtpServerAddr, FtpServerAddrParseError};

mod config;
pub use config::{FtpClientConfig, FtpControlConfig, FtpTransferConfig};

mod connection;
pub use connection::{FtpConnectionProvider, TcpConnectionProvider};

mod debug;
pub use debug::{FTP_DEBUG_LOG_LEVEL, FTP_RAW_IO_LOG_TARGET, FtpRawIoTracer, LogRawIoTracer};

mod io;

mod error;
pub use error::{
    FtpCommandError, FtpConnectError, FtpFileListError, FtpFileRetrieveStartError,
    FtpLineDataReadError, FtpRawResponseError, FtpTransferEndError, FtpTransferSetupError,
};

mod control;
pub use control::{FtpCommand, FtpPassiveAddr, FtpReply};

mod transfer;
pub use transfer::{FtpDataStream, FtpLineDataReceiver};

mod entry;
pub use entry::{FtpDirEntry, FtpDirEntryCollector};

mod client;
pub use client::{FtpClient, FtpSessionState};

#[cfg(test)]
mod testing;
