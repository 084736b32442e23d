/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod response;
pub use response::FtpRawResponseError;

mod command;
pub use command::FtpCommandError;

mod connect;
pub use connect::FtpConnectError;

mod transfer;
pub use transfer::{FtpLineDataReadError, FtpTransferEndError, FtpTransferSetupError};

mod file;
pub use file::{FtpFileListError, FtpFileRetrieveStartError};
