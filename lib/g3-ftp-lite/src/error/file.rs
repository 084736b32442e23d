/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use thiserror::Error;

use super::command::FtpCommandError;
use super::transfer::{FtpLineDataReadError, FtpTransferEndError, FtpTransferSetupError};

#[derive(Debug, Error)]
pub enum FtpFileRetrieveStartError {
    #[error("command error: {0}")]
    CommandError(#[from] FtpCommandError),
    #[error("data transfer setup error: {0}")]
    TransferSetupFailed(#[from] FtpTransferSetupError),
}

#[derive(Debug, Error)]
pub enum FtpFileListError {
    #[error("data transfer setup error: {0}")]
    TransferSetupFailed(#[from] FtpTransferSetupError),
    #[error("data read failed: {0}")]
    DataReadFailed(#[from] FtpLineDataReadError),
    #[error("timeout to wait all data")]
    TimeoutToWaitAllData,
    #[error("transfer end error: {0}")]
    TransferEndFailed(#[from] FtpTransferEndError),
}
