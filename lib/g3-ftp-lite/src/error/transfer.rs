/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;

use thiserror::Error;

use super::{FtpCommandError, FtpRawResponseError};
use crate::FtpServerAddr;
use crate::control::{FtpCommand, FtpReply};

#[derive(Debug, Error)]
pub enum FtpTransferSetupError {
    #[error("passive mode negotiation failed: {0}")]
    PassiveNegotiationFailed(FtpCommandError),
    #[error("data connection to {0} failed: {1:?}")]
    DataConnectFailed(FtpServerAddr, io::Error),
    #[error("timed out to connect data connection to {0}")]
    DataConnectTimedOut(FtpServerAddr),
    #[error("transfer start failed: {0}")]
    TransferStartFailed(FtpCommandError),
}

impl FtpTransferSetupError {
    pub fn command_error(&self) -> Option<&FtpCommandError> {
        match self {
            FtpTransferSetupError::PassiveNegotiationFailed(e)
            | FtpTransferSetupError::TransferStartFailed(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum FtpTransferEndError {
    #[error("unable to recv end reply: {0}")]
    RecvFailed(#[from] FtpRawResponseError),
    #[error("unexpected end reply to command {0}: {1}")]
    UnexpectedEndReply(FtpCommand, FtpReply),
    #[error("data connection close failed: {0:?}")]
    DataCloseFailed(io::Error),
}

impl FtpTransferEndError {
    pub fn reply_code(&self) -> Option<u16> {
        match self {
            FtpTransferEndError::UnexpectedEndReply(_, reply) => Some(reply.code()),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum FtpLineDataReadError {
    #[error("read failed: {0:?}")]
    ReadFailed(#[from] io::Error),
    #[error("line {0} too long")]
    LineTooLong(usize),
    #[error("too many lines")]
    TooManyLines,
    #[error("aborted by callback")]
    AbortedByCallback,
}
