/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;

use thiserror::Error;

use super::FtpRawResponseError;
use crate::control::{FtpCommand, FtpReply};

#[derive(Debug, Error)]
pub enum FtpCommandError {
    #[error("control channel is broken")]
    ControlChannelBroken,
    #[error("unable to send command: {0:?}")]
    SendFailed(io::Error),
    #[error("unable to recv reply: {0}")]
    RecvFailed(#[from] FtpRawResponseError),
    #[error("unexpected reply to command {0}: {1}")]
    UnexpectedReply(FtpCommand, FtpReply),
    #[error("invalid reply {1} syntax to command {0}")]
    InvalidReplySyntax(FtpCommand, u16),
    #[error("invalid parameter for command {0}")]
    InvalidParameter(FtpCommand),
}

impl FtpCommandError {
    /// The server reply that caused this error, if the server replied at all.
    pub fn reply(&self) -> Option<&FtpReply> {
        match self {
            FtpCommandError::UnexpectedReply(_, reply) => Some(reply),
            _ => None,
        }
    }

    pub fn reply_code(&self) -> Option<u16> {
        match self {
            FtpCommandError::UnexpectedReply(_, reply) => Some(reply.code()),
            FtpCommandError::InvalidReplySyntax(_, code) => Some(*code),
            _ => None,
        }
    }

    /// Whether the control channel can no longer be trusted to be in sync.
    pub(crate) fn breaks_control_channel(&self) -> bool {
        matches!(
            self,
            FtpCommandError::ControlChannelBroken
                | FtpCommandError::SendFailed(_)
                | FtpCommandError::RecvFailed(_)
        )
    }
}
