/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::time::Duration;

#[cfg(feature = "yaml")]
mod yaml;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FtpControlConfig {
    pub(crate) max_line_len: usize,
    pub(crate) max_multi_lines: usize,
    pub(crate) command_timeout: Duration,
}

impl Default for FtpControlConfig {
    fn default() -> Self {
        FtpControlConfig {
            max_line_len: 2048,
            max_multi_lines: 128,
            command_timeout: Duration::from_secs(10),
        }
    }
}

impl FtpControlConfig {
    pub fn set_max_line_len(&mut self, len: usize) {
        // at least enough for "<code> \r\n"
        self.max_line_len = len.max(8);
    }

    pub fn set_max_multi_lines(&mut self, lines: usize) {
        self.max_multi_lines = lines.max(1);
    }

    pub fn set_command_timeout(&mut self, timeout: Duration) {
        self.command_timeout = timeout;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FtpTransferConfig {
    pub(crate) list_max_line_len: usize,
    pub(crate) list_max_entries: usize,
    pub(crate) list_all_timeout: Duration,
    pub(crate) data_connect_timeout: Duration,
    pub(crate) end_wait_timeout: Duration,
}

impl Default for FtpTransferConfig {
    fn default() -> Self {
        FtpTransferConfig {
            list_max_line_len: 2048,
            list_max_entries: 65536,
            list_all_timeout: Duration::from_secs(120),
            data_connect_timeout: Duration::from_secs(30),
            end_wait_timeout: Duration::from_secs(10),
        }
    }
}

impl FtpTransferConfig {
    pub fn set_list_max_line_len(&mut self, len: usize) {
        self.list_max_line_len = len.max(1);
    }

    pub fn set_list_max_entries(&mut self, entries: usize) {
        self.list_max_entries = entries;
    }

    pub fn set_list_all_timeout(&mut self, timeout: Duration) {
        self.list_all_timeout = timeout;
    }

    pub fn set_data_connect_timeout(&mut self, timeout: Duration) {
        self.data_connect_timeout = timeout;
    }

    pub fn set_end_wait_timeout(&mut self, timeout: Duration) {
        self.end_wait_timeout = timeout;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtpClientConfig {
    pub control: FtpControlConfig,
    pub transfer: FtpTransferConfig,
    pub connect_timeout: Duration,
    pub greeting_timeout: Duration,
}

impl Default for FtpClientConfig {
    fn default() -> Self {
        FtpClientConfig {
            control: FtpControlConfig::default(),
            transfer: FtpTransferConfig::default(),
            connect_timeout: Duration::from_secs(30),
            greeting_timeout: Duration::from_secs(10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_limits() {
        let mut config = FtpControlConfig::default();
        config.set_max_line_len(1);
        assert_eq!(config.max_line_len, 8);
        config.set_max_multi_lines(0);
        assert_eq!(config.max_multi_lines, 1);
    }
}
