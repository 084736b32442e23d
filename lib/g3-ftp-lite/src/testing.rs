/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio_test::io::{Builder, Mock};

use crate::{FtpConnectionProvider, FtpRawIoTracer, FtpReply, FtpServerAddr};

#[derive(Default)]
pub(crate) struct MockConnectionProvider {
    control: Option<Mock>,
    data: VecDeque<Mock>,
    data_requests: Arc<Mutex<Vec<FtpServerAddr>>>,
}

impl MockConnectionProvider {
    pub(crate) fn new(control: Mock) -> Self {
        MockConnectionProvider {
            control: Some(control),
            ..Default::default()
        }
    }

    pub(crate) fn push_data(&mut self, data: Mock) {
        self.data.push_back(data);
    }

    pub(crate) fn data_requests(&self) -> Arc<Mutex<Vec<FtpServerAddr>>> {
        self.data_requests.clone()
    }
}

#[async_trait]
impl FtpConnectionProvider<Mock> for MockConnectionProvider {
    async fn new_control_connection(&mut self, _server: &FtpServerAddr) -> io::Result<Mock> {
        self.control
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::ConnectionRefused, "refused"))
    }

    async fn new_data_connection(&mut self, server: &FtpServerAddr) -> io::Result<Mock> {
        self.data_requests.lock().unwrap().push(server.clone());
        self.data
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::ConnectionRefused, "refused"))
    }
}

#[derive(Default)]
pub(crate) struct RecordingTracer {
    records: Mutex<Vec<String>>,
}

impl RecordingTracer {
    pub(crate) fn records(&self) -> Vec<String> {
        self.records.lock().unwrap().clone()
    }
}

impl FtpRawIoTracer for RecordingTracer {
    fn trace_command(&self, line: &str) {
        self.records.lock().unwrap().push(format!("> {line}"));
    }

    fn trace_reply(&self, reply: &FtpReply) {
        self.records
            .lock()
            .unwrap()
            .push(format!("< {}", reply.message()));
    }
}

/// Control channel script up to a successful login.
pub(crate) fn logged_in_control() -> Builder {
    let mut builder = Builder::new();
    builder
        .read(b"220 Service ready\r\n")
        .write(b"USER anonymous\r\n")
        .read(b"331 Please specify the password.\r\n")
        .write(b"PASS guest@example.net\r\n")
        .read(b"230 Login successful.\r\n");
    builder
}
