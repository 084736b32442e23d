/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use async_trait::async_trait;

use crate::FtpLineDataReceiver;

/// One entry of a unix `ls -l` style listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtpDirEntry {
    name: String,
    directory: bool,
    link: bool,
}

impl FtpDirEntry {
    pub fn new(name: &str, directory: bool, link: bool) -> Self {
        FtpDirEntry {
            name: name.to_string(),
            directory,
            link,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.directory
    }

    #[inline]
    pub fn is_link(&self) -> bool {
        self.link
    }

    #[inline]
    pub fn maybe_file(&self) -> bool {
        !self.directory && !self.link
    }

    /// Parse one listing line like
    /// `drwxr-xr-x 2 user group 4096 Jan 1 00:00 pub`.
    ///
    /// Links are listed as `name -> target`, so the name of a link entry is
    /// the third token from the end. Blank lines and the `total <n>` header
    /// yield `None`.
    pub fn parse_list_line(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(&['\r', '\n'][..]);
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (first, last) = match tokens.as_slice() {
            [] => return None,
            ["total", n] if n.bytes().all(|b| b.is_ascii_digit()) => return None,
            [first, .., last] => (*first, *last),
            [single] => (*single, *single),
        };

        let directory = first.starts_with('d');
        let link = first.starts_with('l');
        let name = if link && tokens.len() >= 3 {
            tokens[tokens.len() - 3]
        } else {
            last
        };

        Some(FtpDirEntry::new(name, directory, link))
    }
}

/// Collects listing lines into [`FtpDirEntry`] values, in listing order.
#[derive(Debug, Default)]
pub struct FtpDirEntryCollector {
    entries: Vec<FtpDirEntry>,
}

impl FtpDirEntryCollector {
    pub fn into_entries(self) -> Vec<FtpDirEntry> {
        self.entries
    }
}

#[async_trait]
impl FtpLineDataReceiver for FtpDirEntryCollector {
    async fn recv_line(&mut self, line: &str) {
        if let Some(entry) = FtpDirEntry::parse_list_line(line) {
            self.entries.push(entry);
        }
    }

    #[inline]
    fn should_return_early(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_dir() {
        let entry =
            FtpDirEntry::parse_list_line("drwxr-xr-x 2 u g 4096 Jan 1 00:00 pub\r\n").unwrap();
        assert_eq!(entry, FtpDirEntry::new("pub", true, false));
        assert!(!entry.maybe_file());
    }

    #[test]
    fn parse_link() {
        let entry =
            FtpDirEntry::parse_list_line("lrwxrwxrwx 1 u g 7 Jan 1 00:00 cur -> current\r\n")
                .unwrap();
        assert_eq!(entry.name(), "cur");
        assert!(entry.is_link());
        assert!(!entry.is_dir());
    }

    #[test]
    fn parse_file() {
        let entry = FtpDirEntry::parse_list_line(
            "-rw-r--r--    1 ftp      ftp        120583 Mar 09  2021 README\n",
        )
        .unwrap();
        assert_eq!(entry, FtpDirEntry::new("README", false, false));
        assert!(entry.maybe_file());

        let entry = FtpDirEntry::parse_list_line("-rw-r--r-- 1 u g 1 Jan 1 00:00 last").unwrap();
        assert_eq!(entry.name(), "last");
    }

    #[test]
    fn parse_skipped() {
        assert!(FtpDirEntry::parse_list_line("\r\n").is_none());
        assert!(FtpDirEntry::parse_list_line("   ").is_none());
        assert!(FtpDirEntry::parse_list_line("total 48\r\n").is_none());
    }

    #[test]
    fn parse_short_link() {
        let entry = FtpDirEntry::parse_list_line("lrwx name").unwrap();
        assert_eq!(entry.name(), "name");
        assert!(entry.is_link());
    }

    #[tokio::test]
    async fn collect() {
        let mut collector = FtpDirEntryCollector::default();
        collector.recv_line("total 8\r\n").await;
        collector
            .recv_line("drwxr-xr-x 2 u g 4096 Jan 1 00:00 pub\r\n")
            .await;
        collector
            .recv_line("-rw-r--r-- 1 u g 10 Jan 1 00:00 a.txt\r\n")
            .await;
        let entries = collector.into_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name(), "pub");
        assert_eq!(entries[1].name(), "a.txt");
    }
}
