/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use async_trait::async_trait;
use clap::{Arg, ArgAction, ArgMatches, Command};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, Stdout};

use g3_ftp_lite::{FtpClient, FtpConnectionProvider, FtpLineDataReceiver};

pub(super) const COMMAND: &str = "list";

const COMMAND_ARG_PATH: &str = "path";
const COMMAND_ARG_RAW: &str = "raw";

pub(super) fn command() -> Command {
    Command::new(COMMAND)
        .about("List path")
        .arg(
            Arg::new(COMMAND_ARG_PATH)
                .value_name("FILE PATH")
                .num_args(1),
        )
        .arg(
            Arg::new(COMMAND_ARG_RAW)
                .help("Print the raw listing lines")
                .action(ArgAction::SetTrue)
                .long("raw"),
        )
}

pub(super) async fn run<CP, S>(
    client: &mut FtpClient<CP, S>,
    args: &ArgMatches,
) -> anyhow::Result<()>
where
    CP: FtpConnectionProvider<S>,
    S: AsyncRead + AsyncWrite + Unpin,
{
    let path = args
        .get_one::<String>(COMMAND_ARG_PATH)
        .map(|s| s.as_str())
        .unwrap_or_default();

    if args.get_flag(COMMAND_ARG_RAW) {
        let mut line_receiver = StdioLineReceiver::default();
        client.list_lines(path, &mut line_receiver).await?;
        line_receiver.io.flush().await?;
        return Ok(());
    }

    for entry in client.list(path).await? {
        let kind = if entry.is_dir() {
            "dir"
        } else if entry.is_link() {
            "link"
        } else {
            "file"
        };
        println!("{kind:<4} {}", entry.name());
    }
    Ok(())
}

struct StdioLineReceiver {
    io: Stdout,
    has_error: bool,
}

impl Default for StdioLineReceiver {
    fn default() -> Self {
        StdioLineReceiver {
            io: tokio::io::stdout(),
            has_error: false,
        }
    }
}

#[async_trait]
impl FtpLineDataReceiver for StdioLineReceiver {
    async fn recv_line(&mut self, line: &str) {
        self.has_error = self.io.write_all(line.as_bytes()).await.is_err();
    }

    #[inline]
    fn should_return_early(&self) -> bool {
        self.has_error
    }
}
