/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::path::PathBuf;

use anyhow::Context;
use clap::{Arg, ArgMatches, Command, ValueHint, value_parser};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use g3_ftp_lite::{FtpClient, FtpConnectionProvider};

pub(super) const COMMAND: &str = "get";

const COMMAND_ARG_PATH: &str = "path";
const COMMAND_ARG_OUTPUT: &str = "output";

pub(super) fn command() -> Command {
    Command::new(COMMAND)
        .about("Download file")
        .arg(
            Arg::new(COMMAND_ARG_PATH)
                .value_name("FILE PATH")
                .num_args(1)
                .required(true),
        )
        .arg(
            Arg::new(COMMAND_ARG_OUTPUT)
                .help("Local file to save to, default to stdout")
                .value_name("LOCAL FILE")
                .num_args(1)
                .value_parser(value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath)
                .short('o')
                .long("output"),
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

    let mut data_stream = client.retrieve(path).await?;
    let copied = match args.get_one::<PathBuf>(COMMAND_ARG_OUTPUT) {
        Some(output) => {
            let mut file = tokio::fs::File::create(output)
                .await
                .context(format!("failed to create file {}", output.display()))?;
            let copied = tokio::io::copy(&mut data_stream, &mut file).await?;
            file.flush().await?;
            copied
        }
        None => {
            let mut stdout = tokio::io::stdout();
            let copied = tokio::io::copy(&mut data_stream, &mut stdout).await?;
            stdout.flush().await?;
            copied
        }
    };
    let reply = data_stream.finish().await?;
    log::info!("{copied} bytes received, server reply: {reply}");
    Ok(())
}
