use std::io::{
    self,
    Write,
};

use blockchain::HASHRATE_WINDOWS;
use chrono::Local;
use client::{
    NodeRpc,
    RPCClient,
};

pub mod cli;
pub mod render;
pub mod reporter;

pub use cli::Cli;
pub use reporter::{
    report_recent_blocks,
    ReportError,
};

pub async fn run(cli: &Cli) -> Result<(), ReportError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    run_to(cli, &mut out).await
}

/*
 * Resolve the connection from `cli` and write the whole report to `out`.
 * Optional sections asked for by switches go around the block list.
 */
pub async fn run_to<W: Write>(cli: &Cli, out: &mut W) -> Result<(), ReportError> {
    let config = cli.configuration()?;
    let client = RPCClient::new(&config)?;

    tracing::debug!("Reporting from {}", client.url());

    if cli.info {
        let info = client.get_mining_info().await?;
        render::mining_info(out, &info)?;
    }

    if cli.template {
        let template = client.get_block_template().await?;
        render::block_template(out, &template)?;
    }

    if cli.hashrate {
        let mut samples = Vec::with_capacity(HASHRATE_WINDOWS.len());
        for blocks in HASHRATE_WINDOWS {
            samples.push((blocks, client.get_network_hash_ps(blocks).await?));
        }
        let difficulty = client.get_difficulty().await?;
        render::hashrate(out, &samples, difficulty)?;
    }

    let blocks = report_recent_blocks(&client, out, &Local).await?;

    if cli.analyze {
        render::analysis(out, &blocks)?;
    }

    out.flush()?;

    Ok(())
}

pub fn exit_code(result: &Result<(), ReportError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(_) => 1,
    }
}
