use std::{
    fmt::Display,
    io::{
        self,
        Write,
    },
};

use blockchain::{
    recent_heights,
    BlockFieldError,
    BlockRef,
    BlockSummary,
    ConfigError,
    HeightError,
    RECENT_BLOCKS,
};
use chrono::TimeZone;
use client::{
    ClientError,
    NodeRpc,
};

use crate::render;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Rpc(#[from] ClientError),
    #[error(transparent)]
    Heights(#[from] HeightError),
    #[error("block {height}: {source}")]
    Block {
        height: u64,
        source: BlockFieldError,
    },
    #[error("couldn't write the report: {0}")]
    Io(#[from] io::Error),
}

/*
 * Print the most recent blocks, newest first, and hand back what was printed.
 * The tip is read once, every block costs one `getblockhash` and one `getblock`.
 */
pub async fn report_recent_blocks<C, W, Tz>(
    client: &C,
    out: &mut W,
    tz: &Tz,
) -> Result<Vec<BlockSummary>, ReportError>
where
    C: NodeRpc + ?Sized,
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let tip = client.get_block_count().await?;
    tracing::info!("Chain tip is at height {}", tip);

    let heights = recent_heights(tip, RECENT_BLOCKS)?;

    render::banner(out, RECENT_BLOCKS)?;

    let mut blocks = Vec::with_capacity(heights.len());

    for height in heights {
        let hash = client.get_block_hash(height).await?;
        let body = client.get_block(&hash).await?;

        let summary = BlockSummary::from_block(BlockRef::new(height, hash), body)
            .map_err(|source| ReportError::Block { height, source })?;

        render::block(out, &summary, tz)?;

        tracing::info!(
            "Reported block {} ({} transactions)",
            summary.height,
            summary.tx_count
        );

        blocks.push(summary);
    }

    out.flush()?;

    Ok(blocks)
}
