/// How many blocks a report covers, counting the tip.
pub static RECENT_BLOCKS: u64 = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HeightError {
    #[error("chain tip is at height {tip}, so there are fewer than {count} blocks to report")]
    ChainTooShort { tip: u64, count: u64 },
}

/*
 * Heights of the `count` most recent blocks, newest first.
 * The tip is a snapshot, blocks mined afterwards are not picked up.
 */
pub fn recent_heights(tip: u64, count: u64) -> Result<Vec<u64>, HeightError> {
    if tip.saturating_add(1) < count {
        return Err(HeightError::ChainTooShort { tip, count });
    }

    Ok((0..count).map(|i| tip - i).collect())
}
