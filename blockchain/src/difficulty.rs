use crate::BlockSummary;

/// Compact encoding of the highest possible target (difficulty 1).
pub static MAX_TARGET_BITS: u32 = 0x1d00ffff;

/*
 * Expand the compact `bits` representation into the full target
 */
pub fn bits_to_target(bits: u32) -> f64 {
    let exponent = (bits >> 24) as i32;
    let mantissa = f64::from(bits & 0x00ff_ffff);

    mantissa * 256f64.powi(exponent - 3)
}

pub fn bits_to_difficulty(bits: u32) -> f64 {
    let target = bits_to_target(bits);
    if target == 0.0 {
        return 0.0;
    }
    bits_to_target(MAX_TARGET_BITS) / target
}

/*
 * Target a block hash must stay under at the given difficulty
 */
pub fn difficulty_to_target(difficulty: f64) -> f64 {
    bits_to_target(MAX_TARGET_BITS) / difficulty
}

/*
 * Roughly how many leading hex zeros a valid block hash has at this difficulty.
 * Difficulty 1 already needs 8, every 4 bits of difficulty add one.
 */
pub fn approx_leading_zeros(difficulty: f64) -> u32 {
    if difficulty < 1.0 {
        return 8;
    }
    8 + (difficulty.log2() / 4.0) as u32
}

/// Block windows the network hashrate is sampled over.
pub static HASHRATE_WINDOWS: [u64; 3] = [10, 120, 2016];

/// Expected seconds between two blocks.
pub static TARGET_BLOCK_SPACING: u64 = 600;

/// How long `blocks` blocks take at the target spacing, in hours.
pub fn window_hours(blocks: u64) -> f64 {
    (blocks * TARGET_BLOCK_SPACING) as f64 / 3600.0
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DifficultyTrend {
    Increasing,
    Decreasing,
    Stable,
}

impl std::fmt::Display for DifficultyTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let trend = match self {
            DifficultyTrend::Increasing => "increasing",
            DifficultyTrend::Decreasing => "decreasing",
            DifficultyTrend::Stable => "stable",
        };
        write!(f, "{}", trend)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DifficultySummary {
    pub current: f64,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub trend: DifficultyTrend,
}

impl DifficultySummary {
    /*
     * Blocks are expected newest first, as the reporter fetches them.
     * Blocks without a readable `bits` field are skipped.
     */
    pub fn from_blocks(blocks: &[BlockSummary]) -> Option<Self> {
        let difficulties = blocks
            .iter()
            .filter_map(BlockSummary::bits)
            .map(bits_to_difficulty)
            .collect::<Vec<f64>>();

        let current = *difficulties.first()?;
        let oldest = *difficulties.last()?;

        let trend = if current > oldest {
            DifficultyTrend::Increasing
        } else if current < oldest {
            DifficultyTrend::Decreasing
        } else {
            DifficultyTrend::Stable
        };

        Some(Self {
            current,
            average: difficulties.iter().sum::<f64>() / difficulties.len() as f64,
            min: difficulties.iter().copied().fold(f64::INFINITY, f64::min),
            max: difficulties.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            trend,
        })
    }
}

/// Seconds elapsed between consecutive blocks.
#[derive(Clone, Debug, PartialEq)]
pub struct IntervalSummary {
    pub intervals: Vec<i64>,
    pub average: f64,
    pub min: i64,
    pub max: i64,
}

impl IntervalSummary {
    pub fn from_blocks(blocks: &[BlockSummary]) -> Option<Self> {
        // Block timestamps are not monotonic, so intervals may be negative
        let intervals = blocks
            .windows(2)
            .map(|pair| pair[0].time - pair[1].time)
            .collect::<Vec<i64>>();

        let min = *intervals.iter().min()?;
        let max = *intervals.iter().max()?;

        Some(Self {
            average: intervals.iter().sum::<i64>() as f64 / intervals.len() as f64,
            min,
            max,
            intervals,
        })
    }
}
