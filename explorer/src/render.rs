use std::{
    fmt::Display,
    io::{
        self,
        Write,
    },
};

use blockchain::{
    approx_leading_zeros,
    difficulty_to_target,
    window_hours,
    BlockSummary,
    DifficultySummary,
    IntervalSummary,
};
use chrono::TimeZone;
use client::{
    BlockTemplate,
    MiningInfo,
};

pub static DIVIDER_WIDTH: usize = 64;
pub static TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

/*
 * Pad `title` with `fill` on both sides up to the divider width
 */
fn divider(title: &str, fill: char) -> String {
    let padding = DIVIDER_WIDTH.saturating_sub(title.chars().count());
    let left = padding / 2;
    let right = padding - left;

    format!(
        "{}{}{}",
        fill.to_string().repeat(left),
        title,
        fill.to_string().repeat(right)
    )
}

pub fn banner<W: Write>(out: &mut W, count: u64) -> io::Result<()> {
    writeln!(out, "{}", divider(&format!(" {} MOST RECENT BLOCKS ", count), '═'))
}

pub fn format_time<Tz: TimeZone>(summary: &BlockSummary, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    match summary.time_in(tz) {
        Some(time) => time.format(TIME_FORMAT).to_string(),
        None => format!("{} (unix)", summary.time),
    }
}

pub fn block<W: Write, Tz: TimeZone>(out: &mut W, summary: &BlockSummary, tz: &Tz) -> io::Result<()>
where
    Tz::Offset: Display,
{
    writeln!(out)?;
    writeln!(out, "{}", divider(&format!(" Block {} ", summary.height), '─'))?;
    writeln!(out, "Hash: {}", summary.hash)?;
    writeln!(out, "Transactions: {}", summary.tx_count)?;
    writeln!(out, "Size: {} bytes", summary.size_bytes)?;
    writeln!(out, "Time: {}", format_time(summary, tz))?;
    writeln!(out)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&summary.details)?)?;
    writeln!(out, "{}", "─".repeat(DIVIDER_WIDTH))
}

pub fn mining_info<W: Write>(out: &mut W, info: &MiningInfo) -> io::Result<()> {
    writeln!(out, "{}", divider(" MINING INFO ", '═'))?;
    writeln!(out, "Network: {}", info.chain)?;
    writeln!(out, "Blocks: {}", info.blocks)?;
    writeln!(out, "Difficulty: {:.2}", info.difficulty)?;
    writeln!(
        out,
        "Network hashrate: {:.0} H/s ({:.2} TH/s)",
        info.network_hash_ps,
        info.network_hash_ps / 1e12
    )?;
    writeln!(out, "Pending transactions: {}", info.pooled_tx)?;
    writeln!(out)
}

pub fn block_template<W: Write>(out: &mut W, template: &BlockTemplate) -> io::Result<()> {
    writeln!(out, "{}", divider(" BLOCK TEMPLATE ", '═'))?;
    writeln!(out, "Height: {}", template.height)?;
    writeln!(out, "Bits: {}", template.bits)?;
    writeln!(out, "Previous block: {}", template.previous_block_hash)?;
    writeln!(out, "Coinbase value: {} sats", template.coinbase_value)?;
    writeln!(out, "Transactions: {}", template.transactions.len())?;
    match template.top_fee() {
        Some(fee) => writeln!(out, "Top fee: {} sats", fee)?,
        None => writeln!(out, "Top fee: none")?,
    }
    writeln!(out, "Total fees: {} sats", template.total_fees())?;
    writeln!(out)
}

/*
 * `samples` pairs a block window with the hashrate the node estimated over it
 */
pub fn hashrate<W: Write>(out: &mut W, samples: &[(u64, f64)], difficulty: f64) -> io::Result<()> {
    writeln!(out, "{}", divider(" NETWORK HASHRATE ", '═'))?;
    for (blocks, hashes_per_second) in samples {
        writeln!(
            out,
            "Last {} blocks (~{:.2} hours): {:.0} H/s ({:.2} TH/s)",
            blocks,
            window_hours(*blocks),
            hashes_per_second,
            hashes_per_second / 1e12
        )?;
    }
    writeln!(out, "Difficulty: {:.2}", difficulty)?;
    writeln!(out, "Target: {:.6e}", difficulty_to_target(difficulty))?;
    writeln!(out, "Leading zeros: ~{}", approx_leading_zeros(difficulty))?;
    writeln!(out)
}

/*
 * Difficulty and timing over the reported blocks, newest first
 */
pub fn analysis<W: Write>(out: &mut W, blocks: &[BlockSummary]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", divider(" ANALYSIS ", '═'))?;

    match DifficultySummary::from_blocks(blocks) {
        Some(difficulty) => {
            writeln!(out, "Current difficulty: {:.2}", difficulty.current)?;
            writeln!(out, "Average difficulty: {:.2}", difficulty.average)?;
            writeln!(
                out,
                "Difficulty range: {:.2} - {:.2}",
                difficulty.min, difficulty.max
            )?;
            writeln!(out, "Difficulty trend: {}", difficulty.trend)?;
        }
        None => writeln!(out, "Difficulty: no readable `bits` field")?,
    }

    if let Some(intervals) = IntervalSummary::from_blocks(blocks) {
        writeln!(out)?;
        for (pair, seconds) in blocks.windows(2).zip(&intervals.intervals) {
            writeln!(
                out,
                "Time between block {} and {}: {} seconds ({:.2} minutes)",
                pair[1].height,
                pair[0].height,
                seconds,
                *seconds as f64 / 60.0
            )?;
        }
        writeln!(out, "Average interval: {:.1} seconds", intervals.average)?;
        writeln!(
            out,
            "Interval range: {} - {} seconds",
            intervals.min, intervals.max
        )?;
    }

    writeln!(out, "{}", "═".repeat(DIVIDER_WIDTH))
}
