mod block;
mod chain_height;
mod configuration;
mod difficulty;

pub use block::{
    strip_transactions,
    BlockFieldError,
    BlockRef,
    BlockSummary,
    TRANSACTIONS_KEY,
};
pub use chain_height::{
    recent_heights,
    HeightError,
    RECENT_BLOCKS,
};
pub use configuration::{
    default_datadir,
    ConfigError,
    Configuration,
    Network,
    RpcAuth,
    COOKIE_FILE_NAME,
    CONF_FILE_NAME,
    DEFAULT_HOST,
};
pub use difficulty::{
    approx_leading_zeros,
    bits_to_difficulty,
    bits_to_target,
    difficulty_to_target,
    window_hours,
    DifficultySummary,
    DifficultyTrend,
    IntervalSummary,
    HASHRATE_WINDOWS,
    MAX_TARGET_BITS,
    TARGET_BLOCK_SPACING,
};
