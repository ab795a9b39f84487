use chrono::{
    DateTime,
    TimeZone,
};
use serde::{
    Deserialize,
    Serialize,
};
use serde_json::{
    Map,
    Value,
};

/// Key holding the block's transaction list in a `getblock` response.
pub static TRANSACTIONS_KEY: &str = "tx";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRef {
    pub height: u64,
    pub hash: String,
}

impl BlockRef {
    pub fn new(height: u64, hash: impl Into<String>) -> Self {
        Self {
            height,
            hash: hash.into(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BlockFieldError {
    #[error("block body is not a JSON object")]
    NotAnObject,
    #[error("block body has no `{0}` field")]
    MissingField(&'static str),
    #[error("block field `{0}` is not a non-negative integer")]
    InvalidField(&'static str),
}

/// The display fields of one block, plus its metadata without the transaction list.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BlockSummary {
    pub height: u64,
    pub hash: String,
    pub tx_count: u64,
    pub size_bytes: u64,
    pub time: i64,
    pub details: Map<String, Value>,
}

impl BlockSummary {
    /*
     * Build a summary out of a verbose `getblock` body
     */
    pub fn from_block(block_ref: BlockRef, body: Value) -> Result<Self, BlockFieldError> {
        let body = match body {
            Value::Object(body) => body,
            _ => return Err(BlockFieldError::NotAnObject),
        };

        let time = unsigned_field(&body, "time")?;
        let size_bytes = unsigned_field(&body, "size")?;
        let tx_count = unsigned_field(&body, "nTx")?;

        let time = i64::try_from(time).map_err(|_| BlockFieldError::InvalidField("time"))?;

        Ok(Self {
            height: block_ref.height,
            hash: block_ref.hash,
            tx_count,
            size_bytes,
            time,
            details: strip_transactions(body),
        })
    }

    pub fn time_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        tz.timestamp_opt(self.time, 0).single()
    }

    /*
     * Compact difficulty target, the node sends it as a hex string
     */
    pub fn bits(&self) -> Option<u32> {
        self.details
            .get("bits")
            .and_then(Value::as_str)
            .and_then(|bits| u32::from_str_radix(bits, 16).ok())
    }
}

fn unsigned_field(body: &Map<String, Value>, name: &'static str) -> Result<u64, BlockFieldError> {
    body.get(name)
        .ok_or(BlockFieldError::MissingField(name))?
        .as_u64()
        .ok_or(BlockFieldError::InvalidField(name))
}

/*
 * Drop the transaction list, keeping every other key where the node put it
 */
pub fn strip_transactions(body: Map<String, Value>) -> Map<String, Value> {
    body.into_iter()
        .filter(|(key, _)| key != TRANSACTIONS_KEY)
        .collect()
}
