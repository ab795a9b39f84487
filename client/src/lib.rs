use async_trait::async_trait;
use blockchain::{
    ConfigError,
    Configuration,
};
use jsonrpc_core::{
    Id,
    MethodCall,
    Params,
    Version,
};
use reqwest::StatusCode;
use serde::{
    de::DeserializeOwned,
    Deserialize,
};
use serde_json::{
    json,
    Value,
};
use std::sync::{
    atomic::{
        AtomicU64,
        Ordering,
    },
    Arc,
};

pub type RpcResult<T> = Result<T, ClientError>;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("couldn't reach the node: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("the node rejected the RPC credentials")]
    Unauthorized,
    #[error("the node answered `{method}` with HTTP {status}")]
    Http { method: String, status: StatusCode },
    #[error("`{method}` failed with RPC error {code}: {message}")]
    Rpc {
        method: String,
        code: i64,
        message: String,
    },
    #[error("unexpected response to `{method}`: {source}")]
    InvalidResponse {
        method: String,
        source: serde_json::Error,
    },
    #[error("`{0}` returned no result")]
    MissingResult(String),
}

/*
 * Response envelope, older nodes send both fields with one of them set to null
 */
#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<jsonrpc_core::Error>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MiningInfo {
    pub blocks: u64,
    pub difficulty: f64,
    #[serde(rename = "networkhashps")]
    pub network_hash_ps: f64,
    #[serde(rename = "pooledtx")]
    pub pooled_tx: u64,
    pub chain: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TemplateTransaction {
    pub txid: String,
    /// Fee in satoshis.
    pub fee: u64,
}

/// The parts of a `getblocktemplate` response a miner looks at first.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BlockTemplate {
    pub height: u64,
    pub bits: String,
    #[serde(rename = "previousblockhash")]
    pub previous_block_hash: String,
    /// Subsidy plus fees, in satoshis.
    #[serde(rename = "coinbasevalue")]
    pub coinbase_value: u64,
    pub transactions: Vec<TemplateTransaction>,
}

impl BlockTemplate {
    pub fn top_fee(&self) -> Option<u64> {
        self.transactions.iter().map(|tx| tx.fee).max()
    }

    pub fn total_fees(&self) -> u64 {
        self.transactions.iter().map(|tx| tx.fee).sum()
    }
}

/// The node calls the reporter depends on.
#[async_trait]
pub trait NodeRpc {
    async fn get_block_count(&self) -> RpcResult<u64>;

    async fn get_block_hash(&self, height: u64) -> RpcResult<String>;

    /// Verbose block body, transaction ids included.
    async fn get_block(&self, hash: &str) -> RpcResult<Value>;

    async fn get_mining_info(&self) -> RpcResult<MiningInfo>;

    async fn get_block_template(&self) -> RpcResult<BlockTemplate>;

    /// Estimated network hashes per second over the last `blocks` blocks.
    async fn get_network_hash_ps(&self, blocks: u64) -> RpcResult<f64>;

    async fn get_difficulty(&self) -> RpcResult<f64>;
}

/*
 * Bitcoin Core JSON-RPC client over HTTP
 */
#[derive(Clone)]
pub struct RPCClient {
    http: reqwest::Client,
    url: String,
    user: String,
    password: String,
    next_id: Arc<AtomicU64>,
}

impl RPCClient {
    pub fn new(config: &Configuration) -> RpcResult<Self> {
        let (user, password) = config.auth.credentials()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let url = config.url();
        tracing::debug!("RPC client for {}", url);

        Ok(Self {
            http: builder.build()?,
            url,
            user,
            password,
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /*
     * Call a method and decode its result
     */
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Vec<Value>) -> RpcResult<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = MethodCall {
            jsonrpc: Some(Version::V2),
            method: method.to_string(),
            params: Params::Array(params),
            id: Id::Num(id),
        };

        tracing::debug!("-> {} (id {})", method, id);

        let response = self
            .http
            .post(&self.url)
            .basic_auth(&self.user, Some(&self.password))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }

        // RPC errors come with a non 2xx status but still carry a JSON body
        let body = response.bytes().await?;
        let response: RpcResponse = match serde_json::from_slice(&body) {
            Ok(response) => response,
            Err(_) if !status.is_success() => {
                return Err(ClientError::Http {
                    method: method.to_string(),
                    status,
                })
            }
            Err(source) => {
                return Err(ClientError::InvalidResponse {
                    method: method.to_string(),
                    source,
                })
            }
        };

        if let Some(error) = response.error {
            tracing::debug!("<- {} failed: {}", method, error.message);
            return Err(ClientError::Rpc {
                method: method.to_string(),
                code: error.code.code(),
                message: error.message,
            });
        }

        let result = response
            .result
            .ok_or_else(|| ClientError::MissingResult(method.to_string()))?;

        serde_json::from_value(result).map_err(|source| ClientError::InvalidResponse {
            method: method.to_string(),
            source,
        })
    }
}

#[async_trait]
impl NodeRpc for RPCClient {
    async fn get_block_count(&self) -> RpcResult<u64> {
        self.call("getblockcount", vec![]).await
    }

    async fn get_block_hash(&self, height: u64) -> RpcResult<String> {
        self.call("getblockhash", vec![json!(height)]).await
    }

    async fn get_block(&self, hash: &str) -> RpcResult<Value> {
        self.call("getblock", vec![json!(hash), json!(1)]).await
    }

    async fn get_mining_info(&self) -> RpcResult<MiningInfo> {
        self.call("getmininginfo", vec![]).await
    }

    async fn get_block_template(&self) -> RpcResult<BlockTemplate> {
        // The node refuses templates without the segwit rule
        self.call("getblocktemplate", vec![json!({ "rules": ["segwit"] })])
            .await
    }

    async fn get_network_hash_ps(&self, blocks: u64) -> RpcResult<f64> {
        self.call("getnetworkhashps", vec![json!(blocks)]).await
    }

    async fn get_difficulty(&self) -> RpcResult<f64> {
        self.call("getdifficulty", vec![]).await
    }
}
