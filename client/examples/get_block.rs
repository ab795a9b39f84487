use blockchain::Configuration;
use client::{
    NodeRpc,
    RPCClient,
};

/*
 * Print the raw verbose body of the block at the given height
 */
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let height = std::env::args()
        .nth(1)
        .ok_or("usage: get_block <height>")?
        .parse::<u64>()?;

    let config = Configuration::load(None, None)?;
    let client = RPCClient::new(&config)?;

    let hash = client.get_block_hash(height).await?;
    let block = client.get_block(&hash).await?;

    println!("{} -> {}", height, serde_json::to_string_pretty(&block)?);

    Ok(())
}
