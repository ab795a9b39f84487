use blockchain::{
    BlockRef,
    BlockSummary,
};
use chrono::Utc;
use client::{
    BlockTemplate,
    MiningInfo,
    TemplateTransaction,
};
use explorer::render;
use serde_json::json;

fn block(height: u64, time: i64, bits: &str) -> BlockSummary {
    BlockSummary::from_block(
        BlockRef::new(height, format!("{:064x}", height)),
        json!({
            "bits": bits,
            "time": time,
            "size": 250,
            "nTx": 2,
            "tx": ["a", "b"]
        }),
    )
    .unwrap()
}

#[test]
fn banner_is_fixed_width() {
    let mut out = Vec::new();
    render::banner(&mut out, 10).unwrap();

    let out = String::from_utf8(out).unwrap();
    assert_eq!(out.trim_end().chars().count(), render::DIVIDER_WIDTH);
    assert!(out.starts_with('═'));
    assert!(out.contains(" 10 MOST RECENT BLOCKS "));
}

#[test]
fn pretty_json_without_transactions() {
    let mut out = Vec::new();
    render::block(&mut out, &block(7, 1231006505, "1d00ffff"), &Utc).unwrap();

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("Time: 2009-01-03 18:15:05 +00:00\n"));
    assert!(out.contains(
        "{\n  \"bits\": \"1d00ffff\",\n  \"time\": 1231006505,\n  \"size\": 250,\n  \"nTx\": 2\n}\n"
    ));
}

#[test]
fn analysis_section() {
    let blocks = vec![
        block(3, 1_000, "1b0404cb"),
        block(2, 400, "1d00ffff"),
        block(1, 100, "1d00ffff"),
    ];
    let mut out = Vec::new();

    render::analysis(&mut out, &blocks).unwrap();

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("Current difficulty: 16307.42\n"));
    assert!(out.contains("Difficulty range: 1.00 - 16307.42\n"));
    assert!(out.contains("Difficulty trend: increasing\n"));
    assert!(out.contains("Time between block 2 and 3: 600 seconds (10.00 minutes)\n"));
    assert!(out.contains("Time between block 1 and 2: 300 seconds (5.00 minutes)\n"));
    assert!(out.contains("Average interval: 450.0 seconds\n"));
    assert!(out.contains("Interval range: 300 - 600 seconds\n"));
}

#[test]
fn analysis_without_bits() {
    let mut blocks = vec![block(1, 100, "1d00ffff")];
    blocks[0].details.remove("bits");
    let mut out = Vec::new();

    render::analysis(&mut out, &blocks).unwrap();

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("Difficulty: no readable `bits` field\n"));
    assert!(!out.contains("Time between"));
}

#[test]
fn mining_info_section() {
    let info = MiningInfo {
        blocks: 935956,
        difficulty: 125864590119494.3,
        network_hash_ps: 9.124053172201868e+20,
        pooled_tx: 6715,
        chain: "main".to_string(),
    };
    let mut out = Vec::new();

    render::mining_info(&mut out, &info).unwrap();

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("Network: main\n"));
    assert!(out.contains("Blocks: 935956\n"));
    assert!(out.contains("Difficulty: 125864590119494.30\n"));
    assert!(out.contains("(912405317.22 TH/s)"));
    assert!(out.contains("Pending transactions: 6715\n"));
}

#[test]
fn block_template_section() {
    let mut template = BlockTemplate {
        height: 935957,
        bits: "17023c7e".to_string(),
        previous_block_hash: "00000000000000000002a7c4".to_string(),
        coinbase_value: 312598000,
        transactions: vec![
            TemplateTransaction {
                txid: "aa".to_string(),
                fee: 1200,
            },
            TemplateTransaction {
                txid: "bb".to_string(),
                fee: 98000,
            },
        ],
    };
    let mut out = Vec::new();

    render::block_template(&mut out, &template).unwrap();

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains(" BLOCK TEMPLATE "));
    assert!(out.contains("Height: 935957\n"));
    assert!(out.contains("Bits: 17023c7e\n"));
    assert!(out.contains("Previous block: 00000000000000000002a7c4\n"));
    assert!(out.contains("Coinbase value: 312598000 sats\n"));
    assert!(out.contains("Transactions: 2\n"));
    assert!(out.contains("Top fee: 98000 sats\n"));
    assert!(out.contains("Total fees: 99200 sats\n"));

    template.transactions.clear();
    let mut out = Vec::new();
    render::block_template(&mut out, &template).unwrap();

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("Transactions: 0\n"));
    assert!(out.contains("Top fee: none\n"));
}

#[test]
fn hashrate_section() {
    let samples = [(10, 8.5e20), (120, 9.0e20), (2016, 1.0e21)];
    let mut out = Vec::new();

    render::hashrate(&mut out, &samples, 1.0).unwrap();

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains(" NETWORK HASHRATE "));
    assert!(out.contains(
        "Last 10 blocks (~1.67 hours): 850000000000000000000 H/s (850000000.00 TH/s)\n"
    ));
    assert!(out.contains("Last 120 blocks (~20.00 hours): "));
    assert!(out.contains("Last 2016 blocks (~336.00 hours): "));
    assert!(out.contains("Difficulty: 1.00\n"));
    assert!(out.contains("Target: 2.695954e67\n"));
    assert!(out.contains("Leading zeros: ~8\n"));
}
