//! Shared fixtures: a mocked JSON-RPC node and runner settings pointing at it

#![allow(dead_code)]

use std::time::Duration;

use evm_probe::config::Settings;
use evm_probe::domain::Derivation;
use evm_probe::infrastructure::ProviderConfig;
use httpmock::{Method, Mock, MockServer};
use serde_json::{json, Value};
use zeroize::Zeroizing;

pub const TEST_PHRASE: &str = "test test test test test test test test test test test junk";
pub const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const CHAIN_ID: u64 = 111;

pub const TX_HASH: &str = "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060";
pub const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

pub fn settings(rpc: &str, mnemonic: Option<&str>) -> Settings {
    Settings {
        provider: ProviderConfig::Http(rpc.to_string()),
        chain_id: CHAIN_ID,
        mnemonic: mnemonic.map(|phrase| Zeroizing::new(phrase.to_string())),
        derivation: Derivation::default(),
        artifact: None,
        poll_interval: Duration::from_millis(10),
        receipt_timeout: Duration::from_secs(2),
    }
}

/// Answer every request whose body mentions `method` with `result`
pub async fn mock_result<'a>(server: &'a MockServer, method: &str, result: Value) -> Mock<'a> {
    server
        .mock_async(|when, then| {
            when.method(Method::POST)
                .path("/")
                .body_contains(format!("\"{}\"", method));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ "jsonrpc": "2.0", "id": 0, "result": result }));
        })
        .await
}

/// Answer `method` with a JSON-RPC error object
pub async fn mock_error<'a>(server: &'a MockServer, method: &str, message: &str) -> Mock<'a> {
    server
        .mock_async(|when, then| {
            when.method(Method::POST)
                .path("/")
                .body_contains(format!("\"{}\"", method));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "jsonrpc": "2.0",
                    "id": 0,
                    "error": { "code": -32000, "message": message }
                }));
        })
        .await
}

pub fn latest_block() -> Value {
    json!({
        "number": "0x1b4",
        "hash": "0xdc0818cf78f21a8e70579cb46a43643f78291264dda342ae31049421c82d21ae",
        "parentHash": "0xe99e022112df268087ea7eafaf4790497fd21dbeeb6bd7a1721df161a6657a54",
        "timestamp": "0x6553f100",
        "gasUsed": "0x5208",
        "gasLimit": "0x1c9c380",
        "miner": "0x0000000000000000000000000000000000000000",
        "transactions": [
            "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b"
        ]
    })
}

pub fn receipt(status: &str, contract_address: Option<&str>) -> Value {
    json!({
        "transactionHash": TX_HASH,
        "transactionIndex": "0x0",
        "blockHash": "0xdc0818cf78f21a8e70579cb46a43643f78291264dda342ae31049421c82d21ae",
        "blockNumber": "0x1b5",
        "from": TEST_ADDRESS,
        "to": null,
        "cumulativeGasUsed": "0x2f4d1",
        "gasUsed": "0x2f4d1",
        "effectiveGasPrice": "0x3b9aca00",
        "contractAddress": contract_address,
        "logs": [],
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "status": status,
        "type": "0x0"
    })
}

/// Mocks for nonce, gas price, gas estimate and raw submission
pub async fn mock_send_path(server: &MockServer) {
    mock_result(server, "eth_getTransactionCount", json!("0x3")).await;
    mock_result(server, "eth_gasPrice", json!("0x3b9aca00")).await;
    mock_result(server, "eth_estimateGas", json!("0x30d40")).await;
    mock_result(server, "eth_sendRawTransaction", json!(TX_HASH)).await;
}

pub fn uint_word(value: u64) -> Value {
    json!(format!("0x{:064x}", value))
}
