//! Deploy, call and network flows against a mocked node

mod common;

use alloy::primitives::Address;
use evm_probe::modules::{call, deploy, network};
use evm_probe::{ExampleRunner, ProbeError};
use httpmock::MockServer;
use serde_json::json;

use common::{
    mock_result, mock_send_path, receipt, settings, uint_word, CONTRACT, TEST_PHRASE, TX_HASH,
};

async fn runner(server: &MockServer, mnemonic: Option<&str>) -> ExampleRunner {
    ExampleRunner::new(settings(&server.base_url(), mnemonic))
        .await
        .unwrap()
}

fn contract() -> Address {
    CONTRACT.parse().unwrap()
}

#[tokio::test]
async fn test_deploy_reads_back_counter() {
    let server = MockServer::start_async().await;
    mock_send_path(&server).await;
    mock_result(&server, "eth_getTransactionReceipt", receipt("0x1", Some(CONTRACT))).await;
    let get = mock_result(&server, "eth_call", uint_word(0)).await;

    let runner = runner(&server, Some(TEST_PHRASE)).await;
    let mut out = Vec::new();
    let deployment = deploy::deploy(&runner, &mut out).await.unwrap();

    get.assert_async().await;
    assert_eq!(deployment.address, contract());
    assert_eq!(deployment.tx_hash.to_string(), TX_HASH);
    assert_eq!(deployment.gas_used, 0x2f4d1);
    assert_eq!(deployment.probe_value.as_deref(), Some("0"));

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains(&format!("transaction: {}", TX_HASH)));
    assert!(printed.contains(&format!("contract: {}", CONTRACT)));
    assert!(printed.ends_with("get(): 0\n"));
}

#[tokio::test]
async fn test_deploy_submits_signed_creation_bytecode() {
    let server = MockServer::start_async().await;
    mock_result(&server, "eth_getTransactionCount", json!("0x0")).await;
    mock_result(&server, "eth_gasPrice", json!("0x1")).await;
    mock_result(&server, "eth_estimateGas", json!("0x30d40")).await;
    // Legacy creation tx: RLP list carries the bytecode right after an empty `to`
    let send = server
        .mock_async(|when, then| {
            when.body_contains("\"eth_sendRawTransaction\"")
                .body_contains("608060405260008055");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ "jsonrpc": "2.0", "id": 0, "result": TX_HASH }));
        })
        .await;
    mock_result(&server, "eth_getTransactionReceipt", receipt("0x1", Some(CONTRACT))).await;
    mock_result(&server, "eth_call", uint_word(0)).await;

    let runner = runner(&server, Some(TEST_PHRASE)).await;
    deploy::deploy(&runner, &mut Vec::new()).await.unwrap();

    send.assert_async().await;
}

#[tokio::test]
async fn test_deploy_without_contract_address_fails() {
    let server = MockServer::start_async().await;
    mock_send_path(&server).await;
    mock_result(&server, "eth_getTransactionReceipt", receipt("0x1", None)).await;

    let runner = runner(&server, Some(TEST_PHRASE)).await;
    let err = deploy::deploy(&runner, &mut Vec::new()).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ProbeError>(),
        Some(ProbeError::NoContractAddress(_))
    ));
}

#[tokio::test]
async fn test_reverted_deploy_fails() {
    let server = MockServer::start_async().await;
    mock_send_path(&server).await;
    mock_result(&server, "eth_getTransactionReceipt", receipt("0x0", None)).await;

    let runner = runner(&server, Some(TEST_PHRASE)).await;
    let err = deploy::deploy(&runner, &mut Vec::new()).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ProbeError>(),
        Some(ProbeError::TransactionReverted(_))
    ));
}

#[tokio::test]
async fn test_receipt_timeout() {
    let server = MockServer::start_async().await;
    mock_send_path(&server).await;
    let pending = mock_result(&server, "eth_getTransactionReceipt", serde_json::Value::Null).await;

    let mut settings = settings(&server.base_url(), Some(TEST_PHRASE));
    settings.receipt_timeout = std::time::Duration::from_millis(50);
    let runner = ExampleRunner::new(settings).await.unwrap();
    let err = deploy::deploy(&runner, &mut Vec::new()).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ProbeError>(),
        Some(ProbeError::ReceiptTimeout(_))
    ));
    assert!(pending.hits_async().await >= 2);
}

#[tokio::test]
async fn test_deploy_requires_mnemonic() {
    let server = MockServer::start_async().await;
    let nonce = mock_result(&server, "eth_getTransactionCount", json!("0x0")).await;

    let runner = runner(&server, None).await;
    let err = deploy::deploy(&runner, &mut Vec::new()).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ProbeError>(),
        Some(ProbeError::MissingMnemonic)
    ));
    assert_eq!(nonce.hits_async().await, 0);
}

#[tokio::test]
async fn test_read_only_call_prints_outputs() {
    let server = MockServer::start_async().await;
    mock_result(&server, "eth_call", uint_word(5)).await;

    // No mnemonic needed for view functions
    let runner = runner(&server, None).await;
    let mut out = Vec::new();
    let outcome = call::call(&runner, contract(), "count", &[], &mut out)
        .await
        .unwrap();

    match outcome {
        call::CallOutcome::Read(outputs) => assert_eq!(outputs[0].value, "5"),
        other => panic!("expected read outcome, got {:?}", other),
    }
    assert_eq!(String::from_utf8(out).unwrap(), "out0 (uint256): 5\n");
}

#[tokio::test]
async fn test_state_changing_call_is_sent() {
    let server = MockServer::start_async().await;
    mock_send_path(&server).await;
    mock_result(&server, "eth_getTransactionReceipt", receipt("0x1", None)).await;
    let eth_call = mock_result(&server, "eth_call", uint_word(0)).await;

    let runner = runner(&server, Some(TEST_PHRASE)).await;
    let args = vec!["2".to_string(), "3".to_string()];
    let mut out = Vec::new();
    let outcome = call::call(&runner, contract(), "moreInstruction", &args, &mut out)
        .await
        .unwrap();

    assert!(matches!(outcome, call::CallOutcome::Sent { gas_used: 0x2f4d1, .. }));
    assert_eq!(eth_call.hits_async().await, 0);
    assert!(String::from_utf8(out).unwrap().contains("status: success"));
}

#[tokio::test]
async fn test_call_unknown_function() {
    let server = MockServer::start_async().await;
    let runner = runner(&server, None).await;

    let err = call::call(&runner, contract(), "transfer", &[], &mut Vec::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ProbeError>(),
        Some(ProbeError::UnknownFunction(name)) if name == "transfer"
    ));
}

#[tokio::test]
async fn test_network_check() {
    let server = MockServer::start_async().await;
    mock_result(&server, "eth_chainId", json!("0x6f")).await;
    mock_result(&server, "web3_clientVersion", json!("Neon/v1.0.0")).await;
    mock_result(&server, "eth_blockNumber", json!("0x1b4")).await;

    let runner = runner(&server, None).await;
    let mut out = Vec::new();
    let info = network::check_network(&runner, &mut out).await.unwrap();

    assert_eq!(info.chain_id, 111);
    assert_eq!(info.client_version.as_deref(), Some("Neon/v1.0.0"));
    assert_eq!(info.block_number, 436);
    assert_eq!(info.balance, None);
    assert!(String::from_utf8(out).unwrap().contains("chain id: 111"));
}

#[tokio::test]
async fn test_network_check_reports_wallet_balance() {
    let server = MockServer::start_async().await;
    mock_result(&server, "eth_chainId", json!("0x6f")).await;
    mock_result(&server, "web3_clientVersion", json!("Neon/v1.0.0")).await;
    mock_result(&server, "eth_blockNumber", json!("0x1b4")).await;
    let balance = mock_result(&server, "eth_getBalance", json!("0x14d1120d7b160000")).await;

    let runner = runner(&server, Some(TEST_PHRASE)).await;
    let mut out = Vec::new();
    let info = network::check_network(&runner, &mut out).await.unwrap();

    balance.assert_async().await;
    assert_eq!(
        info.balance,
        Some(alloy::primitives::U256::from(1_500_000_000_000_000_000u64))
    );
    assert!(String::from_utf8(out)
        .unwrap()
        .contains(&format!("wallet: {} (1.5 ETH)", common::TEST_ADDRESS)));
}

#[tokio::test]
async fn test_network_chain_mismatch() {
    let server = MockServer::start_async().await;
    mock_result(&server, "eth_chainId", json!("0x1")).await;

    let runner = runner(&server, None).await;
    let err = network::check_network(&runner, &mut Vec::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ProbeError>(),
        Some(ProbeError::ChainMismatch {
            expected: 111,
            actual: 1
        })
    ));
}
