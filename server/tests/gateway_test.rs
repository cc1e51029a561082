use std::sync::Arc;

use axum::http::StatusCode;
use tokio::test;

use flightsurety_server::config::DeploymentConfig;
use flightsurety_server::error::{ConfigError, GatewayError};
use flightsurety_server::eth::abi::{self, ParamKind, Token};
use flightsurety_server::eth::{parse_address, Log, U256};
use flightsurety_server::gateway::events::{flight_status_info_topic, oracle_request_topic};
use flightsurety_server::gateway::{methods, FlightSuretyGateway, GatewayOptions};
use flightsurety_server::models::ContractEvent;

use mock_chain::{deployment_config, MockChainClient, APP_ADDRESS};

async fn gateway_with(client: Arc<MockChainClient>) -> FlightSuretyGateway {
    FlightSuretyGateway::with_client(
        &deployment_config(),
        "localhost",
        client,
        GatewayOptions::default(),
    )
    .await
    .unwrap()
}

fn args(data: &[u8], kinds: &[ParamKind]) -> Vec<Token> {
    abi::decode(kinds, &data[4..]).unwrap()
}

#[test]
async fn missing_network_fails_before_touching_the_node() {
    let client = Arc::new(MockChainClient::with_accounts(12));

    let result = FlightSuretyGateway::with_client(
        &deployment_config(),
        "ropsten",
        client.clone(),
        GatewayOptions::default(),
    )
    .await;

    assert!(matches!(
        result,
        Err(GatewayError::Config(ConfigError::MissingNetwork(ref network))) if network == "ropsten"
    ));
    assert_eq!(client.request_count(), 0);
}

#[test]
async fn malformed_app_address_is_a_config_error() {
    let config = DeploymentConfig::from_json(
        r#"{"localhost": {
            "url": "http://localhost:8545",
            "dataAddress": "0x0",
            "appAddress": "nope"
        }}"#,
    )
    .unwrap();
    let client = Arc::new(MockChainClient::with_accounts(12));

    let options = GatewayOptions::default();
    let result =
        FlightSuretyGateway::with_client(&config, "localhost", client.clone(), options).await;

    assert!(matches!(result, Err(GatewayError::Config(_))));
    assert_eq!(client.request_count(), 0);
}

#[test]
async fn fetching_status_twice_sends_two_requests() {
    let client = Arc::new(MockChainClient::with_accounts(12));
    let gateway = gateway_with(client.clone()).await;

    let (first, _) = gateway.fetch_flight_status("ND1309").await.unwrap();
    let (second, _) = gateway.fetch_flight_status("ND1309").await.unwrap();

    let sent = client.sent.lock().await;
    assert_eq!(sent.len(), 2);
    assert_eq!(first.airline, client.accounts[1]);
    assert_eq!(second.flight, "ND1309");

    let selector = abi::selector(methods::FETCH_FLIGHT_STATUS);
    for request in sent.iter() {
        assert_eq!(request.from, client.accounts[0]);
        assert_eq!(request.to, parse_address(APP_ADDRESS).unwrap());
        assert_eq!(&request.data[..4], &selector);

        let tokens = args(&request.data, &[ParamKind::Address, ParamKind::String, ParamKind::Uint]);
        assert_eq!(tokens[0], Token::Address(client.accounts[1]));
        assert_eq!(tokens[1], Token::String("ND1309".into()));
    }
}

#[test]
async fn insurance_is_bought_by_the_first_passenger() {
    let client = Arc::new(MockChainClient::with_accounts(12));
    let gateway = gateway_with(client.clone()).await;
    let airline = client.accounts[2];

    gateway.purchase_insurance(airline, "MD101", "0.5").await.unwrap();

    let sent = client.sent.lock().await;
    let request = &sent[0];
    assert_eq!(request.from, client.accounts[6]);
    assert_eq!(request.value, Some(U256::from(500_000_000_000_000_000u64)));
    assert_eq!(&request.data[..4], &abi::selector(methods::BUY_INSURANCE));

    let tokens = args(&request.data, &[ParamKind::Address, ParamKind::String, ParamKind::Uint]);
    assert_eq!(tokens[0], Token::Address(airline));
    assert_eq!(tokens[1], Token::String("MD101".into()));
    match &tokens[2] {
        Token::Uint(timestamp) => assert!(*timestamp > U256::from(1_600_000_000u64)),
        other => panic!("unexpected timestamp token: {other:?}"),
    }
}

#[test]
async fn funding_is_paid_from_the_airline() {
    let client = Arc::new(MockChainClient::with_accounts(12));
    let gateway = gateway_with(client.clone()).await;
    let airline = client.accounts[3];

    gateway.submit_airline_funding(airline, "10").await.unwrap();

    let sent = client.sent.lock().await;
    assert_eq!(sent[0].from, airline);
    assert_eq!(sent[0].value, Some(U256::exp10(19)));
    assert_eq!(sent[0].data, abi::selector(methods::FUND).to_vec());
}

#[test]
async fn invalid_amount_never_reaches_the_node() {
    let client = Arc::new(MockChainClient::with_accounts(12));
    let gateway = gateway_with(client.clone()).await;
    let before = client.request_count();

    let err = gateway
        .submit_airline_funding(client.accounts[1], "ten")
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::InvalidInput(_)));
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(client.request_count(), before);
}

#[test]
async fn revert_is_classified() {
    let client = Arc::new(MockChainClient::with_accounts(12));
    client
        .fail_transactions_with(
            "VM Exception while processing transaction: revert Caller is not a registered airline",
        )
        .await;
    let gateway = gateway_with(client.clone()).await;

    let err = gateway
        .register_airline(client.accounts[2], "Second Air")
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Reverted(_)));
    assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[test]
async fn operational_flag_is_decoded() {
    let client = Arc::new(MockChainClient::with_accounts(12));
    client.return_from_calls(abi::encode(&[Token::Bool(true)])).await;
    let gateway = gateway_with(client.clone()).await;

    assert!(gateway.is_operational().await.unwrap());

    let calls = client.calls.lock().await;
    assert_eq!(calls[0].from, client.accounts[0]);
    assert_eq!(calls[0].data, abi::selector(methods::IS_OPERATIONAL).to_vec());
}

#[test]
async fn short_call_result_is_a_decode_error() {
    let client = Arc::new(MockChainClient::with_accounts(12));
    let gateway = gateway_with(client.clone()).await;

    let err = gateway.airline_count().await.unwrap_err();

    assert!(matches!(err, GatewayError::Decode(_)));
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
async fn oracle_indexes_are_read_as_three_values() {
    let client = Arc::new(MockChainClient::with_accounts(12));
    client
        .return_from_calls(abi::encode(&[
            Token::Uint(U256::from(2u8)),
            Token::Uint(U256::from(7u8)),
            Token::Uint(U256::from(9u8)),
        ]))
        .await;
    let gateway = gateway_with(client.clone()).await;

    let indexes = gateway.get_my_indexes(client.accounts[4]).await.unwrap();

    assert_eq!(indexes, [2, 7, 9]);
    assert_eq!(client.calls.lock().await[0].from, client.accounts[4]);
}

#[test]
async fn contract_events_come_back_in_chain_order() {
    let client = Arc::new(MockChainClient::with_accounts(12));
    let airline = client.accounts[1];
    let app = parse_address(APP_ADDRESS).unwrap();
    {
        let mut logs = client.logs.lock().await;
        logs.push(Log {
            address: app,
            topics: vec![flight_status_info_topic()],
            data: abi::encode(&[
                Token::Address(airline),
                Token::String("ND1309".into()),
                Token::Uint(U256::from(1_600_000_000u64)),
                Token::Uint(U256::from(20u8)),
            ]),
            block_number: 9,
            transaction_hash: None,
            log_index: 0,
        });
        logs.push(Log {
            address: app,
            topics: vec![oracle_request_topic()],
            data: vec![0u8; 12],
            block_number: 4,
            transaction_hash: None,
            log_index: 1,
        });
        logs.push(Log {
            address: app,
            topics: vec![oracle_request_topic()],
            data: abi::encode(&[
                Token::Uint(U256::from(5u8)),
                Token::Address(airline),
                Token::String("ND1309".into()),
                Token::Uint(U256::from(1_600_000_000u64)),
            ]),
            block_number: 4,
            transaction_hash: None,
            log_index: 0,
        });
    }
    let gateway = gateway_with(client.clone()).await;

    let events = gateway.contract_events(0, 10).await.unwrap();

    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], ContractEvent::OracleRequest(request) if request.index == 5));
    assert!(matches!(&events[1], ContractEvent::FlightStatusInfo(info) if info.status_code == 20));
}
