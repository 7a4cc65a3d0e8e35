use std::time::Duration;

use chrono::{TimeZone, Utc};
use treasury_swap_quotes::{
    cow::types::QuoteResponse,
    fakes::{sample_quote_response, FakeCowClient, FakeFailure, FakePriceOracle},
    ChainId, ErrorKind, SwapError, Uint256,
};

use crate::common::{fake_aggregator, quote_request, DAI, TREASURY, UNI, USDC, WETH};

#[tokio::test]
async fn test_usdc_to_weth_quote() {
    let (aggregator, gateway, oracle) = fake_aggregator(
        FakeCowClient::new(),
        FakePriceOracle::new().with_last_price(1800.50),
    );

    let quote = aggregator
        .quote_swap(&quote_request(USDC, WETH, "500000000"))
        .await
        .expect("quote should succeed");

    assert_eq!(quote.buy_amount, "250000000000000000".parse::<Uint256>().unwrap());
    assert_eq!(quote.sell_amount, Uint256::from(500_000_000u64));
    assert_eq!(quote.fee_amount, Uint256::from(10_000u64));
    assert_eq!(quote.buy_token_quote_rate, Some(1800.50));
    assert_eq!(
        quote.valid_to,
        Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap()
    );
    assert_eq!(quote.valid_to.to_rfc3339(), "2023-11-14T22:13:20+00:00");

    assert_eq!(gateway.quote_calls(), 1);
    assert_eq!(oracle.calls(), 1);

    let sent = gateway.last_quote_request().expect("quote request recorded");
    assert_eq!(sent.kind, "sell");
    assert_eq!(sent.sell_token, USDC);
    assert_eq!(sent.buy_token, WETH);
    assert_eq!(sent.from, TREASURY);
    assert_eq!(sent.sell_amount_before_fee, "500000000");
}

#[tokio::test]
async fn test_unlisted_buy_token_is_rejected_without_calls() {
    let (aggregator, gateway, oracle) =
        fake_aggregator(FakeCowClient::new(), FakePriceOracle::new());

    let err = aggregator
        .quote_swap(&quote_request(USDC, UNI, "500000000"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(err.public_message(), "buy token not available");
    assert_eq!(gateway.total_calls(), 0);
    assert_eq!(oracle.calls(), 0);
}

#[tokio::test]
async fn test_unsupported_chains_are_rejected_without_calls() {
    let (aggregator, gateway, oracle) =
        fake_aggregator(FakeCowClient::new(), FakePriceOracle::new());

    for chain in ["eip155:5", "eip155:100", "eip155:137", "cosmos:cosmoshub-4"] {
        let mut request = quote_request(USDC, WETH, "500000000");
        request.chain_id = chain.parse::<ChainId>().unwrap();

        let err = aggregator.quote_swap(&request).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "chain {chain}");
    }

    assert_eq!(gateway.total_calls(), 0);
    assert_eq!(oracle.calls(), 0);
}

#[tokio::test]
async fn test_sell_amount_does_not_cover_fee_propagates() {
    let (aggregator, _gateway, _oracle) = fake_aggregator(
        FakeCowClient::new().with_quote_error(FakeFailure::SellAmountDoesNotCoverFee),
        FakePriceOracle::new().with_last_price(1.0),
    );

    let err = aggregator
        .quote_swap(&quote_request(USDC, WETH, "1"))
        .await
        .unwrap_err();

    assert!(matches!(err, SwapError::SellAmountDoesNotCoverFee));
    assert_eq!(err.kind(), ErrorKind::SellAmountDoesNotCoverFee);
    assert_eq!(err.public_message(), "sell amount is lower than the fee");
}

#[tokio::test]
async fn test_fee_error_wins_even_when_oracle_fails_first() {
    let (aggregator, _gateway, _oracle) = fake_aggregator(
        FakeCowClient::new()
            .with_quote_error(FakeFailure::SellAmountDoesNotCoverFee)
            .with_delay(Duration::from_millis(50)),
        FakePriceOracle::new().with_error(FakeFailure::api("Unauthorized")),
    );

    let err = aggregator
        .quote_swap(&quote_request(USDC, WETH, "1"))
        .await
        .unwrap_err();

    assert!(matches!(err, SwapError::SellAmountDoesNotCoverFee));
}

#[tokio::test]
async fn test_generic_quote_error_is_internal() {
    let (aggregator, _gateway, _oracle) = fake_aggregator(
        FakeCowClient::new().with_quote_error(FakeFailure::api("NoLiquidity")),
        FakePriceOracle::new(),
    );

    let err = aggregator
        .quote_swap(&quote_request(USDC, WETH, "500000000"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(!err.public_message().contains("NoLiquidity"));
}

#[tokio::test]
async fn test_oracle_error_is_internal() {
    let (aggregator, _gateway, _oracle) = fake_aggregator(
        FakeCowClient::new(),
        FakePriceOracle::new().with_error(FakeFailure::api("Unauthorized")),
    );

    let err = aggregator
        .quote_swap(&quote_request(USDC, WETH, "500000000"))
        .await
        .unwrap_err();

    match err {
        SwapError::Internal(context) => assert_eq!(context, "getting buy token price"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_price_leaves_rate_absent() {
    let (aggregator, _gateway, _oracle) =
        fake_aggregator(FakeCowClient::new(), FakePriceOracle::new());

    let quote = aggregator
        .quote_swap(&quote_request(USDC, WETH, "500000000"))
        .await
        .unwrap();

    assert_eq!(quote.buy_token_quote_rate, None);
    assert_eq!(quote.buy_amount, Uint256::from(250_000_000_000_000_000u64));
    assert_eq!(quote.sell_amount, Uint256::from(500_000_000u64));
    assert_eq!(quote.fee_amount, Uint256::from(10_000u64));
}

#[tokio::test]
async fn test_malformed_gateway_amount_is_internal() {
    let mut response: QuoteResponse = sample_quote_response();
    response.quote.buy_amount = "2.5e17".to_string();

    let (aggregator, _gateway, _oracle) =
        fake_aggregator(FakeCowClient::new().with_quote(response), FakePriceOracle::new());

    let err = aggregator
        .quote_swap(&quote_request(USDC, WETH, "500000000"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(matches!(
        err,
        SwapError::InvalidAmount {
            field: "buyAmount",
            ..
        }
    ));
}

#[tokio::test]
async fn test_large_amounts_are_lossless() {
    let max = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
    let mut response = sample_quote_response();
    response.quote.buy_amount = max.to_string();

    let (aggregator, _gateway, _oracle) =
        fake_aggregator(FakeCowClient::new().with_quote(response), FakePriceOracle::new());

    let quote = aggregator
        .quote_swap(&quote_request(DAI, WETH, "500000000"))
        .await
        .unwrap();
    assert_eq!(quote.buy_amount.to_string(), max);
}

#[tokio::test]
async fn test_sell_amount_is_normalized() {
    let (aggregator, gateway, _oracle) =
        fake_aggregator(FakeCowClient::new(), FakePriceOracle::new());

    aggregator
        .quote_swap(&quote_request(USDC, WETH, "000500000000"))
        .await
        .unwrap();

    let sent = gateway.last_quote_request().unwrap();
    assert_eq!(sent.sell_amount_before_fee, "500000000");
}

#[tokio::test]
async fn test_deadline_exceeded_is_internal() {
    let (aggregator, _gateway, _oracle) = fake_aggregator(
        FakeCowClient::new().with_delay(Duration::from_millis(200)),
        FakePriceOracle::new(),
    );
    let aggregator = aggregator.with_quote_deadline(Duration::from_millis(10));

    let err = aggregator
        .quote_swap(&quote_request(USDC, WETH, "500000000"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Internal);
}

#[tokio::test]
async fn test_quote_serializes_amounts_as_strings() {
    let (aggregator, _gateway, _oracle) = fake_aggregator(
        FakeCowClient::new(),
        FakePriceOracle::new().with_last_price(1800.50),
    );

    let quote = aggregator
        .quote_swap(&quote_request(USDC, WETH, "500000000"))
        .await
        .unwrap();
    let json = serde_json::to_value(&quote).unwrap();

    assert_eq!(json["buyAmount"], "250000000000000000");
    assert_eq!(json["sellAmount"], "500000000");
    assert_eq!(json["feeAmount"], "10000");
    assert_eq!(json["buyTokenQuoteRate"], 1800.5);
    assert_eq!(json["validTo"], "2023-11-14T22:13:20Z");
}
