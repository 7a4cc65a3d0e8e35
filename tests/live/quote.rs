use treasury_swap_quotes::{SwapAggregator, SwapQuoteRequest, Uint256};

use crate::common::{address, build_swap_config, load_test_env, mainnet, print_quote};

#[tokio::test]
#[ignore = "requires env vars and real API access"]
async fn test_live_quote_swap() {
    let env = load_test_env();
    let aggregator =
        SwapAggregator::new(build_swap_config(&env)).expect("aggregator should build");

    let request = SwapQuoteRequest {
        chain_id: mainnet(),
        sell_token: address(&env.sell_token),
        buy_token: address(&env.buy_token),
        from: address(&env.from),
        sell_amount: env.sell_amount.clone(),
    };

    let quote = aggregator
        .quote_swap(&request)
        .await
        .expect("live quote should succeed");

    assert!(
        quote.buy_amount > Uint256::from(0u64),
        "buy_amount must be > 0"
    );
    print_quote("live::quote_swap", &quote);
}

#[tokio::test]
#[ignore = "requires real API access"]
async fn test_live_orders() {
    let env = load_test_env();
    let aggregator =
        SwapAggregator::new(build_swap_config(&env)).expect("aggregator should build");

    let orders = aggregator
        .orders(&mainnet(), &address(&env.from))
        .await
        .expect("orders should load");
    println!("  {} orders for {}", orders.len(), env.from);
}
