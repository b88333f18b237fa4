//! Property-Based Tests - Domain Layer Invariants
//!
//! Uses `proptest` to verify that decimal scaling, address handling and
//! batch alignment hold across random inputs.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use mockall::mock;
use proptest::prelude::*;

use token_holders_api::adapters::metrics::MetricsRegistry;
use token_holders_api::config::{ChainConfig, MULTICALL3_ADDRESS};
use token_holders_api::domain::{EvmAddress, LookupError, MAX_SCALE, TokenAmount};
use token_holders_api::ports::chain_client::ChainClient;
use token_holders_api::usecases::{BalanceService, BatchStrategy};

fn any_u256() -> impl Strategy<Value = U256> {
    any::<[u8; 32]>().prop_map(U256::from_be_bytes)
}

// ── Decimal Scaling Properties ──────────────────────────────

proptest! {
    /// Display then parse at the same scale returns the raw value.
    #[test]
    fn display_round_trips(raw in any_u256(), scale in 0u8..=MAX_SCALE) {
        let amount = TokenAmount::new(raw, scale).unwrap();
        let parsed = TokenAmount::from_display(&amount.display(), scale).unwrap();
        prop_assert_eq!(parsed.raw(), raw);
    }

    /// The integer part of the display is `raw / 10^scale`.
    #[test]
    fn display_integer_part_is_quotient(raw in any::<u128>(), scale in 0u8..=30) {
        let amount = TokenAmount::new(U256::from(raw), scale).unwrap();
        let display = amount.display();
        let integer = display.split('.').next().unwrap();
        let expected = U256::from(raw) / U256::from(10u64).pow(U256::from(scale));
        prop_assert_eq!(integer, expected.to_string());
    }

    /// Display never carries trailing fractional zeros.
    #[test]
    fn display_is_trimmed(raw in any::<u64>(), scale in 1u8..=20) {
        let display = TokenAmount::new(U256::from(raw), scale).unwrap().display();
        if display.contains('.') {
            prop_assert!(!display.ends_with('0'), "untrimmed display {display}");
            prop_assert!(!display.ends_with('.'));
        }
    }

    /// Scales above the supported range are always rejected.
    #[test]
    fn oversized_scale_rejected(raw in any_u256(), scale in (MAX_SCALE + 1)..=u8::MAX) {
        prop_assert!(TokenAmount::new(raw, scale).is_err());
    }

    /// Raw digit strings parse to the same integer.
    #[test]
    fn parse_raw_matches_integer(raw in any::<u128>(), scale in 0u8..=MAX_SCALE) {
        let amount = TokenAmount::parse_raw(&raw.to_string(), scale).unwrap();
        prop_assert_eq!(amount.raw(), U256::from(raw));
    }
}

// ── Address Properties ──────────────────────────────────────

proptest! {
    /// Lowercase, uppercase and checksummed forms parse to the same address.
    #[test]
    fn address_case_forms_agree(bytes in any::<[u8; 20]>()) {
        let address = Address::from(bytes);
        let checksummed = address.to_checksum(None);
        let hex = &checksummed[2..];

        let lower = EvmAddress::parse(&format!("0x{}", hex.to_lowercase())).unwrap();
        let upper = EvmAddress::parse(&format!("0x{}", hex.to_uppercase())).unwrap();
        let mixed = EvmAddress::parse(&checksummed).unwrap();

        prop_assert_eq!(lower, mixed);
        prop_assert_eq!(upper, mixed);
        prop_assert_eq!(mixed.to_string(), checksummed);
    }

    /// Anything that is not `0x` + 40 hex digits is rejected.
    #[test]
    fn malformed_addresses_rejected(s in "[0-9a-zA-Z]{0,39}") {
        prop_assert!(EvmAddress::parse(&s).is_err());
        let prefixed = format!("0x{s}");
        prop_assert!(EvmAddress::parse(&prefixed).is_err());
    }
}

// ── Batch Alignment Properties ──────────────────────────────

mock! {
    pub Chain {}

    #[async_trait::async_trait]
    impl ChainClient for Chain {
        async fn balance_of(&self, token: EvmAddress, owner: EvmAddress) -> Result<U256, LookupError>;
        async fn decimals(&self, token: EvmAddress) -> Result<u8, LookupError>;
        async fn symbol(&self, token: EvmAddress) -> Result<String, LookupError>;
        async fn name(&self, token: EvmAddress) -> Result<String, LookupError>;
        async fn total_supply(&self, token: EvmAddress) -> Result<U256, LookupError>;
        async fn batch_balance_of(
            &self,
            token: EvmAddress,
            owners: &[EvmAddress],
        ) -> Result<Vec<Option<U256>>, LookupError>;
        async fn is_healthy(&self) -> bool;
    }
}

const TOKEN: &str = "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB";

fn balance_for(owner: EvmAddress) -> U256 {
    U256::from_be_slice(owner.inner().as_slice())
}

fn batch_service(strategy: BatchStrategy) -> BalanceService {
    let mut chain = MockChain::new();
    chain.expect_decimals().returning(|_| Ok(18));
    chain.expect_balance_of().returning(|_, owner| Ok(balance_for(owner)));
    chain
        .expect_batch_balance_of()
        .returning(|_, owners| Ok(owners.iter().map(|o| Some(balance_for(*o))).collect()));

    let config = ChainConfig {
        rpc_url: "http://localhost:8545".to_string(),
        expected_chain_id: None,
        token_address: TOKEN.to_string(),
        multicall_address: MULTICALL3_ADDRESS.to_string(),
        timeout_ms: 1_000,
        max_concurrency: 3,
        use_multicall: strategy == BatchStrategy::Multicall,
    };
    let metrics = Arc::new(MetricsRegistry::new().unwrap());
    BalanceService::new(Arc::new(chain), EvmAddress::parse(TOKEN).unwrap(), &config, metrics)
        .with_strategy(strategy)
}

/// Either a checksummed valid address (`true`) or a malformed string.
fn batch_item() -> impl Strategy<Value = (bool, String)> {
    prop_oneof![
        any::<[u8; 20]>().prop_map(|b| (true, Address::from(b).to_checksum(None))),
        "[0-9a-zA-Z]{0,12}".prop_map(|s| (false, s)),
        "0x[0-9a-f]{0,39}".prop_map(|s| (false, s)),
    ]
}

fn run<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// N inputs with M malformed give N slots with exactly those M absent,
    /// for either strategy, and repeating the call changes nothing.
    #[test]
    fn batch_output_aligned_with_input(items in prop::collection::vec(batch_item(), 0..24)) {
        let input: Vec<String> = items.iter().map(|(_, s)| s.clone()).collect();

        for strategy in [BatchStrategy::Naive, BatchStrategy::Multicall] {
            let service = batch_service(strategy);
            let (first, second) = run(async {
                (service.balances(&input).await, service.balances(&input).await)
            });

            prop_assert_eq!(first.len(), input.len());
            for ((valid, raw), slot) in items.iter().zip(&first) {
                if *valid {
                    let expected = balance_for(EvmAddress::parse(raw).unwrap());
                    prop_assert_eq!(slot.map(|a| a.raw()), Some(expected));
                } else {
                    prop_assert!(slot.is_none(), "malformed {raw:?} produced a balance");
                }
            }
            prop_assert_eq!(first, second);
        }
    }
}
