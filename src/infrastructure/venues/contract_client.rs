//! # Contract Client
//!
//! On-chain read access for the pool venues.
//!
//! Exposes the two primitives the pool adapters need through the
//! [`ChainReader`] trait:
//!
//! - [`ChainReader::call`]: a single `eth_call`
//! - [`ChainReader::aggregate`]: N independent reads bundled into one
//!   Multicall3 round trip, results returned in input order
//!
//! The batched primitive is what keeps the concentrated-liquidity scan at a
//! fixed RPC cost: bitmap words and per-tick state are read in one trip each
//! instead of one trip per tick.

use crate::infrastructure::venues::error::{VenueError, VenueResult};
use async_trait::async_trait;
use ethers::abi::{self, ParamType, Token};
use ethers::prelude::*;
use std::sync::Arc;
use std::time::Duration;

/// HTTP provider type alias.
pub type HttpProvider = Provider<Http>;

/// Canonical Multicall3 deployment address (same on all major chains).
pub const MULTICALL3_ADDRESS: &str = "0xcA11bde05977b3631167028862bE2a173976CA11";

/// Selector for `aggregate((address,bytes)[])`.
const AGGREGATE_SELECTOR: [u8; 4] = [0x25, 0x2d, 0xba, 0x42];

/// Converts a `U256` to an `f64` by limb summation.
///
/// Loses precision above 2^53 like any float conversion; depth math runs on
/// floats throughout, so that is the accepted resolution.
#[must_use]
pub fn u256_to_f64(value: U256) -> f64 {
    value
        .0
        .iter()
        .enumerate()
        .map(|(i, &limb)| limb as f64 * 2f64.powi(64 * i as i32))
        .sum()
}

/// Read access to on-chain contract state.
///
/// Implemented by [`ContractClient`] for live RPC endpoints and by in-memory
/// fakes in tests.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Calls a contract view function and returns the raw return data.
    async fn call(&self, to: Address, data: Bytes) -> VenueResult<Bytes>;

    /// Executes independent view calls in a single round trip.
    ///
    /// The returned vector is parallel to `calls`: result `i` is the return
    /// data of call `i`, whatever order the node evaluated them in.
    async fn aggregate(&self, calls: &[(Address, Bytes)]) -> VenueResult<Vec<Bytes>>;
}

/// Contract client over an `ethers` HTTP provider.
#[derive(Clone)]
pub struct ContractClient {
    /// The ethers provider.
    provider: Arc<HttpProvider>,
    /// RPC URL for reference.
    rpc_url: String,
    /// Multicall3 contract address.
    multicall: Address,
}

impl ContractClient {
    /// Creates a new contract client against an RPC endpoint, using the
    /// canonical Multicall3 deployment.
    ///
    /// # Errors
    ///
    /// Returns `VenueError::Connection` if the provider cannot be created.
    pub fn new(rpc_url: impl Into<String>) -> VenueResult<Self> {
        Self::with_multicall(rpc_url, MULTICALL3_ADDRESS)
    }

    /// Creates a new contract client with a custom multicall deployment.
    ///
    /// # Errors
    ///
    /// Returns `VenueError::Connection` if the provider cannot be created and
    /// `VenueError::InvalidRequest` if the multicall address does not parse.
    pub fn with_multicall(
        rpc_url: impl Into<String>,
        multicall: &str,
    ) -> VenueResult<Self> {
        let rpc_url = rpc_url.into();
        let provider = Provider::<Http>::try_from(&rpc_url)
            .map_err(|e| VenueError::connection(format!("failed to create provider: {e}")))?
            .interval(Duration::from_millis(100));

        Ok(Self {
            provider: Arc::new(provider),
            rpc_url,
            multicall: Self::parse_address(multicall)?,
        })
    }

    /// Returns the RPC URL.
    #[inline]
    #[must_use]
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Gets the current block number.
    ///
    /// # Errors
    ///
    /// Returns `VenueError::Connection` if the RPC call fails.
    pub async fn get_block_number(&self) -> VenueResult<u64> {
        let block = self
            .provider
            .get_block_number()
            .await
            .map_err(|e| VenueError::connection(format!("failed to get block number: {e}")))?;

        Ok(block.as_u64())
    }

    /// Returns true if a block number can be fetched.
    pub async fn is_healthy(&self) -> bool {
        self.get_block_number().await.is_ok()
    }

    /// Parses an address string.
    ///
    /// # Errors
    ///
    /// Returns `VenueError::InvalidRequest` if the address is invalid.
    pub fn parse_address(address: &str) -> VenueResult<Address> {
        address
            .parse()
            .map_err(|_| VenueError::invalid_request(format!("invalid address: {address}")))
    }

    /// Encodes an `aggregate((address,bytes)[])` call body.
    pub(crate) fn encode_aggregate(calls: &[(Address, Bytes)]) -> Bytes {
        let tuples = calls
            .iter()
            .map(|(to, data)| Token::Tuple(vec![Token::Address(*to), Token::Bytes(data.to_vec())]))
            .collect();

        let encoded = abi::encode(&[Token::Array(tuples)]);
        let mut calldata = Vec::with_capacity(4 + encoded.len());
        calldata.extend_from_slice(&AGGREGATE_SELECTOR);
        calldata.extend_from_slice(&encoded);
        Bytes::from(calldata)
    }

    /// Decodes an `aggregate` return payload `(uint256, bytes[])` into the
    /// per-call return data.
    ///
    /// # Errors
    ///
    /// Returns `VenueError::Protocol` if the payload does not decode.
    pub(crate) fn decode_aggregate(data: &Bytes) -> VenueResult<Vec<Bytes>> {
        let tokens = abi::decode(
            &[
                ParamType::Uint(256),
                ParamType::Array(Box::new(ParamType::Bytes)),
            ],
            data,
        )
        .map_err(|e| VenueError::protocol_error(format!("bad aggregate payload: {e}")))?;

        let results = tokens
            .into_iter()
            .nth(1)
            .and_then(Token::into_array)
            .ok_or_else(|| VenueError::protocol_error("aggregate payload missing results"))?;

        results
            .into_iter()
            .map(|token| {
                token
                    .into_bytes()
                    .map(Bytes::from)
                    .ok_or_else(|| VenueError::protocol_error("aggregate result is not bytes"))
            })
            .collect()
    }
}

#[async_trait]
impl ChainReader for ContractClient {
    async fn call(&self, to: Address, data: Bytes) -> VenueResult<Bytes> {
        let tx = TransactionRequest::new().to(to).data(data);

        self.provider
            .call(&tx.into(), None)
            .await
            .map_err(|e| VenueError::connection(format!("contract call failed: {e}")))
    }

    async fn aggregate(&self, calls: &[(Address, Bytes)]) -> VenueResult<Vec<Bytes>> {
        if calls.is_empty() {
            return Ok(Vec::new());
        }

        let calldata = Self::encode_aggregate(calls);
        let raw = self.call(self.multicall, calldata).await?;
        let results = Self::decode_aggregate(&raw)?;

        if results.len() != calls.len() {
            return Err(VenueError::protocol_error(format!(
                "aggregate returned {} results for {} calls",
                results.len(),
                calls.len()
            )));
        }
        Ok(results)
    }
}

impl std::fmt::Debug for ContractClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractClient")
            .field("rpc_url", &self.rpc_url)
            .field("multicall", &self.multicall)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_address_valid() {
        let address = ContractClient::parse_address(MULTICALL3_ADDRESS);
        assert!(address.is_ok());
    }

    #[test]
    fn parse_address_invalid() {
        let address = ContractClient::parse_address("not-an-address");
        assert!(address.is_err());
    }

    #[test]
    fn encode_aggregate_starts_with_the_selector() {
        let calls = vec![(Address::zero(), Bytes::from(vec![0xde, 0xad]))];
        let encoded = ContractClient::encode_aggregate(&calls);
        assert_eq!(&encoded[..4], &AGGREGATE_SELECTOR);
    }

    #[test]
    fn aggregate_payload_roundtrip_preserves_order() {
        let results = vec![
            Token::Bytes(vec![0x01]),
            Token::Bytes(vec![0x02, 0x02]),
            Token::Bytes(vec![0x03, 0x03, 0x03]),
        ];
        let payload = Bytes::from(abi::encode(&[
            Token::Uint(U256::from(19_000_000u64)),
            Token::Array(results),
        ]));

        let decoded = ContractClient::decode_aggregate(&payload).unwrap();
        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded[0].to_vec(), vec![0x01]);
        assert_eq!(decoded[1].to_vec(), vec![0x02, 0x02]);
        assert_eq!(decoded[2].to_vec(), vec![0x03, 0x03, 0x03]);
    }

    #[test]
    fn decode_aggregate_rejects_garbage() {
        let result = ContractClient::decode_aggregate(&Bytes::from(vec![0x00; 7]));
        assert!(matches!(result, Err(VenueError::Protocol(_))));
    }

    #[test]
    fn u256_conversion_handles_all_limbs() {
        assert_eq!(u256_to_f64(U256::zero()), 0.0);
        assert_eq!(u256_to_f64(U256::from(1_000_000u64)), 1e6);
        let shifted = U256::from(1u64) << 96;
        assert_eq!(u256_to_f64(shifted), 2f64.powi(96));
    }

    #[test]
    fn debug_format_hides_the_provider() {
        let client = ContractClient::new("http://localhost:8545").unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("localhost:8545"));
    }
}
