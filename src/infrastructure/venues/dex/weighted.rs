//! # Weighted Vault Pool
//!
//! Constant-product depth for a two-asset vault-registered pool.
//!
//! The pool's token pair is read from the vault registry at construction;
//! every liquidity query re-reads the current balances and hands them to the
//! closed-form constant-product builder. Pools with more than two tokens or
//! non-equal weights are not supported — the builder assumes equal weights
//! and reports liquidity in token 0.

use super::erc20;
use crate::domain::depth::{ConstantProductDepth, DepthCurve, PoolReserves};
use crate::domain::value_objects::token::decimal_factor;
use crate::domain::value_objects::{PoolId, Token as TokenInfo};
use crate::infrastructure::venues::contract_client::{u256_to_f64, ChainReader};
use crate::infrastructure::venues::error::{VenueError, VenueResult};
use crate::infrastructure::venues::dex::LiquidityPool;
use async_trait::async_trait;
use ethers::abi::{self, ParamType, Token};
use ethers::types::{Address, Bytes, H256, U256};
use std::sync::Arc;
use tracing::warn;

/// Selector for `getPoolTokens(bytes32)`.
const GET_POOL_TOKENS_SELECTOR: [u8; 4] = [0xf9, 0x4d, 0x46, 0x68];

/// A two-asset weighted pool registered in a vault contract.
pub struct WeightedPool {
    /// Pool identifier (the vault's 32-byte pool id).
    id: PoolId,
    /// Vault contract address.
    vault: Address,
    /// 32-byte pool id within the vault.
    pool_id: H256,
    /// Token 0 metadata.
    token_0: TokenInfo,
    /// Token 1 metadata.
    token_1: TokenInfo,
    /// Chain read access.
    reader: Arc<dyn ChainReader>,
}

impl WeightedPool {
    /// Connects to a vault pool, reading its token pair and their metadata.
    ///
    /// # Errors
    ///
    /// Returns a venue error if the vault read fails, the pool holds fewer
    /// than two tokens, or token metadata cannot be decoded.
    pub async fn connect(
        reader: Arc<dyn ChainReader>,
        vault: Address,
        pool_id: H256,
    ) -> VenueResult<Self> {
        let (tokens, _balances) = Self::pool_tokens(reader.as_ref(), vault, pool_id).await?;
        let &[address_0, address_1] = tokens.as_slice() else {
            return Err(VenueError::invalid_request(format!(
                "pool {pool_id:?} holds {} tokens, expected 2",
                tokens.len()
            )));
        };

        let (token_0, token_1) = erc20::fetch_pair(reader.as_ref(), address_0, address_1).await?;

        Ok(Self {
            id: PoolId::new(format!("{pool_id:?}")),
            vault,
            pool_id,
            token_0,
            token_1,
            reader,
        })
    }

    /// Returns the token-0 metadata.
    #[inline]
    #[must_use]
    pub fn token_0(&self) -> &TokenInfo {
        &self.token_0
    }

    /// Returns the token-1 metadata.
    #[inline]
    #[must_use]
    pub fn token_1(&self) -> &TokenInfo {
        &self.token_1
    }

    /// Reads the vault's `(tokens, balances)` registration for a pool.
    async fn pool_tokens(
        reader: &dyn ChainReader,
        vault: Address,
        pool_id: H256,
    ) -> VenueResult<(Vec<Address>, Vec<U256>)> {
        let mut calldata = GET_POOL_TOKENS_SELECTOR.to_vec();
        calldata.extend_from_slice(pool_id.as_bytes());

        let raw = reader.call(vault, Bytes::from(calldata)).await?;
        decode_pool_tokens(&raw)
    }

    /// Reads the pool's current raw balances.
    async fn balances(&self) -> VenueResult<(f64, f64)> {
        let (_, balances) =
            Self::pool_tokens(self.reader.as_ref(), self.vault, self.pool_id).await?;
        if balances.len() < 2 {
            return Err(VenueError::protocol_error("vault returned too few balances"));
        }
        Ok((u256_to_f64(balances[0]), u256_to_f64(balances[1])))
    }
}

#[async_trait]
impl LiquidityPool for WeightedPool {
    fn id(&self) -> &PoolId {
        &self.id
    }

    async fn spot_price(&self) -> VenueResult<f64> {
        let (balance_0, balance_1) = self.balances().await?;
        if balance_0 > 0.0 {
            Ok(balance_1 / balance_0)
        } else {
            Ok(0.0)
        }
    }

    async fn normalized_price(&self) -> VenueResult<f64> {
        let spot = self.spot_price().await?;
        Ok(spot * decimal_factor(self.token_0.decimals(), self.token_1.decimals()))
    }

    async fn liquidity(&self) -> VenueResult<Option<DepthCurve>> {
        let (balance_0, balance_1) = self.balances().await?;
        let reserves = PoolReserves::new(
            balance_0,
            balance_1,
            self.token_0.decimals(),
            self.token_1.decimals(),
        );

        match ConstantProductDepth::build(&reserves) {
            Ok(curve) => Ok(Some(curve)),
            Err(reason) => {
                warn!(pool = %self.id, %reason, "empty token balances");
                Ok(None)
            }
        }
    }
}

impl std::fmt::Debug for WeightedPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeightedPool")
            .field("id", &self.id)
            .field("token_0", &self.token_0.symbol())
            .field("token_1", &self.token_1.symbol())
            .finish_non_exhaustive()
    }
}

/// Decodes a `getPoolTokens` payload
/// `(address[] tokens, uint256[] balances, uint256 lastChangeBlock)`.
fn decode_pool_tokens(data: &Bytes) -> VenueResult<(Vec<Address>, Vec<U256>)> {
    let tokens = abi::decode(
        &[
            ParamType::Array(Box::new(ParamType::Address)),
            ParamType::Array(Box::new(ParamType::Uint(256))),
            ParamType::Uint(256),
        ],
        data,
    )
    .map_err(|e| VenueError::protocol_error(format!("bad getPoolTokens payload: {e}")))?;

    let mut iter = tokens.into_iter();
    let addresses = iter
        .next()
        .and_then(Token::into_array)
        .map(|entries| entries.into_iter().filter_map(Token::into_address).collect())
        .ok_or_else(|| VenueError::protocol_error("getPoolTokens missing token array"))?;
    let balances = iter
        .next()
        .and_then(Token::into_array)
        .map(|entries| entries.into_iter().filter_map(Token::into_uint).collect())
        .ok_or_else(|| VenueError::protocol_error("getPoolTokens missing balance array"))?;

    Ok((addresses, balances))
}
