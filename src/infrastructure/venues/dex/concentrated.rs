//! # Concentrated-Liquidity Pool
//!
//! Tick-range depth for a Uniswap-V3-style pool.
//!
//! A liquidity query performs a fixed number of round trips regardless of how
//! many ticks the pool has initialized:
//!
//! 1. `slot0()` and `liquidity()` for the spot price and active liquidity
//! 2. one multicall over the bitmap words around the current tick
//! 3. one multicall over the `ticks(...)` entries of every set bit found
//!
//! The snapshot those reads produce is handed to the pure
//! [`TickRangeDepth`](crate::domain::depth::TickRangeDepth) builder.
//!
//! ## Known limitation
//!
//! The bitmap scan is bounded to a fixed window around the active word
//! ([`WORD_SCAN_BELOW`]/[`WORD_SCAN_ABOVE`]). A pool whose nearest liquidity
//! sits outside that window under-reports depth beyond the window edge —
//! queries saturate at the outermost scanned boundary. The window stays
//! bounded on purpose: it is what keeps the scan's RPC cost independent of
//! the tick range.

use super::erc20;
use crate::domain::depth::{DepthCurve, TickRangeDepth, TickRangeSnapshot};
use crate::domain::value_objects::tick::{self, TICK_WORD_SIZE};
use crate::domain::value_objects::token::decimal_factor;
use crate::domain::value_objects::{PoolId, Token as TokenInfo};
use crate::infrastructure::venues::contract_client::{u256_to_f64, ChainReader};
use crate::infrastructure::venues::error::{VenueError, VenueResult};
use crate::infrastructure::venues::dex::LiquidityPool;
use async_trait::async_trait;
use ethers::abi::{self, Token};
use ethers::types::{Address, Bytes, I256, U256};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Selector for `slot0()`.
const SLOT0_SELECTOR: [u8; 4] = [0x38, 0x50, 0xc7, 0xbd];

/// Selector for `liquidity()`.
const LIQUIDITY_SELECTOR: [u8; 4] = [0x1a, 0x68, 0x65, 0x02];

/// Selector for `tickSpacing()`.
const TICK_SPACING_SELECTOR: [u8; 4] = [0xd0, 0xc9, 0x3a, 0x7c];

/// Selector for `token0()`.
const TOKEN0_SELECTOR: [u8; 4] = [0x0d, 0xfe, 0x16, 0x81];

/// Selector for `token1()`.
const TOKEN1_SELECTOR: [u8; 4] = [0xd2, 0x12, 0x20, 0xa7];

/// Selector for `tickBitmap(int16)`.
const TICK_BITMAP_SELECTOR: [u8; 4] = [0x53, 0x39, 0xc2, 0x96];

/// Selector for `ticks(int24)`.
const TICKS_SELECTOR: [u8; 4] = [0xf3, 0x0d, 0xba, 0x93];

/// Bitmap words scanned below the active word.
pub const WORD_SCAN_BELOW: i32 = 5;

/// Bitmap words scanned above the active word (exclusive bound).
pub const WORD_SCAN_ABOVE: i32 = 5;

/// A concentrated-liquidity pool contract.
pub struct ConcentratedPool {
    /// Pool identifier (the pool contract address).
    id: PoolId,
    /// Pool contract address.
    address: Address,
    /// Tick spacing read at construction.
    tick_spacing: i32,
    /// Token 0 metadata.
    token_0: TokenInfo,
    /// Token 1 metadata.
    token_1: TokenInfo,
    /// Chain read access.
    reader: Arc<dyn ChainReader>,
}

impl ConcentratedPool {
    /// Connects to a pool, reading its tick spacing and token metadata.
    ///
    /// # Errors
    ///
    /// Returns a venue error if the constructor batch fails or its payloads
    /// do not decode.
    pub async fn connect(reader: Arc<dyn ChainReader>, address: Address) -> VenueResult<Self> {
        let calls = vec![
            (address, selector_call(TICK_SPACING_SELECTOR)),
            (address, selector_call(TOKEN0_SELECTOR)),
            (address, selector_call(TOKEN1_SELECTOR)),
        ];
        let results = reader.aggregate(&calls).await?;
        if results.len() != 3 {
            return Err(VenueError::protocol_error("pool metadata batch truncated"));
        }

        let tick_spacing = decode_tick_spacing(&results[0])?;
        let address_0 = decode_address(&results[1])?;
        let address_1 = decode_address(&results[2])?;
        let (token_0, token_1) = erc20::fetch_pair(reader.as_ref(), address_0, address_1).await?;

        Ok(Self {
            id: PoolId::new(format!("{address:?}")),
            address,
            tick_spacing,
            token_0,
            token_1,
            reader,
        })
    }

    /// Returns the pool's tick spacing.
    #[inline]
    #[must_use]
    pub fn tick_spacing(&self) -> i32 {
        self.tick_spacing
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

    /// Reads the raw spot price from slot0.
    async fn slot0_price(&self) -> VenueResult<f64> {
        let raw = self
            .reader
            .call(self.address, selector_call(SLOT0_SELECTOR))
            .await?;
        let sqrt_price_x96 = decode_first_word(&raw)?;
        let sqrt_price = u256_to_f64(sqrt_price_x96) / 2f64.powi(96);
        Ok(sqrt_price * sqrt_price)
    }

    /// Reads the pool's currently active liquidity.
    async fn active_liquidity(&self) -> VenueResult<f64> {
        let raw = self
            .reader
            .call(self.address, selector_call(LIQUIDITY_SELECTOR))
            .await?;
        Ok(u256_to_f64(decode_first_word(&raw)?))
    }

    /// Scans the bitmap window around the current tick for initialized
    /// ticks, one multicall for the whole window.
    ///
    /// Liquidity beyond the window is invisible to the scan; see the module
    /// docs for the implications.
    async fn initialized_ticks(&self, current_tick: i32) -> VenueResult<Vec<i32>> {
        let (active_word, _) = tick::tick_to_word_and_bit(current_tick, self.tick_spacing);
        let words: Vec<i32> =
            (active_word - WORD_SCAN_BELOW..active_word + WORD_SCAN_ABOVE).collect();

        let calls: Vec<(Address, Bytes)> = words
            .iter()
            .map(|&word| (self.address, int_call(TICK_BITMAP_SELECTOR, word)))
            .collect();
        let results = self.reader.aggregate(&calls).await?;

        let mut ticks = Vec::new();
        for (&word, raw) in words.iter().zip(&results) {
            let bitmap = decode_first_word(raw)?;
            ticks.extend(ticks_in_word(word, bitmap, self.tick_spacing));
        }
        Ok(ticks)
    }

    /// Batch-reads the net liquidity delta stored at each initialized tick.
    async fn ticks_net_liquidity(&self, ticks: &[i32]) -> VenueResult<HashMap<i32, i128>> {
        let calls: Vec<(Address, Bytes)> = ticks
            .iter()
            .map(|&t| (self.address, int_call(TICKS_SELECTOR, t)))
            .collect();
        let results = self.reader.aggregate(&calls).await?;

        ticks
            .iter()
            .zip(&results)
            .map(|(&t, raw)| Ok((t, decode_liquidity_net(raw)?)))
            .collect()
    }
}

#[async_trait]
impl LiquidityPool for ConcentratedPool {
    fn id(&self) -> &PoolId {
        &self.id
    }

    async fn spot_price(&self) -> VenueResult<f64> {
        self.slot0_price().await
    }

    async fn normalized_price(&self) -> VenueResult<f64> {
        let spot = self.slot0_price().await?;
        Ok(spot * decimal_factor(self.token_0.decimals(), self.token_1.decimals()))
    }

    async fn liquidity(&self) -> VenueResult<Option<DepthCurve>> {
        let spot_price = self.slot0_price().await?;
        if !(spot_price > 0.0 && spot_price.is_finite()) {
            return Err(VenueError::protocol_error(format!(
                "pool reported unusable spot price {spot_price}"
            )));
        }
        let active_liquidity = self.active_liquidity().await?;

        let current_tick = tick::price_to_tick(spot_price).floor() as i32;
        let ticks = self.initialized_ticks(current_tick).await?;
        if ticks.is_empty() {
            warn!(pool = %self.id, "no initialized ticks in the scanned window");
            return Ok(None);
        }
        debug!(pool = %self.id, count = ticks.len(), "found initialized ticks");

        let net_liquidity = self.ticks_net_liquidity(&ticks).await?;
        let snapshot = TickRangeSnapshot {
            spot_price,
            active_liquidity,
            ticks,
            net_liquidity,
            decimals_0: self.token_0.decimals(),
            decimals_1: self.token_1.decimals(),
        };

        Ok(TickRangeDepth::build(&snapshot).ok())
    }
}

impl std::fmt::Debug for ConcentratedPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConcentratedPool")
            .field("id", &self.id)
            .field("tick_spacing", &self.tick_spacing)
            .field("token_0", &self.token_0.symbol())
            .field("token_1", &self.token_1.symbol())
            .finish_non_exhaustive()
    }
}

/// Builds a zero-argument call body from a selector.
fn selector_call(selector: [u8; 4]) -> Bytes {
    Bytes::from(selector.to_vec())
}

/// Builds a call body with one signed integer argument (int16/int24
/// arguments are sign-extended into a full word).
fn int_call(selector: [u8; 4], value: i32) -> Bytes {
    let encoded = abi::encode(&[Token::Int(I256::from(value).into_raw())]);
    let mut calldata = Vec::with_capacity(4 + encoded.len());
    calldata.extend_from_slice(&selector);
    calldata.extend_from_slice(&encoded);
    Bytes::from(calldata)
}

/// Reads the first 32-byte word of a return payload as an unsigned integer.
fn decode_first_word(data: &Bytes) -> VenueResult<U256> {
    data.get(0..32)
        .map(U256::from_big_endian)
        .ok_or_else(|| VenueError::protocol_error("return payload shorter than one word"))
}

/// Reads a return word as a signed value of width ≤ 128 bits.
fn signed_word(word: &[u8]) -> i128 {
    // The word is sign-extended on chain; the low 128 bits already carry the
    // two's-complement value.
    U256::from_big_endian(word).low_u128() as i128
}

/// Decodes `tickSpacing()` (an int24, sign-extended).
fn decode_tick_spacing(data: &Bytes) -> VenueResult<i32> {
    let word = data
        .get(0..32)
        .ok_or_else(|| VenueError::protocol_error("tickSpacing payload truncated"))?;
    i32::try_from(signed_word(word))
        .map_err(|_| VenueError::protocol_error("tickSpacing out of range"))
}

/// Decodes an address return value.
fn decode_address(data: &Bytes) -> VenueResult<Address> {
    let word = data
        .get(0..32)
        .ok_or_else(|| VenueError::protocol_error("address payload truncated"))?;
    Ok(Address::from_slice(&word[12..32]))
}

/// Decodes the `liquidityNet` field (second word, int128) of a `ticks(...)`
/// payload.
fn decode_liquidity_net(data: &Bytes) -> VenueResult<i128> {
    let word = data
        .get(32..64)
        .ok_or_else(|| VenueError::protocol_error("ticks payload truncated"))?;
    Ok(signed_word(word))
}

/// Expands one bitmap word into the initialized ticks it denotes.
fn ticks_in_word(word_index: i32, bitmap: U256, tick_spacing: i32) -> Vec<i32> {
    if bitmap.is_zero() {
        return Vec::new();
    }

    (0..TICK_WORD_SIZE)
        .filter(|&bit| bitmap.bit(bit as usize))
        .map(|bit| tick::tick_from_word_and_bit(word_index, bit, tick_spacing))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    mod encoding {
        use super::*;

        #[test]
        fn selector_call_is_bare() {
            assert_eq!(selector_call(SLOT0_SELECTOR).to_vec(), SLOT0_SELECTOR);
        }

        #[test]
        fn int_call_sign_extends_negative_arguments() {
            let calldata = int_call(TICK_BITMAP_SELECTOR, -1);
            assert_eq!(&calldata[..4], &TICK_BITMAP_SELECTOR);
            // -1 encodes as all-ones across the full word.
            assert!(calldata[4..36].iter().all(|&b| b == 0xff));
        }

        #[test]
        fn int_call_encodes_positive_arguments() {
            let calldata = int_call(TICKS_SELECTOR, 887_272);
            assert_eq!(calldata.len(), 36);
            assert_eq!(
                U256::from_big_endian(&calldata[4..36]),
                U256::from(887_272u64)
            );
        }
    }

    mod decoding {
        use super::*;

        #[test]
        fn slot0_price_of_one_to_one_pool() {
            // sqrtPriceX96 = 2^96 encodes a raw price of exactly 1.0.
            let mut payload = vec![0u8; 224];
            let sqrt_price = U256::from(1u64) << 96;
            sqrt_price.to_big_endian(&mut payload[0..32]);

            let word = decode_first_word(&Bytes::from(payload)).unwrap();
            let sqrt = u256_to_f64(word) / 2f64.powi(96);
            assert_eq!(sqrt * sqrt, 1.0);
        }

        #[test]
        fn truncated_payload_is_a_protocol_error() {
            assert!(decode_first_word(&Bytes::from(vec![0u8; 8])).is_err());
            assert!(decode_liquidity_net(&Bytes::from(vec![0u8; 40])).is_err());
        }

        #[test]
        fn negative_liquidity_net_decodes() {
            let mut payload = vec![0u8; 256];
            let negated = I256::from(-5_000_000i64).into_raw();
            negated.to_big_endian(&mut payload[32..64]);
            assert_eq!(
                decode_liquidity_net(&Bytes::from(payload)).unwrap(),
                -5_000_000
            );
        }

        #[test]
        fn negative_tick_spacing_word_decodes() {
            let mut payload = vec![0u8; 32];
            I256::from(-60).into_raw().to_big_endian(&mut payload);
            assert_eq!(decode_tick_spacing(&Bytes::from(payload)).unwrap(), -60);
        }

        #[test]
        fn address_is_the_low_twenty_bytes() {
            let mut payload = vec![0u8; 32];
            payload[12..32].copy_from_slice(Address::repeat_byte(0xab).as_bytes());
            assert_eq!(
                decode_address(&Bytes::from(payload)).unwrap(),
                Address::repeat_byte(0xab)
            );
        }
    }

    mod bitmap {
        use super::*;

        #[test]
        fn empty_word_has_no_ticks() {
            assert!(ticks_in_word(0, U256::zero(), 60).is_empty());
        }

        #[test]
        fn low_bits_map_to_spaced_ticks() {
            // Bits 0 and 1 of word 0: compressed ticks 0 and 1.
            let bitmap = U256::from(0b11u64);
            assert_eq!(ticks_in_word(0, bitmap, 60), vec![0, 60]);
        }

        #[test]
        fn negative_words_produce_negative_ticks() {
            // Top bit of word -1 is compressed tick -1.
            let bitmap = U256::from(1u64) << 255;
            assert_eq!(ticks_in_word(-1, bitmap, 60), vec![-60]);
        }

        #[test]
        fn spacing_scales_the_reconstructed_tick() {
            let bitmap = U256::from(1u64) << 2;
            assert_eq!(ticks_in_word(1, bitmap, 10), vec![(256 + 2) * 10]);
        }
    }
}
