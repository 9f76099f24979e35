//! # ERC-20 Metadata Reads
//!
//! Token symbol and decimals, fetched once at pool construction.

use crate::domain::value_objects::Token as TokenInfo;
use crate::infrastructure::venues::contract_client::ChainReader;
use crate::infrastructure::venues::error::{VenueError, VenueResult};
use ethers::abi::{self, ParamType, Token};
use ethers::types::{Address, Bytes};

/// Selector for `symbol()`.
const SYMBOL_SELECTOR: [u8; 4] = [0x95, 0xd8, 0x9b, 0x41];

/// Selector for `decimals()`.
const DECIMALS_SELECTOR: [u8; 4] = [0x31, 0x3c, 0xe5, 0x67];

/// Fetches metadata for a pool's token pair in one multicall.
///
/// # Errors
///
/// Returns a connection error if the batch fails and a protocol error if a
/// token's return data does not decode.
pub async fn fetch_pair(
    reader: &dyn ChainReader,
    token_0: Address,
    token_1: Address,
) -> VenueResult<(TokenInfo, TokenInfo)> {
    let calls = vec![
        (token_0, selector_call(SYMBOL_SELECTOR)),
        (token_0, selector_call(DECIMALS_SELECTOR)),
        (token_1, selector_call(SYMBOL_SELECTOR)),
        (token_1, selector_call(DECIMALS_SELECTOR)),
    ];
    let results = reader.aggregate(&calls).await?;
    if results.len() != 4 {
        return Err(VenueError::protocol_error("token metadata batch truncated"));
    }

    Ok((
        TokenInfo::new(
            format!("{token_0:?}"),
            decode_symbol(&results[0])?,
            decode_decimals(&results[1])?,
        ),
        TokenInfo::new(
            format!("{token_1:?}"),
            decode_symbol(&results[2])?,
            decode_decimals(&results[3])?,
        ),
    ))
}

/// Builds a zero-argument call body from a selector.
fn selector_call(selector: [u8; 4]) -> Bytes {
    Bytes::from(selector.to_vec())
}

/// Decodes a `symbol()` return value.
fn decode_symbol(data: &Bytes) -> VenueResult<String> {
    let tokens = abi::decode(&[ParamType::String], data)
        .map_err(|e| VenueError::protocol_error(format!("bad symbol payload: {e}")))?;
    tokens
        .into_iter()
        .next()
        .and_then(Token::into_string)
        .ok_or_else(|| VenueError::protocol_error("symbol payload is not a string"))
}

/// Decodes a `decimals()` return value.
fn decode_decimals(data: &Bytes) -> VenueResult<u8> {
    let tokens = abi::decode(&[ParamType::Uint(8)], data)
        .map_err(|e| VenueError::protocol_error(format!("bad decimals payload: {e}")))?;
    let value = tokens
        .into_iter()
        .next()
        .and_then(Token::into_uint)
        .ok_or_else(|| VenueError::protocol_error("decimals payload is not an integer"))?;

    u8::try_from(value.low_u64())
        .map_err(|_| VenueError::protocol_error(format!("decimals out of range: {value}")))
}
