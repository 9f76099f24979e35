//! # Exchange Adapters
//!
//! Endpoint descriptions and field mappings for the supported exchanges.
//!
//! Each adapter is a stateless unit struct: a base URL, a request shape, and
//! the two field mappings pulling `(price, size)` levels out of the venue's
//! JSON. Most venues ship levels as `[["price", "size"], ...]` rows (some
//! with trailing extras that are ignored); the odd ones out map their own
//! shapes. Adding a venue means adding one more small impl of this shape.

use crate::domain::value_objects::Market;
use crate::infrastructure::venues::error::{VenueError, VenueResult};
use crate::infrastructure::venues::traits::OrderBookAdapter;
use serde_json::Value;

/// Parses a JSON number or numeric string into an `f64`.
fn number(value: Option<&Value>) -> VenueResult<f64> {
    match value {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| VenueError::protocol_error("level value is not a finite number")),
        Some(Value::String(s)) => s
            .parse()
            .map_err(|_| VenueError::protocol_error(format!("level value '{s}' is not numeric"))),
        _ => Err(VenueError::protocol_error("missing level value")),
    }
}

/// Parses `[[price, size, ...], ...]` rows, ignoring any trailing elements.
fn price_size_rows(rows: Option<&Value>) -> VenueResult<Vec<(f64, f64)>> {
    let rows = rows
        .and_then(Value::as_array)
        .ok_or_else(|| VenueError::protocol_error("order-book levels missing or not an array"))?;

    rows.iter()
        .map(|row| {
            let row = row
                .as_array()
                .ok_or_else(|| VenueError::protocol_error("order-book level is not an array"))?;
            Ok((number(row.first())?, number(row.get(1))?))
        })
        .collect()
}

/// Binance spot order-book API.
#[derive(Debug, Clone, Copy, Default)]
pub struct Binance;

impl OrderBookAdapter for Binance {
    fn name(&self) -> &str {
        "Binance"
    }

    fn api_base_url(&self) -> &str {
        "https://api.binance.com/api/v3"
    }

    fn request_path(&self, _market: &Market) -> String {
        "/depth".to_string()
    }

    fn request_params(&self, market: &Market) -> Vec<(String, String)> {
        vec![
            ("symbol".into(), format!("{}{}", market.major(), market.minor())),
            ("limit".into(), "5000".into()),
        ]
    }

    fn parse_bids(&self, response: &Value) -> VenueResult<Vec<(f64, f64)>> {
        price_size_rows(response.get("bids"))
    }

    fn parse_asks(&self, response: &Value) -> VenueResult<Vec<(f64, f64)>> {
        price_size_rows(response.get("asks"))
    }
}

/// Coinbase Advanced Trade order-book API.
#[derive(Debug, Clone, Copy, Default)]
pub struct Coinbase;

impl Coinbase {
    fn levels(response: &Value, side: &str) -> VenueResult<Vec<(f64, f64)>> {
        let rows = response
            .pointer(&format!("/pricebook/{side}"))
            .and_then(Value::as_array)
            .ok_or_else(|| VenueError::protocol_error("pricebook levels missing"))?;

        rows.iter()
            .map(|entry| Ok((number(entry.get("price"))?, number(entry.get("size"))?)))
            .collect()
    }
}

impl OrderBookAdapter for Coinbase {
    fn name(&self) -> &str {
        "Coinbase"
    }

    fn api_base_url(&self) -> &str {
        "https://api.coinbase.com/api/v3"
    }

    fn request_path(&self, _market: &Market) -> String {
        "/brokerage/market/product_book".to_string()
    }

    fn request_params(&self, market: &Market) -> Vec<(String, String)> {
        vec![(
            "product_id".into(),
            format!("{}-{}", market.major(), market.minor()),
        )]
    }

    fn parse_bids(&self, response: &Value) -> VenueResult<Vec<(f64, f64)>> {
        Self::levels(response, "bids")
    }

    fn parse_asks(&self, response: &Value) -> VenueResult<Vec<(f64, f64)>> {
        Self::levels(response, "asks")
    }
}

/// Kraken spot order-book API.
#[derive(Debug, Clone, Copy, Default)]
pub struct Kraken;

impl Kraken {
    /// Kraken keys its result by an internal pair name; take the only entry.
    fn levels(response: &Value, side: &str) -> VenueResult<Vec<(f64, f64)>> {
        let book = response
            .get("result")
            .and_then(Value::as_object)
            .and_then(|result| result.values().next())
            .ok_or_else(|| VenueError::protocol_error("result book missing"))?;
        price_size_rows(book.get(side))
    }
}

impl OrderBookAdapter for Kraken {
    fn name(&self) -> &str {
        "Kraken"
    }

    fn api_base_url(&self) -> &str {
        "https://api.kraken.com/0/public"
    }

    fn request_path(&self, _market: &Market) -> String {
        "/Depth".to_string()
    }

    fn request_params(&self, market: &Market) -> Vec<(String, String)> {
        vec![
            ("pair".into(), format!("{}{}", market.major(), market.minor())),
            ("count".into(), "500".into()),
        ]
    }

    fn parse_bids(&self, response: &Value) -> VenueResult<Vec<(f64, f64)>> {
        Self::levels(response, "bids")
    }

    fn parse_asks(&self, response: &Value) -> VenueResult<Vec<(f64, f64)>> {
        Self::levels(response, "asks")
    }
}

/// OKX spot order-book API.
#[derive(Debug, Clone, Copy, Default)]
pub struct Okx;

impl OrderBookAdapter for Okx {
    fn name(&self) -> &str {
        "OKX"
    }

    fn api_base_url(&self) -> &str {
        "https://www.okx.com/api/v5"
    }

    fn request_path(&self, _market: &Market) -> String {
        "/market/books".to_string()
    }

    fn request_params(&self, market: &Market) -> Vec<(String, String)> {
        vec![
            (
                "instId".into(),
                format!("{}-{}", market.major(), market.minor()),
            ),
            ("sz".into(), "400".into()),
        ]
    }

    fn parse_bids(&self, response: &Value) -> VenueResult<Vec<(f64, f64)>> {
        price_size_rows(response.pointer("/data/0/bids"))
    }

    fn parse_asks(&self, response: &Value) -> VenueResult<Vec<(f64, f64)>> {
        price_size_rows(response.pointer("/data/0/asks"))
    }
}

/// Gate.io spot order-book API.
#[derive(Debug, Clone, Copy, Default)]
pub struct GateIo;

impl OrderBookAdapter for GateIo {
    fn name(&self) -> &str {
        "Gate.io"
    }

    fn api_base_url(&self) -> &str {
        "https://api.gateio.ws/api/v4"
    }

    fn request_path(&self, _market: &Market) -> String {
        "/spot/order_book".to_string()
    }

    fn request_params(&self, market: &Market) -> Vec<(String, String)> {
        vec![
            (
                "currency_pair".into(),
                format!("{}_{}", market.major(), market.minor()),
            ),
            ("limit".into(), "1000".into()),
        ]
    }

    fn parse_bids(&self, response: &Value) -> VenueResult<Vec<(f64, f64)>> {
        price_size_rows(response.get("bids"))
    }

    fn parse_asks(&self, response: &Value) -> VenueResult<Vec<(f64, f64)>> {
        price_size_rows(response.get("asks"))
    }
}

/// Bybit spot order-book API.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bybit;

impl OrderBookAdapter for Bybit {
    fn name(&self) -> &str {
        "Bybit"
    }

    fn api_base_url(&self) -> &str {
        "https://api.bybit.com/v5"
    }

    fn request_path(&self, _market: &Market) -> String {
        "/market/orderbook".to_string()
    }

    fn request_params(&self, market: &Market) -> Vec<(String, String)> {
        vec![
            ("category".into(), "spot".into()),
            ("symbol".into(), format!("{}{}", market.major(), market.minor())),
            ("limit".into(), "200".into()),
        ]
    }

    fn parse_bids(&self, response: &Value) -> VenueResult<Vec<(f64, f64)>> {
        price_size_rows(response.pointer("/result/b"))
    }

    fn parse_asks(&self, response: &Value) -> VenueResult<Vec<(f64, f64)>> {
        price_size_rows(response.pointer("/result/a"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use serde_json::json;

    fn market() -> Market {
        Market::new("RPL", "USDT")
    }

    mod row_parsing {
        use super::*;

        #[test]
        fn accepts_strings_and_numbers() {
            let rows = json!([["100.5", "2"], [99.0, 1.5]]);
            let levels = price_size_rows(Some(&rows)).unwrap();
            assert_eq!(levels, vec![(100.5, 2.0), (99.0, 1.5)]);
        }

        #[test]
        fn ignores_trailing_row_elements() {
            let rows = json!([["100", "1", "1717000000", "extra"]]);
            let levels = price_size_rows(Some(&rows)).unwrap();
            assert_eq!(levels, vec![(100.0, 1.0)]);
        }

        #[test]
        fn rejects_missing_levels() {
            assert!(price_size_rows(None).is_err());
            assert!(price_size_rows(Some(&json!("nope"))).is_err());
        }

        #[test]
        fn rejects_non_numeric_values() {
            let rows = json!([["abc", "1"]]);
            assert!(price_size_rows(Some(&rows)).is_err());
        }
    }

    mod binance {
        use super::*;

        #[test]
        fn request_shape() {
            let adapter = Binance;
            assert_eq!(adapter.request_path(&market()), "/depth");
            let params = adapter.request_params(&market());
            assert!(params.contains(&("symbol".into(), "RPLUSDT".into())));
        }

        #[test]
        fn parses_top_level_sides() {
            let response = json!({
                "bids": [["100", "1"], ["99", "2"]],
                "asks": [["101", "1"]],
            });
            assert_eq!(Binance.parse_bids(&response).unwrap().len(), 2);
            assert_eq!(Binance.parse_asks(&response).unwrap().len(), 1);
        }
    }

    mod coinbase {
        use super::*;

        #[test]
        fn parses_pricebook_objects() {
            let response = json!({
                "pricebook": {
                    "bids": [{"price": "100.5", "size": "2"}],
                    "asks": [{"price": "101.5", "size": "3"}],
                }
            });
            assert_eq!(
                Coinbase.parse_bids(&response).unwrap(),
                vec![(100.5, 2.0)]
            );
            assert_eq!(
                Coinbase.parse_asks(&response).unwrap(),
                vec![(101.5, 3.0)]
            );
        }

        #[test]
        fn request_uses_dashed_product_id() {
            let params = Coinbase.request_params(&market());
            assert!(params.contains(&("product_id".into(), "RPL-USDT".into())));
        }
    }

    mod kraken {
        use super::*;

        #[test]
        fn parses_the_first_result_pair() {
            let response = json!({
                "result": {
                    "XRPLZUSD": {
                        "bids": [["100", "1", 1717000000]],
                        "asks": [["101", "2", 1717000000]],
                    }
                }
            });
            assert_eq!(Kraken.parse_bids(&response).unwrap(), vec![(100.0, 1.0)]);
            assert_eq!(Kraken.parse_asks(&response).unwrap(), vec![(101.0, 2.0)]);
        }

        #[test]
        fn missing_result_is_a_protocol_error() {
            let response = json!({"error": ["EQuery:Unknown asset pair"]});
            assert!(Kraken.parse_bids(&response).is_err());
        }
    }

    mod okx {
        use super::*;

        #[test]
        fn parses_nested_data_with_four_element_rows() {
            let response = json!({
                "data": [{
                    "bids": [["100", "1", "0", "4"]],
                    "asks": [["101", "2", "0", "4"]],
                }]
            });
            assert_eq!(Okx.parse_bids(&response).unwrap(), vec![(100.0, 1.0)]);
            assert_eq!(Okx.parse_asks(&response).unwrap(), vec![(101.0, 2.0)]);
        }
    }

    mod gate_io {
        use super::*;

        #[test]
        fn request_uses_underscored_pair() {
            let params = GateIo.request_params(&market());
            assert!(params.contains(&("currency_pair".into(), "RPL_USDT".into())));
        }
    }

    mod bybit {
        use super::*;

        #[test]
        fn parses_short_side_names() {
            let response = json!({
                "result": {
                    "b": [["100", "1"]],
                    "a": [["101", "2"]],
                }
            });
            assert_eq!(Bybit.parse_bids(&response).unwrap(), vec![(100.0, 1.0)]);
            assert_eq!(Bybit.parse_asks(&response).unwrap(), vec![(101.0, 2.0)]);
        }
    }
}
