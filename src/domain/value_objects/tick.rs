//! # Tick Math
//!
//! Price/tick conversions for concentrated-liquidity pools.
//!
//! A tick is a discrete price coordinate: `price = 1.0001^tick`. Initialized
//! ticks are stored on-chain in a bitmap of 256-tick words, with the pool's
//! tick spacing applied before compression; [`tick_to_word_and_bit`] maps a
//! tick to its `(word, bit)` coordinate in that bitmap.
//!
//! # Examples
//!
//! ```
//! use depth_engine::domain::value_objects::tick;
//!
//! let price = tick::tick_to_price(100.0);
//! let back = tick::price_to_tick(price);
//! assert!((back - 100.0).abs() < 1e-9);
//! ```

/// Number of ticks stored per bitmap word.
pub const TICK_WORD_SIZE: i32 = 256;

/// Lowest representable tick.
pub const MIN_TICK: i32 = -887_272;

/// Highest representable tick.
pub const MAX_TICK: i32 = 887_272;

/// Converts a tick to the price at that boundary (`1.0001^tick`).
///
/// Accepts fractional ticks: depth interpolation works on the continuous
/// tick axis, not just on initialized boundaries.
#[must_use]
pub fn tick_to_price(tick: f64) -> f64 {
    1.0001f64.powf(tick)
}

/// Converts a price to its (fractional) tick coordinate
/// (`log(price) / log(1.0001)`).
#[must_use]
pub fn price_to_tick(price: f64) -> f64 {
    price.ln() / 1.0001f64.ln()
}

/// Maps a tick to its `(word, bit)` coordinate in the tick bitmap.
///
/// The tick is first compressed by `tick_spacing` using floor division, so
/// negative ticks that do not divide evenly round toward negative infinity —
/// matching the on-chain bitmap layout. The bit index is always in
/// `0..TICK_WORD_SIZE`.
#[must_use]
pub fn tick_to_word_and_bit(tick: i32, tick_spacing: i32) -> (i32, i32) {
    let compressed = tick.div_euclid(tick_spacing);
    let word = compressed.div_euclid(TICK_WORD_SIZE);
    let bit = compressed.rem_euclid(TICK_WORD_SIZE);
    (word, bit)
}

/// Reconstructs the tick denoted by a set bit in a bitmap word.
#[must_use]
pub fn tick_from_word_and_bit(word: i32, bit: i32, tick_spacing: i32) -> i32 {
    (word * TICK_WORD_SIZE + bit) * tick_spacing
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn price_of_tick_zero_is_one() {
        assert!((tick_to_price(0.0) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn tick_price_roundtrip() {
        for tick in [-50_000.0, -1.5, 0.0, 1.0, 200_000.0] {
            let back = price_to_tick(tick_to_price(tick));
            assert!((back - tick).abs() < 1e-6, "tick {tick} came back as {back}");
        }
    }

    #[test]
    fn boundary_ticks_have_finite_prices() {
        assert!(tick_to_price(f64::from(MIN_TICK)).is_finite());
        assert!(tick_to_price(f64::from(MAX_TICK)).is_finite());
        assert!(tick_to_price(f64::from(MIN_TICK)) > 0.0);
    }

    #[test]
    fn word_and_bit_at_origin() {
        assert_eq!(tick_to_word_and_bit(0, 60), (0, 0));
        assert_eq!(tick_to_word_and_bit(60, 60), (0, 1));
    }

    #[test]
    fn negative_ticks_round_toward_negative_infinity() {
        // -30 / 60 floors to -1, landing in word -1 at the top bit.
        assert_eq!(tick_to_word_and_bit(-30, 60), (-1, 255));
        assert_eq!(tick_to_word_and_bit(-60, 60), (-1, 255));
        assert_eq!(tick_to_word_and_bit(-61, 60), (-1, 254));
    }

    #[test]
    fn word_and_bit_roundtrip_on_spaced_ticks() {
        for tick in [-887_220, -15_360, -60, 0, 60, 15_360, 887_220] {
            let (word, bit) = tick_to_word_and_bit(tick, 60);
            assert_eq!(tick_from_word_and_bit(word, bit, 60), tick);
        }
    }
}
