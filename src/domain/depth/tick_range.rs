//! # Tick-Range Depth Builder
//!
//! Depth reconstruction for concentrated-liquidity pools.
//!
//! A concentrated-liquidity pool spreads its liquidity over discrete tick
//! ranges; only ticks where liquidity changes are "initialized". Given a
//! snapshot of the initialized ticks near the current price (gathered by the
//! infrastructure layer through a bounded bitmap scan and one batched
//! multicall), the builder walks outward from the current tick in both
//! directions, converting the liquidity active in each crossed range into a
//! cumulative token-0 amount via the closed form
//! `Δx = (1/√p_lower − 1/√p_upper) · L`.
//!
//! Queries interpolate linearly on the tick axis between the bracketing
//! boundaries; price is exponential in tick, so tick-linear interpolation
//! tracks the true curve closely over one range. Targets beyond the outermost
//! known boundary saturate to the last cumulative value — liquidity outside
//! the scanned window is not known and is under-reported by design.

use super::curve::{DepthCurve, DepthProfile};
use crate::domain::errors::{DepthError, DepthResult};
use crate::domain::value_objects::tick::{self, MAX_TICK, MIN_TICK};
use crate::domain::value_objects::token::decimal_factor;
use std::collections::HashMap;

/// Snapshot of a concentrated-liquidity pool's tick state.
///
/// Produced by the on-chain read path; consumed exactly once by
/// [`TickRangeDepth::build`].
#[derive(Debug, Clone)]
pub struct TickRangeSnapshot {
    /// Raw spot price (token-1 per token-0, raw units) from the pool's slot0.
    pub spot_price: f64,
    /// Liquidity active at the current tick.
    pub active_liquidity: f64,
    /// Initialized ticks found in the scanned window, ascending.
    pub ticks: Vec<i32>,
    /// Net liquidity delta stored at each initialized tick.
    pub net_liquidity: HashMap<i32, i128>,
    /// Token-0 decimal precision.
    pub decimals_0: u8,
    /// Token-1 decimal precision.
    pub decimals_1: u8,
}

/// Depth profile of a concentrated-liquidity pool.
///
/// Holds the crossed tick boundaries and the parallel cumulative token-0
/// amounts for both walk directions. The first boundary of each direction is
/// the (fractional) current tick itself, paired with a cumulative amount of
/// zero; the last is a global min/max sentinel so a walk always has an outer
/// bound.
#[derive(Debug, Clone)]
pub struct TickRangeDepth {
    /// Fractional tick of the snapshot price.
    current_tick: f64,
    /// Boundaries crossed walking down (ticks ≤ current), descending.
    ask_ticks: Vec<f64>,
    /// Cumulative token-0 amounts, parallel to `ask_ticks`.
    ask_liquidity: Vec<f64>,
    /// Boundaries crossed walking up (ticks > current), ascending.
    bid_ticks: Vec<f64>,
    /// Cumulative token-0 amounts, parallel to `bid_ticks`.
    bid_liquidity: Vec<f64>,
    /// Decimal-normalization factor `10^(decimals_1 - decimals_0)`.
    balance_norm: f64,
}

impl TickRangeDepth {
    /// Builds a depth curve from a tick snapshot.
    ///
    /// The curve's reference price is `balance_norm / spot_price`, i.e. the
    /// pool price inverted into human token-0-per-token-1 terms; depth is
    /// reported in human token-0 units.
    ///
    /// # Errors
    ///
    /// Returns [`DepthError::NoInitializedTicks`] if the snapshot holds no
    /// initialized ticks; without at least one boundary there is nothing to
    /// anchor the walk on.
    pub fn build(snapshot: &TickRangeSnapshot) -> DepthResult<DepthCurve> {
        if snapshot.ticks.is_empty() {
            return Err(DepthError::NoInitializedTicks);
        }

        let calculated_tick = tick::price_to_tick(snapshot.spot_price);
        let current_tick = calculated_tick.floor() as i32;
        let scale_0 = 10f64.powi(i32::from(snapshot.decimals_0));

        let ask_seq: Vec<i32> = snapshot
            .ticks
            .iter()
            .rev()
            .copied()
            .filter(|&t| t <= current_tick)
            .chain([MIN_TICK])
            .collect();
        let bid_seq: Vec<i32> = snapshot
            .ticks
            .iter()
            .copied()
            .filter(|&t| t > current_tick)
            .chain([MAX_TICK])
            .collect();

        let (ask_ticks, ask_liquidity) = walk(
            &ask_seq,
            calculated_tick,
            snapshot.active_liquidity,
            &snapshot.net_liquidity,
            scale_0,
        );
        let (bid_ticks, bid_liquidity) = walk(
            &bid_seq,
            calculated_tick,
            snapshot.active_liquidity,
            &snapshot.net_liquidity,
            scale_0,
        );

        let balance_norm = decimal_factor(snapshot.decimals_1, snapshot.decimals_0);
        let price = balance_norm / snapshot.spot_price;
        let profile = Self {
            current_tick: calculated_tick,
            ask_ticks,
            ask_liquidity,
            bid_ticks,
            bid_liquidity,
            balance_norm,
        };
        Ok(DepthCurve::new(price, profile))
    }
}

impl DepthProfile for TickRangeDepth {
    fn depth_at(&self, target_price: f64) -> f64 {
        if target_price.is_nan() {
            return 0.0;
        }

        // Non-positive prices have no tick; treat them as the far bid bound.
        let target_tick = if target_price <= 0.0 {
            f64::from(MAX_TICK)
        } else {
            -tick::price_to_tick(target_price / self.balance_norm)
        };

        let (ticks, levels, i) = if target_tick <= self.current_tick {
            let i = self.ask_ticks.partition_point(|&t| t >= target_tick);
            (&self.ask_ticks, &self.ask_liquidity, i)
        } else {
            let i = self.bid_ticks.partition_point(|&t| t <= target_tick);
            (&self.bid_ticks, &self.bid_liquidity, i)
        };

        // Beyond the outermost known boundary: saturate.
        let Some(&last) = levels.last() else {
            return 0.0;
        };
        if i >= levels.len() {
            return last;
        }

        let span = (ticks[i] - ticks[i - 1]).abs();
        if span == 0.0 {
            return levels[i];
        }
        let share = (target_tick - ticks[i - 1]).abs() / span;
        levels[i - 1] + share * (levels[i] - levels[i - 1]).abs()
    }
}

/// Walks one direction of crossed boundaries, accumulating token-0 amounts.
///
/// Returns the boundary ticks (current tick prepended) and the parallel
/// cumulative amounts (zero prepended). Moving up through a tick adds its net
/// delta to the active liquidity; moving down removes the liquidity that tick
/// added on the way up.
fn walk(
    seq: &[i32],
    calculated_tick: f64,
    initial_liquidity: f64,
    net_liquidity: &HashMap<i32, i128>,
    scale_0: f64,
) -> (Vec<f64>, Vec<f64>) {
    let mut boundaries = Vec::with_capacity(seq.len() + 1);
    let mut cumulative = Vec::with_capacity(seq.len() + 1);
    boundaries.push(calculated_tick);
    cumulative.push(0.0);

    let mut total = 0.0;
    let mut last_tick = calculated_tick;
    let mut active = initial_liquidity;

    for &t in seq {
        let boundary = f64::from(t);
        // Sentinel boundaries are uninitialized and carry no delta.
        let net = net_liquidity.get(&t).copied().unwrap_or(0) as f64;

        let amount = if boundary > last_tick {
            let amount = token0_amount(active, last_tick, boundary, scale_0);
            active += net;
            amount
        } else {
            let amount = token0_amount(active, boundary, last_tick, scale_0);
            active -= net;
            amount
        };

        total += amount;
        boundaries.push(boundary);
        cumulative.push(total);
        last_tick = boundary;
    }

    (boundaries, cumulative)
}

/// Token-0 amount held by `liquidity` across `[tick_lower, tick_upper]`,
/// converted to human units: `Δx = (1/√p_lower − 1/√p_upper) · L`.
fn token0_amount(liquidity: f64, tick_lower: f64, tick_upper: f64, scale_0: f64) -> f64 {
    let sqrt_lower = tick::tick_to_price(tick_lower).sqrt();
    let sqrt_upper = tick::tick_to_price(tick_upper).sqrt();
    (1.0 / sqrt_lower - 1.0 / sqrt_upper) * liquidity / scale_0
}
