// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! nsk-nice: tick sequences for plot axes
//!
//! [`nice_ticks`] covers plain numbers; [`nice_time_ticks`] walks a cascade
//! of calendar levels so ticks land on month starts, midnights, whole
//! minutes and so on.

mod calendar;
mod error;
mod numeric;

pub use calendar::{nice_time_ticks, TimeLevel, TimeTicks};
pub use error::TickError;
pub use numeric::{
    nice_ceil, nice_floor, nice_round, nice_ticks, TickIter, TickOptions, Ticks,
    DEFAULT_INTERVALS,
};
