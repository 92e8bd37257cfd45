// ABOUTME: Deterministic quote engine for residential cleaning jobs
// ABOUTME: Combines fee components, a cleanliness multiplier and state sales tax
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Quote Engine
//!
//! Pricing for a single visit is built from independent fee components:
//!
//! ```text
//! subtotal = (base + pets + floors + windows + knickknacks + travel) * cleanliness
//! total    = subtotal + subtotal * state_tax_rate
//! ```
//!
//! Recurring visits are projected from the one-time total with fixed ratios
//! (`biweekly = total * 0.5`, `weekly = total * 0.333`).
//!
//! [`calculate_quote`] is pure and never fails. Out-of-range cleanliness or
//! knickknack levels fall back to their neutral values; range checks on the
//! numeric inputs live in [`QuoteRequest::validate`] so HTTP handlers can
//! reject bad input before pricing it.
//!
//! ```rust
//! use cleaners_assistant::quote::{calculate_quote, QuoteRequest};
//!
//! let request = QuoteRequest {
//!     square_footage: 1000.0,
//!     num_pets: 1,
//!     state: "TX".to_owned(),
//!     ..QuoteRequest::default()
//! };
//! let quote = calculate_quote(&request);
//! assert!((quote.subtotal - 135.0).abs() < 1e-9);
//! ```

/// Per-state sales tax table
pub mod tax;

pub use tax::{is_known_state, state_tax_rate, STATE_TAX_RATES};

use crate::constants::pricing;
use crate::errors::{AppError, AppResult};
use crate::models::CleaningFrequency;
use serde::{Deserialize, Serialize};

/// Inputs describing a cleaning job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Finished floor area in square feet
    #[serde(alias = "total_sqft")]
    pub square_footage: f64,
    /// Number of pets in the home
    #[serde(default)]
    pub num_pets: u32,
    /// Number of windows to clean
    #[serde(default)]
    pub num_windows: u32,
    /// Whether outside panes are included
    #[serde(default)]
    pub windows_outside: bool,
    /// Cleanliness level, 0 (tidy) to 5 (heavy)
    #[serde(default)]
    pub cleanliness: i64,
    /// One-way distance to the job in miles
    #[serde(default)]
    pub travel_miles: f64,
    /// Two-letter state code used for sales tax
    #[serde(default)]
    pub state: String,
    /// Knickknack density, 0 (none) to 3 (many)
    #[serde(default)]
    pub knickknack: i64,
    /// Carpeted floors present
    #[serde(default)]
    pub floor_carpet: bool,
    /// Hardwood floors present
    #[serde(default)]
    pub floor_hardwood: bool,
    /// Tile floors present
    #[serde(default)]
    pub floor_tile: bool,
    /// Laminate floors present
    #[serde(default)]
    pub floor_laminate: bool,
}

impl QuoteRequest {
    /// Reject negative or non-finite distances and areas
    ///
    /// # Errors
    ///
    /// Returns `VALUE_OUT_OF_RANGE` naming the offending field
    pub fn validate(&self) -> AppResult<()> {
        check_non_negative("square_footage", self.square_footage)?;
        check_non_negative("travel_miles", self.travel_miles)?;
        Ok(())
    }
}

fn check_non_negative(field: &str, value: f64) -> AppResult<()> {
    if !value.is_finite() {
        return Err(AppError::out_of_range(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(AppError::out_of_range(field, "must not be negative"));
    }
    Ok(())
}

/// Itemized price for a cleaning job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Area-based base rate
    pub base_rate: f64,
    /// Pet surcharge
    pub pet_fee: f64,
    /// Floor-type surcharge
    pub floor_fee: f64,
    /// Window cleaning fee
    pub window_fee: f64,
    /// Knickknack dusting fee
    pub knickknack_fee: f64,
    /// Round-trip travel fee
    pub travel_fee: f64,
    /// Multiplier applied for the home's condition
    pub cleanliness_multiplier: f64,
    /// Fees times multiplier, before tax
    pub subtotal: f64,
    /// Sales tax on the subtotal
    pub tax: f64,
    /// One-time (deep clean) price
    pub total: f64,
    /// Per-visit price on a bi-weekly schedule
    pub biweekly: f64,
    /// Per-visit price on a weekly schedule
    pub weekly: f64,
}

impl Quote {
    /// Per-visit price for a client's chosen frequency
    #[must_use]
    pub const fn price_for(&self, frequency: CleaningFrequency) -> f64 {
        match frequency {
            CleaningFrequency::Single => self.total,
            CleaningFrequency::Bimonthly => self.biweekly,
            CleaningFrequency::Weekly => self.weekly,
        }
    }
}

/// Multiplier for a cleanliness level; 1.00 outside 0..=5
#[must_use]
pub fn cleanliness_multiplier(level: i64) -> f64 {
    usize::try_from(level)
        .ok()
        .and_then(|index| pricing::CLEANLINESS_MULTIPLIERS.get(index))
        .copied()
        .unwrap_or(1.0)
}

/// Fee for a knickknack density level; 0 outside 0..=3
#[must_use]
pub fn knickknack_fee(level: i64) -> f64 {
    usize::try_from(level)
        .ok()
        .and_then(|index| pricing::KNICKKNACK_FEES.get(index))
        .copied()
        .unwrap_or(0.0)
}

/// Combined surcharge for the floor types present
#[must_use]
pub fn floor_type_cost(carpet: bool, hardwood: bool, tile: bool, laminate: bool) -> f64 {
    [
        (carpet, pricing::FLOOR_CARPET),
        (hardwood, pricing::FLOOR_HARDWOOD),
        (tile, pricing::FLOOR_TILE),
        (laminate, pricing::FLOOR_LAMINATE),
    ]
    .iter()
    .filter(|(present, _)| *present)
    .map(|(_, fee)| fee)
    .sum()
}

/// Price a cleaning job
#[must_use]
pub fn calculate_quote(request: &QuoteRequest) -> Quote {
    let base_rate = request.square_footage * pricing::RATE_PER_SQFT;
    let pet_fee = f64::from(request.num_pets) * pricing::PET_FEE;
    let window_rate = if request.windows_outside {
        pricing::WINDOW_FEE_OUTSIDE
    } else {
        pricing::WINDOW_FEE_INSIDE
    };
    let window_fee = f64::from(request.num_windows) * window_rate;
    let floor_fee = floor_type_cost(
        request.floor_carpet,
        request.floor_hardwood,
        request.floor_tile,
        request.floor_laminate,
    );
    let knickknack_fee = knickknack_fee(request.knickknack);
    let travel_fee = request.travel_miles * 2.0 * pricing::TRAVEL_RATE_PER_MILE;
    let cleanliness_multiplier = cleanliness_multiplier(request.cleanliness);

    let subtotal = (base_rate + pet_fee + floor_fee + window_fee + knickknack_fee + travel_fee)
        * cleanliness_multiplier;
    let tax = subtotal * state_tax_rate(&request.state);
    let total = subtotal + tax;

    Quote {
        base_rate,
        pet_fee,
        floor_fee,
        window_fee,
        knickknack_fee,
        travel_fee,
        cleanliness_multiplier,
        subtotal,
        tax,
        total,
        biweekly: total * pricing::BIWEEKLY_RATIO,
        weekly: total * pricing::WEEKLY_RATIO,
    }
}
