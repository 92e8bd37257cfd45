// ABOUTME: Command-line quote calculator
// ABOUTME: Prints the itemized quote for a home as JSON without running the server
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Quote Calculator
//!
//! ```text
//! cleaners-quote --sqft 2000 --state CA --pets 1 --floor-hardwood
//! ```

use anyhow::Result;
use clap::Parser;
use cleaners_assistant::quote::{calculate_quote, is_known_state, QuoteRequest};

#[derive(Parser)]
#[command(name = "cleaners-quote")]
#[command(about = "Calculate a cleaning quote")]
pub struct Args {
    /// Finished floor area in square feet
    #[arg(long)]
    sqft: f64,

    /// Two-letter state code for sales tax
    #[arg(long, default_value = "")]
    state: String,

    /// Number of pets
    #[arg(long, default_value_t = 0)]
    pets: u32,

    /// Number of windows
    #[arg(long, default_value_t = 0)]
    windows: u32,

    /// Include outside panes
    #[arg(long)]
    windows_outside: bool,

    /// Cleanliness level 0-5
    #[arg(long, default_value_t = 0)]
    cleanliness: i64,

    /// Knickknack density 0-3
    #[arg(long, default_value_t = 0)]
    knickknack: i64,

    /// One-way travel distance in miles
    #[arg(long, default_value_t = 0.0)]
    miles: f64,

    /// Carpeted floors
    #[arg(long)]
    floor_carpet: bool,

    /// Hardwood floors
    #[arg(long)]
    floor_hardwood: bool,

    /// Tile floors
    #[arg(long)]
    floor_tile: bool,

    /// Laminate floors
    #[arg(long)]
    floor_laminate: bool,
}

impl From<Args> for QuoteRequest {
    fn from(args: Args) -> Self {
        Self {
            square_footage: args.sqft,
            num_pets: args.pets,
            num_windows: args.windows,
            windows_outside: args.windows_outside,
            cleanliness: args.cleanliness,
            travel_miles: args.miles,
            state: args.state,
            knickknack: args.knickknack,
            floor_carpet: args.floor_carpet,
            floor_hardwood: args.floor_hardwood,
            floor_tile: args.floor_tile,
            floor_laminate: args.floor_laminate,
        }
    }
}

fn main() -> Result<()> {
    let request = QuoteRequest::from(Args::parse());
    request.validate()?;
    if !request.state.is_empty() && !is_known_state(&request.state) {
        eprintln!("Unknown state '{}'; no sales tax applied", request.state);
    }

    let quote = calculate_quote(&request);
    println!("{}", serde_json::to_string_pretty(&quote)?);
    Ok(())
}
