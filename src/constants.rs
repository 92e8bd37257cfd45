// ABOUTME: Application constants grouped by domain
// ABOUTME: Service names, default configuration values, pricing constants and document text
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Application constants organized by domain

/// Service identification
pub mod service_names {
    /// Service name used in logs and the ICS product identifier
    pub const CLEANERS_ASSISTANT: &str = "cleaners-assistant";
    /// Human-facing product name
    pub const PRODUCT_NAME: &str = "Home Cleaner's Assistant";
}

/// Defaults applied when an environment variable is absent
pub mod defaults {
    /// Default HTTP port
    pub const HTTP_PORT: u16 = 8081;
    /// Default bind host
    pub const HOST: &str = "127.0.0.1";
    /// Origins of the local web frontend
    pub const CORS_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";
    /// Directory for uploads and generated documents
    pub const UPLOADS_DIR: &str = "uploads";
    /// Maximum accepted request body (10 MiB)
    pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
    /// Default SMTP relay
    pub const SMTP_HOST: &str = "smtp.gmail.com";
    /// Default SMTP submission port (STARTTLS)
    pub const SMTP_PORT: u16 = 587;
    /// Firebase public key cache TTL in seconds
    pub const FIREBASE_KEY_CACHE_TTL_SECS: u64 = 3600;
    /// Reference width of a room photo in inches
    pub const AREA_KNOWN_WIDTH_INCHES: f64 = 120.0;
    /// Length of a calendar booking in hours
    pub const BOOKING_DURATION_HOURS: i64 = 3;
    /// Hour of day (UTC) used when no booking start is supplied
    pub const BOOKING_START_HOUR: u32 = 9;
}

/// Pricing constants for the quote engine
pub mod pricing {
    /// Dollars per square foot
    pub const RATE_PER_SQFT: f64 = 0.12;
    /// Flat fee per pet
    pub const PET_FEE: f64 = 15.0;
    /// Per-window fee when outside panes are included
    pub const WINDOW_FEE_OUTSIDE: f64 = 7.0;
    /// Per-window fee for inside panes only
    pub const WINDOW_FEE_INSIDE: f64 = 4.0;
    /// Carpet surcharge
    pub const FLOOR_CARPET: f64 = 10.0;
    /// Hardwood surcharge
    pub const FLOOR_HARDWOOD: f64 = 15.0;
    /// Tile surcharge
    pub const FLOOR_TILE: f64 = 15.0;
    /// Laminate surcharge
    pub const FLOOR_LAMINATE: f64 = 10.0;
    /// Knickknack fee by density level 0..=3
    pub const KNICKKNACK_FEES: [f64; 4] = [0.0, 10.0, 15.0, 20.0];
    /// Cleanliness multiplier by level 0..=5
    pub const CLEANLINESS_MULTIPLIERS: [f64; 6] = [1.00, 1.05, 1.10, 1.20, 1.30, 1.50];
    /// Dollars per mile, charged for the round trip
    pub const TRAVEL_RATE_PER_MILE: f64 = 0.5;
    /// Bi-weekly visit price as a share of a one-time clean
    pub const BIWEEKLY_RATIO: f64 = 0.5;
    /// Weekly visit price as a share of a one-time clean
    pub const WEEKLY_RATIO: f64 = 0.333;
}

/// Fixed document text
pub mod documents {
    /// Terms paragraph printed on every service agreement
    pub const CONTRACT_TERMS: &str = "This agreement includes cleaning services based on the \
        frequency listed. Payment is due upon completion unless otherwise stated in writing. \
        Cancellations require 24 hours' notice or may incur a service fee. Client agrees to \
        provide access and ensure safety for cleaning personnel.";
    /// Footer line on calendar invites
    pub const CALENDAR_CONFIRMATION: &str = "Confirmed via Home Cleaner's Assistant";
    /// Subject of estimate e-mails
    pub const ESTIMATE_EMAIL_SUBJECT: &str = "Your Estimate";
    /// Body of estimate e-mails
    pub const ESTIMATE_EMAIL_BODY: &str = "Here is your cleaning estimate.";
    /// Subject of contract e-mails
    pub const CONTRACT_EMAIL_SUBJECT: &str = "Your Contract";
    /// Body of contract e-mails
    pub const CONTRACT_EMAIL_BODY: &str = "Please review and sign.";
}
