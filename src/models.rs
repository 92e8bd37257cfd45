// ABOUTME: Core domain types for clients, bids, contracts, profiles and subscriptions
// ABOUTME: Serde representations double as the JSON returned by the HTTP API
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Domain Models
//!
//! Every record is owned by a Firebase UID (`owner_id`). Records are never
//! shared between owners; the store enforces that by keying on the UID.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::quote::Quote;

/// Base URL for map search links
const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";

/// How often a client is cleaned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleaningFrequency {
    /// One-time deep clean
    #[default]
    Single,
    /// Every other week
    Bimonthly,
    /// Every week
    Weekly,
}

impl CleaningFrequency {
    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Bimonthly => "bimonthly",
            Self::Weekly => "weekly",
        }
    }

    /// Label printed on documents
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Single => "One-time",
            Self::Bimonthly => "Bi-weekly",
            Self::Weekly => "Weekly",
        }
    }

    /// Whether visits repeat
    #[must_use]
    pub const fn is_recurring(self) -> bool {
        !matches!(self, Self::Single)
    }
}

impl fmt::Display for CleaningFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CleaningFrequency {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "bimonthly" => Ok(Self::Bimonthly),
            "weekly" => Ok(Self::Weekly),
            other => Err(AppError::invalid_format(
                "cleaning_frequency",
                format!("'{other}' is not one of single, bimonthly, weekly"),
            )),
        }
    }
}

/// A customer of the cleaning business
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Unique client ID
    pub client_id: String,
    /// Firebase UID of the business owner
    pub owner_id: String,
    /// Client's full name
    pub name: String,
    /// Contact e-mail
    pub contact_email: String,
    /// Contact phone number
    pub contact_number: String,
    /// Agreed visit frequency
    pub cleaning_frequency: CleaningFrequency,
}

/// A signed service agreement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedContract {
    /// Printed name of the signer
    pub name: String,
    /// When the contract was signed
    pub timestamp: DateTime<Utc>,
    /// Stored signature image
    pub signature_path: String,
}

/// A bid for a cleaning job at one address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    /// Unique bid ID
    pub bid_id: String,
    /// Firebase UID of the business owner
    pub owner_id: String,
    /// Client this bid belongs to
    pub client_id: String,
    /// Street address of the job
    pub bid_address: String,
    /// Free-form notes
    #[serde(default)]
    pub notes: String,
    /// Stored photos taken before cleaning
    #[serde(default)]
    pub before_photos: Vec<String>,
    /// Stored photos taken after cleaning
    #[serde(default)]
    pub after_photos: Vec<String>,
    /// Quote computed when the bid was saved
    #[serde(default)]
    pub quote_data: Option<Quote>,
    /// Signature, once the client has signed
    #[serde(default)]
    pub signed_contract: Option<SignedContract>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Bid {
    /// Map search link for the bid address
    #[must_use]
    pub fn maps_link(&self) -> String {
        maps_link(&self.bid_address)
    }
}

/// Build a map search link; spaces become `+`, other reserved characters are percent-encoded
#[must_use]
pub fn maps_link(address: &str) -> String {
    let query = urlencoding::encode(address.trim()).replace("%20", "+");
    format!("{MAPS_SEARCH_URL}{query}")
}

/// Business details printed on documents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessProfile {
    /// Firebase UID of the owner
    pub owner_id: String,
    /// Owner's personal name
    #[serde(default)]
    pub owner_name: Option<String>,
    /// Trading name
    pub business_name: String,
    /// Business street address
    pub business_address: String,
    /// Business e-mail
    pub contact_email: String,
    /// Business phone
    pub contact_number: String,
    /// Stored logo image
    #[serde(default)]
    pub logo_url: Option<String>,
    /// Stored Venmo QR image
    #[serde(default)]
    pub qr_venmo_url: Option<String>,
    /// Stored PayPal QR image
    #[serde(default)]
    pub qr_paypal_url: Option<String>,
}

/// Subscription plan
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    /// Default plan
    #[default]
    Free,
    /// Paid plan unlocking the area estimator
    Pro,
    /// Highest plan
    Enterprise,
}

impl SubscriptionTier {
    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
            Self::Enterprise => "enterprise",
        }
    }

    /// Capitalized name for user-facing messages
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Pro => "Pro",
            Self::Enterprise => "Enterprise",
        }
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionTier {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "pro" => Ok(Self::Pro),
            "enterprise" => Ok(Self::Enterprise),
            _ => Err(AppError::invalid_input("Invalid subscription level")
                .with_details(serde_json::json!({ "allowed": ["free", "pro", "enterprise"] }))),
        }
    }
}

/// Which document an e-mail carried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    /// Estimate PDF
    Estimate,
    /// Contract PDF
    Contract,
}

impl AttachmentKind {
    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Estimate => "estimate",
            Self::Contract => "contract",
        }
    }
}

/// One delivered e-mail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailLogEntry {
    /// Send time
    pub timestamp: DateTime<Utc>,
    /// Recipient
    pub to: String,
    /// Document attached
    pub attachment: AttachmentKind,
}

/// Check an address has the `local@domain.tld` shape
#[must_use]
pub fn is_valid_email(address: &str) -> bool {
    let address = address.trim();
    if address.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !host.starts_with('.') && tld.len() >= 2
}
