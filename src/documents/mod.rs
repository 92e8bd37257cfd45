// ABOUTME: Business documents rendered from domain records
// ABOUTME: Estimate and contract PDFs plus the appointment calendar invite
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Documents
//!
//! Renders the three artifacts a business sends to its clients:
//!
//! - **Estimate PDF**: itemized [`Quote`] under the business header
//! - **Contract PDF**: service agreement with pricing, terms and signatures
//! - **Calendar invite**: an ICS event for the first (or only) visit

/// iCalendar writer
pub mod calendar;
/// PDF writer
pub mod pdf;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::constants::{documents as text, service_names};
use crate::models::{Bid, BusinessProfile, CleaningFrequency, Client};
use crate::quote::Quote;
use calendar::{CalendarEvent, Participant};
use pdf::{Align, Font, PdfImage, PdfWriter};

/// Printed width of a client's signature image (about 60 mm)
const SIGNATURE_WIDTH_PT: f64 = 170.0;

fn money(amount: f64) -> String {
    format!("${amount:.2}")
}

fn business_header(pdf: &mut PdfWriter, business: &BusinessProfile, title: &str) {
    pdf.set_font(Font::Bold, 16.0)
        .text(&business.business_name, Align::Center);
    pdf.set_font(Font::Regular, 12.0).text(title, Align::Center);
    pdf.space(12.0);
}

/// Render an itemized estimate
#[must_use]
pub fn render_estimate(business: &BusinessProfile, quote: &Quote) -> Vec<u8> {
    let mut pdf = PdfWriter::new();
    business_header(&mut pdf, business, "Estimate Summary");

    pdf.line(&format!(
        "Contact: {} | {}",
        business.contact_email, business.contact_number
    ))
    .line(&format!("Address: {}", business.business_address))
    .space(6.0);

    pdf.line(&format!("Base Rate: {}", money(quote.base_rate)))
        .line(&format!("Pet Fee: {}", money(quote.pet_fee)))
        .line(&format!("Floor Fee: {}", money(quote.floor_fee)))
        .line(&format!("Window Fee: {}", money(quote.window_fee)))
        .line(&format!("Knickknack Fee: {}", money(quote.knickknack_fee)))
        .line(&format!("Travel Fee: {}", money(quote.travel_fee)))
        .line(&format!(
            "Cleanliness Multiplier: x{:.2}",
            quote.cleanliness_multiplier
        ))
        .line(&format!("Subtotal: {}", money(quote.subtotal)))
        .line(&format!("Tax: {}", money(quote.tax)))
        .space(6.0);

    pdf.set_font(Font::Bold, 12.0)
        .line(&format!("TOTAL: {}", money(quote.total)));
    pdf.set_font(Font::Regular, 12.0)
        .line(&format!("Bi-Weekly: {}", money(quote.biweekly)))
        .line(&format!("Weekly: {}", money(quote.weekly)));

    pdf.finish()
}

/// Render a service agreement
///
/// When the bid carries a signature the client block shows the signature
/// image (if one could be decoded) above the signer's name and signing
/// date; otherwise blank signature lines are printed.
#[must_use]
pub fn render_contract(
    business: &BusinessProfile,
    client: &Client,
    bid: &Bid,
    quote: &Quote,
    signature: Option<&PdfImage>,
) -> Vec<u8> {
    const BLANK: &str = "______________________________";
    const BLANK_DATE: &str = "Date: ____________________";

    let mut pdf = PdfWriter::new();
    business_header(&mut pdf, business, "Service Agreement");

    pdf.line(&format!("Client: {}", client.name))
        .line(&format!("Service Address: {}", bid.bid_address))
        .line(&format!(
            "Contact: {} | {}",
            client.contact_email, client.contact_number
        ))
        .line(&format!(
            "Cleaning Frequency: {}",
            client.cleaning_frequency.label()
        ))
        .space(6.0);

    if !bid.notes.trim().is_empty() {
        pdf.line(&format!("Service Notes:\n{}", bid.notes)).space(6.0);
    }

    pdf.set_font(Font::Bold, 12.0).line("Pricing Summary");
    pdf.set_font(Font::Regular, 12.0)
        .line(&format!("One-Time / Deep Clean: {}", money(quote.total)))
        .line(&format!("Bi-Weekly: {}", money(quote.biweekly)))
        .line(&format!("Weekly: {}", money(quote.weekly)));
    pdf.set_font(Font::Bold, 12.0).line(&format!(
        "Agreed Rate ({}): {} per visit",
        client.cleaning_frequency.label(),
        money(quote.price_for(client.cleaning_frequency))
    ));
    pdf.space(12.0);

    pdf.set_font(Font::Regular, 11.0)
        .line(&format!("Terms:\n{}", text::CONTRACT_TERMS));
    pdf.space(18.0);

    pdf.set_font(Font::Bold, 12.0)
        .columns("Client Signature:", "Cleaner Signature:");
    pdf.set_font(Font::Regular, 12.0);
    match &bid.signed_contract {
        Some(signed) => {
            if let Some(image) = signature {
                pdf.image(image, SIGNATURE_WIDTH_PT);
            }
            pdf.columns(&format!("Signed: {}", signed.name), BLANK).columns(
                &format!("Date: {}", signed.timestamp.format("%Y-%m-%d %H:%M UTC")),
                BLANK_DATE,
            );
        }
        None => {
            pdf.columns(BLANK, BLANK).space(6.0).columns(BLANK_DATE, BLANK_DATE);
        }
    }

    pdf.finish()
}

/// Recurrence rule for a cleaning frequency
#[must_use]
pub const fn recurrence_rule(frequency: CleaningFrequency) -> Option<&'static str> {
    match frequency {
        CleaningFrequency::Single => None,
        CleaningFrequency::Bimonthly => Some("FREQ=WEEKLY;INTERVAL=2"),
        CleaningFrequency::Weekly => Some("FREQ=WEEKLY"),
    }
}

/// Build the appointment invite for a contract
#[must_use]
pub fn contract_invite(
    business: &BusinessProfile,
    client: &Client,
    bid: &Bid,
    start: DateTime<Utc>,
    duration: Duration,
) -> CalendarEvent {
    let mut description = vec![format!("Client phone: {}", client.contact_number)];
    if let Some(quote) = &bid.quote_data {
        description.push(format!(
            "Rate ({}): {}",
            client.cleaning_frequency.label(),
            money(quote.price_for(client.cleaning_frequency))
        ));
    }
    if !bid.notes.trim().is_empty() {
        description.push(format!("Notes: {}", bid.notes.trim()));
    }
    description.push(text::CALENDAR_CONFIRMATION.to_owned());

    CalendarEvent {
        uid: format!("{}@{}", Uuid::new_v4(), service_names::CLEANERS_ASSISTANT),
        stamp: Utc::now(),
        start,
        end: start + duration,
        summary: format!("Cleaning Service for {}", client.name),
        location: bid.bid_address.clone(),
        description: description.join("\n"),
        organizer: Some(Participant {
            name: business.business_name.clone(),
            email: Some(business.contact_email.clone()),
        }),
        attendee: Some(Participant {
            name: client.name.clone(),
            email: Some(client.contact_email.clone()),
        }),
        rrule: recurrence_rule(client.cleaning_frequency).map(str::to_owned),
    }
}
