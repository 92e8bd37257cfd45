// ABOUTME: Process-local store for clients, bids, profiles, subscriptions and the e-mail log
// ABOUTME: All data is keyed by owner UID behind a single async read-write lock
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # In-Memory Store
//!
//! Holds every record for the lifetime of the process. Nothing is persisted;
//! a restart starts from an empty store. Each collection is keyed by the
//! owner's Firebase UID so one owner can never observe another's records.
//!
//! Deletes are idempotent: removing a record that does not exist is not an
//! error.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{Bid, BusinessProfile, Client, EmailLogEntry, SubscriptionTier};

#[derive(Debug, Default)]
struct StoreData {
    clients: HashMap<String, Vec<Client>>,
    bids: HashMap<String, Vec<Bid>>,
    profiles: HashMap<String, BusinessProfile>,
    subscriptions: HashMap<String, SubscriptionTier>,
    email_log: HashMap<(String, String), Vec<EmailLogEntry>>,
}

/// Shared in-memory store
#[derive(Debug, Default)]
pub struct Store {
    data: RwLock<StoreData>,
}

impl Store {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ================================
    // Clients
    // ================================

    /// Append a client to its owner's list
    pub async fn add_client(&self, client: Client) {
        let mut data = self.data.write().await;
        data.clients
            .entry(client.owner_id.clone())
            .or_default()
            .push(client);
    }

    /// All clients for an owner, in insertion order
    pub async fn list_clients(&self, owner_id: &str) -> Vec<Client> {
        let data = self.data.read().await;
        data.clients.get(owner_id).cloned().unwrap_or_default()
    }

    /// Look up one client
    pub async fn find_client(&self, owner_id: &str, client_id: &str) -> Option<Client> {
        let data = self.data.read().await;
        data.clients
            .get(owner_id)?
            .iter()
            .find(|client| client.client_id == client_id)
            .cloned()
    }

    /// Remove a client; returns whether anything was removed
    pub async fn delete_client(&self, owner_id: &str, client_id: &str) -> bool {
        let mut data = self.data.write().await;
        let Some(clients) = data.clients.get_mut(owner_id) else {
            return false;
        };
        let before = clients.len();
        clients.retain(|client| client.client_id != client_id);
        let removed = clients.len() != before;
        debug!(owner_id, client_id, removed, "Deleted client");
        removed
    }

    // ================================
    // Business profiles
    // ================================

    /// Insert or replace an owner's business profile
    pub async fn save_profile(&self, profile: BusinessProfile) {
        let mut data = self.data.write().await;
        data.profiles.insert(profile.owner_id.clone(), profile);
    }

    /// An owner's business profile
    pub async fn get_profile(&self, owner_id: &str) -> Option<BusinessProfile> {
        self.data.read().await.profiles.get(owner_id).cloned()
    }

    // ================================
    // Bids
    // ================================

    /// Append a bid to its owner's list
    pub async fn add_bid(&self, bid: Bid) {
        let mut data = self.data.write().await;
        data.bids.entry(bid.owner_id.clone()).or_default().push(bid);
    }

    /// Bids for an owner, optionally only those for one client
    pub async fn list_bids(&self, owner_id: &str, client_id: Option<&str>) -> Vec<Bid> {
        let data = self.data.read().await;
        data.bids
            .get(owner_id)
            .map(|bids| {
                bids.iter()
                    .filter(|bid| client_id.is_none_or(|id| bid.client_id == id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Look up one bid
    pub async fn find_bid(&self, owner_id: &str, bid_id: &str) -> Option<Bid> {
        let data = self.data.read().await;
        data.bids
            .get(owner_id)?
            .iter()
            .find(|bid| bid.bid_id == bid_id)
            .cloned()
    }

    /// Mutate a bid in place and return the updated copy
    pub async fn update_bid<F>(&self, owner_id: &str, bid_id: &str, update: F) -> Option<Bid>
    where
        F: FnOnce(&mut Bid),
    {
        let mut data = self.data.write().await;
        let bid = data
            .bids
            .get_mut(owner_id)?
            .iter_mut()
            .find(|bid| bid.bid_id == bid_id)?;
        update(bid);
        Some(bid.clone())
    }

    /// Remove a bid and its e-mail log; returns whether a bid was removed
    pub async fn delete_bid(&self, owner_id: &str, bid_id: &str) -> bool {
        let mut data = self.data.write().await;
        data.email_log
            .remove(&(owner_id.to_owned(), bid_id.to_owned()));
        let Some(bids) = data.bids.get_mut(owner_id) else {
            return false;
        };
        let before = bids.len();
        bids.retain(|bid| bid.bid_id != bid_id);
        bids.len() != before
    }

    // ================================
    // Subscriptions
    // ================================

    /// Set an owner's plan
    pub async fn set_subscription(&self, owner_id: &str, tier: SubscriptionTier) {
        let mut data = self.data.write().await;
        data.subscriptions.insert(owner_id.to_owned(), tier);
    }

    /// An owner's plan, `free` when never set
    pub async fn get_subscription(&self, owner_id: &str) -> SubscriptionTier {
        self.data
            .read()
            .await
            .subscriptions
            .get(owner_id)
            .copied()
            .unwrap_or_default()
    }

    // ================================
    // E-mail log
    // ================================

    /// Record a delivered e-mail for a bid
    pub async fn append_email(&self, owner_id: &str, bid_id: &str, entry: EmailLogEntry) {
        let mut data = self.data.write().await;
        data.email_log
            .entry((owner_id.to_owned(), bid_id.to_owned()))
            .or_default()
            .push(entry);
    }

    /// E-mails sent for a bid, oldest first
    pub async fn list_emails(&self, owner_id: &str, bid_id: &str) -> Vec<EmailLogEntry> {
        let data = self.data.read().await;
        data.email_log
            .get(&(owner_id.to_owned(), bid_id.to_owned()))
            .cloned()
            .unwrap_or_default()
    }
}
