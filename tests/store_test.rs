// ABOUTME: Tests for the in-memory record store
// ABOUTME: Owner isolation, bid updates, deletion semantics and the e-mail log

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use chrono::Utc;
use cleaners_assistant::models::{
    AttachmentKind, Bid, BusinessProfile, CleaningFrequency, Client, EmailLogEntry,
    SignedContract, SubscriptionTier,
};
use cleaners_assistant::store::Store;

fn client(owner: &str, id: &str) -> Client {
    Client {
        client_id: id.to_owned(),
        owner_id: owner.to_owned(),
        name: format!("Client {id}"),
        contact_email: "client@example.com".to_owned(),
        contact_number: "555-0100".to_owned(),
        cleaning_frequency: CleaningFrequency::Weekly,
    }
}

fn bid(owner: &str, client_id: &str, id: &str) -> Bid {
    Bid {
        bid_id: id.to_owned(),
        owner_id: owner.to_owned(),
        client_id: client_id.to_owned(),
        bid_address: "42 Elm St".to_owned(),
        notes: String::new(),
        before_photos: Vec::new(),
        after_photos: Vec::new(),
        quote_data: None,
        signed_contract: None,
        created_at: Utc::now(),
    }
}

fn log_entry(kind: AttachmentKind) -> EmailLogEntry {
    EmailLogEntry {
        timestamp: Utc::now(),
        to: "client@example.com".to_owned(),
        attachment: kind,
    }
}

#[tokio::test]
async fn test_clients_are_isolated_by_owner() {
    let store = Store::new();
    store.add_client(client("owner-a", "c1")).await;
    store.add_client(client("owner-b", "c2")).await;

    assert_eq!(store.list_clients("owner-a").await.len(), 1);
    assert!(store.find_client("owner-a", "c2").await.is_none());
    assert!(!store.delete_client("owner-a", "c2").await);
    assert!(store.delete_client("owner-b", "c2").await);
    assert!(store.list_clients("owner-b").await.is_empty());
}

#[tokio::test]
async fn test_clients_keep_insertion_order() {
    let store = Store::new();
    for id in ["c1", "c2", "c3"] {
        store.add_client(client("owner-a", id)).await;
    }
    let ids: Vec<String> = store
        .list_clients("owner-a")
        .await
        .into_iter()
        .map(|c| c.client_id)
        .collect();
    assert_eq!(ids, ["c1", "c2", "c3"]);
}

#[tokio::test]
async fn test_profile_replace() {
    let store = Store::new();
    assert!(store.get_profile("owner-a").await.is_none());

    let mut profile = BusinessProfile {
        owner_id: "owner-a".to_owned(),
        business_name: "Sparkle Co".to_owned(),
        ..BusinessProfile::default()
    };
    store.save_profile(profile.clone()).await;
    profile.business_name = "Sparkle & Shine".to_owned();
    store.save_profile(profile).await;

    let stored = store.get_profile("owner-a").await.unwrap();
    assert_eq!(stored.business_name, "Sparkle & Shine");
}

#[tokio::test]
async fn test_bid_filtering_and_updates() {
    let store = Store::new();
    store.add_bid(bid("owner-a", "c1", "b1")).await;
    store.add_bid(bid("owner-a", "c2", "b2")).await;

    assert_eq!(store.list_bids("owner-a", None).await.len(), 2);
    assert_eq!(store.list_bids("owner-a", Some("c2")).await.len(), 1);
    assert!(store.list_bids("owner-b", None).await.is_empty());

    let updated = store
        .update_bid("owner-a", "b1", |bid| {
            bid.signed_contract = Some(SignedContract {
                name: "Jordan Lee".to_owned(),
                timestamp: Utc::now(),
                signature_path: "uploads/signed_b1.png".to_owned(),
            });
        })
        .await
        .unwrap();
    assert!(updated.signed_contract.is_some());
    assert!(store
        .find_bid("owner-a", "b1")
        .await
        .unwrap()
        .signed_contract
        .is_some());

    assert!(store
        .update_bid("owner-b", "b1", |bid| bid.notes = "x".to_owned())
        .await
        .is_none());
}

#[tokio::test]
async fn test_delete_bid_clears_email_log() {
    let store = Store::new();
    store.add_bid(bid("owner-a", "c1", "b1")).await;
    store
        .append_email("owner-a", "b1", log_entry(AttachmentKind::Estimate))
        .await;
    store
        .append_email("owner-a", "b1", log_entry(AttachmentKind::Contract))
        .await;

    let log = store.list_emails("owner-a", "b1").await;
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].attachment, AttachmentKind::Estimate);
    assert!(store.list_emails("owner-b", "b1").await.is_empty());

    assert!(store.delete_bid("owner-a", "b1").await);
    assert!(store.list_emails("owner-a", "b1").await.is_empty());
    assert!(!store.delete_bid("owner-a", "b1").await);
}

#[tokio::test]
async fn test_subscriptions_default_to_free() {
    let store = Store::new();
    assert_eq!(store.get_subscription("owner-a").await, SubscriptionTier::Free);
    store
        .set_subscription("owner-a", SubscriptionTier::Enterprise)
        .await;
    assert_eq!(
        store.get_subscription("owner-a").await,
        SubscriptionTier::Enterprise
    );
}
