//! Entry setup and unload

use std::sync::Arc;

use mcws_api::testing::FakeMediaServer;
use mcws_api::{ApiError, MediaServer, PlaybackInfo, PlaybackState, Zone};

use jriver_sdk::{EntityRegistry, EntryConfig, SdkError};

fn server() -> Arc<FakeMediaServer> {
    Arc::new(
        FakeMediaServer::new()
            .with_zones(vec![Zone::new("0", "Main").active(), Zone::new("1", "Kitchen")])
            .with_playback(None, PlaybackInfo::new(PlaybackState::Stopped))
            .with_playback(Some("Main"), PlaybackInfo::new(PlaybackState::Playing))
            .with_playback(Some("Kitchen"), PlaybackInfo::new(PlaybackState::Paused)),
    )
}

fn client(fake: &Arc<FakeMediaServer>) -> Arc<dyn MediaServer> {
    fake.clone()
}

#[tokio::test]
async fn test_single_player_without_zones() {
    let fake = server();
    let registry = EntityRegistry::new();

    let entry = registry
        .setup_entry("entry1", EntryConfig::new("media.local"), client(&fake))
        .await
        .unwrap();

    assert_eq!(entry.players.len(), 1);
    let player = &entry.players[0];
    assert_eq!(player.name(), "media.local Player");
    assert_eq!(player.unique_id(), "entry1_player");
    assert_eq!(player.zone(), None);
    assert!(entry.coordinator.is_running());
    assert_eq!(registry.len(), 1);

    assert!(registry.unload_entry("entry1").await.unwrap());
}

#[tokio::test]
async fn test_player_per_zone() {
    let fake = server();
    let registry = EntityRegistry::new();
    let config = EntryConfig::new("media.local").with_zones(["Main", "Kitchen"]);

    let entry = registry.setup_entry("entry1", config, client(&fake)).await.unwrap();

    let names: Vec<&str> = entry.players.iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["media.local Player - Main", "media.local Player - Kitchen"]);
    let ids: Vec<&str> = entry.players.iter().map(|p| p.unique_id()).collect();
    assert_eq!(ids, vec!["entry1_player-Main", "entry1_player-Kitchen"]);

    // Zone players share the entry's device unless asked otherwise
    assert_eq!(entry.players[0].device_info(), entry.players[1].device_info());
    assert_eq!(entry.players[0].device_info().identifiers[0].1, "entry1_player");

    assert!(registry.player("entry1_player-Kitchen").is_some());
    assert_eq!(
        registry.player("entry1_player-Kitchen").unwrap().state(),
        jriver_sdk::PlayerState::Paused
    );

    registry.unload_entry("entry1").await.unwrap();
}

#[tokio::test]
async fn test_device_per_zone() {
    let fake = server();
    let registry = EntityRegistry::new();
    let mut config = EntryConfig::new("media.local").with_zones(["Main", "Kitchen"]);
    config.device_per_zone = true;

    let entry = registry.setup_entry("entry1", config, client(&fake)).await.unwrap();

    assert_ne!(entry.players[0].device_info(), entry.players[1].device_info());
    assert_eq!(entry.players[1].device_info().identifiers[0].1, "entry1_player-Kitchen");

    registry.unload_entry("entry1").await.unwrap();
}

#[tokio::test]
async fn test_duplicate_host_is_refused() {
    let fake = server();
    let registry = EntityRegistry::new();
    registry
        .setup_entry("entry1", EntryConfig::new("media.local"), client(&fake))
        .await
        .unwrap();

    let second = server();
    let result = registry
        .setup_entry("entry2", EntryConfig::new("MEDIA.local"), client(&second))
        .await;

    assert!(matches!(result, Err(SdkError::AlreadyConfigured(ref host)) if host == "MEDIA.local"));
    assert!(second.calls().is_empty());
    assert_eq!(registry.find_entry_for_host("media.local").as_deref(), Some("entry1"));

    registry.unload_entry("entry1").await.unwrap();
}

/// Both setups pass the first check, then finish connecting one after the other
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_setups_register_once() {
    for (first_id, second_id) in [("entry1", "entry2"), ("entry1", "entry1")] {
        let registry = Arc::new(EntityRegistry::new());
        let first = server();
        let second = server();
        first.hold_queries();
        second.hold_queries();

        let setup = |fake: &Arc<FakeMediaServer>, entry_id: &'static str, host: &'static str| {
            let registry = Arc::clone(&registry);
            let client = client(fake);
            tokio::spawn(async move { registry.setup_entry(entry_id, EntryConfig::new(host), client).await })
        };
        let winner = setup(&first, first_id, "media.local");
        let loser = setup(&second, second_id, "MEDIA.LOCAL");
        first.wait_for_zone_queries(1).await;
        second.wait_for_zone_queries(1).await;

        first.release_queries(1);
        let entry = winner.await.unwrap().unwrap();
        second.release_queries(1);
        let result = loser.await.unwrap();

        assert!(matches!(result, Err(SdkError::AlreadyConfigured(_))));
        assert_eq!(registry.len(), 1);
        assert!(Arc::ptr_eq(&registry.entry(first_id).unwrap(), &entry));
        assert_eq!(second.calls_to("close").len(), 1);
        assert!(first.calls_to("close").is_empty());

        first.release_queries(16);
        registry.unload_entry(first_id).await.unwrap();
    }
}

#[tokio::test]
async fn test_failed_setup_registers_nothing() {
    let fake = server();
    fake.set_failure(Some(ApiError::Connectivity("no route to host".into())));
    let registry = EntityRegistry::new();

    let result = registry
        .setup_entry("entry1", EntryConfig::new("media.local"), client(&fake))
        .await;

    assert!(matches!(result, Err(SdkError::State(_))));
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_invalid_config_is_refused() {
    let fake = server();
    let registry = EntityRegistry::new();
    let mut config = EntryConfig::new("media.local");
    config.password = Some("secret".to_string());

    let result = registry.setup_entry("entry1", config, client(&fake)).await;

    assert!(matches!(result, Err(SdkError::Config(_))));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_unload_closes_the_connection() {
    let fake = server();
    let registry = EntityRegistry::new();
    let entry = registry
        .setup_entry("entry1", EntryConfig::new("media.local"), client(&fake))
        .await
        .unwrap();

    assert!(registry.unload_entry("entry1").await.unwrap());

    assert!(!entry.coordinator.is_running());
    assert_eq!(fake.calls_to("close").len(), 1);
    assert!(registry.players("entry1").is_empty());
    assert!(!registry.unload_entry("entry1").await.unwrap());
}
