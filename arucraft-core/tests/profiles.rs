use std::sync::Arc;

use arucraft_core::models::{ServerStatus, ServerProfile};
use arucraft_core::store::{CacheStore, LocalStorage, LocalStore};
use arucraft_core::{
    AccountPermission, GuardDecision, NotificationQueue, PanelClient, PanelConfig, PanelContext,
    Route, ServerInfo, Session,
};
use httpmock::prelude::*;
use serde_json::json;

fn info(id: &str, profile_time: i64) -> ServerInfo {
    ServerInfo {
        id: id.to_string(),
        profile_time,
        status: ServerStatus::Active,
        max_players: 20,
        player_count: 0,
        players: Vec::new(),
    }
}

fn profile_json(id: &str, edit_time: i64) -> serde_json::Value {
    json!({"server_id": id, "edit_time": edit_time, "zh_cn_name": format!("{}服", id)})
}

/// Local store on disk already holding `profiles`
fn seeded_store(dir: &std::path::Path, profiles: &[(&str, i64)]) -> LocalStore {
    let map: serde_json::Map<String, serde_json::Value> = profiles
        .iter()
        .map(|(id, t)| (id.to_string(), profile_json(id, *t)))
        .collect();
    std::fs::write(
        dir.join("local.json"),
        json!({"is_sidebar_collapsed": false, "server_profiles": map}).to_string(),
    )
    .unwrap();
    LocalStore::open(LocalStorage::new(dir))
}

fn client_for(server: &MockServer) -> (PanelClient, NotificationQueue) {
    let queue = NotificationQueue::new();
    let client = PanelClient::new(&server.base_url(), Session::with_token("t"), Arc::new(queue.clone()));
    (client, queue)
}

#[tokio::test]
async fn equal_timestamps_are_fresh() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET).path("/servers");
        then.status(200).json_body(json!({"code": 200, "msg": "", "data": []}));
    });

    let dir = tempfile::tempdir().unwrap();
    let mut store = seeded_store(dir.path(), &[("lobby", 5)]);
    let mut cache = CacheStore::new();
    let (client, _) = client_for(&server);

    let visible = store
        .check_server_profiles(&mut cache, &client, &[info("lobby", 5)])
        .await
        .unwrap();

    mock.assert_hits(0);
    assert_eq!(visible.len(), 1);
    assert!(cache.hidden_servers.is_empty());
}

#[tokio::test]
async fn newer_profile_time_refetches() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET).path("/servers").query_param("ids", "lobby");
        then.status(200)
            .json_body(json!({"code": 200, "msg": "", "data": [profile_json("lobby", 6)]}));
    });

    let dir = tempfile::tempdir().unwrap();
    let mut store = seeded_store(dir.path(), &[("lobby", 5)]);
    let mut cache = CacheStore::new();
    let (client, _) = client_for(&server);

    let visible = store
        .check_server_profiles(&mut cache, &client, &[info("lobby", 6)])
        .await
        .unwrap();

    mock.assert();
    assert_eq!(visible.len(), 1);
    assert_eq!(store.profile("lobby").map(|p| p.edit_time), Some(6));
}

#[tokio::test]
async fn fresh_stale_and_missing_batch_into_one_request() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/servers")
            .query_param("ids", "creative")
            .query_param("ids", "modded");
        then.status(200).json_body(json!({
            "code": 200,
            "msg": "",
            "data": [profile_json("creative", 9), profile_json("modded", 1)]
        }));
    });

    let dir = tempfile::tempdir().unwrap();
    let mut store = seeded_store(dir.path(), &[("survival", 3), ("creative", 2)]);
    let mut cache = CacheStore::new();
    let (client, queue) = client_for(&server);

    let servers = [info("survival", 3), info("creative", 9), info("modded", 1)];
    let visible = store
        .check_server_profiles(&mut cache, &client, &servers)
        .await
        .unwrap();

    mock.assert();
    let ids: Vec<&str> = visible.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["survival", "creative", "modded"]);
    assert!(cache.hidden_servers.is_empty());
    assert!(queue.is_empty());
}

#[tokio::test]
async fn server_missing_from_response_is_hidden() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/servers");
        then.status(200).json_body(json!({
            "code": 200,
            "msg": "",
            "data": [profile_json("creative", 9)]
        }));
    });

    let dir = tempfile::tempdir().unwrap();
    let mut store = seeded_store(dir.path(), &[("survival", 3), ("creative", 2)]);
    let mut cache = CacheStore::new();
    let (client, _) = client_for(&server);

    let servers = [info("survival", 3), info("creative", 9), info("modded", 1)];
    let visible = store
        .check_server_profiles(&mut cache, &client, &servers)
        .await
        .unwrap();

    let ids: Vec<&str> = visible.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["survival", "creative"]);
    assert!(cache.hidden_servers.contains("modded"));
    assert_eq!(cache.hidden_servers.len(), 1);
}

#[tokio::test]
async fn fetched_profiles_survive_reopen() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/servers");
        then.status(200)
            .json_body(json!({"code": 200, "msg": "", "data": [profile_json("lobby", 4)]}));
    });

    let dir = tempfile::tempdir().unwrap();
    let mut store = LocalStore::open(LocalStorage::new(dir.path()));
    let mut cache = CacheStore::new();
    let (client, _) = client_for(&server);
    store
        .check_server_profiles(&mut cache, &client, &[info("lobby", 4)])
        .await
        .unwrap();

    let reopened = LocalStore::open(LocalStorage::new(dir.path()));
    let profile: &ServerProfile = reopened.profile("lobby").unwrap();
    assert_eq!(profile.zh_cn_name.as_deref(), Some("lobby服"));
}

#[tokio::test]
async fn failed_fetch_still_evicts_stale_profile() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/servers");
        then.status(500);
    });

    let dir = tempfile::tempdir().unwrap();
    let mut store = seeded_store(dir.path(), &[("lobby", 1)]);
    let mut cache = CacheStore::new();
    let (client, queue) = client_for(&server);

    let result = store
        .check_server_profiles(&mut cache, &client, &[info("lobby", 2)])
        .await;

    assert!(result.is_err());
    assert!(store.profile("lobby").is_none());
    assert_eq!(queue.drain()[0].description, "Status: 500");
}

#[tokio::test]
async fn context_refresh_lists_only_servers_with_profiles() {
    let server = MockServer::start_async().await;
    let list = server.mock(|when, then| {
        when.method(GET).path("/servers/status");
        then.status(200).json_body(json!({
            "code": 200,
            "msg": "",
            "data": [
                {"id": "lobby", "profile_time": 1, "status": "active", "max_players": 50, "player_count": 1,
                 "players": [{"name": "Steve", "uuid": "", "avatar": {"source": "mc_skin"}}]},
                {"id": "ghost", "profile_time": 1, "status": "stopped", "max_players": 10, "player_count": 0}
            ]
        }));
    });
    let profiles = server.mock(|when, then| {
        when.method(GET).path("/servers");
        then.status(200)
            .json_body(json!({"code": 200, "msg": "", "data": [profile_json("lobby", 1)]}));
    });

    let mut config = PanelConfig::default();
    config.api.base_url = server.base_url();
    let mut ctx = PanelContext::in_memory(config);

    let visible = ctx.refresh_servers(false).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, "lobby");
    assert!(ctx.cache.is_hidden("ghost"));
    assert!(ctx.cache.is_server_list_loaded);

    // Within the TTL the cached list is reused
    let again = ctx.refresh_servers(false).await.unwrap();
    assert_eq!(again.len(), 1);
    list.assert_hits(1);
    profiles.assert_hits(1);
}

#[tokio::test]
async fn failed_profile_check_does_not_cache_the_list() {
    let server = MockServer::start_async().await;
    let list = server.mock(|when, then| {
        when.method(GET).path("/servers/status");
        then.status(200).json_body(json!({
            "code": 200,
            "msg": "",
            "data": [{"id": "lobby", "profile_time": 1, "status": "active", "max_players": 50, "player_count": 0}]
        }));
    });
    let profiles = server.mock(|when, then| {
        when.method(GET).path("/servers");
        then.status(500);
    });

    let mut config = PanelConfig::default();
    config.api.base_url = server.base_url();
    let mut ctx = PanelContext::in_memory(config);

    assert!(ctx.refresh_servers(false).await.is_err());
    assert!(!ctx.cache.is_server_list_loaded);

    // No profile yet, so the next refresh asks again instead of listing lobby
    let again = ctx.refresh_servers(false).await;
    assert!(again.is_err());
    assert!(ctx.local.profile("lobby").is_none());
    list.assert_hits(2);
    profiles.assert_hits(2);
}

#[tokio::test]
async fn player_refresh_loads_user_and_profile() {
    let server = MockServer::start_async().await;
    let me = server.mock(|when, then| {
        when.method(GET)
            .path("/players/me")
            .header("Authorization", "Bearer saved");
        then.status(200).json_body(json!({
            "code": 200,
            "msg": "",
            "data": {"name": "Alex", "uuid": "", "avatar": {"source": "qq", "qq_id": "10001"}, "permission": 4}
        }));
    });
    let profile = server.mock(|when, then| {
        when.method(GET).path("/players/me/profile");
        then.status(200).json_body(json!({
            "code": 200,
            "msg": "",
            "data": {"online_qq_suffix": "[在线]", "offline_qq_suffix": "", "social_accounts": {"qq": "10001"}}
        }));
    });

    let mut config = PanelConfig::default();
    config.api.base_url = server.base_url();
    config.session.token = Some("saved".to_string());
    let mut ctx = PanelContext::in_memory(config);

    ctx.refresh_player().await.unwrap();

    me.assert();
    profile.assert();
    assert_eq!(ctx.session.permission(), AccountPermission::Admin);
    let admin = Route::new("admin", "/admin").requires(AccountPermission::Admin);
    assert_eq!(ctx.guard(&admin, &Route::start()), GuardDecision::Allow);
    assert_eq!(
        ctx.cache.player_profile.as_ref().map(|p| p.online_qq_suffix.as_str()),
        Some("[在线]")
    );
}

#[tokio::test]
async fn expired_token_skips_player_profile() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/players/me");
        then.status(200)
            .json_body(json!({"code": 401, "msg": "expired", "data": null}));
    });
    let profile = server.mock(|when, then| {
        when.method(GET).path("/players/me/profile");
        then.status(200).json_body(json!({"code": 200, "msg": "", "data": null}));
    });

    let mut config = PanelConfig::default();
    config.api.base_url = server.base_url();
    config.session.token = Some("saved".to_string());
    let mut ctx = PanelContext::in_memory(config);

    ctx.refresh_player().await.unwrap();

    profile.assert_hits(0);
    assert!(!ctx.session.is_authenticated());
    assert!(ctx.cache.player_profile.is_none());
}

#[tokio::test]
async fn anonymous_player_refresh_sends_nothing() {
    let server = MockServer::start_async().await;
    let me = server.mock(|when, then| {
        when.method(GET).path("/players/me");
        then.status(200).json_body(json!({"code": 200, "msg": "", "data": null}));
    });

    let mut config = PanelConfig::default();
    config.api.base_url = server.base_url();
    let mut ctx = PanelContext::in_memory(config);

    ctx.refresh_player().await.unwrap();
    me.assert_hits(0);
}
