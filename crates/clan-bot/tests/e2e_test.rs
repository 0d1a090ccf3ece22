//! End-to-end tests: incoming message to outgoing Signal request.

mod common;

use common::{direct_message, sent, Servers, USER};
use profile_store::ProfileStore;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn clan_body() -> serde_json::Value {
    serde_json::json!({
        "tag": "#2PP",
        "name": "Reddit Example",
        "clanLevel": 12,
        "members": 48,
        "warWins": 310,
        "location": { "id": 32000006, "name": "International" }
    })
}

#[tokio::test]
async fn test_link_then_query_linked_clan() {
    let servers = Servers::start().await;
    let config = servers.config(&[]);
    let store = Arc::new(ProfileStore::memory());
    let bot = servers.bot(&config, store.clone());

    Mock::given(method("GET"))
        .and(path("/clans/%232PP"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(clan_body()))
        .expect(2)
        .mount(&servers.coc)
        .await;

    Mock::given(method("POST"))
        .and(path("/v2/send"))
        .and(body_string_contains("Linked your profile to clan tag #2PP. (Reddit Example)."))
        .respond_with(sent())
        .expect(1)
        .mount(&servers.signal)
        .await;

    Mock::given(method("POST"))
        .and(path("/v2/send"))
        .and(body_string_contains("**Clan Name**: Reddit Example"))
        .and(body_string_contains(USER))
        .respond_with(sent())
        .expect(1)
        .mount(&servers.signal)
        .await;

    bot.handle(&direct_message("!linkclan #2pp")).await;
    bot.handle(&direct_message("!clan")).await;

    let profile = store.profile(USER, USER).await.unwrap();
    assert_eq!(profile.clan_tags, vec!["#2PP"]);
}

#[tokio::test]
async fn test_clan_not_found_reports_error() {
    let servers = Servers::start().await;
    let bot = servers.bot(&servers.config(&[]), Arc::new(ProfileStore::memory()));

    // `O` reads as zero, so the tag sent upstream is #G0NE
    Mock::given(method("GET"))
        .and(path("/clans/%23G0NE"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "reason": "notFound"
        })))
        .expect(1)
        .mount(&servers.coc)
        .await;

    Mock::given(method("POST"))
        .and(path("/v2/send"))
        .and(body_string_contains(
            "Error fetching clan information for clan #G0NE: Not found: #G0NE",
        ))
        .respond_with(sent())
        .expect(1)
        .mount(&servers.signal)
        .await;

    bot.handle(&direct_message("!clan #gone")).await;
}

#[tokio::test]
async fn test_rate_limit_reply() {
    let servers = Servers::start().await;
    let config = servers.config(&[("rate_limit.max_requests", "1")]);
    let bot = servers.bot(&config, Arc::new(ProfileStore::memory()));

    Mock::given(method("POST"))
        .and(path("/v2/send"))
        .and(body_string_contains("*User Info*"))
        .respond_with(sent())
        .expect(1)
        .mount(&servers.signal)
        .await;

    Mock::given(method("POST"))
        .and(path("/v2/send"))
        .and(body_string_contains("You are sending commands too quickly"))
        .respond_with(sent())
        .expect(1)
        .mount(&servers.signal)
        .await;

    bot.handle(&direct_message("!info")).await;
    bot.handle(&direct_message("!info")).await;
}

#[tokio::test]
async fn test_plain_text_and_unknown_commands_send_nothing() {
    let servers = Servers::start().await;
    let bot = servers.bot(&servers.config(&[]), Arc::new(ProfileStore::memory()));

    Mock::given(method("POST"))
        .and(path("/v2/send"))
        .respond_with(sent())
        .expect(0)
        .mount(&servers.signal)
        .await;

    bot.handle(&direct_message("good morning")).await;
    bot.handle(&direct_message("!dance")).await;
}

#[tokio::test]
async fn test_help_is_deleted_after_ttl() {
    let servers = Servers::start().await;
    let config = servers.config(&[("bot.help_ttl", "50ms")]);
    let bot = servers.bot(&config, Arc::new(ProfileStore::memory()));

    Mock::given(method("POST"))
        .and(path("/v2/send"))
        .and(body_string_contains("Available Commands"))
        .respond_with(sent())
        .expect(1)
        .mount(&servers.signal)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/v1/remote-delete/%2B10000000000"))
        .and(body_string_contains("1700000000123"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&servers.signal)
        .await;

    bot.handle(&direct_message("!help")).await;
    tokio::time::sleep(Duration::from_millis(300)).await;
}

#[tokio::test]
async fn test_restricted_bot_ignores_unallowed_chat() {
    let servers = Servers::start().await;
    let config = servers.config(&[("bot.restrict_to_allowed_chats", "true")]);
    let store = Arc::new(ProfileStore::memory());
    let bot = servers.bot(&config, store.clone());

    Mock::given(method("POST"))
        .and(path("/v2/send"))
        .and(body_string_contains("Bot Information"))
        .respond_with(sent())
        .expect(1)
        .mount(&servers.signal)
        .await;

    bot.handle(&direct_message("!botinfo")).await;
    store.allow_chat(USER).await.unwrap();
    bot.handle(&direct_message("!botinfo")).await;
}
