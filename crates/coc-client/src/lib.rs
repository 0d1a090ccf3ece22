//! Clash of Clans REST API client.

mod client;
mod error;
mod types;

pub use client::CocClient;
pub use error::CocError;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_test_client(mock_server: &MockServer) -> CocClient {
        CocClient::new("test-token", mock_server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_clan_success() {
        let mock_server = MockServer::start().await;

        let body = serde_json::json!({
            "tag": "#2PP",
            "name": "Reddit Example",
            "clanLevel": 12,
            "members": 48,
            "warWins": 310,
            "warFrequency": "always",
            "location": { "id": 32000006, "name": "International" },
            "labels": [{ "id": 56000000, "name": "Clan Wars" }],
            "clanCapital": {
                "capitalHallLevel": 8,
                "districts": [{ "id": 70000000, "name": "Capital Peak", "districtHallLevel": 8 }]
            }
        });

        Mock::given(method("GET"))
            .and(path("/clans/%232PP"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server).await;
        let clan = client.clan("#2PP").await.unwrap();

        assert_eq!(clan.name.as_deref(), Some("Reddit Example"));
        assert_eq!(clan.clan_level, Some(12));
        assert_eq!(clan.members, Some(48));
        assert!(clan.war_win_streak.is_none());
        assert_eq!(clan.labels.len(), 1);
        let capital = clan.clan_capital.unwrap();
        assert_eq!(capital.capital_hall_level, Some(8));
        assert_eq!(capital.districts[0].name.as_deref(), Some("Capital Peak"));
    }

    #[tokio::test]
    async fn test_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/players/%23NOPE"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "reason": "notFound"
            })))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server).await;
        let result = client.player("#NOPE").await;

        assert!(matches!(result, Err(CocError::NotFound(tag)) if tag == "#NOPE"));
    }

    #[tokio::test]
    async fn test_access_denied_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/clans/%232PP"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "reason": "accessDenied.invalidIp",
                "message": "Invalid authorization: API key does not allow access from IP 1.2.3.4"
            })))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server).await;
        let err = client.clan("#2PP").await.unwrap_err();

        assert!(matches!(err, CocError::AccessDenied(_)));
        assert!(err.to_string().contains("1.2.3.4"));
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/clans/%232PP/members"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/clans/%232PP/members"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    { "tag": "#A", "name": "Alpha", "role": "leader", "townHallLevel": 15 },
                    { "tag": "#B", "name": "Bravo", "role": "member" }
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server).await;
        let members = client.clan_members("#2PP").await.unwrap();

        assert_eq!(members.len(), 2);
        assert_eq!(members[0].town_hall_level, Some(15));
        assert!(members[1].town_hall_level.is_none());
    }

    #[tokio::test]
    async fn test_rate_limit_gives_up() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/clans/%232PP/warlog"))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server).await.with_max_retries(0);
        let result = client.war_log("#2PP").await;

        assert!(matches!(result, Err(CocError::RateLimit)));
    }

    #[tokio::test]
    async fn test_current_war_parsing() {
        let mock_server = MockServer::start().await;

        let body = serde_json::json!({
            "state": "inWar",
            "teamSize": 2,
            "attacksPerMember": 2,
            "startTime": "20240101T120000.000Z",
            "clan": {
                "tag": "#2PP",
                "name": "Home",
                "stars": 3,
                "destructionPercentage": 52.5,
                "members": [{
                    "tag": "#A",
                    "name": "Alpha",
                    "townhallLevel": 14,
                    "mapPosition": 1,
                    "attacks": [{
                        "attackerTag": "#A",
                        "defenderTag": "#X",
                        "stars": 3,
                        "destructionPercentage": 100,
                        "order": 1,
                        "duration": 120
                    }]
                }]
            },
            "opponent": { "tag": "#OPP", "name": "Away", "members": [] }
        });

        Mock::given(method("GET"))
            .and(path("/clans/%232PP/currentwar"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server).await;
        let war = client.current_war("#2PP").await.unwrap();

        assert!(war.is_active());
        let clan = war.clan.as_ref().unwrap();
        assert_eq!(clan.destruction_percentage, Some(52.5));
        let alpha = clan.member("#A").unwrap();
        assert_eq!(alpha.town_hall_level, Some(14));
        assert_eq!(alpha.attacks[0].destruction_percentage, Some(100));
    }

    #[test]
    fn test_not_in_war_is_inactive() {
        let war: ClanWar = serde_json::from_str(r#"{"state": "notInWar"}"#).unwrap();
        assert!(!war.is_active());

        let war: ClanWar = serde_json::from_str(r#"{"state": "preparation"}"#).unwrap();
        assert!(!war.is_active());
    }

    #[test]
    fn test_parse_api_time() {
        let parsed = parse_api_time("20240315T083000.000Z").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-03-15T08:30:00+00:00");
        assert!(parse_api_time("yesterday").is_none());
    }
}
