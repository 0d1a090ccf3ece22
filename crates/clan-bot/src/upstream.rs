//! Game data source consumed by command handlers.

use async_trait::async_trait;
use coc_client::{
    CapitalRaidSeason, Clan, ClanMember, ClanWar, CocClient, CocError, Player, WarLogEntry,
};

/// Read access to clan and player data.
#[async_trait]
pub trait GameData: Send + Sync {
    async fn clan(&self, tag: &str) -> Result<Clan, CocError>;
    async fn player(&self, tag: &str) -> Result<Player, CocError>;
    async fn clan_members(&self, tag: &str) -> Result<Vec<ClanMember>, CocError>;
    async fn current_war(&self, tag: &str) -> Result<ClanWar, CocError>;
    async fn war_log(&self, tag: &str) -> Result<Vec<WarLogEntry>, CocError>;
    async fn capital_raid_seasons(&self, tag: &str) -> Result<Vec<CapitalRaidSeason>, CocError>;
}

#[async_trait]
impl GameData for CocClient {
    async fn clan(&self, tag: &str) -> Result<Clan, CocError> {
        CocClient::clan(self, tag).await
    }

    async fn player(&self, tag: &str) -> Result<Player, CocError> {
        CocClient::player(self, tag).await
    }

    async fn clan_members(&self, tag: &str) -> Result<Vec<ClanMember>, CocError> {
        CocClient::clan_members(self, tag).await
    }

    async fn current_war(&self, tag: &str) -> Result<ClanWar, CocError> {
        CocClient::current_war(self, tag).await
    }

    async fn war_log(&self, tag: &str) -> Result<Vec<WarLogEntry>, CocError> {
        CocClient::war_log(self, tag).await
    }

    async fn capital_raid_seasons(&self, tag: &str) -> Result<Vec<CapitalRaidSeason>, CocError> {
        CocClient::capital_raid_seasons(self, tag).await
    }
}
