//! Koreanbots API response types
//!
//! Every response is wrapped in `{ "code", "data", "message", "version" }`.
//! The HTTP layer unwraps `data` and the records below are projected from it.

use chrono::{DateTime, Utc};
use dbskr_core::{Asset, AssetFormat, BotListError, BotListResult, UserId, DISCORD_CDN_BASE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Either a bare id or the referenced object
///
/// Koreanbots inlines bots inside users and users inside bots one level
/// deep; the nested side only carries ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Partial<T> {
    Id(UserId),
    Full(Box<T>),
}

impl<T> Partial<T> {
    pub fn full(&self) -> Option<&T> {
        match self {
            Partial::Id(_) => None,
            Partial::Full(inner) => Some(inner),
        }
    }
}

impl Partial<Bot> {
    pub fn id(&self) -> UserId {
        match self {
            Partial::Id(id) => *id,
            Partial::Full(bot) => bot.id,
        }
    }
}

impl Partial<User> {
    pub fn id(&self) -> UserId {
        match self {
            Partial::Id(id) => *id,
            Partial::Full(user) => user.id,
        }
    }
}

/// Bot listed on Koreanbots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bot {
    pub id: UserId,
    pub name: String,
    /// Discord discriminator
    pub tag: String,
    /// Discord avatar hash
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub owners: Vec<Partial<User>>,
    #[serde(default)]
    pub flags: u32,
    pub lib: String,
    pub prefix: String,
    #[serde(default)]
    pub votes: u64,
    #[serde(default)]
    pub servers: Option<u64>,
    #[serde(default)]
    pub shards: Option<u64>,
    /// Short introduction
    #[serde(default)]
    pub intro: String,
    /// Long description (markdown)
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub web: Option<String>,
    #[serde(default)]
    pub git: Option<String>,
    /// Invite URL
    #[serde(default)]
    pub url: Option<String>,
    /// Support server invite code
    #[serde(default)]
    pub discord: Option<String>,
    #[serde(default)]
    pub category: Vec<String>,
    #[serde(default)]
    pub vanity: Option<String>,
    #[serde(default)]
    pub bg: Option<String>,
    #[serde(default)]
    pub banner: Option<String>,
    /// Presence, e.g. `online` or `dnd`
    #[serde(default)]
    pub status: Option<String>,
    /// Listing state, e.g. `ok` or `reported`
    #[serde(default)]
    pub state: String,
}

impl Bot {
    /// Avatar on the Discord CDN, or the default avatar when none is set
    pub fn avatar_asset(&self, size: Option<u16>) -> BotListResult<Asset> {
        match &self.avatar {
            Some(hash) => Asset::discord_avatar(self.id, hash, size),
            None => {
                let index = self.tag.parse::<u16>().unwrap_or(0) % 5;
                Ok(Asset::single(
                    DISCORD_CDN_BASE,
                    format!("/embed/avatars/{}", index),
                    AssetFormat::Png,
                ))
            }
        }
    }

    pub fn owner_ids(&self) -> Vec<UserId> {
        self.owners.iter().map(|owner| owner.id()).collect()
    }
}

/// Koreanbots user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub tag: String,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub flags: u32,
    #[serde(default)]
    pub bots: Vec<Partial<Bot>>,
}

impl User {
    pub fn bot_ids(&self) -> Vec<UserId> {
        self.bots.iter().map(|bot| bot.id()).collect()
    }
}

/// Whether a user voted for a bot in the last 12 hours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub voted: bool,
    /// Milliseconds since the epoch, 0 when the user never voted
    #[serde(default)]
    pub last_vote: i64,
}

impl Vote {
    pub fn last_vote_at(&self) -> Option<DateTime<Utc>> {
        if self.last_vote <= 0 {
            return None;
        }
        DateTime::from_timestamp_millis(self.last_vote)
    }
}

/// Server and shard counts of a bot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub servers: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shards: Option<u64>,
}

macro_rules! impl_from_value {
    ($($ty:ty => $what:literal),* $(,)?) => {
        $(
            impl TryFrom<Value> for $ty {
                type Error = BotListError;

                fn try_from(value: Value) -> Result<Self, Self::Error> {
                    serde_json::from_value(value).map_err(|e| {
                        BotListError::parse(format!("Failed to parse {}: {}", $what, e))
                    })
                }
            }
        )*
    };
}

impl_from_value! {
    Bot => "bot",
    User => "user",
    Vote => "vote",
    Stats => "stats",
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbskr_core::Id;
    use serde_json::json;

    fn bot_json() -> Value {
        json!({
            "id": "653534001742741552",
            "name": "Ticket Bot",
            "tag": "4379",
            "avatar": "a7b1c2d3e4f5",
            "owners": ["285185716240252929"],
            "flags": 0,
            "lib": "discord.py",
            "prefix": "!",
            "votes": 1300,
            "servers": 2500,
            "shards": 2,
            "intro": "Ticket support bot",
            "desc": "# Ticket Bot",
            "web": "https://ticket.example",
            "git": null,
            "url": "https://discord.com/oauth2/authorize?client_id=653534001742741552",
            "discord": "abcd123",
            "category": ["관리", "도구"],
            "vanity": "ticket",
            "bg": null,
            "banner": null,
            "status": "online",
            "state": "ok"
        })
    }

    #[test]
    fn test_bot_from_value() {
        let bot = Bot::try_from(bot_json()).unwrap();
        assert_eq!(bot.id, Id::new(653534001742741552));
        assert_eq!(bot.name, "Ticket Bot");
        assert_eq!(bot.tag, "4379");
        assert_eq!(bot.avatar.as_deref(), Some("a7b1c2d3e4f5"));
        assert_eq!(bot.owner_ids(), vec![Id::new(285185716240252929)]);
        assert_eq!(bot.flags, 0);
        assert_eq!(bot.lib, "discord.py");
        assert_eq!(bot.prefix, "!");
        assert_eq!(bot.votes, 1300);
        assert_eq!(bot.servers, Some(2500));
        assert_eq!(bot.shards, Some(2));
        assert_eq!(bot.intro, "Ticket support bot");
        assert_eq!(bot.desc, "# Ticket Bot");
        assert_eq!(bot.web.as_deref(), Some("https://ticket.example"));
        assert_eq!(bot.git, None);
        assert_eq!(bot.discord.as_deref(), Some("abcd123"));
        assert_eq!(bot.category, vec!["관리".to_string(), "도구".to_string()]);
        assert_eq!(bot.vanity.as_deref(), Some("ticket"));
        assert_eq!(bot.status.as_deref(), Some("online"));
        assert_eq!(bot.state, "ok");
    }

    #[test]
    fn test_bot_with_full_owner() {
        let mut value = bot_json();
        value["owners"] = json!([{
            "id": "285185716240252929",
            "username": "gunyu1019",
            "tag": "0001",
            "github": "gunyu1019",
            "flags": 0,
            "bots": ["653534001742741552"]
        }]);

        let bot = Bot::try_from(value).unwrap();
        let owner = bot.owners[0].full().unwrap();
        assert_eq!(owner.username, "gunyu1019");
        assert_eq!(owner.bot_ids(), vec![Id::new(653534001742741552)]);
    }

    #[test]
    fn test_bot_avatar_asset() {
        let bot = Bot::try_from(bot_json()).unwrap();
        assert_eq!(
            bot.avatar_asset(None).unwrap().default_url(),
            "https://cdn.discordapp.com/avatars/653534001742741552/a7b1c2d3e4f5.png"
        );

        let mut value = bot_json();
        value["avatar"] = Value::Null;
        let bot = Bot::try_from(value).unwrap();
        assert_eq!(
            bot.avatar_asset(None).unwrap().default_url(),
            "https://cdn.discordapp.com/embed/avatars/4.png"
        );
    }

    #[test]
    fn test_missing_required_field() {
        let mut value = bot_json();
        value.as_object_mut().unwrap().remove("name");
        let err = Bot::try_from(value).unwrap_err();
        assert!(matches!(err, BotListError::Parse(_)));
    }

    #[test]
    fn test_vote_from_value() {
        let vote = Vote::try_from(json!({"voted": true, "lastVote": 1625000000000i64})).unwrap();
        assert!(vote.voted);
        assert_eq!(vote.last_vote, 1625000000000);
        assert_eq!(vote.last_vote_at().unwrap().timestamp(), 1625000000);

        let never = Vote::try_from(json!({"voted": false, "lastVote": 0})).unwrap();
        assert_eq!(never.last_vote_at(), None);
    }

    #[test]
    fn test_records_keep_every_field() {
        let mut bot = bot_json();
        bot["git"] = json!("https://github.com/gunyu1019/ticket");
        bot["bg"] = json!("https://ticket.example/bg.png");
        bot["banner"] = json!("https://ticket.example/banner.png");
        bot["owners"] = json!([{
            "id": "285185716240252929",
            "username": "gunyu1019",
            "tag": "0001",
            "github": "gunyu1019",
            "flags": 4,
            "bots": ["653534001742741552"]
        }]);

        let parsed = Bot::try_from(bot.clone()).unwrap();
        assert_eq!(
            parsed.url.as_deref(),
            Some("https://discord.com/oauth2/authorize?client_id=653534001742741552")
        );
        assert_eq!(parsed.bg.as_deref(), Some("https://ticket.example/bg.png"));
        assert_eq!(parsed.banner.as_deref(), Some("https://ticket.example/banner.png"));
        assert_eq!(serde_json::to_value(parsed).unwrap(), bot);

        let user = json!({
            "id": "285185716240252929",
            "username": "gunyu1019",
            "tag": "0001",
            "github": "gunyu1019",
            "flags": 4,
            "bots": ["653534001742741552"]
        });
        let parsed = User::try_from(user.clone()).unwrap();
        assert_eq!(parsed.tag, "0001");
        assert_eq!(parsed.github.as_deref(), Some("gunyu1019"));
        assert_eq!(parsed.flags, 4);
        assert_eq!(serde_json::to_value(parsed).unwrap(), user);

        let vote = json!({"voted": true, "lastVote": 1625000000000i64});
        assert_eq!(serde_json::to_value(Vote::try_from(vote.clone()).unwrap()).unwrap(), vote);

        let stats = json!({"servers": 42, "shards": 3});
        assert_eq!(serde_json::to_value(Stats::try_from(stats.clone()).unwrap()).unwrap(), stats);
    }

    #[test]
    fn test_stats_serialization() {
        let stats = Stats {
            servers: 42,
            shards: None,
        };
        assert_eq!(serde_json::to_value(stats).unwrap(), json!({"servers": 42}));

        let stats = Stats::try_from(json!({"servers": 42, "shards": 3})).unwrap();
        assert_eq!(stats.shards, Some(3));
    }
}
