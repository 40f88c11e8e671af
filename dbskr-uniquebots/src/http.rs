//! UniqueBots GraphQL client

use crate::graphql::{GraphqlRequest, GraphqlResponse};
use crate::types::{Bot, Stats};
use dbskr_core::{ApiRequest, BotListError, BotListResult, Platform, Transport, UserId};
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

const BOT_QUERY: &str = r#"query Bot($botId: String!) {
    bot(id: $botId) {
        id
        name
        avatarURL
        trusted
        discordVerified
        guilds
        status
        brief
        description
        invite
        website
        support
        prefix
        library { name }
        categories { id name }
    }
}"#;

const PATCH_GUILDS_QUERY: &str = r#"query PatchGuilds($botId: String!, $guildCount: Int!) {
    bot(id: $botId) {
        guilds(patch: $guildCount)
    }
}"#;

/// UniqueBots GraphQL client
#[derive(Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    endpoint: String,
    token: Option<String>,
}

impl HttpClient {
    /// Create a client; `endpoint` defaults to the public GraphQL endpoint
    pub fn new(
        transport: Arc<dyn Transport>,
        endpoint: Option<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            transport,
            endpoint: endpoint.unwrap_or_else(|| Platform::UniqueBots.api_base().to_string()),
            token,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn require_auth(&self) -> BotListResult<()> {
        if self.token.is_some() {
            Ok(())
        } else {
            Err(BotListError::auth("UniqueBots token required"))
        }
    }

    /// Run a GraphQL operation and return its `data` object
    #[instrument(skip(self, request), fields(operation = ?request.operation_name))]
    pub async fn execute(&self, request: GraphqlRequest) -> BotListResult<Value> {
        let mut api_request = ApiRequest::post(self.endpoint.clone(), request.to_body()?);
        if let Some(token) = &self.token {
            api_request = api_request.with_authorization(format!("Bot {}", token));
        }

        let response = self.transport.send(api_request).await?;
        if !response.is_success() {
            // Prefer the GraphQL error message over the raw body
            let message = serde_json::from_slice::<GraphqlResponse>(&response.body)
                .ok()
                .and_then(|body| body.errors.into_iter().next())
                .map(|error| error.message)
                .unwrap_or_else(|| response.error_message());
            return Err(BotListError::from_status(response.status, message));
        }

        GraphqlResponse::try_from(response.into_json()?)?.into_data()
    }

    /// Get a bot by id
    pub async fn bot(&self, bot_id: UserId) -> BotListResult<Bot> {
        debug!("Fetching UniqueBots bot: {}", bot_id);

        let request = GraphqlRequest::new(BOT_QUERY, &json!({ "botId": bot_id.to_string() }))
            .with_operation_name("Bot");
        let data = self.execute(request).await?;
        match data.get("bot") {
            Some(Value::Null) | None => Err(BotListError::not_found(format!(
                "Bot {} is not listed on UniqueBots",
                bot_id
            ))),
            Some(bot) => Bot::try_from(bot.clone()),
        }
    }

    /// Update the guild count of a bot
    pub async fn stats(&self, bot_id: UserId, guild_count: u64) -> BotListResult<Stats> {
        self.require_auth()?;

        debug!("Patching UniqueBots guild count of {} to {}", bot_id, guild_count);

        let request = GraphqlRequest::new(
            PATCH_GUILDS_QUERY,
            &json!({ "botId": bot_id.to_string(), "guildCount": guild_count }),
        )
        .with_operation_name("PatchGuilds");
        let data = self.execute(request).await?;
        match data.get("bot") {
            Some(Value::Null) | None => Err(BotListError::not_found(format!(
                "Bot {} is not listed on UniqueBots",
                bot_id
            ))),
            Some(bot) => Stats::try_from(bot.clone()),
        }
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("endpoint", &self.endpoint)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbskr_core::mock::MockTransport;
    use dbskr_core::{ApiResponse, HttpMethod, Id};

    fn client(transport: &Arc<MockTransport>, token: Option<&str>) -> HttpClient {
        HttpClient::new(transport.clone(), None, token.map(str::to_string))
    }

    fn variables(request: &ApiRequest) -> Value {
        let body = request.body.as_ref().unwrap();
        serde_json::from_str(body["variables"].as_str().unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_patch_guilds_request_shape() {
        let transport = Arc::new(MockTransport::always(ApiResponse::json(
            200,
            &json!({"data": {"bot": {"guilds": 42}}}),
        )));
        let http = client(&transport, Some("ub-token"));

        let stats = http.stats(Id::new(653534001742741552), 42).await.unwrap();
        assert_eq!(stats, Stats { guilds: 42 });

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "https://uniquebots.kr/graphql");
        assert_eq!(request.authorization.as_deref(), Some("Bot ub-token"));
        assert!(request.body.as_ref().unwrap()["query"]
            .as_str()
            .unwrap()
            .contains("guilds(patch: $guildCount)"));
        assert_eq!(
            variables(&request),
            json!({"botId": "653534001742741552", "guildCount": 42})
        );
    }

    #[tokio::test]
    async fn test_stats_requires_token() {
        let transport = Arc::new(MockTransport::new());
        let http = client(&transport, None);

        assert!(http.stats(Id::new(1), 42).await.unwrap_err().is_unauthorized());
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_bot_query() {
        let transport = Arc::new(MockTransport::always(ApiResponse::json(
            200,
            &json!({"data": {"bot": {
                "id": "653534001742741552",
                "name": "Ticket Bot",
                "avatarURL": null,
                "trusted": false,
                "discordVerified": true,
                "guilds": 1200,
                "library": {"name": "discord.js"},
                "categories": []
            }}}),
        )));
        let http = client(&transport, None);

        let bot = http.bot(Id::new(653534001742741552)).await.unwrap();
        assert_eq!(bot.name, "Ticket Bot");
        assert!(bot.discord_verified);
        assert_eq!(bot.guilds, 1200);

        let request = transport.last_request().unwrap();
        assert!(request.authorization.is_none());
        assert_eq!(request.body.as_ref().unwrap()["operationName"], "Bot");
        assert_eq!(variables(&request), json!({"botId": "653534001742741552"}));
    }

    #[tokio::test]
    async fn test_unlisted_bot_is_not_found() {
        let transport = Arc::new(MockTransport::always(ApiResponse::json(
            200,
            &json!({"data": {"bot": null}}),
        )));
        let http = client(&transport, Some("ub-token"));

        assert!(matches!(
            http.bot(Id::new(1)).await.unwrap_err(),
            BotListError::NotFound(_)
        ));
        assert!(matches!(
            http.stats(Id::new(1), 3).await.unwrap_err(),
            BotListError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_graphql_errors() {
        let transport = Arc::new(MockTransport::new());
        transport
            .push_response(ApiResponse::json(
                200,
                &json!({"data": null, "errors": [
                    {"message": "Unauthorized", "extensions": {"code": "UNAUTHENTICATED"}}
                ]}),
            ))
            .push_response(ApiResponse::json(
                400,
                &json!({"errors": [{"message": "Cannot query field \"foo\""}]}),
            ))
            .push_response(ApiResponse::json(
                429,
                &json!({"errors": [{"message": "Too many requests"}]}),
            ));
        let http = client(&transport, Some("bad"));

        assert!(http.stats(Id::new(1), 3).await.unwrap_err().is_unauthorized());
        assert_eq!(
            http.stats(Id::new(1), 3).await.unwrap_err(),
            BotListError::api(400, "Cannot query field \"foo\"")
        );
        assert!(http.stats(Id::new(1), 3).await.unwrap_err().is_rate_limited());
    }

    #[test]
    fn test_debug_hides_token() {
        let http = HttpClient::new(
            Arc::new(MockTransport::new()),
            Some("http://localhost:4000/graphql".to_string()),
            Some("secret".to_string()),
        );
        assert_eq!(http.endpoint(), "http://localhost:4000/graphql");
        assert!(!format!("{:?}", http).contains("secret"));
    }
}
