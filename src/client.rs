//! LiveAgent API client
//!
//! Resolves the organization's API base URL, attaches credentials and maps
//! every supported collection onto a paginated fetch.

use crate::catalog::{
    ticket_messages_endpoint, Endpoint, FilterExpression, ObjectKind, CONVERSATION_CHANNEL_TYPES,
    FILTER_PARAM,
};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RateLimiterConfig};
use crate::pagination::{Fetcher, FetcherConfig};
use crate::partition::DateWindow;
use crate::types::{JsonValue, StringMap};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Header carrying the v3 API key
pub const API_KEY_HEADER: &str = "apikey";
/// Query parameter carrying the v1 API key
pub const V1_API_KEY_PARAM: &str = "apikey";

static HOSTED_URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)ladesk\.com|://|/api").expect("hosted URL pattern is valid"));

static ORGANIZATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?$").expect("organization pattern is valid")
});

/// Check that `organization` is a bare account name such as `acme`.
///
/// Hosts (`acme.ladesk.com`), URLs and API paths are rejected.
pub fn validate_organization(organization: &str) -> Result<()> {
    let organization = organization.trim();

    if HOSTED_URL_REGEX.is_match(organization) || !ORGANIZATION_REGEX.is_match(organization) {
        return Err(Error::InvalidOrganization {
            organization: organization.to_string(),
        });
    }

    Ok(())
}

/// API base URL of an organization
pub fn organization_url(organization: &str) -> Result<String> {
    validate_organization(organization)?;
    Ok(format!("https://{}.ladesk.com/api/", organization.trim()))
}

/// Optional client settings
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Key for the v1 endpoints
    pub token_v1: Option<String>,
    /// Pagination and retry settings
    pub fetcher: FetcherConfig,
    /// Request rate limit (None disables it)
    pub rate_limit: Option<RateLimiterConfig>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            token_v1: None,
            fetcher: FetcherConfig::default(),
            rate_limit: Some(RateLimiterConfig::default()),
        }
    }
}

/// Client for both LiveAgent API generations
#[derive(Debug)]
pub struct LiveAgentClient {
    fetcher: Fetcher,
    token_v1: Option<String>,
}

impl LiveAgentClient {
    /// Create a client for `https://{organization}.ladesk.com/api/`
    pub fn new(organization: &str, token: &str, options: ClientOptions) -> Result<Self> {
        let base_url = organization_url(organization)?;
        debug!("Organization URL: {base_url}");
        Self::with_base_url(&base_url, token, options)
    }

    /// Create a client against an explicit base URL
    pub fn with_base_url(base_url: &str, token: &str, options: ClientOptions) -> Result<Self> {
        let config = HttpClientConfig::builder()
            .base_url(base_url)
            .header(API_KEY_HEADER, token)
            .header("accept", "application/json")
            .header("content-type", "application/json")
            .rate_limit(options.rate_limit)
            .build();
        let http = HttpClient::with_config(config)?;

        Ok(Self {
            fetcher: Fetcher::with_config(http, options.fetcher),
            token_v1: options.token_v1,
        })
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    // ========================================================================
    // Generic access
    // ========================================================================

    /// Fetch a v3 collection, filtered by `window` when it has a date field.
    ///
    /// Ticket messages need a ticket, use [`Self::get_ticket_messages`].
    pub async fn fetch_collection(
        &self,
        kind: ObjectKind,
        window: &DateWindow,
    ) -> Result<Vec<JsonValue>> {
        let mut query = StringMap::new();
        if let Some(filter) = kind.date_filter() {
            let expr = FilterExpression::new(
                filter.field,
                window.from_string(),
                window.until_string(),
                filter.style,
            );
            query.insert(FILTER_PARAM.to_string(), expr.render());
        }

        self.fetcher
            .fetch_with_retry(&kind.endpoint(), &query)
            .await
    }

    /// Fetch a v1 report for `[date_from, date_to]`
    pub async fn fetch_report(
        &self,
        kind: ObjectKind,
        date_from: &str,
        date_to: &str,
    ) -> Result<Vec<JsonValue>> {
        let mut query = self.v1_query(kind)?;
        query.insert("date_from".to_string(), date_from.to_string());
        query.insert("date_to".to_string(), date_to.to_string());
        if let Some(columns) = kind.report_columns() {
            query.insert("columns".to_string(), columns.to_string());
        }

        self.fetcher
            .fetch_with_retry(&kind.endpoint(), &query)
            .await
    }

    fn v1_query(&self, kind: ObjectKind) -> Result<StringMap> {
        let token = self
            .token_v1
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| Error::MissingV1Token {
                object: kind.name().to_string(),
            })?;

        let mut query = StringMap::new();
        query.insert(V1_API_KEY_PARAM.to_string(), token.to_string());
        Ok(query)
    }

    async fn fetch_plain(&self, endpoint: Endpoint, query: StringMap) -> Result<Vec<JsonValue>> {
        self.fetcher.fetch_with_retry(&endpoint, &query).await
    }

    // ========================================================================
    // v3
    // ========================================================================

    pub async fn get_agents(&self) -> Result<Vec<JsonValue>> {
        self.fetch_plain(ObjectKind::Agents.endpoint(), StringMap::new())
            .await
    }

    pub async fn get_calls(&self, window: &DateWindow) -> Result<Vec<JsonValue>> {
        self.fetch_collection(ObjectKind::Calls, window).await
    }

    pub async fn get_chats(&self, window: &DateWindow) -> Result<Vec<JsonValue>> {
        self.fetch_collection(ObjectKind::Chats, window).await
    }

    pub async fn get_companies(&self, window: &DateWindow) -> Result<Vec<JsonValue>> {
        self.fetch_collection(ObjectKind::Companies, window).await
    }

    pub async fn get_contacts(&self, window: &DateWindow) -> Result<Vec<JsonValue>> {
        self.fetch_collection(ObjectKind::Contacts, window).await
    }

    pub async fn get_departments(&self) -> Result<Vec<JsonValue>> {
        self.fetch_plain(ObjectKind::Departments.endpoint(), StringMap::new())
            .await
    }

    pub async fn get_tags(&self) -> Result<Vec<JsonValue>> {
        self.fetch_plain(ObjectKind::Tags.endpoint(), StringMap::new())
            .await
    }

    /// Tickets changed inside the window (`D>=`/`D<=` comparison)
    pub async fn get_tickets(&self, window: &DateWindow) -> Result<Vec<JsonValue>> {
        self.fetch_collection(ObjectKind::Tickets, window).await
    }

    /// Messages of one ticket created inside the window
    pub async fn get_ticket_messages(
        &self,
        ticket_id: &str,
        window: &DateWindow,
    ) -> Result<Vec<JsonValue>> {
        let filter = ObjectKind::TicketsMessages
            .date_filter()
            .map(|f| {
                FilterExpression::new(
                    f.field,
                    window.from_string(),
                    window.until_string(),
                    f.style,
                )
            });

        let mut query = StringMap::new();
        if let Some(expr) = filter {
            query.insert(FILTER_PARAM.to_string(), expr.render());
        }
        self.fetch_plain(ticket_messages_endpoint(ticket_id), query)
            .await
    }

    pub async fn get_tickets_history(&self, window: &DateWindow) -> Result<Vec<JsonValue>> {
        self.fetch_collection(ObjectKind::TicketsHistory, window)
            .await
    }

    // ========================================================================
    // v1
    // ========================================================================

    pub async fn get_agent_report(&self, date_from: &str, date_to: &str) -> Result<Vec<JsonValue>> {
        self.fetch_report(ObjectKind::AgentReport, date_from, date_to)
            .await
    }

    pub async fn get_ranking_agents_report(
        &self,
        date_from: &str,
        date_to: &str,
    ) -> Result<Vec<JsonValue>> {
        self.fetch_report(ObjectKind::RankingAgentsReport, date_from, date_to)
            .await
    }

    /// Ticket-channel availability of agents
    pub async fn get_agent_availability(
        &self,
        date_from: &str,
        date_to: &str,
    ) -> Result<Vec<JsonValue>> {
        self.fetch_report(ObjectKind::AgentAvailability, date_from, date_to)
            .await
    }

    pub async fn get_agent_availability_chats(
        &self,
        date_from: &str,
        date_to: &str,
    ) -> Result<Vec<JsonValue>> {
        self.fetch_report(ObjectKind::AgentAvailabilityChats, date_from, date_to)
            .await
    }

    pub async fn get_calls_availability(
        &self,
        date_from: &str,
        date_to: &str,
    ) -> Result<Vec<JsonValue>> {
        self.fetch_report(ObjectKind::CallsAvailability, date_from, date_to)
            .await
    }

    /// Conversations changed after `date_from`
    pub async fn get_conversations(&self, date_from: &str) -> Result<Vec<JsonValue>> {
        let mut query = self.v1_query(ObjectKind::Conversations)?;
        query.insert("datechanged".to_string(), format!("gt:{date_from}"));
        query.insert(
            "channel_type".to_string(),
            CONVERSATION_CHANNEL_TYPES.to_string(),
        );
        debug!("Conversations changed after {date_from}");

        self.fetch_plain(ObjectKind::Conversations.endpoint(), query)
            .await
    }
}
