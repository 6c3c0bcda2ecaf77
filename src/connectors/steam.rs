// src/connectors/steam.rs
//
// Steam Community HTTP client: paged inventory reads and the goo exchange
// (ajaxgetgoovalue / ajaxgrindintogoo).

use crate::errors::SteamError;
use crate::models::{AssetRecord, GooQuote, GrindReceipt, InventoryPage, ItemDescription};
use crate::traits::{GooClient, InventoryClient};
use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

const STEAM_COMMUNITY_URL: &str = "https://steamcommunity.com";
/// Steam Community items (trading cards, emoticons, backgrounds, ...)
const COMMUNITY_APP_ID: u32 = 753;
const COMMUNITY_CONTEXT_ID: u32 = 6;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

// --- Raw Steam Types (Used for JSON parsing only) ---

#[derive(Debug, Deserialize)]
struct InventoryResponse {
    #[serde(default)]
    assets: Vec<ApiAsset>,
    #[serde(default)]
    descriptions: Vec<ApiDescription>,
    last_assetid: Option<String>,
    /// 1 when another page is available
    #[serde(default)]
    more_items: i64,
}

#[derive(Debug, Deserialize)]
struct ApiAsset {
    assetid: String,
    classid: String,
    instanceid: String,
}

#[derive(Debug, Deserialize)]
struct ApiDescription {
    name: String,
    #[serde(rename = "type", default)]
    type_long: String,
    classid: String,
    instanceid: String,
    #[serde(default)]
    tags: Vec<ApiTag>,
    #[serde(default)]
    market_fee_app: u32,
}

#[derive(Debug, Deserialize)]
struct ApiTag {
    #[serde(default)]
    localized_tag_name: String,
}

#[derive(Debug, Deserialize)]
struct GooValueResponse {
    #[serde(default)]
    goo_value: String,
    message: Option<String>,
    success: i32,
}

#[derive(Debug, Deserialize)]
struct GrindResponse {
    #[serde(default)]
    goo_value_total: String,
    success: i32,
}

impl InventoryResponse {
    fn into_page(self) -> InventoryPage {
        InventoryPage {
            assets: self
                .assets
                .into_iter()
                .map(|a| AssetRecord::new(a.assetid, a.classid, a.instanceid))
                .collect(),
            descriptions: self
                .descriptions
                .into_iter()
                .map(|d| ItemDescription {
                    name: d.name,
                    type_long: d.type_long,
                    class_id: d.classid,
                    instance_id: d.instanceid,
                    tags: d.tags.into_iter().map(|t| t.localized_tag_name).collect(),
                    app_id: d.market_fee_app,
                })
                .collect(),
            cursor: self.last_assetid.filter(|c| !c.is_empty()),
            more: self.more_items == 1,
        }
    }
}

// --- Credentials ---

/// Identifies the account and authenticates the goo exchange.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SteamCredentials {
    /// 64-bit Steam ID, used for inventory reads and the login cookie
    pub steam_id: String,
    /// Custom profile URL name (steamcommunity.com/id/<vanity>)
    pub vanity: String,
    pub session_id: String,
    pub access_token: String,
}

impl SteamCredentials {
    /// Cookie header value carrying the session and login token.
    pub fn cookie(&self) -> String {
        format!(
            "sessionid={};steamLoginSecure={}%7C%7C{}",
            self.session_id, self.steam_id, self.access_token
        )
    }
}

// --- The Client ---

/// Talks to steamcommunity.com. The reqwest client is injected so callers
/// control timeouts and connection reuse.
pub struct SteamCommunity {
    http_client: reqwest::Client,
    base_url: String,
    credentials: SteamCredentials,
}

impl SteamCommunity {
    pub fn new(http_client: reqwest::Client, credentials: SteamCredentials) -> Self {
        Self {
            http_client,
            base_url: STEAM_COMMUNITY_URL.to_string(),
            credentials,
        }
    }

    /// Points the client at another host (e.g. a local proxy).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Builds an HTTP client whose every request is bounded by `timeout`.
    pub fn http_client(timeout: Duration) -> Result<reqwest::Client, SteamError> {
        reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SteamError::Request(e.to_string()))
    }

    /// Wraps this client in an Arc so it can serve as both client traits.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn profile_url(&self, endpoint: &str) -> String {
        format!("{}/id/{}/{}", self.base_url, self.credentials.vanity, endpoint)
    }
}

/// Reads the body and decodes it, keeping the HTTP status in the error.
async fn decode_body<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, SteamError> {
    let status = response.status();
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| SteamError::Decode(format!("{} (HTTP {})", e, status)))
}

#[async_trait]
impl InventoryClient for SteamCommunity {
    async fn fetch_page(
        &self,
        account_id: &str,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<InventoryPage, SteamError> {
        let url = format!(
            "{}/inventory/{}/{}/{}",
            self.base_url, account_id, COMMUNITY_APP_ID, COMMUNITY_CONTEXT_ID
        );

        let mut request = self
            .http_client
            .get(&url)
            .query(&[("l", "english")])
            .query(&[("count", page_size)]);
        if let Some(cursor) = cursor {
            request = request.query(&[("start_assetid", cursor)]);
        }

        debug!("GET {} (cursor: {:?})", url, cursor);
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(SteamError::Status(response.status().as_u16()));
        }

        let raw: InventoryResponse = decode_body(response).await?;
        Ok(raw.into_page())
    }
}

#[async_trait]
impl GooClient for SteamCommunity {
    async fn goo_value(&self, app_id: u32, asset_id: &str) -> Result<GooQuote, SteamError> {
        let url = self.profile_url("ajaxgetgoovalue/");
        let app_id = app_id.to_string();
        let context_id = COMMUNITY_CONTEXT_ID.to_string();

        debug!("GET {} (asset {})", url, asset_id);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("sessionid", self.credentials.session_id.as_str()),
                ("appid", app_id.as_str()),
                ("assetid", asset_id),
                ("contextid", context_id.as_str()),
            ])
            .header(reqwest::header::COOKIE, self.credentials.cookie())
            .send()
            .await?;

        let raw: GooValueResponse = decode_body(response).await?;
        Ok(GooQuote {
            value: raw.goo_value,
            message: raw.message,
            success: raw.success,
        })
    }

    async fn grind_into_goo(
        &self,
        app_id: u32,
        asset_id: &str,
        expected_value: &str,
    ) -> Result<GrindReceipt, SteamError> {
        let url = self.profile_url("ajaxgrindintogoo");
        let app_id = app_id.to_string();
        let context_id = COMMUNITY_CONTEXT_ID.to_string();

        debug!("POST {} (asset {}, expecting {})", url, asset_id, expected_value);
        let response = self
            .http_client
            .post(&url)
            .form(&[
                ("sessionid", self.credentials.session_id.as_str()),
                ("appid", app_id.as_str()),
                ("assetid", asset_id),
                ("contextid", context_id.as_str()),
                ("goo_value_expected", expected_value),
            ])
            .header(reqwest::header::COOKIE, self.credentials.cookie())
            .send()
            .await?;

        let raw: GrindResponse = decode_body(response).await?;
        Ok(GrindReceipt {
            goo_total: raw.goo_value_total,
            success: raw.success,
        })
    }
}
