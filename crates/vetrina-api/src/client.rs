// Hand-crafted async HTTP client for the catalog service.
//
// Base path: the configured catalog root.
// No auth: the catalog surface is public and read-only.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types::{ProductRecord, ProductQuery, sort_params};

// ── Error response shape from the catalog service ────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the catalog API.
///
/// Communicates via plain JSON REST endpoints under the catalog root:
/// the filtered/unfiltered listing at `/` and single-item lookup at
/// `/{id}`. Query parameters are appended only when non-empty; brand and
/// model lists are comma-joined.
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CatalogClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a catalog root URL and transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// The catalog root URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Parse the root URL and guarantee a trailing slash so `Url::join`
    /// treats it as a directory.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. an item id) onto the catalog root.
    fn url(&self, path: &str) -> Result<Url, Error> {
        self.base_url.join(path).map_err(Error::InvalidUrl)
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// List catalog products under the given server-side filters.
    ///
    /// `GET /?sortBy=…&order=…&brand=v1,v2&model=v1,v2` -- every parameter
    /// is appended only when non-empty, so the unfiltered discovery
    /// request degrades to a bare `GET /`.
    pub async fn list_products(&self, query: &ProductQuery) -> Result<Vec<ProductRecord>, Error> {
        let mut params: Vec<(&str, String)> = Vec::new();

        if let Some(pairs) = sort_params(&query.sort) {
            for &(k, v) in pairs {
                params.push((k, v.to_owned()));
            }
        }
        if !query.brands.is_empty() {
            params.push(("brand", query.brands.join(",")));
        }
        if !query.models.is_empty() {
            params.push(("model", query.models.join(",")));
        }

        let url = self.url("")?;
        debug!("GET {url} params={params:?}");

        let mut req = self.http.get(url);
        if !params.is_empty() {
            req = req.query(&params);
        }

        let resp = req.send().await?;
        self.handle_response(resp).await
    }

    /// Fetch a single product by id.
    ///
    /// `GET /{id}` -- shares the listing error contract.
    pub async fn get_product(&self, id: &str) -> Result<ProductRecord, Error> {
        let url = self.url(id)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview = &body[..body.len().min(200)];
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        if let Ok(err) = serde_json::from_str::<ErrorResponse>(&raw) {
            Error::Server {
                status: status.as_u16(),
                message: err.message.unwrap_or_else(|| status.to_string()),
                code: err.code,
            }
        } else {
            Error::Server {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
                code: None,
            }
        }
    }
}
