//! Remote per-user document store over HTTPS JSON.
//!
//! Documents live at `{base_url}/{collection}/{user}`: `GET` returns the
//! cycle (404 when the user has none yet) and `PATCH` upserts it with merge
//! semantics. An optional bearer token is sent with every request.

use crate::cycle::Cycle;
use crate::error::{CatalystError, Result};
use crate::paths;
use crate::repository::CycleRepository;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct RemoteRepository {
    base_url: String,
    collection: String,
    token: Option<String>,
}

impl RemoteRepository {
    pub fn new(base_url: &str, collection: &str, token: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            collection: collection.trim_matches('/').to_string(),
            token,
        }
    }

    pub fn document_url(&self, user_key: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.collection, user_key)
    }

    // Built per call: a blocking client must never be dropped inside an async
    // context.
    fn client(&self) -> Result<Client> {
        Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CatalystError::Remote(format!("failed to build HTTP client: {e}")))
    }

    fn authorize(
        &self,
        req: reqwest::blocking::RequestBuilder,
    ) -> reqwest::blocking::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

impl CycleRepository for RemoteRepository {
    fn load(&self, user_key: &str) -> Result<Option<Cycle>> {
        paths::validate_user_key(user_key)?;
        let url = self.document_url(user_key);
        tracing::debug!(url = %url, "loading remote cycle");

        let resp = self
            .authorize(self.client()?.get(&url))
            .send()
            .map_err(|e| CatalystError::Remote(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = resp
            .text()
            .map_err(|e| CatalystError::Remote(e.to_string()))?;
        if !status.is_success() {
            return Err(CatalystError::RemoteStatus {
                status: status.as_u16(),
                body,
            });
        }
        let cycle: Cycle = serde_json::from_str(&body)?;
        Ok(Some(cycle.repair()?))
    }

    fn save(&self, user_key: &str, cycle: &Cycle) -> Result<()> {
        paths::validate_user_key(user_key)?;
        let url = self.document_url(user_key);
        tracing::debug!(url = %url, "saving remote cycle");

        let resp = self
            .authorize(self.client()?.patch(&url))
            .json(cycle)
            .send()
            .map_err(|e| CatalystError::Remote(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(CatalystError::RemoteStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("{}/{}", self.base_url, self.collection)
    }
}
