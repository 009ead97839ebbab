use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{AUTHORIZATION, COOKIE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

use crate::api::error::ApiError;
use crate::api::types::{
    AnswerReply, AnswerRequest, AnswerWire, BoxCount, DueCard, NextReply, SummaryReply, SyncReply,
};
use crate::config::Config;

/// The remote Leitner service. Implementations block; callers run them off
/// the UI thread.
pub trait LeitnerApi: Send + Sync {
    fn next_card(&self, deck: Option<&str>) -> Result<Option<DueCard>, ApiError>;
    fn answer(&self, card_id: &str, correct: bool) -> Result<AnswerReply, ApiError>;
    fn summary(&self, deck: Option<&str>) -> Result<Vec<BoxCount>, ApiError>;
    /// Import external review items into the box system. Returns how many were synced.
    fn sync(&self) -> Result<u32, ApiError>;
}

pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::build(base_url, HeaderMap::new(), None)
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = config.auth_token.as_deref() {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ApiError::Transport(format!("invalid auth token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }
        if let Some(cookie) = config.session_cookie.as_deref() {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| ApiError::Transport(format!("invalid session cookie: {e}")))?;
            headers.insert(COOKIE, value);
        }
        let timeout = config.request_timeout_secs.map(Duration::from_secs);
        Self::build(&config.server_url, headers, timeout)
    }

    fn build(
        base_url: &str,
        headers: HeaderMap,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn with_deck(request: RequestBuilder, deck: Option<&str>) -> RequestBuilder {
        match deck {
            Some(deck) if !deck.is_empty() => request.query(&[("deck", deck)]),
            _ => request,
        }
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let (status, body) = Self::exchange(request)?;
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        decode(&body)
    }

    /// Status and body of a response. 401 is mapped here for every endpoint.
    fn exchange(request: RequestBuilder) -> Result<(StatusCode, String), ApiError> {
        let response = request.send()?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        Ok((status, response.text()?))
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Malformed(e.to_string()))
}

/// The answer endpoint reports a refused judgement (unknown card, bad
/// payload) with an error status and an `ok: false` body.
fn answer_reply(status: StatusCode, body: &str) -> Result<AnswerReply, ApiError> {
    if status.is_success() {
        return decode::<AnswerWire>(body).map(AnswerReply::from);
    }
    match serde_json::from_str::<AnswerWire>(body) {
        Ok(wire) if !wire.ok => Ok(AnswerReply::from(wire)),
        _ => Err(ApiError::Status(status.as_u16())),
    }
}

impl LeitnerApi for HttpApi {
    fn next_card(&self, deck: Option<&str>) -> Result<Option<DueCard>, ApiError> {
        let request = Self::with_deck(self.client.get(self.url("/api/leitner/next")), deck);
        let reply: NextReply = self.send(request)?;
        if !reply.ok {
            return Err(ApiError::Rejected(reply.detail));
        }
        Ok(reply.into_due())
    }

    fn answer(&self, card_id: &str, correct: bool) -> Result<AnswerReply, ApiError> {
        let request = self
            .client
            .post(self.url("/api/leitner/answer"))
            .json(&AnswerRequest { card_id, correct });
        let (status, body) = Self::exchange(request)?;
        answer_reply(status, &body)
    }

    fn summary(&self, deck: Option<&str>) -> Result<Vec<BoxCount>, ApiError> {
        let request = Self::with_deck(self.client.get(self.url("/api/leitner/summary")), deck);
        let reply: SummaryReply = self.send(request)?;
        if !reply.ok {
            return Err(ApiError::Rejected(reply.detail));
        }
        Ok(reply.boxes)
    }

    fn sync(&self) -> Result<u32, ApiError> {
        let reply: SyncReply = self.send(self.client.post(self.url("/api/leitner/sync")))?;
        if !reply.ok {
            return Err(ApiError::Rejected(reply.detail));
        }
        Ok(reply.synced)
    }
}
