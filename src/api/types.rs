use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// A due study item as served by `/api/leitner/next`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "CardWire")]
pub struct Card {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub box_no: u8,
    pub deck: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdWire {
    Text(String),
    Number(i64),
}

// Older card documents only carry `front`/`back`.
#[derive(Deserialize)]
struct CardWire {
    #[serde(alias = "_id")]
    id: IdWire,
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    front: Option<String>,
    #[serde(default)]
    back: Option<String>,
    #[serde(default, rename = "box")]
    box_no: Option<u8>,
    #[serde(default)]
    deck: Option<String>,
}

fn non_empty(primary: Option<String>, legacy: Option<String>) -> String {
    primary
        .filter(|s| !s.is_empty())
        .or(legacy)
        .unwrap_or_default()
}

impl From<CardWire> for Card {
    fn from(wire: CardWire) -> Self {
        let id = match wire.id {
            IdWire::Text(s) => s,
            IdWire::Number(n) => n.to_string(),
        };
        Self {
            id,
            question: non_empty(wire.question, wire.front),
            answer: non_empty(wire.answer, wire.back),
            box_no: wire.box_no.unwrap_or(1).max(1),
            deck: wire.deck.filter(|d| !d.is_empty()),
        }
    }
}

/// Server-side scheduling record, mirrored for display only.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ReviewState {
    #[serde(default, rename = "box")]
    pub box_no: Option<u8>,
    #[serde(default)]
    pub next_review_at: Option<String>,
}

impl ReviewState {
    /// Parse `next_review_at`. Timestamps without an offset are taken as UTC.
    pub fn next_review_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.next_review_at.as_deref()?.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DueCard {
    pub card: Card,
    pub state: ReviewState,
}

/// Body of `GET /api/leitner/next`, also embedded as `next` in answer replies.
#[derive(Clone, Debug, Deserialize)]
pub struct NextReply {
    #[serde(default = "default_ok")]
    pub ok: bool,
    #[serde(default)]
    pub card: Option<Card>,
    #[serde(default)]
    pub state: Option<ReviewState>,
    #[serde(default)]
    pub detail: Option<String>,
}

fn default_ok() -> bool {
    true
}

impl NextReply {
    pub fn into_due(self) -> Option<DueCard> {
        let card = self.card?;
        Some(DueCard {
            card,
            state: self.state.unwrap_or_default(),
        })
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct AnswerRequest<'a> {
    pub card_id: &'a str,
    pub correct: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AnswerWire {
    pub ok: bool,
    #[serde(default, rename = "box")]
    pub box_no: Option<u8>,
    #[serde(default)]
    pub next: Option<NextReply>,
    #[serde(default)]
    pub detail: Option<String>,
}

/// Result of a judgement submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerReply {
    pub accepted: bool,
    /// Box the judged card landed in, when the server reports it.
    pub new_box: Option<u8>,
    pub next: Option<DueCard>,
    pub detail: Option<String>,
}

impl From<AnswerWire> for AnswerReply {
    fn from(wire: AnswerWire) -> Self {
        let next = if wire.ok {
            wire.next.filter(|n| n.ok).and_then(NextReply::into_due)
        } else {
            None
        };
        Self {
            accepted: wire.ok,
            new_box: wire.box_no,
            next,
            detail: wire.detail,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct BoxCount {
    #[serde(alias = "_id")]
    pub id: u8,
    #[serde(default)]
    pub due: u32,
    #[serde(default)]
    pub total: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SummaryReply {
    pub ok: bool,
    #[serde(default)]
    pub boxes: Vec<BoxCount>,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SyncReply {
    pub ok: bool,
    #[serde(default)]
    pub synced: u32,
    #[serde(default)]
    pub detail: Option<String>,
}
