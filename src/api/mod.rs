pub mod client;
pub mod error;
pub mod types;

pub use client::{HttpApi, LeitnerApi};
pub use error::ApiError;
pub use types::{AnswerReply, BoxCount, Card, DueCard, ReviewState};
