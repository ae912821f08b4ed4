//! [`ChatCategorizer`] — merchant classification over an OpenAI-compatible
//! chat-completions endpoint.
//!
//! Temperature is pinned to zero so the same merchant keeps mapping to the
//! same label. Replies outside the closed label set clamp to
//! [`UNCATEGORIZED`] rather than leaking free-form oracle text into the
//! store.

use balance_core::{gateway::Categorizer, summary::UNCATEGORIZED};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The closed set of spend categories the oracle may answer with.
pub const CATEGORIES: [&str; 7] = [
  "Bills",
  "Groceries",
  "Entertainment",
  "Pet Care",
  "Vehicle Fuel & Maintenance",
  "Restaurants & Bars",
  "Shopping",
];

const SYSTEM_PROMPT: &str = "\
You are a assistant that organizes expenses into the following categories:
    - Bills,
    - Groceries,
    - Entertainment,
    - Pet Care,
    - Vehicle Fuel & Maintenance,
    - Restaurants & Bars,
    - Shopping

Given a merchant name, return the best fitting category from the list above. \
Only return the category name, nothing else.
If the merchant does not fit any category, return \"Uncategorized\", but \
only if you must.";

pub struct ChatCategorizer {
  client:   reqwest::Client,
  base_url: String,
  api_key:  String,
  model:    String,
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
  model:       &'a str,
  messages:    [ChatMessage<'a>; 2],
  temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
  role:    &'a str,
  content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
  choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
  message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
  content: String,
}

// ─── Client ──────────────────────────────────────────────────────────────────

impl ChatCategorizer {
  pub fn new(
    base_url: impl Into<String>,
    api_key: impl Into<String>,
    model: impl Into<String>,
  ) -> Self {
    Self {
      client:   reqwest::Client::new(),
      base_url: base_url.into(),
      api_key:  api_key.into(),
      model:    model.into(),
    }
  }

  /// Clamp an oracle reply to the closed label set.
  fn clamp(reply: &str) -> String {
    let trimmed = reply.trim();
    if CATEGORIES.contains(&trimmed) {
      trimmed.to_owned()
    } else {
      UNCATEGORIZED.to_owned()
    }
  }
}

impl Categorizer for ChatCategorizer {
  type Error = Error;

  async fn classify(&self, merchant: &str) -> Result<String> {
    let request = ChatRequest {
      model:       &self.model,
      messages:    [
        ChatMessage { role: "system", content: SYSTEM_PROMPT },
        ChatMessage { role: "user", content: merchant },
      ],
      temperature: 0.0,
    };

    let response = self
      .client
      .post(format!("{}/chat/completions", self.base_url))
      .bearer_auth(&self.api_key)
      .json(&request)
      .send()
      .await?;

    if !response.status().is_success() {
      return Err(Error::Status {
        service: "classification oracle",
        status:  response.status().as_u16(),
      });
    }

    let body: ChatResponse = response.json().await?;
    let reply = body
      .choices
      .first()
      .map(|c| c.message.content.as_str())
      .ok_or(Error::EmptyCompletion)?;

    Ok(Self::clamp(reply))
  }
}

#[cfg(test)]
mod tests {
  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path},
  };

  use super::*;

  fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
      "choices": [{ "message": { "role": "assistant", "content": content } }]
    })
  }

  #[tokio::test]
  async fn classifies_a_merchant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/chat/completions"))
      .and(body_partial_json(serde_json::json!({ "temperature": 0.0 })))
      .respond_with(
        ResponseTemplate::new(200)
          .set_body_json(completion("Restaurants & Bars")),
      )
      .mount(&server)
      .await;

    let oracle = ChatCategorizer::new(server.uri(), "key", "test-model");
    let label = oracle.classify("BIG DOG").await.unwrap();
    assert_eq!(label, "Restaurants & Bars");
  }

  #[tokio::test]
  async fn whitespace_around_label_is_trimmed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/chat/completions"))
      .respond_with(
        ResponseTemplate::new(200).set_body_json(completion("  Groceries\n")),
      )
      .mount(&server)
      .await;

    let oracle = ChatCategorizer::new(server.uri(), "key", "test-model");
    assert_eq!(oracle.classify("CORNER MART").await.unwrap(), "Groceries");
  }

  #[tokio::test]
  async fn off_list_reply_clamps_to_uncategorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/chat/completions"))
      .respond_with(ResponseTemplate::new(200).set_body_json(completion(
        "I think this is probably a restaurant of some kind.",
      )))
      .mount(&server)
      .await;

    let oracle = ChatCategorizer::new(server.uri(), "key", "test-model");
    assert_eq!(oracle.classify("???").await.unwrap(), UNCATEGORIZED);
  }

  #[tokio::test]
  async fn oracle_failure_surfaces_as_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/chat/completions"))
      .respond_with(ResponseTemplate::new(500))
      .mount(&server)
      .await;

    let oracle = ChatCategorizer::new(server.uri(), "key", "test-model");
    assert!(oracle.classify("BIG DOG").await.is_err());
  }
}
