//! [`HttpMailbox`] — mail-gateway client implementing the [`Mailbox`] trait.
//!
//! Speaks to a JSON mail gateway: `GET /messages` searches by subject
//! substrings and delivery window, `GET /messages/{id}` downloads one
//! message. The gateway tolerates re-delivery; deduplication is the
//! ingestion loop's job.

use std::time::Duration;

use balance_core::{
  gateway::{Mailbox, RawMessage},
  parse::{MERCHANT_MARKER, TRANSACTION_PHRASE},
};
use chrono::Utc;
use serde::Deserialize;

use crate::{Error, Result};

pub struct HttpMailbox {
  client:   reqwest::Client,
  base_url: String,
  token:    String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
  ids: Vec<String>,
}

impl HttpMailbox {
  pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
    Self {
      client:   reqwest::Client::new(),
      base_url: base_url.into(),
      token:    token.into(),
    }
  }
}

impl Mailbox for HttpMailbox {
  type Error = Error;

  async fn search_since(&self, window: Duration) -> Result<Vec<String>> {
    let since = (Utc::now() - window).to_rfc3339();

    let response = self
      .client
      .get(format!("{}/messages", self.base_url))
      .bearer_auth(&self.token)
      .query(&[
        ("contains", TRANSACTION_PHRASE),
        ("contains", MERCHANT_MARKER),
        ("since", since.as_str()),
      ])
      .send()
      .await?;

    if !response.status().is_success() {
      return Err(Error::Status {
        service: "mail gateway",
        status:  response.status().as_u16(),
      });
    }

    let body: SearchResponse = response.json().await?;
    Ok(body.ids)
  }

  async fn fetch(&self, id: &str) -> Result<Option<RawMessage>> {
    let response = self
      .client
      .get(format!("{}/messages/{id}", self.base_url))
      .bearer_auth(&self.token)
      .send()
      .await?;

    if response.status() == reqwest::StatusCode::NOT_FOUND {
      return Ok(None);
    }
    if !response.status().is_success() {
      return Err(Error::Status {
        service: "mail gateway",
        status:  response.status().as_u16(),
      });
    }

    Ok(Some(response.json().await?))
  }
}

#[cfg(test)]
mod tests {
  use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
  };

  use super::*;

  #[tokio::test]
  async fn search_returns_candidate_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/messages"))
      .and(query_param("contains", TRANSACTION_PHRASE))
      .respond_with(ResponseTemplate::new(200).set_body_json(
        serde_json::json!({ "ids": ["msg-1", "msg-2"] }),
      ))
      .mount(&server)
      .await;

    let mailbox = HttpMailbox::new(server.uri(), "token");
    let ids = mailbox
      .search_since(Duration::from_secs(3600))
      .await
      .unwrap();
    assert_eq!(ids, vec!["msg-1", "msg-2"]);
  }

  #[tokio::test]
  async fn search_failure_is_one_typed_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/messages"))
      .respond_with(ResponseTemplate::new(503))
      .mount(&server)
      .await;

    let mailbox = HttpMailbox::new(server.uri(), "token");
    let err = mailbox
      .search_since(Duration::from_secs(3600))
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Status { status: 503, .. }));
  }

  #[tokio::test]
  async fn fetch_decodes_a_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/messages/msg-1"))
      .respond_with(ResponseTemplate::new(200).set_body_json(
        serde_json::json!({
          "id": "msg-1",
          "received_at": "2026-08-24T12:00:00Z",
          "subject": "You made a $10.12 transaction with BIG DOG",
          "body": "",
        }),
      ))
      .mount(&server)
      .await;

    let mailbox = HttpMailbox::new(server.uri(), "token");
    let message = mailbox.fetch("msg-1").await.unwrap().unwrap();
    assert_eq!(message.id, "msg-1");
    assert_eq!(
      message.subject,
      "You made a $10.12 transaction with BIG DOG"
    );
  }

  #[tokio::test]
  async fn fetch_missing_message_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
      .and(path("/messages/gone"))
      .respond_with(ResponseTemplate::new(404))
      .mount(&server)
      .await;

    let mailbox = HttpMailbox::new(server.uri(), "token");
    assert!(mailbox.fetch("gone").await.unwrap().is_none());
  }
}
