//! Summary e-mail composition and the [`HttpNotifier`] sender.
//!
//! Composition is pure string building; the sender POSTs the composed
//! message to the mail gateway's send endpoint.

use std::fmt::Write as _;

use balance_core::{gateway::Notifier, summary::Summary};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{Error, Result};

// ─── Composition ─────────────────────────────────────────────────────────────

/// Traffic-light indicator for how much of the budget is used.
pub fn status_dot(percent_of_limit: Decimal) -> &'static str {
  if percent_of_limit > Decimal::from(85) {
    "🔴"
  } else if percent_of_limit > Decimal::from(60) {
    "🟡"
  } else {
    "🟢"
  }
}

/// Build the summary notification as `(subject, body)`.
pub fn compose_summary(summary: &Summary) -> (String, String) {
  let dot = status_dot(summary.percent_of_limit);

  let subject =
    format!("{dot} You are at {}% of budget", summary.percent_of_limit);

  let mut body = format!(
    "{dot} You are at {}% of budget. The current balance is ${}.\n",
    summary.percent_of_limit, summary.balance
  );
  if !summary.categories.is_empty() {
    body.push_str("\nCategories:\n");
    for (category, total) in &summary.categories {
      let _ = writeln!(body, "{category}: ${total}");
    }
  }

  (subject, body)
}

// ─── Sender ──────────────────────────────────────────────────────────────────

pub struct HttpNotifier {
  client:   reqwest::Client,
  base_url: String,
  token:    String,
  from:     String,
}

#[derive(Serialize)]
struct SendRequest<'a> {
  from:    &'a str,
  to:      &'a [String],
  subject: &'a str,
  body:    &'a str,
}

impl HttpNotifier {
  pub fn new(
    base_url: impl Into<String>,
    token: impl Into<String>,
    from: impl Into<String>,
  ) -> Self {
    Self {
      client:   reqwest::Client::new(),
      base_url: base_url.into(),
      token:    token.into(),
      from:     from.into(),
    }
  }
}

impl Notifier for HttpNotifier {
  type Error = Error;

  async fn send(
    &self,
    subject: &str,
    body: &str,
    recipients: &[String],
  ) -> Result<()> {
    let request = SendRequest {
      from: &self.from,
      to: recipients,
      subject,
      body,
    };

    let response = self
      .client
      .post(format!("{}/send", self.base_url))
      .bearer_auth(&self.token)
      .json(&request)
      .send()
      .await?;

    if !response.status().is_success() {
      return Err(Error::Status {
        service: "mail gateway",
        status:  response.status().as_u16(),
      });
    }

    Ok(())
  }
}
