use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::{JobAlert, NotifyError, Notifier};
use crate::retry::{is_retryable, with_backoff, Attempt};

#[derive(Debug, Serialize)]
struct WabbPayload<'a> {
    phone: &'a str,
    name: &'a str,
    message: String,
    job_id: String,
    job_title: &'a str,
    company: &'a str,
    match_score: u32,
}

impl<'a> WabbPayload<'a> {
    fn from_alert(alert: &'a JobAlert) -> Self {
        Self {
            phone: &alert.phone,
            name: &alert.student_name,
            message: format!(
                "Hi {}, you are a {}% match for {} at {}. Open CampusPe to apply.",
                alert.student_name, alert.match_percent, alert.job_title, alert.company_name
            ),
            job_id: alert.job_id.to_string(),
            job_title: &alert.job_title,
            company: &alert.company_name,
            match_score: alert.match_percent,
        }
    }
}

/// Sends job alerts through a WABB WhatsApp automation webhook.
#[derive(Clone)]
pub struct WabbNotifier {
    client: Client,
    webhook_url: String,
}

impl WabbNotifier {
    pub fn new(webhook_url: String) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;
        Ok(Self {
            client,
            webhook_url,
        })
    }
}

#[async_trait]
impl Notifier for WabbNotifier {
    fn name(&self) -> &'static str {
        "wabb"
    }

    async fn send_job_alert(&self, alert: &JobAlert) -> Result<(), NotifyError> {
        let payload = WabbPayload::from_alert(alert);
        let payload = &payload;

        with_backoff("WABB webhook", move || self.attempt(payload)).await?;
        debug!(student_id = %alert.student_id, job_id = %alert.job_id, "WABB alert delivered");
        Ok(())
    }
}

impl WabbNotifier {
    async fn attempt(&self, payload: &WabbPayload<'_>) -> Attempt<(), NotifyError> {
        let response = match self.client.post(&self.webhook_url).json(payload).send().await {
            Ok(r) => r,
            Err(e) => return Attempt::Retry(NotifyError::Http(e)),
        };

        let status = response.status();
        if status.is_success() {
            return Attempt::Done(());
        }

        let error = NotifyError::Rejected {
            status: status.as_u16(),
            message: response.text().await.unwrap_or_default(),
        };
        if is_retryable(status) {
            Attempt::Retry(error)
        } else {
            Attempt::Fatal(error)
        }
    }
}
