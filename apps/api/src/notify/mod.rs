//! Job alert delivery.
//!
//! `TracingNotifier` only logs; `WabbNotifier` posts to the WABB WhatsApp
//! webhook. `AppState` carries one as `Arc<dyn Notifier>`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

pub mod wabb;

pub use wabb::WabbNotifier;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Webhook rejected alert (status {status}): {message}")]
    Rejected { status: u16, message: String },
}

/// One "you match this job" message to one student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobAlert {
    pub student_id: Uuid,
    pub student_name: String,
    pub phone: String,
    pub job_id: Uuid,
    pub job_title: String,
    pub company_name: String,
    /// 0 – 100
    pub match_percent: u32,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send_job_alert(&self, alert: &JobAlert) -> Result<(), NotifyError>;
}

pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send_job_alert(&self, alert: &JobAlert) -> Result<(), NotifyError> {
        info!(
            student_id = %alert.student_id,
            job_id = %alert.job_id,
            match_percent = alert.match_percent,
            "job alert (delivery disabled): {} at {}",
            alert.job_title,
            alert.company_name
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tracing_notifier_always_succeeds() {
        let alert = JobAlert {
            student_id: Uuid::new_v4(),
            student_name: "Kiran".to_string(),
            phone: "+919811111111".to_string(),
            job_id: Uuid::new_v4(),
            job_title: "QA Intern".to_string(),
            company_name: "Testly".to_string(),
            match_percent: 72,
        };
        assert!(TracingNotifier.send_job_alert(&alert).await.is_ok());
        assert_eq!(TracingNotifier.name(), "log");
    }
}
