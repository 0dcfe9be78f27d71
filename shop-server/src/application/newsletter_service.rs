use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{info, instrument, warn};

use crate::data::subscriber_repository::SubscriberRepository;
use crate::domain::error::DomainError;
use crate::domain::subscriber::Subscriber;
use crate::domain::validation::{normalize_email, validate_email};
use crate::infrastructure::mailer::Mailer;

pub const NEWSLETTER_SUBJECT: &str = "New Products Are Available!";
pub const NEWSLETTER_BODY: &str = "Check out our latest products and offers!";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NewsletterReport {
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
}

#[derive(Clone)]
pub struct NewsletterService {
    repo: Arc<dyn SubscriberRepository>,
    mailer: Arc<dyn Mailer>,
}

impl NewsletterService {
    pub fn new(repo: Arc<dyn SubscriberRepository>, mailer: Arc<dyn Mailer>) -> Self {
        Self { repo, mailer }
    }

    #[instrument(skip(self))]
    pub async fn subscribe(&self, email: &str) -> Result<Subscriber, DomainError> {
        let email = normalize_email(email);
        validate_email(&email)?;

        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(DomainError::AlreadySubscribed);
        }
        self.repo.create(Subscriber::new(email)).await
    }

    /// Sends the newsletter to every subscriber. Individual delivery failures
    /// are logged and counted, never returned.
    #[instrument(skip(self))]
    pub async fn broadcast(&self) -> Result<NewsletterReport, DomainError> {
        let subscribers = self.repo.list_all().await?;
        let mailer = &self.mailer;

        let outcomes = join_all(subscribers.iter().map(|subscriber| async move {
            match mailer
                .send(&subscriber.email, NEWSLETTER_SUBJECT, NEWSLETTER_BODY)
                .await
            {
                Ok(()) => true,
                Err(err) => {
                    warn!(to = %subscriber.email, error = %err, "newsletter delivery failed");
                    false
                }
            }
        }))
        .await;

        let delivered = outcomes.iter().filter(|ok| **ok).count();
        let report = NewsletterReport {
            attempted: outcomes.len(),
            delivered,
            failed: outcomes.len() - delivered,
        };
        info!(
            attempted = report.attempted,
            delivered = report.delivered,
            failed = report.failed,
            "newsletter sent"
        );
        Ok(report)
    }
}
