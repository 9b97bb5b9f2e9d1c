//! Best-effort lifecycle notifications.
//!
//! Delivery runs on its own task; failures are logged and never affect the
//! transition that triggered them.

use std::sync::Arc;

use log::error;
use thiserror::Error;
use uuid::Uuid;

use crate::BoxFuture;

/// Errors during notification delivery.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The email send failed.
    #[error("email send failed: {0}")]
    Send(String),
}

/// A lifecycle event worth telling someone about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestEvent {
    /// A new request awaits admin review.
    Submitted {
        /// Request id.
        request_id: Uuid,
        /// Requested app.
        app_id: Uuid,
        /// Requesting user.
        requester_id: String,
        /// Justification text.
        reason: String,
    },
    /// A request was approved.
    Approved {
        /// Request id.
        request_id: Uuid,
        /// Requested app.
        app_id: Uuid,
        /// Requesting user.
        requester_id: String,
    },
    /// A request was rejected.
    Rejected {
        /// Request id.
        request_id: Uuid,
        /// Requested app.
        app_id: Uuid,
        /// Requesting user.
        requester_id: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl RequestEvent {
    fn subject(&self) -> &'static str {
        match self {
            Self::Submitted { .. } => "New app request awaiting review",
            Self::Approved { .. } => "Your app request was approved",
            Self::Rejected { .. } => "Your app request was rejected",
        }
    }

    fn body_text(&self) -> String {
        match self {
            Self::Submitted {
                request_id,
                app_id,
                requester_id,
                reason,
            } => format!(
                "User {requester_id} requested access to app {app_id}.\n\n\
                 Justification: {reason}\n\nRequest id: {request_id}"
            ),
            Self::Approved {
                request_id,
                app_id,
                requester_id,
            } => format!(
                "Request {request_id} by {requester_id} for app {app_id} was approved."
            ),
            Self::Rejected {
                request_id,
                app_id,
                requester_id,
                reason,
            } => format!(
                "Request {request_id} by {requester_id} for app {app_id} was rejected.\n\n\
                 Reason: {reason}"
            ),
        }
    }
}

/// Delivers lifecycle events.
pub trait Notifier: Send + Sync {
    /// Deliver one event.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] on delivery failure.
    fn notify<'a>(&'a self, event: &'a RequestEvent) -> BoxFuture<'a, Result<(), NotifyError>>;
}

/// Fire-and-forget dispatch: spawn delivery on its own task and log failures.
pub fn dispatch(notifier: Arc<dyn Notifier>, event: RequestEvent) {
    tokio::spawn(async move {
        if let Err(e) = notifier.notify(&event).await {
            error!("notification delivery failed: {e}");
        }
    });
}

/// SES-backed [`Notifier`] sending to the configured notifications mailbox.
#[derive(Debug, Clone)]
pub struct SesNotifier {
    ses: aws_sdk_sesv2::Client,
    from_email: String,
    notify_email: String,
}

impl SesNotifier {
    /// Create a notifier sending from `from_email` to `notify_email`.
    #[must_use]
    pub fn new(
        ses: aws_sdk_sesv2::Client,
        from_email: impl Into<String>,
        notify_email: impl Into<String>,
    ) -> Self {
        Self {
            ses,
            from_email: from_email.into(),
            notify_email: notify_email.into(),
        }
    }
}

impl Notifier for SesNotifier {
    fn notify<'a>(&'a self, event: &'a RequestEvent) -> BoxFuture<'a, Result<(), NotifyError>> {
        Box::pin(async move {
            let build_err = |e: aws_sdk_sesv2::error::BuildError| NotifyError::Send(e.to_string());

            let content = aws_sdk_sesv2::types::EmailContent::builder()
                .simple(
                    aws_sdk_sesv2::types::Message::builder()
                        .subject(
                            aws_sdk_sesv2::types::Content::builder()
                                .data(event.subject())
                                .build()
                                .map_err(build_err)?,
                        )
                        .body(
                            aws_sdk_sesv2::types::Body::builder()
                                .text(
                                    aws_sdk_sesv2::types::Content::builder()
                                        .data(event.body_text())
                                        .build()
                                        .map_err(build_err)?,
                                )
                                .build(),
                        )
                        .build(),
                )
                .build();

            self.ses
                .send_email()
                .from_email_address(&self.from_email)
                .destination(
                    aws_sdk_sesv2::types::Destination::builder()
                        .to_addresses(&self.notify_email)
                        .build(),
                )
                .content(content)
                .send()
                .await
                .map_err(|e| NotifyError::Send(e.to_string()))?;

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_body_carries_the_reason() {
        let event = RequestEvent::Rejected {
            request_id: Uuid::nil(),
            app_id: Uuid::nil(),
            requester_id: "u-1".to_owned(),
            reason: "duplicate of an existing tool".to_owned(),
        };
        assert!(event.body_text().contains("duplicate of an existing tool"));
        assert_eq!(event.subject(), "Your app request was rejected");
    }

    #[test]
    fn submission_body_names_requester_and_app() {
        let app_id = Uuid::new_v4();
        let event = RequestEvent::Submitted {
            request_id: Uuid::new_v4(),
            app_id,
            requester_id: "u-7".to_owned(),
            reason: "Need this for Q3 rollout plan".to_owned(),
        };
        let body = event.body_text();
        assert!(body.contains("u-7"));
        assert!(body.contains(&app_id.to_string()));
    }
}
