/// Per-user channel routing
///
/// Looks up the recipient and their settings, then sends on every channel that
/// is both configured on the server and enabled by the user:
///
/// | Channel | Server side      | User side                                  |
/// |---------|------------------|--------------------------------------------|
/// | push    | `PushSender`     | `notifications` and a registered push token |
/// | email   | `EmailSender`    | `email_notifications`                      |
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{EmailSender, Notification, Notifier, NotifyError, PushSender};
use crate::models::settings::UserSettings;
use crate::models::user::User;

/// Channels that apply to one recipient
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelPlan {
    pub push: bool,
    pub email: bool,
}

impl ChannelPlan {
    /// Decides channels from the server setup, the user's settings and push token
    pub fn for_user(
        settings: &UserSettings,
        has_push_token: bool,
        push_configured: bool,
        email_configured: bool,
    ) -> Self {
        Self {
            push: push_configured && settings.notifications && has_push_token,
            email: email_configured && settings.email_notifications,
        }
    }
}

/// Notifier backed by the database and the configured senders
pub struct ChannelNotifier {
    pool: PgPool,
    email: Option<EmailSender>,
    push: Option<PushSender>,
}

impl ChannelNotifier {
    pub fn new(pool: PgPool, email: Option<EmailSender>, push: Option<PushSender>) -> Self {
        Self { pool, email, push }
    }

    /// Whether any channel is configured at all
    pub fn has_channels(&self) -> bool {
        self.email.is_some() || self.push.is_some()
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn notify(&self, user_id: Uuid, notification: Notification) -> Result<(), NotifyError> {
        let user = User::find_by_id(&self.pool, user_id)
            .await?
            .ok_or(NotifyError::UnknownUser(user_id))?;
        let settings = UserSettings::get_or_create(&self.pool, user_id).await?;

        let plan = ChannelPlan::for_user(
            &settings,
            user.push_token.is_some(),
            self.push.is_some(),
            self.email.is_some(),
        );

        tracing::debug!(
            user_id = %user_id,
            push = plan.push,
            email = plan.email,
            "Routing notification"
        );

        // Both channels are attempted; the first failure is reported.
        let mut first_error: Option<NotifyError> = None;

        if let (true, Some(push), Some(token)) = (plan.push, &self.push, user.push_token.as_deref()) {
            if let Err(e) = push.send(token, &notification).await {
                first_error.get_or_insert(e.into());
            }
        }

        if let (true, Some(email)) = (plan.email, &self.email) {
            if let Err(e) = email.send(&user.email, &notification).await {
                first_error.get_or_insert(e.into());
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
