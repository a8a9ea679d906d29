use std::time::Duration;

use chrono_tz::Tz;
use serenity::async_trait;
use serenity::builder::{CreateActionRow, CreateButton};
use tokio::sync::{mpsc, Mutex};
use tokio::time::timeout;
use tracing::{debug, info};

use crate::config::local_now;
use crate::events::queue::{RsvpAction, RsvpPress};
use crate::handlers::meeting::{canceled_card, meeting_card};
use crate::handlers::reply::Card;
use crate::models::meeting::MeetingId;
use crate::service::registry::{MeetingRegistry, MeetingSnapshot};

const CHECK_SIGN: &str = "\u{2714}";
const X_SIGN: &str = "\u{2613}";

/// Renders the attendance card. `session` is `Some` while buttons should be shown.
#[async_trait]
pub trait RsvpPresenter: Send + Sync {
    async fn present(&self, card: &Card, session: Option<&str>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsvpEnd {
    TimedOut,
    Closed,
    Canceled,
}

pub fn rsvp_buttons(session: &str) -> CreateActionRow {
    CreateActionRow::Buttons(vec![
        CreateButton::new(RsvpAction::Accept.custom_id(session))
            .label(CHECK_SIGN)
            .style(serenity::all::ButtonStyle::Success),
        CreateButton::new(RsvpAction::Decline.custom_id(session))
            .label(X_SIGN)
            .style(serenity::all::ButtonStyle::Danger),
    ])
}

/// One open attendance view for a meeting.
pub struct RsvpView {
    pub meeting: MeetingId,
    pub session: String,
    pub window: Duration,
    pub timezone: Tz,
}

impl RsvpView {
    /// Renders, waits for a press or the window to lapse, applies it, and repeats.
    /// The window restarts after every press.
    pub async fn run<P: RsvpPresenter + ?Sized>(
        &self,
        registry: &Mutex<MeetingRegistry>,
        presses: &mut mpsc::Receiver<RsvpPress>,
        presenter: &P,
    ) -> RsvpEnd {
        let view = registry.lock().await.view(self.meeting);
        let mut snapshot = match view {
            Ok(snapshot) => snapshot,
            Err(_) => {
                presenter.present(&canceled_card(self.meeting), None).await;
                return RsvpEnd::Canceled;
            }
        };
        presenter
            .present(&self.card(&snapshot), Some(&self.session))
            .await;

        let end = loop {
            let press = match timeout(self.window, presses.recv()).await {
                Ok(Some(press)) => press,
                Ok(None) => break RsvpEnd::Closed,
                Err(_) => break RsvpEnd::TimedOut,
            };
            match self.apply(registry, &press).await {
                Some(updated) => snapshot = updated,
                None => {
                    presenter.present(&canceled_card(self.meeting), None).await;
                    return RsvpEnd::Canceled;
                }
            }
            presenter
                .present(&self.card(&snapshot), Some(&self.session))
                .await;
        };

        // Later presses must be refused, not queued behind the final render.
        presses.close();
        while let Ok(press) = presses.try_recv() {
            match self.apply(registry, &press).await {
                Some(updated) => snapshot = updated,
                None => {
                    presenter.present(&canceled_card(self.meeting), None).await;
                    return RsvpEnd::Canceled;
                }
            }
        }

        presenter.present(&self.card(&snapshot), None).await;
        info!(meeting_id = self.meeting, session = %self.session, ?end, "rsvp view finished");
        end
    }

    /// Returns the refreshed snapshot, or `None` once the meeting is gone.
    async fn apply(
        &self,
        registry: &Mutex<MeetingRegistry>,
        press: &RsvpPress,
    ) -> Option<MeetingSnapshot> {
        let mut registry = registry.lock().await;
        let changed = match press.action {
            RsvpAction::Accept => registry.accept(self.meeting, press.user_id, &press.display_name),
            RsvpAction::Decline => registry.decline(self.meeting, press.user_id, &press.display_name),
        };
        match changed {
            // Refusals (overlap, not attending) only show up as an unchanged roster.
            Ok(false) => debug!(
                meeting_id = self.meeting,
                user_id = %press.user_id,
                action = ?press.action,
                "rsvp press had no effect"
            ),
            Ok(true) => {}
            Err(_) => return None,
        }
        registry.view(self.meeting).ok()
    }

    fn card(&self, snapshot: &MeetingSnapshot) -> Card {
        meeting_card(snapshot, local_now(self.timezone))
    }
}
