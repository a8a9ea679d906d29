use std::collections::HashMap;
use std::sync::Arc;

use serenity::model::id::UserId;
use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;

pub type SessionId = String;

const PRESS_BUFFER: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsvpAction {
    Accept,
    Decline,
}

impl RsvpAction {
    pub fn custom_id_prefix(&self) -> &'static str {
        match self {
            RsvpAction::Accept => "meeting_accept",
            RsvpAction::Decline => "meeting_decline",
        }
    }

    pub fn custom_id(&self, session: &str) -> String {
        format!("{}:{}", self.custom_id_prefix(), session)
    }

    /// Splits `meeting_accept:<session>` style ids.
    pub fn parse_custom_id(custom_id: &str) -> Option<(RsvpAction, &str)> {
        let (prefix, session) = custom_id.split_once(':')?;
        let action = [RsvpAction::Accept, RsvpAction::Decline]
            .into_iter()
            .find(|action| action.custom_id_prefix() == prefix)?;
        Some((action, session))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsvpPress {
    pub action: RsvpAction,
    pub user_id: UserId,
    pub display_name: String,
}

/// Routes button presses to the RSVP view that rendered them.
#[derive(Clone, Default)]
pub struct RsvpSessions {
    senders: Arc<Mutex<HashMap<SessionId, mpsc::Sender<RsvpPress>>>>,
}

impl RsvpSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(&self) -> (SessionId, mpsc::Receiver<RsvpPress>) {
        let (tx, rx) = mpsc::channel(PRESS_BUFFER);
        let session = Uuid::new_v4().to_string();
        let mut senders = self.senders.lock().await;
        senders.insert(session.clone(), tx);
        (session, rx)
    }

    /// Returns false when the session is unknown or its view has stopped listening.
    pub async fn route(&self, session: &str, press: RsvpPress) -> bool {
        let sender = {
            let senders = self.senders.lock().await;
            senders.get(session).cloned()
        };
        match sender {
            Some(tx) => tx.send(press).await.is_ok(),
            None => false,
        }
    }

    pub async fn close(&self, session: &str) {
        let mut senders = self.senders.lock().await;
        senders.remove(session);
    }

    pub async fn len(&self) -> usize {
        self.senders.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(action: RsvpAction) -> RsvpPress {
        RsvpPress {
            action,
            user_id: UserId::new(1),
            display_name: "ana".to_string(),
        }
    }

    #[test]
    fn custom_ids_round_trip_through_prefix() {
        let id = RsvpAction::Decline.custom_id("abc");
        assert_eq!(id, "meeting_decline:abc");
        assert_eq!(
            RsvpAction::parse_custom_id(&id),
            Some((RsvpAction::Decline, "abc"))
        );
        assert_eq!(RsvpAction::parse_custom_id("reminder_confirm:abc"), None);
        assert_eq!(RsvpAction::parse_custom_id("meeting_accept"), None);
    }

    #[tokio::test]
    async fn routes_to_open_sessions_only() {
        let sessions = RsvpSessions::new();
        let (session, mut rx) = sessions.open().await;

        assert!(sessions.route(&session, press(RsvpAction::Accept)).await);
        assert_eq!(rx.recv().await, Some(press(RsvpAction::Accept)));

        assert!(!sessions.route("missing", press(RsvpAction::Accept)).await);

        sessions.close(&session).await;
        assert!(!sessions.route(&session, press(RsvpAction::Decline)).await);
        assert_eq!(sessions.len().await, 0);
    }

    #[tokio::test]
    async fn dropped_receiver_rejects_presses() {
        let sessions = RsvpSessions::new();
        let (session, rx) = sessions.open().await;
        drop(rx);
        assert!(!sessions.route(&session, press(RsvpAction::Accept)).await);
    }
}
