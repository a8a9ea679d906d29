use std::collections::HashMap;

use serenity::model::id::UserId;

use crate::models::meeting_user::MeetingUser;
use crate::models::time_block::TimeBlock;

pub type MeetingId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeetingState {
    Open,
    Closed,
}

#[derive(Debug, Clone)]
pub struct Meeting {
    id: MeetingId,
    block: TimeBlock,
    roster: Vec<UserId>,
    state: MeetingState,
}

impl Meeting {
    pub fn new(id: MeetingId, block: TimeBlock) -> Self {
        Self {
            id,
            block,
            roster: Vec::new(),
            state: MeetingState::Open,
        }
    }

    pub fn id(&self) -> MeetingId {
        self.id
    }

    pub fn block(&self) -> &TimeBlock {
        &self.block
    }

    /// Attendees in the order they accepted.
    pub fn roster(&self) -> &[UserId] {
        &self.roster
    }

    pub fn is_valid(&self) -> bool {
        self.state == MeetingState::Open
    }

    pub fn register_user(&mut self, user: &mut MeetingUser) -> bool {
        if !self.is_valid() {
            return false;
        }
        if self.roster.contains(&user.id()) {
            return true;
        }
        if user.conflicts_with(&self.block) {
            return false;
        }
        self.roster.push(user.id());
        user.attach_meeting(self.id, self.block);
        true
    }

    pub fn deregister_user(&mut self, user: &mut MeetingUser) -> bool {
        if !self.is_valid() {
            return false;
        }
        let Some(idx) = self.roster.iter().position(|id| *id == user.id()) else {
            return false;
        };
        self.roster.remove(idx);
        user.detach_meeting(self.id);
        true
    }

    /// Releases every attendee and closes the meeting for good.
    pub fn teardown(&mut self, users: &mut HashMap<UserId, MeetingUser>) {
        for id in self.roster.clone() {
            match users.get_mut(&id) {
                Some(user) => {
                    self.deregister_user(user);
                }
                None => self.roster.retain(|member| *member != id),
            }
        }
        self.state = MeetingState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn block(start_hour: u32, end_hour: u32) -> TimeBlock {
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        TimeBlock::new(
            day.and_hms_opt(start_hour, 0, 0).unwrap(),
            day.and_hms_opt(end_hour, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn register_then_deregister_restores_calendar() {
        let mut meeting = Meeting::new(1, block(10, 11));
        let mut user = MeetingUser::new(UserId::new(5), "bo");
        user.mark_busy(block(14, 15));
        let before = user.commitments().to_vec();

        assert!(meeting.register_user(&mut user));
        assert_eq!(meeting.roster(), &[UserId::new(5)]);
        assert_eq!(user.commitments().len(), 2);

        assert!(meeting.deregister_user(&mut user));
        assert!(meeting.roster().is_empty());
        assert_eq!(user.commitments(), before.as_slice());
    }

    #[test]
    fn registration_is_idempotent() {
        let mut meeting = Meeting::new(1, block(10, 11));
        let mut user = MeetingUser::new(UserId::new(5), "bo");

        assert!(meeting.register_user(&mut user));
        assert!(meeting.register_user(&mut user));
        assert_eq!(meeting.roster().len(), 1);
        assert_eq!(user.commitments().len(), 1);
    }

    #[test]
    fn overlapping_commitment_blocks_registration() {
        let mut meeting = Meeting::new(1, block(10, 11));
        let mut user = MeetingUser::new(UserId::new(5), "bo");
        user.mark_busy(block(11, 12));

        assert!(!meeting.register_user(&mut user));
        assert!(meeting.roster().is_empty());
        assert_eq!(user.commitments().len(), 1);
    }

    #[test]
    fn deregister_unknown_user_fails() {
        let mut meeting = Meeting::new(1, block(10, 11));
        let mut user = MeetingUser::new(UserId::new(5), "bo");
        assert!(!meeting.deregister_user(&mut user));
    }

    #[test]
    fn teardown_releases_everyone_and_closes() {
        let mut meeting = Meeting::new(1, block(10, 11));
        let mut users = HashMap::new();
        for raw in [1_u64, 2, 3] {
            let mut user = MeetingUser::new(UserId::new(raw), format!("user{raw}"));
            assert!(meeting.register_user(&mut user));
            users.insert(user.id(), user);
        }

        meeting.teardown(&mut users);
        assert!(!meeting.is_valid());
        assert!(meeting.roster().is_empty());
        assert!(users.values().all(|u| u.commitments().is_empty()));

        meeting.teardown(&mut users);
        assert!(meeting.roster().is_empty());

        let user = users.get_mut(&UserId::new(1)).unwrap();
        assert!(!meeting.register_user(user));
        assert!(!meeting.deregister_user(user));
        assert!(meeting.roster().is_empty());
    }
}
