use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;
use serenity::model::id::UserId;
use tracing::{debug, info};

use crate::errors::ScheduleError;
use crate::models::meeting::{Meeting, MeetingId};
use crate::models::meeting_user::{CommitmentSource, MeetingUser};
use crate::models::time_block::TimeBlock;
use crate::service::time_parser::parse_time;

/// Point-in-time copy of a meeting for rendering outside the registry lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingSnapshot {
    pub id: MeetingId,
    pub block: TimeBlock,
    pub attendees: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaEntry {
    pub position: usize,
    pub source: CommitmentSource,
    pub block: TimeBlock,
}

/// Owns every meeting and every user calendar.
#[derive(Debug)]
pub struct MeetingRegistry {
    meetings: BTreeMap<MeetingId, Meeting>,
    users: HashMap<UserId, MeetingUser>,
    next_meeting_id: MeetingId,
}

impl Default for MeetingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MeetingRegistry {
    pub fn new() -> Self {
        Self {
            meetings: BTreeMap::new(),
            users: HashMap::new(),
            next_meeting_id: 1,
        }
    }

    pub fn meeting_count(&self) -> usize {
        self.meetings.len()
    }

    pub fn user(&self, id: UserId) -> Option<&MeetingUser> {
        self.users.get(&id)
    }

    pub fn get_or_create_user(&mut self, id: UserId, display_name: &str) -> &mut MeetingUser {
        let user = self
            .users
            .entry(id)
            .or_insert_with(|| MeetingUser::new(id, display_name));
        user.set_display_name(display_name);
        user
    }

    pub fn schedule(
        &mut self,
        start_text: &str,
        end_text: &str,
        now: NaiveDateTime,
    ) -> Result<(MeetingId, TimeBlock), ScheduleError> {
        let block = parse_block(start_text, end_text, now)?;
        let id = self.next_meeting_id;
        self.next_meeting_id += 1;
        self.meetings.insert(id, Meeting::new(id, block));
        info!(meeting_id = id, start = %block.start(), end = %block.end(), "meeting scheduled");
        Ok((id, block))
    }

    pub fn cancel(&mut self, id: MeetingId) -> Result<(), ScheduleError> {
        let mut meeting = self.meetings.remove(&id).ok_or(ScheduleError::NotFound(id))?;
        let attendees = meeting.roster().len();
        meeting.teardown(&mut self.users);
        info!(meeting_id = id, attendees, "meeting canceled");
        Ok(())
    }

    pub fn mark_busy(
        &mut self,
        user: UserId,
        display_name: &str,
        start_text: &str,
        end_text: &str,
        now: NaiveDateTime,
    ) -> Result<TimeBlock, ScheduleError> {
        let block = parse_block(start_text, end_text, now)?;
        self.get_or_create_user(user, display_name).mark_busy(block);
        info!(user_id = %user, start = %block.start(), end = %block.end(), "user marked busy");
        Ok(block)
    }

    pub fn view(&self, id: MeetingId) -> Result<MeetingSnapshot, ScheduleError> {
        let meeting = self.meetings.get(&id).ok_or(ScheduleError::NotFound(id))?;
        let attendees = meeting
            .roster()
            .iter()
            .map(|member| match self.users.get(member) {
                Some(user) => user.display_name().to_string(),
                None => member.to_string(),
            })
            .collect();
        Ok(MeetingSnapshot {
            id,
            block: *meeting.block(),
            attendees,
        })
    }

    pub fn accept(
        &mut self,
        id: MeetingId,
        user: UserId,
        display_name: &str,
    ) -> Result<bool, ScheduleError> {
        let meeting = self.meetings.get_mut(&id).ok_or(ScheduleError::NotFound(id))?;
        let member = self
            .users
            .entry(user)
            .or_insert_with(|| MeetingUser::new(user, display_name));
        member.set_display_name(display_name);
        let registered = meeting.register_user(member);
        debug!(meeting_id = id, user_id = %user, registered, "rsvp accept");
        Ok(registered)
    }

    pub fn decline(
        &mut self,
        id: MeetingId,
        user: UserId,
        display_name: &str,
    ) -> Result<bool, ScheduleError> {
        let meeting = self.meetings.get_mut(&id).ok_or(ScheduleError::NotFound(id))?;
        let member = self
            .users
            .entry(user)
            .or_insert_with(|| MeetingUser::new(user, display_name));
        member.set_display_name(display_name);
        let released = meeting.deregister_user(member);
        debug!(meeting_id = id, user_id = %user, released, "rsvp decline");
        Ok(released)
    }

    pub fn agenda(&self, user: UserId) -> Vec<AgendaEntry> {
        self.users
            .get(&user)
            .map(|member| {
                member
                    .commitments()
                    .iter()
                    .enumerate()
                    .map(|(idx, commitment)| AgendaEntry {
                        position: idx + 1,
                        source: commitment.source,
                        block: commitment.block,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn free(&mut self, user: UserId, position: usize) -> Result<TimeBlock, ScheduleError> {
        let member = self
            .users
            .get_mut(&user)
            .ok_or(ScheduleError::NoSuchCommitment(position))?;
        let block = member.free(position)?;
        info!(user_id = %user, position, "busy block removed");
        Ok(block)
    }
}

fn parse_block(
    start_text: &str,
    end_text: &str,
    now: NaiveDateTime,
) -> Result<TimeBlock, ScheduleError> {
    let start = parse_time(start_text, now)?;
    let end = parse_time(end_text, now)?;
    if start >= end {
        return Err(ScheduleError::Ordering);
    }
    TimeBlock::new(start, end)
}
