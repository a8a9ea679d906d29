use serenity::model::id::UserId;

use crate::errors::ScheduleError;
use crate::models::meeting::MeetingId;
use crate::models::time_block::TimeBlock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitmentSource {
    Meeting(MeetingId),
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commitment {
    pub source: CommitmentSource,
    pub block: TimeBlock,
}

/// A Discord user's busy calendar.
#[derive(Debug, Clone)]
pub struct MeetingUser {
    id: UserId,
    display_name: String,
    commitments: Vec<Commitment>,
}

impl MeetingUser {
    pub fn new(id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            commitments: Vec::new(),
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn set_display_name(&mut self, name: &str) {
        if self.display_name != name {
            self.display_name = name.to_string();
        }
    }

    pub fn commitments(&self) -> &[Commitment] {
        &self.commitments
    }

    pub fn conflicts_with(&self, block: &TimeBlock) -> bool {
        self.commitments.iter().any(|c| c.block.overlaps(block))
    }

    /// No overlap check; only meeting registration enforces that.
    pub fn mark_busy(&mut self, block: TimeBlock) {
        self.commitments.push(Commitment {
            source: CommitmentSource::Busy,
            block,
        });
    }

    /// Removes a manual busy mark by its 1-based position in `commitments()`.
    pub fn free(&mut self, position: usize) -> Result<TimeBlock, ScheduleError> {
        let index = position
            .checked_sub(1)
            .filter(|idx| {
                self.commitments
                    .get(*idx)
                    .is_some_and(|c| c.source == CommitmentSource::Busy)
            })
            .ok_or(ScheduleError::NoSuchCommitment(position))?;
        Ok(self.commitments.remove(index).block)
    }

    pub(crate) fn attach_meeting(&mut self, meeting: MeetingId, block: TimeBlock) {
        self.commitments.push(Commitment {
            source: CommitmentSource::Meeting(meeting),
            block,
        });
    }

    pub(crate) fn detach_meeting(&mut self, meeting: MeetingId) -> bool {
        let source = CommitmentSource::Meeting(meeting);
        match self.commitments.iter().position(|c| c.source == source) {
            Some(idx) => {
                self.commitments.remove(idx);
                true
            }
            None => false,
        }
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
    fn busy_marks_may_overlap_each_other() {
        let mut user = MeetingUser::new(UserId::new(1), "ana");
        user.mark_busy(block(9, 12));
        user.mark_busy(block(10, 11));
        assert_eq!(user.commitments().len(), 2);
        assert!(user.conflicts_with(&block(11, 13)));
        assert!(!user.conflicts_with(&block(13, 14)));
    }

    #[test]
    fn free_only_removes_busy_marks() {
        let mut user = MeetingUser::new(UserId::new(1), "ana");
        user.attach_meeting(7, block(9, 10));
        user.mark_busy(block(13, 14));

        assert_eq!(user.free(1), Err(ScheduleError::NoSuchCommitment(1)));
        assert_eq!(user.free(0), Err(ScheduleError::NoSuchCommitment(0)));
        assert_eq!(user.free(3), Err(ScheduleError::NoSuchCommitment(3)));
        assert_eq!(user.free(2), Ok(block(13, 14)));
        assert_eq!(user.commitments().len(), 1);
        assert_eq!(user.commitments()[0].source, CommitmentSource::Meeting(7));
    }

    #[test]
    fn detach_leaves_equal_blocks_from_other_sources() {
        let mut user = MeetingUser::new(UserId::new(1), "ana");
        user.mark_busy(block(9, 10));
        user.attach_meeting(3, block(9, 10));

        assert!(user.detach_meeting(3));
        assert!(!user.detach_meeting(3));
        assert_eq!(user.commitments().len(), 1);
        assert_eq!(user.commitments()[0].source, CommitmentSource::Busy);
    }
}
