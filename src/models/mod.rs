pub mod meeting;
pub mod meeting_user;
pub mod ticket;
pub mod time_block;
