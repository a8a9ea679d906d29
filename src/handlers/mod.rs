pub mod commands;
pub mod console;
pub mod discord;
pub mod discord_responder;
pub mod invocation;
pub mod kanban;
pub mod meeting;
pub mod ping;
pub mod reply;
pub mod rsvp;
pub mod state;
