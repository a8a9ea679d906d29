pub mod kanban;
pub mod registry;
pub mod time_parser;
