use std::collections::BTreeMap;

use tracing::info;

use crate::errors::KanbanError;
use crate::models::ticket::{Ticket, TicketId, TicketStatus};

#[derive(Debug)]
pub struct KanbanBoard {
    tickets: BTreeMap<TicketId, Ticket>,
    next_ticket_id: TicketId,
}

impl Default for KanbanBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl KanbanBoard {
    pub fn new() -> Self {
        Self {
            tickets: BTreeMap::new(),
            next_ticket_id: 1,
        }
    }

    pub fn add(&mut self, name: &str, description: &str) -> TicketId {
        let id = self.next_ticket_id;
        self.next_ticket_id += 1;
        self.tickets.insert(id, Ticket::new(id, name, description));
        info!(ticket_id = id, name, "ticket added");
        id
    }

    pub fn remove(&mut self, id: TicketId) -> Result<Ticket, KanbanError> {
        let ticket = self.tickets.remove(&id).ok_or(KanbanError::NotFound(id))?;
        info!(ticket_id = id, "ticket removed");
        Ok(ticket)
    }

    pub fn assign(&mut self, id: TicketId, assignee: &str) -> Result<&Ticket, KanbanError> {
        let ticket = self.tickets.get_mut(&id).ok_or(KanbanError::NotFound(id))?;
        ticket.assignee = Some(assignee.to_string());
        info!(ticket_id = id, assignee, "ticket assigned");
        Ok(ticket)
    }

    pub fn move_to(&mut self, id: TicketId, status: TicketStatus) -> Result<&Ticket, KanbanError> {
        let ticket = self.tickets.get_mut(&id).ok_or(KanbanError::NotFound(id))?;
        ticket.status = status;
        info!(ticket_id = id, status = status.label(), "ticket moved");
        Ok(ticket)
    }

    pub fn get(&self, id: TicketId) -> Result<&Ticket, KanbanError> {
        self.tickets.get(&id).ok_or(KanbanError::NotFound(id))
    }

    /// Tickets in id order.
    pub fn list(&self) -> Vec<&Ticket> {
        self.tickets.values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_never_reused_after_removal() {
        let mut board = KanbanBoard::new();
        let first = board.add("a", "first");
        let second = board.add("b", "second");
        board.remove(second).unwrap();
        let third = board.add("c", "third");
        assert_eq!((first, second, third), (1, 2, 3));
        let ids: Vec<_> = board.list().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn assign_and_move_update_ticket() {
        let mut board = KanbanBoard::new();
        let id = board.add("Login", "Fix login flow");
        board.assign(id, "ana").unwrap();
        board.move_to(id, TicketStatus::InReview).unwrap();

        let ticket = board.get(id).unwrap();
        assert_eq!(ticket.assignee_label(), "ana");
        assert_eq!(ticket.status, TicketStatus::InReview);
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut board = KanbanBoard::new();
        assert_eq!(board.remove(9).unwrap_err(), KanbanError::NotFound(9));
        assert_eq!(board.assign(9, "x").unwrap_err(), KanbanError::NotFound(9));
        assert_eq!(
            board.move_to(9, TicketStatus::Done).unwrap_err(),
            KanbanError::NotFound(9)
        );
        assert_eq!(board.get(9).unwrap_err(), KanbanError::NotFound(9));
    }
}
