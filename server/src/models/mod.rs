pub mod ticket;

pub use ticket::{PayloadParseError, TicketDetails, TicketRecord, TicketSummary};
