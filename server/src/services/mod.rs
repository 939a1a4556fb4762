pub mod qr;
pub mod tickets;

pub use qr::{EncodingError, PngQrEncoder, QrEncoder, QrSettings};
pub use tickets::{
    InvalidReason, IssuanceError, LookupError, NewTicket, TicketLookup, TicketService,
    ValidationResult,
};
