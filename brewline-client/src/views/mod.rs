//! View models
//!
//! Each view takes the shared [`Session`](crate::session::Session) and the
//! API traits it needs, so it can run against the HTTP facades or in-memory
//! fakes. Fetches are sequenced: a response is applied only if no newer
//! request was issued since.

pub mod attendance;
pub mod daily_summary;
pub mod expenses;
pub mod order_board;
pub mod photo_gallery;
pub mod sequencer;

pub use attendance::AttendanceView;
pub use daily_summary::DailySummaryView;
pub use expenses::ExpensesView;
pub use order_board::{KitchenTicket, OrderBoard};
pub use photo_gallery::PhotoGallery;
pub use sequencer::{RequestSequencer, Ticket};
