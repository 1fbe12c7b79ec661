//! Core business logic for `ChamaLedger`.
//!
//! Everything in here is presentation-agnostic: UI collaborators call these
//! operations with an explicit [`session::Session`] and display the results.
//! The engines (`ledger`, `loan`, `disbursement`, the lifecycle half of
//! `member`) are pure derivations over the entity collections; only the
//! recording operations mutate state, and each one is all-or-nothing.

pub mod disbursement;
pub mod executive;
pub mod expense;
pub mod ledger;
pub mod loan;
pub mod member;
pub mod report;
pub mod session;
pub mod transaction;
