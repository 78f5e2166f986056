//! `ledgerflow-core`: canonical transaction model and the shared helpers
//! every format parser relies on.
//!
//! Pure crate: no file IO, no logging.

pub mod amount;
pub mod category;
pub mod ident;
pub mod model;
pub mod text;

pub use amount::{clean_amount, parse_amount, parse_plain_amount};
pub use category::{infer_category, Category, CategoryRule, INTERNAL_TRANSFER};
pub use ident::transaction_id;
pub use model::{Direction, Transaction};
