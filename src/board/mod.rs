//! Project board: ordered status columns, the calendar projection of the same
//! projects, and the reconciler that keeps both in step with the store.

pub mod calendar;
pub mod position;
pub mod reconciler;
pub mod store;
pub mod view;

pub use reconciler::{BoardChange, PendingChange, Phase, Reconciler};
pub use store::{ProjectStore, create_with_unique_title};
pub use view::{Board, BoardColumn};
