pub mod history;
mod pump;
mod state;

pub use history::HistoryRing;
pub use state::Session;
