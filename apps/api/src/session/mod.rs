// Session Store: per-session selected path and one result slot per path.
// State lives in memory only and ends with the session.

pub mod state;
pub mod store;
