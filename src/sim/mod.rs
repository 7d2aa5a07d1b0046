pub mod state;

pub use state::{advance_our_move, advance_with_opponent};
