pub mod clock;
pub mod resync;

mod rest;
mod session;

pub use rest::{RestTimer, REST_COMPLETE_BODY, REST_COMPLETE_TITLE};
pub use session::SessionClock;
