pub mod session;

pub use session::{SessionError, SessionFrame, SimulationSession};
