mod driver;

pub use driver::{AnimationDriver, AnimationState, DriverSettings, TickOutcome};
