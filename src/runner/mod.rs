pub mod executor;
pub mod reporter;
pub mod types;

pub use executor::TestRunner;
pub use reporter::TestReporter;
pub use types::{
    ItemUpdate, RunEvent, RunSummary, RunnerState, TestItem, TestState, create_event_channel,
};
