// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod command;
pub mod error;
pub mod hal_traits;
pub mod record;
pub mod response;
pub mod timestamp;
pub mod timing;

// --- Re-export key types/traits/functions for easier access ---

// From command.rs
pub use command::{Command, CommandFormatError, CommandKind, StartTime};

// From error.rs
pub use error::Dt80Error;

// From hal_traits.rs
pub use hal_traits::{Dt80Serial, Dt80Timer};

// From record.rs
pub use record::{JobDescriptor, MeasurementRecord};

// From response/mod.rs (and its sub-modules via its own `pub use`)
pub use response::{classify, extract_jobs, extract_measurements, LineClass};

// From timestamp.rs
pub use timestamp::{is_valid_timestamp, Timestamp, TimestampParseError};

// From timing.rs (constants - users can access via common::timing::*)
// No re-exports by default.
