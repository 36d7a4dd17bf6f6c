// src/common/record.rs

use alloc::string::String;

use super::timestamp::Timestamp;

/// One configured acquisition job, as reported by `listd`.
///
/// The device reports a table of job metadata; only the storage path in the
/// final column is meaningful to this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDescriptor {
    /// The job's storage path, e.g. `B:\JOBS\CONFIG\A\DATA_A.DBD`.
    pub path: String,
}

/// One archived measurement, as extracted from a `copyd` data row.
///
/// The measurement is kept as the device's decimal text; it is only
/// interpreted numerically when packed for the radio uplink, which is where
/// a malformed value (`OverRange`, `NotYetSet`) surfaces as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementRecord {
    pub timestamp: Timestamp,
    /// Decimal text of the forwarded channel, e.g. `22.703516`.
    pub value: String,
}
