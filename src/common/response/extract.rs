// src/common/response/extract.rs

use alloc::string::ToString;
use alloc::vec::Vec;

use super::{classify, LineClass};
use crate::common::command::CommandKind;
use crate::common::record::{JobDescriptor, MeasurementRecord};

/// The CSV column forwarded to the radio by default (the first logged
/// channel after timestamp and timezone).
pub const DEFAULT_CHANNEL: usize = 2;

/// Extracts job descriptors from the drained lines of a `listd` response.
///
/// Each surviving data row contributes its last whitespace-delimited token,
/// the job's storage path. Scaffolding and tokenless lines are skipped
/// silently.
pub fn extract_jobs<'a, I>(lines: I) -> Vec<JobDescriptor>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .filter_map(|line| match classify(CommandKind::ListJobs, line) {
            LineClass::Data(row) => row.split_whitespace().last().map(|path| JobDescriptor {
                path: path.to_string(),
            }),
            LineClass::Scaffolding | LineClass::Unrecognized => None,
        })
        .collect()
}

/// Extracts measurement records from the drained lines of a `copyd`
/// response.
///
/// `channel` selects the forwarded CSV column ([`DEFAULT_CHANNEL`] in the
/// standard deployment). A row whose first field is not a valid record
/// timestamp — the CSV header has exactly this shape — is dropped rather
/// than reported, as is a row too short to hold the channel. So is a row
/// whose timestamp matches the grammar but overflows the typed field
/// widths (a five-digit year, a three-digit month); the device cannot
/// emit one, and a record it can't represent is not worth forwarding.
pub fn extract_measurements<'a, I>(lines: I, channel: usize) -> Vec<MeasurementRecord>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .filter_map(|line| match classify(CommandKind::CopyData, line) {
            LineClass::Data(row) => {
                let mut fields = row.split(',');
                let timestamp = fields.next()?.parse().ok()?;
                let value = row.split(',').nth(channel)?;
                Some(MeasurementRecord {
                    timestamp,
                    value: value.to_string(),
                })
            }
            LineClass::Scaffolding | LineClass::Unrecognized => None,
        })
        .collect()
}
