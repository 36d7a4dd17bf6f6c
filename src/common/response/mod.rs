// src/common/response/mod.rs

//! Response line classification.
//!
//! The DT80 frames nothing beyond newlines: a response is a run of lines
//! containing protocol scaffolding (echoes, table headers, prompts,
//! sentinels) interleaved with data rows. Classification is by shape, never
//! by position — the device may split or batch lines arbitrarily across
//! reads, and extra blank lines or a retransmitted prompt must not
//! desynchronize the parse.

pub mod extract;

pub use extract::{extract_jobs, extract_measurements, DEFAULT_CHANNEL};

use super::command::CommandKind;
use super::timestamp::is_valid_timestamp;

/// The classification of one response line.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum LineClass<'a> {
    /// A data row, trimmed of surrounding whitespace.
    Data(&'a str),
    /// A known protocol-scaffolding line (echo, header, separator, prompt,
    /// sentinel, blank).
    Scaffolding,
    /// A line matching neither the data-row grammar nor a known scaffolding
    /// shape. Dropped, like scaffolding, but distinguishable to callers.
    Unrecognized,
}

/// Classifies one line of the response to a command of the given kind.
pub fn classify(kind: CommandKind, line: &str) -> LineClass<'_> {
    match kind {
        CommandKind::ListJobs => classify_listd(line),
        CommandKind::CopyData => classify_copyd(line),
    }
}

fn classify_listd(line: &str) -> LineClass<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineClass::Scaffolding;
    }
    // Echoed command line.
    if trimmed == "listd" {
        return LineClass::Scaffolding;
    }
    // Device prompt, possibly retransmitted.
    if trimmed == "DT80>" {
        return LineClass::Scaffolding;
    }

    let mut tokens = trimmed.split_whitespace();
    let first = tokens.next();
    // Column-name row of the job table.
    if first == Some("Job") && tokens.next() == Some("Sch") {
        return LineClass::Scaffolding;
    }
    // Separator row, a run of '=' groups.
    if first.is_some_and(|t| t.bytes().all(|b| b == b'=')) {
        return LineClass::Scaffolding;
    }

    LineClass::Data(trimmed)
}

fn classify_copyd(line: &str) -> LineClass<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineClass::Scaffolding;
    }
    if trimmed == "Unload complete." {
        return LineClass::Scaffolding;
    }

    // A data row starts with a record timestamp in its first CSV field. The
    // quoted header row fails this check; that is the only thing that
    // filters it, not a count of lines.
    match trimmed.split(',').next() {
        Some(first) if is_valid_timestamp(first) => LineClass::Data(trimmed),
        _ => LineClass::Unrecognized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listd_scaffolding() {
        let kind = CommandKind::ListJobs;
        assert_eq!(classify(kind, "listd\r"), LineClass::Scaffolding);
        assert_eq!(
            classify(
                kind,
                " Job      Sch Type       Ov Lg Go  Recs      Capacity  First"
            ),
            LineClass::Scaffolding
        );
        assert_eq!(
            classify(kind, " ======== === ========== == == ==  ========"),
            LineClass::Scaffolding
        );
        assert_eq!(classify(kind, "DT80>"), LineClass::Scaffolding);
        assert_eq!(classify(kind, "   "), LineClass::Scaffolding);
    }

    #[test]
    fn test_listd_data_row() {
        let row = r"*CONFIG   A   Data  Live Y  Y  Y       2380    249660  2018-08-09 10:30:00  2018-09-04 17:20:00  B:\JOBS\CONFIG\A\DATA_A.DBD";
        assert_eq!(
            classify(CommandKind::ListJobs, row),
            LineClass::Data(row.trim())
        );
    }

    #[test]
    fn test_copyd_header_is_unrecognized() {
        let header = r#"DT80> "Timestamp","TZ","T3 TC_1B (degC)","T3 TC_1P (degC)""#;
        assert_eq!(
            classify(CommandKind::CopyData, header),
            LineClass::Unrecognized
        );
    }

    #[test]
    fn test_copyd_sentinel_and_blank() {
        let kind = CommandKind::CopyData;
        assert_eq!(classify(kind, "Unload complete."), LineClass::Scaffolding);
        assert_eq!(classify(kind, ""), LineClass::Scaffolding);
    }

    #[test]
    fn test_copyd_data_row() {
        let row = "2018/09/04 16:40:00.000,n,22.703516,OverRange";
        assert_eq!(classify(CommandKind::CopyData, row), LineClass::Data(row));
    }
}
