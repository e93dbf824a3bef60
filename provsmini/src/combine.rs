//! Combining single-preset files into a bulk frame
//!
//! Every candidate file goes through [`classify()`](crate::frame::classify) on its own. Valid
//! presets are added to a [`BulkFrame`] in the order they arrive, until all slots are taken.
//! Nothing here logs or prints; instead every input gets an [`Entry`] in the [`Report`],
//! which the caller can present however it likes.

use crate::{
    bulk::{BulkFrame, Slot},
    frame::{Classification, MalformedFrameError, RawFrame},
    name::PresetName,
};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Combine a set of candidate files in one go
///
/// ```
/// # use provsmini::{combine::{combine, CombineError}, frame::RawFrame};
/// let error = combine(Vec::<RawFrame>::new()).unwrap_err();
/// assert!(matches!(error, CombineError::NoMatchingFiles));
/// ```
pub fn combine<I>(frames: I) -> Result<Combination, CombineError>
where
    I: IntoIterator<Item = RawFrame>,
{
    let mut combiner = Combiner::new();
    for frame in frames {
        combiner.push(&frame);
    }

    combiner.finish()
}

/// Incrementally combines candidate files into a [`BulkFrame`]
///
/// Use this over [`combine()`] to act on the [`Outcome`] of each file as it is processed.
#[derive(Debug, Default)]
pub struct Combiner {
    bulk: BulkFrame,
    report: Report,
}

impl Combiner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a candidate and add it to the bulk frame if it is a preset with a free slot
    pub fn push(&mut self, frame: &RawFrame) -> &Entry {
        let outcome = match frame.classify() {
            Classification::AlreadyCombined => Outcome::AlreadyCombined,
            Classification::Malformed(err) => Outcome::Malformed(err),
            Classification::Preset(preset) => match self.bulk.insert(preset.payload) {
                Ok(slot) => Outcome::Added {
                    slot,
                    name: preset.name,
                },
                Err(_) => Outcome::SlotLimitExceeded { name: preset.name },
            },
        };

        self.report.entries.push(Entry {
            source: frame.source.clone(),
            outcome,
        });

        // Just pushed, so there is a last entry
        &self.report.entries[self.report.entries.len() - 1]
    }

    /// The bulk frame as it stands
    pub fn bulk(&self) -> &BulkFrame {
        &self.bulk
    }

    /// Wrap up, failing if there was nothing (valid) to combine
    pub fn finish(self) -> Result<Combination, CombineError> {
        if self.report.entries.is_empty() {
            return Err(CombineError::NoMatchingFiles);
        }

        if self.bulk.is_empty() {
            return Err(CombineError::NoValidPresetFrames {
                report: self.report,
            });
        }

        Ok(Combination {
            bulk: self.bulk,
            report: self.report,
        })
    }
}

/// The result of a successful combine
#[derive(Debug)]
pub struct Combination {
    /// The frame to write out
    pub bulk: BulkFrame,

    /// What happened to every input
    pub report: Report,
}

/// What happened to each candidate file, in the order they were processed
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    entries: Vec<Entry>,
}

impl Report {
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The number of presets that made it into the bulk frame
    pub fn added_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.outcome.is_added())
            .count()
    }

    /// The number of files that were left out, for whatever reason
    pub fn skipped_count(&self) -> usize {
        self.entries.len() - self.added_count()
    }
}

/// A single candidate file and its [`Outcome`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    source: PathBuf,
    outcome: Outcome,
}

impl Entry {
    /// Where the candidate was read from
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }
}

/// What happened to a candidate file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The preset was placed in a slot
    Added {
        slot: Slot,
        name: Option<PresetName>,
    },

    /// The file is a bulk frame itself and was skipped
    AlreadyCombined,

    /// The file is not a single-preset frame and was skipped
    Malformed(MalformedFrameError),

    /// The preset was valid, but all slots were taken already
    SlotLimitExceeded { name: Option<PresetName> },
}

impl Outcome {
    pub fn is_added(&self) -> bool {
        matches!(self, Outcome::Added { .. })
    }

    /// The preset name, for outcomes that concern a valid preset
    pub fn name(&self) -> Option<&PresetName> {
        match self {
            Outcome::Added { name, .. } | Outcome::SlotLimitExceeded { name } => name.as_ref(),
            Outcome::AlreadyCombined | Outcome::Malformed(_) => None,
        }
    }
}

/// Errors that end a combine without output
#[derive(Debug, Error)]
pub enum CombineError {
    /// There were no candidate files at all
    #[error("No matching files found")]
    NoMatchingFiles,

    /// Every candidate was skipped
    ///
    /// The report tells why each of them was skipped.
    #[error("None of the {} files is a valid preset", .report.entries().len())]
    NoValidPresetFrames { report: Report },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{COMBINED_PREAMBLE, Payload, TERMINATOR, frame_bytes, preset_bytes};
    use std::str::FromStr;

    fn preset(path: &str, fill: u8, name: &str) -> RawFrame {
        RawFrame::new(path, preset_bytes(fill, name.as_bytes()))
    }

    fn name(name: &str) -> Option<PresetName> {
        Some(PresetName::from_str(name).unwrap())
    }

    #[test]
    fn two_presets() {
        let frames = vec![
            RawFrame::new("a.syx", frame_bytes(&[0x01; Payload::LEN])),
            RawFrame::new("b.syx", frame_bytes(&[0x02; Payload::LEN])),
        ];

        let combination = combine(frames).unwrap();
        let bytes = combination.bulk.to_bytes();

        let mut expected = COMBINED_PREAMBLE.to_vec();
        expected.extend_from_slice(&[0x01; 64]);
        expected.extend_from_slice(&[0x02; 64]);
        expected.extend_from_slice(&[0x40, TERMINATOR]);
        assert_eq!(bytes, expected);

        assert_eq!(combination.report.added_count(), 2);
        assert_eq!(combination.report.skipped_count(), 0);
    }

    #[test]
    fn keeps_arrival_order() {
        let frames = vec![
            preset("c.syx", 0x03, "THIRD"),
            preset("a.syx", 0x01, "FIRST"),
            preset("b.syx", 0x02, "SECOND"),
        ];

        let combination = combine(frames).unwrap();
        let names: Vec<_> = combination
            .bulk
            .payloads()
            .iter()
            .map(|payload| payload.name().unwrap().as_str().to_owned())
            .collect();

        assert_eq!(names, ["THIRD", "FIRST", "SECOND"]);

        let sources: Vec<_> = combination
            .report
            .entries()
            .iter()
            .map(|entry| entry.source().to_owned())
            .collect();
        assert_eq!(
            sources,
            [
                PathBuf::from("c.syx"),
                PathBuf::from("a.syx"),
                PathBuf::from("b.syx")
            ]
        );
    }

    #[test]
    fn skips_combined_and_malformed() {
        let mut combined = COMBINED_PREAMBLE.to_vec();
        combined.extend_from_slice(&[0x00, TERMINATOR]);

        let mut short = preset_bytes(0x01, b"SHORT");
        short.remove(10);

        let frames = vec![
            RawFrame::new("combined.syx", combined),
            RawFrame::new("short.syx", short),
            preset("ok.syx", 0x01, "OK"),
        ];

        let combination = combine(frames).unwrap();
        let outcomes: Vec<_> = combination
            .report
            .entries()
            .iter()
            .map(|entry| entry.outcome().clone())
            .collect();

        assert_eq!(
            outcomes,
            [
                Outcome::AlreadyCombined,
                Outcome::Malformed(MalformedFrameError::WrongLength { len: 74 }),
                Outcome::Added {
                    slot: Slot::new(0),
                    name: name("OK"),
                },
            ]
        );
        assert_eq!(combination.bulk.len(), 1);
        assert_eq!(combination.report.skipped_count(), 2);
    }

    #[test]
    fn exactly_32() {
        let frames = (0..32).map(|index| preset(&format!("{index}.syx"), index, "P"));

        let combination = combine(frames).unwrap();
        assert_eq!(combination.bulk.len(), 32);
        assert_eq!(combination.report.skipped_count(), 0);
        assert_eq!(combination.bulk.to_bytes().len(), 8 + 64 * 32 + 2);
    }

    #[test]
    fn slot_limit() {
        let frames = (0..33).map(|index| preset(&format!("{index}.syx"), index, "OVER"));

        let combination = combine(frames).unwrap();
        assert_eq!(combination.bulk.len(), 32);
        assert_eq!(
            combination.report.entries()[32].outcome(),
            &Outcome::SlotLimitExceeded { name: name("OVER") }
        );
        assert_eq!(combination.bulk.to_bytes().len(), 8 + 64 * 32 + 2);

        // The 33rd preset's payload is nowhere in the output
        assert!(
            combination
                .bulk
                .payloads()
                .iter()
                .all(|payload| payload.as_slice()[0] != 32)
        );
    }

    #[test]
    fn no_matching_files() {
        assert!(matches!(
            combine(Vec::<RawFrame>::new()),
            Err(CombineError::NoMatchingFiles)
        ));
    }

    #[test]
    fn no_valid_presets() {
        let frames = vec![
            RawFrame::new("empty.syx", Vec::new()),
            RawFrame::new("combined.syx", COMBINED_PREAMBLE.to_vec()),
        ];

        match combine(frames) {
            Err(CombineError::NoValidPresetFrames { report }) => {
                assert_eq!(report.entries().len(), 2);
                assert_eq!(report.added_count(), 0);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn push_reports_each_entry() {
        let mut combiner = Combiner::new();

        let entry = combiner.push(&preset("one.syx", 0x01, "ONE"));
        assert_eq!(entry.outcome().name(), name("ONE").as_ref());
        assert!(entry.outcome().is_added());

        let entry = combiner.push(&RawFrame::new("junk.syx", vec![0xF0]));
        assert_eq!(entry.outcome().name(), None);
        assert_eq!(combiner.bulk().len(), 1);
    }
}
