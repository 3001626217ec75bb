//! The four dataset containers and their file I/O.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::GenResult;
use crate::npy::{self, ArrayKind};
use crate::state::{BlochRecord, Draw, Label, StateRecord};

/// Labeled and unlabeled samples in both representations.
///
/// Entry `i` of `labeled_states` and entry `i` of `labeled_bloch` come from
/// the same draw; likewise for the unlabeled pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub labeled_states: Vec<StateRecord>,
    pub labeled_bloch: Vec<BlochRecord>,
    pub unlabeled_states: Vec<StateRecord>,
    pub unlabeled_bloch: Vec<BlochRecord>,
}

impl Dataset {
    /// Empty dataset with room for `labeled` and `unlabeled` entries.
    pub fn with_capacity(labeled: usize, unlabeled: usize) -> Self {
        Self {
            labeled_states: Vec::with_capacity(labeled),
            labeled_bloch: Vec::with_capacity(labeled),
            unlabeled_states: Vec::with_capacity(unlabeled),
            unlabeled_bloch: Vec::with_capacity(unlabeled),
        }
    }

    /// Append a draw to the labeled or unlabeled pair, depending on its label.
    pub fn push(&mut self, draw: &Draw) {
        if draw.label.is_some() {
            self.labeled_states.push(draw.state_record());
            self.labeled_bloch.push(draw.bloch_record());
        } else {
            self.unlabeled_states.push(draw.state_record());
            self.unlabeled_bloch.push(draw.bloch_record());
        }
    }

    /// Lengths of the four containers in file order.
    pub fn lengths(&self) -> [usize; 4] {
        [
            self.labeled_states.len(),
            self.labeled_bloch.len(),
            self.unlabeled_states.len(),
            self.unlabeled_bloch.len(),
        ]
    }

    /// Write the four arrays to `writer` in file order.
    ///
    /// Returns the number of bytes written.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> GenResult<usize> {
        let mut total = 0;
        for kind in ArrayKind::ORDER {
            total += match kind {
                ArrayKind::LabeledStates => npy::write_states(writer, kind, &self.labeled_states)?,
                ArrayKind::LabeledBloch => npy::write_bloch(writer, kind, &self.labeled_bloch)?,
                ArrayKind::UnlabeledStates => {
                    npy::write_states(writer, kind, &self.unlabeled_states)?
                }
                ArrayKind::UnlabeledBloch => npy::write_bloch(writer, kind, &self.unlabeled_bloch)?,
            };
        }
        Ok(total)
    }

    /// Save to `path`, replacing any existing file.
    ///
    /// The file handle is released when this returns, on success or error.
    /// A failed write leaves a partial file behind; regenerate to recover.
    pub fn save(&self, path: impl AsRef<Path>) -> GenResult<usize> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        let bytes = self.write_to(&mut writer)?;
        writer.flush()?;
        info!(path = %path.display(), bytes, "dataset saved");
        Ok(bytes)
    }

    /// Read four arrays from `reader` in file order.
    pub fn read_from<R: Read>(reader: &mut R) -> GenResult<Self> {
        let dataset = Self {
            labeled_states: npy::read_states(reader, ArrayKind::LabeledStates)?,
            labeled_bloch: npy::read_bloch(reader, ArrayKind::LabeledBloch)?,
            unlabeled_states: npy::read_states(reader, ArrayKind::UnlabeledStates)?,
            unlabeled_bloch: npy::read_bloch(reader, ArrayKind::UnlabeledBloch)?,
        };
        debug!(lengths = ?dataset.lengths(), "dataset read");
        Ok(dataset)
    }

    /// Load a dataset file written by [`Dataset::save`] or by four
    /// consecutive `numpy.save` calls with the same layouts.
    pub fn load(path: impl AsRef<Path>) -> GenResult<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::read_from(&mut reader)
    }

    /// Descriptive statistics of the containers.
    pub fn summary(&self) -> DatasetSummary {
        let count = |label: Label| {
            self.labeled_states
                .iter()
                .filter(|r| r.label == Some(label))
                .count()
        };
        DatasetSummary {
            lengths: self.lengths(),
            label_zero: count(Label::Zero),
            label_one: count(Label::One),
            mean_polar_labeled: mean_polar(&self.labeled_states),
            mean_polar_unlabeled: mean_polar(&self.unlabeled_states),
        }
    }
}

fn mean_polar(records: &[StateRecord]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let sum: f64 = records.iter().map(|r| r.amplitudes.polar_angle()).sum();
    Some(sum / records.len() as f64)
}

/// Counts and mean polar angles of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Container lengths in file order.
    pub lengths: [usize; 4],
    pub label_zero: usize,
    pub label_one: usize,
    /// Mean of |θ| over labeled states; `None` when empty.
    pub mean_polar_labeled: Option<f64>,
    /// Mean of θ over unlabeled states; `None` when empty.
    pub mean_polar_unlabeled: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Angles;

    fn labeled(theta: f64, label: Label) -> Draw {
        Draw {
            angles: Angles::new(theta, 0.5),
            label: Some(label),
        }
    }

    #[test]
    fn test_push_routes_by_label() {
        let mut ds = Dataset::default();
        ds.push(&labeled(0.1, Label::Zero));
        ds.push(&Draw {
            angles: Angles::new(0.7, 1.0),
            label: None,
        });
        ds.push(&labeled(1.6, Label::One));
        assert_eq!(ds.lengths(), [2, 2, 1, 1]);
        assert_eq!(ds.labeled_bloch[1].label, Some(Label::One));
        assert_eq!(ds.unlabeled_states[0].label, None);
    }

    #[test]
    fn test_summary_counts() {
        let mut ds = Dataset::default();
        for draw in [
            labeled(0.0, Label::Zero),
            labeled(1.6, Label::One),
            labeled(1.7, Label::One),
        ] {
            ds.push(&draw);
        }
        let summary = ds.summary();
        assert_eq!(summary.label_zero, 1);
        assert_eq!(summary.label_one, 2);
        let mean = summary.mean_polar_labeled.unwrap();
        assert!((mean - (0.0 + 1.6 + 1.7) / 3.0).abs() < 1e-12);
        assert_eq!(summary.mean_polar_unlabeled, None);
    }

    #[test]
    fn test_empty_dataset_roundtrip() {
        let ds = Dataset::default();
        let mut buf = Vec::new();
        let bytes = ds.write_to(&mut buf).unwrap();
        assert_eq!(bytes, buf.len());
        let back = Dataset::read_from(&mut buf.as_slice()).unwrap();
        assert_eq!(back.lengths(), [0, 0, 0, 0]);
    }

    #[test]
    fn test_summary_serializes() {
        let json = serde_json::to_string(&Dataset::default().summary()).unwrap();
        assert!(json.contains("\"lengths\":[0,0,0,0]"));
    }
}
