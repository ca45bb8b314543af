//! In-memory log of computed runs for side-by-side comparison.

use chrono::{DateTime, Local};

use crate::engine::TrajectoryRun;

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// 1-based position in the history.
    pub index: usize,
    pub recorded_at: DateTime<Local>,
    pub run: TrajectoryRun,
}

impl HistoryEntry {
    /// Wall-clock time of recording as `HH:MM:SS`.
    pub fn timestamp(&self) -> String {
        self.recorded_at.format("%H:%M:%S").to_string()
    }

    /// Short legend label, e.g. `#2: v0=100, angle=30°`.
    pub fn label(&self) -> String {
        format!(
            "#{}: v0={}, angle={}°",
            self.index, self.run.parameters.v0_m_s, self.run.parameters.angle_deg
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunHistory {
    entries: Vec<HistoryEntry>,
}

impl RunHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a run stamped with the current local time.
    pub fn record(&mut self, run: TrajectoryRun) -> &HistoryEntry {
        self.record_at(run, Local::now())
    }

    pub fn record_at(&mut self, run: TrajectoryRun, recorded_at: DateTime<Local>) -> &HistoryEntry {
        let index = self.entries.len() + 1;
        self.entries.push(HistoryEntry {
            index,
            recorded_at,
            run,
        });
        &self.entries[index - 1]
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        index.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a> IntoIterator for &'a RunHistory {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
