use std::collections::BTreeMap;

use serde::Serialize;

use super::slug_enum;
use crate::sequencing::StepPattern;

slug_enum! {
    /// Named drum lanes. A lane is mapped onto a concrete drum voice at
    /// render time.
    pub enum DrumChannel ("drum channel") {
        Kick => "kick",
        Snare => "snare",
        Hihat => "hihat",
        Kick808 => "kick808",
        Perc => "perc",
    }
}

/// Channel name → step grid, ordered by channel.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct DrumPattern(BTreeMap<DrumChannel, StepPattern>);

impl DrumPattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, channel: DrumChannel, pattern: StepPattern) {
        self.0.insert(channel, pattern);
    }

    pub fn get(&self, channel: DrumChannel) -> Option<&StepPattern> {
        self.0.get(&channel)
    }

    pub fn get_mut(&mut self, channel: DrumChannel) -> Option<&mut StepPattern> {
        self.0.get_mut(&channel)
    }

    pub fn channels(&self) -> impl Iterator<Item = (DrumChannel, &StepPattern)> {
        self.0.iter().map(|(c, p)| (*c, p))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Longest lane; the drum loop repeats every this many steps.
    pub fn steps(&self) -> usize {
        self.0.values().map(StepPattern::len).max().unwrap_or(0)
    }
}
