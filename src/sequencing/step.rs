use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::ParseError;

/// Fixed-length on/off step grid, written `x` for a hit and `.` for a rest.
///
/// ```ignore
/// let kick: StepPattern = "x...x...".parse()?;
/// assert_eq!(kick.hits().collect::<Vec<_>>(), vec![0, 4]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StepPattern {
    steps: Vec<bool>,
}

impl StepPattern {
    pub fn silent(len: usize) -> Self {
        Self {
            steps: vec![false; len],
        }
    }

    pub fn from_steps(steps: Vec<bool>) -> Self {
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Hit at `step`, wrapping around the pattern length.
    pub fn is_hit(&self, step: usize) -> bool {
        !self.steps.is_empty() && self.steps[step % self.steps.len()]
    }

    pub fn set(&mut self, step: usize, hit: bool) {
        if let Some(slot) = self.steps.get_mut(step) {
            *slot = hit;
        }
    }

    pub fn toggle(&mut self, step: usize) {
        if let Some(slot) = self.steps.get_mut(step) {
            *slot = !*slot;
        }
    }

    /// Indices of every hit.
    pub fn hits(&self) -> impl Iterator<Item = usize> + '_ {
        self.steps
            .iter()
            .enumerate()
            .filter(|(_, hit)| **hit)
            .map(|(i, _)| i)
    }

    pub fn density(&self) -> f32 {
        if self.steps.is_empty() {
            return 0.0;
        }
        self.hits().count() as f32 / self.steps.len() as f32
    }
}

impl FromStr for StepPattern {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                'x' | 'X' => Ok(true),
                '.' | '-' => Ok(false),
                _ => Err(ParseError::Invalid {
                    kind: "step pattern",
                    value: s.to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(StepPattern::from_steps)
    }
}

impl fmt::Display for StepPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for hit in &self.steps {
            f.write_str(if *hit { "x" } else { "." })?;
        }
        Ok(())
    }
}

impl Serialize for StepPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
