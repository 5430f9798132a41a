//! Arrangement scheduler.
//!
//! Lays an arrangement template end to end on the time axis and cuts it to
//! the requested length: the section that crosses the end is clipped, the
//! ones after it are dropped. Nothing of zero length is ever emitted.
//!
//! ```text
//! template  |intro 8|buildup 16      |drop 32                 |...
//! request   |<------------------ 30 s ------------->|
//! schedule  |intro 8|buildup 16      |drop 6 |
//! ```

use serde::Serialize;

use crate::theory::ArrangementStyle;

/// Shortest section worth emitting, in seconds.
const MIN_SECTION_SECS: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub name: &'static str,
    pub start_secs: f64,
    pub duration_secs: f64,
    /// 0.0 - 1.0
    pub energy: f32,
}

impl Section {
    pub fn end_secs(&self) -> f64 {
        self.start_secs + self.duration_secs
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Arrangement {
    sections: Vec<Section>,
}

impl Arrangement {
    /// Schedule `style` into at most `total_secs` seconds.
    pub fn schedule(style: ArrangementStyle, total_secs: f64) -> Self {
        let total = if total_secs.is_finite() { total_secs.max(0.0) } else { 0.0 };
        let mut sections = Vec::new();
        let mut elapsed = 0.0;

        for template in style.sections() {
            let remaining = total - elapsed;
            if remaining < MIN_SECTION_SECS {
                break;
            }

            let duration = template.duration_secs.min(remaining);
            sections.push(Section {
                name: template.name,
                start_secs: elapsed,
                duration_secs: duration,
                energy: template.energy,
            });
            elapsed += duration;
        }

        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn names(&self) -> Vec<String> {
        self.sections.iter().map(|s| s.name.to_string()).collect()
    }

    pub fn total_secs(&self) -> f64 {
        self.sections.iter().map(|s| s.duration_secs).sum()
    }

    /// Section playing at `secs`.
    pub fn section_at(&self, secs: f64) -> Option<&Section> {
        self.sections
            .iter()
            .find(|s| secs >= s.start_secs && secs < s.end_secs())
    }
}
