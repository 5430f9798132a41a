/// Musical note duration represented as a rational fraction of a whole note.
/// All operations preserve exact ratios, so step grids never drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration {
    /// Numerator: how many parts
    pub numerator: u32,
    /// Denominator: of what size (4 = quarter, 8 = eighth, etc.)
    pub denominator: u32,
}

impl Duration {
    /// One 4/4 bar.
    pub const BAR: Duration = Duration::WHOLE;
    pub const WHOLE: Duration = Duration {
        numerator: 1,
        denominator: 1,
    };
    pub const HALF: Duration = Duration {
        numerator: 1,
        denominator: 2,
    };
    pub const QUARTER: Duration = Duration {
        numerator: 1,
        denominator: 4,
    };
    pub const EIGHTH: Duration = Duration {
        numerator: 1,
        denominator: 8,
    };
    pub const SIXTEENTH: Duration = Duration {
        numerator: 1,
        denominator: 16,
    };

    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Duration {
            numerator,
            denominator,
        }
    }

    /// `count` of this duration back to back: `EIGHTH.times(3)` is 3/8.
    pub const fn times(self, count: u32) -> Self {
        Duration {
            numerator: self.numerator * count,
            denominator: self.denominator,
        }
        .reduce()
    }

    /// Apply a dot: multiply duration by 3/2
    pub const fn dotted(self) -> Self {
        Duration {
            numerator: self.numerator * 3,
            denominator: self.denominator * 2,
        }
        .reduce()
    }

    /// Reduce the fraction to lowest terms using GCD
    pub const fn reduce(self) -> Self {
        let gcd = const_gcd(self.numerator, self.denominator);
        if gcd == 0 {
            return self;
        }
        Duration {
            numerator: self.numerator / gcd,
            denominator: self.denominator / gcd,
        }
    }

    /// Convert this duration to integer ticks
    /// ppq = pulses per quarter note
    /// Formula: ticks = (numerator * 4 * ppq) / denominator
    pub fn to_ticks(&self, ppq: u32) -> u64 {
        (self.numerator as u64 * 4 * ppq as u64) / self.denominator.max(1) as u64
    }
}

/// Compute greatest common divisor (Euclidean algorithm)
const fn const_gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let temp = b;
        b = a % b;
        a = temp;
    }
    a
}

/// Tempo plus tick resolution: converts between seconds, ticks and samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tempo {
    pub bpm: f64,
    pub ppq: u32,
}

impl Tempo {
    pub fn new(bpm: f64, ppq: u32) -> Self {
        Self {
            bpm: bpm.max(1.0),
            ppq: ppq.max(1),
        }
    }

    pub fn ticks_per_second(&self) -> f64 {
        (self.bpm / 60.0) * self.ppq as f64
    }

    /// Seconds to the nearest tick.
    pub fn secs_to_ticks(&self, secs: f64) -> u64 {
        (secs.max(0.0) * self.ticks_per_second()).round() as u64
    }

    pub fn ticks_to_secs(&self, ticks: u64) -> f64 {
        ticks as f64 / self.ticks_per_second()
    }

    /// Samples per tick, e.g. 44.1 kHz at 128 BPM, 480 ppq = 43.07
    pub fn samples_per_tick(&self, sample_rate: f64) -> f64 {
        sample_rate / self.ticks_per_second()
    }

    pub fn beat_secs(&self) -> f64 {
        60.0 / self.bpm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_durations_to_ticks() {
        let ppq = 480;

        assert_eq!(Duration::BAR.to_ticks(ppq), 1920);
        assert_eq!(Duration::QUARTER.to_ticks(ppq), 480);
        assert_eq!(Duration::EIGHTH.to_ticks(ppq), 240);
        assert_eq!(Duration::SIXTEENTH.to_ticks(ppq), 120);
    }

    #[test]
    fn times_and_dots() {
        let ppq = 480;

        // Three eighths = dotted quarter
        assert_eq!(Duration::EIGHTH.times(3), Duration::QUARTER.dotted());
        assert_eq!(Duration::EIGHTH.times(3).to_ticks(ppq), 720);
        assert_eq!(Duration::SIXTEENTH.times(4), Duration::QUARTER);
    }

    #[test]
    fn const_evaluation() {
        const TWO_BEATS: Duration = Duration::QUARTER.times(2);
        assert_eq!(TWO_BEATS, Duration::HALF);
    }

    #[test]
    fn tempo_conversions() {
        let tempo = Tempo::new(120.0, 480);

        // Two beats per second
        assert_eq!(tempo.secs_to_ticks(1.0), 960);
        assert_eq!(tempo.ticks_to_secs(480), 0.5);
        assert_eq!(tempo.samples_per_tick(48_000.0), 50.0);
        assert_eq!(tempo.beat_secs(), 0.5);
    }
}
