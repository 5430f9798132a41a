//! Buffer arithmetic shared by buses and effects.
//!
//! Crossfades keep weights summing to 1.0 so two full-scale inputs stay
//! full-scale. Plain sums (`sum_in_place`) do not: buses that sum many voices
//! apply gain afterwards and the master is soft-limited.

/// out = a·(1-balance) + b·balance
#[inline]
pub fn mix(a: &[f32], b: &[f32], balance: f32, out: &mut [f32]) {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len(), out.len());

    let balance = balance.clamp(0.0, 1.0);
    for ((&sa, &sb), o) in a.iter().zip(b).zip(out.iter_mut()) {
        *o = sa * (1.0 - balance) + sb * balance;
    }
}

/// a = a·(1-balance) + b·balance, in place.
#[inline]
pub fn mix_in_place(a: &mut [f32], b: &[f32], balance: f32) {
    debug_assert_eq!(a.len(), b.len());

    let balance = balance.clamp(0.0, 1.0);
    for (sa, &sb) in a.iter_mut().zip(b) {
        *sa = *sa * (1.0 - balance) + sb * balance;
    }
}

/// a += b, sample by sample.
#[inline]
pub fn sum_in_place(a: &mut [f32], b: &[f32]) {
    debug_assert_eq!(a.len(), b.len());
    for (sa, &sb) in a.iter_mut().zip(b) {
        *sa += sb;
    }
}

/// a += b·gain. Used to accumulate voices into a bus.
#[inline]
pub fn accumulate(a: &mut [f32], b: &[f32], gain: f32) {
    debug_assert_eq!(a.len(), b.len());
    for (sa, &sb) in a.iter_mut().zip(b) {
        *sa += sb * gain;
    }
}

#[inline]
pub fn apply_gain(signal: &mut [f32], gain: f32) {
    for sample in signal.iter_mut() {
        *sample *= gain;
    }
}

#[inline]
pub fn blend_dry_wet(dry: f32, wet: f32, mix: f32) -> f32 {
    dry * (1.0 - mix) + wet * mix
}

/// wet[i] = dry[i]·(1-mix) + wet[i]·mix
#[inline]
pub fn apply_dry_wet(dry: &[f32], wet: &mut [f32], mix: f32) {
    debug_assert_eq!(dry.len(), wet.len());
    if mix >= 1.0 {
        return;
    }
    for (w, &d) in wet.iter_mut().zip(dry) {
        *w = blend_dry_wet(d, *w, mix);
    }
}

pub fn peak(signal: &[f32]) -> f32 {
    signal.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
}

pub fn rms(signal: &[f32]) -> f32 {
    if signal.is_empty() {
        return 0.0;
    }
    (signal.iter().map(|x| x * x).sum::<f32>() / signal.len() as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_mix_averages() {
        let mut out = [0.0; 3];
        mix(&[1.0, 0.0, -1.0], &[0.0, 1.0, -1.0], 0.5, &mut out);
        assert_eq!(out, [0.5, 0.5, -1.0]);
    }

    #[test]
    fn accumulate_scales_source() {
        let mut bus = [0.25, 0.5];
        accumulate(&mut bus, &[1.0, -1.0], 0.5);
        assert_eq!(bus, [0.75, 0.0]);
    }

    #[test]
    fn dry_wet_extremes() {
        let dry = [0.3, -0.7];
        let mut wet = [1.0, 1.0];
        apply_dry_wet(&dry, &mut wet, 0.0);
        assert_eq!(wet, dry);

        let mut wet = [1.0, 1.0];
        apply_dry_wet(&dry, &mut wet, 1.0);
        assert_eq!(wet, [1.0, 1.0]);
    }

    #[test]
    fn level_meters() {
        let signal = [0.5, -1.0, 0.5, 0.0];
        assert_eq!(peak(&signal), 1.0);
        assert!((rms(&signal) - (1.5f32 / 4.0).sqrt()).abs() < 1e-6);
        assert_eq!(rms(&[]), 0.0);
    }
}
