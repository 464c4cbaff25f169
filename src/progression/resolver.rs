//! Stat resolution
//!
//! Combines a designer base value with a tier. One rounding policy for every
//! consumer: counts round half away from zero and never drop below one.
//! A count whose base is zero or negative is disabled and stays at zero
//! instead of being floored to one, so a pickup worth no points stays worth
//! none on every tier.

use super::difficulty::{DifficultyTier, StatKey, StatKind};

/// Smallest value an integer-quantized stat may resolve to
pub const MIN_COUNT: f32 = 1.0;

/// Resolve a base value against a tier
pub fn resolve(base: f32, tier: &DifficultyTier, key: StatKey) -> f32 {
    let value = tier.value(key);
    match key.kind() {
        StatKind::Rate => base * value,
        // Disabled quantity: not floored
        StatKind::Count if base <= 0.0 => 0.0,
        StatKind::Count => quantize(base * value),
        StatKind::Fixed => quantize(value),
    }
}

/// Resolve an integer stat (health, damage, points). Rate keys are rounded
/// the same way [`StatBinding::count`] rounds them.
///
/// [`StatBinding::count`]: super::binding::StatBinding::count
pub fn resolve_count(base: i32, tier: &DifficultyTier, key: StatKey) -> i32 {
    resolve(base as f32, tier, key).round() as i32
}

fn quantize(value: f32) -> f32 {
    value.round().max(MIN_COUNT)
}
