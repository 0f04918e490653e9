//! Small deterministic formatters shared by every view.

use crate::rule::{LagBucket, Sign};

/// Number of slots in a strength bar.
pub const STRENGTH_SLOTS: usize = 5;

const FILLED: char = '●';
const EMPTY: char = '○';

/// Five-slot bar: strength clamped to [0, 5] and rounded to whole slots.
#[must_use]
pub fn strength_bar(strength: f64) -> String {
    let clamped = if strength.is_nan() {
        0.0
    } else {
        strength.clamp(0.0, STRENGTH_SLOTS as f64)
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let filled = clamped.round() as usize;
    let mut bar = String::with_capacity(STRENGTH_SLOTS * FILLED.len_utf8());
    bar.extend(std::iter::repeat(FILLED).take(filled));
    bar.extend(std::iter::repeat(EMPTY).take(STRENGTH_SLOTS - filled));
    bar
}

/// Arrow glyph for a sign.
#[must_use]
pub const fn sign_symbol(sign: Sign) -> &'static str {
    match sign {
        Sign::Up => "↑",
        Sign::Down => "↓",
        Sign::Mixed => "↕",
    }
}

/// Arrow glyph for a raw sign label; anything unrecognised is bidirectional.
#[must_use]
pub fn sign_symbol_for(label: &str) -> &'static str {
    match label {
        "up" => sign_symbol(Sign::Up),
        "down" => sign_symbol(Sign::Down),
        _ => sign_symbol(Sign::Mixed),
    }
}

/// Human label for a lag bucket.
#[must_use]
pub const fn lag_label(lag: LagBucket) -> &'static str {
    match lag {
        LagBucket::Immediate => "Immediate (0–2 days)",
        LagBucket::Short => "Short (1–4 weeks)",
        LagBucket::Medium => "Medium (1–6 months)",
        LagBucket::Long => "Long (6+ months)",
    }
}
