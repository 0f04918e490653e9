//! Result ordering: lag rank ascending, then strength descending.
//!
//! The sort is stable, so impacts equal in both keys keep rule-list order.

use std::cmp::Ordering;

use super::ComputedImpact;

fn compare(a: &ComputedImpact, b: &ComputedImpact) -> Ordering {
    a.lag
        .rank()
        .cmp(&b.lag.rank())
        .then_with(|| b.strength.total_cmp(&a.strength))
}

pub(crate) fn sort_impacts(impacts: &mut [ComputedImpact]) {
    impacts.sort_by(compare);
}

/// Whether `impacts` satisfies the ordering invariant.
#[must_use]
pub fn is_ordered(impacts: &[ComputedImpact]) -> bool {
    impacts
        .windows(2)
        .all(|pair| compare(&pair[0], &pair[1]) != Ordering::Greater)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ExplanationSource;
    use crate::id::{IndicatorId, MechanismId};
    use crate::rule::{ImpactConfidence, LagBucket, Sign};

    fn impact(id: &str, lag: LagBucket, strength: f64) -> ComputedImpact {
        ComputedImpact {
            target_indicator_id: IndicatorId::new(id).unwrap(),
            sign: Sign::Up,
            strength,
            lag,
            confidence: ImpactConfidence::new(3).unwrap(),
            mechanism: MechanismId::new("m").unwrap(),
            explanation_short: String::new(),
            explanation_source: ExplanationSource::StaticTemplate,
            reasons_applied: Vec::new(),
        }
    }

    #[test]
    fn sorts_by_lag_then_strength() {
        let mut impacts = vec![
            impact("a", LagBucket::Long, 5.0),
            impact("b", LagBucket::Immediate, 1.0),
            impact("c", LagBucket::Short, 2.0),
            impact("d", LagBucket::Immediate, 4.0),
        ];
        sort_impacts(&mut impacts);
        let ids: Vec<_> = impacts.iter().map(|i| i.target_indicator_id.as_str()).collect();
        assert_eq!(ids, vec!["d", "b", "c", "a"]);
        assert!(is_ordered(&impacts));
    }

    #[test]
    fn ties_keep_input_order() {
        let mut impacts = vec![
            impact("first", LagBucket::Medium, 2.5),
            impact("second", LagBucket::Medium, 2.5),
            impact("third", LagBucket::Medium, 2.5),
        ];
        sort_impacts(&mut impacts);
        let ids: Vec<_> = impacts.iter().map(|i| i.target_indicator_id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn detects_violations() {
        let impacts = vec![
            impact("a", LagBucket::Short, 1.0),
            impact("b", LagBucket::Immediate, 1.0),
        ];
        assert!(!is_ordered(&impacts));
        assert!(is_ordered(&[]));
    }
}
