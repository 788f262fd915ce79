use screener_core::{Classification, VerdictTier};

/// Combine verdict tiers into one classification.
///
/// One `Fail` anywhere gives high risk regardless of anything else; absent a
/// `Fail`, any `Warning` or `InsufficientData` gives medium risk; otherwise
/// low risk. Commutative over the input, and never inspects label text.
pub fn classify<I>(tiers: I) -> Classification
where
    I: IntoIterator<Item = VerdictTier>,
{
    let mut classification = Classification::LowRisk;
    for tier in tiers {
        match tier {
            VerdictTier::Fail => return Classification::HighRisk,
            VerdictTier::Warning | VerdictTier::InsufficientData => {
                classification = Classification::MediumRisk;
            }
            VerdictTier::Pass => {}
        }
    }
    classification
}
