//! Qualitative insight bands
//!
//! Growth rates and categorical share distributions are mapped to a small,
//! closed set of bands. Each band carries exactly one recommendation through
//! a static lookup; nothing here depends on presentation text.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Band for a forecast growth rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GrowthBand {
    StrongGrowth,
    ModerateGrowth,
    Stable,
    ModerateDecline,
    StrongDecline,
}

/// Band for a share-of-total distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShareBand {
    /// One category holds at least 60% of the total
    Dominant,
    /// One category leads with few challengers
    Leading,
    /// Demand is spread evenly
    Balanced,
    /// No category stands out and all are small
    WeakOverall,
    /// Some category trails the rest
    Underserved,
}

/// Canned recommendation category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Recommendation {
    ExpandCapacity,
    SustainMomentum,
    MaintainCourse,
    ReviewEngagement,
    UrgentOutreach,
    DiversifyOfferings,
    PromoteAlternatives,
    KeepBalance,
    BoostVisibility,
    TargetWeakest,
}

impl GrowthBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrongGrowth => "strong-growth",
            Self::ModerateGrowth => "moderate-growth",
            Self::Stable => "stable",
            Self::ModerateDecline => "moderate-decline",
            Self::StrongDecline => "strong-decline",
        }
    }

    pub fn recommendation(&self) -> Recommendation {
        match self {
            Self::StrongGrowth => Recommendation::ExpandCapacity,
            Self::ModerateGrowth => Recommendation::SustainMomentum,
            Self::Stable => Recommendation::MaintainCourse,
            Self::ModerateDecline => Recommendation::ReviewEngagement,
            Self::StrongDecline => Recommendation::UrgentOutreach,
        }
    }
}

impl ShareBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dominant => "dominant",
            Self::Leading => "leading",
            Self::Balanced => "balanced",
            Self::WeakOverall => "weak-overall",
            Self::Underserved => "underserved",
        }
    }

    pub fn recommendation(&self) -> Recommendation {
        match self {
            Self::Dominant => Recommendation::DiversifyOfferings,
            Self::Leading => Recommendation::PromoteAlternatives,
            Self::Balanced => Recommendation::KeepBalance,
            Self::WeakOverall => Recommendation::BoostVisibility,
            Self::Underserved => Recommendation::TargetWeakest,
        }
    }
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExpandCapacity => "expand-capacity",
            Self::SustainMomentum => "sustain-momentum",
            Self::MaintainCourse => "maintain-course",
            Self::ReviewEngagement => "review-engagement",
            Self::UrgentOutreach => "urgent-outreach",
            Self::DiversifyOfferings => "diversify-offerings",
            Self::PromoteAlternatives => "promote-alternatives",
            Self::KeepBalance => "keep-balance",
            Self::BoostVisibility => "boost-visibility",
            Self::TargetWeakest => "target-weakest",
        }
    }
}

impl fmt::Display for GrowthBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for ShareBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a growth rate (percent).
///
/// Thresholds are checked top-down with strict `>`, so a rate sitting exactly
/// on a threshold falls through to the next band (15 is moderate growth).
pub fn classify_growth(growth_rate_percent: f64) -> GrowthBand {
    if growth_rate_percent > 15.0 {
        GrowthBand::StrongGrowth
    } else if growth_rate_percent > 5.0 {
        GrowthBand::ModerateGrowth
    } else if growth_rate_percent > -5.0 {
        GrowthBand::Stable
    } else if growth_rate_percent > -15.0 {
        GrowthBand::ModerateDecline
    } else {
        GrowthBand::StrongDecline
    }
}

/// Result of classifying a share distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShareInsight {
    pub band: ShareBand,
    pub recommendation: Recommendation,
    /// Index of the largest share
    pub top: Option<usize>,
    /// Index of the smallest share, set for [`ShareBand::Underserved`]
    pub flagged: Option<usize>,
    /// Number of shares above 1.1x the mean share
    pub diversity: usize,
}

/// Classify shares (percentages summing to 100).
///
/// An empty distribution has no activity at all and is reported as
/// [`ShareBand::WeakOverall`].
pub fn classify_share(shares: &[f64]) -> ShareInsight {
    if shares.is_empty() {
        return ShareInsight {
            band: ShareBand::WeakOverall,
            recommendation: ShareBand::WeakOverall.recommendation(),
            top: None,
            flagged: None,
            diversity: 0,
        };
    }

    let n = shares.len();
    let mean = shares.iter().sum::<f64>() / n as f64;
    let diversity = shares.iter().filter(|s| **s > mean * 1.1).count();

    // First index wins ties in both directions
    let (top, max) = shares
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |acc, (i, s)| if s > acc.1 { (i, s) } else { acc });
    let (min_idx, _) = shares
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::INFINITY), |acc, (i, s)| if s < acc.1 { (i, s) } else { acc });

    let band = if max >= 60.0 {
        ShareBand::Dominant
    } else if max >= 35.0 && diversity <= 2 {
        ShareBand::Leading
    } else if max < 35.0 && diversity as f64 >= n as f64 / 2.0 {
        ShareBand::Balanced
    } else if max < 20.0 {
        ShareBand::WeakOverall
    } else {
        ShareBand::Underserved
    };

    ShareInsight {
        band,
        recommendation: band.recommendation(),
        top: Some(top),
        flagged: (band == ShareBand::Underserved).then_some(min_idx),
        diversity,
    }
}

/// Convert category counts into percentage shares of their total.
///
/// All shares are 0 when the total is 0.
pub fn shares_from_counts(counts: &[u64]) -> Vec<f64> {
    let total: u64 = counts.iter().sum();
    counts
        .iter()
        .map(|c| {
            if total > 0 {
                *c as f64 / total as f64 * 100.0
            } else {
                0.0
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_bands() {
        assert_eq!(classify_growth(40.0), GrowthBand::StrongGrowth);
        assert_eq!(classify_growth(10.0), GrowthBand::ModerateGrowth);
        assert_eq!(classify_growth(0.0), GrowthBand::Stable);
        assert_eq!(classify_growth(-10.0), GrowthBand::ModerateDecline);
        assert_eq!(classify_growth(-60.0), GrowthBand::StrongDecline);
    }

    #[test]
    fn test_growth_boundaries() {
        assert_eq!(classify_growth(15.0), GrowthBand::ModerateGrowth);
        assert_eq!(classify_growth(15.0001), GrowthBand::StrongGrowth);
        assert_eq!(classify_growth(5.0), GrowthBand::Stable);
        assert_eq!(classify_growth(5.0001), GrowthBand::ModerateGrowth);
        assert_eq!(classify_growth(-4.9999), GrowthBand::Stable);
        assert_eq!(classify_growth(-5.0), GrowthBand::ModerateDecline);
        assert_eq!(classify_growth(-15.0), GrowthBand::StrongDecline);
    }

    #[test]
    fn test_each_band_has_one_recommendation() {
        let growth = [
            GrowthBand::StrongGrowth,
            GrowthBand::ModerateGrowth,
            GrowthBand::Stable,
            GrowthBand::ModerateDecline,
            GrowthBand::StrongDecline,
        ];
        let shares = [
            ShareBand::Dominant,
            ShareBand::Leading,
            ShareBand::Balanced,
            ShareBand::WeakOverall,
            ShareBand::Underserved,
        ];
        let mut seen: Vec<Recommendation> = growth.iter().map(|b| b.recommendation()).collect();
        seen.extend(shares.iter().map(|b| b.recommendation()));
        let unique: std::collections::HashSet<_> = seen.iter().collect();
        assert_eq!(unique.len(), seen.len());
    }

    #[test]
    fn test_share_dominant() {
        let insight = classify_share(&[70.0, 20.0, 10.0]);
        assert_eq!(insight.band, ShareBand::Dominant);
        assert_eq!(insight.top, Some(0));
        assert_eq!(insight.flagged, None);
    }

    #[test]
    fn test_share_leading() {
        // mean 25, threshold 27.5: only 40 and 30 exceed it
        let insight = classify_share(&[40.0, 30.0, 20.0, 10.0]);
        assert_eq!(insight.band, ShareBand::Leading);
        assert_eq!(insight.diversity, 2);
        assert_eq!(insight.recommendation, Recommendation::PromoteAlternatives);
    }

    #[test]
    fn test_share_balanced() {
        // mean 20, threshold 22: 30, 30 and 25 exceed it (3 >= 2.5)
        let insight = classify_share(&[30.0, 30.0, 25.0, 10.0, 5.0]);
        assert_eq!(insight.band, ShareBand::Balanced);
        assert_eq!(insight.diversity, 3);
    }

    #[test]
    fn test_share_weak_overall() {
        // ten categories, mostly 10% each, one slightly above
        let shares = [19.0, 9.0, 9.0, 9.0, 9.0, 9.0, 9.0, 9.0, 9.0, 9.0];
        let insight = classify_share(&shares);
        assert_eq!(insight.band, ShareBand::WeakOverall);
    }

    #[test]
    fn test_share_underserved_flags_minimum() {
        // max 34 (< 35) but only 2 of 5 above 22
        let insight = classify_share(&[34.0, 30.0, 14.0, 12.0, 10.0]);
        assert_eq!(insight.band, ShareBand::Underserved);
        assert_eq!(insight.flagged, Some(4));
        assert_eq!(insight.recommendation, Recommendation::TargetWeakest);
    }

    #[test]
    fn test_share_leading_with_many_challengers_is_underserved() {
        // max 45 but three categories above 1.1x mean (20 -> 22)
        let insight = classify_share(&[45.0, 25.0, 23.0, 5.0, 2.0]);
        assert_eq!(insight.diversity, 3);
        assert_eq!(insight.band, ShareBand::Underserved);
        assert_eq!(insight.flagged, Some(4));
    }

    #[test]
    fn test_share_empty() {
        let insight = classify_share(&[]);
        assert_eq!(insight.band, ShareBand::WeakOverall);
        assert_eq!(insight.top, None);
    }

    #[test]
    fn test_shares_from_counts() {
        assert_eq!(shares_from_counts(&[3, 1]), vec![75.0, 25.0]);
        assert_eq!(shares_from_counts(&[0, 0]), vec![0.0, 0.0]);
        assert!(shares_from_counts(&[]).is_empty());
    }

    #[test]
    fn test_band_serialization() {
        assert_eq!(
            serde_json::to_string(&GrowthBand::ModerateDecline).unwrap(),
            "\"moderate-decline\""
        );
        assert_eq!(
            serde_json::to_string(&ShareBand::WeakOverall).unwrap(),
            "\"weak-overall\""
        );
    }
}
