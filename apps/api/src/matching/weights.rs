use serde::{Deserialize, Serialize};

/// Per-dimension weights for the overall match score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MatchWeights {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub location: f64,
    pub semantic: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            skills: 0.30,
            experience: 0.25,
            education: 0.20,
            location: 0.15,
            semantic: 0.10,
        }
    }
}

impl MatchWeights {
    pub fn sum(&self) -> f64 {
        self.skills + self.experience + self.education + self.location + self.semantic
    }
}

/// Sub-scores for one job/candidate pair. `semantic` is `None` when no
/// embedding could be produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchBreakdown {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub location: f64,
    pub semantic: Option<f64>,
}

/// Weighted mean of the present sub-scores.
///
/// A skipped dimension leaves the denominator, so the remaining weights are
/// renormalized. With every dimension present and default weights this is the
/// plain weighted sum.
pub fn aggregate(breakdown: &MatchBreakdown, weights: &MatchWeights) -> f64 {
    let mut terms = vec![
        (breakdown.skills, weights.skills),
        (breakdown.experience, weights.experience),
        (breakdown.education, weights.education),
        (breakdown.location, weights.location),
    ];
    if let Some(semantic) = breakdown.semantic {
        terms.push((semantic, weights.semantic));
    }

    let total_weight: f64 = terms.iter().map(|(_, w)| w).sum();
    if total_weight <= 0.0 {
        return 0.0;
    }

    let weighted: f64 = terms.iter().map(|(score, w)| score * w).sum();
    (weighted / total_weight).clamp(0.0, 1.0)
}
