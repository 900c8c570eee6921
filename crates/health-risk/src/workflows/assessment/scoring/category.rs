use serde::{Deserialize, Serialize};

const DIABETES_HIGH_THRESHOLD: u8 = 60;
const DIABETES_MODERATE_THRESHOLD: u8 = 30;
const HEART_ELEVATED_THRESHOLD: u8 = 2;

/// Display color for a risk category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorBand {
    Green,
    Amber,
    Red,
}

impl ColorBand {
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Green => "#16a34a",
            Self::Amber => "#d97706",
            Self::Red => "#dc2626",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiabetesRiskCategory {
    Low,
    Moderate,
    High,
}

impl DiabetesRiskCategory {
    pub const fn from_score(score: u8) -> Self {
        if score >= DIABETES_HIGH_THRESHOLD {
            Self::High
        } else if score >= DIABETES_MODERATE_THRESHOLD {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Moderate => "Moderate Risk",
            Self::High => "High Risk",
        }
    }

    pub const fn color(self) -> ColorBand {
        match self {
            Self::Low => ColorBand::Green,
            Self::Moderate => ColorBand::Amber,
            Self::High => ColorBand::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeartRiskCategory {
    Low,
    Elevated,
}

impl HeartRiskCategory {
    pub const fn from_score(score: u8) -> Self {
        if score >= HEART_ELEVATED_THRESHOLD {
            Self::Elevated
        } else {
            Self::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low Risk (Good)",
            Self::Elevated => "Elevated Risk (Poor or Fair)",
        }
    }

    pub const fn color(self) -> ColorBand {
        match self {
            Self::Low => ColorBand::Green,
            Self::Elevated => ColorBand::Red,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diabetes_thresholds_are_inclusive() {
        assert_eq!(DiabetesRiskCategory::from_score(29), DiabetesRiskCategory::Low);
        assert_eq!(
            DiabetesRiskCategory::from_score(30),
            DiabetesRiskCategory::Moderate
        );
        assert_eq!(
            DiabetesRiskCategory::from_score(59),
            DiabetesRiskCategory::Moderate
        );
        assert_eq!(DiabetesRiskCategory::from_score(60), DiabetesRiskCategory::High);
    }

    #[test]
    fn heart_threshold_is_two_factors() {
        assert_eq!(HeartRiskCategory::from_score(1), HeartRiskCategory::Low);
        assert_eq!(HeartRiskCategory::from_score(2), HeartRiskCategory::Elevated);
        assert_eq!(HeartRiskCategory::Low.label(), "Low Risk (Good)");
        assert_eq!(HeartRiskCategory::Elevated.color(), ColorBand::Red);
    }
}
