//! Body-mass metrics
//!
//! BMI and its four-way classification bias exercise selection and rest
//! time in the plan generator.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: All calculations are pure, no side effects
//! 2. **Half-open buckets**: every finite BMI maps to exactly one category

use serde::{Deserialize, Serialize};

/// Lower bound of the normal range
pub const BMI_NORMAL_MIN: f64 = 18.5;
/// Lower bound of the overweight range
pub const BMI_OVERWEIGHT_MIN: f64 = 25.0;
/// Lower bound of the obese range
pub const BMI_OBESE_MIN: f64 = 30.0;

/// BMI category classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Half-open BMI range `[min, max)` for this category
    pub fn range(&self) -> (f64, f64) {
        match self {
            BmiCategory::Underweight => (0.0, BMI_NORMAL_MIN),
            BmiCategory::Normal => (BMI_NORMAL_MIN, BMI_OVERWEIGHT_MIN),
            BmiCategory::Overweight => (BMI_OVERWEIGHT_MIN, BMI_OBESE_MIN),
            BmiCategory::Obese => (BMI_OBESE_MIN, f64::INFINITY),
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal/Healthy",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }

    /// Rest penalty added once per planned exercise
    pub fn extra_rest_seconds(&self) -> u32 {
        match self {
            BmiCategory::Underweight | BmiCategory::Normal => 0,
            BmiCategory::Overweight => 10,
            BmiCategory::Obese => 20,
        }
    }
}

/// BMI calculation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmiResult {
    pub value: f64,
    pub category: BmiCategory,
    /// Healthy weight range in kg for this height
    pub healthy_weight_range_kg: (f64, f64),
    /// Distance from healthy range (negative = under, positive = over, 0 = in range)
    pub distance_from_healthy_kg: f64,
}

/// Calculate BMI from weight and height
///
/// Formula: BMI = weight(kg) / height(m)²
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Classify BMI into category
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    if bmi < BMI_NORMAL_MIN {
        BmiCategory::Underweight
    } else if bmi < BMI_OVERWEIGHT_MIN {
        BmiCategory::Normal
    } else if bmi < BMI_OBESE_MIN {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// Body-mass category straight from weight and height
pub fn bmi_category(weight_kg: f64, height_cm: f64) -> BmiCategory {
    classify_bmi(calculate_bmi(weight_kg, height_cm))
}

/// Calculate healthy weight range for a given height
///
/// Based on BMI 18.5-25 (normal range)
pub fn healthy_weight_range_kg(height_cm: f64) -> (f64, f64) {
    let height_m = height_cm / 100.0;
    let height_m_sq = height_m * height_m;
    (BMI_NORMAL_MIN * height_m_sq, BMI_OVERWEIGHT_MIN * height_m_sq)
}

/// Calculate complete BMI result
pub fn calculate_bmi_result(weight_kg: f64, height_cm: f64) -> BmiResult {
    let bmi = calculate_bmi(weight_kg, height_cm);
    let category = classify_bmi(bmi);
    let healthy_range = healthy_weight_range_kg(height_cm);

    let distance = if weight_kg < healthy_range.0 {
        weight_kg - healthy_range.0
    } else if weight_kg > healthy_range.1 {
        weight_kg - healthy_range.1
    } else {
        0.0
    };

    BmiResult {
        value: bmi,
        category,
        healthy_weight_range_kg: healthy_range,
        distance_from_healthy_kg: distance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_bmi_calculation() {
        // 70kg, 175cm -> BMI ~22.86
        let bmi = calculate_bmi(70.0, 175.0);
        assert!((bmi - 22.86).abs() < 0.1);
    }

    #[rstest]
    #[case(65.0, 175.0, 21.2, BmiCategory::Normal)]
    #[case(50.0, 175.0, 16.3, BmiCategory::Underweight)]
    #[case(95.0, 175.0, 31.0, BmiCategory::Obese)]
    #[case(80.0, 175.0, 26.1, BmiCategory::Overweight)]
    fn test_reference_profiles(
        #[case] weight: f64,
        #[case] height: f64,
        #[case] expected_bmi: f64,
        #[case] expected: BmiCategory,
    ) {
        let result = calculate_bmi_result(weight, height);
        assert!((result.value - expected_bmi).abs() < 0.1);
        assert_eq!(result.category, expected);
    }

    #[test]
    fn test_boundaries_are_half_open() {
        assert_eq!(classify_bmi(18.49), BmiCategory::Underweight);
        assert_eq!(classify_bmi(18.5), BmiCategory::Normal);
        assert_eq!(classify_bmi(24.95), BmiCategory::Normal);
        assert_eq!(classify_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(classify_bmi(29.95), BmiCategory::Overweight);
        assert_eq!(classify_bmi(30.0), BmiCategory::Obese);
    }

    #[test]
    fn test_extra_rest_penalty() {
        assert_eq!(BmiCategory::Underweight.extra_rest_seconds(), 0);
        assert_eq!(BmiCategory::Normal.extra_rest_seconds(), 0);
        assert_eq!(BmiCategory::Overweight.extra_rest_seconds(), 10);
        assert_eq!(BmiCategory::Obese.extra_rest_seconds(), 20);
    }

    #[test]
    fn test_healthy_weight_range() {
        let (min, max) = healthy_weight_range_kg(175.0);
        assert!((min - 56.66).abs() < 0.1);
        assert!((max - 76.56).abs() < 0.1);
        assert_eq!(calculate_bmi_result(65.0, 175.0).distance_from_healthy_kg, 0.0);
        assert!(calculate_bmi_result(95.0, 175.0).distance_from_healthy_kg > 0.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_bmi_positive(weight in 20.0f64..500.0, height in 100.0f64..250.0) {
            prop_assert!(calculate_bmi(weight, height) > 0.0);
        }

        /// The category's range always contains the BMI that produced it
        #[test]
        fn prop_category_range_contains_bmi(bmi in 5.0f64..80.0) {
            let (min, max) = classify_bmi(bmi).range();
            prop_assert!(bmi >= min && bmi < max);
        }

        #[test]
        fn prop_category_monotonic_in_weight(
            weight in 30.0f64..200.0,
            delta in 0.0f64..50.0,
            height in 140.0f64..210.0
        ) {
            let lighter = bmi_category(weight, height);
            let heavier = bmi_category(weight + delta, height);
            prop_assert!(lighter.range().0 <= heavier.range().0);
        }
    }
}
