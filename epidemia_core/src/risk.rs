//! Individual risk model.
//!
//! The risk factor scales every per-day probability an individual faces
//! (infection, hospitalization, death). It grows piecewise-linearly with age
//! and is cut to 30% by vaccination.

/// Oldest age assigned to an individual.
pub const MAX_AGE: u8 = 100;

/// Fraction of the population vaccinated when no policy is supplied.
pub const DEFAULT_VACCINATION_RATE: f64 = 0.7;

/// Risk multiplier applied to vaccinated individuals.
pub const VACCINE_RISK_MULTIPLIER: f64 = 0.3;

/// Age breakpoints (years) of the base risk curve.
pub const AGE_BREAKPOINTS: [f64; 5] = [0.0, 50.0, 70.0, 85.0, 100.0];

/// Base risk at each age breakpoint.
pub const RISK_AT_BREAKPOINT: [f64; 5] = [0.1, 0.2, 0.4, 0.7, 1.0];

/// Piecewise-linear interpolation of `y` over ascending `xs`.
///
/// Inputs outside `[xs[0], xs[last]]` take the nearest endpoint value.
pub fn interpolate(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    
    let (first, last) = match (xs.first(), xs.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return 0.0,
    };
    if x <= first {
        return ys[0];
    }
    if x >= last {
        return ys[ys.len() - 1];
    }
    
    for i in 1..xs.len() {
        if x <= xs[i] {
            let t = (x - xs[i - 1]) / (xs[i] - xs[i - 1]);
            return ys[i - 1] + t * (ys[i] - ys[i - 1]);
        }
    }
    ys[ys.len() - 1]
}

/// Base (unvaccinated) risk for an age.
pub fn age_risk(age: u8) -> f64 {
    interpolate(age as f64, &AGE_BREAKPOINTS, &RISK_AT_BREAKPOINT)
}

/// Risk factor in (0, 1] for an individual.
pub fn risk_factor(age: u8, vaccinated: bool) -> f64 {
    let multiplier = if vaccinated { VACCINE_RISK_MULTIPLIER } else { 1.0 };
    (age_risk(age) * multiplier).clamp(f64::MIN_POSITIVE, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    
    #[test]
    fn test_risk_at_breakpoints() {
        assert_relative_eq!(risk_factor(0, false), 0.1);
        assert_relative_eq!(risk_factor(50, false), 0.2);
        assert_relative_eq!(risk_factor(70, false), 0.4);
        assert_relative_eq!(risk_factor(85, false), 0.7);
        assert_relative_eq!(risk_factor(100, false), 1.0);
    }
    
    #[test]
    fn test_risk_between_breakpoints() {
        // Halfway between 50 (0.2) and 70 (0.4)
        assert_relative_eq!(risk_factor(60, false), 0.3, epsilon = 1e-12);
        // 25 years is halfway along the first segment
        assert_relative_eq!(risk_factor(25, false), 0.15, epsilon = 1e-12);
    }
    
    #[test]
    fn test_vaccination_multiplier() {
        assert_relative_eq!(risk_factor(100, true), 0.3, epsilon = 1e-12);
        assert_relative_eq!(risk_factor(0, true), 0.03, epsilon = 1e-12);
    }
    
    #[test]
    fn test_interpolate_clamps_instead_of_extrapolating() {
        assert_relative_eq!(interpolate(-20.0, &AGE_BREAKPOINTS, &RISK_AT_BREAKPOINT), 0.1);
        assert_relative_eq!(interpolate(130.0, &AGE_BREAKPOINTS, &RISK_AT_BREAKPOINT), 1.0);
        assert_eq!(interpolate(1.0, &[], &[]), 0.0);
    }
    
    proptest! {
        #[test]
        fn prop_risk_factor_bounds(age in 0u8..=MAX_AGE, vaccinated in any::<bool>()) {
            let risk = risk_factor(age, vaccinated);
            prop_assert!(risk > 0.0);
            prop_assert!(risk <= 1.0);
        }
        
        #[test]
        fn prop_risk_non_decreasing_with_age(age in 0u8..MAX_AGE, vaccinated in any::<bool>()) {
            prop_assert!(risk_factor(age, vaccinated) <= risk_factor(age + 1, vaccinated));
        }
        
        #[test]
        fn prop_vaccination_never_increases_risk(age in 0u8..=MAX_AGE) {
            prop_assert!(risk_factor(age, true) < risk_factor(age, false));
        }
    }
}
