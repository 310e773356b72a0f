//! Daily environmental score.
//!
//! The score is kilograms of CO2 attributed to the day's driving and
//! electricity use. Walking/running distance reported later by the activity
//! sensor is folded in as a separate amendment.

/// EPA estimate: kg CO2 per mile driven.
pub const KG_CO2_PER_MILE: f64 = 0.79;
/// EPA estimate: kg CO2 per kWh consumed.
pub const KG_CO2_PER_KWH: f64 = 0.85;
/// Score increment per kilometre walked or run.
pub const RUNNING_KM_FACTOR: f64 = 0.1;

pub fn compute_score(miles_driven: f64, electricity_used: f64) -> f64 {
    miles_driven * KG_CO2_PER_MILE + electricity_used * KG_CO2_PER_KWH
}

pub fn incorporate_running_distance(current_score: f64, running_km: f64) -> f64 {
    current_score + running_km * RUNNING_KM_FACTOR
}

/// Rejects quantities that would poison the score.
pub fn validate_quantity(name: &str, value: f64) -> Result<f64, String> {
    if !value.is_finite() {
        return Err(format!("{} must be a finite number", name));
    }
    if value < 0.0 {
        return Err(format!("{} must not be negative", name));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_compute_score_reference_values() {
        assert!(approx(compute_score(10.0, 20.0), 24.9));
        assert!(approx(compute_score(1.0, 0.0), 0.79));
        assert!(approx(compute_score(0.0, 1.0), 0.85));
        assert_eq!(compute_score(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_compute_score_is_linear() {
        let a = compute_score(3.0, 4.0);
        let b = compute_score(6.0, 8.0);
        assert!(approx(b, 2.0 * a));
    }

    #[test]
    fn test_incorporate_running_distance() {
        assert!(approx(incorporate_running_distance(24.9, 5.0), 25.4));
        assert!(approx(incorporate_running_distance(0.0, 3.0), 0.3));
        assert_eq!(incorporate_running_distance(7.5, 0.0), 7.5);
    }

    #[test]
    fn test_validate_quantity() {
        assert_eq!(validate_quantity("miles_driven", 0.0), Ok(0.0));
        assert_eq!(validate_quantity("miles_driven", 12.5), Ok(12.5));
        assert!(validate_quantity("miles_driven", -1.0).is_err());
        assert!(validate_quantity("electricity_used", f64::NAN).is_err());
        assert!(validate_quantity("electricity_used", f64::INFINITY).is_err());
    }
}
