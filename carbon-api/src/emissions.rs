//! Emission factors and per-log emission formulas.
//!
//! All quantities are kilograms of CO2. Commute factors are per kilometre on
//! a one-way basis; the commute formula doubles the distance for the round
//! trip.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// kg CO2 per vCPU hour.
pub const VCPU_HOUR_FACTOR: f64 = 0.02;

/// kg CO2 per GB of storage held for a day.
pub const STORAGE_GB_FACTOR: f64 = 0.0001;

/// Kilometres assumed per character of a free-text start location.
pub const PLACEHOLDER_KM_PER_CHAR: f64 = 1.5;

/// Mode used when a submission does not name one.
pub const DEFAULT_COMMUTE_MODE: CommuteMode = CommuteMode::Metro;

/// How an employee got to work on a given day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum CommuteMode {
    Ev,
    Car,
    Auto,
    Bike,
    Metro,
    Bus,
    Wfh,
}

impl CommuteMode {
    pub const ALL: [CommuteMode; 7] = [
        CommuteMode::Ev,
        CommuteMode::Car,
        CommuteMode::Auto,
        CommuteMode::Bike,
        CommuteMode::Metro,
        CommuteMode::Bus,
        CommuteMode::Wfh,
    ];

    /// kg CO2 per kilometre travelled one way.
    pub fn factor(self) -> f64 {
        match self {
            CommuteMode::Ev => 0.01,
            CommuteMode::Car => 0.18,
            CommuteMode::Auto => 0.08,
            CommuteMode::Bike => 0.04,
            CommuteMode::Metro => 0.02,
            CommuteMode::Bus => 0.05,
            CommuteMode::Wfh => 0.00,
        }
    }

    /// Stored code, as written to the `commute_mode` column.
    pub fn code(self) -> &'static str {
        match self {
            CommuteMode::Ev => "EV",
            CommuteMode::Car => "CAR",
            CommuteMode::Auto => "AUTO",
            CommuteMode::Bike => "BIKE",
            CommuteMode::Metro => "METRO",
            CommuteMode::Bus => "BUS",
            CommuteMode::Wfh => "WFH",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CommuteMode::Ev => "Electric Vehicle",
            CommuteMode::Car => "Car",
            CommuteMode::Auto => "Auto Rickshaw",
            CommuteMode::Bike => "Motorbike",
            CommuteMode::Metro => "Metro",
            CommuteMode::Bus => "Bus",
            CommuteMode::Wfh => "Work From Home",
        }
    }
}

impl fmt::Display for CommuteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommuteMode(pub String);

impl fmt::Display for UnknownCommuteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown commute mode '{}'", self.0)
    }
}

impl std::error::Error for UnknownCommuteMode {}

impl FromStr for CommuteMode {
    type Err = UnknownCommuteMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommuteMode::ALL
            .into_iter()
            .find(|mode| mode.code() == s)
            .ok_or_else(|| UnknownCommuteMode(s.to_string()))
    }
}

/// Factor for a stored mode code. Codes outside the table count as zero
/// emission rather than an error.
pub fn mode_factor(code: &str) -> f64 {
    code.parse::<CommuteMode>().map(CommuteMode::factor).unwrap_or(0.0)
}

/// Round-trip commute emissions for a one-way distance.
pub fn commute_emissions(commute_distance_km: f64, commute_mode: &str) -> f64 {
    commute_distance_km * 2.0 * mode_factor(commute_mode)
}

/// Emissions attributed to compute and storage usage for a day.
pub fn digital_carbon_footprint(vcpu_hours: f64, storage_gb: f64) -> f64 {
    vcpu_hours * VCPU_HOUR_FACTOR + storage_gb * STORAGE_GB_FACTOR
}

/// Estimates a one-way distance from a free-text start location.
pub trait DistanceEstimator {
    fn estimate_km(&self, start_location: &str) -> f64;
}

/// Stand-in estimator: character count times 1.5 km. It is not a distance
/// model; swap in a geocoding implementation when one exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderDistance;

impl DistanceEstimator for PlaceholderDistance {
    fn estimate_km(&self, start_location: &str) -> f64 {
        start_location.chars().count() as f64 * PLACEHOLDER_KM_PER_CHAR
    }
}

/// Resolves the distance a log is stored with.
///
/// Home commutes always take the employee's home distance. Otherwise a
/// non-empty start location fills in a zero distance through the estimator,
/// and any other supplied distance is kept.
pub fn derive_commute_distance<E: DistanceEstimator>(
    estimator: &E,
    is_home_commute: bool,
    home_commute_distance_km: f64,
    start_location: Option<&str>,
    supplied_distance_km: f64,
) -> f64 {
    if is_home_commute {
        return home_commute_distance_km;
    }
    match start_location {
        Some(location) if !location.is_empty() && supplied_distance_km == 0.0 => {
            estimator.estimate_km(location)
        }
        _ => supplied_distance_km,
    }
}

/// Rounds to a fixed number of decimal places for display.
///
/// Exact halves go to the even neighbour, so `0.125` shows as `0.12`.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round_ties_even() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_factor_table() {
        assert_eq!(mode_factor("EV"), 0.01);
        assert_eq!(mode_factor("CAR"), 0.18);
        assert_eq!(mode_factor("AUTO"), 0.08);
        assert_eq!(mode_factor("BIKE"), 0.04);
        assert_eq!(mode_factor("METRO"), 0.02);
        assert_eq!(mode_factor("BUS"), 0.05);
        assert_eq!(mode_factor("WFH"), 0.0);
    }

    #[test]
    fn test_unknown_mode_is_zero_factor() {
        assert_eq!(mode_factor("HOVERBOARD"), 0.0);
        assert_eq!(mode_factor(""), 0.0);
        // Codes are case-sensitive, as stored.
        assert_eq!(mode_factor("car"), 0.0);
        assert_eq!(commute_emissions(42.0, "TELEPORT"), 0.0);
    }

    #[test]
    fn test_mode_codes_parse_back() {
        for mode in CommuteMode::ALL {
            assert_eq!(mode.code().parse::<CommuteMode>(), Ok(mode));
        }
        let err = "TRAM".parse::<CommuteMode>().unwrap_err();
        assert_eq!(err.to_string(), "unknown commute mode 'TRAM'");
    }

    #[test]
    fn test_car_home_commute_scenario() {
        assert!(approx(commute_emissions(10.0, "CAR"), 3.6));
    }

    #[test]
    fn test_wfh_has_no_commute_emissions() {
        assert_eq!(commute_emissions(25.0, "WFH"), 0.0);
    }

    #[test]
    fn test_digital_footprint_scenario() {
        assert!(approx(digital_carbon_footprint(5.0, 20.0), 0.102));
        assert_eq!(digital_carbon_footprint(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_home_commute_always_uses_home_distance() {
        let est = PlaceholderDistance;
        assert_eq!(derive_commute_distance(&est, true, 12.5, None, 0.0), 12.5);
        assert_eq!(derive_commute_distance(&est, true, 12.5, None, 99.0), 12.5);
        assert_eq!(
            derive_commute_distance(&est, true, 12.5, Some("Client Site"), 0.0),
            12.5
        );
    }

    #[test]
    fn test_start_location_estimate_scenario() {
        let est = PlaceholderDistance;
        let km = derive_commute_distance(&est, false, 10.0, Some("Client Site"), 0.0);
        assert!(approx(km, 16.5));
    }

    #[test]
    fn test_estimate_counts_characters_not_bytes() {
        // Six characters, seven bytes.
        assert!(approx(PlaceholderDistance.estimate_km("Zürich"), 9.0));
    }

    #[test]
    fn test_supplied_distance_is_kept_for_non_home() {
        let est = PlaceholderDistance;
        assert_eq!(
            derive_commute_distance(&est, false, 10.0, Some("Client Site"), 4.0),
            4.0
        );
        assert_eq!(derive_commute_distance(&est, false, 10.0, None, 0.0), 0.0);
        assert_eq!(derive_commute_distance(&est, false, 10.0, Some(""), 0.0), 0.0);
        assert_eq!(derive_commute_distance(&est, false, 10.0, None, 7.0), 7.0);
    }

    struct FixedEstimate(f64);

    impl DistanceEstimator for FixedEstimate {
        fn estimate_km(&self, _start_location: &str) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_custom_estimator() {
        let km = derive_commute_distance(&FixedEstimate(3.25), false, 10.0, Some("Depot"), 0.0);
        assert_eq!(km, 3.25);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(3.14159, 2), 3.14);
        assert_eq!(round_to(0.123456, 4), 0.1235);
        assert_eq!(round_to(41.26, 1), 41.3);
    }

    #[test]
    fn test_round_to_ties_to_even() {
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(-0.125, 2), -0.12);
        // 2.675 is stored just below the half, so it rounds down
        assert_eq!(round_to(2.675, 2), 2.67);
    }
}
