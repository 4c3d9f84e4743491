//! Global simulation parameters and load-balancing policy.

use serde::{Deserialize, Serialize};

use exawave_core::{ConfigError, ConfigErrorKind};

/// Domain geometry, time horizon, plotting cadence, and boundary-condition
/// mode shared by every solver in a project.
///
/// All sequence fields must have exactly `dimensions` entries; the project
/// rejects the parameters otherwise when they are set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationParameters {
    /// Spatial dimensionality, 2 or 3.
    pub dimensions: u32,
    /// Domain lower corner, one entry per axis.
    pub offset: Vec<f64>,
    /// Domain extent, one positive entry per axis.
    pub size: Vec<f64>,
    /// Earliest admissible end of the simulated time span.
    pub min_end_time: f64,
    /// Latest admissible end of the simulated time span.
    pub max_end_time: f64,
    /// Simulated time of the first plot.
    pub first_plot_time_stamp: f64,
    /// Simulated time between subsequent plots. Zero disables plotting.
    pub time_in_between_plots: f64,
    /// Periodic boundary flag per axis.
    pub periodic_boundaries: Vec<bool>,
}

impl SimulationParameters {
    /// Checks every invariant, returning all violations together.
    ///
    /// `InvalidParameter` for an unsupported dimension count,
    /// `DimensionMismatch` for sequence lengths that disagree with
    /// `dimensions`, `InvalidRange` for non-positive extents, inverted end
    /// times, or negative time stamps.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let dims = self.dimensions as usize;

        if !(self.dimensions == 2 || self.dimensions == 3) {
            errors.push(ConfigError::new(
                ConfigErrorKind::InvalidParameter,
                format!("dimensions must be 2 or 3, got {}", self.dimensions),
            ));
        }

        for (field, len) in [
            ("offset", self.offset.len()),
            ("size", self.size.len()),
            ("periodic_boundaries", self.periodic_boundaries.len()),
        ] {
            if len != dims {
                errors.push(ConfigError::new(
                    ConfigErrorKind::DimensionMismatch,
                    format!(
                        "{field} has {len} entries but the domain is {}-dimensional",
                        self.dimensions
                    ),
                ));
            }
        }

        for (axis, &extent) in self.size.iter().enumerate() {
            if !(extent.is_finite() && extent > 0.0) {
                errors.push(ConfigError::new(
                    ConfigErrorKind::InvalidRange,
                    format!("size component {axis} must be positive, got {extent}"),
                ));
            }
        }

        if self.min_end_time < 0.0 || self.max_end_time < 0.0 {
            errors.push(ConfigError::new(
                ConfigErrorKind::InvalidRange,
                "end times must be non-negative",
            ));
        }
        if self.min_end_time > self.max_end_time {
            errors.push(ConfigError::new(
                ConfigErrorKind::InvalidRange,
                format!(
                    "min_end_time {} exceeds max_end_time {}",
                    self.min_end_time, self.max_end_time
                ),
            ));
        }

        if self.first_plot_time_stamp < 0.0 || self.time_in_between_plots < 0.0 {
            errors.push(ConfigError::new(
                ConfigErrorKind::InvalidRange,
                "plotting time stamps must be non-negative",
            ));
        }

        errors
    }
}

/// Partitioning policy handed through to the external parallel runtime.
///
/// The strategy name and its configuration payload are opaque here:
/// unknown strategies are the collaborator's to reject, not ours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancing {
    /// Identifier of the partitioning strategy.
    pub strategy: String,
    /// Strategy-specific configuration, passed through unmodified.
    pub payload: String,
}

impl Default for LoadBalancing {
    fn default() -> Self {
        Self {
            strategy: "recursive-bipartition".to_string(),
            payload: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_domain() -> SimulationParameters {
        SimulationParameters {
            dimensions: 2,
            offset: vec![-1.0, -1.0],
            size: vec![2.0, 2.0],
            min_end_time: 1.414,
            max_end_time: 1.414,
            first_plot_time_stamp: 0.0,
            time_in_between_plots: 0.1,
            periodic_boundaries: vec![true, true],
        }
    }

    #[test]
    fn test_valid_parameters_pass() {
        assert!(square_domain().validate().is_empty());
    }

    #[test]
    fn test_periodic_flags_must_match_dimensions() {
        let mut params = square_domain();
        params.periodic_boundaries = vec![true];
        let errors = params.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ConfigErrorKind::DimensionMismatch);
    }

    #[test]
    fn test_every_length_mismatch_is_reported() {
        let params = SimulationParameters {
            dimensions: 3,
            offset: vec![0.0, 0.0],
            size: vec![1.0, 1.0],
            min_end_time: 0.0,
            max_end_time: 1.0,
            first_plot_time_stamp: 0.0,
            time_in_between_plots: 0.0,
            periodic_boundaries: vec![false, false],
        };
        let errors = params.validate();
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ConfigErrorKind::DimensionMismatch)
                .count(),
            3
        );
    }

    #[test]
    fn test_nonpositive_extent_rejected() {
        let mut params = square_domain();
        params.size[1] = -2.0;
        let errors = params.validate();
        assert!(errors
            .iter()
            .any(|e| e.kind == ConfigErrorKind::InvalidRange && e.message.contains("component 1")));
    }

    #[test]
    fn test_inverted_end_times_rejected() {
        let mut params = square_domain();
        params.min_end_time = 2.0;
        params.max_end_time = 1.0;
        let errors = params.validate();
        assert!(errors.iter().any(|e| e.kind == ConfigErrorKind::InvalidRange));
    }

    #[test]
    fn test_unsupported_dimension_count_rejected() {
        let mut params = square_domain();
        params.dimensions = 4;
        let errors = params.validate();
        assert!(errors
            .iter()
            .any(|e| e.kind == ConfigErrorKind::InvalidParameter));
    }

    #[test]
    fn test_default_load_balancing() {
        let lb = LoadBalancing::default();
        assert_eq!(lb.strategy, "recursive-bipartition");
        assert!(lb.payload.is_empty());
    }
}
