//! Launch parameter checks performed before any computation.

use projectile_core::{ModelKind, SimulationParameters};

use crate::error::TrajectoryError;

/// Reject parameter sets the selected model cannot evaluate.
///
/// Both models need finite `v0 > 0`, `0 <= angle <= 90`, `mass > 0`,
/// `gravity >= 0` and `speed_factor > 0`. The closed form divides by the drag
/// coefficient and steps at `dt`, so it additionally needs `drag > 0` and
/// `dt > 0`. The ODE accepts `drag = 0` (vacuum) and ignores `dt`.
pub fn validate(params: &SimulationParameters, model: ModelKind) -> Result<(), TrajectoryError> {
    finite("v0_m_s", params.v0_m_s)?;
    if params.v0_m_s <= 0.0 {
        return Err(TrajectoryError::invalid(
            "v0_m_s",
            params.v0_m_s,
            "launch speed must be positive",
        ));
    }

    finite("angle_deg", params.angle_deg)?;
    if !(0.0..=90.0).contains(&params.angle_deg) {
        return Err(TrajectoryError::invalid(
            "angle_deg",
            params.angle_deg,
            "launch angle must lie within [0, 90] degrees",
        ));
    }

    finite("drag_coefficient", params.drag_coefficient)?;
    match model {
        ModelKind::LinearClosedForm if params.drag_coefficient <= 0.0 => {
            return Err(TrajectoryError::invalid(
                "drag_coefficient",
                params.drag_coefficient,
                "linear drag coefficient must be positive",
            ));
        }
        ModelKind::QuadraticNumeric if params.drag_coefficient < 0.0 => {
            return Err(TrajectoryError::invalid(
                "drag_coefficient",
                params.drag_coefficient,
                "quadratic drag coefficient must not be negative",
            ));
        }
        _ => {}
    }

    finite("mass_kg", params.mass_kg)?;
    if params.mass_kg <= 0.0 {
        return Err(TrajectoryError::invalid(
            "mass_kg",
            params.mass_kg,
            "mass must be positive",
        ));
    }

    finite("gravity_m_s2", params.gravity_m_s2)?;
    if params.gravity_m_s2 < 0.0 {
        return Err(TrajectoryError::invalid(
            "gravity_m_s2",
            params.gravity_m_s2,
            "gravity must not be negative",
        ));
    }

    if model == ModelKind::LinearClosedForm {
        finite("dt_s", params.dt_s)?;
        if params.dt_s <= 0.0 {
            return Err(TrajectoryError::invalid(
                "dt_s",
                params.dt_s,
                "time step must be positive",
            ));
        }
    }

    finite("speed_factor", params.speed_factor)?;
    if params.speed_factor <= 0.0 {
        return Err(TrajectoryError::invalid(
            "speed_factor",
            params.speed_factor,
            "speed factor must be positive",
        ));
    }

    Ok(())
}

fn finite(name: &'static str, value: f64) -> Result<(), TrajectoryError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TrajectoryError::invalid(name, value, "must be a finite number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> SimulationParameters {
        SimulationParameters {
            v0_m_s: 500.0,
            angle_deg: 45.0,
            drag_coefficient: 1.0,
            mass_kg: 10.0,
            gravity_m_s2: 9.81,
            dt_s: 0.005,
            speed_factor: 1.0,
        }
    }

    fn rejected_name(params: SimulationParameters, model: ModelKind) -> &'static str {
        match validate(&params, model) {
            Err(TrajectoryError::InvalidParameter { name, .. }) => name,
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn accepts_defaults_for_both_models() {
        assert!(validate(&base(), ModelKind::LinearClosedForm).is_ok());
        assert!(validate(&base(), ModelKind::QuadraticNumeric).is_ok());
    }

    #[test]
    fn zero_drag_depends_on_model() {
        let params = SimulationParameters {
            drag_coefficient: 0.0,
            ..base()
        };
        assert_eq!(
            rejected_name(params, ModelKind::LinearClosedForm),
            "drag_coefficient"
        );
        assert!(validate(&params, ModelKind::QuadraticNumeric).is_ok());
    }

    #[test]
    fn angle_bounds_are_inclusive() {
        for angle in [0.0, 90.0] {
            let params = SimulationParameters {
                angle_deg: angle,
                ..base()
            };
            assert!(validate(&params, ModelKind::LinearClosedForm).is_ok());
        }
        for angle in [-0.1, 90.1] {
            let params = SimulationParameters {
                angle_deg: angle,
                ..base()
            };
            assert_eq!(rejected_name(params, ModelKind::QuadraticNumeric), "angle_deg");
        }
    }

    #[test]
    fn rejects_non_finite_and_non_positive_fields() {
        let cases = [
            (SimulationParameters { v0_m_s: 0.0, ..base() }, "v0_m_s"),
            (SimulationParameters { v0_m_s: f64::NAN, ..base() }, "v0_m_s"),
            (SimulationParameters { mass_kg: 0.0, ..base() }, "mass_kg"),
            (SimulationParameters { gravity_m_s2: -1.0, ..base() }, "gravity_m_s2"),
            (SimulationParameters { dt_s: 0.0, ..base() }, "dt_s"),
            (SimulationParameters { speed_factor: 0.0, ..base() }, "speed_factor"),
            (
                SimulationParameters {
                    drag_coefficient: f64::INFINITY,
                    ..base()
                },
                "drag_coefficient",
            ),
        ];
        for (params, name) in cases {
            assert_eq!(rejected_name(params, ModelKind::LinearClosedForm), name);
        }
    }

    #[test]
    fn ode_ignores_time_step() {
        let params = SimulationParameters {
            dt_s: 0.0,
            ..base()
        };
        assert!(validate(&params, ModelKind::QuadraticNumeric).is_ok());
        assert_eq!(rejected_name(params, ModelKind::LinearClosedForm), "dt_s");
    }

    #[test]
    fn zero_gravity_is_allowed() {
        let params = SimulationParameters {
            gravity_m_s2: 0.0,
            ..base()
        };
        assert!(validate(&params, ModelKind::LinearClosedForm).is_ok());
    }
}
