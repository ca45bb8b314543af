//! Adaptive ODE integration for trajectory models.
//!
//! - Dormand-Prince 5(4) embedded pair with first-same-as-last reuse
//! - Step-size control on a mixed absolute/relative error norm
//! - Terminal events located with Brent's method on the dense interpolant
//! - Cubic Hermite dense output over every accepted step
//!
//! ```ignore
//! use projectile_integrator::{DormandPrince, EventConfig, EventDirection, Tolerances};
//!
//! let mut solver = DormandPrince::new(Tolerances::new(1e-9, 1e-7));
//! let config = EventConfig::new(EventDirection::Falling);
//! let solution = solver.integrate_to_event(&system, &ground, &config, 0.0, &y0, 1000.0)?;
//! if let Some(contact) = solution.event() {
//!     println!("landed at t = {}", contact.t);
//! }
//! ```

pub mod coefficients;
pub mod dense;
pub mod events;
pub mod solver;

pub use dense::{DenseOutput, HermiteSegment};
pub use events::{
    BrentError, BrentSolver, EventConfig, EventDirection, EventFunction, EventResult,
    sign_change_detected,
};
pub use solver::{
    DormandPrince, IntegrationError, IntegrationResult, OdeSystem, Solution, Stats,
    StepController, StepResult, Tolerances,
};
