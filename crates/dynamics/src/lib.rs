//! Equations of motion for a point projectile over flat ground.
//!
//! [`linear`] solves drag proportional to velocity in closed form and steps it
//! at a fixed interval; [`quadratic`] describes drag proportional to speed
//! times velocity as an ODE system for the adaptive integrator.

pub mod linear;
pub mod quadratic;

pub use linear::{LinearDrag, SteppedPath, SteppingLimits, StepStop, position_at, step_until_ground};
pub use quadratic::{GroundContact, QuadraticDrag, ground_event_config};
