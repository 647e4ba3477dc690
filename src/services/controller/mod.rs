//! Rate-limit and consecutive-error controller.
//!
//! Gates poll cycles on the cool-down window and the poll interval, and turns fetch
//! failures into operator alerts.

mod classify;
mod controller;

pub use classify::{classify_failure, FailureClass};
pub use controller::{
	ConditionKind, ControllerSettings, ControllerState, RateController,
};
