//! Controllable mock implementations of the core's collaborator traits.
//!
//! Used by the crate's own tests and by downstream integration tests; not
//! intended for production wiring.

mod mock_body;
mod mock_display;
mod mock_presenter;
mod mock_probe;

pub use mock_body::{MockWorkBody, RecordedRun};
pub use mock_display::{DisplayCall, MockDisplay};
pub use mock_presenter::MockPresenter;
pub use mock_probe::MockConstraintProbe;
