pub mod calibration;
pub mod command;
pub mod session;
pub mod submission;

pub use calibration::{
    BaselineReadiness, CalibrationMode, CalibrationWorkflow, BASELINE_SLOT_COUNT,
};
pub use command::{apply_edit, apply_nav, EditCommand, NavCommand, SessionCommand};
pub use session::SolveSession;
pub use submission::{SubmissionCoordinator, SubmitOutcome};
