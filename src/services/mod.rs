pub mod answer_store;
pub mod gate;
pub mod navigator;
pub mod role;

pub use answer_store::{AnswerStore, Progress};
pub use gate::{GateController, GateState};
pub use navigator::Navigator;
pub use role::RoleContext;
