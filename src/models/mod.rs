pub mod answer;
pub mod api;
pub mod test;

pub use answer::{normalize, renormalize, Answer, RawAnswer, CHOICE_LETTERS};
pub use api::{
    AckBody, ApiReply, BaselineStatusBody, CategoriesBody, Deeplinks, GateSignal, MeBody,
    ScoreReport, ScoreResult, TestBody, TestsBody,
};
pub use test::{Category, Role, Test, UiMode};
