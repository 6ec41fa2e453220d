mod persistence;
mod session;

pub use persistence::{load_form, save_form};
pub use session::{CadetProfile, PlanStage, PlanningSession};
