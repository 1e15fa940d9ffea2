mod chat;
mod desk;
mod errors;
mod opentelemetry;
mod params;
mod poller;
mod render;
mod session;

pub use chat::ChatSession;
pub use desk::Desk;
pub use errors::{DeskError, DeskResult};
pub use params::DeskParams;
pub use poller::{GameTask, PollStep, TaskPoller};
pub use render::{
    overlay_notes, phase_states, render_progress, NotesDisplay, PhaseState, PHASE_LABELS,
};
pub use session::{DeskSession, Panel};
