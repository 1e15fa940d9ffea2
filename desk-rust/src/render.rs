use crate::poller::GameTask;
use serde_json::Value;
use std::fmt::Write as _;
use study_sdk::{extract_study_notes, parse_possible_json, StudyNotes, TaskStatus};

/// Pipeline stages shown for a running game job, in order.
pub const PHASE_LABELS: [&str; 3] = ["Game Design", "Level Design", "Code Generation"];

/// Display state of one pipeline stage in the progress tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseState {
    Pending,
    Active,
    Done,
}

/// Tracker states for the three pipeline stages at a given job status.
/// A failed job leaves the tracker blank.
#[must_use]
pub fn phase_states(status: &TaskStatus) -> [PhaseState; 3] {
    use PhaseState::{Active, Done, Pending};
    match status {
        TaskStatus::Queued | TaskStatus::Failed => [Pending, Pending, Pending],
        TaskStatus::GeneratingDesign => [Active, Pending, Pending],
        TaskStatus::GeneratingLevels => [Done, Active, Pending],
        TaskStatus::GeneratingCode => [Done, Done, Active],
        TaskStatus::Completed => [Done, Done, Done],
    }
}

/// One-line progress readout for a running job.
#[must_use]
pub fn render_progress(task: &GameTask) -> String {
    let phase = task
        .phase
        .as_deref()
        .filter(|phase| !phase.is_empty())
        .unwrap_or("Processing...");
    format!("[{:>3}%] {}", task.progress_percent(), phase)
}

/// Pull displayable quick notes out of a raw notes payload, the way the
/// overlay does: a `notes` string is decoded first when it hides a JSON
/// object, otherwise the payload itself must carry the note sections.
#[must_use]
pub fn overlay_notes(value: &Value) -> Option<StudyNotes> {
    let candidate = match value.get("notes") {
        Some(Value::String(raw)) => parse_possible_json(raw),
        _ => None,
    };
    extract_study_notes(candidate.as_ref().unwrap_or(value))
}

/// Answer visibility toggles for rendered study notes. Both default to
/// hidden.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotesDisplay {
    pub show_flashcard_answers: bool,
    pub show_mcq_answers: bool,
}

impl NotesDisplay {
    /// Both answer kinds visible, the way the notes pane first shows them.
    #[must_use]
    pub fn revealed() -> Self {
        Self {
            show_flashcard_answers: true,
            show_mcq_answers: true,
        }
    }

    /// Render study notes as markdown, one section per populated field.
    #[must_use]
    pub fn render(&self, notes: &StudyNotes) -> String {
        let mut out = String::new();

        if !notes.flashcards.is_empty() {
            out.push_str("## Flashcards\n\n");
            for (index, card) in notes.flashcards.iter().enumerate() {
                let _ = writeln!(out, "Q{}: {}", index + 1, card.question);
                if self.show_flashcard_answers {
                    let _ = writeln!(out, "Answer: {}", card.answer);
                } else {
                    out.push_str("Answer hidden\n");
                }
                out.push('\n');
            }
        }

        if !notes.cheat_sheet.trim().is_empty() {
            out.push_str("## Cheat Sheet\n\n");
            out.push_str(notes.cheat_sheet.trim_end());
            out.push_str("\n\n");
        }

        if !notes.mcqs.is_empty() {
            out.push_str("## MCQs\n\n");
            for (index, mcq) in notes.mcqs.iter().enumerate() {
                let _ = writeln!(out, "Q{}: {}", index + 1, mcq.question);
                for option in &mcq.options {
                    let marker = if self.show_mcq_answers && mcq.is_answer(option) {
                        "*"
                    } else {
                        "-"
                    };
                    let _ = writeln!(out, "  {marker} {option}");
                }
                if self.show_mcq_answers && !mcq.answer.is_empty() {
                    let _ = writeln!(out, "Answer: {}", mcq.answer);
                } else {
                    out.push_str("Answer hidden\n");
                }
                out.push('\n');
            }
        }

        if !notes.interview_questions.is_empty() {
            out.push_str("## Interview Questions\n\n");
            for (index, question) in notes.interview_questions.iter().enumerate() {
                let _ = writeln!(out, "Q{}: {}", index + 1, question);
            }
        }

        out.trim_end().to_string()
    }

    /// Render a raw notes payload the way the quick notes overlay shows it.
    #[must_use]
    pub fn render_overlay(&self, payload: &Value) -> String {
        match overlay_notes(payload) {
            Some(notes) => self.render(&notes),
            None => "No quick notes available.".to_string(),
        }
    }
}
