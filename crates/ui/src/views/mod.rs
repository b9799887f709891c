mod notes_overview;
mod quiz;
mod quiz_list;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use notes_overview::NotesOverviewView;
pub use quiz::{QuizIntent, QuizView};
pub use quiz_list::QuizListView;
pub use state::{ViewError, ViewState, view_state_from_resource};
