mod note_overview_vm;
mod quiz_list_vm;
mod quiz_vm;
mod time_fmt;

pub use note_overview_vm::{NoteCardVm, map_note_cards};
pub use quiz_list_vm::{QuizCardVm, map_quiz_cards, stats_label};
pub use quiz_vm::{
    OptionVm, PASS_MARK, QuestionVm, QuizResultVm, QuizVm, ReviewMark, ReviewOptionVm,
    ReviewRowVm, start_quiz,
};
