use services::NoteOverview;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteCardVm {
    pub note_id: u64,
    pub title: String,
    pub subtitle: Option<String>,
    pub quizzes_label: String,
}

impl From<&NoteOverview> for NoteCardVm {
    fn from(entry: &NoteOverview) -> Self {
        let quizzes_label = match entry.quiz_count {
            1 => "1 quiz generated".to_string(),
            count => format!("{count} quizzes generated"),
        };
        let title = if entry.note.title.trim().is_empty() {
            format!("Note #{}", entry.note.note_id)
        } else {
            entry.note.title.clone()
        };
        Self {
            note_id: entry.note.note_id.value(),
            title,
            subtitle: entry.note.notebook_title.clone(),
            quizzes_label,
        }
    }
}

#[must_use]
pub fn map_note_cards(overview: &[NoteOverview]) -> Vec<NoteCardVm> {
    overview.iter().map(NoteCardVm::from).collect()
}
