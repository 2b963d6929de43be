use crate::assistant::{Assistant, Outcome};
use crate::intent::Mode;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{DefaultTerminal, Frame};
use std::time::Duration;

const RESET_SUBJECT: &[&str] = &["전체", "초기", "reset", "show all"];
const RESET_VERB: &[&str] = &["보여", "show", "display", "보기", "알려"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusPanel {
    Input,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Speaker {
    User,
    Assistant,
    Notice,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatLine {
    pub speaker: Speaker,
    pub text: String,
}

/// Database status shown in the header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DatabaseStatus {
    NotLoaded,
    Loading,
    Ready(usize),
}

pub struct App {
    pub assistant: Assistant,
    pub source: String,
    pub messages: Vec<ChatLine>,
    pub input: String,
    pub focus_panel: FocusPanel,
    pub outcome: Option<Outcome>,
    pub selected_row: usize,
    pub should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(assistant: Assistant, source: impl Into<String>) -> Self {
        Self {
            assistant,
            source: source.into(),
            messages: vec![ChatLine {
                speaker: Speaker::Notice,
                text: "예: \"벽 두께별 체적 표 보여줘\", \"7m 이상 벽만 보여줘\"".to_string(),
            }],
            input: String::new(),
            focus_panel: FocusPanel::Input,
            outcome: None,
            selected_row: 0,
            should_quit: false,
        }
    }

    pub fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        super::dashboard::draw_dashboard(frame, self);
    }

    fn handle_events(&mut self) -> Result<()> {
        // Poll so the header picks up the background load finishing.
        if !event::poll(Duration::from_millis(250))? {
            return Ok(());
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.focus_panel {
                FocusPanel::Input => self.handle_input_keys(key.code),
                FocusPanel::Results => self.handle_results_keys(key.code),
            }
        }
        Ok(())
    }

    fn handle_input_keys(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.focus_panel = FocusPanel::Results,
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    fn handle_results_keys(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.focus_panel = FocusPanel::Input,
            KeyCode::Up | KeyCode::Char('k') => self.previous_row(),
            KeyCode::Down | KeyCode::Char('j') => self.next_row(),
            _ => {}
        }
    }

    /// Sends the input line to the assistant.
    pub fn submit(&mut self) {
        let message = std::mem::take(&mut self.input);
        let message = message.trim();
        if message.is_empty() {
            return;
        }
        self.say(Speaker::User, message);

        if is_reset_command(message) {
            self.outcome = None;
            self.selected_row = 0;
            self.say(Speaker::Assistant, "모델 전체 보기 상태로 전환했습니다.");
            return;
        }

        match self.assistant.handle(message) {
            Ok(outcome) => {
                self.say(Speaker::Assistant, &outcome.reply.reply);
                for note in &outcome.notes {
                    self.say(Speaker::Notice, note);
                }
                if outcome.selection.is_some() || outcome.table.is_some() {
                    self.outcome = Some(outcome);
                    self.selected_row = 0;
                }
            }
            Err(err) => self.say(Speaker::Notice, &err.to_string()),
        }
    }

    fn say(&mut self, speaker: Speaker, text: &str) {
        self.messages.push(ChatLine {
            speaker,
            text: text.to_string(),
        });
    }

    fn previous_row(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    fn next_row(&mut self) {
        if self.selected_row < self.result_row_count().saturating_sub(1) {
            self.selected_row += 1;
        }
    }

    #[must_use]
    pub fn result_row_count(&self) -> usize {
        self.outcome
            .as_ref()
            .and_then(|o| o.table.as_ref())
            .map_or(0, |t| t.rows.len())
    }

    #[must_use]
    pub fn database_status(&self) -> DatabaseStatus {
        let store = self.assistant.store();
        match store.snapshot() {
            Some(db) => DatabaseStatus::Ready(db.len()),
            None if store.is_loading() => DatabaseStatus::Loading,
            None => DatabaseStatus::NotLoaded,
        }
    }

    /// One-line description of the current viewer selection.
    #[must_use]
    pub fn selection_summary(&self) -> String {
        match self.outcome.as_ref().and_then(|o| o.selection.as_ref()) {
            None => "전체 모델".to_string(),
            Some(selection) => {
                let verb = match selection.mode {
                    Mode::Isolate => "Isolate",
                    Mode::Hide => "Hide",
                };
                format!("{verb} {} elements", selection.ids.len())
            }
        }
    }
}

/// "Show the whole model again" style messages, handled without the assistant.
#[must_use]
pub fn is_reset_command(message: &str) -> bool {
    let lower = message.to_lowercase();
    RESET_SUBJECT.iter().any(|k| lower.contains(k)) && RESET_VERB.iter().any(|k| lower.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::Classifier;
    use crate::normalize::Normalizer;
    use crate::store::PropertyStore;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn app() -> App {
        let assistant = Assistant::new(
            Classifier::default(),
            Normalizer::default(),
            Arc::new(PropertyStore::new()),
            Duration::from_millis(10),
        );
        App::new(assistant, "test.json")
    }

    #[test]
    fn reset_needs_subject_and_verb() {
        assert!(is_reset_command("전체 모델 다시 보여줘"));
        assert!(is_reset_command("Show all"));
        assert!(!is_reset_command("전체 벽 개수"));
    }

    #[test]
    fn readiness_error_becomes_notice() {
        let mut app = app();
        app.input = "벽만 보여줘".to_string();
        app.submit();

        let last = app.messages.last().unwrap();
        assert_eq!(last.speaker, Speaker::Notice);
        assert!(app.input.is_empty());
        assert_eq!(app.database_status(), DatabaseStatus::NotLoaded);
        assert_eq!(app.selection_summary(), "전체 모델");
    }
}
