use crate::navigation::{Direction, FocusOutcome, leave_field};
use crate::problems::{MULTIPLIER_MAX, TableRange};
use crate::session::{AnswerStatus, GameSession, GameStatus};
use crate::streak::MAX_STREAK;
use crate::time_format::{format_clock, format_time_taken};
use crate::timer::DisplayTimer;
use eframe::egui;
use log::info;
use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_secs(1);

pub struct TimesTablesApp {
    session: GameSession,
    /// Text of each answer field, in problem order
    fields: Vec<String>,
    focus_request: Option<usize>,
    /// Field the app itself moved focus away from, so its lost-focus event is not counted twice
    departed: Option<usize>,
    timer: DisplayTimer,
    last_tick: Instant,
    selected_lower: u32,
    selected_upper: u32,
    range_error: Option<String>,
    notice: Option<String>,
    show_instructions: bool,
}

/// Input gathered from one frame of the problem grid
enum FieldEvent {
    Edited(usize, String),
    Left {
        index: usize,
        direction: Direction,
        move_focus: bool,
        /// The field still had focus when it was left
        focused: bool,
    },
}

impl TimesTablesApp {
    pub fn new(session: GameSession) -> Self {
        let bounds = session.bounds();
        Self {
            session,
            fields: Vec::new(),
            focus_request: None,
            departed: None,
            timer: DisplayTimer::new(),
            last_tick: Instant::now(),
            selected_lower: bounds.lower,
            selected_upper: bounds.upper,
            range_error: None,
            notice: None,
            show_instructions: false,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn start_game(&mut self) {
        match self.session.start_game(self.selected_lower, self.selected_upper) {
            Ok(()) => {
                self.range_error = None;
                self.begin_round();
            }
            Err(e) => self.range_error = Some(e.to_string()),
        }
    }

    /// Type `text` into field `index`; anything but a plain number puts the old value back
    pub fn edit_field(&mut self, index: usize, text: String) {
        let Some(id) = self.session.problems().get(index).map(|p| p.id) else {
            return;
        };
        if self.session.submit_answer(&id, &text) {
            self.fields[index] = text;
        } else {
            self.fields[index] = self
                .session
                .answer_for(&id)
                .map(|a| a.to_string())
                .unwrap_or_default();
        }
    }

    pub fn leave(&mut self, index: usize, direction: Direction, move_focus: bool) {
        match leave_field(&mut self.session, index, direction) {
            FocusOutcome::Move(next) if move_focus => self.focus_request = Some(next),
            FocusOutcome::Completed => {
                self.timer.stop();
                self.notice = self.session.get_score().map(|score| score.summary());
            }
            _ => {}
        }
    }

    pub fn next_round(&mut self) {
        self.session.reset_game(true);
        if self.session.status() == GameStatus::Playing {
            self.begin_round();
        } else {
            self.back_to_range_selection();
        }
    }

    pub fn new_game(&mut self) {
        self.session.reset_game(false);
        self.back_to_range_selection();
    }

    fn begin_round(&mut self) {
        self.fields = vec![String::new(); self.session.problems().len()];
        self.focus_request = Some(0);
        self.departed = None;
        self.notice = None;
        self.timer.start();
        self.last_tick = Instant::now();
    }

    fn back_to_range_selection(&mut self) {
        let bounds = self.session.bounds();
        self.selected_lower = bounds.lower;
        self.selected_upper = bounds.upper;
        self.fields.clear();
        self.focus_request = None;
        self.departed = None;
        self.notice = None;
        self.timer.reset();
    }

    fn tick_timer(&mut self) {
        if self.last_tick.elapsed() >= TICK {
            self.timer.tick(self.session.status());
            self.last_tick += TICK;
        }
    }

    fn show_range_selection(&mut self, ui: &mut egui::Ui) {
        ui.heading("Ready to start!");
        ui.label("Select your times tables range and press start to begin.");
        ui.label(format!(
            "Complete {} perfect sets in a row to complete a streak for the selected range.",
            MAX_STREAK
        ));
        ui.add_space(20.0);

        ui.horizontal(|ui| {
            egui::ComboBox::from_label("From")
                .selected_text(self.selected_lower.to_string())
                .show_ui(ui, |ui| {
                    for n in 1..=MULTIPLIER_MAX {
                        ui.selectable_value(&mut self.selected_lower, n, n.to_string());
                    }
                });
            egui::ComboBox::from_label("To")
                .selected_text(self.selected_upper.to_string())
                .show_ui(ui, |ui| {
                    for n in 1..=MULTIPLIER_MAX {
                        ui.selectable_value(&mut self.selected_upper, n, n.to_string());
                    }
                });
        });
        ui.add_space(10.0);

        if ui.button("Start Game").clicked() {
            self.start_game();
        }

        if let Some(error) = &self.range_error {
            ui.colored_label(egui::Color32::RED, error.as_str());
        }
    }

    fn show_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Times Table Tester");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if self.session.status() != GameStatus::Idle && ui.button("Reset").clicked() {
                    info!("Round abandoned with streak {}", self.session.streak());
                    self.new_game();
                }
                if ui.button("Instructions").clicked() {
                    self.show_instructions = true;
                }
            });
        });
    }

    fn show_problems(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading(format!("Time: {}", self.timer.formatted()));
            ui.add_space(20.0);
            ui.label(streak_stars(self.session.streak()));
        });
        ui.add_space(10.0);

        let problems = self.session.problems().to_vec();
        let statuses: Vec<AnswerStatus> = problems
            .iter()
            .map(|p| self.session.answer_status(&p.id))
            .collect();
        let focus_request = self.focus_request.take();
        let mut events = Vec::new();

        egui::Grid::new("problem_grid")
            .num_columns(3)
            .spacing([24.0, 8.0])
            .show(ui, |ui| {
                for (index, problem) in problems.iter().enumerate() {
                    let mut text = self.fields[index].clone();
                    let color = match statuses[index] {
                        AnswerStatus::Correct => egui::Color32::DARK_GREEN,
                        AnswerStatus::Incorrect => egui::Color32::RED,
                        AnswerStatus::Unanswered => ui.visuals().text_color(),
                    };

                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new(format!("{} =", problem)).size(20.0));
                        let response = ui.add(
                            egui::TextEdit::singleline(&mut text)
                                .id(egui::Id::new(("answer", index)))
                                .desired_width(64.0)
                                .text_color(color),
                        );

                        if focus_request == Some(index) {
                            response.request_focus();
                        }
                        if response.changed() {
                            events.push(FieldEvent::Edited(index, text.clone()));
                        }

                        let (enter, tab, up, down) = ui.input(|i| {
                            (
                                i.key_pressed(egui::Key::Enter),
                                i.key_pressed(egui::Key::Tab),
                                i.key_pressed(egui::Key::ArrowUp),
                                i.key_pressed(egui::Key::ArrowDown),
                            )
                        });

                        if response.has_focus() && (up || down) {
                            let direction = if up {
                                Direction::Previous
                            } else {
                                Direction::Next
                            };
                            events.push(FieldEvent::Left {
                                index,
                                direction,
                                move_focus: true,
                                focused: true,
                            });
                        } else if response.lost_focus() {
                            events.push(FieldEvent::Left {
                                index,
                                direction: Direction::Next,
                                move_focus: enter || tab,
                                focused: false,
                            });
                        }
                    });

                    if (index + 1) % 3 == 0 {
                        ui.end_row();
                    }
                }
            });

        for event in events {
            match event {
                FieldEvent::Edited(index, text) => self.edit_field(index, text),
                FieldEvent::Left {
                    index,
                    direction,
                    move_focus,
                    focused,
                } => {
                    if !focused && self.departed == Some(index) {
                        // Already counted when focus was moved away
                        self.departed = None;
                        continue;
                    }
                    self.leave(index, direction, move_focus);
                    if focused && self.focus_request.is_some() {
                        self.departed = Some(index);
                    }
                }
            }
        }
    }

    fn show_results(&mut self, ui: &mut egui::Ui) {
        let Some(score) = self.session.get_score() else {
            return;
        };

        ui.heading("Game Complete!");
        ui.add_space(10.0);
        if let Some(notice) = &self.notice {
            ui.label(notice.as_str());
        }
        ui.add_space(10.0);

        ui.label(
            egui::RichText::new(format!("{}%", score.percentage))
                .size(40.0)
                .strong()
                .color(egui::Color32::LIGHT_BLUE),
        );
        egui::Grid::new("results_grid")
            .num_columns(2)
            .spacing([40.0, 6.0])
            .show(ui, |ui| {
                ui.label("Correct");
                ui.label(
                    egui::RichText::new(score.correct.to_string()).color(egui::Color32::DARK_GREEN),
                );
                ui.end_row();

                ui.label("Incorrect");
                ui.label(
                    egui::RichText::new(score.incorrect_answers.to_string())
                        .color(egui::Color32::RED),
                );
                ui.end_row();

                ui.label("Time Taken");
                ui.label(format_time_taken(score.time_spent));
                ui.end_row();

                ui.label("Total Incorrect Attempts");
                ui.label(score.incorrect_attempts.to_string());
                ui.end_row();
            });

        ui.add_space(20.0);
        let streak = self.session.streak();
        ui.label(streak_stars(streak));
        if streak > 0 {
            ui.label(format!(
                "Streak time: {}",
                format_clock(self.session.cumulative_time())
            ));
        }
        ui.add_space(20.0);

        ui.horizontal(|ui| {
            if streak > 0 && streak < MAX_STREAK {
                if ui.button("Keep Streak").clicked() {
                    info!("Continuing streak of {}", streak);
                    self.next_round();
                }
            } else if streak >= MAX_STREAK {
                ui.label("Streak complete!");
            }
            if ui.button("New Range").clicked() {
                self.new_game();
            }
        });
    }
}

fn instructions(ui: &mut egui::Ui) {
    ui.label("Select your times tables range and press Start Game when ready.");
    ui.label("Type your answer and press Tab or Enter to move to the next problem.");
    ui.label("Use the Up Arrow to go back to the previous problem.");
    ui.label("Leaving a field with a wrong answer counts as an incorrect attempt.");
    ui.label("A perfect game needs every answer correct and no incorrect attempts.");
    ui.label(format!(
        "Perfect games build a streak of up to {} stars. Any mistake, a new range or a reset breaks it.",
        MAX_STREAK
    ));
}

fn streak_stars(streak: u8) -> String {
    let filled = "★".repeat(streak as usize);
    let empty = "☆".repeat(MAX_STREAK.saturating_sub(streak) as usize);
    format!("Streak: {}{}", filled, empty)
}

impl eframe::App for TimesTablesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.tick_timer();

        egui::TopBottomPanel::top("header").show(ctx, |ui| self.show_header(ui));

        egui::Window::new("How to Play")
            .open(&mut self.show_instructions)
            .collapsible(false)
            .resizable(false)
            .show(ctx, instructions);

        egui::CentralPanel::default().show(ctx, |ui| match self.session.status() {
            GameStatus::Idle => self.show_range_selection(ui),
            GameStatus::Playing => self.show_problems(ui),
            GameStatus::Completed => self.show_results(ui),
        });

        if self.session.status() == GameStatus::Playing {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}

pub fn run_app(bounds: TableRange) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([720.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Times Tables",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(TimesTablesApp::new(
                GameSession::new().with_bounds(bounds),
            )))
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing_app() -> TimesTablesApp {
        let mut app = TimesTablesApp::new(GameSession::new());
        app.selected_lower = 3;
        app.selected_upper = 3;
        app.start_game();
        app
    }

    #[test]
    fn test_app_starts_idle_with_session_bounds() {
        let bounds = TableRange::new(4, 9).unwrap();
        let app = TimesTablesApp::new(GameSession::new().with_bounds(bounds));

        assert_eq!(app.session().status(), GameStatus::Idle);
        assert_eq!(app.selected_lower, 4);
        assert_eq!(app.selected_upper, 9);
    }

    #[test]
    fn test_start_game_with_inverted_selection_shows_error() {
        let mut app = TimesTablesApp::new(GameSession::new());
        app.selected_lower = 10;
        app.selected_upper = 2;
        app.start_game();

        assert_eq!(app.session().status(), GameStatus::Idle);
        assert!(app.range_error.is_some());
    }

    #[test]
    fn test_start_game_prepares_fields() {
        let app = playing_app();

        assert_eq!(app.session().status(), GameStatus::Playing);
        assert_eq!(app.fields().len(), 12);
        assert_eq!(app.focus_request, Some(0));
        assert!(app.timer.is_running());
    }

    #[test]
    fn test_non_numeric_edit_is_reverted() {
        let mut app = playing_app();
        app.edit_field(0, "1".to_string());
        app.edit_field(0, "1a".to_string());

        assert_eq!(app.fields()[0], "1");
        let id = app.session().problems()[0].id;
        assert_eq!(app.session().answer_for(&id), Some(1));
    }

    #[test]
    fn test_leaving_with_keyboard_moves_focus() {
        let mut app = playing_app();
        app.focus_request = None;
        app.leave(0, Direction::Next, true);
        assert_eq!(app.focus_request, Some(1));

        app.focus_request = None;
        app.leave(4, Direction::Previous, false);
        assert_eq!(app.focus_request, None);
    }

    #[test]
    fn test_leaving_wrong_answer_counts_attempt() {
        let mut app = playing_app();
        let problem = app.session().problems()[0].clone();
        app.edit_field(0, (problem.answer + 1).to_string());
        app.leave(0, Direction::Next, true);

        assert_eq!(app.session().incorrect_attempts().get(&problem.id), Some(&1));
    }

    #[test]
    fn test_completing_round_sets_notice() {
        let mut app = playing_app();
        let problems = app.session().problems().to_vec();
        for (index, problem) in problems.iter().enumerate() {
            app.edit_field(index, problem.answer.to_string());
        }
        app.leave(problems.len() - 1, Direction::Next, true);

        assert_eq!(app.session().status(), GameStatus::Completed);
        assert_eq!(
            app.notice.as_deref(),
            Some("Completed! Score: 12/12 (100%)")
        );
        assert!(!app.timer.is_running());
    }

    #[test]
    fn test_next_round_keeps_streak() {
        let mut app = playing_app();
        let problems = app.session().problems().to_vec();
        for (index, problem) in problems.iter().enumerate() {
            app.edit_field(index, problem.answer.to_string());
        }
        app.leave(problems.len() - 1, Direction::Next, true);

        app.next_round();

        assert_eq!(app.session().status(), GameStatus::Playing);
        assert_eq!(app.session().streak(), 1);
        assert!(app.fields().iter().all(|f| f.is_empty()));
    }

    #[test]
    fn test_reset_mid_round_forfeits_streak() {
        let mut app = playing_app();
        let problems = app.session().problems().to_vec();
        for (index, problem) in problems.iter().enumerate() {
            app.edit_field(index, problem.answer.to_string());
        }
        app.leave(problems.len() - 1, Direction::Next, true);
        app.next_round();
        assert_eq!(app.session().streak(), 1);

        // Abandon the second round part way through
        let first = app.session().problems()[0].clone();
        app.edit_field(0, first.answer.to_string());
        app.leave(0, Direction::Next, true);
        app.new_game();

        assert_eq!(app.session().status(), GameStatus::Idle);
        assert_eq!(app.session().streak(), 0);
        assert!(app.session().problems().is_empty());
        assert!(app.fields().is_empty());
        assert!(!app.timer.is_running());
    }

    #[test]
    fn test_new_game_returns_to_selection() {
        let mut app = playing_app();
        app.new_game();

        assert_eq!(app.session().status(), GameStatus::Idle);
        assert_eq!(app.selected_lower, 2);
        assert_eq!(app.selected_upper, 12);
        assert!(app.fields().is_empty());
    }

    #[test]
    fn test_streak_stars() {
        insta::assert_snapshot!(streak_stars(0), @"Streak: ☆☆☆☆☆");
        insta::assert_snapshot!(streak_stars(2), @"Streak: ★★☆☆☆");
        insta::assert_snapshot!(streak_stars(5), @"Streak: ★★★★★");
    }
}
