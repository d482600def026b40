//! Interactive quiz driver
//!
//! Reads commands line by line from any `AsyncBufRead` and writes screens
//! to any `Write`, so a whole session can be scripted in tests. The driver
//! task owns the [`QuizSession`]; timers are tokio sleeps and intervals.

use crate::export::{export_html, result_json};
use crate::screens::{
    ScreenFormatter, RESTART_CONFIRM, RESTART_TOAST, SHARE_TOAST, TRY_TOAST, WELCOME_TOAST,
};
use psychefit_common::config::TimingConfig;
use psychefit_common::progress::ReflectionProgress;
use psychefit_common::report::{Confetti, ResultReport, TextRenderer};
use psychefit_common::{DetailTable, Error, QuizSession, QuizStage, Result};
use rand::Rng;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::{debug, error, warn};

/// Pieces per celebration burst
pub const CONFETTI_PIECES: usize = 50;

/// Front-end options that are not part of the quiz itself
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub timing: TimingConfig,
    /// Write the HTML report here each time a result is shown
    pub html_path: Option<PathBuf>,
    /// Print the result as JSON after the report
    pub print_json: bool,
    /// Terminal width used for the text report and confetti
    pub width: u16,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
            html_path: None,
            print_json: false,
            width: 72,
        }
    }
}

/// Why the driver stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// User chose `q`
    Quit,
    /// Input closed
    EndOfInput,
}

enum Command {
    Continue,
    Stop(Exit),
}

/// Terminal front-end for one [`QuizSession`]
pub struct App<I, W, G> {
    session: QuizSession,
    details: DetailTable,
    options: AppOptions,
    input: Lines<I>,
    out: W,
    rng: G,
    confetti: Option<Confetti>,
}

impl<I, W, G> App<I, W, G>
where
    I: AsyncBufRead + Unpin,
    W: Write,
    G: Rng,
{
    pub fn new(
        session: QuizSession,
        details: DetailTable,
        options: AppOptions,
        input: I,
        out: W,
        rng: G,
    ) -> Self {
        Self {
            session,
            details,
            options,
            input: input.lines(),
            out,
            rng,
            confetti: None,
        }
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// Give back the output sink (used by tests to inspect the transcript)
    pub fn into_output(self) -> W {
        self.out
    }

    /// Run until the user quits or input closes
    pub async fn run(&mut self) -> Result<Exit> {
        self.toast("👋", WELCOME_TOAST)?;

        loop {
            let command = match self.session.stage() {
                QuizStage::Welcome => self.welcome_screen().await?,
                QuizStage::InProgress { index } => self.question_screen(index).await?,
                QuizStage::Reflecting => {
                    self.reflect().await?;
                    Command::Continue
                }
                QuizStage::Result => self.result_screen().await?,
            };

            if let Command::Stop(exit) = command {
                debug!("Driver stopping: {:?}", exit);
                self.out.flush()?;
                return Ok(exit);
            }
        }
    }

    async fn read_command(&mut self) -> Result<Option<String>> {
        self.out.flush()?;
        let line = self.input.next_line().await?;
        Ok(line.map(|l| l.trim().to_lowercase()))
    }

    fn toast(&mut self, icon: &str, message: &str) -> Result<()> {
        self.out
            .write_all(ScreenFormatter::format_toast(icon, message).as_bytes())?;
        Ok(())
    }

    async fn welcome_screen(&mut self) -> Result<Command> {
        let count = self.session.bank().len();
        write!(self.out, "{}", ScreenFormatter::format_welcome(count))?;

        match self.read_command().await?.as_deref() {
            None => Ok(Command::Stop(Exit::EndOfInput)),
            Some("q") => Ok(Command::Stop(Exit::Quit)),
            Some(_) => {
                self.session.start()?;
                Ok(Command::Continue)
            }
        }
    }

    async fn question_screen(&mut self, index: usize) -> Result<Command> {
        let Some(question) = self.session.current_question() else {
            return Err(Error::InvalidState(format!("no question at index {}", index)));
        };
        let option_count = question.options.len();
        let screen = ScreenFormatter::format_question(
            index,
            self.session.bank().len(),
            self.session.progress_percent(),
            question,
            self.session.can_go_back(),
        );
        self.out.write_all(screen.as_bytes())?;

        let Some(line) = self.read_command().await? else {
            return Ok(Command::Stop(Exit::EndOfInput));
        };

        match line.as_str() {
            "q" => return Ok(Command::Stop(Exit::Quit)),
            "b" => {
                if !self.session.go_back() {
                    self.toast("↩", "You're on the first question")?;
                }
                return Ok(Command::Continue);
            }
            _ => {}
        }

        let selection = line
            .parse::<usize>()
            .ok()
            .filter(|n| *n >= 1)
            .map(|n| self.session.select_option(n - 1));

        match selection {
            Some(Ok(_)) => {
                let delay = self.options.timing.answer_delay();
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
            Some(Err(Error::InvalidInput(msg))) => {
                debug!("Rejected answer: {}", msg);
                self.invalid_choice(option_count)?;
            }
            Some(Err(e)) => return Err(e),
            None => self.invalid_choice(option_count)?,
        }
        Ok(Command::Continue)
    }

    fn invalid_choice(&mut self, option_count: usize) -> Result<()> {
        self.toast(
            "?",
            &format!(
                "Please enter a number from 1 to {}, b to go back, or q to quit",
                option_count
            ),
        )
    }

    /// Animated "analysing" wait, then scoring
    async fn reflect(&mut self) -> Result<()> {
        writeln!(self.out, "\n  Reflecting on your answers...\n")?;

        let mut progress = ReflectionProgress::new();
        let total = self.options.timing.reflection();
        if !total.is_zero() {
            let mut ticker = tokio::time::interval(self.options.timing.progress_tick());
            let deadline = tokio::time::sleep(total);
            tokio::pin!(deadline);

            loop {
                tokio::select! {
                    _ = &mut deadline => break,
                    _ = ticker.tick() => {
                        progress.tick(&mut self.rng);
                        let bar = ScreenFormatter::format_progress_bar(
                            progress.percent(),
                            &format!("{}%", progress.rounded_percent()),
                        );
                        write!(self.out, "\r  {}", bar)?;
                        self.out.flush()?;
                    }
                }
            }
            writeln!(self.out)?;
        }
        progress.finish();
        write!(self.out, "{}", ScreenFormatter::format_reflection(&progress))?;

        let scored = self.session.finish_reflection(&mut self.rng).map(|_| ());
        match scored {
            Ok(()) => {}
            Err(Error::IncompleteAnswers(gaps)) => {
                warn!("Strict scoring rejected answers, unanswered: {:?}", gaps);
                let first = gaps.first().map(|i| i + 1).unwrap_or(1);
                self.toast("!", &format!("Please answer question {} first", first))?;
                return Ok(());
            }
            Err(e) => return Err(e),
        }

        let confetti = Confetti::burst(&mut self.rng, CONFETTI_PIECES, self.options.width);
        writeln!(self.out, "\n{}", confetti.render_ansi())?;
        self.confetti = Some(confetti);

        self.show_result()
    }

    fn show_result(&mut self) -> Result<()> {
        let Some(result) = self.session.result().cloned() else {
            return Err(Error::InvalidState("no result to show".to_string()));
        };

        match ResultReport::assemble(&result, &self.details) {
            Ok(report) => {
                let report = report.with_elapsed(self.session.elapsed());
                let text = TextRenderer::new(self.options.width as usize).render(&report);
                self.out.write_all(text.as_bytes())?;

                if let Some(path) = self.options.html_path.clone() {
                    match export_html(&path, &report, self.confetti.clone()) {
                        Ok(()) => self.toast("✓", &format!("Report saved to {}", path.display()))?,
                        Err(e) => {
                            error!("Failed to write HTML report: {}", e);
                            self.toast("✗", "Could not save the HTML report")?;
                        }
                    }
                }
            }
            Err(Error::MissingDetail(_)) => {
                self.out
                    .write_all(ScreenFormatter::format_report_error().as_bytes())?;
            }
            Err(e) => return Err(e),
        }

        if self.options.print_json {
            writeln!(self.out, "{}", result_json(&result)?)?;
        }
        Ok(())
    }

    async fn result_screen(&mut self) -> Result<Command> {
        self.out
            .write_all(ScreenFormatter::format_result_menu().as_bytes())?;

        let Some(line) = self.read_command().await? else {
            return Ok(Command::Stop(Exit::EndOfInput));
        };

        match line.as_str() {
            "q" => return Ok(Command::Stop(Exit::Quit)),
            "r" => {
                write!(self.out, "  {} [y/N] ", RESTART_CONFIRM)?;
                match self.read_command().await?.as_deref() {
                    None => return Ok(Command::Stop(Exit::EndOfInput)),
                    Some("y") | Some("yes") => {
                        self.session.restart();
                        self.confetti = None;
                        self.toast("🌱", RESTART_TOAST)?;
                    }
                    Some(_) => {}
                }
            }
            "s" => self.toast("✨", SHARE_TOAST)?,
            "t" => self.toast("🎯", TRY_TOAST)?,
            _ => self.toast("?", "Please enter r, s, t or q")?,
        }
        Ok(Command::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use psychefit_common::QuestionBank;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn app(script: &'static str) -> App<&'static [u8], Vec<u8>, StdRng> {
        let bank = Arc::new(QuestionBank::embedded().unwrap());
        let options = AppOptions {
            timing: TimingConfig::immediate(),
            ..AppOptions::default()
        };
        App::new(
            QuizSession::new(bank),
            DetailTable::embedded().unwrap(),
            options,
            script.as_bytes(),
            Vec::new(),
            StdRng::seed_from_u64(7),
        )
    }

    fn transcript(app: App<&'static [u8], Vec<u8>, StdRng>) -> String {
        String::from_utf8(app.into_output()).unwrap()
    }

    #[tokio::test]
    async fn test_quit_from_welcome() {
        let mut app = app("q\n");
        assert_eq!(app.run().await.unwrap(), Exit::Quit);
        assert_eq!(app.session().stage(), QuizStage::Welcome);
        assert!(transcript(app).contains(WELCOME_TOAST));
    }

    #[tokio::test]
    async fn test_end_of_input_mid_quiz() {
        let mut app = app("\n1\n");
        assert_eq!(app.run().await.unwrap(), Exit::EndOfInput);
        assert_eq!(app.session().current_index(), Some(1));
    }

    #[tokio::test]
    async fn test_back_on_first_question_shows_notice() {
        let mut app = app("\nb\nq\n");
        app.run().await.unwrap();
        assert_eq!(app.session().current_index(), Some(0));
        assert!(transcript(app).contains("You're on the first question"));
    }

    #[tokio::test]
    async fn test_invalid_choice_is_reprompted() {
        let mut app = app("\n9\nzero\n0\n2\nq\n");
        app.run().await.unwrap();
        assert_eq!(app.session().current_index(), Some(1));
        assert_eq!(app.session().answers().get(0), Some(1));
        let text = transcript(app);
        assert_eq!(text.matches("Please enter a number from 1 to 4").count(), 3);
    }
}
