//! The `quizlearn play` command: a line-oriented quiz console.
//!
//! Each input line is one command. The [`Console`] owns the
//! [`SessionStore`] and turns engine errors into notices, so nothing a user
//! types ends the session. Export write failures are reported and the
//! session carries on; only console I/O failures propagate.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use quizlearn_core::bank::{load_bank, QuestionBank};
use quizlearn_core::config::load_config_from;
use quizlearn_core::error::QuizError;
use quizlearn_core::format::{format_duration, format_elapsed};
use quizlearn_core::model::{title_case, Answer, Difficulty};
use quizlearn_core::session::SessionStore;
use quizlearn_core::statistics::{
    compute_leaderboard, compute_mastery, student_analytics, Mastery,
};
use quizlearn_report::csv::{write_csv_export, CSV_MIME};
use quizlearn_report::html::write_html_export;
use quizlearn_report::theme::{resolve_palette, Palette};

use crate::render;

/// Shown whenever a quiz command is used before anyone has logged in.
pub const LOGIN_NOTICE: &str = "Welcome. Please identify yourself to access the assessments.";

const HELP: &str = "\
Commands:
  login <name>                         identify yourself
  logout                               end your session
  topics                               list topics and question counts
  start <difficulty> [count] <topic>   begin a quiz (count: 1, 3, 5 or 10;
                                       a topic starting with a number wins)
  show                                 show the current quiz
  answer <q#> <option#|->              answer a question ('-' clears it)
  validate                             check your answers
  submit                               record the attempt
  new                                  discard the quiz and configure another
  students                             list registered students
  analytics [student]                  performance profile
  export [student]                     write CSV and HTML reports
  leaderboard                          rank all students
  help                                 show this help
  quit                                 leave";

pub fn execute(
    bank_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    seed: Option<u64>,
    palette: Option<String>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let bank = match bank_path.or(config.question_bank.clone()) {
        Some(path) => load_bank(&path)?,
        None => QuestionBank::builtin()?,
    };
    anyhow::ensure!(!bank.is_empty(), "question bank '{}' has no questions", bank.name);

    let palette_name = palette.unwrap_or_else(|| config.palette.clone());
    let palette = resolve_palette(&palette_name, &config.custom_palette).with_context(|| {
        format!("unknown palette '{palette_name}' (run `quizlearn palettes` to list them)")
    })?;

    tracing::info!(
        bank = %bank.name,
        questions = bank.question_count(),
        palette = %palette.name,
        "starting console"
    );

    let mut store = SessionStore::new(bank);
    if let Some(seed) = seed.or(config.seed) {
        tracing::debug!(seed, "seeding question sampling");
        store = store.with_seed(seed);
    }

    let settings = ConsoleSettings {
        default_count: config.default_count,
        pass_mark: config.pass_mark,
        export_dir: config.export_dir,
        palette,
    };

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Console::new(store, settings).run(stdin.lock(), stdout.lock())
}

/// Console options taken from the config.
pub struct ConsoleSettings {
    pub default_count: usize,
    pub pass_mark: u8,
    pub export_dir: PathBuf,
    pub palette: Palette,
}

enum Flow {
    Continue,
    Quit,
}

pub struct Console {
    store: SessionStore,
    settings: ConsoleSettings,
}

impl Console {
    pub fn new(store: SessionStore, settings: ConsoleSettings) -> Self {
        Self { store, settings }
    }

    /// Read commands until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> Result<()> {
        writeln!(
            out,
            "QuizLearn: {} ({} questions). Type `help` for commands.",
            self.store.bank().name,
            self.store.bank().question_count()
        )?;
        writeln!(out, "{LOGIN_NOTICE}")?;

        for line in input.lines() {
            let line = line.context("failed to read input")?;
            if let Flow::Quit = self.handle(line.trim(), &mut out)? {
                break;
            }
            out.flush()?;
        }

        writeln!(out, "Goodbye.")?;
        Ok(())
    }

    fn handle<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Ok(Flow::Continue);
        };
        let args: Vec<&str> = words.collect();
        let command = command.to_lowercase();

        match command.as_str() {
            "help" => writeln!(out, "{HELP}")?,
            "quit" | "exit" => return Ok(Flow::Quit),
            "login" => self.login(&args, out)?,
            "logout" | "topics" | "start" | "show" | "answer" | "validate" | "submit" | "new"
            | "students" | "analytics" | "export" | "leaderboard"
                if self.store.active_student().is_none() =>
            {
                writeln!(out, "{LOGIN_NOTICE}")?
            }
            "logout" => {
                self.store.logout();
                writeln!(out, "Logged out.")?;
            }
            "topics" => writeln!(out, "{}", render::topics_table(self.store.bank()))?,
            "start" => self.start(&args, out)?,
            "show" => self.show(out)?,
            "answer" => self.answer(&args, out)?,
            "validate" => self.validate(out)?,
            "submit" => self.submit(out)?,
            "new" => {
                self.store.start_new_session();
                writeln!(out, "Ready for a new quiz. Use `start` to configure it.")?;
            }
            "students" => writeln!(
                out,
                "{}",
                render::students_table(self.store.students(), self.store.history())
            )?,
            "analytics" => self.analytics(&args, out)?,
            "export" => self.export(&args, out)?,
            "leaderboard" => self.leaderboard(out)?,
            other => writeln!(
                out,
                "Unknown command '{other}'. Type `help` for a list of commands."
            )?,
        }

        Ok(Flow::Continue)
    }

    fn notice<W: Write>(&self, out: &mut W, err: &QuizError) -> Result<()> {
        writeln!(out, "! {err}")?;
        if err.is_out_of_order() {
            let hint = match err {
                QuizError::NoActiveSession => "Use `start` to begin a quiz.",
                QuizError::AnswersLocked => "Use `submit` to record it, or `new` for another quiz.",
                QuizError::NotValidated => "Use `validate` to check your answers first.",
                QuizError::AlreadySubmitted => "Use `new` to take another quiz.",
                _ => "Use `login <name>` first.",
            };
            writeln!(out, "  {hint}")?;
        }
        Ok(())
    }

    fn login<W: Write>(&mut self, args: &[&str], out: &mut W) -> Result<()> {
        let name = args.join(" ");
        let display = match self.store.login(&name) {
            Ok(student) => student.display_name(),
            Err(e) => return self.notice(out, &e),
        };
        let greeting = self.store.greeting().unwrap_or("Welcome");
        writeln!(out, "{greeting}, {display}!")?;
        Ok(())
    }

    fn start<W: Write>(&mut self, args: &[&str], out: &mut W) -> Result<()> {
        const USAGE: &str = "Usage: start <easy|medium|hard> [count] <topic>";

        let Some((difficulty, rest)) = args.split_first() else {
            writeln!(out, "{USAGE}")?;
            return Ok(());
        };
        let difficulty: Difficulty = match difficulty.parse() {
            Ok(d) => d,
            Err(e) => {
                writeln!(out, "! {e}")?;
                return Ok(());
            }
        };
        let names_topic = |words: &[&str]| {
            let typed = words.join(" ");
            self.store.bank().topics().any(|t| t.eq_ignore_ascii_case(&typed))
        };
        let (count, topic_words) = match rest.split_first() {
            Some((first, tail)) if !tail.is_empty() && !names_topic(rest) => {
                match first.parse::<usize>() {
                    Ok(count) => (count, tail),
                    Err(_) => (self.settings.default_count, rest),
                }
            }
            _ => (self.settings.default_count, rest),
        };
        if topic_words.is_empty() {
            writeln!(out, "{USAGE}")?;
            return Ok(());
        }

        let typed = topic_words.join(" ");
        let topic = self
            .store
            .bank()
            .topics()
            .find(|t| t.eq_ignore_ascii_case(&typed))
            .map(str::to_string)
            .unwrap_or(typed);

        let total = match self.store.initialize(&topic, difficulty, count) {
            Ok(quiz) => quiz.total(),
            Err(e) => return self.notice(out, &e),
        };
        if total < count {
            writeln!(out, "Only {total} {difficulty} question(s) available for {topic}.")?;
        }
        writeln!(out, "Started {topic} ({difficulty}): {total} question(s).")?;
        self.show(out)
    }

    fn show<W: Write>(&self, out: &mut W) -> Result<()> {
        let Some(quiz) = self.store.current_quiz() else {
            return self.notice(out, &QuizError::NoActiveSession);
        };

        let elapsed = (self.store.now() - quiz.start_time()).num_seconds();
        writeln!(
            out,
            "{} ({}) {} {}/{} answered | elapsed {}",
            quiz.topic,
            quiz.difficulty,
            render::progress_bar(quiz.progress(), 10),
            quiz.answered_count(),
            quiz.total(),
            format_elapsed(elapsed)
        )?;

        let feedback = if quiz.show_results() {
            quiz.feedback()
        } else {
            Vec::new()
        };

        for (i, question) in quiz.questions().iter().enumerate() {
            writeln!(out, "Q{}. {}", i + 1, question.question)?;
            let selected = quiz.answer(i).and_then(Answer::selected);
            for (j, option) in question.options.iter().enumerate() {
                let mark = if selected == Some(option.as_str()) {
                    "*"
                } else {
                    " "
                };
                writeln!(out, "  [{mark}] {}) {option}", j + 1)?;
            }
            if let Some(f) = feedback.get(i) {
                if f.is_correct {
                    writeln!(out, "  Correct!")?;
                } else {
                    writeln!(
                        out,
                        "  Incorrect. The right answer was: {}",
                        f.correct_answer
                    )?;
                }
            }
        }

        if quiz.is_completed() {
            writeln!(out, "This quiz has been submitted.")?;
        } else if quiz.show_results() {
            writeln!(out, "Answers are locked. Use `submit` to record the attempt.")?;
        }
        Ok(())
    }

    fn answer<W: Write>(&mut self, args: &[&str], out: &mut W) -> Result<()> {
        const USAGE: &str = "Usage: answer <question#> <option#|->";

        let (Some(q), Some(choice)) = (args.first(), args.get(1)) else {
            writeln!(out, "{USAGE}")?;
            return Ok(());
        };
        let Ok(number) = q.parse::<usize>() else {
            writeln!(out, "{USAGE}")?;
            return Ok(());
        };
        let Some(quiz) = self.store.current_quiz() else {
            return self.notice(out, &QuizError::NoActiveSession);
        };

        let total = quiz.total();
        if number == 0 || number > total {
            let err = QuizError::InvalidQuestionIndex {
                index: number,
                total,
            };
            return self.notice(out, &err);
        }
        let question = &quiz.questions()[number - 1];

        let answer = if *choice == "-" {
            Answer::Unanswered
        } else {
            let option = choice
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|n| question.options.get(n));
            match option {
                Some(option) => Answer::Selected(option.clone()),
                None => {
                    let err = QuizError::InvalidOption {
                        index: number,
                        option: choice.to_string(),
                    };
                    return self.notice(out, &err);
                }
            }
        };

        let shown = answer.to_string();
        if let Err(e) = self.store.record_answer(number - 1, answer) {
            return self.notice(out, &e);
        }
        if let Some(quiz) = self.store.current_quiz() {
            writeln!(
                out,
                "Q{number}: {shown} ({}/{} answered)",
                quiz.answered_count(),
                quiz.total()
            )?;
        }
        Ok(())
    }

    fn validate<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let feedback = match self.store.validate() {
            Ok(feedback) => feedback,
            Err(e) => return self.notice(out, &e),
        };

        for f in &feedback {
            if f.is_correct {
                writeln!(out, "Q{}: Correct!", f.index + 1)?;
            } else {
                writeln!(
                    out,
                    "Q{}: Incorrect. The right answer was: {}",
                    f.index + 1,
                    f.correct_answer
                )?;
            }
        }
        let correct = feedback.iter().filter(|f| f.is_correct).count();
        writeln!(
            out,
            "Score: {correct}/{}. Use `submit` to record this attempt.",
            feedback.len()
        )?;
        Ok(())
    }

    fn submit<W: Write>(&mut self, out: &mut W) -> Result<()> {
        let pass_mark = self.settings.pass_mark;
        let attempt = match self.store.submit() {
            Ok(attempt) => attempt.clone(),
            Err(e) => return self.notice(out, &e),
        };

        let status = if attempt.passed(pass_mark) {
            "Passed"
        } else {
            "Failed"
        };
        writeln!(
            out,
            "Result: {}/{} ({}%) {status}",
            attempt.score, attempt.total, attempt.percentage
        )?;
        writeln!(out, "Time taken: {}", format_duration(attempt.time_taken))?;
        writeln!(out, "Mastery: {}", compute_mastery(&attempt))?;
        writeln!(
            out,
            "Use `new` for another quiz, or `analytics` to see your progress."
        )?;
        Ok(())
    }

    /// Student named in the arguments, or the logged-in student.
    fn target_student(&self, args: &[&str]) -> String {
        if args.is_empty() {
            self.store
                .active_student()
                .map(|s| s.display_name())
                .unwrap_or_default()
        } else {
            title_case(&args.join(" "))
        }
    }

    fn analytics<W: Write>(&self, args: &[&str], out: &mut W) -> Result<()> {
        let student = self.target_student(args);
        let Some(view) = student_analytics(self.store.history(), &student) else {
            writeln!(out, "No quiz history for {student} yet.")?;
            return Ok(());
        };

        let overall = Mastery::from_percentage(view.average_percentage.round() as u8);
        writeln!(out, "Performance profile: {}", view.student)?;
        writeln!(
            out,
            "Quizzes: {} | Average: {:.1}% ({overall})",
            view.attempts.len(),
            view.average_percentage
        )?;
        writeln!(out, "Topic mastery:")?;
        writeln!(out, "{}", render::topic_mastery_table(&view.topic_mastery))?;
        writeln!(out, "Score progression:")?;
        writeln!(out, "{}", render::progression_table(&view.progression))?;
        Ok(())
    }

    fn export<W: Write>(&self, args: &[&str], out: &mut W) -> Result<()> {
        let student = self.target_student(args);
        match self.write_exports(&student, &self.settings.export_dir) {
            Ok(None) => writeln!(out, "No quiz history for {student} yet.")?,
            Ok(Some((csv_path, html_path))) => {
                writeln!(out, "Exported {} ({CSV_MIME})", csv_path.display())?;
                if let Some(html_path) = html_path {
                    writeln!(out, "Exported {}", html_path.display())?;
                }
            }
            Err(e) => {
                tracing::warn!(student = %student, error = %e, "export failed");
                writeln!(out, "! export failed: {e:#}")?;
            }
        }
        Ok(())
    }

    /// CSV path and HTML path, or `None` when the student has no attempts.
    fn write_exports(
        &self,
        student: &str,
        dir: &Path,
    ) -> Result<Option<(PathBuf, Option<PathBuf>)>> {
        let history = self.store.history();
        let Some(csv_path) = write_csv_export(history, student, dir)? else {
            return Ok(None);
        };
        let html_path =
            write_html_export(history, student, &self.settings.palette, self.store.now(), dir)?;
        Ok(Some((csv_path, html_path)))
    }

    fn leaderboard<W: Write>(&self, out: &mut W) -> Result<()> {
        match compute_leaderboard(self.store.history()) {
            Some(entries) => writeln!(out, "{}", render::leaderboard_table(&entries))?,
            None => writeln!(out, "No quizzes have been completed yet.")?,
        }
        Ok(())
    }
}
