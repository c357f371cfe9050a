use std::io::{self, BufRead, Write};

use quiz_core::model::Question;
use services::{AttemptOutcome, QuizWorkflow, RetryMode, ReviewItem, SessionError, Stage, Step};

/// Plain-text front end over a started `QuizWorkflow`.
///
/// Uppercase letters always pick an option; lowercase `n`, `p` and `q` are
/// navigation commands, any other single letter picks an option too.
pub struct Terminal<R, W> {
    workflow: QuizWorkflow,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(workflow: QuizWorkflow, input: R, output: W) -> Self {
        Self {
            workflow,
            input,
            output,
        }
    }

    /// Play until the user finishes, quits or input runs out.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            let keep_going = match self.workflow.stage() {
                Stage::Quiz => self.question_turn()?,
                Stage::Results => self.results_turn()?,
                Stage::Upload | Stage::Configure => false,
            };
            if !keep_going {
                return Ok(());
            }
        }
    }

    fn read_command(&mut self) -> io::Result<Option<String>> {
        write!(self.output, "> ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    // ─── QUIZ ──────────────────────────────────────────────────────────────────

    fn question_turn(&mut self) -> io::Result<bool> {
        self.render_question()?;
        let Some(command) = self.read_command()? else {
            return Ok(false);
        };

        match command.as_str() {
            "n" => match self.workflow.advance() {
                Ok(Step::Question(_)) => {}
                Ok(Step::Results) => writeln!(self.output)?,
                Err(SessionError::Unanswered { .. }) => {
                    writeln!(self.output, "Answer the question before moving on.")?;
                }
                Err(err) => writeln!(self.output, "{err}")?,
            },
            "p" => {
                if !self.workflow.go_back().unwrap_or(false) {
                    writeln!(self.output, "Already at the first question.")?;
                }
            }
            "q" => {
                self.workflow.abandon();
                writeln!(self.output, "Quiz abandoned.")?;
                return Ok(false);
            }
            other => match option_from_letter(other) {
                Some(option) => self.answer(option)?,
                None => writeln!(self.output, "Pick an option letter, or n, p, q.")?,
            },
        }
        Ok(true)
    }

    fn render_question(&mut self) -> io::Result<()> {
        let Some(attempt) = self.workflow.attempt() else {
            return Ok(());
        };
        let Some(question) = attempt.current_question() else {
            return Ok(());
        };
        let answered = attempt.current_answer();
        writeln!(
            self.output,
            "Question {} of {}",
            attempt.current_position() + 1,
            attempt.total_questions()
        )?;
        writeln!(self.output, "{}", question.text())?;
        for (idx, option) in question.options().iter().enumerate() {
            let marker = if answered == Some(idx) { '*' } else { ' ' };
            writeln!(self.output, "{marker} {}. {option}", letter(idx))?;
        }
        Ok(())
    }

    fn answer(&mut self, option: usize) -> io::Result<()> {
        match self.workflow.answer(option) {
            Ok(feedback) => {
                if feedback.is_correct {
                    writeln!(self.output, "Correct!")?;
                } else {
                    let correct = self
                        .workflow
                        .attempt()
                        .and_then(|attempt| attempt.current_question())
                        .map(Question::correct_option)
                        .unwrap_or_default();
                    writeln!(
                        self.output,
                        "Incorrect. The correct answer is {}. {correct}",
                        letter(feedback.correct_answer)
                    )?;
                }
                if let Some(explanation) = &feedback.explanation {
                    writeln!(self.output, "{explanation}")?;
                }
                if feedback.all_answered {
                    writeln!(self.output, "All questions answered. Enter n for results.")?;
                }
            }
            Err(SessionError::AlreadyAnswered { .. }) => {
                writeln!(self.output, "This question is already answered.")?;
            }
            Err(SessionError::OptionOutOfRange { .. }) => {
                writeln!(self.output, "No such option.")?;
            }
            Err(err) => writeln!(self.output, "{err}")?,
        }
        Ok(())
    }

    // ─── RESULTS ───────────────────────────────────────────────────────────────

    fn results_turn(&mut self) -> io::Result<bool> {
        let outcome = match self.workflow.results() {
            Ok(outcome) => outcome,
            Err(err) => {
                writeln!(self.output, "{err}")?;
                return Ok(false);
            }
        };
        self.render_results(&outcome)?;
        writeln!(self.output, "[r] review  [t] retry  [f] finish")?;

        loop {
            let Some(command) = self.read_command()? else {
                return Ok(false);
            };
            match command.as_str() {
                "r" => self.render_review()?,
                "t" => return self.retry(),
                "f" => {
                    self.workflow.abandon();
                    writeln!(self.output, "Done.")?;
                    return Ok(false);
                }
                _ => writeln!(self.output, "Enter r, t or f.")?,
            }
        }
    }

    fn render_results(&mut self, outcome: &AttemptOutcome) -> io::Result<()> {
        match self.workflow.results_heading_percentage() {
            Some(percent) => writeln!(self.output, "Results ({percent}% of questions)")?,
            None => writeln!(self.output, "Results")?,
        }
        let summary = &outcome.summary;
        writeln!(self.output, "Correct: {}", summary.correct_count())?;
        writeln!(self.output, "Incorrect: {}", summary.incorrect_count())?;
        writeln!(self.output, "Score: {summary} / 10")?;
        let seconds = outcome.elapsed.num_seconds().max(0);
        writeln!(self.output, "Time: {}m {:02}s", seconds / 60, seconds % 60)
    }

    fn render_review(&mut self) -> io::Result<()> {
        let items: Vec<ReviewItem> = self
            .workflow
            .attempt()
            .map(|attempt| attempt.review())
            .unwrap_or_default();
        for item in &items {
            let verdict = if item.is_correct { "correct" } else { "incorrect" };
            writeln!(self.output, "{}. {} ({verdict})", item.position + 1, item.question)?;
            match item.selected {
                Some(selected) => writeln!(
                    self.output,
                    "   Your answer: {}. {}",
                    letter(selected),
                    item.options[selected]
                )?,
                None => writeln!(self.output, "   Your answer: none")?,
            }
            writeln!(
                self.output,
                "   Correct answer: {}. {}",
                letter(item.correct_answer),
                item.options[item.correct_answer]
            )?;
            if let Some(explanation) = &item.explanation {
                writeln!(self.output, "   {explanation}")?;
            }
        }
        Ok(())
    }

    fn retry(&mut self) -> io::Result<bool> {
        let mode = if self.workflow.retry_offers_reshuffle() {
            writeln!(self.output, "[s] same layout  [n] new shuffle")?;
            loop {
                match self.read_command()?.as_deref() {
                    None => return Ok(false),
                    Some("s") => break RetryMode::SameLayout,
                    Some("n") => break RetryMode::Reshuffle,
                    Some(_) => writeln!(self.output, "Enter s or n.")?,
                }
            }
        } else {
            RetryMode::SameLayout
        };

        if let Err(err) = self.workflow.retry(mode) {
            writeln!(self.output, "{err}")?;
            return Ok(false);
        }
        writeln!(self.output)?;
        Ok(true)
    }
}

fn letter(idx: usize) -> char {
    u8::try_from(idx)
        .ok()
        .filter(|idx| *idx < 26)
        .map_or('?', |idx| char::from(b'A' + idx))
}

fn option_from_letter(raw: &str) -> Option<usize> {
    let mut chars = raw.chars();
    let c = chars.next()?;
    if chars.next().is_some() || !c.is_ascii_alphabetic() {
        return None;
    }
    Some(usize::from(c.to_ascii_uppercase() as u8 - b'A'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuizConfigDraft;
    use quiz_core::time::fixed_clock;
    use services::Shuffler;

    const DOC: &str = r#"{
        "questions": [
            {
                "question": "2 + 2?",
                "options": ["3", "4"],
                "correctAnswer": 1,
                "explanation": "Basic sum."
            },
            { "question": "Sky colour?", "options": ["Blue", "Green", "Red"], "correctAnswer": 0 }
        ]
    }"#;

    fn play(draft: QuizConfigDraft, script: &str) -> (String, QuizWorkflow) {
        let mut workflow = QuizWorkflow::new()
            .with_clock(fixed_clock())
            .with_shuffler(Shuffler::seeded(9));
        workflow.upload("maths.json", DOC).unwrap();
        workflow.start(draft).unwrap();

        let mut terminal = Terminal::new(workflow, script.as_bytes(), Vec::new());
        terminal.run().unwrap();
        let Terminal {
            workflow, output, ..
        } = terminal;
        (String::from_utf8(output).unwrap(), workflow)
    }

    #[test]
    fn scripted_attempt_reaches_results_and_review() {
        let (out, workflow) = play(QuizConfigDraft::new(), "n\nA\nB\nn\na\nn\nr\n");

        assert!(out.contains("Question 1 of 2"));
        assert!(out.contains("  A. 3"));
        assert!(out.contains("Answer the question before moving on."));
        assert!(out.contains("Incorrect. The correct answer is B. 4"));
        assert!(out.contains("Basic sum."));
        assert!(out.contains("This question is already answered."));
        assert!(out.contains("Correct!"));
        assert!(out.contains("Correct: 1"));
        assert!(out.contains("Incorrect: 1"));
        assert!(out.contains("Score: 5.00 / 10"));
        assert!(out.contains("Time: 0m 00s"));
        assert!(out.contains("1. 2 + 2? (incorrect)"));
        assert!(out.contains("   Your answer: A. 3"));
        assert_eq!(workflow.stage(), Stage::Results);
    }

    #[test]
    fn retry_without_shuffle_restarts_same_layout() {
        let (out, workflow) = play(QuizConfigDraft::new(), "B\nn\nA\nn\nt\n");

        assert!(out.contains("Score: 10.00 / 10"));
        assert!(!out.contains("new shuffle"));
        assert_eq!(workflow.stage(), Stage::Quiz);
        assert_eq!(workflow.attempt().unwrap().answered_count(), 0);
    }

    #[test]
    fn shuffled_retry_asks_for_layout() {
        let draft = QuizConfigDraft {
            shuffle_options: true,
            ..QuizConfigDraft::new()
        };
        let (out, workflow) = play(draft, "A\nn\nA\nn\nt\nx\nn\n");

        assert!(out.contains("[s] same layout  [n] new shuffle"));
        assert!(out.contains("Enter s or n."));
        assert_eq!(workflow.stage(), Stage::Quiz);
    }

    #[test]
    fn quit_and_finish_return_to_upload() {
        let (out, workflow) = play(QuizConfigDraft::new(), "p\nq\n");
        assert!(out.contains("Already at the first question."));
        assert!(out.contains("Quiz abandoned."));
        assert_eq!(workflow.stage(), Stage::Upload);

        let (out, workflow) = play(QuizConfigDraft::new(), "B\nn\nA\nn\nf\n");
        assert!(out.contains("Done."));
        assert_eq!(workflow.stage(), Stage::Upload);
    }

    #[test]
    fn letters_map_to_options() {
        assert_eq!(option_from_letter("A"), Some(0));
        assert_eq!(option_from_letter("c"), Some(2));
        assert_eq!(option_from_letter("AB"), None);
        assert_eq!(option_from_letter("1"), None);
        assert_eq!(letter(1), 'B');
        assert_eq!(letter(30), '?');
    }
}
