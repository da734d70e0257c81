use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::catalog::Book;
use crate::score::AnswerSet;
use crate::select::{Recommendation, SelectOptions};
use crate::steps::{Step, StepCatalog};
use crate::wizard;

/// Pause before results are revealed, so hosts can surface a loading state.
/// The computation itself is fast; the delay is deliberate product behavior.
pub const REVEAL_DELAY: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Asking(usize),
    Calculating,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Advanced,
    ReadyToScore,
}

/// One wizard run: walks the step catalog in order, accumulates answers, and
/// holds the shortlist while the results view is open. Restart discards
/// everything; nothing outlives the session.
#[derive(Debug)]
pub struct Session {
    phase: Phase,
    answers: AnswerSet,
    results: Vec<Recommendation>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: Phase::Asking(0),
            answers: AnswerSet::new(),
            results: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn current_step<'a>(&self, catalog: &'a StepCatalog) -> Option<&'a Step> {
        match self.phase {
            Phase::Asking(index) => catalog.step(index),
            _ => None,
        }
    }

    /// Records the answer for the current step. The step id must match the
    /// current step and the value must be one of its options; unlike the
    /// scoring engine, the session boundary rejects bad input loudly.
    pub fn choose(
        &mut self,
        catalog: &StepCatalog,
        step_id: &str,
        value: &str,
    ) -> anyhow::Result<Transition> {
        let Phase::Asking(index) = self.phase else {
            anyhow::bail!("session is not asking a question");
        };
        let step = catalog
            .step(index)
            .ok_or_else(|| anyhow::anyhow!("step index out of range: {index}"))?;
        if step.id != step_id {
            anyhow::bail!(
                "answer targets step {step_id:?} but the current step is {:?}",
                step.id
            );
        }
        if step.option(value).is_none() {
            anyhow::bail!("step {step_id:?} has no option {value:?}");
        }

        self.answers.insert(step.id.to_owned(), value.to_owned());
        if index + 1 < catalog.len() {
            self.phase = Phase::Asking(index + 1);
            Ok(Transition::Advanced)
        } else {
            self.phase = Phase::Calculating;
            Ok(Transition::ReadyToScore)
        }
    }

    /// Steps back one question. The answer recorded for the abandoned step is
    /// kept; re-answering overwrites it. No-op at the first step and outside
    /// the asking phase.
    pub fn back(&mut self) {
        if let Phase::Asking(index) = self.phase
            && index > 0
        {
            self.phase = Phase::Asking(index - 1);
        }
    }

    pub fn restart(&mut self) {
        self.phase = Phase::Asking(0);
        self.answers.clear();
        self.results.clear();
        self.finished_at = None;
    }

    /// Installs computed results. Fails if the session left the calculating
    /// phase in the meantime (a restart raced the scoring task); the stale
    /// results are simply dropped by the caller.
    pub fn complete(&mut self, results: Vec<Recommendation>) -> anyhow::Result<()> {
        if self.phase != Phase::Calculating {
            anyhow::bail!("session is not calculating");
        }
        self.results = results;
        self.phase = Phase::Results;
        self.finished_at = Some(Utc::now());
        Ok(())
    }

    /// Runs the full scoring + selection pipeline after the reveal delay.
    /// Only valid in the calculating phase.
    pub async fn finish(
        &mut self,
        books: &[Book],
        catalog: &StepCatalog,
        opts: SelectOptions,
    ) -> anyhow::Result<()> {
        if self.phase != Phase::Calculating {
            anyhow::bail!("session is not calculating");
        }
        tokio::time::sleep(REVEAL_DELAY).await;
        let results = wizard::recommend(books, &self.answers, catalog, opts);
        self.complete(results)
    }

    pub fn results(&self) -> anyhow::Result<&[Recommendation]> {
        if self.phase != Phase::Results {
            anyhow::bail!("session has no results yet");
        }
        Ok(&self.results)
    }

    /// "emoji title" chips for the answered options, in catalog order.
    pub fn profile_summary(&self, catalog: &StepCatalog) -> Vec<String> {
        catalog
            .steps()
            .iter()
            .filter_map(|step| {
                let value = self.answers.get(step.id)?;
                let option = step.option(value)?;
                Some(format!("{} {}", option.emoji, option.title))
            })
            .collect()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Phase, Session, Transition};
    use crate::catalog::Book;
    use crate::select::SelectOptions;
    use crate::steps::builtin;

    fn walk_to_calculating(session: &mut Session) {
        let answers = [
            ("motivacion", "placer"),
            ("estado", "curioso"),
            ("experiencia", "ventana"),
            ("factor", "imaginativo"),
            ("formato", "cualquiera"),
        ];
        for (step, value) in answers {
            session.choose(builtin(), step, value).expect("choose");
        }
    }

    #[test]
    fn starts_at_the_first_step_with_no_answers() {
        let session = Session::new();
        assert_eq!(session.phase(), Phase::Asking(0));
        assert!(session.answers().is_empty());
        assert_eq!(session.current_step(builtin()).map(|s| s.id), Some("motivacion"));
    }

    #[test]
    fn choose_advances_and_final_answer_moves_to_calculating() {
        let mut session = Session::new();
        let t = session
            .choose(builtin(), "motivacion", "placer")
            .expect("first choose");
        assert_eq!(t, Transition::Advanced);
        assert_eq!(session.phase(), Phase::Asking(1));

        let mut session = Session::new();
        walk_to_calculating(&mut session);
        assert_eq!(session.phase(), Phase::Calculating);
        assert_eq!(session.answers().len(), 5);
    }

    #[test]
    fn choose_rejects_wrong_step_and_unknown_option() {
        let mut session = Session::new();
        let err = session
            .choose(builtin(), "estado", "curioso")
            .unwrap_err()
            .to_string();
        assert!(err.contains("current step"), "{err}");

        let err = session
            .choose(builtin(), "motivacion", "dormir")
            .unwrap_err()
            .to_string();
        assert!(err.contains("no option"), "{err}");

        // Neither failure recorded anything.
        assert!(session.answers().is_empty());
        assert_eq!(session.phase(), Phase::Asking(0));
    }

    #[test]
    fn back_keeps_the_recorded_answer() {
        let mut session = Session::new();
        session
            .choose(builtin(), "motivacion", "placer")
            .expect("choose");
        session.back();
        assert_eq!(session.phase(), Phase::Asking(0));
        assert_eq!(
            session.answers().get("motivacion").map(String::as_str),
            Some("placer")
        );

        // No-op at the first step.
        session.back();
        assert_eq!(session.phase(), Phase::Asking(0));
    }

    #[test]
    fn restart_clears_answers_and_results() {
        let mut session = Session::new();
        walk_to_calculating(&mut session);
        session.restart();
        assert_eq!(session.phase(), Phase::Asking(0));
        assert!(session.answers().is_empty());
        assert!(session.results().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn finish_produces_results_only_when_calculating() {
        let books: Vec<Book> = serde_json::from_value(serde_json::json!([
            {"id": "b1", "t": "Uno", "a": ["X"]},
            {"id": "b2", "t": "Dos", "a": ["Y"]},
        ]))
        .expect("books");

        let mut session = Session::new();
        let err = session
            .finish(&books, builtin(), SelectOptions::default())
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("not calculating"), "{err}");

        walk_to_calculating(&mut session);
        session
            .finish(&books, builtin(), SelectOptions::default())
            .await
            .expect("finish");
        assert_eq!(session.phase(), Phase::Results);
        assert_eq!(session.results().expect("results").len(), 2);
        assert!(session.finished_at.is_some());
    }

    #[test]
    fn profile_summary_lists_answers_in_catalog_order() {
        let mut session = Session::new();
        session
            .choose(builtin(), "motivacion", "aprender")
            .expect("choose");
        session
            .choose(builtin(), "estado", "energico")
            .expect("choose");
        assert_eq!(
            session.profile_summary(builtin()),
            ["📚 Aprender algo nuevo", "⚡ Con energía"]
        );
    }
}
