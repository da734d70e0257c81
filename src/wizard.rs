use std::collections::HashMap;
use std::path::Path;

use anyhow::Context as _;

use crate::catalog::{self, Book};
use crate::cli::RecommendArgs;
use crate::score::{self, AnswerSet};
use crate::select::{self, Recommendation, SelectOptions};
use crate::session::Session;
use crate::steps::{self, StepCatalog};

/// The whole pipeline: score every book against the answers, order by total,
/// extract the author-diverse shortlist. Pure and stateless.
pub fn recommend(
    books: &[Book],
    answers: &AnswerSet,
    catalog: &StepCatalog,
    opts: SelectOptions,
) -> Vec<Recommendation> {
    let scores = score::score(books, answers, catalog);
    let ranked = select::rank(books, &scores);
    select::shortlist(ranked, opts)
}

/// `nextread recommend`: drives a session through every step with answers
/// supplied on the command line, then prints the shortlist.
pub async fn run(args: RecommendArgs) -> anyhow::Result<()> {
    let books = catalog::load_books(Path::new(&args.books)).context("load book catalog")?;
    let catalog = steps::builtin();
    let answers = parse_answers(&args.answers, catalog)?;

    let mut session = Session::new();
    for step in catalog.steps() {
        let value = answers.get(step.id).ok_or_else(|| {
            anyhow::anyhow!(
                "missing --answer for step {:?} (options: {})",
                step.id,
                step.options
                    .iter()
                    .map(|option| option.value)
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })?;
        session
            .choose(catalog, step.id, value)
            .with_context(|| format!("answer step {:?}", step.id))?;
    }

    let opts = SelectOptions {
        k: args.limit,
        max_per_author: args.max_per_author,
        min_results: args.min_results,
    };
    session
        .finish(&books, catalog, opts)
        .await
        .context("compute recommendations")?;

    println!("Perfil lector: {}", session.profile_summary(catalog).join(" | "));
    println!();
    for (rank, item) in session.results()?.iter().enumerate() {
        let book = &item.book;
        let mood = item.book.mood().unwrap_or("-");
        println!(
            "{:>2}. {} — {} ({}p, {}, {}) puntos: {}",
            rank + 1,
            book.title(),
            book.first_author(),
            book.pages(),
            book.difficulty(),
            mood,
            item.total,
        );
        tracing::debug!(id = book.id(), breakdown = ?item.breakdown, "scored");
    }

    Ok(())
}

fn parse_answers(raw: &[String], catalog: &StepCatalog) -> anyhow::Result<AnswerSet> {
    let mut answers = HashMap::new();
    for pair in raw {
        let (step_id, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("invalid --answer {pair:?}, expected step=value"))?;
        if catalog.by_id(step_id).is_none() {
            anyhow::bail!("unknown step in --answer: {step_id:?}");
        }
        if answers.insert(step_id.to_owned(), value.to_owned()).is_some() {
            anyhow::bail!("step {step_id:?} answered more than once");
        }
    }
    Ok(answers)
}

#[cfg(test)]
mod tests {
    use super::parse_answers;
    use crate::steps::builtin;

    #[test]
    fn parse_answers_accepts_step_value_pairs() {
        let raw = vec!["motivacion=placer".to_owned(), "estado=curioso".to_owned()];
        let answers = parse_answers(&raw, builtin()).expect("parse");
        assert_eq!(answers.get("motivacion").map(String::as_str), Some("placer"));
        assert_eq!(answers.len(), 2);
    }

    #[test]
    fn parse_answers_rejects_bad_input() {
        let err = parse_answers(&["motivacion".to_owned()], builtin())
            .unwrap_err()
            .to_string();
        assert!(err.contains("expected step=value"), "{err}");

        let err = parse_answers(&["capitulo=uno".to_owned()], builtin())
            .unwrap_err()
            .to_string();
        assert!(err.contains("unknown step"), "{err}");

        let raw = vec!["estado=curioso".to_owned(), "estado=cansado".to_owned()];
        let err = parse_answers(&raw, builtin()).unwrap_err().to_string();
        assert!(err.contains("answered more than once"), "{err}");
    }
}
