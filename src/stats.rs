use std::collections::HashMap;
use std::path::Path;

use anyhow::Context as _;
use serde::Serialize;

use crate::catalog::{self, Book, Difficulty};
use crate::cli::StatsArgs;

const TOP_MOODS: usize = 12;
const TOP_AUTHORS: usize = 15;
const TOP_VIBES: usize = 15;
const TOP_SERIES: usize = 10;

/// Label used in the mood distribution for books without one.
const UNCLASSIFIED_MOOD: &str = "sin clasificar";

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct DifficultyCounts {
    pub ligero: usize,
    pub medio: usize,
    pub denso: usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct LengthCounts {
    /// < 200 pages
    pub corto: usize,
    /// 200-399 pages
    pub normal: usize,
    /// 400-599 pages
    pub largo: usize,
    /// >= 600 pages
    pub muy_largo: usize,
}

/// Whole-collection aggregation for the stats dashboard. Plain counting and
/// sorting; averages are guarded so an empty collection reports zeros.
#[derive(Debug, Clone, Serialize)]
pub struct LibraryStats {
    pub total_books: usize,
    pub total_pages: u64,
    pub total_hours: f64,
    pub avg_pages: f64,
    pub avg_hours: f64,
    pub by_difficulty: DifficultyCounts,
    pub top_moods: Vec<(String, usize)>,
    pub top_authors: Vec<(String, usize)>,
    pub unique_authors: usize,
    pub top_vibes: Vec<(String, usize)>,
    pub with_awards: usize,
    pub awards: Vec<(String, usize)>,
    pub total_series: usize,
    pub books_in_series: usize,
    pub top_series: Vec<(String, usize)>,
    pub by_length: LengthCounts,
}

pub fn library_stats(books: &[Book]) -> LibraryStats {
    let total_books = books.len();
    let total_pages: u64 = books.iter().map(|b| u64::from(b.pages())).sum();
    let total_hours: f64 = books.iter().map(Book::reading_hours).sum();
    let (avg_pages, avg_hours) = if total_books == 0 {
        (0.0, 0.0)
    } else {
        (
            (total_pages as f64 / total_books as f64).round(),
            (total_hours / total_books as f64 * 10.0).round() / 10.0,
        )
    };

    let mut by_difficulty = DifficultyCounts::default();
    let mut by_length = LengthCounts::default();
    let mut moods: HashMap<String, usize> = HashMap::new();
    let mut authors: HashMap<String, usize> = HashMap::new();
    let mut vibes: HashMap<String, usize> = HashMap::new();
    let mut awards: HashMap<String, usize> = HashMap::new();
    let mut series: HashMap<String, usize> = HashMap::new();
    let mut with_awards = 0;

    for book in books {
        match book.difficulty() {
            Difficulty::Ligero => by_difficulty.ligero += 1,
            Difficulty::Medio => by_difficulty.medio += 1,
            Difficulty::Denso => by_difficulty.denso += 1,
        }

        match book.pages() {
            0..200 => by_length.corto += 1,
            200..400 => by_length.normal += 1,
            400..600 => by_length.largo += 1,
            _ => by_length.muy_largo += 1,
        }

        let mood = book.mood().unwrap_or(UNCLASSIFIED_MOOD);
        *moods.entry(mood.to_owned()).or_default() += 1;

        for author in book.authors() {
            *authors.entry(author).or_default() += 1;
        }
        for vibe in book.vibes() {
            *vibes.entry(vibe.to_owned()).or_default() += 1;
        }

        let book_awards = book.awards();
        if !book_awards.is_empty() {
            with_awards += 1;
        }
        for award in book_awards {
            *awards.entry(award.to_owned()).or_default() += 1;
        }

        if let Some(name) = book.series() {
            *series.entry(name.to_owned()).or_default() += 1;
        }
    }

    let unique_authors = authors.len();
    let total_series = series.len();
    let books_in_series = series.values().sum();

    LibraryStats {
        total_books,
        total_pages,
        total_hours,
        avg_pages,
        avg_hours,
        by_difficulty,
        top_moods: top_counts(moods, TOP_MOODS),
        top_authors: top_counts(authors, TOP_AUTHORS),
        unique_authors,
        top_vibes: top_counts(vibes, TOP_VIBES),
        with_awards,
        awards: top_counts(awards, usize::MAX),
        total_series,
        books_in_series,
        top_series: top_counts(series, TOP_SERIES),
        by_length,
    }
}

/// Sorts count descending, name ascending on ties, keeping the first `limit`.
fn top_counts(counts: HashMap<String, usize>, limit: usize) -> Vec<(String, usize)> {
    let mut sorted: Vec<(String, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted.truncate(limit);
    sorted
}

/// `nextread stats`: print the dashboard for a catalog file.
pub fn run(args: StatsArgs) -> anyhow::Result<()> {
    let books = catalog::load_books(Path::new(&args.books)).context("load book catalog")?;
    let stats = library_stats(&books);

    println!("Libros: {}", stats.total_books);
    println!(
        "Páginas: {} (media {})",
        stats.total_pages, stats.avg_pages
    );
    println!(
        "Horas de lectura: {:.1} (media {})",
        stats.total_hours, stats.avg_hours
    );
    println!(
        "Dificultad: ligero {} / medio {} / denso {}",
        stats.by_difficulty.ligero, stats.by_difficulty.medio, stats.by_difficulty.denso
    );
    println!(
        "Extensión: <200p {} / 200-399p {} / 400-599p {} / 600p+ {}",
        stats.by_length.corto, stats.by_length.normal, stats.by_length.largo,
        stats.by_length.muy_largo
    );
    println!(
        "Con premios: {} ({} premios distintos)",
        stats.with_awards,
        stats.awards.len()
    );
    println!(
        "Series: {} ({} libros en serie)",
        stats.total_series, stats.books_in_series
    );

    print_section("Moods", &stats.top_moods);
    print_section(
        &format!("Autores ({} únicos)", stats.unique_authors),
        &stats.top_authors,
    );
    print_section("Géneros", &stats.top_vibes);
    print_section("Series", &stats.top_series);

    Ok(())
}

fn print_section(title: &str, entries: &[(String, usize)]) {
    if entries.is_empty() {
        return;
    }
    println!();
    println!("{title}:");
    for (name, count) in entries {
        println!("  {count:>4}  {name}");
    }
}

#[cfg(test)]
mod tests {
    use super::library_stats;
    use crate::catalog::Book;

    fn books(value: serde_json::Value) -> Vec<Book> {
        serde_json::from_value(value).expect("books from json")
    }

    #[test]
    fn empty_collection_reports_zeros_not_nan() {
        let stats = library_stats(&[]);
        assert_eq!(stats.total_books, 0);
        assert_eq!(stats.avg_pages, 0.0);
        assert_eq!(stats.avg_hours, 0.0);
        assert!(stats.top_moods.is_empty());
    }

    #[test]
    fn totals_and_averages_use_accessor_defaults() {
        let stats = library_stats(&books(serde_json::json!([
            {"id": "a", "pg": 100},
            {"id": "b"},
        ])));
        // Second book defaults to 300 pages / 7.5 hours.
        assert_eq!(stats.total_pages, 400);
        assert_eq!(stats.avg_pages, 200.0);
        assert_eq!(stats.total_hours, 10.0);
        assert_eq!(stats.avg_hours, 5.0);
    }

    #[test]
    fn length_buckets_split_at_200_400_600() {
        let stats = library_stats(&books(serde_json::json!([
            {"id": "a", "pg": 199},
            {"id": "b", "pg": 200},
            {"id": "c", "pg": 399},
            {"id": "d", "pg": 400},
            {"id": "e", "pg": 600},
        ])));
        assert_eq!(stats.by_length.corto, 1);
        assert_eq!(stats.by_length.normal, 2);
        assert_eq!(stats.by_length.largo, 1);
        assert_eq!(stats.by_length.muy_largo, 1);
    }

    #[test]
    fn distributions_count_every_occurrence() {
        let stats = library_stats(&books(serde_json::json!([
            {"id": "a", "a": ["X", "Y"], "v": ["fantasía"], "m": "tenso", "aw": ["Hugo", "Nebula"], "s": "Saga"},
            {"id": "b", "a": ["X"], "v": ["fantasía", "épico"], "s": "Saga"},
        ])));
        assert_eq!(stats.top_authors[0], ("X".to_owned(), 2));
        assert_eq!(stats.unique_authors, 2);
        assert_eq!(stats.top_vibes[0], ("fantasía".to_owned(), 2));
        assert_eq!(stats.with_awards, 1);
        assert_eq!(stats.awards.len(), 2);
        assert_eq!(stats.total_series, 1);
        assert_eq!(stats.books_in_series, 2);
        // Missing mood lands in the unclassified bucket.
        assert!(stats.top_moods.contains(&("sin clasificar".to_owned(), 1)));
    }
}
