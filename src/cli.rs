use clap::{Args, Parser, Subcommand};

use crate::lists::ListId;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the wizard's question catalog.
    Steps,
    /// Run the recommendation wizard with scripted answers.
    Recommend(RecommendArgs),
    /// Print library statistics for a catalog file.
    Stats(StatsArgs),
    /// Manage the personal reading lists.
    Lists {
        #[command(subcommand)]
        command: ListsCommand,
    },
}

#[derive(Debug, Args)]
pub struct RecommendArgs {
    /// Path to the book catalog JSON file.
    #[arg(long)]
    pub books: String,

    /// Answer as `step=value`; repeat once per step.
    #[arg(long = "answer")]
    pub answers: Vec<String>,

    /// Maximum shortlist size.
    #[arg(long, default_value_t = 10)]
    pub limit: usize,

    /// Maximum books per first-listed author.
    #[arg(long, default_value_t = 2)]
    pub max_per_author: usize,

    /// Minimum shortlist size backfilled past the author cap.
    #[arg(long, default_value_t = 5)]
    pub min_results: usize,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Path to the book catalog JSON file.
    #[arg(long)]
    pub books: String,
}

#[derive(Debug, Subcommand)]
pub enum ListsCommand {
    /// Show list membership.
    Show(ListsShowArgs),
    /// Add or move a book to a list.
    Set(ListsSetArgs),
    /// Remove a book from its list.
    Remove(ListsRemoveArgs),
    /// Toggle a book's membership in a list.
    Toggle(ListsToggleArgs),
}

#[derive(Debug, Args)]
pub struct ListsShowArgs {
    /// Data directory holding the reading list store.
    #[arg(long, default_value = ".")]
    pub data_dir: String,

    /// Restrict output to one list.
    #[arg(long, value_enum)]
    pub list: Option<ListId>,
}

#[derive(Debug, Args)]
pub struct ListsSetArgs {
    /// Data directory holding the reading list store.
    #[arg(long, default_value = ".")]
    pub data_dir: String,

    /// Book id.
    #[arg(long)]
    pub book: String,

    /// Target list.
    #[arg(long, value_enum)]
    pub list: ListId,
}

#[derive(Debug, Args)]
pub struct ListsRemoveArgs {
    /// Data directory holding the reading list store.
    #[arg(long, default_value = ".")]
    pub data_dir: String,

    /// Book id.
    #[arg(long)]
    pub book: String,
}

#[derive(Debug, Args)]
pub struct ListsToggleArgs {
    /// Data directory holding the reading list store.
    #[arg(long, default_value = ".")]
    pub data_dir: String,

    /// Book id.
    #[arg(long)]
    pub book: String,

    /// Target list.
    #[arg(long, value_enum)]
    pub list: ListId,
}
