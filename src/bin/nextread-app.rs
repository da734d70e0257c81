use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post, put};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex as SessionMutex;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use nextread::catalog::{self, Book};
use nextread::lists::{ListCounts, ListId, ReadingLists};
use nextread::select::{Recommendation, SelectOptions};
use nextread::session::{Phase, REVEAL_DELAY, Session, Transition};
use nextread::stats::{self, LibraryStats};
use nextread::steps::{self, Step, StepCatalog};
use nextread::wizard;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct AppArgs {
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Path to the book catalog JSON file.
    #[arg(long)]
    books: PathBuf,

    /// Data directory for the reading list store.
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,
}

type SharedSession = Arc<SessionMutex<Session>>;

#[derive(Clone)]
struct AppState {
    books: Arc<Vec<Book>>,
    catalog: &'static StepCatalog,
    sessions: Arc<Mutex<HashMap<Uuid, SharedSession>>>,
    lists: Arc<Mutex<ReadingLists>>,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    nextread::logging::init()?;

    let args = AppArgs::parse();
    tracing::info!(?args, "starting nextread-app");

    let books = catalog::load_books(&args.books)?;
    tracing::info!(count = books.len(), "book catalog ready");

    let state = AppState {
        books: Arc::new(books),
        catalog: steps::builtin(),
        sessions: Arc::new(Mutex::new(HashMap::new())),
        lists: Arc::new(Mutex::new(ReadingLists::open(&args.data_dir))),
    };

    let app = Router::new()
        .route("/healthz", get(|| async { "ok\n" }))
        .route("/api/steps", get(list_steps))
        .route("/api/stats", get(library_stats))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:session_id", get(session_view))
        .route("/api/sessions/:session_id/answers", post(submit_answer))
        .route("/api/sessions/:session_id/back", post(go_back))
        .route("/api/sessions/:session_id/restart", post(restart))
        .route("/api/sessions/:session_id/select", post(select_result))
        .route("/api/lists", get(lists_view))
        .route("/api/lists/:book_id", put(set_list).delete(remove_list))
        .route("/api/lists/:book_id/toggle", post(toggle_list))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .map_err(|err| anyhow::anyhow!("bind {}: {err}", args.addr))?;
    tracing::info!(addr = %args.addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

type ApiError = (StatusCode, String);

fn bad_request(err: anyhow::Error) -> ApiError {
    (StatusCode::BAD_REQUEST, format!("{err:#}"))
}

fn not_found(what: &str) -> ApiError {
    (StatusCode::NOT_FOUND, format!("{what} not found"))
}

async fn list_steps(State(state): State<AppState>) -> Json<&'static [Step]> {
    Json(state.catalog.steps())
}

async fn library_stats(State(state): State<AppState>) -> Json<LibraryStats> {
    Json(stats::library_stats(&state.books))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum PhaseView {
    Asking,
    Calculating,
    Results,
}

#[derive(Debug, Serialize)]
struct SessionView {
    session_id: Uuid,
    phase: PhaseView,
    step_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    step_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    step: Option<&'static Step>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    profile: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    results: Option<Vec<Recommendation>>,
    started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    finished_at: Option<DateTime<Utc>>,
}

fn view(session_id: Uuid, session: &Session, catalog: &'static StepCatalog) -> SessionView {
    let (phase, step_index) = match session.phase() {
        Phase::Asking(index) => (PhaseView::Asking, Some(index)),
        Phase::Calculating => (PhaseView::Calculating, None),
        Phase::Results => (PhaseView::Results, None),
    };
    SessionView {
        session_id,
        phase,
        step_count: catalog.len(),
        step_index,
        step: session.current_step(catalog),
        profile: session.profile_summary(catalog),
        results: session.results().ok().map(<[Recommendation]>::to_vec),
        started_at: session.started_at,
        finished_at: session.finished_at,
    }
}

fn get_session(state: &AppState, session_id: Uuid) -> Result<SharedSession, ApiError> {
    let sessions = state
        .sessions
        .lock()
        .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "session map poisoned".into()))?;
    sessions
        .get(&session_id)
        .cloned()
        .ok_or_else(|| not_found("session"))
}

async fn create_session(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    let session_id = Uuid::new_v4();
    let session = Session::new();
    let body = view(session_id, &session, state.catalog);
    state
        .sessions
        .lock()
        .map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "session map poisoned".to_string(),
            )
        })?
        .insert(session_id, Arc::new(SessionMutex::new(session)));
    tracing::info!(%session_id, "wizard session created");
    Ok(Json(body))
}

async fn session_view(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let session = get_session(&state, session_id)?;
    let guard = session.lock().await;
    Ok(Json(view(session_id, &guard, state.catalog)))
}

#[derive(Debug, Deserialize)]
struct AnswerBody {
    step_id: String,
    value: String,
}

async fn submit_answer(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(body): Json<AnswerBody>,
) -> Result<Json<SessionView>, ApiError> {
    let session = get_session(&state, session_id)?;
    let mut guard = session.lock().await;
    let transition = guard
        .choose(state.catalog, &body.step_id, &body.value)
        .map_err(bad_request)?;

    if transition == Transition::ReadyToScore {
        // Scoring runs on its own task after the reveal delay, so clients
        // observe the calculating phase. The sleep happens outside the
        // session lock; a restart issued meanwhile wins and the stale
        // results are dropped.
        let answers = guard.answers().clone();
        let books = Arc::clone(&state.books);
        let catalog = state.catalog;
        let session = Arc::clone(&session);
        tokio::spawn(async move {
            tokio::time::sleep(REVEAL_DELAY).await;
            let results = wizard::recommend(&books, &answers, catalog, SelectOptions::default());
            if let Err(err) = session.lock().await.complete(results) {
                tracing::debug!(%session_id, ?err, "session moved on before results were ready");
            }
        });
    }

    Ok(Json(view(session_id, &guard, state.catalog)))
}

async fn go_back(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let session = get_session(&state, session_id)?;
    let mut guard = session.lock().await;
    guard.back();
    Ok(Json(view(session_id, &guard, state.catalog)))
}

async fn restart(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let session = get_session(&state, session_id)?;
    let mut guard = session.lock().await;
    guard.restart();
    Ok(Json(view(session_id, &guard, state.catalog)))
}

#[derive(Debug, Deserialize)]
struct SelectBody {
    book_id: String,
}

async fn select_result(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(body): Json<SelectBody>,
) -> Result<Json<Book>, ApiError> {
    let session = get_session(&state, session_id)?;
    let guard = session.lock().await;
    let results = guard
        .results()
        .map_err(|err| (StatusCode::CONFLICT, format!("{err:#}")))?;
    let chosen = results
        .iter()
        .find(|item| item.book.id() == body.book_id)
        .ok_or_else(|| not_found("result"))?;
    tracing::info!(%session_id, book_id = %body.book_id, "result selected");
    Ok(Json(chosen.book.clone()))
}

#[derive(Debug, Serialize)]
struct ListsView {
    entries: std::collections::BTreeMap<String, ListId>,
    counts: ListCounts,
}

fn with_lists<T>(
    state: &AppState,
    f: impl FnOnce(&mut ReadingLists) -> anyhow::Result<T>,
) -> Result<T, ApiError> {
    let mut lists = state
        .lists
        .lock()
        .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "list store poisoned".into()))?;
    f(&mut lists).map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, format!("{err:#}")))
}

async fn lists_view(State(state): State<AppState>) -> Result<Json<ListsView>, ApiError> {
    with_lists(&state, |lists| {
        Ok(Json(ListsView {
            entries: lists.entries().clone(),
            counts: lists.counts(),
        }))
    })
}

#[derive(Debug, Deserialize)]
struct ListBody {
    list: ListId,
}

#[derive(Debug, Serialize)]
struct MembershipView {
    book_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    list: Option<ListId>,
}

async fn set_list(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    Json(body): Json<ListBody>,
) -> Result<Json<MembershipView>, ApiError> {
    with_lists(&state, |lists| {
        lists.set(&book_id, body.list);
        lists.save()?;
        Ok(Json(MembershipView {
            book_id: book_id.clone(),
            list: Some(body.list),
        }))
    })
}

async fn remove_list(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
) -> Result<Json<MembershipView>, ApiError> {
    with_lists(&state, |lists| {
        lists.remove(&book_id);
        lists.save()?;
        Ok(Json(MembershipView {
            book_id: book_id.clone(),
            list: None,
        }))
    })
}

async fn toggle_list(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
    Json(body): Json<ListBody>,
) -> Result<Json<MembershipView>, ApiError> {
    with_lists(&state, |lists| {
        let list = lists.toggle(&book_id, body.list);
        lists.save()?;
        Ok(Json(MembershipView {
            book_id: book_id.clone(),
            list,
        }))
    })
}
