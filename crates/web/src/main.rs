use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    routing::{get, post},
    Router,
};
use maud::Markup;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use stargaze_core::domain::neo::Direction;
use stargaze_core::ingest::{NasaClient, SpaceDataClient};
use stargaze_core::pagination::{self, MissingLink, NavigationOutcome, NeoPaginator};
use stargaze_core::time::window::{parse_date, DateWindow};

mod error;
mod sessions;
mod views;

use error::PageError;
use sessions::SessionStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = stargaze_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let client: Option<Arc<dyn SpaceDataClient>> = match NasaClient::from_settings(&settings) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "NASA client unavailable; starting web in degraded mode");
            None
        }
    };

    let max_sessions = std::env::var("STARGAZE_MAX_SESSIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(sessions::DEFAULT_MAX_SESSIONS);

    let state = AppState {
        client,
        sessions: SessionStore::new(max_sessions),
    };

    let app = router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, max_sessions, "web listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/apod", get(apod))
        .route("/neows", get(neows_start))
        .route("/neows/:id", get(neows_show))
        .route("/neows/:id/:direction", post(neows_navigate))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[derive(Clone)]
struct AppState {
    client: Option<Arc<dyn SpaceDataClient>>,
    sessions: SessionStore,
}

impl AppState {
    fn client(&self) -> Result<Arc<dyn SpaceDataClient>, PageError> {
        self.client.clone().ok_or_else(PageError::unconfigured)
    }
}

async fn healthz() -> &'static str {
    "ok"
}

async fn index() -> Markup {
    views::index_page()
}

async fn apod(State(state): State<AppState>) -> Result<Markup, PageError> {
    let client = state.client()?;
    let apod = client.fetch_apod().await.map_err(PageError::upstream)?;
    Ok(views::apod_page(&apod))
}

#[derive(Debug, Deserialize)]
struct WindowQuery {
    start_date: Option<String>,
    end_date: Option<String>,
}

async fn neows_start(
    State(state): State<AppState>,
    Query(q): Query<WindowQuery>,
) -> Result<Redirect, PageError> {
    let window = DateWindow::resolve(q.start_date.as_deref(), q.end_date.as_deref())
        .map_err(PageError::bad_request)?;
    let client = state.client()?;

    let feed = client
        .fetch_neo_feed(window)
        .await
        .map_err(PageError::upstream)?;

    let id = state.sessions.insert(NeoPaginator::new(feed)).await;
    let sessions = state.sessions.len().await;
    tracing::info!(session = %id, %window, sessions, "neows session started");

    Ok(Redirect::to(&format!("/neows/{id}")))
}

#[derive(Debug, Deserialize)]
struct SelectQuery {
    date: Option<String>,
}

async fn neows_show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<SelectQuery>,
) -> Result<Markup, PageError> {
    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| PageError::not_found("unknown or expired neows session"))?;

    let mut paginator = session.lock().await;
    if let Some(date) = q.date.as_deref() {
        let date = parse_date(date).map_err(PageError::bad_request)?;
        paginator
            .select(date)
            .map_err(|e| PageError::not_found(e.to_string()))?;
    }

    Ok(views::neows_page(id, &paginator))
}

async fn neows_navigate(
    State(state): State<AppState>,
    Path((id, direction)): Path<(Uuid, String)>,
) -> Result<Redirect, PageError> {
    let direction: Direction = direction
        .parse()
        .map_err(|e: anyhow::Error| PageError::not_found(e.to_string()))?;

    let session = state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| PageError::not_found("unknown or expired neows session"))?;

    let client = state.client()?;
    let outcome = pagination::navigate(&session, client.as_ref(), direction)
        .await
        .map_err(|e| match e.downcast_ref::<MissingLink>() {
            Some(missing) => PageError::not_found(format!("there is no {} page", missing.direction)),
            None => PageError::upstream(e),
        })?;

    if outcome == NavigationOutcome::Applied {
        tracing::info!(session = %id, %direction, "neows page changed");
    }

    Ok(Redirect::to(&format!("/neows/{id}")))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &stargaze_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
