//! HTTP + WebSocket API for swipe sessions
//!
//! Endpoints:
//! - POST /session/new - Create new session
//! - GET /session/{id} - Get session status
//! - DELETE /session/{id} - End a session
//! - POST /session/{id}/swipe - Trigger a swipe on the top card
//! - POST /session/{id}/drag - Release a drag at an offset
//! - POST /session/{id}/undo - Undo the last decision
//! - POST /session/{id}/reset - Start over, optionally with new records
//! - GET /session/{id}/liked - Liked records
//! - DELETE /session/{id}/liked/{record_id} - Un-like a record
//! - WS /ws/{id} - Live updates
//! - GET /health - Health check
//!
//! Every mutation runs the session clock until idle before answering, so a
//! response always describes a settled deck.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::core::{LikedCollection, SessionStatus, SwipeSession};
use crate::error::DeckError;
use crate::types::{CardFrame, Direction, Record, RecordId, SessionEvent};

/// One browsing session plus its live-update channel
#[derive(Debug)]
pub struct ApiSession {
    pub id: String,
    pub session: SwipeSession<LikedCollection>,
    pub update_tx: broadcast::Sender<SessionUpdate>,
}

/// Live update message
#[derive(Debug, Clone, Serialize)]
pub struct SessionUpdate {
    pub session_id: String,
    pub status: SessionStatus,
    pub events: Vec<SessionEvent>,
    pub liked_count: usize,
}

/// App state
pub struct AppState {
    pub sessions: RwLock<HashMap<String, ApiSession>>,
    pub config: EngineConfig,
    /// Deck used when a request brings no records
    pub default_records: Vec<Record>,
}

/// Create new session request
#[derive(Debug, Default, Deserialize)]
pub struct NewSessionRequest {
    pub records: Option<Vec<Record>>,
}

/// Create new session response
#[derive(Debug, Serialize)]
pub struct NewSessionResponse {
    pub session_id: String,
    pub websocket_url: String,
}

/// Session status response
#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    pub cursor: usize,
    pub total: usize,
    pub exhausted: bool,
    pub top: Option<RecordId>,
    pub liked_count: usize,
    pub frames: Vec<CardFrame>,
}

/// Swipe request
#[derive(Debug, Deserialize)]
pub struct SwipeRequest {
    pub direction: Direction,
}

/// Drag release request
#[derive(Debug, Deserialize)]
pub struct DragRequest {
    pub offset: f64,
}

/// Reset request
#[derive(Debug, Default, Deserialize)]
pub struct ResetRequest {
    pub records: Option<Vec<Record>>,
}

/// Response for every mutating call
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub events: Vec<SessionEvent>,
    pub status: SessionStatus,
    pub liked_count: usize,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions_active: usize,
}

/// Create the API router
pub fn create_router(config: EngineConfig, default_records: Vec<Record>) -> Router {
    let state = Arc::new(AppState {
        sessions: RwLock::new(HashMap::new()),
        config,
        default_records,
    });

    Router::new()
        .route("/health", get(health))
        .route("/session/new", post(create_session))
        .route("/session/:id", get(get_session).delete(delete_session))
        .route("/session/:id/swipe", post(swipe))
        .route("/session/:id/drag", post(drag))
        .route("/session/:id/undo", post(undo))
        .route("/session/:id/reset", post(reset))
        .route("/session/:id/liked", get(get_liked))
        .route("/session/:id/liked/:record_id", delete(remove_liked))
        .route("/ws/:id", get(websocket_handler))
        .with_state(state)
}

/// Map deck precondition failures onto HTTP status codes
pub fn deck_error_status(err: &DeckError) -> StatusCode {
    match err {
        DeckError::NotActiveCard { .. } | DeckError::NothingToUndo => StatusCode::CONFLICT,
        DeckError::OutOfRecords { .. } => StatusCode::GONE,
        DeckError::DuplicateRecord(_) => StatusCode::BAD_REQUEST,
    }
}

fn reject(err: DeckError) -> StatusCode {
    let status = deck_error_status(&err);
    warn!(error = %err, status = status.as_u16(), "request refused");
    status
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let sessions = state.sessions.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        sessions_active: sessions.len(),
    })
}

/// Create new session
async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewSessionRequest>,
) -> Result<Json<NewSessionResponse>, StatusCode> {
    let records = req
        .records
        .unwrap_or_else(|| state.default_records.clone());
    let session = SwipeSession::new(records, state.config.clone(), LikedCollection::new())
        .map_err(reject)?;

    let session_id = generate_session_id();
    let (tx, _) = broadcast::channel(100);
    info!(session = %session_id, total = session.deck().len(), "session created");

    let mut sessions = state.sessions.write().await;
    sessions.insert(
        session_id.clone(),
        ApiSession {
            id: session_id.clone(),
            session,
            update_tx: tx,
        },
    );

    Ok(Json(NewSessionResponse {
        session_id: session_id.clone(),
        websocket_url: format!("/ws/{}", session_id),
    }))
}

/// Get session status
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatusResponse>, StatusCode> {
    let sessions = state.sessions.read().await;
    let entry = sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let status = entry.session.status();

    Ok(Json(SessionStatusResponse {
        session_id: id,
        cursor: status.cursor,
        total: status.total,
        exhausted: status.exhausted,
        top: status.active,
        liked_count: entry.session.host().len(),
        frames: entry.session.frames(),
    }))
}

/// End a session; live sockets close once the update channel drops
async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> StatusCode {
    match state.sessions.write().await.remove(&id) {
        Some(entry) => {
            info!(session = %id, decided = entry.session.deck().cursor(), "session closed");
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

/// Trigger a swipe on the top card
async fn swipe(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<SwipeRequest>,
) -> Result<Json<ActionResponse>, StatusCode> {
    mutate(&state, &id, |session| session.trigger_swipe(req.direction)).await
}

/// Release a drag at the given offset
async fn drag(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<DragRequest>,
) -> Result<Json<ActionResponse>, StatusCode> {
    if !req.offset.is_finite() {
        return Err(StatusCode::BAD_REQUEST);
    }
    mutate(&state, &id, |session| {
        let mut events = session.drag_move(req.offset)?;
        events.extend(session.drag_end(req.offset)?);
        Ok(events)
    })
    .await
}

/// Undo the last decision
async fn undo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ActionResponse>, StatusCode> {
    mutate(&state, &id, |session| session.undo()).await
}

/// Start over; new records replace the deck, otherwise the current one restarts
async fn reset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<ResetRequest>,
) -> Result<Json<ActionResponse>, StatusCode> {
    mutate(&state, &id, |session| match req.records {
        Some(records) => session.initialize_deck(records),
        None => session.restart(),
    })
    .await
}

/// Liked records in decision order
async fn get_liked(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Record>>, StatusCode> {
    let sessions = state.sessions.read().await;
    let entry = sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(entry.session.host().records().to_vec()))
}

/// Un-like a record
async fn remove_liked(
    State(state): State<Arc<AppState>>,
    Path((id, record_id)): Path<(String, String)>,
) -> Result<StatusCode, StatusCode> {
    let mut sessions = state.sessions.write().await;
    let entry = sessions.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    let removed = entry.session.host_mut().remove(&RecordId::new(record_id));
    if removed.is_none() {
        return Err(StatusCode::NOT_FOUND);
    }
    broadcast_update(entry, Vec::new());
    Ok(StatusCode::NO_CONTENT)
}

/// Apply `op`, settle the clock, broadcast, answer
async fn mutate<F>(state: &AppState, id: &str, op: F) -> Result<Json<ActionResponse>, StatusCode>
where
    F: FnOnce(&mut SwipeSession<LikedCollection>) -> Result<Vec<SessionEvent>, DeckError>,
{
    let mut sessions = state.sessions.write().await;
    let entry = sessions.get_mut(id).ok_or(StatusCode::NOT_FOUND)?;

    let mut events = op(&mut entry.session).map_err(reject)?;
    events.extend(entry.session.run_until_idle());
    debug!(session = %id, events = events.len(), "mutation applied");

    broadcast_update(entry, events.clone());
    Ok(Json(ActionResponse {
        events,
        status: entry.session.status(),
        liked_count: entry.session.host().len(),
    }))
}

fn broadcast_update(entry: &ApiSession, events: Vec<SessionEvent>) {
    let update = SessionUpdate {
        session_id: entry.id.clone(),
        status: entry.session.status(),
        events,
        liked_count: entry.session.host().len(),
    };
    // no subscribers is fine
    let _ = entry.update_tx.send(update);
}

/// WebSocket handler for live updates
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, StatusCode> {
    let sessions = state.sessions.read().await;
    let entry = sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let rx = entry.update_tx.subscribe();
    drop(sessions);

    Ok(ws.on_upgrade(move |socket| async move {
        handle_websocket(socket, rx).await;
    }))
}

/// Forward updates until either side goes away
async fn handle_websocket(socket: WebSocket, mut rx: broadcast::Receiver<SessionUpdate>) {
    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(update) => {
                    let json = match serde_json::to_string(&update) {
                        Ok(json) => json,
                        Err(err) => {
                            warn!(error = %err, "failed to encode update");
                            continue;
                        }
                    };
                    if sender.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "websocket subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if matches!(msg, Message::Close(_)) {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }
}

/// Generate session ID
fn generate_session_id() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let nanos = chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default() as u64;
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("session_{:x}{:04x}", nanos, seq & 0xffff)
}

/// Run the API server
pub async fn run_server(
    addr: &str,
    config: EngineConfig,
    default_records: Vec<Record>,
) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router(config, default_records);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "swipedeck API listening");
    println!("Swipedeck API running on {}", addr);
    println!("  POST   /session/new              - Create session");
    println!("  GET    /session/:id              - Get status");
    println!("  DELETE /session/:id              - End session");
    println!("  POST   /session/:id/swipe        - Swipe top card");
    println!("  POST   /session/:id/drag         - Release drag");
    println!("  POST   /session/:id/undo         - Undo last decision");
    println!("  POST   /session/:id/reset        - Start over");
    println!("  GET    /session/:id/liked        - Liked records");
    println!("  DELETE /session/:id/liked/:rid   - Un-like");
    println!("  WS     /ws/:id                   - Live updates");
    println!("  GET    /health                   - Health check");
    axum::serve(listener, router).await?;
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
