//! Axum web server with WebSocket streaming for trace playback.

use std::sync::Arc;

use algoscope_trace::PlaybackStatus;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;

use crate::command::{execute, Command, Reply};
use crate::config::VisConfig;
use crate::error::{Error, Result};
use crate::request::TraceRequest;
use crate::session::PlaybackSession;

const UPDATE_BUFFER: usize = 64;

/// Shared application state.
pub struct AppState {
    pub(crate) session: RwLock<Box<dyn PlaybackSession>>,
    pub(crate) autoplay: Mutex<Option<JoinHandle<()>>>,
    updates: broadcast::Sender<PlaybackStatus>,
}

impl AppState {
    /// Wrap `session`, paused, with the given auto-play speed.
    pub fn new(mut session: Box<dyn PlaybackSession>, speed_ms: u64) -> Arc<Self> {
        session.set_speed(speed_ms);
        let (updates, _) = broadcast::channel(UPDATE_BUFFER);
        Arc::new(Self {
            session: RwLock::new(session),
            autoplay: Mutex::new(None),
            updates,
        })
    }

    /// Receive a status after every change.
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackStatus> {
        self.updates.subscribe()
    }

    pub(crate) fn publish(&self, status: PlaybackStatus) {
        // No subscribers is fine.
        let _ = self.updates.send(status);
    }
}

/// Visualization server.
pub struct VisServer {
    state: Arc<AppState>,
}

impl VisServer {
    /// Start on the default demo trace.
    pub fn new(config: &VisConfig) -> Result<Self> {
        let session = TraceRequest::default().generate()?;
        Ok(Self::with_session(session, config))
    }

    pub fn with_session(session: Box<dyn PlaybackSession>, config: &VisConfig) -> Self {
        Self {
            state: AppState::new(session, config.speed_ms),
        }
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/status", get(status_handler))
            .route("/api/trace", post(trace_handler))
            .route("/api/frame", get(frame_handler))
            .route("/api/playback", get(playback_status_handler))
            .route("/api/playback/play", post(play_handler))
            .route("/api/playback/pause", post(pause_handler))
            .route("/api/playback/reset", post(reset_handler))
            .route("/api/playback/next", post(next_handler))
            .route("/api/playback/prev", post(prev_handler))
            .route("/api/playback/seek", post(seek_handler))
            .route("/api/playback/speed", post(speed_handler))
            // WebSocket for real-time updates
            .route("/ws", get(ws_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Run the server on the given port.
    pub async fn serve(self, port: u16) -> Result<()> {
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Visualization server running on http://localhost:{}", port);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

/// Server status response.
#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
    algorithm: String,
    total_steps: usize,
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let status = state.session.read().await.status();
    Json(StatusResponse {
        status: "ok",
        algorithm: status.algorithm,
        total_steps: status.total_steps,
    })
}

async fn run(state: &Arc<AppState>, command: Command) -> Result<Json<Reply>> {
    Ok(Json(execute(state, command).await?))
}

async fn trace_handler(State(state): State<Arc<AppState>>, Json(request): Json<TraceRequest>) -> Result<Json<Reply>> {
    run(&state, Command::Trace { request }).await
}

async fn frame_handler(State(state): State<Arc<AppState>>) -> Result<Json<Reply>> {
    run(&state, Command::GetFrame).await
}

async fn playback_status_handler(State(state): State<Arc<AppState>>) -> Result<Json<Reply>> {
    run(&state, Command::GetStatus).await
}

async fn play_handler(State(state): State<Arc<AppState>>) -> Result<Json<Reply>> {
    run(&state, Command::Play).await
}

async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<Reply>> {
    run(&state, Command::Pause).await
}

async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<Reply>> {
    run(&state, Command::Reset).await
}

async fn next_handler(State(state): State<Arc<AppState>>) -> Result<Json<Reply>> {
    run(&state, Command::Next).await
}

async fn prev_handler(State(state): State<Arc<AppState>>) -> Result<Json<Reply>> {
    run(&state, Command::Prev).await
}

#[derive(Deserialize)]
struct SeekRequest {
    index: usize,
}

async fn seek_handler(State(state): State<Arc<AppState>>, Json(req): Json<SeekRequest>) -> Result<Json<Reply>> {
    run(&state, Command::Seek { index: req.index }).await
}

#[derive(Deserialize)]
struct SpeedRequest {
    ms: u64,
}

async fn speed_handler(State(state): State<Arc<AppState>>, Json(req): Json<SpeedRequest>) -> Result<Json<Reply>> {
    run(&state, Command::Speed { ms: req.ms }).await
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    let mut updates = state.subscribe();

    // Send the current frame first
    let first = reply_or_error(execute(&state, Command::GetFrame).await);
    if send(&mut socket, &first).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    let reply = match serde_json::from_str::<Command>(&text) {
                        Ok(command) => reply_or_error(execute(&state, command).await),
                        Err(e) => reply_or_error(Err(Error::InvalidCommand(e.to_string()))),
                    };
                    if send(&mut socket, &reply).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
            update = updates.recv() => match update {
                Ok(status) => {
                    if send(&mut socket, &Reply::Status(status)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "websocket client fell behind");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }
    tracing::debug!("websocket closed");
}

fn reply_or_error(result: Result<Reply>) -> Reply {
    result.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "websocket command rejected");
        Reply::Error { message: e.to_string() }
    })
}

async fn send(socket: &mut WebSocket, reply: &Reply) -> Result<()> {
    let json = serde_json::to_string(reply)?;
    socket.send(Message::Text(json.into())).await?;
    Ok(())
}
