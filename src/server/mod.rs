//! `serve` mode: the `/chat` backend the widget talks to.

pub mod error;
pub mod text;
pub mod triage;

use std::collections::HashMap;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, State};
use axum::routing::post;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::common::{ChatReply, ChatRequest};

use error::ServerError;
use triage::Conversation;

/// Conversations keyed by client IP, kept for the lifetime of the process.
#[derive(Default)]
pub struct ServerState {
    conversations: Mutex<HashMap<IpAddr, Conversation>>,
}

pub fn router() -> Router {
    Router::new()
        .route("/chat", post(chat))
        .with_state(Arc::new(ServerState::default()))
}

pub async fn serve(listen: &str) -> io::Result<()> {
    let listener = TcpListener::bind(listen).await?;
    serve_on(listener).await
}

pub async fn serve_on(listener: TcpListener) -> io::Result<()> {
    log::info!("Chat backend listening on {}", listener.local_addr()?);
    axum::serve(
        listener,
        router().into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
}

async fn chat(
    State(state): State<Arc<ServerState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ServerError> {
    let Json(request) = payload.map_err(|rejection| ServerError::BadRequest(rejection.body_text()))?;

    let mut conversations = state.conversations.lock().await;
    let conversation = conversations.entry(peer.ip()).or_default();
    let response = conversation.reply(&request.message);
    log::debug!("{} -> {:?}", peer.ip(), conversation.step());

    Ok(Json(ChatReply { response }))
}
