use anyhow::Result;
use std::time::Duration;

use tracing::error;

use crate::repertoire::{NewSong, RepertoireError, RepertoireService, Song, SongPatch};

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use super::{log_requests, state::*, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct MutationResponse {
    status: &'static str,
    message: &'static str,
    song: Song,
}

#[derive(Serialize)]
struct DeletionResponse {
    status: &'static str,
    message: &'static str,
}

impl IntoResponse for RepertoireError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            RepertoireError::MissingRequiredField | RepertoireError::NoFieldsToUpdate => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            RepertoireError::SongNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            RepertoireError::Storage(err) => {
                // Generic message for the caller, detail goes to the log.
                error!("Storage failure: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred on the server".to_owned(),
                )
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
    };
    Json(stats)
}

async fn list_songs(State(repertoire): State<GuardedRepertoire>) -> Response {
    match repertoire.lock().unwrap().list() {
        Ok(songs) => Json(songs).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn create_song(
    State(repertoire): State<GuardedRepertoire>,
    Json(draft): Json<NewSong>,
) -> Response {
    match repertoire.lock().unwrap().create(draft) {
        Ok(song) => (
            StatusCode::CREATED,
            Json(MutationResponse {
                status: "OK",
                message: "Song added to the repertoire",
                song,
            }),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

async fn update_song(
    State(repertoire): State<GuardedRepertoire>,
    Path(id): Path<u64>,
    Json(patch): Json<SongPatch>,
) -> Response {
    match repertoire.lock().unwrap().update(id, patch) {
        Ok(song) => Json(MutationResponse {
            status: "OK",
            message: "Song updated",
            song,
        })
        .into_response(),
        Err(err) => err.into_response(),
    }
}

async fn delete_song(State(repertoire): State<GuardedRepertoire>, Path(id): Path<u64>) -> Response {
    match repertoire.lock().unwrap().delete(id) {
        Ok(()) => Json(DeletionResponse {
            status: "OK",
            message: "Song removed from the repertoire",
        })
        .into_response(),
        Err(err) => err.into_response(),
    }
}

fn make_app(service: RepertoireService, config: ServerConfig) -> Router {
    let state = ServerState::new(service, config);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let song_routes: Router = Router::new()
        .route("/canciones", get(list_songs).post(create_song))
        .route("/canciones/{id}", put(update_song).delete(delete_song))
        .with_state(state.clone());

    Router::new()
        .route("/", get(home))
        .with_state(state.clone())
        .merge(song_routes)
        .layer(axum::middleware::from_fn_with_state(state, log_requests))
        .layer(cors)
}

pub async fn run_server(service: RepertoireService, config: ServerConfig) -> Result<()> {
    let port = config.port;
    let app = make_app(service, config);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    Ok(axum::serve(listener, app).await?)
}
