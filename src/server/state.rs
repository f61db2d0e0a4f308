use axum::extract::FromRef;

use crate::repertoire::RepertoireService;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use super::ServerConfig;

/// The mutex serializes every load-mutate-save sequence against the
/// backing document. Without it two overlapping requests could read the
/// same base state and the later write would clobber the earlier one.
pub type GuardedRepertoire = Arc<Mutex<RepertoireService>>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub repertoire: GuardedRepertoire,
}

impl ServerState {
    pub fn new(service: RepertoireService, config: ServerConfig) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            repertoire: Arc::new(Mutex::new(service)),
        }
    }
}

impl FromRef<ServerState> for GuardedRepertoire {
    fn from_ref(input: &ServerState) -> Self {
        input.repertoire.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
