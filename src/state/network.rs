use crate::state::messages::{NetworkRequest, NetworkResponse};
use log::{debug, error, warn};
use match_api::client::{MatchStoreClient, StoreResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Executes Match Store calls in the order the console issued them.
///
/// The clock has already moved on by the time a call runs; a failure is
/// reported back as `NetworkResponse::Error` and never retried.
pub struct NetworkWorker {
    client: MatchStoreClient,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        client: MatchStoreClient,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let action = request.action();
            let result = self.execute(request).await;

            debug!("{action} complete");
            self.stop_loading_animation(result.is_ok()).await;

            let response = result.unwrap_or_else(|err| {
                warn!("{action} failed: {err}");
                NetworkResponse::Error { action, message: err.to_string() }
            });

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn execute(&self, request: NetworkRequest) -> StoreResult<NetworkResponse> {
        let action = request.action();
        match request {
            NetworkRequest::LoadMatch { match_id } => {
                debug!("loading match {match_id}");
                let record = self.client.get_match(&match_id).await?;
                return Ok(NetworkResponse::MatchLoaded { record });
            }
            NetworkRequest::StartMatch { match_id } => {
                self.client.start_match(&match_id).await?;
            }
            NetworkRequest::UpdateScoreboard { match_id, scoreboard } => {
                self.client.update_scoreboard(&match_id, &scoreboard).await?;
            }
            NetworkRequest::EndMatch { match_id, result } => {
                self.client.end_match(&match_id, &result).await?;
            }
            NetworkRequest::UpdateResult { match_id, scoreboard, result } => {
                self.client.update_result(&match_id, &scoreboard, &result).await?;
            }
        }
        Ok(NetworkResponse::Acknowledged { action })
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(80));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}
