use std::sync::Arc;

use crate::{auth::session::SessionVerifier, clients::mega_client::MegaClient};

/// Shared state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub mega_client: Arc<MegaClient>,
    pub session_verifier: Arc<dyn SessionVerifier>,
}

impl AppState {
    pub fn new(mega_client: MegaClient, session_verifier: impl SessionVerifier + 'static) -> Self {
        Self {
            mega_client: Arc::new(mega_client),
            session_verifier: Arc::new(session_verifier),
        }
    }
}
