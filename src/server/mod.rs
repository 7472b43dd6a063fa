pub mod api;

use crate::agent::OrbAgent;
use crate::cli::Args;
use api::AppState;
use std::error::Error;

pub struct Server {
    state: AppState,
    args: Args,
}

impl Server {
    pub fn new(agent: OrbAgent, args: Args) -> Self {
        let state = AppState::new(agent, args.rate_limit_per_min);
        Self { state, args }
    }

    pub async fn run(self) -> Result<(), Box<dyn Error + Send + Sync>> {
        api::start_http_server(self.state, &self.args).await
    }
}
