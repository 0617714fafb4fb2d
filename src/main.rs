use std::sync::Arc;

use loadboard::config::Config;
use loadboard::engine::Engine;
use loadboard::error::Error;
use loadboard::external::load_board::LoadBoardClient;
use loadboard::server::serve;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let client = LoadBoardClient::new(config.api_base.clone());
    let engine = Engine::new(Arc::new(client))?;

    serve(engine, &config).await
}
