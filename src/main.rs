use anyhow::Result;
use clap::Parser;

use coreceptor_submit::app::App;
use coreceptor_submit::config::Config;
use coreceptor_submit::logger;

#[tokio::main]
async fn main() -> Result<()> {
    logger::init();

    let config = Config::parse();

    let mut app = App::initialize(config).await?;
    let outcome = app.run().await;

    // The browser is released on every exit path, failed runs included.
    app.shutdown().await;

    outcome
}
