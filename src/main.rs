use anyhow::Context;
use subscription_capture::configuration::get_configuration;
use subscription_capture::configuration::get_environment;
use subscription_capture::startup::Site;
use subscription_capture::surfaces::View;
use subscription_capture::telemetry::get_subscriber;
use subscription_capture::telemetry::init_subscriber;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;

/// Initialise telemetry, load config, then feed every line of stdin to the
/// hero capture block, one submission at a time.
///
/// ```sh
///     printf 'not-an-email\nuser@example.com\n' | cargo run | bunyan
/// ```
#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cfg = get_configuration().context("could not load configuration")?;

    let subscriber = get_subscriber(
        &cfg.application.name,
        &cfg.application.log_level,
        std::io::stdout,
    );
    init_subscriber(subscriber)?;
    tracing::info!(env = %get_environment()?, "configuration loaded");

    let site = Site::build(cfg);
    // a fresh block per line: a block that has shown success keeps showing it
    // until the user navigates away
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let hero = site.mount_hero();
        hero.update_input(line)?;
        let outcome = hero.submit()?;
        let state = hero.controller().settled().await;
        tracing::info!(
            surface = %hero.surface(),
            ?outcome,
            %state,
            view = ?View::from(&state),
            "capture settled"
        );
    }

    Ok(())
}
