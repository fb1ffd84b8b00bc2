mod api;
mod calendar;
mod commands;
mod config;
mod content;
mod engagement;
mod feed;
mod hype;
mod index;
mod render;
mod store;
mod user;
mod utils;

use std::error::Error;

use api::cms::CmsClient;
use config::{Command, Config};
use log::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::parse();
    config.init_logger();
    info!("# Fanz #");
    info!("");

    let client = CmsClient::new(&config);
    match config.command.clone() {
        Command::Feed { view } => commands::feed(&config, &client, view).await?,
        Command::Index => commands::index(&client).await?,
        Command::Suggestions => commands::list_suggestions(&config)?,
        Command::Fan { id } => commands::fan(&config, &id)?,
        Command::Hype { movie } => commands::hype(&config, &movie)?,
        Command::Badges => commands::badges(&config)?,
        Command::React { post, label } => commands::react(&config, &client, &post, &label).await?,
        Command::Say { post, phrase } => commands::say(&config, &client, &post, &phrase).await?,
        Command::Login { username, password } => {
            commands::login(&client, &username, &password).await?
        }
        Command::Check => commands::check(&config, &client).await?,
        Command::Profile(args) => commands::profile(&config, &client, args).await?,
        Command::Users(command) => commands::users(&config, &client, command).await?,
        Command::Publish { file } => commands::publish(&config, &client, &file).await?,
    }

    info!("");
    info!("All done!");
    Ok(())
}
