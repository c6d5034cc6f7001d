#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use env_logger::Env;
use log::{debug, error};

use crate::{
    config::Config,
    lights::LightRegistry,
    model_client::ModelClient,
    openai_client::OpenAiClient,
    session::Session,
    tools::ToolTable,
};

mod config;
mod conversation;
mod lights;
mod model_client;
mod openai_client;
mod session;
mod tools;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Logging startup
    {
        let env = Env::default().filter_or("RUST_LOG", "lightchain=debug");
        env_logger::init_from_env(env);
        debug!("Starting up.");
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("{err}");
            eprintln!("lightchain: {err}");
            std::process::exit(1);
        }
    };

    let model = config.model.clone();

    let mut session = Session::new(
        make_client(&config),
        ToolTable::lights_control(),
        LightRegistry::default_installation(),
        model,
    );

    session.run().await;
}

fn make_client(config: &Config) -> Box<dyn ModelClient> {
    Box::new(OpenAiClient::new(config))
}
