pub mod agent;
pub mod cli;
pub mod error;
pub mod history;
pub mod llm;
pub mod media;
pub mod models;
pub mod server;

use agent::ChatAgent;
use cli::Args;
use history::initialize_conversation_store;
use llm::{ new_generator, GeneratorConfig, GeneratorType };
use log::info;
use media::MediaIngestor;
use server::api::AppState;
use server::Server;
use std::error::Error;
use std::time::Duration;

/// Wires store, generator and media ingestor into the shared handler state.
pub fn build_state(args: &Args) -> Result<AppState, Box<dyn Error + Send + Sync>> {
    args.validate()?;

    let store = initialize_conversation_store(args)?;
    let generator_config = GeneratorConfig {
        generator_type: args.generator_type.parse::<GeneratorType>()?,
        delay: Duration::from_millis(args.response_delay_ms),
    };
    let generator = new_generator(&generator_config)?;
    info!("Response generator configured: Type={}, Delay={:?}", generator.name(), generator_config.delay);

    let agent = ChatAgent::new(
        store.clone(),
        generator,
        args.available_models.clone(),
        args.default_model.clone()
    );
    let media = MediaIngestor::new(store, &args.upload_dir);
    Ok(AppState::new(agent, media))
}

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("History Store Type: {}", args.history_type);
    info!("Available Models: {}", args.available_models.join(", "));
    info!("Default Model: {}", args.default_model);
    info!("Generator Type: {}", args.generator_type);
    info!("Response Delay (ms): {}", args.response_delay_ms);
    info!("Upload Directory: {}", args.upload_dir);
    match args.max_upload_bytes {
        Some(limit) => info!("Max Upload Bytes: {}", limit),
        None => info!("Max Upload Bytes: unlimited"),
    }
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let state = build_state(&args)?;
    let server = Server::new(args.server_addr.clone(), state, args);
    server.run().await?;

    Ok(())
}
