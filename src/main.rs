// Copyright (c) 2026 Ragchat
// SPDX-License-Identifier: BUSL-1.1
//! Interactive terminal front end for the assistant.
//!
//! Presentation-layer collaborator: owns rendering and input collection,
//! calls `handle_turn` per line and `reset_session` on the `reset` command.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use ragchat_node::embeddings::{EmbeddingProvider, HashEmbedder, HttpEmbeddingClient};
use ragchat_node::{AssistantConfig, ChatEngine, ChatError, HttpLlmClient};

#[derive(Parser, Debug)]
#[command(name = "ragchat-node", about = "Retrieval-augmented chat assistant")]
struct Args {
    /// Path to a TOML configuration file; defaults plus env vars when omitted
    #[arg(short, long, env = "RAGCHAT_CONFIG")]
    config: Option<PathBuf>,

    /// Session identifier; a fresh one is generated when omitted
    #[arg(short, long)]
    session: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => AssistantConfig::load(path)?,
        None => AssistantConfig::from_env()?,
    };
    let timeout = Duration::from_secs(config.request_timeout_secs);

    let embedder: Arc<dyn EmbeddingProvider> = match &config.embedding.endpoint {
        Some(endpoint) => Arc::new(HttpEmbeddingClient::new(
            endpoint.clone(),
            config.embedding.model.clone(),
            config.embedding.api_key.clone(),
            config.embedding_dimension,
            timeout,
        )?),
        None => Arc::new(HashEmbedder::new(config.embedding_dimension)),
    };

    let llm_endpoint = config
        .llm
        .endpoint
        .clone()
        .context("llm.endpoint is required (config file or RAGCHAT_LLM_ENDPOINT)")?;
    let llm = Arc::new(HttpLlmClient::new(
        llm_endpoint,
        config.llm.model.clone(),
        config.llm.api_key.clone(),
        timeout,
    )?);

    let engine = ChatEngine::new(config, embedder, llm).await?;
    let session_id = args
        .session
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    println!("\nRetrieval-Augmented Chatbot Initialized");
    println!("Type your question, 'reset' to clear the conversation, or 'exit' to quit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\nYou: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        match input.to_lowercase().as_str() {
            "exit" | "quit" => {
                println!("Exiting chat.");
                break;
            }
            "reset" => {
                engine.reset_session(&session_id).await;
                println!("Bot: Conversation cleared.");
                continue;
            }
            _ => {}
        }

        match engine.handle_turn(&session_id, input).await {
            Ok(reply) => println!("\nBot: {}", reply),
            Err(ChatError::InvalidSessionInput(_)) => {
                println!("Bot: Please type a question.");
            }
            Err(e) => {
                tracing::error!(code = e.error_code(), error = %e, "Turn failed");
                println!("Bot: An error occurred: {}", e);
            }
        }
    }

    Ok(())
}
