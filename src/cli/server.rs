// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use super::args::ConnectionArgs;
use crate::config::ServeCommand;
use crate::vision::VlmClient;

/// Arguments for the health command
#[derive(Args, Debug)]
pub struct HealthArgs {
    /// Keep polling until the server is up, for at most this many seconds
    #[arg(long)]
    pub wait: Option<u64>,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Arguments for the serve-command command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Directory holding the DotsOCR weights
    #[arg(long, default_value = "./weights/DotsOCR")]
    pub model_path: PathBuf,

    /// CUDA_VISIBLE_DEVICES value
    #[arg(long, default_value = "0")]
    pub gpu: String,

    #[arg(long, default_value_t = 1)]
    pub tensor_parallel_size: u32,

    #[arg(long, default_value_t = 0.95)]
    pub gpu_memory_utilization: f32,

    #[arg(long, default_value = "model")]
    pub served_model_name: String,

    #[arg(long)]
    pub port: Option<u16>,

    /// Start vLLM instead of printing the command
    #[arg(long)]
    pub launch: bool,
}

impl ServeArgs {
    fn to_serve_command(&self) -> ServeCommand {
        ServeCommand {
            gpu_devices: self.gpu.clone(),
            tensor_parallel_size: self.tensor_parallel_size,
            gpu_memory_utilization: self.gpu_memory_utilization,
            served_model_name: self.served_model_name.clone(),
            port: self.port,
            ..ServeCommand::new(&self.model_path)
        }
    }
}

pub async fn run_health(args: HealthArgs) -> Result<()> {
    let config = args.connection.load_config()?;
    let client = VlmClient::from_config(&config)?;
    println!("🩺 Checking {}", client.endpoint());

    let healthy = match args.wait {
        Some(secs) => {
            client
                .wait_for_server(Duration::from_secs(secs), Duration::from_secs(2))
                .await
        }
        None => client.health_check().await,
    };
    if !healthy {
        return Err(anyhow!(
            "vLLM server at {} is not reachable; start it with `dots-ocr serve-command --launch`",
            client.endpoint()
        ));
    }
    println!("✅ Server is healthy");

    match client.list_models().await {
        Ok(models) => {
            for model in models {
                let marker = if model.id == config.model_name { "👉" } else { "  " };
                match model.max_model_len {
                    Some(len) => println!("{} {} (max_model_len {})", marker, model.id, len),
                    None => println!("{} {}", marker, model.id),
                }
            }
        }
        Err(e) => println!("⚠️  Could not list models: {}", e),
    }
    Ok(())
}

pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let serve = args.to_serve_command();
    serve.validate()?;
    println!("{}", serve.display_string());

    if args.launch {
        info!("Launching vLLM for {}", serve.model_path.display());
        let status = serve.to_command()?.status().await?;
        if !status.success() {
            return Err(anyhow!("vllm exited with {}", status));
        }
    }
    Ok(())
}
