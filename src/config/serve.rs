// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! `vllm serve` invocation for hosting the model
//!
//! The crate never loads weights itself. This builds the command line an
//! operator runs (or the CLI launches) so the parser has an endpoint.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{OcrError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServeCommand {
    /// Directory holding the model weights
    pub model_path: PathBuf,
    /// Value for `CUDA_VISIBLE_DEVICES`
    pub gpu_devices: String,
    pub tensor_parallel_size: u32,
    /// Fraction of GPU memory vLLM may claim
    pub gpu_memory_utilization: f32,
    pub chat_template_content_format: String,
    pub served_model_name: String,
    pub trust_remote_code: bool,
    pub port: Option<u16>,
}

impl Default for ServeCommand {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("./weights/DotsOCR"),
            gpu_devices: "0".to_string(),
            tensor_parallel_size: 1,
            gpu_memory_utilization: 0.95,
            chat_template_content_format: "string".to_string(),
            served_model_name: "model".to_string(),
            trust_remote_code: true,
            port: None,
        }
    }
}

impl ServeCommand {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.gpu_memory_utilization > 0.0 && self.gpu_memory_utilization <= 1.0) {
            return Err(OcrError::Config(format!(
                "gpu_memory_utilization must be within (0, 1], got {}",
                self.gpu_memory_utilization
            )));
        }
        if self.tensor_parallel_size == 0 {
            return Err(OcrError::Config(
                "tensor_parallel_size must be at least 1".to_string(),
            ));
        }
        if self.served_model_name.trim().is_empty() {
            return Err(OcrError::Config(
                "served_model_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn program(&self) -> &'static str {
        "vllm"
    }

    pub fn envs(&self) -> Vec<(String, String)> {
        vec![("CUDA_VISIBLE_DEVICES".to_string(), self.gpu_devices.clone())]
    }

    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "serve".to_string(),
            self.model_path.display().to_string(),
            "--tensor-parallel-size".to_string(),
            self.tensor_parallel_size.to_string(),
            "--gpu-memory-utilization".to_string(),
            self.gpu_memory_utilization.to_string(),
            "--chat-template-content-format".to_string(),
            self.chat_template_content_format.clone(),
            "--served-model-name".to_string(),
            self.served_model_name.clone(),
        ];
        if let Some(port) = self.port {
            args.push("--port".to_string());
            args.push(port.to_string());
        }
        if self.trust_remote_code {
            args.push("--trust-remote-code".to_string());
        }
        args
    }

    /// Shell-ready rendering of the invocation
    pub fn display_string(&self) -> String {
        let envs: Vec<String> = self
            .envs()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        format!("{} {} {}", envs.join(" "), self.program(), self.args().join(" "))
    }

    /// Spawnable process for the CLI `--launch` path
    pub fn to_command(&self) -> Result<tokio::process::Command> {
        self.validate()?;
        let mut cmd = tokio::process::Command::new(self.program());
        cmd.args(self.args()).envs(self.envs());
        Ok(cmd)
    }
}
