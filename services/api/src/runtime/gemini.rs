//! Gemini Live backend for call agents.

use super::{INITIAL_GREETING, edge_url};
use crate::config::Config;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use switchboard_core::agent::{AgentProfile, CallAgent};
use switchboard_core::call::CallTarget;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message as WsMessage};
use tracing::{error, info, warn};

// --- Local Gemini Live Types (for encapsulation) ---
mod live_types {
    use serde::{Deserialize, Serialize};
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) enum ClientMessage {
        Setup(BidiGenerateContentSetup),
        RealtimeInput(BidiGenerateContentRealtimeInput),
        ClientContent(BidiGenerateContentClientContent),
    }
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct BidiGenerateContentSetup {
        pub model: String,
        pub generation_config: GenerationConfig,
    }
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct BidiGenerateContentClientContent {
        pub turns: Vec<Content>,
        pub turn_complete: bool,
    }
    #[derive(Serialize)]
    pub(super) struct Content {
        pub role: String,
        pub parts: Vec<Part>,
    }
    #[derive(Serialize)]
    pub(super) struct Part {
        pub text: String,
    }
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct GenerationConfig {
        pub response_modalities: Vec<ResponseModality>,
    }
    #[derive(Serialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub(super) enum ResponseModality {
        Audio,
    }
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct BidiGenerateContentRealtimeInput {
        pub audio: Blob,
    }
    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct Blob {
        pub mime_type: String,
        pub data: String,
    }
    #[derive(Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct ServerMessage {
        pub setup_complete: Option<serde_json::Value>,
        pub server_content: Option<LiveServerContent>,
    }
    #[derive(Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct LiveServerContent {
        pub model_turn: Option<ServerContentTurn>,
    }
    #[derive(Deserialize, Debug)]
    pub(super) struct ServerContentTurn {
        pub parts: Vec<ServerPart>,
    }
    #[derive(Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub(super) struct ServerPart {
        pub inline_data: Option<ServerBlob>,
    }
    #[derive(Deserialize, Debug)]
    pub(super) struct ServerBlob {
        pub data: String,
    }
}

/// An agent whose voice is driven by the Gemini Live API.
pub struct GeminiLiveAgent {
    config: Arc<Config>,
    profile: AgentProfile,
}

impl GeminiLiveAgent {
    pub fn new(config: Arc<Config>, profile: AgentProfile) -> Self {
        Self { config, profile }
    }
}

#[async_trait]
impl CallAgent for GeminiLiveAgent {
    async fn join_call(self: Box<Self>, target: &CallTarget) -> Result<()> {
        let api_key = self
            .config
            .gemini_api_key
            .as_ref()
            .context("Gemini API key not found")?;
        let url = format!(
            "wss://generativelanguage.googleapis.com/ws/google.ai.generativelanguage.v1beta.GenerativeService.BidiGenerateContent?key={}",
            api_key
        );

        let (provider_stream, _) = connect_async(url)
            .await
            .context("Failed to connect to Gemini Live WebSocket")?;
        let (mut provider_tx, mut provider_rx) = provider_stream.split();
        info!("Connected to Gemini Live WebSocket.");

        // Send the setup message, then the agent's instructions as the
        // opening system turn.
        let setup = live_types::ClientMessage::Setup(live_types::BidiGenerateContentSetup {
            model: self.config.realtime_model.clone(),
            generation_config: live_types::GenerationConfig {
                response_modalities: vec![live_types::ResponseModality::Audio],
            },
        });
        provider_tx
            .send(WsMessage::Text(serde_json::to_string(&setup)?.into()))
            .await?;

        let instructions_turn =
            live_types::ClientMessage::ClientContent(live_types::BidiGenerateContentClientContent {
                turns: vec![live_types::Content {
                    role: "system".to_string(),
                    parts: vec![live_types::Part {
                        text: self.profile.instructions.clone(),
                    }],
                }],
                turn_complete: false,
            });
        provider_tx
            .send(WsMessage::Text(
                serde_json::to_string(&instructions_turn)?.into(),
            ))
            .await?;

        // Join the call edge.
        let edge = edge_url(&self.config, target);
        let (edge_stream, _) = connect_async(edge.as_str())
            .await
            .context("Failed to connect to call edge")?;
        let (mut edge_tx, mut edge_rx) = edge_stream.split();
        info!(agent_name = %self.profile.agent_name, call = %target, "Joined call edge");

        let mut is_ready = false;
        loop {
            tokio::select! {
                edge_msg = edge_rx.next() => match edge_msg {
                    Some(Ok(WsMessage::Binary(frame))) => {
                        if !is_ready {
                            warn!("Received edge audio before Gemini setup was complete. Ignoring.");
                            continue;
                        }
                        let audio = live_types::ClientMessage::RealtimeInput(
                            live_types::BidiGenerateContentRealtimeInput {
                                audio: live_types::Blob {
                                    mime_type: "audio/pcm;rate=16000".to_string(),
                                    data: BASE64.encode(&frame),
                                },
                            },
                        );
                        provider_tx
                            .send(WsMessage::Text(serde_json::to_string(&audio)?.into()))
                            .await?;
                    }
                    Some(Ok(WsMessage::Close(_))) | None => {
                        info!(call = %target, "Call edge closed; session complete.");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e).context("Error reading from call edge"),
                },
                provider_msg = provider_rx.next() => match provider_msg {
                    Some(Ok(WsMessage::Text(text))) => {
                        let Ok(server_msg) = serde_json::from_str::<live_types::ServerMessage>(&text)
                        else {
                            error!("Failed to parse Gemini message. Raw text: {}", text);
                            continue;
                        };
                        if !is_ready {
                            if server_msg.setup_complete.is_some() {
                                info!("Gemini session setup is complete. Greeting the call.");
                                is_ready = true;

                                let greeting = live_types::ClientMessage::ClientContent(
                                    live_types::BidiGenerateContentClientContent {
                                        turns: vec![live_types::Content {
                                            role: "model".to_string(),
                                            parts: vec![live_types::Part {
                                                text: INITIAL_GREETING.to_string(),
                                            }],
                                        }],
                                        turn_complete: true,
                                    },
                                );
                                provider_tx
                                    .send(WsMessage::Text(serde_json::to_string(&greeting)?.into()))
                                    .await?;
                            } else {
                                error!("Received unexpected message during Gemini setup: {:?}", server_msg);
                            }
                        } else if let Some(content) = server_msg.server_content {
                            if let Some(model_turn) = content.model_turn {
                                for part in model_turn.parts {
                                    if let Some(blob) = part.inline_data {
                                        match BASE64.decode(&blob.data) {
                                            Ok(frame) => {
                                                edge_tx.send(WsMessage::Binary(frame.into())).await?;
                                            }
                                            Err(err) => warn!(%err, "Dropping undecodable audio blob"),
                                        }
                                    }
                                }
                            }
                        }
                    }
                    Some(Ok(WsMessage::Close(close_frame))) => {
                        return Err(anyhow!(
                            "Gemini closed the realtime connection mid-call: {:?}",
                            close_frame
                        ));
                    }
                    None => {
                        return Err(anyhow!("Gemini realtime connection ended mid-call"));
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e).context("Error reading from Gemini WebSocket"),
                },
            }
        }

        Ok(())
    }
}
