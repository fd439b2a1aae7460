//! OpenAI Realtime backend for call agents.

use super::{INITIAL_GREETING, edge_url};
use crate::config::Config;
use anyhow::{Context, Result, anyhow};
use async_openai::types::realtime::{
    self as oai_realtime, ClientEvent as OAIClientEvent, ServerEvent as OAIServerEvent,
};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use switchboard_core::agent::{AgentProfile, CallAgent};
use switchboard_core::call::CallTarget;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{client::IntoClientRequest, protocol::Message as WsMessage},
};
use tracing::{info, warn};

/// An agent whose voice is driven by the OpenAI Realtime API.
pub struct OpenAiRealtimeAgent {
    config: Arc<Config>,
    profile: AgentProfile,
}

impl OpenAiRealtimeAgent {
    pub fn new(config: Arc<Config>, profile: AgentProfile) -> Self {
        Self { config, profile }
    }
}

#[async_trait]
impl CallAgent for OpenAiRealtimeAgent {
    async fn join_call(self: Box<Self>, target: &CallTarget) -> Result<()> {
        let api_key = self
            .config
            .openai_api_key
            .as_ref()
            .context("OpenAI API key not found")?;
        let url = format!(
            "wss://api.openai.com/v1/realtime?model={}",
            self.config.realtime_model
        );

        let mut request = url.into_client_request()?;
        request
            .headers_mut()
            .insert("Authorization", format!("Bearer {}", api_key).parse()?);
        request
            .headers_mut()
            .insert("OpenAI-Beta", "realtime=v1".parse()?);

        let (provider_stream, _) = connect_async(request)
            .await
            .context("Failed to connect to OpenAI Realtime WebSocket")?;
        let (mut provider_tx, mut provider_rx) = provider_stream.split();
        info!("Connected to OpenAI Realtime API.");

        // Configure the session with the agent's instructions.
        let session_config = oai_realtime::SessionResource {
            model: Some(self.config.realtime_model.clone()),
            modalities: Some(vec!["text".to_string(), "audio".to_string()]),
            instructions: Some(self.profile.instructions.clone()),
            voice: Some(oai_realtime::RealtimeVoice::Alloy),
            input_audio_format: Some(oai_realtime::AudioFormat::PCM16),
            output_audio_format: Some(oai_realtime::AudioFormat::PCM16),
            turn_detection: Some(oai_realtime::TurnDetection::ServerVAD {
                threshold: 0.5,
                prefix_padding_ms: 200,
                silence_duration_ms: 700,
                interrupt_response: Some(true),
                create_response: Some(true),
            }),
            ..Default::default()
        };
        let update = OAIClientEvent::SessionUpdate(oai_realtime::SessionUpdateEvent {
            session: session_config,
            event_id: None,
        });
        provider_tx
            .send(WsMessage::Text(serde_json::to_string(&update)?.into()))
            .await?;

        // Join the call edge.
        let edge = edge_url(&self.config, target);
        let (edge_stream, _) = connect_async(edge.as_str())
            .await
            .context("Failed to connect to call edge")?;
        let (mut edge_tx, mut edge_rx) = edge_stream.split();
        info!(agent_name = %self.profile.agent_name, call = %target, "Joined call edge");

        // Open with the standard greeting.
        let greeting_item = oai_realtime::Item {
            r#type: Some(oai_realtime::ItemType::Message),
            role: Some(oai_realtime::ItemRole::System),
            content: Some(vec![oai_realtime::ItemContent {
                r#type: oai_realtime::ItemContentType::InputText,
                text: Some(format!("Greet the call with: {}", INITIAL_GREETING)),
                audio: None,
                transcript: None,
            }]),
            id: None,
            status: None,
            call_id: None,
            name: None,
            arguments: None,
            output: None,
        };
        let create_item = oai_realtime::ConversationItemCreateEvent {
            item: greeting_item,
            event_id: None,
            previous_item_id: None,
        };
        provider_tx
            .send(WsMessage::Text(
                serde_json::to_string(&OAIClientEvent::ConversationItemCreate(create_item))?.into(),
            ))
            .await?;
        let respond = oai_realtime::ResponseCreateEvent {
            response: None,
            event_id: None,
        };
        provider_tx
            .send(WsMessage::Text(
                serde_json::to_string(&OAIClientEvent::ResponseCreate(respond))?.into(),
            ))
            .await?;

        // Bridge audio between the edge and the provider until the edge
        // closes, which is the session's natural end.
        loop {
            tokio::select! {
                biased;
                edge_msg = edge_rx.next() => match edge_msg {
                    Some(Ok(WsMessage::Binary(frame))) => {
                        let append = oai_realtime::InputAudioBufferAppendEvent {
                            audio: BASE64.encode(&frame),
                            event_id: None,
                        };
                        provider_tx
                            .send(WsMessage::Text(
                                serde_json::to_string(&OAIClientEvent::InputAudioBufferAppend(append))?.into(),
                            ))
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
                        if let Ok(event) = serde_json::from_str::<OAIServerEvent>(&text) {
                            match event {
                                OAIServerEvent::ResponseAudioDelta(e) => {
                                    match BASE64.decode(&e.delta) {
                                        Ok(frame) => edge_tx.send(WsMessage::Binary(frame.into())).await?,
                                        Err(err) => warn!(%err, "Dropping undecodable audio delta"),
                                    }
                                }
                                OAIServerEvent::Error(e) => {
                                    return Err(anyhow!("OpenAI realtime error: {}", e.error.message));
                                }
                                _ => {}
                            }
                        }
                    }
                    Some(Ok(WsMessage::Close(_))) | None => {
                        return Err(anyhow!("Provider closed the realtime connection mid-call"));
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e).context("Error reading from OpenAI WebSocket"),
                },
            }
        }

        Ok(())
    }
}
