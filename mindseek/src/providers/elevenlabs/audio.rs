//! ElevenLabs Audio API implementation (STT & TTS).

use async_trait::async_trait;
use serde::Serialize;

use crate::audio::{
    RawTranscription, SpeechAudio, SpeechToTextProvider, TextToSpeechProvider,
    TranscriptionRequest,
};
use crate::error::{PipelineError, Result};

use super::client::ElevenLabs;

/// ElevenLabs text-to-speech request.
#[derive(Debug, Clone, Serialize)]
struct ElevenLabsSpeechRequest {
    pub text: String,
    pub model_id: String,
}

#[async_trait]
impl SpeechToTextProvider for ElevenLabs {
    async fn transcribe(&self, request: &TranscriptionRequest) -> Result<RawTranscription> {
        let url = self.stt_url();

        let file_part = reqwest::multipart::Part::bytes(request.audio.clone())
            .file_name(request.upload_file_name())
            .mime_str(request.format.mime_type())
            .map_err(|e| PipelineError::internal(format!("Invalid MIME type: {e}")))?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model_id", self.config.stt_model.clone())
            .text("tag_audio_events", "true")
            .text("diarize", "true");

        let response = self
            .build_multipart_request(&url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::parse_error(status.as_u16(), &error_text).into());
        }

        let response_text = response.text().await?;
        let transcription: RawTranscription = serde_json::from_str(&response_text).map_err(|e| {
            PipelineError::provider(
                "elevenlabs",
                format!("Unexpected transcription response: {e}"),
            )
        })?;

        Ok(transcription)
    }
}

#[async_trait]
impl TextToSpeechProvider for ElevenLabs {
    async fn synthesize(&self, text: &str) -> Result<SpeechAudio> {
        let url = self.tts_url();

        let body = ElevenLabsSpeechRequest {
            text: text.to_owned(),
            model_id: self.config.tts_model.clone(),
        };

        let response = self.build_request(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::parse_error(status.as_u16(), &error_text).into());
        }

        let audio = response.bytes().await?.to_vec();

        Ok(SpeechAudio::new(audio, "audio/mpeg"))
    }
}
