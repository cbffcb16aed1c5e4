// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AI copywriting tools backed by a hosted chat-completion API.
//!
//! The model is asked for a bulleted list followed by a labelled tag line.
//! Nothing guarantees the model follows that format, so replies go through
//! [`parse_reply`], which extracts what it can and reports replies with no
//! usable list as [`ParsedReply::Unparseable`].

use crate::config::Config;
use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Sampling temperature for every generation request.
pub const TEMPERATURE: f32 = 0.7;

/// Which tool is being run. Fixes the prompt and the reply format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Video titles plus comma-separated tags for a topic.
    YoutubeTitles,
    /// Post captions plus hashtags for a photo description.
    InstagramCaptions,
}

impl ContentKind {
    /// Heading the model is asked to put above the list.
    pub fn heading(self) -> &'static str {
        match self {
            ContentKind::YoutubeTitles => "Titles:",
            ContentKind::InstagramCaptions => "Captions:",
        }
    }

    /// Literal marker that starts the tag section.
    pub fn tags_marker(self) -> &'static str {
        match self {
            ContentKind::YoutubeTitles => "Tags:",
            ContentKind::InstagramCaptions => "Hashtags:",
        }
    }

    /// Shown when the reply has no tag section.
    pub fn default_tags(self) -> &'static str {
        match self {
            ContentKind::YoutubeTitles => "No tags",
            ContentKind::InstagramCaptions => "#NoTags",
        }
    }

    /// Human-readable label for the list items.
    pub fn item_label(self) -> &'static str {
        match self {
            ContentKind::YoutubeTitles => "Titles",
            ContentKind::InstagramCaptions => "Captions",
        }
    }

    /// Build the prompt for a user's topic or photo description.
    pub fn prompt(self, input: &str) -> String {
        match self {
            ContentKind::YoutubeTitles => format!(
                "You are a YouTube growth expert. Suggest 5 catchy, click-worthy video titles \
                 for a video about: \"{input}\".\n\
                 Then suggest 10 relevant SEO tags as a single comma-separated line.\n\
                 Reply in exactly this format:\n\
                 Titles:\n- <title 1>\n- <title 2>\n...\n\
                 Tags:\n<tag1>, <tag2>, ..."
            ),
            ContentKind::InstagramCaptions => format!(
                "You are a social media manager. Write 3 engaging Instagram captions \
                 for a photo described as: \"{input}\". Use emojis where they fit.\n\
                 Then suggest 15 trending hashtags on a single line.\n\
                 Reply in exactly this format:\n\
                 Captions:\n- <caption 1>\n- <caption 2>\n...\n\
                 Hashtags:\n#tag1 #tag2 ..."
            ),
        }
    }
}

/// Structured content extracted from a model reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generated {
    /// Titles or captions, bullet markers removed
    pub items: Vec<String>,
    /// Tag line, or the kind's default when none was found
    pub tags: String,
    /// Whether the reply actually contained a tag section
    pub tags_found: bool,
}

/// Outcome of parsing a model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedReply {
    Parsed(Generated),
    /// No list items could be found; the raw reply is kept for display.
    Unparseable { raw: String },
}

/// Split a reply into list items and tags.
///
/// The text before the first tags marker yields the items: each line is
/// trimmed, blank lines and the heading are dropped, and a leading `- `
/// bullet is removed. The trimmed text after the marker is the tag line.
pub fn parse_reply(kind: ContentKind, reply: &str) -> ParsedReply {
    let (head, tail) = match reply.find(kind.tags_marker()) {
        Some(pos) => (&reply[..pos], Some(&reply[pos + kind.tags_marker().len()..])),
        None => (reply, None),
    };

    let items: Vec<String> = head
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.eq_ignore_ascii_case(kind.heading()))
        .map(|line| line.strip_prefix("- ").unwrap_or(line).trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    if items.is_empty() {
        return ParsedReply::Unparseable {
            raw: reply.trim().to_string(),
        };
    }

    let tags = tail.map(str::trim).filter(|t| !t.is_empty());

    ParsedReply::Parsed(Generated {
        items,
        tags_found: tags.is_some(),
        tags: tags.unwrap_or(kind.default_tags()).to_string(),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Completion API client
// ─────────────────────────────────────────────────────────────────────────────

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct CompletionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl CompletionClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.ai_api_url.trim_end_matches('/').to_string(),
            api_key: config.ai_api_key.clone(),
            model: config.ai_model.clone(),
        }
    }

    /// Send a single-message prompt and return the reply text.
    pub async fn complete(&self, prompt: &str) -> Result<String, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Upstream("AI API key is not configured".to_string()))?;

        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Completion request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("HTTP {}: {}", status, body)));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("JSON parse error: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::Upstream("Completion reply had no content".to_string()))
    }

    /// Run one of the copywriting tools end to end.
    pub async fn generate(&self, kind: ContentKind, input: &str) -> Result<ParsedReply, AppError> {
        let reply = self.complete(&kind.prompt(input)).await?;
        let parsed = parse_reply(kind, &reply);
        if let ParsedReply::Unparseable { .. } = parsed {
            tracing::warn!(?kind, "Completion reply did not follow the requested format");
        }
        Ok(parsed)
    }
}
