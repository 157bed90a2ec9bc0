//! Optional parameters for API methods.

use courier_core::types::{ChatId, ParseMode, ReplyMarkup};
use serde::Serialize;

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SendMessageOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "is_false")]
    pub disable_web_page_preview: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub disable_notification: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub protect_content: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ReplyMarkup>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EditMessageTextOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
    #[serde(skip_serializing_if = "is_false")]
    pub disable_web_page_preview: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ReplyMarkup>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AnswerCallbackQueryOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub show_alert: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_time: Option<u32>,
}

/// Options for `setWebhook`. A certificate turns the call into a multipart upload.
#[derive(Debug, Clone, Default)]
pub struct SetWebhookOptions {
    /// Public key certificate (PEM) for self-signed endpoints.
    pub certificate: Option<Vec<u8>>,
    pub max_connections: Option<u32>,
    pub allowed_updates: Vec<String>,
}

#[derive(Serialize)]
pub(crate) struct SendMessageParams<'a> {
    pub chat_id: ChatId,
    pub text: &'a str,
    #[serde(flatten)]
    pub options: SendMessageOptions,
}

#[derive(Serialize)]
pub(crate) struct EditMessageTextParams<'a> {
    pub chat_id: ChatId,
    pub message_id: i64,
    pub text: &'a str,
    #[serde(flatten)]
    pub options: EditMessageTextOptions,
}

#[derive(Serialize)]
pub(crate) struct AnswerCallbackQueryParams<'a> {
    pub callback_query_id: &'a str,
    #[serde(flatten)]
    pub options: AnswerCallbackQueryOptions,
}
