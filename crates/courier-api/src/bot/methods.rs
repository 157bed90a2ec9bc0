//! The subset of the method catalog this client exposes.

use super::params::*;
use super::Bot;
use crate::envelope;
use crate::transport::FilePart;
use courier_core::{
    config::DEFAULT_API_SERVER,
    error::CourierError,
    traits::FetchRequest,
    types::{ChatAction, ChatId, File, Message, Update, User, WebhookInfo},
};
use serde_json::json;
use std::time::Duration;

/// Extra time granted to `getUpdates` beyond the server-side wait.
const LONG_POLL_MARGIN: Duration = Duration::from_secs(10);

impl Bot {
    /// Basic information about the bot. Doubles as a token check.
    pub async fn get_me(&self) -> Result<User, CourierError> {
        self.get("getMe", &[], None).await
    }

    /// Long-poll for the next batch of updates.
    pub async fn get_updates(&self, request: &FetchRequest) -> Result<Vec<Update>, CourierError> {
        let mut query = vec![
            ("offset", request.offset.to_string()),
            ("limit", request.limit.to_string()),
            ("timeout", request.timeout_secs.to_string()),
        ];
        if !request.allowed_updates.is_empty() {
            query.push(("allowed_updates", json!(request.allowed_updates).to_string()));
        }

        let timeout = Duration::from_secs(u64::from(request.timeout_secs)) + LONG_POLL_MARGIN;
        self.get("getUpdates", &query, Some(timeout)).await
    }

    pub async fn send_message(
        &self,
        chat_id: impl Into<ChatId>,
        text: &str,
        options: Option<SendMessageOptions>,
    ) -> Result<Message, CourierError> {
        let params = SendMessageParams {
            chat_id: chat_id.into(),
            text,
            options: options.unwrap_or_default(),
        };
        self.post("sendMessage", Some(&params)).await
    }

    pub async fn forward_message(
        &self,
        chat_id: impl Into<ChatId>,
        from_chat_id: impl Into<ChatId>,
        message_id: i64,
        disable_notification: bool,
    ) -> Result<Message, CourierError> {
        let chat_id: ChatId = chat_id.into();
        let from_chat_id: ChatId = from_chat_id.into();
        let params = json!({
            "chat_id": chat_id,
            "from_chat_id": from_chat_id,
            "message_id": message_id,
            "disable_notification": disable_notification,
        });
        self.post("forwardMessage", Some(&params)).await
    }

    /// Show a status such as "typing…" for up to five seconds.
    pub async fn send_chat_action(
        &self,
        chat_id: impl Into<ChatId>,
        action: ChatAction,
    ) -> Result<(), CourierError> {
        let chat_id: ChatId = chat_id.into();
        let params = json!({ "chat_id": chat_id, "action": action });
        self.post_ok("sendChatAction", Some(&params)).await
    }

    pub async fn edit_message_text(
        &self,
        chat_id: impl Into<ChatId>,
        message_id: i64,
        text: &str,
        options: Option<EditMessageTextOptions>,
    ) -> Result<Message, CourierError> {
        let params = EditMessageTextParams {
            chat_id: chat_id.into(),
            message_id,
            text,
            options: options.unwrap_or_default(),
        };
        self.post("editMessageText", Some(&params)).await
    }

    pub async fn delete_message(
        &self,
        chat_id: impl Into<ChatId>,
        message_id: i64,
    ) -> Result<bool, CourierError> {
        let chat_id: ChatId = chat_id.into();
        let params = json!({ "chat_id": chat_id, "message_id": message_id });
        self.post("deleteMessage", Some(&params)).await
    }

    pub async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        options: Option<AnswerCallbackQueryOptions>,
    ) -> Result<(), CourierError> {
        let params = AnswerCallbackQueryParams {
            callback_query_id,
            options: options.unwrap_or_default(),
        };
        self.post_ok("answerCallbackQuery", Some(&params)).await
    }

    /// Resolve a `file_id` to a downloadable `file_path`.
    pub async fn get_file(&self, file_id: &str) -> Result<File, CourierError> {
        self.get("getFile", &[("file_id", file_id.to_string())], None)
            .await
    }

    pub async fn get_webhook_info(&self) -> Result<WebhookInfo, CourierError> {
        self.get("getWebhookInfo", &[], None).await
    }

    pub async fn set_webhook(
        &self,
        url: &str,
        options: Option<SetWebhookOptions>,
    ) -> Result<(), CourierError> {
        let options = options.unwrap_or_default();
        let mut fields = vec![("url".to_string(), url.to_string())];
        if let Some(max) = options.max_connections.filter(|m| *m > 0) {
            fields.push(("max_connections".to_string(), max.to_string()));
        }
        if !options.allowed_updates.is_empty() {
            fields.push((
                "allowed_updates".to_string(),
                json!(options.allowed_updates).to_string(),
            ));
        }
        let file = options.certificate.map(|data| FilePart {
            field: "certificate".to_string(),
            file_name: "certificate".to_string(),
            data,
        });

        self.post_multipart_ok("setWebhook", fields, file).await
    }

    /// Remove the webhook so `getUpdates` can be used again.
    pub async fn delete_webhook(&self) -> Result<(), CourierError> {
        self.post_ok::<()>("deleteWebhook", None).await
    }

    /// Log out from the cloud Bot API server before switching to a local one.
    ///
    /// Always targets the public server, whatever `api_server` is configured.
    pub async fn log_out(&self) -> Result<(), CourierError> {
        let url = format!("{DEFAULT_API_SERVER}/bot{}/logOut", self.token);
        let body = self.transport.get(&url, &[], None).await?;
        envelope::decode_ok(&body)
    }

    /// Call any method with a JSON body and return the raw response.
    pub async fn raw(
        &self,
        method: &str,
        data: &serde_json::Value,
    ) -> Result<Vec<u8>, CourierError> {
        self.post_raw(method, Some(data)).await
    }
}
