use super::{
    CallbackQuery, ChosenInlineResult, InlineQuery, Message, Poll, PreCheckoutQuery,
    ShippingQuery,
};
use serde::Deserialize;

/// One event from the `getUpdates` stream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawUpdate")]
pub struct Update {
    /// Monotonically increasing sequence id assigned by the server.
    pub update_id: u64,
    pub kind: UpdateKind,
}

/// Payload of an update. The server populates exactly one field per update.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateKind {
    Message(Message),
    EditedMessage(Message),
    ChannelPost(Message),
    EditedChannelPost(Message),
    InlineQuery(InlineQuery),
    ChosenInlineResult(ChosenInlineResult),
    CallbackQuery(CallbackQuery),
    ShippingQuery(ShippingQuery),
    PreCheckoutQuery(PreCheckoutQuery),
    Poll(Poll),
    /// A payload this client does not model.
    Unknown,
}

impl UpdateKind {
    /// Name used for this kind in `allowed_updates`.
    pub fn name(&self) -> Option<&'static str> {
        let name = match self {
            Self::Message(_) => "message",
            Self::EditedMessage(_) => "edited_message",
            Self::ChannelPost(_) => "channel_post",
            Self::EditedChannelPost(_) => "edited_channel_post",
            Self::InlineQuery(_) => "inline_query",
            Self::ChosenInlineResult(_) => "chosen_inline_result",
            Self::CallbackQuery(_) => "callback_query",
            Self::ShippingQuery(_) => "shipping_query",
            Self::PreCheckoutQuery(_) => "pre_checkout_query",
            Self::Poll(_) => "poll",
            Self::Unknown => return None,
        };
        Some(name)
    }
}

impl Update {
    pub fn new(update_id: u64, kind: UpdateKind) -> Self {
        Self { update_id, kind }
    }

    /// The message carried by any of the message-like kinds.
    pub fn message(&self) -> Option<&Message> {
        match &self.kind {
            UpdateKind::Message(m)
            | UpdateKind::EditedMessage(m)
            | UpdateKind::ChannelPost(m)
            | UpdateKind::EditedChannelPost(m) => Some(m),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct RawUpdate {
    update_id: u64,
    message: Option<Message>,
    edited_message: Option<Message>,
    channel_post: Option<Message>,
    edited_channel_post: Option<Message>,
    inline_query: Option<InlineQuery>,
    chosen_inline_result: Option<ChosenInlineResult>,
    callback_query: Option<CallbackQuery>,
    shipping_query: Option<ShippingQuery>,
    pre_checkout_query: Option<PreCheckoutQuery>,
    poll: Option<Poll>,
}

impl From<RawUpdate> for Update {
    fn from(raw: RawUpdate) -> Self {
        let kind = if let Some(m) = raw.message {
            UpdateKind::Message(m)
        } else if let Some(m) = raw.edited_message {
            UpdateKind::EditedMessage(m)
        } else if let Some(m) = raw.channel_post {
            UpdateKind::ChannelPost(m)
        } else if let Some(m) = raw.edited_channel_post {
            UpdateKind::EditedChannelPost(m)
        } else if let Some(q) = raw.inline_query {
            UpdateKind::InlineQuery(q)
        } else if let Some(r) = raw.chosen_inline_result {
            UpdateKind::ChosenInlineResult(r)
        } else if let Some(q) = raw.callback_query {
            UpdateKind::CallbackQuery(q)
        } else if let Some(q) = raw.shipping_query {
            UpdateKind::ShippingQuery(q)
        } else if let Some(q) = raw.pre_checkout_query {
            UpdateKind::PreCheckoutQuery(q)
        } else if let Some(p) = raw.poll {
            UpdateKind::Poll(p)
        } else {
            UpdateKind::Unknown
        };

        Self {
            update_id: raw.update_id,
            kind,
        }
    }
}
