use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::Document;
use crate::error::ApiError;
use crate::types::Collection;

use super::validation::{optional_text, FieldErrors};

/// Buyer-to-seller message about a product. The buyer is the sender.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub seller_id: Uuid,
    pub buyer_id: Uuid,
    #[serde(default)]
    pub product_id: Option<Uuid>,
    pub content: String,
    #[serde(default)]
    pub reply_content: Option<String>,
    #[serde(default)]
    pub reply_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Document for Message {
    const COLLECTION: Collection = Collection::Messages;
    const LABEL: &'static str = "Message";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Message {
    pub fn new(buyer_id: Uuid, seller_id: Uuid, product_id: Option<Uuid>, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender_id: buyer_id,
            receiver_id: seller_id,
            seller_id,
            buyer_id,
            product_id,
            content,
            reply_content: None,
            reply_at: None,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    pub fn involves(&self, user_id: Uuid) -> bool {
        self.buyer_id == user_id || self.seller_id == user_id
    }

    pub fn reply(&mut self, content: String) {
        self.reply_content = Some(content);
        self.reply_at = Some(Utc::now());
    }

    /// The other side of the conversation, if `user_id` is in it
    pub fn partner_of(&self, user_id: Uuid) -> Option<Uuid> {
        if self.sender_id == user_id {
            Some(self.receiver_id)
        } else if self.receiver_id == user_id {
            Some(self.sender_id)
        } else {
            None
        }
    }
}

/// The latest message with each conversation partner of `user_id`, newest first
pub fn latest_per_partner(user_id: Uuid, messages: Vec<Message>) -> Vec<Message> {
    let mut latest: HashMap<Uuid, Message> = HashMap::new();
    for message in messages {
        let Some(partner) = message.partner_of(user_id) else {
            continue;
        };
        match latest.get(&partner) {
            Some(kept) if kept.created_at >= message.created_at => {}
            _ => {
                latest.insert(partner, message);
            }
        }
    }

    let mut conversations: Vec<Message> = latest.into_values().collect();
    conversations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    conversations
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRequest {
    pub seller_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub content: Option<String>,
}

#[derive(Debug)]
pub struct NewMessage {
    pub seller_id: Uuid,
    pub product_id: Option<Uuid>,
    pub content: String,
}

impl MessageRequest {
    pub fn validate(self) -> Result<NewMessage, ApiError> {
        let mut errors = FieldErrors::new();
        let content = errors.require_text("content", "Content", self.content);
        if self.seller_id.is_none() {
            errors.add("sellerId", "Seller is required");
        }
        errors.finish("Please fill all required fields")?;

        let seller_id = self
            .seller_id
            .ok_or_else(|| ApiError::bad_request("Seller is required"))?;
        Ok(NewMessage {
            seller_id,
            product_id: self.product_id,
            content,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest {
    #[serde(alias = "content")]
    pub reply_content: Option<String>,
}

impl ReplyRequest {
    pub fn validate(self) -> Result<String, ApiError> {
        optional_text(self.reply_content).ok_or_else(|| ApiError::bad_request("Reply content is required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn conversations_keep_latest_message_per_partner() {
        let me = Uuid::new_v4();
        let ana = Uuid::new_v4();
        let bo = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let at = |minutes: i64, mut m: Message| {
            m.created_at = Utc::now() - Duration::minutes(minutes);
            m
        };

        let messages = vec![
            at(30, Message::new(ana, me, None, "old from ana".into())),
            at(5, Message::new(me, bo, None, "to bo".into())),
            at(10, Message::new(ana, me, None, "new from ana".into())),
            at(1, Message::new(stranger, ana, None, "not mine".into())),
        ];

        let conversations = latest_per_partner(me, messages);
        let contents: Vec<&str> = conversations.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["to bo", "new from ana"]);
    }

    #[test]
    fn buyer_sends_to_seller() {
        let buyer = Uuid::new_v4();
        let seller = Uuid::new_v4();
        let msg = Message::new(buyer, seller, None, "Is this still available?".into());

        assert_eq!(msg.sender_id, buyer);
        assert_eq!(msg.receiver_id, seller);
        assert!(!msg.is_read);
        assert!(msg.involves(buyer) && msg.involves(seller));
        assert!(!msg.involves(Uuid::new_v4()));
    }

    #[test]
    fn reply_is_recorded_on_original() {
        let mut msg = Message::new(Uuid::new_v4(), Uuid::new_v4(), None, "hi".into());
        msg.reply("yes".into());
        assert_eq!(msg.reply_content.as_deref(), Some("yes"));
        assert!(msg.reply_at.is_some());
    }

    #[test]
    fn reply_accepts_content_alias() {
        let req: ReplyRequest = serde_json::from_str(r#"{"content":"sure"}"#).unwrap();
        assert_eq!(req.validate().unwrap(), "sure");
    }

    #[test]
    fn seller_is_required() {
        let err = MessageRequest {
            content: Some("hi".into()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
