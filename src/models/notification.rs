use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::Document;
use crate::types::Collection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Comment,
    Reaction,
    Follow,
    Message,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub sender_id: Uuid,
    pub sender_name: String,
    #[serde(default)]
    pub post_id: Option<Uuid>,
    pub kind: NotificationKind,
    pub content: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Document for Notification {
    const COLLECTION: Collection = Collection::Notifications;
    const LABEL: &'static str = "Notification";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Notification {
    pub fn new(
        kind: NotificationKind,
        recipient_id: Uuid,
        sender_id: Uuid,
        sender_name: &str,
        post_id: Option<Uuid>,
    ) -> Self {
        let content = match kind {
            NotificationKind::Comment => format!("{} commented on your post", sender_name),
            NotificationKind::Reaction => format!("{} reacted to your post", sender_name),
            NotificationKind::Follow => format!("{} started following you", sender_name),
            NotificationKind::Message => format!("{} sent you a message", sender_name),
        };

        Self {
            id: Uuid::new_v4(),
            recipient_id,
            sender_id,
            sender_name: sender_name.to_string(),
            post_id,
            kind,
            content,
            is_read: false,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_names_the_sender() {
        let n = Notification::new(NotificationKind::Follow, Uuid::new_v4(), Uuid::new_v4(), "Maya", None);
        assert_eq!(n.content, "Maya started following you");
        assert_eq!(serde_json::to_value(&n).unwrap()["kind"], "follow");
    }
}
