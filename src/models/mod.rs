// Persisted documents and the request bodies that create or change them

pub mod message;
pub mod notification;
pub mod order;
pub mod post;
pub mod product;
pub mod progress;
pub mod tutorial;
pub mod user;
pub mod validation;

pub use message::{Message, MessageRequest, ReplyRequest};
pub use notification::{Notification, NotificationKind};
pub use order::{Order, OrderItem, OrderRequest, OrderStatus};
pub use post::{Comment, CommentRequest, Post, PostRequest, Reaction, ReactionRequest};
pub use product::{Product, ProductRequest};
pub use progress::{ProgressRequest, TutorialProgress};
pub use tutorial::{CraftType, Tutorial, TutorialRequest};
pub use user::{LoginRequest, ProfileUpdate, PublicUser, RegisterRequest, User};
