//! `blackbox-messaging` — inbox messages shown on the dashboard.

pub mod message;

pub use message::{DASHBOARD_MESSAGE_LIMIT, Message, MessageId, NewMessage, most_recent};
