//! Notification texts for session events

use types::short_address;

use crate::notify::{Notification, NotificationLevel};

pub fn connected(account: &str) -> Notification {
    Notification::new(NotificationLevel::Success, "Wallet connected successfully!")
        .with_description(format!("Address: {}", short_address(account)))
}

pub fn disconnected() -> Notification {
    Notification::new(NotificationLevel::Info, "Wallet disconnected")
        .with_description("You can reconnect anytime")
}

pub fn account_switched(account: &str) -> Notification {
    Notification::new(NotificationLevel::Info, "Account switched")
        .with_description(format!("New account: {}", short_address(account)))
}

pub fn connect_rejected() -> Notification {
    Notification::new(NotificationLevel::Error, "Connection rejected")
        .with_description("Please approve the connection request in your wallet")
}

pub fn connect_failed() -> Notification {
    Notification::new(NotificationLevel::Error, "Failed to connect wallet")
        .with_description("An error occurred. Please try again later.")
}
