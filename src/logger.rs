//! Action logging for one entity service.
//!
//! Every line names who acted (`Anonymous` when nobody is signed in), which
//! service handled it and what happened:
//!
//! ```text
//! 7: Note Service - CREATE - with id: 12
//! Anonymous: Note Service - Invalid id
//! ```

use std::fmt::{Debug, Display};

use crate::errors::ApiError;
use crate::session::CurrentUser;

const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionLogger {
    entity: &'static str,
}

impl ActionLogger {
    #[must_use]
    pub const fn new(entity: &'static str) -> Self {
        Self { entity }
    }

    #[must_use]
    pub const fn entity(&self) -> &'static str {
        self.entity
    }

    /// `"{Entity} Service"`
    #[must_use]
    pub fn service(&self) -> String {
        format!("{} Service", self.entity)
    }

    /// `"{action} {Entity}"`
    #[must_use]
    pub fn event(&self, action: &str) -> String {
        format!("{action} {}", self.entity)
    }

    /// `"{Entity} does not exist"`
    #[must_use]
    pub fn entity_error_message(&self) -> String {
        format!("{} does not exist", self.entity)
    }

    /// The event as one PascalCase word, `"create note"` style input gives `"CreateNote"`.
    #[must_use]
    pub fn notification_action(&self, action: &str) -> String {
        self.event(action)
            .split_whitespace()
            .map(|word| {
                let mut chars = word.chars();
                chars.next().map_or_else(String::new, |first| {
                    first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
                })
            })
            .collect()
    }

    /// Log an executed action against one or more ids.
    pub fn log_information<I, E>(&self, user: Option<&CurrentUser>, action: &str, ids: &[I], entity: Option<&E>)
    where
        I: Display,
        E: Debug + ?Sized,
    {
        let actor = actor(user);
        let service = self.service();
        let action = action.to_uppercase();
        let ids = ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        tracing::info!(
            user = %actor,
            service = %service,
            action = %action,
            ids = %ids,
            "{actor}: {service} - {action} - with id: {ids}"
        );
        if let Some(entity) = entity {
            tracing::info!(service = %service, "{entity:?}");
        }
    }

    /// Log a rejected action and hand back the user-facing error for it.
    #[must_use]
    pub fn log_invalid(&self, user: Option<&CurrentUser>, thing: &str, message: impl Into<String>) -> ApiError {
        let actor = actor(user);
        let service = self.service();
        tracing::error!(
            user = %actor,
            service = %service,
            thing = thing,
            "{actor}: {service} - Invalid {thing}"
        );
        ApiError::not_found(message)
    }
}

/// `"Invalid action for user {user}: {message}"`
#[must_use]
pub fn add_user_to_message(message: &str, user: &str) -> String {
    format!("Invalid action for user {user}: {message}")
}

fn actor(user: Option<&CurrentUser>) -> String {
    user.map_or_else(|| ANONYMOUS.to_string(), ToString::to_string)
}
