//! Routes each message value to the handler registered for its type.
//!
//! The set of message types is closed, so [`MessagesBuilder::build`] can
//! refuse to produce a dispatcher that would leave any of them unhandled.
//! Wiring mistakes surface at startup instead of on the first request.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use student_store::Database;

use crate::error::DispatchError;
use crate::message::{Handler, Message};
use crate::student::{
    DisenrollCommand, DisenrollHandler, EditPersonalInfoCommand, EditPersonalInfoHandler,
    EnrollCommand, EnrollHandler, GetListHandler, GetListQuery, RegisterCommand, RegisterHandler,
    TransferCommand, TransferHandler, UnregisterCommand, UnregisterHandler,
};

/// Each entry holds an `Arc<dyn Handler<M>>` keyed by `TypeId::of::<M>()`.
type HandlerMap = HashMap<TypeId, Box<dyn Any + Send + Sync>>;

/// The message dispatcher.
///
/// Cheap to share behind an `Arc`; dispatching never mutates it.
pub struct Messages {
    handlers: HandlerMap,
}

impl Messages {
    pub fn builder() -> MessagesBuilder {
        MessagesBuilder::default()
    }

    /// Builds a dispatcher with the student handlers over `db`.
    pub fn for_students<D>(db: D) -> Result<Self, DispatchError>
    where
        D: Database + Clone + 'static,
    {
        Self::builder()
            .handle::<RegisterCommand, _>(RegisterHandler::new(db.clone()))
            .handle::<UnregisterCommand, _>(UnregisterHandler::new(db.clone()))
            .handle::<EditPersonalInfoCommand, _>(EditPersonalInfoHandler::new(db.clone()))
            .handle::<EnrollCommand, _>(EnrollHandler::new(db.clone()))
            .handle::<TransferCommand, _>(TransferHandler::new(db.clone()))
            .handle::<DisenrollCommand, _>(DisenrollHandler::new(db.clone()))
            .handle::<GetListQuery, _>(GetListHandler::new(db))
            .build()
    }

    /// Hands `message` to its handler and returns the handler's output unchanged.
    pub async fn dispatch<M: Message>(&self, message: M) -> M::Output {
        metrics::counter!("messages_dispatched_total", "message" => M::NAME).increment(1);
        tracing::debug!(message_type = M::NAME, "dispatching");

        self.handler::<M>().handle(message).await
    }

    fn handler<M: Message>(&self) -> &dyn Handler<M> {
        match self
            .handlers
            .get(&TypeId::of::<M>())
            .and_then(|entry| entry.downcast_ref::<Arc<dyn Handler<M>>>())
        {
            Some(handler) => handler.as_ref(),
            // build() rejects any dispatcher missing a message type.
            None => unreachable!("no handler registered for {}", M::NAME),
        }
    }
}

impl std::fmt::Debug for Messages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Messages")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

/// Collects handlers for [`Messages`].
#[derive(Default)]
pub struct MessagesBuilder {
    handlers: HandlerMap,
    duplicates: Vec<&'static str>,
}

impl MessagesBuilder {
    /// Registers `handler` for messages of type `M`.
    pub fn handle<M, H>(mut self, handler: H) -> Self
    where
        M: Message,
        H: Handler<M> + 'static,
    {
        let handler: Arc<dyn Handler<M>> = Arc::new(handler);
        if self
            .handlers
            .insert(TypeId::of::<M>(), Box::new(handler))
            .is_some()
        {
            self.duplicates.push(M::NAME);
        }
        self
    }

    /// Finishes the dispatcher.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::DuplicateHandler`] if a message type was
    /// registered twice, or [`DispatchError::MissingHandlers`] naming every
    /// message type that has no handler.
    pub fn build(self) -> Result<Messages, DispatchError> {
        if let Some(&message) = self.duplicates.first() {
            return Err(DispatchError::DuplicateHandler { message });
        }

        let missing: Vec<&'static str> = catalog()
            .into_iter()
            .filter(|(type_id, _)| !self.handlers.contains_key(type_id))
            .map(|(_, name)| name)
            .collect();
        if !missing.is_empty() {
            return Err(DispatchError::MissingHandlers { messages: missing });
        }

        Ok(Messages {
            handlers: self.handlers,
        })
    }
}

/// Seals each listed type as a [`Message`] and records it in `catalog()`.
///
/// A message type exists only by being listed here, so every one of them is
/// checked by [`MessagesBuilder::build`].
macro_rules! message_catalog {
    ($($message:ty),+ $(,)?) => {
        $(impl crate::message::sealed::Sealed for $message {})+

        fn catalog() -> Vec<(TypeId, &'static str)> {
            vec![$(entry::<$message>()),+]
        }
    };
}

message_catalog!(
    RegisterCommand,
    UnregisterCommand,
    EditPersonalInfoCommand,
    EnrollCommand,
    TransferCommand,
    DisenrollCommand,
    GetListQuery,
);

fn entry<M: Message>() -> (TypeId, &'static str) {
    (TypeId::of::<M>(), M::NAME)
}
