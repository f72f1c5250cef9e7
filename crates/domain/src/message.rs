//! Command and query contracts.

use async_trait::async_trait;

use crate::error::CommandError;

/// Outcome of a command: success without payload, or a failure message.
pub type CommandResult = Result<(), CommandError>;

pub(crate) mod sealed {
    /// Restricts [`super::Message`] to the message types defined in this crate.
    ///
    /// Implemented only by the `message_catalog!` invocation in
    /// [`crate::dispatch`], which also lists the type in the catalog that
    /// [`crate::MessagesBuilder::build`] checks.
    pub trait Sealed {}
}

/// A value describing an intended state change or read.
///
/// Messages are plain immutable data; handlers carry all behaviour.
pub trait Message: sealed::Sealed + Send + 'static {
    /// What handling the message produces.
    type Output: Send;

    /// Message name used in logs and metrics.
    const NAME: &'static str;
}

/// A message that changes state.
pub trait Command: Message<Output = CommandResult> {}

/// A message that only reads state.
pub trait Query: Message {}

/// Handler for messages of type `M`.
///
/// Expected business failures are returned in `M::Output`, never raised.
#[async_trait]
pub trait Handler<M: Message>: Send + Sync {
    async fn handle(&self, message: M) -> M::Output;
}
