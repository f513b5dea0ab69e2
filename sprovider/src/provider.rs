//! Model provider contract.

use std::future::Future;
use std::pin::Pin;

use crate::{BoxedEventStream, ModelRequest, ProviderError, ProviderId};

pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One `stream` call wraps exactly one provider invocation and yields
/// exactly one terminal `MessageComplete` or one failure. Retry and
/// backoff for transient faults belong to the transport underneath and
/// are invisible at this boundary.
pub trait ModelProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    fn stream<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<BoxedEventStream<'a>, ProviderError>>;
}
