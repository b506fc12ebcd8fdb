//! Bounded, order-preserving fan-out.

use futures_util::stream::{self, StreamExt};
use std::future::Future;

/// Default number of requests in flight
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Run `futures` with at most `limit` in flight and return their outputs in
/// submission order, after every one of them has completed.
pub async fn join_ordered<I, F, T>(futures: I, limit: usize) -> Vec<T>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = T>,
{
    stream::iter(futures).buffered(limit.max(1)).collect().await
}
