//! Fixed-size re-chunking of an upstream byte stream

use async_stream::try_stream;
use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};

/// Regroup `upstream` into chunks of exactly `chunk_size` bytes.
///
/// Each chunk is yielded as soon as enough bytes have arrived; only the last
/// one may be shorter. Order and content are untouched.
pub fn rechunk<S, E>(upstream: S, chunk_size: usize) -> impl Stream<Item = Result<Bytes, E>>
where
    S: Stream<Item = Result<Bytes, E>>,
{
    let chunk_size = chunk_size.max(1);
    try_stream! {
        let mut upstream = Box::pin(upstream);
        let mut buf = BytesMut::with_capacity(chunk_size);

        while let Some(piece) = upstream.next().await {
            buf.extend_from_slice(&piece?);
            while buf.len() >= chunk_size {
                yield buf.split_to(chunk_size).freeze();
            }
        }

        if !buf.is_empty() {
            yield buf.freeze();
        }
    }
}
