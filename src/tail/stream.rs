// ABOUTME: Stream adapter over the pull-based event tailer.
// ABOUTME: Sleeps the poll interval on Pending and ends after the terminal item.

use futures::Stream;

use crate::backend::{BackendError, EventOps, StackOps};

use super::{EventTailer, TailEvent, TailItem};

impl<B: StackOps + EventOps> EventTailer<B> {
    /// Turn the tailer into a lazy stream.
    ///
    /// The stream ends after the terminal item, or after yielding an error.
    pub fn into_stream(self) -> impl Stream<Item = Result<TailEvent, BackendError>> {
        futures::stream::unfold(self, |mut tailer| async move {
            loop {
                match tailer.next().await {
                    Ok(Some(TailItem::Event(event))) => {
                        return Some((Ok(TailEvent::Event(event)), tailer));
                    }
                    Ok(Some(TailItem::Terminal(terminal))) => {
                        return Some((Ok(TailEvent::Terminal(terminal)), tailer));
                    }
                    Ok(Some(TailItem::Pending)) => tokio::time::sleep(tailer.interval).await,
                    Ok(None) => return None,
                    Err(e) => return Some((Err(e), tailer)),
                }
            }
        })
    }
}
