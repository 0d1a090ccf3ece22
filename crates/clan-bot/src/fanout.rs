//! Running one command across several tags.

use std::fmt::Display;
use std::future::Future;
use tracing::warn;

/// Result of running an action for one tag.
#[derive(Debug)]
pub struct TagOutcome<T, E> {
    pub tag: String,
    pub result: Result<T, E>,
}

/// Run `action` once per tag, sequentially and in input order.
///
/// A failing tag is logged and recorded; it never stops the remaining tags.
pub async fn fan_out<T, E, F, Fut>(tags: &[String], mut action: F) -> Vec<TagOutcome<T, E>>
where
    E: Display,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut outcomes = Vec::with_capacity(tags.len());
    for tag in tags {
        let result = action(tag.clone()).await;
        if let Err(e) = &result {
            warn!("Request for {} failed: {}", tag, e);
        }
        outcomes.push(TagOutcome {
            tag: tag.clone(),
            result,
        });
    }
    outcomes
}
