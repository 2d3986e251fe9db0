use super::node::NodeId;
use rand::Rng;
use rand::distr::Alphanumeric;
use std::sync::atomic::{AtomicU64, Ordering};

const SUFFIX_LEN: usize = 9;

/// Process-wide sequence number. Together with the timestamp it keeps ids
/// unique even when the random suffix collides.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// The two families of ids handed out by the mutator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IdKind {
    Item,
    Group,
}

impl IdKind {
    fn prefix(self) -> &'static str {
        match self {
            IdKind::Item => "item",
            IdKind::Group => "group",
        }
    }
}

/// Allocates a fresh id of the form `<kind>-<millis>-<sequence>-<random>`.
pub(crate) fn next_id(kind: IdKind) -> NodeId {
    let millis = chrono::Utc::now().timestamp_millis();
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    NodeId::new(format!(
        "{}-{}-{:x}-{}",
        kind.prefix(),
        millis,
        sequence,
        suffix
    ))
}
