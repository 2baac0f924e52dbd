#![forbid(unsafe_code)]

//! View renderer: project the store into freshly built view nodes.

use tracing::trace;

use crate::card::CardRecord;
use crate::filter::FilterSet;
use crate::view::{NodeKey, ViewTree};

/// What a full render replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Keys of the nodes that no longer exist.
    pub disposed: Vec<NodeKey>,
    /// Number of nodes built.
    pub rendered: usize,
}

/// Destructively replace every node in `view` with new nodes for the
/// records in `visible` (all of them when `None`), in the order given.
///
/// Transient state on the old nodes (hover tilt, running tweens) is lost.
pub fn render_all(
    view: &mut ViewTree,
    records: &[CardRecord],
    visible: Option<&FilterSet>,
) -> RenderReport {
    let nodes: Vec<_> = records
        .iter()
        .filter(|record| visible.is_none_or(|set| set.contains(record.id)))
        .map(|record| view.build_node(record))
        .collect();
    let rendered = nodes.len();
    let disposed = view.replace_all(nodes);
    trace!(rendered, disposed = disposed.len(), "render_all");
    RenderReport { disposed, rendered }
}
