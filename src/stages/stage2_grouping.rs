use std::collections::BTreeSet;

use tracing::info;

use crate::models::{Group, GroupTable, Segment};

/// Result of Stage 2 grouping
#[derive(Debug, Clone, Default)]
pub struct Stage2Result {
    /// Groups with at least one segment, in table order
    pub groups: Vec<Group>,
    /// Segments whose code fell into no group
    pub ungrouped_segments: usize,
}

/// Execute Stage 2: code grouping
///
/// A segment joins every group with a keyword contained in its code label.
/// Groups are recomputed from scratch; a group without segments is omitted.
pub fn execute_stage2(segments: &[Segment], table: &GroupTable) -> Stage2Result {
    let mut groups = Vec::new();
    let mut grouped_ids = BTreeSet::new();

    for definition in &table.groups {
        let mut codes = BTreeSet::new();
        let mut segment_ids = Vec::new();

        for segment in segments.iter().filter(|s| definition.matches(&s.code)) {
            codes.insert(segment.code.clone());
            segment_ids.push(segment.id);
            grouped_ids.insert(segment.id);
        }

        if segment_ids.is_empty() {
            continue;
        }

        groups.push(Group {
            group_id: definition.group_id.clone(),
            title: definition.title.clone(),
            codes: codes.into_iter().collect(),
            segment_ids,
        });
    }

    let ungrouped_segments = segments.len() - grouped_ids.len();
    info!(
        "Stage 2: {} groups created ({} segments ungrouped)",
        groups.len(),
        ungrouped_segments
    );

    Stage2Result {
        groups,
        ungrouped_segments,
    }
}
