use std::collections::btree_map::Keys;

use crate::{NodeId, Range, Skeleton, SkeletonError};

const DIST_ERROR: u32 = u32::MAX;
const DIST_MAX: u32 = DIST_ERROR - 1;

struct Frame<'a, 'dfa> {
    node: NodeId,
    succ: Keys<'a, NodeId, Vec<Range<'dfa>>>,
    dist: u32,
}

/// Starts the walk at node `i`, or returns `None` if its distance is already
/// settled or it may not be entered again on the current path.
fn enter<'a, 'dfa>(
    skeleton: &'a Skeleton<'dfa>,
    loops: &mut [u8],
    dists: &mut [u32],
    i: NodeId,
) -> Option<Frame<'a, 'dfa>> {
    if dists[i] != DIST_ERROR {
        return None;
    }
    let node = skeleton.node(i);
    if node.end() {
        dists[i] = 0;
        return None;
    }
    // a cycle is walked at most twice
    if loops[i] >= 2 {
        return None;
    }
    loops[i] += 1;
    Some(Frame {
        node: i,
        succ: node.arcs().keys(),
        dist: 0,
    })
}

fn calc_dist(skeleton: &Skeleton, loops: &mut [u8], dists: &mut [u32], start: NodeId) {
    let mut stack: Vec<Frame> = Vec::new();
    stack.extend(enter(skeleton, loops, dists, start));

    while let Some(frame) = stack.last_mut() {
        let next = frame.succ.next().copied();
        let settled = match next {
            Some(j) => match enter(skeleton, loops, dists, j) {
                Some(child) => {
                    stack.push(child);
                    continue;
                }
                None => j,
            },
            None => {
                let Some(frame) = stack.pop() else { break };
                loops[frame.node] -= 1;
                dists[frame.node] = frame.dist.saturating_add(1).min(DIST_MAX);
                frame.node
            }
        };
        // unfinished destinations contribute nothing
        if let Some(parent) = stack.last_mut() {
            if dists[settled] != DIST_ERROR {
                parent.dist = parent.dist.max(dists[settled]);
            }
        }
    }
}

/// Length of the longest path from the initial node to a leaf, in arcs.
pub fn maxpath(skeleton: &Skeleton) -> Result<u32, SkeletonError> {
    let count = skeleton.nodes().len();
    let mut loops = vec![0; count];
    let mut dists = vec![DIST_ERROR; count];
    calc_dist(skeleton, &mut loops, &mut dists, 0);

    let maxlen = dists[0];
    if maxlen == DIST_MAX {
        return Err(SkeletonError::PathTooLong {
            cond: skeleton.cond.clone(),
        });
    }
    Ok(maxlen)
}
