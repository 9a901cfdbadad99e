//! Subtract occupied time from available time.
//!
//! Available occurrences are threaded into a doubly linked chain so that each
//! one can be removed, shrunk or split in place while occupied occurrences are
//! applied one after another. The chain lives in an arena addressed by index and
//! is dropped when [`merge_occupancy`] returns.

use crate::conflict::intersects;
use crate::interval::Occurrence;

#[derive(Debug)]
struct Node {
    occurrence: Occurrence,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Sorted same-color occurrences linked by arena index.
///
/// Replaced nodes stay in the arena but are unlinked, so they are never
/// reached from `head` again.
#[derive(Debug)]
struct Chain {
    nodes: Vec<Node>,
    head: Option<usize>,
}

impl Chain {
    fn from_sorted(occurrences: &[Occurrence]) -> Self {
        let len = occurrences.len();
        let nodes = occurrences
            .iter()
            .enumerate()
            .map(|(i, occurrence)| Node {
                occurrence: *occurrence,
                prev: i.checked_sub(1),
                next: (i + 1 < len).then_some(i + 1),
            })
            .collect();

        Self {
            nodes,
            head: (len > 0).then_some(0),
        }
    }

    /// Splice `pieces` in place of the node at `idx`. An empty slice removes it.
    fn replace(&mut self, idx: usize, pieces: &[Occurrence]) {
        let prev = self.nodes[idx].prev;
        let next = self.nodes[idx].next;

        let mut last = prev;
        for piece in pieces {
            let new_idx = self.nodes.len();
            self.nodes.push(Node {
                occurrence: *piece,
                prev: last,
                next: None,
            });
            self.link_after(last, new_idx);
            last = Some(new_idx);
        }

        match last {
            Some(l) => self.nodes[l].next = next,
            None => self.head = next,
        }
        if let Some(n) = next {
            self.nodes[n].prev = last;
        }

        self.nodes[idx].prev = None;
        self.nodes[idx].next = None;
    }

    fn link_after(&mut self, prev: Option<usize>, idx: usize) {
        match prev {
            Some(p) => self.nodes[p].next = Some(idx),
            None => self.head = Some(idx),
        }
    }

    fn into_vec(self) -> Vec<Occurrence> {
        let mut out = Vec::new();
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            out.push(self.nodes[idx].occurrence);
            cursor = self.nodes[idx].next;
        }
        out
    }
}

/// The parts of `available` left after removing `occupied`: zero, one or two pieces.
fn subtract(available: &Occurrence, occupied: &Occurrence) -> Vec<Occurrence> {
    let mut pieces = Vec::with_capacity(2);

    if available.start < occupied.start {
        pieces.push(available.with_bounds(available.start, occupied.start));
    }
    if available.end > occupied.end {
        pieces.push(available.with_bounds(occupied.end, available.end));
    }

    pieces
}

/// Remove every occupied interval from the available ones.
///
/// Both slices must be sorted by start (see [`crate::interval::sort_occurrences`]),
/// and available occurrences must not overlap each other. Returns the surviving
/// available pieces in start order.
///
/// The surviving set does not depend on the order of `occupied`.
pub fn merge_occupancy(available: &[Occurrence], occupied: &[Occurrence]) -> Vec<Occurrence> {
    if available.is_empty() || occupied.is_empty() {
        return available.to_vec();
    }

    let mut chain = Chain::from_sorted(available);

    for red in occupied {
        let mut cursor = chain.head;
        while let Some(idx) = cursor {
            let green = chain.nodes[idx].occurrence;
            // Later greens start even later, so none of them can reach this red.
            if green.start > red.end {
                break;
            }

            let next = chain.nodes[idx].next;
            if intersects(red, &green) {
                chain.replace(idx, &subtract(&green, red));
            }
            cursor = next;
        }
    }

    chain.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Color;
    use chrono::{DateTime, FixedOffset};

    fn occ(start: &str, end: &str) -> Occurrence {
        Occurrence {
            id: 1,
            color: Color::Available,
            start: DateTime::<FixedOffset>::parse_from_rfc3339(start).unwrap(),
            end: DateTime::<FixedOffset>::parse_from_rfc3339(end).unwrap(),
        }
    }

    #[test]
    fn replace_head_with_two_pieces_relinks_chain() {
        let greens = [
            occ("2000-01-01T09:00:00Z", "2000-01-01T12:00:00Z"),
            occ("2000-01-02T09:00:00Z", "2000-01-02T12:00:00Z"),
        ];
        let mut chain = Chain::from_sorted(&greens);
        let pieces = [
            occ("2000-01-01T09:00:00Z", "2000-01-01T10:00:00Z"),
            occ("2000-01-01T11:00:00Z", "2000-01-01T12:00:00Z"),
        ];
        chain.replace(0, &pieces);

        assert_eq!(chain.head, Some(2));
        assert_eq!(chain.nodes[2].next, Some(3));
        assert_eq!(chain.nodes[3].prev, Some(2));
        assert_eq!(chain.nodes[3].next, Some(1));
        assert_eq!(chain.nodes[1].prev, Some(3));
        assert_eq!(chain.into_vec(), vec![pieces[0], pieces[1], greens[1]]);
    }

    #[test]
    fn removing_only_node_empties_chain() {
        let greens = [occ("2000-01-01T09:00:00Z", "2000-01-01T12:00:00Z")];
        let mut chain = Chain::from_sorted(&greens);
        chain.replace(0, &[]);
        assert_eq!(chain.head, None);
        assert!(chain.into_vec().is_empty());
    }

    #[test]
    fn removing_tail_clears_predecessor_link() {
        let greens = [
            occ("2000-01-01T09:00:00Z", "2000-01-01T10:00:00Z"),
            occ("2000-01-01T11:00:00Z", "2000-01-01T12:00:00Z"),
        ];
        let mut chain = Chain::from_sorted(&greens);
        chain.replace(1, &[]);
        assert_eq!(chain.nodes[0].next, None);
        assert_eq!(chain.into_vec(), vec![greens[0]]);
    }
}
