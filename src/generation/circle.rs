//! Pending circle events
//!
//! A circle event predicts the sweep position at which an arc shrinks to a
//! point. Events are kept in a second threaded red-black tree ordered by
//! `(y, x)`; the earliest one is cached so the sweep can peek it in O(1).

use glam::DVec2;

use crate::epsilon::Tolerance;
use crate::rbtree::{NodeRef, RbTree};

use super::beachline::BeachSection;

/// Predicted collapse of a beach section
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CircleEvent {
    /// Beach section that disappears when the event fires
    pub arc: NodeRef,
    /// Cell of the collapsing arc
    pub cell: usize,
    /// X of the circumcenter
    pub x: f64,
    /// Bottom of the circumcircle, the sweep position at which the event fires
    pub y: f64,
    /// Y of the circumcenter, where the new vertex goes
    pub y_center: f64,
}

impl CircleEvent {
    /// Location of the vertex this event creates
    #[inline]
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.x, self.y_center)
    }

    /// Sweep order: ascending `y`, then ascending `x`
    #[inline]
    fn precedes_or_ties(&self, other: &CircleEvent) -> bool {
        self.y < other.y || (self.y == other.y && self.x <= other.x)
    }
}

#[derive(Debug, Default)]
pub(crate) struct CircleEventQueue {
    events: RbTree<CircleEvent>,
    first: Option<NodeRef>,
    tolerance: Tolerance,
}

impl CircleEventQueue {
    pub fn new(tolerance: Tolerance) -> Self {
        Self {
            events: RbTree::new(),
            first: None,
            tolerance,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Earliest pending event
    #[inline]
    pub fn first(&self) -> Option<CircleEvent> {
        self.first.map(|node| *self.events.get(node))
    }

    #[inline]
    pub fn get(&self, node: NodeRef) -> &CircleEvent {
        self.events.get(node)
    }

    /// Schedule the collapse of `arc` if its neighbors converge on it
    ///
    /// Nothing is scheduled when a neighbor is missing, both neighbors belong
    /// to the same cell, or the three sites turn the wrong way.
    pub fn attach(&mut self, arcs: &mut RbTree<BeachSection>, arc: NodeRef) {
        let (Some(left), Some(right)) = (arcs.prev(arc), arcs.next(arc)) else {
            return;
        };
        let left = *arcs.get(left);
        let right = *arcs.get(right);
        if left.cell == right.cell {
            return;
        }

        let center = arcs.get(arc).site;
        let a = left.site - center;
        let c = right.site - center;

        // Positive or near-zero means the breakpoints diverge
        let d = 2.0 * a.perp_dot(c);
        if d >= -self.tolerance.circle_event {
            return;
        }

        let ha = a.length_squared();
        let hc = c.length_squared();
        let x = (c.y * ha - a.y * hc) / d;
        let y = (a.x * hc - c.x * ha) / d;
        let y_center = y + center.y;
        let event = CircleEvent {
            arc,
            cell: arcs.get(arc).cell,
            x: x + center.x,
            y: y_center + (x * x + y * y).sqrt(),
            y_center,
        };

        let mut predecessor = None;
        let mut cursor = self.events.root();
        while let Some(node) = cursor {
            if event.precedes_or_ties(self.events.get(node)) {
                match self.events.left(node) {
                    Some(left) => cursor = Some(left),
                    None => {
                        predecessor = self.events.prev(node);
                        break;
                    }
                }
            } else {
                match self.events.right(node) {
                    Some(right) => cursor = Some(right),
                    None => {
                        predecessor = Some(node);
                        break;
                    }
                }
            }
        }

        let node = self.events.insert_successor(predecessor, event);
        if predecessor.is_none() {
            self.first = Some(node);
        }
        arcs.get_mut(arc).circle_event = Some(node);
    }

    /// Cancel the pending event of `arc`, if any
    pub fn detach(&mut self, arcs: &mut RbTree<BeachSection>, arc: NodeRef) {
        let Some(node) = arcs.get_mut(arc).circle_event.take() else {
            return;
        };
        if self.events.prev(node).is_none() {
            self.first = self.events.next(node);
        }
        self.events.remove(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arc(cell: usize, x: f64, y: f64) -> BeachSection {
        BeachSection {
            cell,
            site: DVec2::new(x, y),
            edge: None,
            circle_event: None,
        }
    }

    /// Three arcs in beachline order, returning the middle one
    fn triple(arcs: &mut RbTree<BeachSection>, l: DVec2, c: DVec2, r: DVec2, base: usize) -> NodeRef {
        let anchor = arcs.last();
        let left = arcs.insert_successor(anchor, arc(base, l.x, l.y));
        let middle = arcs.insert_successor(Some(left), arc(base + 1, c.x, c.y));
        arcs.insert_successor(Some(middle), arc(base + 2, r.x, r.y));
        middle
    }

    #[test]
    fn test_attach_converging_arcs() {
        let mut arcs = RbTree::new();
        let mut queue = CircleEventQueue::new(Tolerance::default());
        // An older arc squeezed between two newer ones
        let middle = triple(
            &mut arcs,
            DVec2::new(0.0, 2.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(4.0, 2.0),
            0,
        );

        queue.attach(&mut arcs, middle);
        let event = queue.first().unwrap();
        assert_eq!(arcs.get(middle).circle_event, Some(queue.first.unwrap()));
        assert_eq!(event.arc, middle);
        assert_eq!(event.cell, 1);
        // Circle through the three sites: center (2, 2), radius 2
        assert!((event.center() - DVec2::new(2.0, 2.0)).length() < 1e-12);
        assert!((event.y - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_attach_rejects_diverging_and_collinear() {
        let mut arcs = RbTree::new();
        let mut queue = CircleEventQueue::new(Tolerance::default());

        // A newer arc between two older ones only grows
        let middle = triple(
            &mut arcs,
            DVec2::new(0.0, 0.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(4.0, 0.0),
            0,
        );
        queue.attach(&mut arcs, middle);
        assert!(queue.first().is_none());

        let collinear = triple(
            &mut arcs,
            DVec2::new(0.0, 5.0),
            DVec2::new(1.0, 5.0),
            DVec2::new(2.0, 5.0),
            3,
        );
        queue.attach(&mut arcs, collinear);
        assert!(queue.first().is_none());
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_attach_requires_two_distinct_neighbors() {
        let mut arcs = RbTree::new();
        let mut queue = CircleEventQueue::new(Tolerance::default());
        let left = arcs.insert_successor(None, arc(0, 0.0, 0.0));
        let middle = arcs.insert_successor(Some(left), arc(1, 2.0, 2.0));
        queue.attach(&mut arcs, middle);
        assert!(queue.first().is_none());

        // Same cell on both sides
        arcs.insert_successor(Some(middle), arc(0, 0.0, 0.0));
        queue.attach(&mut arcs, middle);
        assert!(queue.first().is_none());
    }

    #[test]
    fn test_first_tracks_earliest_event() {
        let mut arcs = RbTree::new();
        let mut queue = CircleEventQueue::new(Tolerance::default());

        let late = triple(
            &mut arcs,
            DVec2::new(0.0, 4.0),
            DVec2::new(4.0, 0.0),
            DVec2::new(8.0, 4.0),
            0,
        );
        let early = triple(
            &mut arcs,
            DVec2::new(20.0, 1.0),
            DVec2::new(21.0, 0.0),
            DVec2::new(22.0, 1.0),
            3,
        );

        queue.attach(&mut arcs, late);
        assert_eq!(queue.first().unwrap().arc, late);
        queue.attach(&mut arcs, early);
        assert_eq!(queue.first().unwrap().arc, early);

        queue.detach(&mut arcs, early);
        assert!(arcs.get(early).circle_event.is_none());
        assert_eq!(queue.first().unwrap().arc, late);

        queue.detach(&mut arcs, late);
        assert!(queue.first().is_none());

        // Detaching an arc without an event is a no-op
        queue.detach(&mut arcs, late);
        assert_eq!(queue.len(), 0);
    }
}
