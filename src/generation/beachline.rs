//! Beachline of the sweep
//!
//! The arcs currently visible above the sweep line, stored left to right in a
//! threaded red-black tree. Each arc remembers the edge traced by the
//! breakpoint on its left and the circle event that would remove it.

use std::collections::VecDeque;

use glam::DVec2;

use crate::diagram::DiagramBuilder;
use crate::epsilon::Tolerance;
use crate::geometry::{circumcenter, parabola_intersection_x};
use crate::rbtree::{NodeRef, RbTree};

use super::circle::{CircleEvent, CircleEventQueue};

/// One parabolic arc of the beachline
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BeachSection {
    /// Cell whose site is the focus of this arc
    pub cell: usize,
    pub site: DVec2,
    /// Edge traced by the breakpoint between this arc and its predecessor
    pub edge: Option<usize>,
    pub circle_event: Option<NodeRef>,
}

impl BeachSection {
    fn new(cell: usize, site: DVec2) -> Self {
        Self {
            cell,
            site,
            edge: None,
            circle_event: None,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Beachline {
    arcs: RbTree<BeachSection>,
    events: CircleEventQueue,
    tolerance: Tolerance,
}

impl Beachline {
    pub fn new(tolerance: Tolerance) -> Self {
        Self {
            arcs: RbTree::new(),
            events: CircleEventQueue::new(tolerance),
            tolerance,
        }
    }

    /// Earliest pending circle event
    #[inline]
    pub fn first_event(&self) -> Option<CircleEvent> {
        self.events.first()
    }

    #[inline]
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// X of the breakpoint on the left of `arc` when the sweep is at `directrix`
    fn left_breakpoint(&self, arc: NodeRef, directrix: f64) -> f64 {
        let site = self.arcs.get(arc).site;
        if site.y == directrix {
            return site.x;
        }
        match self.arcs.prev(arc) {
            Some(prev) => parabola_intersection_x(self.arcs.get(prev).site, site, directrix),
            None => f64::NEG_INFINITY,
        }
    }

    fn right_breakpoint(&self, arc: NodeRef, directrix: f64) -> f64 {
        if let Some(next) = self.arcs.next(arc) {
            return self.left_breakpoint(next, directrix);
        }
        let site = self.arcs.get(arc).site;
        if site.y == directrix {
            site.x
        } else {
            f64::INFINITY
        }
    }

    /// Find the arcs on either side of a new site
    ///
    /// Both are the same arc when the site falls inside it; the left one is
    /// `None` when the site is left of every breakpoint, and both are `None`
    /// only for an empty beachline.
    fn locate(&self, site: DVec2) -> (Option<NodeRef>, Option<NodeRef>) {
        let eps = self.tolerance.epsilon;
        let mut cursor = self.arcs.root();
        while let Some(node) = cursor {
            let dxl = self.left_breakpoint(node, site.y) - site.x;
            if dxl > eps {
                match self.arcs.left(node) {
                    Some(left) => cursor = Some(left),
                    None => return (None, Some(node)),
                }
                continue;
            }
            let dxr = site.x - self.right_breakpoint(node, site.y);
            if dxr > eps {
                match self.arcs.right(node) {
                    Some(right) => cursor = Some(right),
                    None => return (Some(node), None),
                }
                continue;
            }
            return if dxl > -eps {
                (self.arcs.prev(node), Some(node))
            } else if dxr > -eps {
                (Some(node), self.arcs.next(node))
            } else {
                (Some(node), Some(node))
            };
        }
        (None, None)
    }

    /// Insert the arc of a new site
    pub fn add(&mut self, builder: &mut DiagramBuilder, cell: usize) {
        let site = builder.site(cell);
        let (left_arc, right_arc) = self.locate(site);
        let new_arc = self.arcs.insert_successor(left_arc, BeachSection::new(cell, site));

        match (left_arc, right_arc) {
            (None, None) => {}
            (Some(left), Some(right)) if left == right => {
                // Split the arc in two around the new one
                self.events.detach(&mut self.arcs, left);
                let split = *self.arcs.get(left);
                let copy = self
                    .arcs
                    .insert_successor(Some(new_arc), BeachSection::new(split.cell, split.site));
                let edge = builder.create_edge(split.cell, cell, None, None);
                self.arcs.get_mut(new_arc).edge = Some(edge);
                self.arcs.get_mut(copy).edge = Some(edge);
                self.events.attach(&mut self.arcs, left);
                self.events.attach(&mut self.arcs, copy);
            }
            (Some(left), None) => {
                let left_cell = self.arcs.get(left).cell;
                let edge = builder.create_edge(left_cell, cell, None, None);
                self.arcs.get_mut(new_arc).edge = Some(edge);
            }
            (None, Some(right)) => {
                let right_cell = self.arcs.get(right).cell;
                let edge = builder.create_edge(cell, right_cell, None, None);
                self.arcs.get_mut(right).edge = Some(edge);
            }
            (Some(left), Some(right)) => {
                // Landing on a breakpoint: the arc between the two vanishes at once
                self.events.detach(&mut self.arcs, left);
                self.events.detach(&mut self.arcs, right);
                let l = *self.arcs.get(left);
                let r = *self.arcs.get(right);

                let vertex = builder.create_vertex(circumcenter(l.site, site, r.site).unwrap_or(site));
                if let Some(edge) = r.edge {
                    builder.set_edge_start_point(edge, l.cell, r.cell, vertex);
                }
                let new_edge = builder.create_edge(l.cell, cell, None, Some(vertex));
                self.arcs.get_mut(new_arc).edge = Some(new_edge);
                let right_edge = builder.create_edge(cell, r.cell, None, Some(vertex));
                self.arcs.get_mut(right).edge = Some(right_edge);

                self.events.attach(&mut self.arcs, left);
                self.events.attach(&mut self.arcs, right);
            }
        }
    }

    /// Whether `arc` is scheduled to collapse at `center`
    fn collapses_at(&self, arc: NodeRef, center: DVec2) -> bool {
        self.arcs.get(arc).circle_event.is_some_and(|node| {
            let event = self.events.get(node);
            (center.x - event.x).abs() < self.tolerance.vertex_merge
                && (center.y - event.y_center).abs() < self.tolerance.vertex_merge
        })
    }

    /// Drop an arc and its pending event, returning its last state
    fn detach_section(&mut self, arc: NodeRef) -> BeachSection {
        self.events.detach(&mut self.arcs, arc);
        let section = *self.arcs.get(arc);
        self.arcs.remove(arc);
        section
    }

    /// Fire a circle event: remove the collapsing arc and open a new vertex
    ///
    /// Neighboring arcs collapsing at the same point go with it, so a vertex
    /// of any degree is created once.
    pub fn remove(&mut self, builder: &mut DiagramBuilder, event: CircleEvent) {
        let arc = event.arc;
        let (Some(mut left_arc), Some(mut right_arc)) = (self.arcs.prev(arc), self.arcs.next(arc))
        else {
            // Only arcs with two neighbors are ever scheduled
            self.events.detach(&mut self.arcs, arc);
            return;
        };

        let center = event.center();
        let vertex = builder.create_vertex(center);
        let mut collapsed = VecDeque::new();
        collapsed.push_back(self.detach_section(arc));

        while self.collapses_at(left_arc, center) {
            let Some(prev) = self.arcs.prev(left_arc) else {
                break;
            };
            collapsed.push_front(self.detach_section(left_arc));
            left_arc = prev;
        }
        self.events.detach(&mut self.arcs, left_arc);
        collapsed.push_front(*self.arcs.get(left_arc));

        while self.collapses_at(right_arc, center) {
            let Some(next) = self.arcs.next(right_arc) else {
                break;
            };
            collapsed.push_back(self.detach_section(right_arc));
            right_arc = next;
        }
        self.events.detach(&mut self.arcs, right_arc);
        collapsed.push_back(*self.arcs.get(right_arc));

        for (l, r) in collapsed.iter().zip(collapsed.iter().skip(1)) {
            if let Some(edge) = r.edge {
                builder.set_edge_start_point(edge, l.cell, r.cell, vertex);
            }
        }

        let left_cell = self.arcs.get(left_arc).cell;
        let right_cell = self.arcs.get(right_arc).cell;
        let edge = builder.create_edge(left_cell, right_cell, None, Some(vertex));
        self.arcs.get_mut(right_arc).edge = Some(edge);

        self.events.attach(&mut self.arcs, left_arc);
        self.events.attach(&mut self.arcs, right_arc);
    }
}
