// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use crate::dcel::{Dcel, Face};
use crate::error::BuildError;
use crate::geometry::{Aabb2, Line, Point2};
use crate::kernel::{circle_event_point, convergent};
use crate::sweep::EPS;
use crate::sweep::beachline::{Beachline, Insertion, NIL};
use crate::sweep::event::{EventKind, EventQueue};

/// A planar Voronoi diagram clipped to a bounding box.
#[derive(Debug)]
pub struct Voronoi {
    pub sites: Vec<Point2<f64>>,
    pub dcel: Dcel,
    pub bounds: Aabb2<f64>,
}

impl Voronoi {
    /// Runs the sweep over `sites` and returns the finished diagram. The
    /// bounding box encloses all sites and Voronoi vertices with a margin,
    /// and every cell is closed along it. Duplicate sites are not supported.
    pub fn build(sites: &[Point2<f64>]) -> Result<Voronoi, BuildError> {
        let mut builder = Builder::new(sites);
        builder.run()?;
        Ok(Voronoi {
            sites: sites.to_vec(),
            dcel: builder.dcel,
            bounds: builder.bounds,
        })
    }

    /// The boundary polygon of `face`, counterclockwise, one point per
    /// boundary vertex. Build guarantees every face cycle closes.
    pub fn face_polygon(&self, face: usize) -> Vec<Point2<f64>> {
        let mut out = Vec::new();
        let Some(start) = self.dcel.faces[face].half_edge else {
            return out;
        };
        let mut current = start;
        loop {
            let he = &self.dcel.half_edges[current];
            let Some(origin) = he.origin else {
                return out;
            };
            out.push(self.dcel.vertices[origin].position);
            let Some(next) = he.next else {
                return out;
            };
            current = next;
            if current == start || out.len() > self.dcel.half_edges.len() {
                return out;
            }
        }
    }

    /// The face whose cell contains `p`, or `None` when `p` lies outside
    /// the bounding box.
    pub fn locate(&self, p: Point2<f64>) -> Option<usize> {
        (0..self.dcel.faces.len()).find(|&f| polygon_contains(&self.face_polygon(f), p))
    }
}

/// Point-in-convex-polygon for a counterclockwise boundary, boundary
/// points included.
fn polygon_contains(polygon: &[Point2<f64>], p: Point2<f64>) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
        if cross < -EPS {
            return false;
        }
    }
    true
}

/// Sweep state: the beachline, the event queue, and the diagram being
/// assembled.
pub(super) struct Builder<'s> {
    pub(super) sites: &'s [Point2<f64>],
    pub(super) beach: Beachline<'s>,
    pub(super) queue: EventQueue,
    pub(super) dcel: Dcel,
    pub(super) sweep_y: f64,
    pub(super) bounds: Aabb2<f64>,
}

impl<'s> Builder<'s> {
    fn new(sites: &'s [Point2<f64>]) -> Self {
        Builder {
            sites,
            beach: Beachline::new(sites),
            queue: EventQueue::new(),
            dcel: Dcel::new(),
            sweep_y: 0.0,
            bounds: Aabb2::new(Point2::new(0.0, 0.0), Point2::new(0.0, 0.0)),
        }
    }

    fn run(&mut self) -> Result<(), BuildError> {
        for (i, &site) in self.sites.iter().enumerate() {
            self.dcel.faces.push(Face::new(i));
            self.queue.push(site, EventKind::Site { site: i });
        }

        while let Some(event) = self.queue.pop() {
            match event.kind {
                EventKind::Site { site } => self.handle_site(site),
                EventKind::Circle { arc } => self.handle_circle(arc, event.point)?,
            }
        }

        self.bounds = self.bounding_box();
        self.clip_edges()?;
        self.close_dangling_edges()?;
        self.close_faces()?;

        debug_assert!(self.euler_formula_holds());
        Ok(())
    }

    fn handle_site(&mut self, i: usize) {
        self.sweep_y = self.sites[i].y;

        if self.beach.is_empty() {
            self.beach.insert_first(i);
            return;
        }

        let above = self.beach.locate(self.sites[i].x, self.sweep_y);
        let j = self.beach.arc(above).site;
        if let Some(ev) = self.beach.arc(above).event {
            self.queue.invalidate(ev);
        }
        let first_pair = self.beach.len() == 1;

        let line = Line::bisector(self.sites[i], self.sites[j]);
        let edge = self.dcel.add_edge(line, i, j);
        let [half_i, half_j] = self.dcel.edges[edge].halves;
        self.dcel.faces[i].half_edge = Some(half_i);
        self.dcel.faces[j].half_edge = Some(half_j);

        match self.beach.split(above, i) {
            Insertion::SameRow { breakpoint, left, right } => {
                if first_pair {
                    // bisector of the two topmost sites on one row: only
                    // its lower ray is ever traced
                    self.dcel.edges[edge].upper = true;
                }
                self.beach.bp_mut(breakpoint).edge = Some(edge);
                self.try_circle(left);
                self.try_circle(right);
            }
            Insertion::Split { arc } => {
                let data = *self.beach.arc(arc);
                self.beach.bp_mut(data.left_bp).edge = Some(edge);
                self.beach.bp_mut(data.right_bp).edge = Some(edge);
                self.try_circle(data.prev);
                self.try_circle(data.next);
            }
        }
    }

    fn handle_circle(&mut self, arc: usize, point: Point2<f64>) -> Result<(), BuildError> {
        self.sweep_y = point.y;
        let data = *self.beach.arc(arc);

        let left_edge = self
            .beach
            .bp(data.left_bp)
            .edge
            .ok_or(BuildError::UnresolvedEdge)?;
        let right_edge = self
            .beach
            .bp(data.right_bp)
            .edge
            .ok_or(BuildError::UnresolvedEdge)?;

        // the two converging edges meet at the new Voronoi vertex
        let position = self.dcel.edges[left_edge]
            .line
            .intersection(&self.dcel.edges[right_edge].line)
            .ok_or(BuildError::DegenerateInput)?;
        let v = self.dcel.add_vertex(position);

        let i = data.site;
        let i1 = self.beach.arc(data.prev).site;
        let i2 = self.beach.arc(data.next).site;

        let one = self.dcel.half_for_face(left_edge, i);
        let two = self.dcel.half_for_face(right_edge, i);
        let three = self.dcel.half_for_face(right_edge, i2);
        let six = self.dcel.half_for_face(left_edge, i1);

        // new edge between the neighbouring sites, traced downward from v
        let line = Line::bisector(self.sites[i1], self.sites[i2]);
        let edge = self.dcel.add_edge(line, i2, i1);
        let [four, five] = self.dcel.edges[edge].halves;

        self.dcel.link(one, two);
        self.dcel.half_edges[one].destination = Some(v);
        self.dcel.half_edges[two].origin = Some(v);

        self.dcel.link(three, four);
        self.dcel.half_edges[three].destination = Some(v);
        self.dcel.half_edges[four].origin = Some(v);

        self.dcel.link(five, six);
        self.dcel.half_edges[five].destination = Some(v);
        self.dcel.half_edges[six].origin = Some(v);

        self.dcel.vertices[v].half_edge = Some(two);

        for node in [arc, data.prev, data.next] {
            if let Some(ev) = self.beach.arc(node).event {
                self.queue.invalidate(ev);
            }
        }

        let removal = self.beach.remove_arc(arc);
        self.beach.bp_mut(removal.survivor).edge = Some(edge);
        self.try_circle(removal.prev);
        self.try_circle(removal.next);
        Ok(())
    }

    /// Schedules a circle event for the arc `q` if its neighbours' edges
    /// converge below the sweepline.
    fn try_circle(&mut self, q: usize) {
        if q == NIL {
            return;
        }
        let data = *self.beach.arc(q);
        if data.prev == NIL || data.next == NIL {
            return;
        }
        let a = self.sites[self.beach.arc(data.prev).site];
        let b = self.sites[data.site];
        let c = self.sites[self.beach.arc(data.next).site];
        if !convergent(a, b, c) {
            return;
        }
        if let Some(point) = circle_event_point(a, b, c) {
            let id = self.queue.push(point, EventKind::Circle { arc: q });
            self.beach.arc_mut(q).event = Some(id);
        }
    }

    /// V - E + F = 2 with all unbounded edges meeting in one implicit
    /// vertex at infinity; only vertices created by circle events count.
    fn euler_formula_holds(&self) -> bool {
        if self.sites.is_empty() {
            return true;
        }
        let finite = self
            .dcel
            .vertices
            .iter()
            .filter(|v| v.half_edge.is_some())
            .count() as i64;
        let edges = self.dcel.edges.len() as i64;
        let faces = self.dcel.faces.len() as i64;
        finite - edges + faces + 1 == 2
    }
}
