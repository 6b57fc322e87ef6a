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

use crate::dcel::HalfEdge;
use crate::error::BuildError;
use crate::geometry::{Aabb2, Line, Point2};
use crate::sweep::EPS;
use crate::sweep::diagram::Builder;

/// Margin added around sites and vertices when fitting the bounding box.
const BOX_MARGIN: f64 = 0.1;

/// Box sides in counterclockwise traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Bottom,
    Right,
    Top,
    Left,
}

impl Side {
    fn next_ccw(self) -> Side {
        match self {
            Side::Bottom => Side::Right,
            Side::Right => Side::Top,
            Side::Top => Side::Left,
            Side::Left => Side::Bottom,
        }
    }

    /// Index into the corner table of the corner this side runs into.
    fn exit_corner(self) -> usize {
        match self {
            Side::Bottom => 1, // right-bottom
            Side::Right => 2,  // right-top
            Side::Top => 3,    // left-top
            Side::Left => 0,   // left-bottom
        }
    }

    /// Does the counterclockwise run along this side reach `to` from
    /// `from` without passing a corner?
    fn ccw_forward(self, from: Point2<f64>, to: Point2<f64>) -> bool {
        match self {
            Side::Bottom => to.x >= from.x,
            Side::Right => to.y >= from.y,
            Side::Top => to.x <= from.x,
            Side::Left => to.y <= from.y,
        }
    }
}

/// Which side of the box a clipped endpoint lies on. A corner point is
/// claimed by one side; the corner-dropping rule in the stitching walk
/// makes the choice irrelevant.
fn side_of(p: Point2<f64>, bounds: &Aabb2<f64>) -> Side {
    if (p.x - bounds.max.x).abs() <= EPS {
        Side::Right
    } else if (p.y - bounds.max.y).abs() <= EPS {
        Side::Top
    } else if (p.x - bounds.min.x).abs() <= EPS {
        Side::Left
    } else {
        Side::Bottom
    }
}

impl<'s> Builder<'s> {
    /// Fits the box around all sites and circle-event vertices.
    pub(super) fn bounding_box(&self) -> Aabb2<f64> {
        let points = self
            .sites
            .iter()
            .copied()
            .chain(self.dcel.vertices.iter().map(|v| v.position));
        match Aabb2::from_points(points) {
            Some(b) => b.expanded(BOX_MARGIN),
            None => Aabb2::new(Point2::new(0.0, 0.0), Point2::new(0.0, 0.0)),
        }
    }

    /// Resolves every edge still traced by a live breakpoint against the
    /// bounding box. An edge shared by two live breakpoints is clipped on
    /// the first visit and skipped on the second.
    pub(super) fn clip_edges(&mut self) -> Result<(), BuildError> {
        for bp in self.beach.live_breakpoints() {
            let edge = self.beach.bp(bp).edge.ok_or(BuildError::UnresolvedEdge)?;
            let [h1, _] = self.dcel.edges[edge].halves;
            let origin = self.dcel.half_edges[h1].origin;
            let destination = self.dcel.half_edges[h1].destination;
            if origin.is_some() && destination.is_some() {
                continue;
            }

            let line = self.dcel.edges[edge].line;
            let crossings = line
                .intersect_box(&self.bounds, EPS)
                .ok_or(BuildError::UnresolvedEdge)?;

            if self.dcel.edges[edge].upper {
                // only ever traced downward; the open end exits at the top
                if origin.is_none() && destination.is_none() {
                    self.resolve_both(edge, crossings);
                } else {
                    let v = self.dcel.add_vertex(crossings.1);
                    self.resolve_one(edge, v);
                }
            } else if origin.is_none() && destination.is_none() {
                self.resolve_both(edge, crossings);
            } else {
                // pick the crossing on the ray the breakpoint still traces,
                // probed one unit below the final sweep position
                let probe = self.ray_probe(bp, &line);
                let chosen = if crossings.0.distance_squared(&probe)
                    >= crossings.1.distance_squared(&probe)
                {
                    crossings.1
                } else {
                    crossings.0
                };
                let v = self.dcel.add_vertex(chosen);
                self.resolve_one(edge, v);
            }
        }
        Ok(())
    }

    /// A point on the open ray of the edge traced by `bp`, from the
    /// breakpoint position at a sweepline one unit below the last event.
    fn ray_probe(&self, bp: usize, line: &Line<f64>) -> Point2<f64> {
        let y = self.sweep_y - 1.0;
        let x = self.beach.breakpoint_x(bp, y);
        match *line {
            Line::Vertical { .. } => Point2::new(x, self.beach.breakpoint_y(bp, y)),
            Line::Slanted { m, b } => Point2::new(x, m * x + b),
        }
    }

    /// Assigns both box crossings to a fully unbounded edge, ordered so
    /// each half keeps its face on the left.
    fn resolve_both(&mut self, edge: usize, crossings: (Point2<f64>, Point2<f64>)) {
        let (p1, p2) = crossings;
        let [h1, h2] = self.dcel.edges[edge].halves;
        let site = self.sites[self.dcel.half_edges[h1].face];
        let cross = (p2.x - p1.x) * (site.y - p1.y) - (p2.y - p1.y) * (site.x - p1.x);
        let (a, b) = if cross > 0.0 { (p1, p2) } else { (p2, p1) };

        let va = self.dcel.add_vertex(a);
        let vb = self.dcel.add_vertex(b);
        self.dcel.half_edges[h1].origin = Some(va);
        self.dcel.half_edges[h1].destination = Some(vb);
        self.dcel.half_edges[h2].origin = Some(vb);
        self.dcel.half_edges[h2].destination = Some(va);
    }

    /// Fills the single open end of `edge` with vertex `v`.
    fn resolve_one(&mut self, edge: usize, v: usize) {
        let [h1, h2] = self.dcel.edges[edge].halves;
        if self.dcel.half_edges[h1].origin.is_none() {
            self.dcel.half_edges[h1].origin = Some(v);
            self.dcel.half_edges[h2].destination = Some(v);
        } else {
            self.dcel.half_edges[h1].destination = Some(v);
            self.dcel.half_edges[h2].origin = Some(v);
        }
    }

    /// Edges no breakpoint traces anymore but with an endpoint still open:
    /// bisectors of same-row site pairs, vertical with the open ray upward.
    pub(super) fn close_dangling_edges(&mut self) -> Result<(), BuildError> {
        for edge in 0..self.dcel.edges.len() {
            let [h1, _] = self.dcel.edges[edge].halves;
            let origin = self.dcel.half_edges[h1].origin;
            let destination = self.dcel.half_edges[h1].destination;
            match (origin, destination) {
                (Some(_), Some(_)) => continue,
                (None, None) => return Err(BuildError::UnresolvedEdge),
                _ => {}
            }
            let x = match self.dcel.edges[edge].line {
                Line::Vertical { x } => x,
                Line::Slanted { .. } => return Err(BuildError::UnresolvedEdge),
            };
            let v = self.dcel.add_vertex(Point2::new(x, self.bounds.max.y));
            self.resolve_one(edge, v);
        }
        Ok(())
    }

    fn corner_vertices(&mut self, cache: &mut Option<[usize; 4]>) -> [usize; 4] {
        if let Some(ids) = cache {
            return *ids;
        }
        let ids = [
            self.dcel.add_vertex(self.bounds.left_bottom()),
            self.dcel.add_vertex(self.bounds.right_bottom()),
            self.dcel.add_vertex(self.bounds.right_top()),
            self.dcel.add_vertex(self.bounds.left_top()),
        ];
        *cache = Some(ids);
        ids
    }

    fn push_box_half(&mut self, face: usize, origin: usize, destination: usize) -> usize {
        let idx = self.dcel.half_edges.len();
        let mut half = HalfEdge::new(face);
        half.box_edge = true;
        half.origin = Some(origin);
        half.destination = Some(destination);
        self.dcel.half_edges.push(half);
        idx
    }

    /// Stitches every open face boundary along the box, walking corners
    /// counterclockwise from the open chain's last vertex back to its
    /// first. Box halves have no twin.
    pub(super) fn close_faces(&mut self) -> Result<(), BuildError> {
        let mut corners: Option<[usize; 4]> = None;
        let limit = self.dcel.half_edges.len() + 1;

        for face in 0..self.dcel.faces.len() {
            let Some(start) = self.dcel.faces[face].half_edge else {
                // a face with no edges at all owns the whole box
                let ids = self.corner_vertices(&mut corners);
                let mut cycle = [0usize; 4];
                for k in 0..4 {
                    cycle[k] = self.push_box_half(face, ids[k], ids[(k + 1) % 4]);
                }
                for k in 0..4 {
                    self.dcel.link(cycle[k], cycle[(k + 1) % 4]);
                }
                self.dcel.faces[face].half_edge = Some(cycle[0]);
                continue;
            };

            // find the open ends of the chain, or skip a closed cycle
            let mut tail = start;
            let mut closed = false;
            for _ in 0..limit {
                match self.dcel.half_edges[tail].next {
                    Some(next) => {
                        if next == start {
                            closed = true;
                            break;
                        }
                        tail = next;
                    }
                    None => break,
                }
            }
            if closed {
                continue;
            }
            let mut head = start;
            for _ in 0..limit {
                match self.dcel.half_edges[head].prev {
                    Some(prev) => head = prev,
                    None => break,
                }
            }

            let v1 = self.dcel.half_edges[tail]
                .destination
                .ok_or(BuildError::UnresolvedEdge)?;
            let v2 = self.dcel.half_edges[head]
                .origin
                .ok_or(BuildError::UnresolvedEdge)?;
            let p1 = self.dcel.vertices[v1].position;
            let p2 = self.dcel.vertices[v2].position;

            if v1 == v2 || p1.approx_eq(&p2, EPS) {
                self.dcel.link(tail, head);
                continue;
            }

            let ids = self.corner_vertices(&mut corners);
            let mut path: Vec<usize> = Vec::new();
            let mut side = side_of(p1, &self.bounds);
            let target = side_of(p2, &self.bounds);
            if side != target || !side.ccw_forward(p1, p2) {
                loop {
                    path.push(ids[side.exit_corner()]);
                    side = side.next_ccw();
                    if side == target {
                        break;
                    }
                }
            }
            // a corner coinciding with an endpoint is already in the chain
            while path.first().is_some_and(|&c| {
                self.dcel.vertices[c].position.approx_eq(&p1, EPS)
            }) {
                path.remove(0);
            }
            while path.last().is_some_and(|&c| {
                self.dcel.vertices[c].position.approx_eq(&p2, EPS)
            }) {
                path.pop();
            }

            let mut chain = Vec::with_capacity(path.len() + 2);
            chain.push(v1);
            chain.extend(path);
            chain.push(v2);

            let mut prev_half = tail;
            for pair in chain.windows(2) {
                let half = self.push_box_half(face, pair[0], pair[1]);
                self.dcel.link(prev_half, half);
                prev_half = half;
            }
            self.dcel.link(prev_half, head);
        }

        // every boundary must walk as a closed cycle now
        for face in 0..self.dcel.faces.len() {
            self.dcel.face_cycle(face)?;
        }
        Ok(())
    }
}
