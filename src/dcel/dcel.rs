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

use crate::dcel::{Face, HalfEdge, Vertex, VoronoiEdge};
use crate::error::BuildError;
use crate::geometry::{Line, Point2};

/// Doubly-connected edge list produced by the sweep. Records live in flat
/// arenas and refer to each other by index.
#[derive(Debug, Default)]
pub struct Dcel {
    pub vertices: Vec<Vertex>,
    pub half_edges: Vec<HalfEdge>,
    pub faces: Vec<Face>,
    pub edges: Vec<VoronoiEdge>,
}

impl Dcel {
    pub fn new() -> Self {
        Dcel::default()
    }

    pub fn add_vertex(&mut self, position: Point2<f64>) -> usize {
        let idx = self.vertices.len();
        self.vertices.push(Vertex::new(position));
        idx
    }

    /// Creates a full edge on `line` with a twin pair of halves, the first
    /// bordering `face_a` and the second `face_b`. Returns the edge index.
    pub fn add_edge(&mut self, line: Line<f64>, face_a: usize, face_b: usize) -> usize {
        let ha = self.half_edges.len();
        let hb = ha + 1;
        let mut first = HalfEdge::new(face_a);
        first.twin = Some(hb);
        let mut second = HalfEdge::new(face_b);
        second.twin = Some(ha);
        self.half_edges.push(first);
        self.half_edges.push(second);

        let idx = self.edges.len();
        self.edges.push(VoronoiEdge {
            line,
            halves: [ha, hb],
            upper: false,
        });
        idx
    }

    /// The half of `edge` that borders `face`.
    pub fn half_for_face(&self, edge: usize, face: usize) -> usize {
        let [ha, hb] = self.edges[edge].halves;
        if self.half_edges[ha].face == face { ha } else { hb }
    }

    /// Chains `a` into `b` (`a.next = b`, `b.prev = a`).
    pub fn link(&mut self, a: usize, b: usize) {
        self.half_edges[a].next = Some(b);
        self.half_edges[b].prev = Some(a);
    }

    /// Walks the boundary cycle of `face` starting from its stored
    /// half-edge. Fails if the cycle is broken or does not close within the
    /// arena size.
    pub fn face_cycle(&self, face: usize) -> Result<Vec<usize>, BuildError> {
        let start = self.faces[face].half_edge.ok_or(BuildError::UnresolvedEdge)?;
        let mut cycle = Vec::new();
        let mut current = start;
        loop {
            cycle.push(current);
            current = self.half_edges[current]
                .next
                .ok_or(BuildError::UnresolvedEdge)?;
            if current == start {
                return Ok(cycle);
            }
            if cycle.len() > self.half_edges.len() {
                return Err(BuildError::UnresolvedEdge);
            }
        }
    }
}
