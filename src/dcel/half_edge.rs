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

/// One of the two directed halves of an edge. Endpoints stay `None` while
/// the sweep is running and are filled in by circle events and the bounding
/// pass. Box-boundary halves added when closing faces have no twin.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge {
    pub origin: Option<usize>,
    pub destination: Option<usize>,
    pub twin: Option<usize>,
    pub face: usize,
    pub prev: Option<usize>,
    pub next: Option<usize>,
    pub box_edge: bool,
}

impl HalfEdge {
    pub fn new(face: usize) -> Self {
        HalfEdge {
            origin: None,
            destination: None,
            twin: None,
            face,
            prev: None,
            next: None,
            box_edge: false,
        }
    }
}
