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

use num_traits::Float;

use crate::geometry::{Aabb2, Point2};

/// A full line in the plane, in slope/intercept form with the vertical case
/// split out (a vertical line keeps only its x-coordinate).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Line<T>
where
    T: Float,
{
    Slanted { m: T, b: T },
    Vertical { x: T },
}

impl<T> Line<T>
where
    T: Float,
{
    /// Perpendicular bisector of `p` and `q`. Falls into the vertical case
    /// when the two points share a y-coordinate.
    pub fn bisector(p: Point2<T>, q: Point2<T>) -> Self {
        let two = T::one() + T::one();
        if p.y == q.y {
            return Line::Vertical {
                x: (p.x + q.x) / two,
            };
        }
        let m = -(q.x - p.x) / (q.y - p.y);
        let b = (p.y + q.y) / two - m * (p.x + q.x) / two;
        Line::Slanted { m, b }
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Line::Vertical { .. })
    }

    /// y-coordinate at `x`; only meaningful for slanted lines.
    pub fn y_at(&self, x: T) -> T {
        match *self {
            Line::Slanted { m, b } => m * x + b,
            Line::Vertical { .. } => T::nan(),
        }
    }

    /// Intersection point of two lines. `None` when they are parallel
    /// (including two verticals).
    pub fn intersection(&self, other: &Line<T>) -> Option<Point2<T>> {
        match (*self, *other) {
            (Line::Vertical { .. }, Line::Vertical { .. }) => None,
            (Line::Vertical { x }, Line::Slanted { m, b }) => Some(Point2::new(x, m * x + b)),
            (Line::Slanted { m, b }, Line::Vertical { x }) => Some(Point2::new(x, m * x + b)),
            (Line::Slanted { m: m1, b: b1 }, Line::Slanted { m: m2, b: b2 }) => {
                if m1 == m2 {
                    return None;
                }
                let x = (b2 - b1) / (m1 - m2);
                Some(Point2::new(x, m1 * x + b1))
            }
        }
    }

    /// The two crossings of this line with the boundary of `aabb`, or `None`
    /// when the line misses the box.
    ///
    /// Up to six side-crossing candidates are tested by interval membership
    /// (with `eps` slack); when several pairs qualify the last one wins,
    /// which keeps corner-grazing lines on a single consistent pair.
    pub fn intersect_box(&self, aabb: &Aabb2<T>, eps: T) -> Option<(Point2<T>, Point2<T>)> {
        let (x0, x1) = (aabb.min.x, aabb.max.x);
        let (y0, y1) = (aabb.min.y, aabb.max.y);

        let (m, b) = match *self {
            Line::Vertical { x } => {
                if x < x0 - eps || x > x1 + eps {
                    return None;
                }
                return Some((Point2::new(x, y0), Point2::new(x, y1)));
            }
            Line::Slanted { m, b } => (m, b),
        };

        let lies_in = |v: T, lo: T, hi: T| v >= lo - eps && v <= hi + eps;

        // x at the bottom/top sides, y at the left/right sides
        let x_bot = (y0 - b) / m;
        let x_top = (y1 - b) / m;
        let y_left = m * x0 + b;
        let y_right = m * x1 + b;

        let mut hit = None;
        if lies_in(x_bot, x0, x1) && lies_in(x_top, x0, x1) {
            hit = Some((Point2::new(x_bot, y0), Point2::new(x_top, y1)));
        }
        if lies_in(x_bot, x0, x1) && lies_in(y_left, y0, y1) {
            hit = Some((Point2::new(x_bot, y0), Point2::new(x0, y_left)));
        }
        if lies_in(x_bot, x0, x1) && lies_in(y_right, y0, y1) {
            hit = Some((Point2::new(x_bot, y0), Point2::new(x1, y_right)));
        }
        if lies_in(x_top, x0, x1) && lies_in(y_left, y0, y1) {
            hit = Some((Point2::new(x0, y_left), Point2::new(x_top, y1)));
        }
        if lies_in(x_top, x0, x1) && lies_in(y_right, y0, y1) {
            hit = Some((Point2::new(x1, y_right), Point2::new(x_top, y1)));
        }
        if lies_in(y_left, y0, y1) && lies_in(y_right, y0, y1) {
            hit = if y_left > y_right {
                Some((Point2::new(x1, y_right), Point2::new(x0, y_left)))
            } else {
                Some((Point2::new(x0, y_left), Point2::new(x1, y_right)))
            };
        }
        hit
    }
}
