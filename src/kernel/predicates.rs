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

use crate::geometry::Point2;

/// Position of `c` relative to the directed line through `a` then `b`.
/// The collinear case is split further by where `c` falls along the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    CounterClockwise,
    Clockwise,
    /// Collinear, `c` on the far side of `a` from `b`.
    CollinearBefore,
    /// Collinear, `c` within the segment's extent (endpoints included).
    CollinearOn,
    /// Collinear, `c` past `b`.
    CollinearAfter,
}

/// Orientation of the triple `(a, b, c)`, signed-area test with collinear
/// sub-classification on Manhattan extent.
pub fn orientation<T: Float>(a: Point2<T>, b: Point2<T>, c: Point2<T>) -> Orientation {
    let det = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
    if det > T::zero() {
        return Orientation::CounterClockwise;
    }
    if det < T::zero() {
        return Orientation::Clockwise;
    }
    if (b.x - a.x) * (c.x - a.x) < T::zero() || (b.y - a.y) * (c.y - a.y) < T::zero() {
        return Orientation::CollinearBefore;
    }
    if (b.x - a.x).abs() + (b.y - a.y).abs() >= (c.x - a.x).abs() + (c.y - a.y).abs() {
        Orientation::CollinearOn
    } else {
        Orientation::CollinearAfter
    }
}

/// Do the breakpoints `(a, b)` and `(b, c)` converge as the sweep advances?
/// True exactly when the three sites make a clockwise turn, which is when
/// the circumcenter lies below both breakpoints' meeting point.
pub fn convergent<T: Float>(a: Point2<T>, b: Point2<T>, c: Point2<T>) -> bool {
    orientation(a, b, c) == Orientation::Clockwise
}

/// Circumcenter and radius of the circle through three points, `None` when
/// the points are collinear.
pub fn circumcircle<T: Float>(
    a: Point2<T>,
    b: Point2<T>,
    c: Point2<T>,
) -> Option<(Point2<T>, T)> {
    let two = T::one() + T::one();

    let x12 = a.x - b.x;
    let x13 = a.x - c.x;
    let y12 = a.y - b.y;
    let y13 = a.y - c.y;

    let sx13 = a.x * a.x - c.x * c.x;
    let sy13 = a.y * a.y - c.y * c.y;
    let sx21 = b.x * b.x - a.x * a.x;
    let sy21 = b.y * b.y - a.y * a.y;

    let denom_f = two * ((c.y - a.y) * x12 - (b.y - a.y) * x13);
    let denom_g = two * ((c.x - a.x) * y12 - (b.x - a.x) * y13);
    if denom_f == T::zero() || denom_g == T::zero() {
        return None;
    }

    let f = (sx13 * x12 + sy13 * x12 + sx21 * x13 + sy21 * x13) / denom_f;
    let g = (sx13 * y12 + sy13 * y12 + sx21 * y13 + sy21 * y13) / denom_g;

    let p = -a.x * a.x - a.y * a.y - two * g * a.x - two * f * a.y;
    let center = Point2::new(-g, -f);
    let radius = (center.x * center.x + center.y * center.y - p).sqrt();
    Some((center, radius))
}

/// Priority point of the circle event for three sites: the circumcenter's x
/// paired with the lowest y on the circumcircle.
pub fn circle_event_point<T: Float>(
    a: Point2<T>,
    b: Point2<T>,
    c: Point2<T>,
) -> Option<Point2<T>> {
    let (center, radius) = circumcircle(a, b, c)?;
    Some(Point2::new(center.x, center.y - radius))
}
