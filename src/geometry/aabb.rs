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

/// Axis-aligned bounding box given by its min and max corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2<T>
where
    T: Float,
{
    pub min: Point2<T>,
    pub max: Point2<T>,
}

impl<T> Aabb2<T>
where
    T: Float,
{
    pub fn new(min: Point2<T>, max: Point2<T>) -> Self {
        Aabb2 { min, max }
    }

    /// Smallest box enclosing `points`, or `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point2<T>>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut min = first;
        let mut max = first;
        for p in iter {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some(Aabb2 { min, max })
    }

    /// Grows the box by `margin` on every side.
    pub fn expanded(&self, margin: T) -> Self {
        Aabb2 {
            min: Point2::new(self.min.x - margin, self.min.y - margin),
            max: Point2::new(self.max.x + margin, self.max.y + margin),
        }
    }

    pub fn contains(&self, p: Point2<T>, eps: T) -> bool {
        p.x >= self.min.x - eps
            && p.x <= self.max.x + eps
            && p.y >= self.min.y - eps
            && p.y <= self.max.y + eps
    }

    pub fn left_bottom(&self) -> Point2<T> {
        self.min
    }

    pub fn right_bottom(&self) -> Point2<T> {
        Point2::new(self.max.x, self.min.y)
    }

    pub fn left_top(&self) -> Point2<T> {
        Point2::new(self.min.x, self.max.y)
    }

    pub fn right_top(&self) -> Point2<T> {
        self.max
    }
}
