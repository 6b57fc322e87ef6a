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

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::geometry::Point2;

/// What an event does when it reaches the front of the queue.
#[derive(Debug, Clone, Copy)]
pub enum EventKind {
    /// A new site starts an arc on the beachline.
    Site { site: usize },
    /// The arc `arc` is squeezed out between its neighbours.
    Circle { arc: usize },
}

#[derive(Debug, Clone, Copy)]
pub struct Event {
    /// Priority point: the site itself, or for a circle event the lowest
    /// point of the circumcircle.
    pub point: Point2<f64>,
    pub kind: EventKind,
    pub valid: bool,
}

/// Heap key ordered by descending y, then descending x; equal points pop in
/// insertion order.
#[derive(Debug, Clone, Copy)]
struct EventKey {
    y: f64,
    x: f64,
    id: usize,
}

impl PartialEq for EventKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EventKey {}

impl PartialOrd for EventKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y
            .total_cmp(&other.y)
            .then_with(|| self.x.total_cmp(&other.x))
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Priority queue over site and circle events. Events are never removed
/// eagerly; cancelled circle events are flagged and skipped on pop.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<Event>,
    heap: BinaryHeap<EventKey>,
}

impl EventQueue {
    pub fn new() -> Self {
        EventQueue::default()
    }

    /// Schedules an event and returns its id.
    pub fn push(&mut self, point: Point2<f64>, kind: EventKind) -> usize {
        let id = self.events.len();
        self.events.push(Event {
            point,
            kind,
            valid: true,
        });
        self.heap.push(EventKey {
            y: point.y,
            x: point.x,
            id,
        });
        id
    }

    /// Pops the next still-valid event, discarding cancelled ones.
    pub fn pop(&mut self) -> Option<Event> {
        while let Some(key) = self.heap.pop() {
            let event = self.events[key.id];
            if event.valid {
                return Some(event);
            }
        }
        None
    }

    pub fn invalidate(&mut self, id: usize) {
        self.events[id].valid = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_descending_y_then_descending_x() {
        let mut queue = EventQueue::new();
        queue.push(Point2::new(0.3, 0.5), EventKind::Site { site: 0 });
        queue.push(Point2::new(0.7, 0.9), EventKind::Site { site: 1 });
        queue.push(Point2::new(0.9, 0.9), EventKind::Site { site: 2 });
        queue.push(Point2::new(0.1, 0.2), EventKind::Site { site: 3 });

        let order: Vec<usize> = std::iter::from_fn(|| queue.pop())
            .map(|e| match e.kind {
                EventKind::Site { site } => site,
                EventKind::Circle { .. } => unreachable!(),
            })
            .collect();
        assert_eq!(order, vec![2, 1, 0, 3]);
    }

    #[test]
    fn equal_points_pop_in_insertion_order() {
        let mut queue = EventQueue::new();
        queue.push(Point2::new(0.5, 0.5), EventKind::Site { site: 0 });
        queue.push(Point2::new(0.5, 0.5), EventKind::Site { site: 1 });

        let first = queue.pop().unwrap();
        match first.kind {
            EventKind::Site { site } => assert_eq!(site, 0),
            EventKind::Circle { .. } => unreachable!(),
        }
    }

    #[test]
    fn invalidated_events_are_skipped() {
        let mut queue = EventQueue::new();
        let a = queue.push(Point2::new(0.0, 1.0), EventKind::Site { site: 0 });
        queue.push(Point2::new(0.0, 0.0), EventKind::Site { site: 1 });
        queue.invalidate(a);

        let next = queue.pop().unwrap();
        match next.kind {
            EventKind::Site { site } => assert_eq!(site, 1),
            EventKind::Circle { .. } => unreachable!(),
        }
        assert!(queue.pop().is_none());
    }
}
