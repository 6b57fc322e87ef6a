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

use crate::geometry::Point2;

/// Sentinel for absent node references.
pub const NIL: usize = usize::MAX;

/// A live parabolic arc on the beachline. `prev`/`next` chain the arcs left
/// to right; `left_bp`/`right_bp` are the breakpoints either side (NIL at the
/// outer ends).
#[derive(Debug, Clone, Copy)]
pub struct Arc {
    pub site: usize,
    pub prev: usize,
    pub next: usize,
    pub left_bp: usize,
    pub right_bp: usize,
    /// Pending circle event that would squeeze this arc out.
    pub event: Option<usize>,
}

/// An interior node: the moving intersection of the arcs of `left_site` and
/// `right_site`, tracing out `edge`.
#[derive(Debug, Clone, Copy)]
pub struct Breakpoint {
    pub left: usize,
    pub right: usize,
    pub left_site: usize,
    pub right_site: usize,
    pub edge: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
pub enum Kind {
    Arc(Arc),
    Breakpoint(Breakpoint),
}

#[derive(Debug, Clone, Copy)]
pub struct Node {
    pub parent: usize,
    /// Whether this node is the right child of its parent.
    pub from_right: bool,
    pub height: i32,
    pub kind: Kind,
}

/// Outcome of splitting an arc with a new site.
#[derive(Debug, Clone, Copy)]
pub enum Insertion {
    /// The new site shares a y-coordinate with the arc it landed on: the
    /// arc splits into two leaves around one breakpoint.
    SameRow {
        breakpoint: usize,
        left: usize,
        right: usize,
    },
    /// Regular split: the hit arc splits in two with the new arc between.
    Split { arc: usize },
}

/// Outcome of removing an arc at a circle event.
#[derive(Debug, Clone, Copy)]
pub struct Removal {
    pub prev: usize,
    pub next: usize,
    /// The breakpoint that remains between `prev` and `next`.
    pub survivor: usize,
}

/// The beachline: an AVL tree whose leaves are arcs and whose interior
/// nodes are breakpoints, stored in a flat arena. Slots freed by splits and
/// removals are abandoned rather than recycled.
#[derive(Debug)]
pub struct Beachline<'s> {
    sites: &'s [Point2<f64>],
    nodes: Vec<Node>,
    root: usize,
    len: usize,
}

impl<'s> Beachline<'s> {
    pub fn new(sites: &'s [Point2<f64>]) -> Self {
        Beachline {
            sites,
            nodes: Vec::new(),
            root: NIL,
            len: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of live nodes, arcs and breakpoints together.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn arc(&self, i: usize) -> &Arc {
        match &self.nodes[i].kind {
            Kind::Arc(arc) => arc,
            Kind::Breakpoint(_) => unreachable!("node {i} is a breakpoint"),
        }
    }

    pub fn arc_mut(&mut self, i: usize) -> &mut Arc {
        match &mut self.nodes[i].kind {
            Kind::Arc(arc) => arc,
            Kind::Breakpoint(_) => unreachable!("node {i} is a breakpoint"),
        }
    }

    pub fn bp(&self, i: usize) -> &Breakpoint {
        match &self.nodes[i].kind {
            Kind::Breakpoint(bp) => bp,
            Kind::Arc(_) => unreachable!("node {i} is an arc"),
        }
    }

    pub fn bp_mut(&mut self, i: usize) -> &mut Breakpoint {
        match &mut self.nodes[i].kind {
            Kind::Breakpoint(bp) => bp,
            Kind::Arc(_) => unreachable!("node {i} is an arc"),
        }
    }

    fn alloc(&mut self, parent: usize, from_right: bool, height: i32, kind: Kind) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Node {
            parent,
            from_right,
            height,
            kind,
        });
        idx
    }

    /// x-coordinate of a breakpoint for sweep position `y`, from the
    /// parabola intersection quadratic. Degenerate cases: sites on one row
    /// meet at their midpoint; a site on the sweepline pins the breakpoint
    /// to that site's x.
    pub fn breakpoint_x(&self, bp: usize, y: f64) -> f64 {
        let b = self.bp(bp);
        let l = self.sites[b.left_site];
        let r = self.sites[b.right_site];

        if l.y == r.y {
            return (l.x + r.x) / 2.0;
        }
        if y == l.y {
            return l.x;
        }
        if y == r.y {
            return r.x;
        }

        let qa = l.y - r.y;
        let qb = -2.0 * r.x * (l.y - y) + 2.0 * l.x * (r.y - y);
        let qc = r.x * r.x * (l.y - y)
            - l.x * l.x * (r.y - y)
            - (r.y - y) * (l.y - y) * (l.y - r.y);
        (-qb - (qb * qb - 4.0 * qa * qc).sqrt()) / (2.0 * qa)
    }

    /// y-coordinate of a breakpoint for sweep position `y`, evaluated on the
    /// left arc's parabola.
    pub fn breakpoint_y(&self, bp: usize, y: f64) -> f64 {
        let x = self.breakpoint_x(bp, y);
        let l = self.sites[self.bp(bp).left_site];
        (1.0 / (2.0 * (l.y - y))) * ((x - l.x) * (x - l.x) + l.y * l.y - y * y)
    }

    /// The arc vertically above `x` for sweep position `y`.
    pub fn locate(&self, x: f64, y: f64) -> usize {
        let mut current = self.root;
        loop {
            match &self.nodes[current].kind {
                Kind::Arc(_) => return current,
                Kind::Breakpoint(bp) => {
                    current = if x < self.breakpoint_x(current, y) {
                        bp.left
                    } else {
                        bp.right
                    };
                }
            }
        }
    }

    /// Seeds the beachline with the very first arc.
    pub fn insert_first(&mut self, site: usize) -> usize {
        let arc = self.alloc(
            NIL,
            false,
            1,
            Kind::Arc(Arc {
                site,
                prev: NIL,
                next: NIL,
                left_bp: NIL,
                right_bp: NIL,
                event: None,
            }),
        );
        self.root = arc;
        self.len = 1;
        arc
    }

    /// Splits the arc `above` with a new site's arc, rebalancing afterwards.
    pub fn split(&mut self, above: usize, site: usize) -> Insertion {
        let old = *self.arc(above);
        let parent = self.nodes[above].parent;
        let from_right = self.nodes[above].from_right;

        if self.sites[old.site].y == self.sites[site].y {
            // One row: the new arc does not nest inside the old one, the
            // two leaves simply sit side by side around one breakpoint.
            let (lsite, rsite) = if self.sites[site].x < self.sites[old.site].x {
                (site, old.site)
            } else {
                (old.site, site)
            };

            let a = self.alloc(
                parent,
                from_right,
                2,
                Kind::Breakpoint(Breakpoint {
                    left: NIL,
                    right: NIL,
                    left_site: lsite,
                    right_site: rsite,
                    edge: None,
                }),
            );
            let l = self.alloc(
                a,
                false,
                1,
                Kind::Arc(Arc {
                    site: lsite,
                    prev: old.prev,
                    next: NIL,
                    left_bp: old.left_bp,
                    right_bp: a,
                    event: None,
                }),
            );
            let r = self.alloc(
                a,
                true,
                1,
                Kind::Arc(Arc {
                    site: rsite,
                    prev: l,
                    next: old.next,
                    left_bp: a,
                    right_bp: old.right_bp,
                    event: None,
                }),
            );
            self.arc_mut(l).next = r;
            {
                let bp = self.bp_mut(a);
                bp.left = l;
                bp.right = r;
            }
            if old.prev != NIL {
                self.arc_mut(old.prev).next = l;
            }
            if old.next != NIL {
                self.arc_mut(old.next).prev = r;
            }
            if old.left_bp != NIL {
                self.bp_mut(old.left_bp).right_site = lsite;
            }
            if old.right_bp != NIL {
                self.bp_mut(old.right_bp).left_site = rsite;
            }

            self.attach(a, parent, from_right);
            self.len += 2;
            self.rebalance_upward(a);
            Insertion::SameRow {
                breakpoint: a,
                left: l,
                right: r,
            }
        } else {
            // Regular split: subtree a(b, c(d, e)) with the old site's arc
            // duplicated either side of the new arc d.
            let a = self.alloc(
                parent,
                from_right,
                3,
                Kind::Breakpoint(Breakpoint {
                    left: NIL,
                    right: NIL,
                    left_site: old.site,
                    right_site: site,
                    edge: None,
                }),
            );
            let c = self.alloc(
                a,
                true,
                2,
                Kind::Breakpoint(Breakpoint {
                    left: NIL,
                    right: NIL,
                    left_site: site,
                    right_site: old.site,
                    edge: None,
                }),
            );
            let b = self.alloc(
                a,
                false,
                1,
                Kind::Arc(Arc {
                    site: old.site,
                    prev: old.prev,
                    next: NIL,
                    left_bp: old.left_bp,
                    right_bp: a,
                    event: None,
                }),
            );
            let d = self.alloc(
                c,
                false,
                1,
                Kind::Arc(Arc {
                    site,
                    prev: b,
                    next: NIL,
                    left_bp: a,
                    right_bp: c,
                    event: None,
                }),
            );
            let e = self.alloc(
                c,
                true,
                1,
                Kind::Arc(Arc {
                    site: old.site,
                    prev: d,
                    next: old.next,
                    left_bp: c,
                    right_bp: old.right_bp,
                    event: None,
                }),
            );
            self.arc_mut(b).next = d;
            self.arc_mut(d).next = e;
            {
                let bp = self.bp_mut(a);
                bp.left = b;
                bp.right = c;
            }
            {
                let bp = self.bp_mut(c);
                bp.left = d;
                bp.right = e;
            }
            if old.prev != NIL {
                self.arc_mut(old.prev).next = b;
            }
            if old.next != NIL {
                self.arc_mut(old.next).prev = e;
            }

            self.attach(a, parent, from_right);
            self.len += 4;
            self.rebalance_upward(a);
            Insertion::Split { arc: d }
        }
    }

    /// Removes a vanishing arc at a circle event. The breakpoint that was
    /// its tree parent disappears with it; the other adjacent breakpoint
    /// survives between the neighbouring arcs.
    pub fn remove_arc(&mut self, arc: usize) -> Removal {
        let data = *self.arc(arc);
        let parent = self.nodes[arc].parent;

        let (sibling, survivor) = if self.nodes[arc].from_right {
            (self.bp(parent).left, data.right_bp)
        } else {
            (self.bp(parent).right, data.left_bp)
        };

        let grandparent = self.nodes[parent].parent;
        let slot = self.nodes[parent].from_right;
        self.attach(sibling, grandparent, slot);

        self.arc_mut(data.prev).next = data.next;
        self.arc_mut(data.next).prev = data.prev;

        let prev_site = self.arc(data.prev).site;
        let next_site = self.arc(data.next).site;
        {
            let bp = self.bp_mut(survivor);
            bp.left_site = prev_site;
            bp.right_site = next_site;
        }
        self.arc_mut(data.prev).right_bp = survivor;
        self.arc_mut(data.next).left_bp = survivor;

        self.len -= 2;
        self.rebalance_upward(sibling);
        Removal {
            prev: data.prev,
            next: data.next,
            survivor,
        }
    }

    /// Breakpoints still alive in the tree, in no particular order.
    pub fn live_breakpoints(&self) -> Vec<usize> {
        let mut out = Vec::new();
        if self.root == NIL {
            return out;
        }
        let mut stack = vec![self.root];
        while let Some(i) = stack.pop() {
            if let Kind::Breakpoint(bp) = &self.nodes[i].kind {
                out.push(i);
                stack.push(bp.left);
                stack.push(bp.right);
            }
        }
        out
    }

    fn attach(&mut self, node: usize, parent: usize, from_right: bool) {
        self.nodes[node].parent = parent;
        self.nodes[node].from_right = from_right;
        if parent == NIL {
            self.root = node;
        } else if from_right {
            self.bp_mut(parent).right = node;
        } else {
            self.bp_mut(parent).left = node;
        }
    }

    fn height_of(&self, i: usize) -> i32 {
        if i == NIL { 0 } else { self.nodes[i].height }
    }

    fn balance(&self, i: usize) -> i32 {
        match &self.nodes[i].kind {
            Kind::Arc(_) => 0,
            Kind::Breakpoint(bp) => self.height_of(bp.left) - self.height_of(bp.right),
        }
    }

    fn update_height(&mut self, i: usize) {
        let h = match &self.nodes[i].kind {
            Kind::Arc(_) => 1,
            Kind::Breakpoint(bp) => 1 + self.height_of(bp.left).max(self.height_of(bp.right)),
        };
        self.nodes[i].height = h;
    }

    fn rotate_right(&mut self, t: usize) -> usize {
        let x = self.bp(t).left;
        let t2 = self.bp(x).right;

        let parent = self.nodes[t].parent;
        let from_right = self.nodes[t].from_right;
        self.attach(x, parent, from_right);

        self.nodes[t2].parent = t;
        self.nodes[t2].from_right = false;
        self.bp_mut(t).left = t2;

        self.nodes[t].parent = x;
        self.nodes[t].from_right = true;
        self.bp_mut(x).right = t;

        self.update_height(t);
        self.update_height(x);
        x
    }

    fn rotate_left(&mut self, x: usize) -> usize {
        let t = self.bp(x).right;
        let t2 = self.bp(t).left;

        let parent = self.nodes[x].parent;
        let from_right = self.nodes[x].from_right;
        self.attach(t, parent, from_right);

        self.nodes[t2].parent = x;
        self.nodes[t2].from_right = true;
        self.bp_mut(x).right = t2;

        self.nodes[x].parent = t;
        self.nodes[x].from_right = false;
        self.bp_mut(t).left = x;

        self.update_height(x);
        self.update_height(t);
        t
    }

    /// Walks from `start` to the root, refreshing heights and rotating
    /// unbalanced subtrees.
    fn rebalance_upward(&mut self, start: usize) {
        let mut current = start;
        while current != NIL {
            self.update_height(current);
            let balance = self.balance(current);

            if balance > 1 {
                let left = self.bp(current).left;
                if self.balance(left) < 0 {
                    self.rotate_left(left);
                }
                current = self.rotate_right(current);
            } else if balance < -1 {
                let right = self.bp(current).right;
                if self.balance(right) > 0 {
                    self.rotate_right(right);
                }
                current = self.rotate_left(current);
            }

            if self.nodes[current].parent == NIL {
                self.root = current;
            }
            current = self.nodes[current].parent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Recursively checks AVL invariants and parent links, returning the
    /// subtree height.
    fn check_subtree(beach: &Beachline<'_>, i: usize, parent: usize, from_right: bool) -> i32 {
        assert_eq!(beach.nodes[i].parent, parent);
        assert_eq!(beach.nodes[i].from_right, from_right);
        match &beach.nodes[i].kind {
            Kind::Arc(_) => {
                assert_eq!(beach.nodes[i].height, 1);
                1
            }
            Kind::Breakpoint(bp) => {
                let hl = check_subtree(beach, bp.left, i, false);
                let hr = check_subtree(beach, bp.right, i, true);
                assert!((hl - hr).abs() <= 1, "unbalanced at node {i}");
                let h = 1 + hl.max(hr);
                assert_eq!(beach.nodes[i].height, h);
                h
            }
        }
    }

    fn check(beach: &Beachline<'_>) {
        if beach.root != NIL {
            check_subtree(beach, beach.root, NIL, beach.nodes[beach.root].from_right);
        }
    }

    /// Arc sites left to right, via the leaf chain.
    fn beach_sites(beach: &Beachline<'_>) -> Vec<usize> {
        let mut current = beach.root;
        if current == NIL {
            return Vec::new();
        }
        while let Kind::Breakpoint(bp) = &beach.nodes[current].kind {
            current = bp.left;
        }
        let mut out = Vec::new();
        while current != NIL {
            let arc = beach.arc(current);
            out.push(arc.site);
            current = arc.next;
        }
        out
    }

    fn insert(beach: &mut Beachline<'_>, site: usize, y: f64) -> Option<Insertion> {
        if beach.is_empty() {
            beach.insert_first(site);
            return None;
        }
        let above = beach.locate(beach.sites[site].x, y);
        Some(beach.split(above, site))
    }

    #[test]
    fn splits_keep_arc_order_and_balance() {
        let sites = vec![
            Point2::new(0.2, 0.8),
            Point2::new(0.6, 0.7),
            Point2::new(0.3, 0.6),
            Point2::new(0.5, 0.5),
            Point2::new(0.4, 0.4),
            Point2::new(0.1, 0.3),
        ];
        let mut beach = Beachline::new(&sites);
        for i in 0..sites.len() {
            insert(&mut beach, i, sites[i].y);
            check(&beach);
        }

        let order = beach_sites(&beach);
        assert_eq!(order.len(), 11);
        assert_eq!(beach.len(), 21);
        // every neighbouring pair differs
        for w in order.windows(2) {
            assert_ne!(w[0], w[1]);
        }
    }

    #[test]
    fn breakpoints_of_vertically_stacked_sites() {
        let sites = vec![Point2::new(0.0, 2.0), Point2::new(0.0, 1.0)];
        let mut beach = Beachline::new(&sites);
        insert(&mut beach, 0, 2.0);
        let ins = insert(&mut beach, 1, 1.0);
        check(&beach);

        let arc = match ins {
            Some(Insertion::Split { arc }) => arc,
            _ => panic!("expected a regular split"),
        };
        let left = beach.arc(arc).left_bp;
        let right = beach.arc(arc).right_bp;
        let r = 2.0_f64.sqrt();
        assert!((beach.breakpoint_x(left, 0.0) + r).abs() < 1e-12);
        assert!((beach.breakpoint_x(right, 0.0) - r).abs() < 1e-12);
        // both breakpoints trace the horizontal bisector y = 1.5
        assert!((beach.breakpoint_y(left, 0.0) - 1.5).abs() < 1e-12);
        assert!((beach.breakpoint_y(right, 0.0) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn same_row_insert_splits_around_one_breakpoint() {
        let sites = vec![Point2::new(0.8, 0.5), Point2::new(0.2, 0.5)];
        let mut beach = Beachline::new(&sites);
        insert(&mut beach, 0, 0.5);
        let ins = insert(&mut beach, 1, 0.5);
        check(&beach);

        let bp = match ins {
            Some(Insertion::SameRow { breakpoint, .. }) => breakpoint,
            _ => panic!("expected a same-row split"),
        };
        assert_eq!(beach.bp(bp).left_site, 1);
        assert_eq!(beach.bp(bp).right_site, 0);
        assert_eq!(beach_sites(&beach), vec![1, 0]);
        // vertical bisector: the breakpoint x never moves
        assert!((beach.breakpoint_x(bp, 0.0) - 0.5).abs() < 1e-12);
        assert!((beach.breakpoint_x(bp, -3.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn removal_splices_neighbours_and_rebalances() {
        let sites = vec![
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 0.9),
            Point2::new(0.5, 0.8),
        ];
        let mut beach = Beachline::new(&sites);
        insert(&mut beach, 0, 1.0);
        insert(&mut beach, 1, 0.9);
        let ins = insert(&mut beach, 2, 0.8);
        check(&beach);
        assert_eq!(beach_sites(&beach), vec![0, 2, 0, 1, 0]);

        // squeeze out the arc of site 0 between sites 2 and 1
        let arc = match ins {
            Some(Insertion::Split { arc }) => arc,
            _ => panic!("expected a regular split"),
        };
        let middle = beach.arc(arc).next;
        assert_eq!(beach.arc(middle).site, 0);
        let removal = beach.remove_arc(middle);
        check(&beach);

        assert_eq!(beach_sites(&beach), vec![0, 2, 1, 0]);
        assert_eq!(beach.bp(removal.survivor).left_site, 2);
        assert_eq!(beach.bp(removal.survivor).right_site, 1);
        assert_eq!(beach.arc(removal.prev).right_bp, removal.survivor);
        assert_eq!(beach.arc(removal.next).left_bp, removal.survivor);
        assert_eq!(beach.len(), 7);
    }
}
