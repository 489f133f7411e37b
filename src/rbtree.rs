//! Threaded red-black tree
//!
//! Ordering is purely positional: callers decide where a node goes by naming
//! its in-order predecessor, so the tree never compares payloads. Every node is
//! threaded to its in-order neighbors, which makes `prev`/`next` O(1).
//!
//! Nodes live in an arena and are addressed by [`NodeRef`]. A removed node's
//! slot goes on a free list; its payload stays readable until a later insertion
//! reuses the slot.

use std::fmt;

/// Handle to a node of an [`RbTree`]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(u32);

impl NodeRef {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Node<T> {
    data: T,
    red: bool,
    parent: Option<NodeRef>,
    left: Option<NodeRef>,
    right: Option<NodeRef>,
    prev: Option<NodeRef>,
    next: Option<NodeRef>,
}

impl<T> Node<T> {
    fn new(data: T) -> Self {
        Self {
            data,
            red: true,
            parent: None,
            left: None,
            right: None,
            prev: None,
            next: None,
        }
    }
}

/// Arena-backed red-black tree with in-order threads
#[derive(Debug, Clone)]
pub struct RbTree<T> {
    nodes: Vec<Node<T>>,
    free: Vec<NodeRef>,
    root: Option<NodeRef>,
    len: usize,
}

impl<T> Default for RbTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RbTree<T> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: None,
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn root(&self) -> Option<NodeRef> {
        self.root
    }

    #[inline]
    pub fn get(&self, node: NodeRef) -> &T {
        &self.node(node).data
    }

    #[inline]
    pub fn get_mut(&mut self, node: NodeRef) -> &mut T {
        &mut self.node_mut(node).data
    }

    /// In-order predecessor
    #[inline]
    pub fn prev(&self, node: NodeRef) -> Option<NodeRef> {
        self.node(node).prev
    }

    /// In-order successor
    #[inline]
    pub fn next(&self, node: NodeRef) -> Option<NodeRef> {
        self.node(node).next
    }

    #[inline]
    pub fn left(&self, node: NodeRef) -> Option<NodeRef> {
        self.node(node).left
    }

    #[inline]
    pub fn right(&self, node: NodeRef) -> Option<NodeRef> {
        self.node(node).right
    }

    /// Leftmost node of the whole tree
    pub fn first(&self) -> Option<NodeRef> {
        self.root.map(|root| self.get_first(root))
    }

    /// Rightmost node of the whole tree
    pub fn last(&self) -> Option<NodeRef> {
        self.root.map(|root| self.get_last(root))
    }

    /// Leftmost node of the subtree rooted at `node`
    pub fn get_first(&self, mut node: NodeRef) -> NodeRef {
        while let Some(left) = self.node(node).left {
            node = left;
        }
        node
    }

    /// Rightmost node of the subtree rooted at `node`
    pub fn get_last(&self, mut node: NodeRef) -> NodeRef {
        while let Some(right) = self.node(node).right {
            node = right;
        }
        node
    }

    /// Iterate over nodes in order by following the threads
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            tree: self,
            cursor: self.first(),
        }
    }

    /// Insert `data` as the in-order successor of `anchor`
    ///
    /// With no anchor the new node becomes the leftmost node (or the root of an
    /// empty tree).
    pub fn insert_successor(&mut self, anchor: Option<NodeRef>, data: T) -> NodeRef {
        let successor = self.alloc(data);
        let parent = match anchor {
            Some(node) => {
                let next = self.node(node).next;
                {
                    let s = self.node_mut(successor);
                    s.prev = Some(node);
                    s.next = next;
                }
                if let Some(next) = next {
                    self.node_mut(next).prev = Some(successor);
                }
                self.node_mut(node).next = Some(successor);

                match self.node(node).right {
                    Some(right) => {
                        let leftmost = self.get_first(right);
                        self.node_mut(leftmost).left = Some(successor);
                        Some(leftmost)
                    }
                    None => {
                        self.node_mut(node).right = Some(successor);
                        Some(node)
                    }
                }
            }
            None => match self.root {
                Some(root) => {
                    let first = self.get_first(root);
                    self.node_mut(successor).next = Some(first);
                    let f = self.node_mut(first);
                    f.prev = Some(successor);
                    f.left = Some(successor);
                    Some(first)
                }
                None => {
                    self.root = Some(successor);
                    None
                }
            },
        };
        self.node_mut(successor).parent = parent;
        self.len += 1;
        self.insert_fixup(successor);
        successor
    }

    /// Unlink `node` from the tree and from the thread
    ///
    /// `node` must currently be in the tree.
    pub fn remove(&mut self, node: NodeRef) {
        let (prev, next) = (self.node(node).prev, self.node(node).next);
        if let Some(next) = next {
            self.node_mut(next).prev = prev;
        }
        if let Some(prev) = prev {
            self.node_mut(prev).next = next;
        }
        {
            let n = self.node_mut(node);
            n.prev = None;
            n.next = None;
        }

        let original_parent = self.node(node).parent;
        let left = self.node(node).left;
        let right = self.node(node).right;
        let replacement = match (left, right) {
            (None, _) => right,
            (Some(_), None) => left,
            (Some(_), Some(right)) => Some(self.get_first(right)),
        };
        self.replace_child(original_parent, node, replacement);

        let mut parent = original_parent;
        let removed_red;
        let fixup: Option<NodeRef>;
        match (left, right, replacement) {
            (Some(left), Some(right), Some(next)) => {
                removed_red = self.node(next).red;
                self.node_mut(next).red = self.node(node).red;
                self.node_mut(next).left = Some(left);
                self.node_mut(left).parent = Some(next);
                if next != right {
                    parent = self.node(next).parent;
                    self.node_mut(next).parent = original_parent;
                    fixup = self.node(next).right;
                    if let Some(p) = parent {
                        self.node_mut(p).left = fixup;
                    }
                    self.node_mut(next).right = Some(right);
                    self.node_mut(right).parent = Some(next);
                } else {
                    self.node_mut(next).parent = original_parent;
                    parent = Some(next);
                    fixup = self.node(next).right;
                }
            }
            _ => {
                removed_red = self.node(node).red;
                fixup = replacement;
            }
        }
        if let Some(x) = fixup {
            self.node_mut(x).parent = parent;
        }

        self.free.push(node);
        self.len -= 1;

        if removed_red {
            return;
        }
        if let Some(x) = fixup.filter(|&x| self.node(x).red) {
            self.node_mut(x).red = false;
            return;
        }
        self.remove_fixup(fixup, parent);
    }

    /// Drop every node and release the arena
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
    }

    #[inline]
    fn node(&self, node: NodeRef) -> &Node<T> {
        &self.nodes[node.index()]
    }

    #[inline]
    fn node_mut(&mut self, node: NodeRef) -> &mut Node<T> {
        &mut self.nodes[node.index()]
    }

    #[inline]
    fn is_red(&self, node: Option<NodeRef>) -> bool {
        node.is_some_and(|n| self.node(n).red)
    }

    fn alloc(&mut self, data: T) -> NodeRef {
        if let Some(slot) = self.free.pop() {
            self.nodes[slot.index()] = Node::new(data);
            return slot;
        }
        let slot = NodeRef(self.nodes.len() as u32);
        self.nodes.push(Node::new(data));
        slot
    }

    /// Point `parent`'s link to `old` at `new` (or the root when there is no parent)
    fn replace_child(&mut self, parent: Option<NodeRef>, old: NodeRef, new: Option<NodeRef>) {
        match parent {
            Some(p) => {
                let p = self.node_mut(p);
                if p.left == Some(old) {
                    p.left = new;
                } else {
                    p.right = new;
                }
            }
            None => self.root = new,
        }
    }

    fn rotate_left(&mut self, p: NodeRef) {
        let Some(q) = self.node(p).right else {
            return;
        };
        let parent = self.node(p).parent;
        self.replace_child(parent, p, Some(q));
        self.node_mut(q).parent = parent;
        self.node_mut(p).parent = Some(q);
        let inner = self.node(q).left;
        self.node_mut(p).right = inner;
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(p);
        }
        self.node_mut(q).left = Some(p);
    }

    fn rotate_right(&mut self, p: NodeRef) {
        let Some(q) = self.node(p).left else {
            return;
        };
        let parent = self.node(p).parent;
        self.replace_child(parent, p, Some(q));
        self.node_mut(q).parent = parent;
        self.node_mut(p).parent = Some(q);
        let inner = self.node(q).right;
        self.node_mut(p).left = inner;
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(p);
        }
        self.node_mut(q).right = Some(p);
    }

    fn insert_fixup(&mut self, mut node: NodeRef) {
        let mut parent = self.node(node).parent;
        while let Some(mut p) = parent.filter(|&p| self.node(p).red) {
            // A red node is never the root, so it has a parent
            let Some(grandpa) = self.node(p).parent else {
                break;
            };
            if self.node(grandpa).left == Some(p) {
                let uncle = self.node(grandpa).right;
                if let Some(uncle) = uncle.filter(|&u| self.node(u).red) {
                    self.node_mut(p).red = false;
                    self.node_mut(uncle).red = false;
                    self.node_mut(grandpa).red = true;
                    node = grandpa;
                } else {
                    if self.node(p).right == Some(node) {
                        self.rotate_left(p);
                        std::mem::swap(&mut node, &mut p);
                    }
                    self.node_mut(p).red = false;
                    self.node_mut(grandpa).red = true;
                    self.rotate_right(grandpa);
                }
            } else {
                let uncle = self.node(grandpa).left;
                if let Some(uncle) = uncle.filter(|&u| self.node(u).red) {
                    self.node_mut(p).red = false;
                    self.node_mut(uncle).red = false;
                    self.node_mut(grandpa).red = true;
                    node = grandpa;
                } else {
                    if self.node(p).left == Some(node) {
                        self.rotate_right(p);
                        std::mem::swap(&mut node, &mut p);
                    }
                    self.node_mut(p).red = false;
                    self.node_mut(grandpa).red = true;
                    self.rotate_left(grandpa);
                }
            }
            parent = self.node(node).parent;
        }
        if let Some(root) = self.root {
            self.node_mut(root).red = false;
        }
    }

    /// Resolve a double-black at `node` (possibly an empty leaf) below `parent`
    fn remove_fixup(&mut self, mut node: Option<NodeRef>, mut parent: Option<NodeRef>) {
        loop {
            if node == self.root {
                break;
            }
            let Some(p) = parent else {
                break;
            };
            if self.node(p).left == node {
                let Some(mut sibling) = self.node(p).right else {
                    break;
                };
                if self.node(sibling).red {
                    self.node_mut(sibling).red = false;
                    self.node_mut(p).red = true;
                    self.rotate_left(p);
                    match self.node(p).right {
                        Some(s) => sibling = s,
                        None => break,
                    }
                }
                let (near, far) = (self.node(sibling).left, self.node(sibling).right);
                if self.is_red(near) || self.is_red(far) {
                    if !self.is_red(far) {
                        if let Some(near) = near {
                            self.node_mut(near).red = false;
                        }
                        self.node_mut(sibling).red = true;
                        self.rotate_right(sibling);
                        match self.node(p).right {
                            Some(s) => sibling = s,
                            None => break,
                        }
                    }
                    self.node_mut(sibling).red = self.node(p).red;
                    self.node_mut(p).red = false;
                    if let Some(far) = self.node(sibling).right {
                        self.node_mut(far).red = false;
                    }
                    self.rotate_left(p);
                    node = self.root;
                    break;
                }
                self.node_mut(sibling).red = true;
            } else {
                let Some(mut sibling) = self.node(p).left else {
                    break;
                };
                if self.node(sibling).red {
                    self.node_mut(sibling).red = false;
                    self.node_mut(p).red = true;
                    self.rotate_right(p);
                    match self.node(p).left {
                        Some(s) => sibling = s,
                        None => break,
                    }
                }
                let (near, far) = (self.node(sibling).right, self.node(sibling).left);
                if self.is_red(near) || self.is_red(far) {
                    if !self.is_red(far) {
                        if let Some(near) = near {
                            self.node_mut(near).red = false;
                        }
                        self.node_mut(sibling).red = true;
                        self.rotate_left(sibling);
                        match self.node(p).left {
                            Some(s) => sibling = s,
                            None => break,
                        }
                    }
                    self.node_mut(sibling).red = self.node(p).red;
                    self.node_mut(p).red = false;
                    if let Some(far) = self.node(sibling).left {
                        self.node_mut(far).red = false;
                    }
                    self.rotate_right(p);
                    node = self.root;
                    break;
                }
                self.node_mut(sibling).red = true;
            }
            node = Some(p);
            parent = self.node(p).parent;
            if self.node(p).red {
                break;
            }
        }
        if let Some(node) = node {
            self.node_mut(node).red = false;
        }
    }
}

/// In-order iterator over `(NodeRef, &T)` pairs
#[derive(Debug)]
pub struct Iter<'a, T> {
    tree: &'a RbTree<T>,
    cursor: Option<NodeRef>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (NodeRef, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cursor?;
        self.cursor = self.tree.next(node);
        Some((node, self.tree.get(node)))
    }
}
