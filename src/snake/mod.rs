//! The snake's body
//!
//! The body is a doubly linked list whose nodes live in an arena and link to
//! each other by [BitIndex]. Pushing a head and popping a tail are both O(1),
//! and the slot freed by a pop is reused by the next push, so a snake that is
//! just moving around never allocates.
use crate::types::{PieceHandle, Position};

/// stable handle to a live segment of a [Snake]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct BitIndex(pub u32);

impl BitIndex {
    /// get a usize from a BitIndex
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

/// one segment of the body, occupying one cell
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SnakeBit {
    position: Position,
    handle: PieceHandle,
}

impl SnakeBit {
    /// makes a new segment at `position`, displayed by `handle`
    pub fn new(position: Position, handle: PieceHandle) -> Self {
        SnakeBit { position, handle }
    }

    #[allow(missing_docs)]
    pub fn position(&self) -> Position {
        self.position
    }

    #[allow(missing_docs)]
    pub fn handle(&self) -> PieceHandle {
        self.handle
    }

    /// moves this segment to `position`, used to turn a popped tail into the next head
    pub fn relocate(&mut self, position: Position) {
        self.position = position;
    }
}

#[derive(Debug, Clone)]
struct Node {
    bit: SnakeBit,
    // the neighbour closer to the head
    prev: Option<BitIndex>,
    // the neighbour closer to the tail
    next: Option<BitIndex>,
}

/// An ordered body, head first
#[derive(Debug, Clone, Default)]
pub struct Snake {
    nodes: Vec<Option<Node>>,
    vacant: Vec<BitIndex>,
    head: Option<BitIndex>,
    tail: Option<BitIndex>,
    len: usize,
}

impl Snake {
    /// a snake with no body
    pub fn new() -> Self {
        Self::default()
    }

    /// number of segments
    pub fn len(&self) -> usize {
        self.len
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[allow(missing_docs)]
    pub fn head_index(&self) -> Option<BitIndex> {
        self.head
    }

    #[allow(missing_docs)]
    pub fn tail_index(&self) -> Option<BitIndex> {
        self.tail
    }

    /// the segment behind `idx`, if it is still part of the body
    pub fn get(&self, idx: BitIndex) -> Option<&SnakeBit> {
        self.nodes
            .get(idx.as_usize())
            .and_then(|n| n.as_ref())
            .map(|n| &n.bit)
    }

    #[allow(missing_docs)]
    pub fn head(&self) -> Option<&SnakeBit> {
        self.head.and_then(|idx| self.get(idx))
    }

    #[allow(missing_docs)]
    pub fn tail(&self) -> Option<&SnakeBit> {
        self.tail.and_then(|idx| self.get(idx))
    }

    /// inserts `bit` in front of the current head
    pub fn push_head(&mut self, bit: SnakeBit) -> BitIndex {
        let node = Node {
            bit,
            prev: None,
            next: self.head,
        };
        let idx = match self.vacant.pop() {
            Some(idx) => {
                self.nodes[idx.as_usize()] = Some(node);
                idx
            }
            None => {
                self.nodes.push(Some(node));
                BitIndex((self.nodes.len() - 1) as u32)
            }
        };

        match self.head {
            Some(old) => {
                if let Some(old_head) = self.node_mut(old) {
                    old_head.prev = Some(idx);
                }
            }
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
        self.len += 1;
        idx
    }

    /// removes the last segment and hands it back. The returned bit still
    /// holds the position it had in the body.
    pub fn pop_tail(&mut self) -> Option<SnakeBit> {
        let idx = self.tail?;
        let node = self.nodes.get_mut(idx.as_usize())?.take()?;
        self.vacant.push(idx);
        self.len -= 1;

        self.tail = node.prev;
        match node.prev {
            Some(prev) => {
                if let Some(new_tail) = self.node_mut(prev) {
                    new_tail.next = None;
                }
            }
            None => self.head = None,
        }
        Some(node.bit)
    }

    /// drops every segment
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.vacant.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// walks the body from head to tail
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            snake: self,
            cursor: self.head,
        }
    }

    fn node_mut(&mut self, idx: BitIndex) -> Option<&mut Node> {
        self.nodes.get_mut(idx.as_usize()).and_then(|n| n.as_mut())
    }
}

/// Iterator over the segments of a [Snake], head first
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    snake: &'a Snake,
    cursor: Option<BitIndex>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a SnakeBit;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let node = self.snake.nodes.get(idx.as_usize())?.as_ref()?;
        self.cursor = node.next;
        Some(&node.bit)
    }
}
