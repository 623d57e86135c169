//! Huffman tree model: frequency counting, greedy construction, and the
//! JSON record form embedded in encoded payloads.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{HuffmanError, Result};

/// A node of the Huffman tree.
///
/// Leaves carry a symbol and its occurrence count; internal nodes carry the
/// summed count of their two subtrees and never a symbol. Each internal node
/// exclusively owns its children, so the whole tree is a plain recursive
/// value with no sharing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: char,
        freq: u64,
    },
    Internal {
        freq: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn freq(&self) -> u64 {
        match self {
            Node::Leaf { freq, .. } | Node::Internal { freq, .. } => *freq,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    fn merge(left: Node, right: Node) -> Node {
        Node::Internal {
            freq: left.freq() + right.freq(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Collects every leaf as `(symbol, freq)` in left-to-right order.
    pub fn leaf_frequencies(&self) -> Vec<(char, u64)> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves(&self, leaves: &mut Vec<(char, u64)>) {
        match self {
            Node::Leaf { symbol, freq } => leaves.push((*symbol, *freq)),
            Node::Internal { left, right, .. } => {
                left.collect_leaves(leaves);
                right.collect_leaves(leaves);
            }
        }
    }

    /// Renders the tree as the compact JSON text embedded in payloads.
    ///
    /// Any `|` in a symbol is emitted as the JSON escape `\u007c`, so the
    /// tree section never contains a bare `|` and the first one in a
    /// payload is always the bitstream delimiter. Parsing needs no inverse
    /// step; the escape is plain JSON.
    pub fn serialize(&self) -> Result<String> {
        let json = serde_json::to_string(&self.to_record())
            .map_err(|e| HuffmanError::format(format!("failed to serialize tree: {e}")))?;
        // '|' can only occur inside a "char" string value
        Ok(json.replace('|', "\\u007c"))
    }

    /// Parses a JSON tree section back into a tree, validating the shape
    /// invariants: a node is a leaf iff it carries a symbol, internal nodes
    /// have exactly two children and the summed frequency of both, and no
    /// symbol appears on more than one leaf.
    pub fn parse(text: &str) -> Result<Node> {
        let record: NodeRecord = serde_json::from_str(text)
            .map_err(|e| HuffmanError::format(format!("tree section is not valid JSON: {e}")))?;
        let node = Node::from_record(record)?;

        let leaves = node.leaf_frequencies();
        let mut symbols: Vec<char> = leaves.iter().map(|(symbol, _)| *symbol).collect();
        symbols.sort_unstable();
        symbols.dedup();
        if symbols.len() != leaves.len() {
            return Err(HuffmanError::format("tree contains duplicate leaf symbols"));
        }

        Ok(node)
    }

    fn to_record(&self) -> NodeRecord {
        match self {
            Node::Leaf { symbol, freq } => NodeRecord {
                symbol: Some(*symbol),
                freq: *freq,
                left: None,
                right: None,
            },
            Node::Internal { freq, left, right } => NodeRecord {
                symbol: None,
                freq: *freq,
                left: Some(Box::new(left.to_record())),
                right: Some(Box::new(right.to_record())),
            },
        }
    }

    fn from_record(record: NodeRecord) -> Result<Node> {
        match (record.symbol, record.left, record.right) {
            (Some(symbol), None, None) => Ok(Node::Leaf {
                symbol,
                freq: record.freq,
            }),
            (None, Some(left), Some(right)) => {
                let left = Node::from_record(*left)?;
                let right = Node::from_record(*right)?;
                if left.freq() + right.freq() != record.freq {
                    return Err(HuffmanError::format(format!(
                        "internal node frequency {} does not equal children sum {}",
                        record.freq,
                        left.freq() + right.freq(),
                    )));
                }
                Ok(Node::Internal {
                    freq: record.freq,
                    left: Box::new(left),
                    right: Box::new(right),
                })
            }
            (Some(_), _, _) => Err(HuffmanError::format(
                "node carries both a symbol and children",
            )),
            (None, _, _) => Err(HuffmanError::format("internal node is missing a child")),
        }
    }
}

/// Wire form of a node: `{"char": ..., "freq": ..., "left": ..., "right": ...}`
/// with `char` null on internal nodes and both children null on leaves.
#[derive(Serialize, Deserialize)]
struct NodeRecord {
    #[serde(rename = "char")]
    symbol: Option<char>,
    freq: u64,
    left: Option<Box<NodeRecord>>,
    right: Option<Box<NodeRecord>>,
}

/// Counts symbol occurrences, returned in first-seen order.
///
/// The ordering is what makes tree construction deterministic: leaf nodes
/// enter the heap numbered by first appearance in the text, and that number
/// breaks frequency ties.
pub fn count_frequencies(text: &str) -> Vec<(char, u64)> {
    let mut index: HashMap<char, usize> = HashMap::new();
    let mut counts: Vec<(char, u64)> = Vec::new();
    for ch in text.chars() {
        match index.get(&ch) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(ch, counts.len());
                counts.push((ch, 1));
            }
        }
    }
    counts
}

// Min-heap entry: BinaryHeap is a max-heap, so the ordering is inverted.
// Frequency first, then insertion sequence as the explicit tie-break.
struct HeapEntry {
    node: Node,
    seq: u64,
}

impl Eq for HeapEntry {}
impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.node.freq() == other.node.freq() && self.seq == other.seq
    }
}
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .node
            .freq()
            .cmp(&self.node.freq())
            .then_with(|| other.seq.cmp(&self.seq))
    }
}
impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Builds the Huffman tree from `(symbol, freq)` pairs.
///
/// One leaf per pair goes into a min-priority heap; the two smallest nodes
/// are repeatedly merged (first popped becomes the left child) until a
/// single root remains. A single pair yields that leaf as the root with no
/// internal nodes. Zero pairs is an invalid-input error.
pub fn build_tree(frequencies: &[(char, u64)]) -> Result<Node> {
    let mut heap = BinaryHeap::new();
    let mut seq = 0u64;
    for &(symbol, freq) in frequencies {
        heap.push(HeapEntry {
            node: Node::Leaf { symbol, freq },
            seq,
        });
        seq += 1;
    }

    while heap.len() > 1 {
        let left = heap.pop().unwrap();
        let right = heap.pop().unwrap();
        heap.push(HeapEntry {
            node: Node::merge(left.node, right.node),
            seq,
        });
        seq += 1;
    }

    heap.pop()
        .map(|entry| entry.node)
        .ok_or_else(|| HuffmanError::invalid_input("cannot build a tree from zero symbols"))
}
