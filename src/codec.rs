//! The Huffman codec: code-table generation, encode into the
//! `<tree-json>|<bitstream>` payload, and the per-bit decode walk.

use std::collections::HashMap;

use tracing::info;

use crate::error::{HuffmanError, Result};
use crate::tree::{self, Node};

/// Separates the serialized tree from the bitstream. The tree section is
/// JSON with no bare `|` and the bitstream is only `0`/`1`, so the first
/// occurrence is unambiguous.
pub const TREE_DELIMITER: char = '|';

/// Encodes text into a self-describing payload and decodes it back.
///
/// After a successful [`encode`](HuffmanCodec::encode) the instance holds
/// the built tree, the code table, and the payload, so
/// [`decode`](HuffmanCodec::decode) works on the just-produced artifact.
/// A payload from elsewhere can be supplied with
/// [`load_payload`](HuffmanCodec::load_payload) or decoded statelessly via
/// [`decode_payload`](HuffmanCodec::decode_payload). Instances are not
/// meant to be shared; each caller owns its own.
#[derive(Debug, Default)]
pub struct HuffmanCodec {
    tree: Option<Node>,
    codes: HashMap<char, String>,
    payload: Option<String>,
}

impl HuffmanCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes `text`: counts frequencies, builds the tree and code table,
    /// and concatenates each symbol's code in text order. With
    /// `include_tree` the serialized tree and delimiter are prepended;
    /// without it the raw bitstream alone is returned, which measures bit
    /// length but cannot be decoded.
    ///
    /// Empty text is an invalid-input error.
    pub fn encode(&mut self, text: &str, include_tree: bool) -> Result<String> {
        if text.is_empty() {
            return Err(HuffmanError::invalid_input("cannot encode empty text"));
        }

        let frequencies = tree::count_frequencies(text);
        let root = tree::build_tree(&frequencies)?;
        let codes = build_codes(&root);

        let mut bitstream = String::new();
        for ch in text.chars() {
            // every text symbol has a leaf, so the lookup cannot miss
            if let Some(code) = codes.get(&ch) {
                bitstream.push_str(code);
            }
        }
        info!(
            original_bits = text.len() * 8,
            encoded_bits = bitstream.len(),
            distinct_symbols = frequencies.len(),
            "encoded text"
        );

        let payload = if include_tree {
            let tree_json = root.serialize()?;
            format!("{tree_json}{TREE_DELIMITER}{bitstream}")
        } else {
            bitstream
        };

        self.tree = Some(root);
        self.codes = codes;
        self.payload = Some(payload.clone());
        Ok(payload)
    }

    /// Replaces the held payload with one produced elsewhere.
    pub fn load_payload(&mut self, payload: impl Into<String>) {
        self.payload = Some(payload.into());
    }

    /// Decodes the currently held payload. Fails with an invalid-input
    /// error when nothing has been encoded or loaded.
    pub fn decode(&self) -> Result<String> {
        let payload = self
            .payload
            .as_deref()
            .ok_or_else(|| HuffmanError::invalid_input("no payload held; encode or load one first"))?;
        Self::decode_payload(payload)
    }

    /// Decodes a payload without touching codec state.
    ///
    /// Splits on the first `|`, reconstructs the tree from the JSON section,
    /// then walks the bitstream from the root: '0' descends left, '1' right,
    /// and each leaf emits its symbol and resets the walk. A payload with no
    /// delimiter (including the tree-less output of
    /// `encode(text, false)`) is a format error; a bitstream that runs out
    /// mid-code is a truncation error.
    pub fn decode_payload(payload: &str) -> Result<String> {
        let Some((tree_json, bitstream)) = payload.split_once(TREE_DELIMITER) else {
            return Err(HuffmanError::format(
                "payload has no tree delimiter '|', nothing to decode with",
            ));
        };
        let root = Node::parse(tree_json)?;
        let decoded = walk_bitstream(&root, bitstream)?;
        info!(
            bits = bitstream.len(),
            symbols = decoded.chars().count(),
            "decoded payload"
        );
        Ok(decoded)
    }

    /// The code table from the most recent encode.
    pub fn codes(&self) -> &HashMap<char, String> {
        &self.codes
    }

    /// The tree from the most recent encode.
    pub fn tree(&self) -> Option<&Node> {
        self.tree.as_ref()
    }
}

/// Assigns each leaf its root-to-leaf path, '0' for left and '1' for right.
fn build_codes(root: &Node) -> HashMap<char, String> {
    let mut codes = HashMap::new();
    collect_codes(root, String::new(), &mut codes);
    codes
}

fn collect_codes(node: &Node, prefix: String, codes: &mut HashMap<char, String>) {
    match node {
        Node::Leaf { symbol, .. } => {
            // A lone-leaf tree would otherwise get an empty code, losing the
            // repeat count; the sole symbol is assigned "0" instead.
            if prefix.is_empty() {
                codes.insert(*symbol, "0".to_string());
            } else {
                codes.insert(*symbol, prefix);
            }
        }
        Node::Internal { left, right, .. } => {
            let mut left_prefix = prefix.clone();
            left_prefix.push('0');
            collect_codes(left, left_prefix, codes);

            let mut right_prefix = prefix;
            right_prefix.push('1');
            collect_codes(right, right_prefix, codes);
        }
    }
}

fn walk_bitstream(root: &Node, bitstream: &str) -> Result<String> {
    // A leaf root means a single-symbol code table where the symbol was
    // written as "0" per occurrence.
    if let Node::Leaf { symbol, .. } = root {
        let mut decoded = String::new();
        for bit in bitstream.chars() {
            match bit {
                '0' => decoded.push(*symbol),
                '1' => {
                    return Err(HuffmanError::format(
                        "bit '1' has no path in a single-leaf tree",
                    ));
                }
                other => {
                    return Err(HuffmanError::format(format!(
                        "invalid bitstream character {other:?}"
                    )));
                }
            }
        }
        return Ok(decoded);
    }

    let mut decoded = String::new();
    let mut current = root;
    let mut consumed = 0usize;
    for bit in bitstream.chars() {
        let (left, right) = match current {
            Node::Internal { left, right, .. } => (left, right),
            // the walk resets to the (internal) root after every leaf
            Node::Leaf { .. } => unreachable!(),
        };
        current = match bit {
            '0' => left.as_ref(),
            '1' => right.as_ref(),
            other => {
                return Err(HuffmanError::format(format!(
                    "invalid bitstream character {other:?}"
                )));
            }
        };
        consumed += 1;

        if let Node::Leaf { symbol, .. } = current {
            decoded.push(*symbol);
            current = root;
        }
    }

    // An incomplete final code leaves the walk somewhere below the root.
    if !std::ptr::eq(current, root) {
        return Err(HuffmanError::TruncatedPayload {
            consumed_bits: consumed,
        });
    }

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(text: &str, include_tree: bool) -> String {
        HuffmanCodec::new().encode(text, include_tree).unwrap()
    }

    #[test]
    fn test_round_trip_hello_world() {
        let mut codec = HuffmanCodec::new();
        let payload = codec.encode("hello world", true).unwrap();
        assert_eq!(codec.decode().unwrap(), "hello world");
        assert_eq!(HuffmanCodec::decode_payload(&payload).unwrap(), "hello world");
    }

    #[test]
    fn test_round_trip_loaded_payload() {
        let payload = encode("the quick brown fox jumps over the lazy dog", true);

        let mut codec = HuffmanCodec::new();
        codec.load_payload(payload);
        assert_eq!(
            codec.decode().unwrap(),
            "the quick brown fox jumps over the lazy dog"
        );
    }

    #[test]
    fn test_codes_are_prefix_free() {
        let mut codec = HuffmanCodec::new();
        codec.encode("hello world", true).unwrap();

        let codes: Vec<&String> = codec.codes().values().collect();
        for a in &codes {
            for b in &codes {
                if a != b {
                    assert!(!a.starts_with(b.as_str()), "{a} has prefix {b}");
                }
            }
        }
    }

    #[test]
    fn test_bitstream_length_matches_code_lengths() {
        let text = "hello world";
        let mut codec = HuffmanCodec::new();
        let payload = codec.encode(text, true).unwrap();

        let (_, bitstream) = payload.split_once(TREE_DELIMITER).unwrap();
        let expected: usize = text.chars().map(|ch| codec.codes()[&ch].len()).sum();
        assert_eq!(bitstream.len(), expected);
        assert!(bitstream.chars().all(|bit| bit == '0' || bit == '1'));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let text = "mississippi riverbed";
        assert_eq!(encode(text, true), encode(text, true));
    }

    #[test]
    fn test_single_symbol_gets_one_bit_code() {
        let mut codec = HuffmanCodec::new();
        let payload = codec.encode("aaaa", true).unwrap();

        assert_eq!(codec.codes()[&'a'], "0");
        let (_, bitstream) = payload.split_once(TREE_DELIMITER).unwrap();
        assert_eq!(bitstream, "0000");
        assert_eq!(codec.decode().unwrap(), "aaaa");
    }

    #[test]
    fn test_single_leaf_tree_rejects_one_bit() {
        let payload = encode("aaaa", true);
        let broken = payload.replace("0000", "0100");
        assert!(matches!(
            HuffmanCodec::decode_payload(&broken),
            Err(HuffmanError::Format(_))
        ));
    }

    #[test]
    fn test_encode_empty_text_is_invalid_input() {
        assert!(matches!(
            HuffmanCodec::new().encode("", true),
            Err(HuffmanError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_decode_without_payload_is_invalid_input() {
        assert!(matches!(
            HuffmanCodec::new().decode(),
            Err(HuffmanError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_decode_without_delimiter_is_format_error() {
        assert!(matches!(
            HuffmanCodec::decode_payload("0101100"),
            Err(HuffmanError::Format(_))
        ));
    }

    #[test]
    fn test_tree_less_encode_output_cannot_be_decoded() {
        let mut codec = HuffmanCodec::new();
        codec.encode("hello world", false).unwrap();
        assert!(matches!(codec.decode(), Err(HuffmanError::Format(_))));
    }

    #[test]
    fn test_truncated_bitstream_is_truncation_error() {
        let payload = encode("hello world", true);
        let truncated = &payload[..payload.len() - 1];
        assert!(matches!(
            HuffmanCodec::decode_payload(truncated),
            Err(HuffmanError::TruncatedPayload { .. })
        ));
    }

    #[test]
    fn test_invalid_bitstream_character_is_format_error() {
        let payload = encode("hello world", true);
        let mangled = format!("{payload}x");
        assert!(matches!(
            HuffmanCodec::decode_payload(&mangled),
            Err(HuffmanError::Format(_))
        ));
    }

    #[test]
    fn test_empty_bitstream_decodes_to_empty_text() {
        let payload = encode("ab", true);
        let (tree_json, _) = payload.split_once(TREE_DELIMITER).unwrap();
        let empty = format!("{tree_json}{TREE_DELIMITER}");
        assert_eq!(HuffmanCodec::decode_payload(&empty).unwrap(), "");
    }

    #[test]
    fn test_tree_state_after_encode() {
        let mut codec = HuffmanCodec::new();
        codec.encode("hello world", true).unwrap();

        let root = codec.tree().unwrap();
        assert_eq!(root.freq(), 11);

        let mut leaves: Vec<char> = root
            .leaf_frequencies()
            .into_iter()
            .map(|(symbol, _)| symbol)
            .collect();
        leaves.sort_unstable();
        assert_eq!(leaves, vec![' ', 'd', 'e', 'h', 'l', 'o', 'r', 'w']);
    }

    #[test]
    fn test_round_trip_text_containing_delimiter() {
        let text = "a|b|c||";
        let payload = encode(text, true);

        // the first '|' in the payload must be the section delimiter
        let (tree_json, bitstream) = payload.split_once(TREE_DELIMITER).unwrap();
        assert!(!tree_json.contains('|'));
        assert!(bitstream.chars().all(|bit| bit == '0' || bit == '1'));
        assert_eq!(HuffmanCodec::decode_payload(&payload).unwrap(), text);
    }

    #[test]
    fn test_round_trip_multibyte_symbols() {
        let text = "héllo wörld ✓✓";
        assert_eq!(
            HuffmanCodec::decode_payload(&encode(text, true)).unwrap(),
            text
        );
    }
}
