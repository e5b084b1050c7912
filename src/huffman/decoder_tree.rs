//! Decode-side tree recovery and the 8-bit prefix lookup table.

use crate::bitstream::BitReader;
use crate::error::{HzError, Result};
use crate::format::{Symbol, MAX_TREE_NODES, SYMBOL_BITS};

/// Sentinel for a LUT entry with no tree continuation.
pub const LUT_NO_NODE: u16 = u16::MAX;

/// One entry of the 256-entry prefix table, indexed by the next 8 bits
/// peeked from the stream.
///
/// Terminal entries (`node == LUT_NO_NODE`) resolve a whole code word:
/// consume `bits` bits and emit `symbol`. Non-terminal entries consume
/// 8 bits and continue walking the tree from `node`.
#[derive(Debug, Clone, Copy)]
pub struct LutEntry {
    pub node: u16,
    pub symbol: Symbol,
    pub bits: u8,
}

/// Arena tree node. A leaf has `symbol >= 0`; a branch references its
/// children by arena index.
#[derive(Debug, Clone, Copy)]
pub struct DecodeNode {
    pub symbol: i16,
    pub child_a: u16,
    pub child_b: u16,
}

const NO_CHILD: u16 = u16::MAX;

/// A recovered Huffman tree plus its prefix lookup table. Lives for one
/// block decode; roughly 5 KB, stack-allocated.
#[derive(Debug)]
pub struct DecodeTree {
    pub nodes: [DecodeNode; MAX_TREE_NODES],
    pub lut: [LutEntry; 256],
    pub root: u16,
    node_count: usize,
}

impl DecodeTree {
    /// Recover a tree from the serialized description at the reader's
    /// position, building the lookup table along the way.
    ///
    /// Fails on premature end of input and on descriptions requiring
    /// more than [`MAX_TREE_NODES`] nodes.
    pub fn recover(reader: &mut BitReader) -> Result<Self> {
        let mut tree = Self {
            nodes: [DecodeNode {
                symbol: -1,
                child_a: NO_CHILD,
                child_b: NO_CHILD,
            }; MAX_TREE_NODES],
            lut: [LutEntry {
                node: LUT_NO_NODE,
                symbol: 0,
                bits: 1,
            }; 256],
            root: 0,
            node_count: 0,
        };
        tree.root = tree.recover_node(reader, 0, 0)?;
        Ok(tree)
    }

    /// Node accessor for the decode loops.
    #[inline]
    pub fn node(&self, idx: u16) -> &DecodeNode {
        &self.nodes[idx as usize]
    }

    fn recover_node(&mut self, reader: &mut BitReader, code: u32, bits: u32) -> Result<u16> {
        if self.node_count >= MAX_TREE_NODES {
            return Err(HzError::TreeOverflow(MAX_TREE_NODES));
        }
        let idx = self.node_count as u16;
        self.node_count += 1;

        let is_leaf = reader.read_bit_checked();
        if reader.failed() {
            return Err(HzError::TruncatedInput("tree description"));
        }

        if is_leaf != 0 {
            let symbol = reader.read_bits_checked(SYMBOL_BITS) as Symbol;
            if reader.failed() {
                return Err(HzError::TruncatedInput("tree leaf symbol"));
            }
            self.nodes[idx as usize].symbol = symbol as i16;

            if bits <= 8 {
                // Replicate the entry across every permutation of the
                // upper bits so any 8-bit prefix ending in this code
                // resolves to it. A depth-0 lone leaf still consumes
                // one bit per symbol.
                let dups = 256 >> bits;
                for i in 0..dups {
                    self.lut[((i << bits) | code) as usize] = LutEntry {
                        node: LUT_NO_NODE,
                        symbol,
                        bits: bits.max(1) as u8,
                    };
                }
            }
            return Ok(idx);
        }

        if bits == 8 {
            // Branch at the LUT horizon: its codes are longer than
            // 8 bits, so the entry points back into the tree.
            self.lut[code as usize] = LutEntry {
                node: idx,
                symbol: 0,
                bits: 8,
            };
        }

        let child_a = self.recover_node(reader, code, bits + 1)?;
        // Below the LUT horizon the path code is never consulted, so it
        // stops accumulating there (codes may run past 32 bits in a
        // hostile description).
        let b_code = if bits < 8 { code | (1 << bits) } else { code };
        let child_b = self.recover_node(reader, b_code, bits + 1)?;
        self.nodes[idx as usize].child_a = child_a;
        self.nodes[idx as usize].child_b = child_b;

        Ok(idx)
    }
}
