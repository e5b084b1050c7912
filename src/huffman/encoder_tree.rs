//! Encode-side symbol table and tree construction.

use crate::bitstream::BitWriter;
use crate::format::{
    run_tier, scan_zero_run, Symbol, MAX_TREE_NODES, NUM_SYMBOLS, SYMBOL_BITS,
};

/// Per-symbol encode state: block frequency, then the assigned code
/// word and its length once the tree has been stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolInfo {
    pub count: u32,
    pub code: u32,
    pub bits: u32,
}

/// The full 261-entry symbol table for one block, indexed by symbol.
pub struct SymbolTable {
    entries: [SymbolInfo; NUM_SYMBOLS],
}

/// Tree-building node. Leaves carry a symbol; branches reference their
/// children by arena index.
#[derive(Debug, Clone, Copy)]
struct BuildNode {
    count: u32,
    symbol: i32,
    child_a: u16,
    child_b: u16,
}

const NO_CHILD: u16 = u16::MAX;

impl SymbolTable {
    /// Build the histogram for a block, counting zero runs with the
    /// same tier scan the emit loop uses.
    pub fn histogram(block: &[u8]) -> Self {
        let mut entries = [SymbolInfo::default(); NUM_SYMBOLS];

        let mut k = 0;
        while k < block.len() {
            let byte = block[k];
            if byte == 0 {
                let zeros = scan_zero_run(block, k);
                if zeros == 1 {
                    entries[0].count += 1;
                } else {
                    entries[run_tier(zeros).symbol as usize].count += 1;
                }
                k += zeros;
            } else {
                entries[byte as usize].count += 1;
                k += 1;
            }
        }

        Self { entries }
    }

    /// Access the entry for a symbol.
    #[inline]
    pub fn entry(&self, symbol: Symbol) -> &SymbolInfo {
        &self.entries[symbol as usize]
    }

    /// True when the block uses a single code. Literal 0 and every
    /// zero-run tier count as one code, so all-zeros blocks qualify
    /// alongside uniform non-zero fills.
    pub fn single_code(&self) -> bool {
        let mut has_zeros = false;
        let mut nonzero_codes = 0usize;
        for (symbol, entry) in self.entries.iter().enumerate() {
            if entry.count == 0 {
                continue;
            }
            if symbol == 0 || symbol >= 256 {
                has_zeros = true;
            } else {
                nonzero_codes += 1;
            }
            if nonzero_codes + has_zeros as usize > 1 {
                return false;
            }
        }
        nonzero_codes + has_zeros as usize == 1
    }
}

/// Build the optimal prefix code for the table's non-zero symbols,
/// emit the tree description to `writer`, and record each symbol's code
/// word back into the table.
///
/// With no used symbols at all, nothing is written; the caller falls
/// back to another block mode. A single used symbol is stored as a lone
/// leaf whose code is one bit long.
pub fn build_tree(symbols: &mut SymbolTable, writer: &mut BitWriter) {
    let mut nodes = [BuildNode {
        count: 0,
        symbol: -1,
        child_a: NO_CHILD,
        child_b: NO_CHILD,
    }; MAX_TREE_NODES];

    // One leaf per used symbol.
    let mut num_leaves = 0usize;
    for (symbol, entry) in symbols.entries.iter().enumerate() {
        if entry.count > 0 {
            nodes[num_leaves].symbol = symbol as i32;
            nodes[num_leaves].count = entry.count;
            num_leaves += 1;
        }
    }

    if num_leaves == 0 {
        return;
    }
    if num_leaves == 1 {
        // A lone leaf still consumes one bit per emitted symbol.
        store_node(&nodes, 0, symbols, writer, 0, 1);
        return;
    }

    // Join the two lightest live nodes until one root remains. Consumed
    // nodes leave the live set by having their count zeroed.
    let mut nodes_left = num_leaves;
    let mut next_idx = num_leaves;
    let mut root = 0usize;
    while nodes_left > 1 {
        let mut lightest: Option<usize> = None;
        let mut second: Option<usize> = None;
        for k in 0..next_idx {
            if nodes[k].count == 0 {
                continue;
            }
            match lightest {
                Some(l) if nodes[k].count > nodes[l].count => {
                    if second.map_or(true, |s| nodes[k].count <= nodes[s].count) {
                        second = Some(k);
                    }
                }
                _ => {
                    second = lightest;
                    lightest = Some(k);
                }
            }
        }
        let (a, b) = match (lightest, second) {
            (Some(a), Some(b)) => (a, b),
            _ => break,
        };

        nodes[next_idx] = BuildNode {
            count: nodes[a].count + nodes[b].count,
            symbol: -1,
            child_a: a as u16,
            child_b: b as u16,
        };
        nodes[a].count = 0;
        nodes[b].count = 0;
        root = next_idx;
        next_idx += 1;
        nodes_left -= 1;
    }

    store_node(&nodes, root, symbols, writer, 0, 0);
}

/// Preorder walk: emit the tree description and fill in code words.
fn store_node(
    nodes: &[BuildNode; MAX_TREE_NODES],
    idx: usize,
    symbols: &mut SymbolTable,
    writer: &mut BitWriter,
    code: u32,
    bits: u32,
) {
    let node = nodes[idx];

    if node.symbol >= 0 {
        writer.write_bits(1, 1);
        if writer.failed() {
            return;
        }
        writer.write_bits(node.symbol as u32, SYMBOL_BITS);
        if writer.failed() {
            return;
        }
        symbols.entries[node.symbol as usize].code = code;
        symbols.entries[node.symbol as usize].bits = bits;
        return;
    }

    writer.write_bits(0, 1);
    if writer.failed() {
        return;
    }

    store_node(nodes, node.child_a as usize, symbols, writer, code, bits + 1);
    store_node(
        nodes,
        node.child_b as usize,
        symbols,
        writer,
        code | (1 << bits),
        bits + 1,
    );
}
