// ============================================================
// Layer 3 — Symbol Tables
// ============================================================
// A SymbolTable maps a string symbol (word, POS tag, dependency
// relation, root marker, relation label) to a small integer id.
//
// Id layout for per-position fields:
//   0      <PAD>
//   1      <UNK>
//   2..    dense, in the order the symbols were supplied
//
// Label tables have no reserved ids and start at 0.
//
// Tables are immutable once built; the vocabulary built from the
// training split is reused unchanged for every other split.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const PAD_TOKEN: &str = "<PAD>";
pub const UNK_TOKEN: &str = "<UNK>";
pub const PAD_ID: u32 = 0;
pub const UNK_ID: u32 = 1;

/// First id handed to a non-reserved symbol.
pub const FIRST_FREE_ID: u32 = 2;

/// Symbol → id mapping. Serialises as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolTable {
    ids: HashMap<String, u32>,
}

impl SymbolTable {
    /// PAD = 0, UNK = 1, then `symbols` from 2 in iteration order.
    /// A symbol seen twice keeps its first id.
    pub fn with_reserved<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::default();
        table.ids.insert(PAD_TOKEN.to_string(), PAD_ID);
        table.ids.insert(UNK_TOKEN.to_string(), UNK_ID);
        table.extend_from(symbols, FIRST_FREE_ID);
        table
    }

    /// Dense ids from 0 with no reserved entries (label tables).
    pub fn dense<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::default();
        table.extend_from(symbols, 0);
        table
    }

    fn extend_from<I, S>(&mut self, symbols: I, first_id: u32)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut next = first_id;
        for symbol in symbols {
            let symbol = symbol.into();
            if !self.ids.contains_key(&symbol) {
                self.ids.insert(symbol, next);
                next += 1;
            }
        }
    }

    pub fn get(&self, symbol: &str) -> Option<u32> {
        self.ids.get(symbol).copied()
    }

    /// Id of `symbol`, falling back to UNK.
    pub fn id_or_unk(&self, symbol: &str) -> u32 {
        self.get(symbol).unwrap_or(UNK_ID)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.ids.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// True when PAD and UNK hold their reserved ids.
    pub fn has_reserved(&self) -> bool {
        self.get(PAD_TOKEN) == Some(PAD_ID) && self.get(UNK_TOKEN) == Some(UNK_ID)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.ids.iter().map(|(s, &id)| (s.as_str(), id))
    }

    /// Reverse mapping, used to turn label ids back into display labels.
    pub fn id_to_symbol(&self) -> HashMap<u32, String> {
        self.ids.iter().map(|(s, &id)| (id, s.clone())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_ids() {
        let t = SymbolTable::with_reserved(["NN", "VB"]);
        assert_eq!(t.get(PAD_TOKEN), Some(PAD_ID));
        assert_eq!(t.get(UNK_TOKEN), Some(UNK_ID));
        assert_eq!(t.get("NN"), Some(2));
        assert_eq!(t.get("VB"), Some(3));
        assert!(t.has_reserved());
    }

    #[test]
    fn test_dense_starts_at_zero() {
        let t = SymbolTable::dense(["no_relation", "per:title"]);
        assert_eq!(t.get("no_relation"), Some(0));
        assert_eq!(t.get("per:title"), Some(1));
        assert!(!t.has_reserved());
    }

    #[test]
    fn test_duplicate_keeps_first_id() {
        let t = SymbolTable::with_reserved(["a", "b", "a", "c"]);
        assert_eq!(t.get("a"), Some(2));
        assert_eq!(t.get("c"), Some(4));
        assert_eq!(t.len(), 5);
    }

    #[test]
    fn test_unknown_falls_back_to_unk() {
        let t = SymbolTable::with_reserved(["x"]);
        assert_eq!(t.id_or_unk("missing"), UNK_ID);
    }

    #[test]
    fn test_serialises_as_plain_object() {
        let t = SymbolTable::dense(["only"]);
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#"{"only":0}"#);
        let back: SymbolTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_reverse_mapping() {
        let t = SymbolTable::dense(["a", "b"]);
        let rev = t.id_to_symbol();
        assert_eq!(rev.get(&1).map(String::as_str), Some("b"));
    }
}
