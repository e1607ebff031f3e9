// ============================================================
// Layer 3 — Instance and Field Types
// ============================================================
// One relation extraction example is a shortest dependency path:
//
//   tokens      ["Obama", "born", "Hawaii"]
//   pos         ["NNP",   "VBN",  "NNP"]
//   deprel      ["nsubjpass", "ROOT", "nmod"]
//   directions  ["0",     "1",    "2"]        (raw only)
//   root        ["_",     "ROOT", "_"]        (derived)
//   label       "per:origin"
//
// All per-position sequences of one instance share a length.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder marker for positions that are not the path root.
pub const EMPTY_MARKER: &str = "_";

/// Marker placed on the root / common ancestor of the path.
pub const ROOT_MARKER: &str = "ROOT";

/// Direction code that never marks the root.
pub const DIRECTION_SENTINEL: &str = "2";

/// The columns of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Token,
    Pos,
    Deprel,
    Root,
    Label,
}

impl Field {
    /// The per-position input fields handed to the model, in batch order.
    pub const INPUTS: [Field; 4] = [Field::Token, Field::Pos, Field::Deprel, Field::Root];

    pub const ALL: [Field; 5] = [Field::Token, Field::Pos, Field::Deprel, Field::Root, Field::Label];

    /// Stable key used in batches and logs.
    pub fn name(self) -> &'static str {
        match self {
            Field::Token => "token",
            Field::Pos => "pos",
            Field::Deprel => "deprel",
            Field::Root => "root",
            Field::Label => "label",
        }
    }

    /// Label is the only scalar (one value per instance) field.
    pub fn is_scalar(self) -> bool {
        matches!(self, Field::Label)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An instance exactly as it appears in the input files,
/// before validation and root derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInstance {
    pub tokens:     Vec<String>,
    pub pos:        Vec<String>,
    pub deprel:     Vec<String>,
    pub directions: Vec<String>,
    pub label:      String,
}

/// A validated instance ready to be appended to a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub tokens: Vec<String>,
    pub pos:    Vec<String>,
    pub deprel: Vec<String>,
    pub root:   Vec<String>,
    pub label:  String,
}

impl Instance {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Index of the ROOT marker, if any.
    pub fn root_position(&self) -> Option<usize> {
        self.root.iter().position(|m| m == ROOT_MARKER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_are_stable() {
        let names: Vec<&str> = Field::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["token", "pos", "deprel", "root", "label"]);
    }

    #[test]
    fn test_only_label_is_scalar() {
        assert!(Field::Label.is_scalar());
        assert!(Field::INPUTS.iter().all(|f| !f.is_scalar()));
    }

    #[test]
    fn test_root_position() {
        let inst = Instance {
            tokens: vec!["a".into(), "b".into()],
            pos:    vec!["DT".into(), "NN".into()],
            deprel: vec!["det".into(), "root".into()],
            root:   vec![EMPTY_MARKER.into(), ROOT_MARKER.into()],
            label:  "no_relation".into(),
        };
        assert_eq!(inst.root_position(), Some(1));
        assert_eq!(inst.len(), 2);
    }
}
