// ============================================================
// Layer 4 — Instance Preprocessor
// ============================================================
// Turns one RawInstance into a validated Instance:
//
//   1. Check that tokens, POS, deprel and directions are parallel
//   2. Upper-case every POS tag
//   3. Derive the root-marker sequence from the directions
//
// Root markers:
//   Scan the direction codes from the last position to the first.
//   The first position whose code is not the sentinel "2" is the
//   root of the path and gets "ROOT"; every other position gets "_".
//
//   directions  ["2", "2", "x", "2"]
//   root        ["_", "_", "ROOT", "_"]
//
//   When every code is the sentinel, position 0 (the start of the
//   path) is marked instead and the instance is reported as a
//   fallback so the caller can count it.

use crate::domain::error::DataError;
use crate::domain::instance::{Instance, RawInstance, DIRECTION_SENTINEL, EMPTY_MARKER, ROOT_MARKER};

/// Marker sequence plus whether the fallback position was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootMarkers {
    pub markers:  Vec<String>,
    pub fallback: bool,
}

/// Derive root markers from path direction codes.
pub fn root_markers(directions: &[String]) -> RootMarkers {
    let mut markers = vec![EMPTY_MARKER.to_string(); directions.len()];

    let found = directions.iter().rposition(|d| d != DIRECTION_SENTINEL);
    let fallback = found.is_none() && !directions.is_empty();

    let root = match found {
        Some(j) => Some(j),
        None if fallback => Some(0),
        None => None,
    };
    if let Some(j) = root {
        markers[j] = ROOT_MARKER.to_string();
    }

    RootMarkers { markers, fallback }
}

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Validate and normalise one raw instance.
    /// `index` is the position in the input file, used in errors.
    pub fn prepare(&self, index: usize, raw: RawInstance) -> Result<(Instance, bool), DataError> {
        let expected = raw.tokens.len();
        for (field, found) in [
            ("pos", raw.pos.len()),
            ("deprel", raw.deprel.len()),
            ("directions", raw.directions.len()),
        ] {
            if found != expected {
                return Err(DataError::RaggedInstance { index, field, found, expected });
            }
        }

        let RootMarkers { markers, fallback } = root_markers(&raw.directions);

        let instance = Instance {
            tokens: raw.tokens,
            pos:    raw.pos.iter().map(|tag| tag.to_uppercase()).collect(),
            deprel: raw.deprel,
            root:   markers,
            label:  raw.label,
        };
        Ok((instance, fallback))
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}
