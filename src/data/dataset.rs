// ============================================================
// Layer 4 — Field-Major Datasets
// ============================================================
// Datasets are stored column by column so a batch of one field
// is a contiguous slice:
//
//   token   [[w, w, w], [w, w], ...]
//   pos     [[t, t, t], [t, t], ...]
//   deprel  [[r, r, r], [r, r], ...]
//   root    [[_, ROOT, _], [ROOT, _], ...]
//   label   [l, l, ...]
//
// RelationDataset tracks per column whether it still holds
// symbols or has been encoded to ids, so a column can only be
// encoded once. EncodedDataset is the fully numeric form that is
// written to disk and read back by the batch iterator; it also
// implements burn's Dataset trait.

use burn::data::dataset::Dataset;
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

use crate::domain::error::DataError;
use crate::domain::instance::{Field, Instance};

/// One column of a RelationDataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    Symbols(Vec<Vec<String>>),
    ScalarSymbols(Vec<String>),
    Ids(Vec<Vec<u32>>),
    ScalarIds(Vec<u32>),
}

impl Column {
    fn empty_for(field: Field) -> Self {
        if field.is_scalar() {
            Column::ScalarSymbols(Vec::new())
        } else {
            Column::Symbols(Vec::new())
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Symbols(rows) => rows.len(),
            Column::ScalarSymbols(rows) => rows.len(),
            Column::Ids(rows) => rows.len(),
            Column::ScalarIds(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_encoded(&self) -> bool {
        matches!(self, Column::Ids(_) | Column::ScalarIds(_))
    }
}

/// A dataset whose columns move from symbols to ids one field at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDataset {
    token:  Column,
    pos:    Column,
    deprel: Column,
    root:   Column,
    label:  Column,
}

impl Default for RelationDataset {
    fn default() -> Self {
        Self {
            token:  Column::empty_for(Field::Token),
            pos:    Column::empty_for(Field::Pos),
            deprel: Column::empty_for(Field::Deprel),
            root:   Column::empty_for(Field::Root),
            label:  Column::empty_for(Field::Label),
        }
    }
}

impl RelationDataset {
    pub fn from_instances(instances: impl IntoIterator<Item = Instance>) -> Result<Self, DataError> {
        let mut dataset = Self::default();
        for instance in instances {
            dataset.push(instance)?;
        }
        Ok(dataset)
    }

    /// Append one instance. Only valid while every column is symbolic.
    pub fn push(&mut self, instance: Instance) -> Result<(), DataError> {
        for field in Field::ALL {
            if self.column(field).is_encoded() {
                return Err(DataError::AlreadyEncoded { field });
            }
        }
        if let Column::Symbols(rows) = &mut self.token {
            rows.push(instance.tokens);
        }
        if let Column::Symbols(rows) = &mut self.pos {
            rows.push(instance.pos);
        }
        if let Column::Symbols(rows) = &mut self.deprel {
            rows.push(instance.deprel);
        }
        if let Column::Symbols(rows) = &mut self.root {
            rows.push(instance.root);
        }
        if let Column::ScalarSymbols(rows) = &mut self.label {
            rows.push(instance.label);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column(&self, field: Field) -> &Column {
        match field {
            Field::Token => &self.token,
            Field::Pos => &self.pos,
            Field::Deprel => &self.deprel,
            Field::Root => &self.root,
            Field::Label => &self.label,
        }
    }

    pub fn column_mut(&mut self, field: Field) -> &mut Column {
        match field {
            Field::Token => &mut self.token,
            Field::Pos => &mut self.pos,
            Field::Deprel => &mut self.deprel,
            Field::Root => &mut self.root,
            Field::Label => &mut self.label,
        }
    }

    /// Rows of a per-position field that has not been encoded yet.
    pub fn symbol_sequences(&self, field: Field) -> Result<&[Vec<String>], DataError> {
        match self.column(field) {
            Column::Symbols(rows) => Ok(rows),
            _ => Err(DataError::AlreadyEncoded { field }),
        }
    }

    /// Values of a scalar field that has not been encoded yet.
    pub fn symbol_scalars(&self, field: Field) -> Result<&[String], DataError> {
        match self.column(field) {
            Column::ScalarSymbols(rows) => Ok(rows),
            _ => Err(DataError::AlreadyEncoded { field }),
        }
    }
}

/// One encoded example, as yielded through burn's Dataset trait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedInstance {
    pub tokens: Vec<u32>,
    pub pos:    Vec<u32>,
    pub deprel: Vec<u32>,
    pub root:   Vec<u32>,
    pub label:  u32,
}

impl EncodedInstance {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Fully id-encoded dataset, the unit that is serialised to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedDataset {
    pub token:  Vec<Vec<u32>>,
    pub pos:    Vec<Vec<u32>>,
    pub deprel: Vec<Vec<u32>>,
    pub root:   Vec<Vec<u32>>,
    pub label:  Vec<u32>,
}

impl EncodedDataset {
    pub fn from_instances(instances: impl IntoIterator<Item = EncodedInstance>) -> Self {
        let mut d = Self::default();
        for inst in instances {
            d.token.push(inst.tokens);
            d.pos.push(inst.pos);
            d.deprel.push(inst.deprel);
            d.root.push(inst.root);
            d.label.push(inst.label);
        }
        d
    }

    pub fn len(&self) -> usize {
        self.label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_empty()
    }

    /// Rows of one per-position input field; `None` for the label.
    pub fn sequences(&self, field: Field) -> Option<&[Vec<u32>]> {
        match field {
            Field::Token => Some(&self.token),
            Field::Pos => Some(&self.pos),
            Field::Deprel => Some(&self.deprel),
            Field::Root => Some(&self.root),
            Field::Label => None,
        }
    }

    pub fn labels(&self) -> &[u32] {
        &self.label
    }

    /// Longest token sequence, 0 when empty.
    pub fn max_seq_len(&self) -> usize {
        self.token.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Every column must hold one row per label.
    pub fn validate(&self) -> Result<(), DataError> {
        let expected = self.label.len();
        for field in Field::INPUTS {
            let found = self.sequences(field).map_or(0, <[Vec<u32>]>::len);
            if found != expected {
                return Err(DataError::ColumnLength { field, found, expected });
            }
        }
        Ok(())
    }

    /// A new dataset holding the rows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Self {
        let pick = |col: &[Vec<u32>]| indices.iter().map(|&i| col[i].clone()).collect();
        Self {
            token:  pick(&self.token),
            pos:    pick(&self.pos),
            deprel: pick(&self.deprel),
            root:   pick(&self.root),
            label:  indices.iter().map(|&i| self.label[i]).collect(),
        }
    }

    /// Shuffle every column with the same permutation.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.shuffle(rng);
        *self = self.select(&order);
    }

    /// Keep only the first `n` rows.
    pub fn truncate(&mut self, n: usize) {
        self.token.truncate(n);
        self.pos.truncate(n);
        self.deprel.truncate(n);
        self.root.truncate(n);
        self.label.truncate(n);
    }

    /// Split into rows `[0, at)` and `[at, len)`.
    pub fn split_at(&self, at: usize) -> (Self, Self) {
        let at = at.min(self.len());
        let head: Vec<usize> = (0..at).collect();
        let tail: Vec<usize> = (at..self.len()).collect();
        (self.select(&head), self.select(&tail))
    }
}

impl TryFrom<RelationDataset> for EncodedDataset {
    type Error = DataError;

    fn try_from(d: RelationDataset) -> Result<Self, Self::Error> {
        fn ids(field: Field, col: Column) -> Result<Vec<Vec<u32>>, DataError> {
            match col {
                Column::Ids(rows) => Ok(rows),
                _ => Err(DataError::NotEncoded { field }),
            }
        }

        let label = match d.label {
            Column::ScalarIds(rows) => rows,
            _ => return Err(DataError::NotEncoded { field: Field::Label }),
        };
        let encoded = Self {
            token:  ids(Field::Token, d.token)?,
            pos:    ids(Field::Pos, d.pos)?,
            deprel: ids(Field::Deprel, d.deprel)?,
            root:   ids(Field::Root, d.root)?,
            label,
        };
        encoded.validate()?;
        Ok(encoded)
    }
}

// burn's Dataset view, one EncodedInstance per row.
impl Dataset<EncodedInstance> for EncodedDataset {
    fn get(&self, index: usize) -> Option<EncodedInstance> {
        Some(EncodedInstance {
            tokens: self.token.get(index)?.clone(),
            pos:    self.pos.get(index)?.clone(),
            deprel: self.deprel.get(index)?.clone(),
            root:   self.root.get(index)?.clone(),
            label:  *self.label.get(index)?,
        })
    }

    fn len(&self) -> usize {
        self.label.len()
    }
}
