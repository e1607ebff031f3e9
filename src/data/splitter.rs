// ============================================================
// Layer 4 — Dev/Test Cross-Validation Splitter
// ============================================================
// Repeated random subsampling of the encoded test set:
//
//   for each fold:
//     shuffle the test set in place (the shuffles accumulate)
//     dev  = first ⌊len · dev_fraction⌋ rows
//     test = the remaining rows
//
// Folds are independent samples, not a partition; the same row
// can land in dev for several folds. One seeded RNG, owned by the
// caller, drives every shuffle so a run is reproducible.
//
// Shuffling is Fisher-Yates via rand::seq::SliceRandom, applied
// to every column with one permutation (EncodedDataset::shuffle).

use rand::Rng;

use crate::data::dataset::EncodedDataset;
use crate::domain::error::DataError;

/// Default number of folds.
pub const CV_FOLDS: usize = 100;

/// Default share of the test set that becomes dev.
pub const DEV_FRACTION: f64 = 0.1;

/// One dev/test fold.
#[derive(Debug, Clone)]
pub struct CvSplit {
    pub index: usize,
    pub dev:   EncodedDataset,
    pub test:  EncodedDataset,
}

fn check_fraction(dev_fraction: f64) -> Result<(), DataError> {
    if !(0.0..=1.0).contains(&dev_fraction) {
        return Err(DataError::InvalidParameter {
            name:   "dev fraction",
            reason: format!("{dev_fraction} is outside [0, 1]"),
        });
    }
    Ok(())
}

/// Draw `folds` dev/test splits of `dataset`, shuffling it in place
/// before each one. Every split is handed to `on_fold` as soon as it is
/// drawn, so only one fold is held in memory. Returns the fold count.
pub fn cv_splits<R, F, E>(
    dataset: &mut EncodedDataset,
    folds: usize,
    dev_fraction: f64,
    rng: &mut R,
    mut on_fold: F,
) -> Result<usize, E>
where
    R: Rng + ?Sized,
    F: FnMut(CvSplit) -> Result<(), E>,
    E: From<DataError>,
{
    check_fraction(dev_fraction)?;
    let dev_len = ((dataset.len() as f64) * dev_fraction).floor() as usize;

    for index in 0..folds {
        dataset.shuffle(&mut *rng);
        let (dev, test) = dataset.split_at(dev_len);
        on_fold(CvSplit { index, dev, test })?;
    }

    tracing::debug!(
        "Generated {} CV folds: {} dev / {} test rows each",
        folds,
        dev_len,
        dataset.len() - dev_len
    );
    Ok(folds)
}
