//! Prediction entity

use serde::{Deserialize, Serialize};

use crate::{errors::DomainError, value_objects::ClassTable};

/// Index of the highest score
///
/// Ties resolve to the first maximum. A NaN score wins at its first
/// occurrence, so a model emitting NaN never silently picks a finite class.
pub fn argmax(scores: &[f32]) -> Result<usize, DomainError> {
    let (first, rest) = scores.split_first().ok_or(DomainError::EmptyScores)?;
    if first.is_nan() {
        return Ok(0);
    }

    let mut best = 0;
    let mut best_score = *first;
    for (offset, &score) in rest.iter().enumerate() {
        if score.is_nan() {
            return Ok(offset + 1);
        }
        if score > best_score {
            best = offset + 1;
            best_score = score;
        }
    }
    Ok(best)
}

/// Outcome of classifying one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Label of the winning class
    pub label: String,
    /// Score of the winning class, exactly `raw[index]`
    pub confidence: f32,
    /// Position of the winning class in the output vector
    pub index: usize,
    /// Full score vector as returned by the model
    pub raw: Vec<f32>,
}

impl Prediction {
    /// Derive a prediction from the model's score vector
    ///
    /// Fails with [`DomainError::NonFiniteScore`] when any score is NaN or
    /// infinite, and with [`DomainError::ClassIndexOutOfRange`] when the model
    /// is wider than the label table and the winning index has no label.
    pub fn from_scores(table: &ClassTable, raw: Vec<f32>) -> Result<Self, DomainError> {
        let index = argmax(&raw)?;
        if let Some(index) = raw.iter().position(|score| !score.is_finite()) {
            return Err(DomainError::NonFiniteScore { index });
        }
        let label = table.label(index)?.to_string();
        let confidence = raw[index];

        Ok(Self {
            label,
            confidence,
            index,
            raw,
        })
    }

    /// Number of scores the model produced
    pub fn output_width(&self) -> usize {
        self.raw.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_picks_highest() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]).unwrap(), 1);
    }

    #[test]
    fn argmax_first_of_ties() {
        assert_eq!(argmax(&[0.4, 0.4, 0.2]).unwrap(), 0);
        assert_eq!(argmax(&[0.1, 0.5, 0.5]).unwrap(), 1);
    }

    #[test]
    fn argmax_single_element() {
        assert_eq!(argmax(&[-3.0]).unwrap(), 0);
    }

    #[test]
    fn argmax_handles_negative_scores() {
        assert_eq!(argmax(&[-5.0, -1.0, -2.0]).unwrap(), 1);
    }

    #[test]
    fn argmax_empty_is_error() {
        assert_eq!(argmax(&[]).unwrap_err(), DomainError::EmptyScores);
    }

    #[test]
    fn argmax_nan_wins_at_first_occurrence() {
        assert_eq!(argmax(&[0.2, f32::NAN, 0.9, f32::NAN]).unwrap(), 1);
        assert_eq!(argmax(&[f32::NAN, 0.9]).unwrap(), 0);
    }

    #[test]
    fn from_scores_maps_label_and_confidence() {
        let table = ClassTable::tomato_leaf();
        let mut raw = vec![0.01; 10];
        raw[9] = 0.91;

        let prediction = Prediction::from_scores(&table, raw.clone()).unwrap();

        assert_eq!(prediction.label, "Tomato___healthy");
        assert_eq!(prediction.index, 9);
        assert!((prediction.confidence - 0.91).abs() < f32::EPSILON);
        assert_eq!(prediction.raw, raw);
        assert_eq!(prediction.output_width(), 10);
    }

    #[test]
    fn from_scores_rejects_index_past_table() {
        let table = ClassTable::tomato_leaf();
        let mut raw = vec![0.0; 11];
        raw[10] = 1.0;

        let err = Prediction::from_scores(&table, raw).unwrap_err();

        assert_eq!(err, DomainError::class_index_out_of_range(10, 10));
    }

    #[test]
    fn from_scores_accepts_wider_model_when_winner_has_label() {
        let table = ClassTable::new(["a", "b"]).unwrap();
        let prediction = Prediction::from_scores(&table, vec![0.2, 0.7, 0.1]).unwrap();
        assert_eq!(prediction.label, "b");
        assert_eq!(prediction.output_width(), 3);
    }

    #[test]
    fn from_scores_does_not_normalize() {
        let table = ClassTable::new(["a", "b"]).unwrap();
        let prediction = Prediction::from_scores(&table, vec![3.5, 12.0]).unwrap();
        assert!((prediction.confidence - 12.0).abs() < f32::EPSILON);
    }

    #[test]
    fn from_scores_rejects_nan_winner() {
        let table = ClassTable::tomato_leaf();
        let mut raw = vec![0.1; 10];
        raw[3] = f32::NAN;

        let err = Prediction::from_scores(&table, raw).unwrap_err();

        assert_eq!(err, DomainError::NonFiniteScore { index: 3 });
    }

    #[test]
    fn from_scores_rejects_infinity_anywhere() {
        let table = ClassTable::tomato_leaf();
        let mut raw = vec![0.1; 10];
        raw[0] = 0.9;
        raw[7] = f32::NEG_INFINITY;

        let err = Prediction::from_scores(&table, raw).unwrap_err();

        assert_eq!(err, DomainError::NonFiniteScore { index: 7 });
    }

    #[test]
    fn from_scores_empty_is_error() {
        let table = ClassTable::tomato_leaf();
        let err = Prediction::from_scores(&table, Vec::new()).unwrap_err();
        assert_eq!(err, DomainError::EmptyScores);
    }

    #[test]
    fn prediction_serialization() {
        let table = ClassTable::new(["a", "b"]).unwrap();
        let prediction = Prediction::from_scores(&table, vec![0.25, 0.75]).unwrap();
        let json = serde_json::to_string(&prediction).unwrap();
        assert!(json.contains(r#""label":"b""#));
        assert!(json.contains(r#""raw":[0.25,0.75]"#));
    }
}
