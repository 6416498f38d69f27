//! Predictor - Raw submission → premium estimate
//!
//! Inference never refits anything: encoding, imputation, scaling and the
//! dot product all read frozen state.

use crate::logic::error::PredictError;
use crate::logic::features::{encode, FeatureSchema, FeatureVector, RawInput};
use crate::logic::model::LinearModel;
use crate::logic::preprocess::Preprocessor;

/// Validate, encode and score one submission
pub fn predict(
    raw: &RawInput,
    schema: &FeatureSchema,
    preprocessor: &Preprocessor,
    model: &LinearModel,
) -> Result<f64, PredictError> {
    let vector = encode(raw, schema)?;
    let premium = predict_vector(&vector, schema, preprocessor, model)?;

    log::debug!("Prediction {:.2} for {}", premium, vector.to_log_entry(schema));
    Ok(premium)
}

/// Score an already-encoded vector; rejects vectors from another layout
pub fn predict_vector(
    vector: &FeatureVector,
    schema: &FeatureSchema,
    preprocessor: &Preprocessor,
    model: &LinearModel,
) -> Result<f64, PredictError> {
    vector.validate(schema)?;
    let scaled = preprocessor.apply_row(vector.view())?;
    Ok(model.infer(scaled.view())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::error::{DimensionMismatch, ValidationError};
    use crate::logic::testing::{raw_input, synthetic_dataset};
    use crate::logic::trainer::Trainer;

    const REGIONS: &[&str] = &["Ariana", "Bizerte", "Tunis"];

    #[test]
    fn test_predict_is_repeatable() {
        let bundle = Trainer::default().train(&synthetic_dataset(60, REGIONS)).unwrap();
        let raw = raw_input("Oui", "Tunis");

        let a = predict(&raw, &bundle.schema, &bundle.preprocessor, &bundle.model).unwrap();
        let b = predict(&raw, &bundle.schema, &bundle.preprocessor, &bundle.model).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_validation_error_surfaces() {
        let bundle = Trainer::default().train(&synthetic_dataset(60, REGIONS)).unwrap();
        let mut raw = raw_input("Non", "Ariana");
        raw.age = 12.0;

        let err = predict(&raw, &bundle.schema, &bundle.preprocessor, &bundle.model).unwrap_err();
        match err {
            PredictError::Validation(ValidationError::OutOfRange { field, .. }) => {
                assert_eq!(field, "age")
            }
            other => panic!("Expected OutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_foreign_layout_rejected() {
        let bundle = Trainer::default().train(&synthetic_dataset(60, REGIONS)).unwrap();
        let other = FeatureSchema::from_regions(["Ariana", "Sfax"]);
        let vector = encode(&raw_input("Non", "Ariana"), &other).unwrap();

        let err = predict_vector(&vector, &bundle.schema, &bundle.preprocessor, &bundle.model)
            .unwrap_err();
        assert!(matches!(err, PredictError::Layout(_)));
    }

    #[test]
    fn test_model_width_mismatch_rejected() {
        let bundle = Trainer::default().train(&synthetic_dataset(60, REGIONS)).unwrap();
        let narrow = LinearModel::new(vec![1.0; 3], 0.0);

        let err = predict(&raw_input("Non", "Ariana"), &bundle.schema, &bundle.preprocessor, &narrow)
            .unwrap_err();
        assert_eq!(
            err,
            PredictError::Dimension(DimensionMismatch {
                expected: 3,
                actual: bundle.schema.len()
            })
        );
    }
}
