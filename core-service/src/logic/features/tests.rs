//! Integration Tests for schema + encoder
//!
//! Checks the alignment guarantees: column order, zero fill, and graceful
//! handling of regions never seen during training.

#[cfg(test)]
mod integration_tests {
    use crate::logic::dataset::{Dataset, Record, Sex};
    use crate::logic::error::ValidationError;
    use crate::logic::features::{encode, encode_record, FeatureSchema, RawInput, BASE_COLUMNS};
    use crate::logic::testing::{raw_input, synthetic_dataset};

    fn ariana_bizerte() -> FeatureSchema {
        FeatureSchema::build(&synthetic_dataset(12, &["Ariana", "Bizerte"])).unwrap()
    }

    /// Field order in the submission never changes the vector layout
    #[test]
    fn test_encode_order_independent_of_input_fields() {
        let schema = ariana_bizerte();

        let a: RawInput = serde_json::from_str(
            r#"{"age":40,"weight":80,"sex":"Femme","smoking_status":"Oui","region":"Bizerte","number_of_children":2}"#,
        )
        .unwrap();
        let b: RawInput = serde_json::from_str(
            r#"{"number_of_children":2,"region":"Bizerte","smoking_status":"Oui","sex":"Femme","weight":80,"age":40}"#,
        )
        .unwrap();

        let va = encode(&a, &schema).unwrap();
        let vb = encode(&b, &schema).unwrap();

        assert_eq!(va.len(), schema.len());
        assert_eq!(va, vb);
        assert_eq!(va.as_slice(), &[40.0, 80.0, 1.0, 1.0, 2.0, 0.0, 1.0]);
    }

    /// Training regions {Ariana, Bizerte}; a Gabès request is not an error
    #[test]
    fn test_unknown_region_encodes_all_zero() {
        let schema = ariana_bizerte();
        let raw = raw_input("Non", "Gabès");

        let first = encode(&raw, &schema).unwrap();
        let second = encode(&raw, &schema).unwrap();

        assert_eq!(first.get_by_name(&schema, "region_Ariana"), Some(0.0));
        assert_eq!(first.get_by_name(&schema, "region_Bizerte"), Some(0.0));
        assert_eq!(first.len(), schema.len());
        assert_eq!(first, second);
    }

    #[test]
    fn test_known_region_sets_exactly_one_flag() {
        let schema = ariana_bizerte();
        let vector = encode(&raw_input("Non", "  Ariana "), &schema).unwrap();

        let flags: Vec<f64> = vector.as_slice()[BASE_COLUMNS.len()..].to_vec();
        assert_eq!(flags, vec![1.0, 0.0]);
    }

    #[test]
    fn test_unknown_region_uses_explicit_other_column() {
        let schema = FeatureSchema::from_regions(["Ariana", "Autre"]);
        let vector = encode(&raw_input("Non", "Sfax"), &schema).unwrap();

        assert_eq!(vector.get_by_name(&schema, "region_Ariana"), Some(0.0));
        assert_eq!(vector.get_by_name(&schema, "region_Autre"), Some(1.0));
    }

    #[test]
    fn test_categorical_codes() {
        let schema = ariana_bizerte();

        let non = encode(&raw_input("Non", "Ariana"), &schema).unwrap();
        let oui = encode(&raw_input("oui", "Ariana"), &schema).unwrap();

        assert_eq!(non.get_by_name(&schema, "smoker"), Some(0.0));
        assert_eq!(oui.get_by_name(&schema, "smoker"), Some(1.0));
        assert_eq!(non.get_by_name(&schema, "sex"), Some(0.0));
    }

    /// Cardinality differences produce different layouts, never shifted columns
    #[test]
    fn test_schema_cardinality_change_is_detectable() {
        let two = FeatureSchema::from_regions(["Ariana", "Bizerte"]);
        let three = FeatureSchema::from_regions(["Ariana", "Bizerte", "Gabès"]);

        let vector = encode(&raw_input("Non", "Bizerte"), &two).unwrap();
        assert!(vector.validate(&two).is_ok());
        assert!(vector.validate(&three).is_err());

        let wide = encode(&raw_input("Non", "Bizerte"), &three).unwrap();
        assert_eq!(wide.get_by_name(&three, "region_Bizerte"), Some(1.0));
        assert_eq!(wide.len(), vector.len() + 1);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let schema = ariana_bizerte();

        let mut young = raw_input("Non", "Ariana");
        young.age = 17.0;
        let err = encode(&young, &schema).unwrap_err();
        assert_eq!(err.field(), "age");
        assert!(matches!(err, ValidationError::OutOfRange { .. }));

        let mut heavy = raw_input("Non", "Ariana");
        heavy.weight = 250.0;
        assert_eq!(encode(&heavy, &schema).unwrap_err().field(), "weight");

        let mut many = raw_input("Non", "Ariana");
        many.number_of_children = 11;
        assert_eq!(encode(&many, &schema).unwrap_err().field(), "number_of_children");

        let mut negative = raw_input("Non", "Ariana");
        negative.number_of_children = -1;
        assert_eq!(encode(&negative, &schema).unwrap_err().field(), "number_of_children");
    }

    #[test]
    fn test_non_finite_rejected() {
        let schema = ariana_bizerte();
        let mut raw = raw_input("Non", "Ariana");
        raw.weight = f64::NAN;

        assert_eq!(
            encode(&raw, &schema),
            Err(ValidationError::NotFinite { field: "weight" })
        );
    }

    #[test]
    fn test_unknown_category_rejected() {
        let schema = ariana_bizerte();

        let mut raw = raw_input("Non", "Ariana");
        raw.sex = "Autre".to_string();
        let err = encode(&raw, &schema).unwrap_err();
        assert_eq!(err.field(), "sex");

        let raw = raw_input("Parfois", "Ariana");
        let err = encode(&raw, &schema).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::UnknownCategory { field: "smoking_status", .. }
        ));
    }

    #[test]
    fn test_encode_record_marks_missing_as_nan() {
        let schema = ariana_bizerte();
        let record = Record {
            age: Some(40.0),
            weight: None,
            sex: Some(Sex::Female),
            smoking_status: None,
            region: None,
            children: Some(1.0),
            premium: Some(900.0),
            ..Default::default()
        };

        let vector = encode_record(&record, &schema);
        assert_eq!(vector.len(), schema.len());
        assert!(vector.get_by_name(&schema, "weight").unwrap().is_nan());
        assert!(vector.get_by_name(&schema, "smoker").unwrap().is_nan());
        assert_eq!(vector.get_by_name(&schema, "sex"), Some(1.0));
        assert_eq!(vector.get_by_name(&schema, "region_Ariana"), Some(0.0));
        assert_eq!(vector.get_by_name(&schema, "region_Bizerte"), Some(0.0));
    }

    #[test]
    fn test_training_and_inference_rows_agree() {
        let dataset: Dataset = synthetic_dataset(6, &["Ariana", "Bizerte"]);
        let schema = FeatureSchema::build(&dataset).unwrap();
        let record = &dataset.records()[0];

        let raw = RawInput {
            age: record.age.unwrap(),
            weight: record.weight.unwrap(),
            sex: "Homme".to_string(),
            smoking_status: "Oui".to_string(),
            region: record.region.clone().unwrap(),
            number_of_children: record.children.unwrap() as i64,
        };

        assert_eq!(encode(&raw, &schema).unwrap(), encode_record(record, &schema));
    }
}
