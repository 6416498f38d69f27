//! Shared test fixtures

use crate::logic::dataset::{Dataset, Record, Sex, SmokingStatus};
use crate::logic::features::RawInput;

/// Exact linear premium used by the synthetic dataset
pub fn synthetic_premium(
    age: f64,
    weight: f64,
    sex: Sex,
    smoking: SmokingStatus,
    children: f64,
    region_index: usize,
) -> f64 {
    200.0
        + 12.0 * age
        + 3.0 * weight
        + 40.0 * sex.code()
        + 350.0 * smoking.code()
        + 25.0 * children
        + 60.0 * region_index as f64
}

/// Noise-free records whose premium is exactly `synthetic_premium`
pub fn synthetic_records(n: usize, regions: &[&str]) -> Vec<Record> {
    (0..n)
        .map(|i| {
            let age = 18.0 + ((i * 7) % 60) as f64;
            let weight = 50.0 + ((i * 13) % 70) as f64;
            let sex = if i % 2 == 0 { Sex::Male } else { Sex::Female };
            let smoking = if i % 3 == 0 {
                SmokingStatus::Smoker
            } else {
                SmokingStatus::NonSmoker
            };
            let children = ((i / 2) % 4) as f64;
            let region_index = (i / 3) % regions.len();

            Record {
                first_name: Some(format!("Prenom{}", i)),
                last_name: Some(format!("Nom{}", i)),
                age: Some(age),
                weight: Some(weight),
                sex: Some(sex),
                smoking_status: Some(smoking),
                region: Some(regions[region_index].to_string()),
                children: Some(children),
                premium: Some(synthetic_premium(age, weight, sex, smoking, children, region_index)),
            }
        })
        .collect()
}

pub fn synthetic_dataset(n: usize, regions: &[&str]) -> Dataset {
    Dataset::new(synthetic_records(n, regions))
}

pub fn raw_input(smoking_status: &str, region: &str) -> RawInput {
    RawInput {
        age: 30.0,
        weight: 70.0,
        sex: "Homme".to_string(),
        smoking_status: smoking_status.to_string(),
        region: region.to_string(),
        number_of_children: 0,
    }
}

/// Same shape as the production export, French headers included
pub const SAMPLE_CSV: &str = "\
Nom,Prenom,Age,Poids,Sexe,Statut de fumeur,Region,Nombre d’enfants,Prime d’assurance
Ben Ali,Amira,34,62.5,Femme,Non,Ariana,1,1210.5
Trabelsi,Karim,51,88,Homme,Oui,Bizerte,3,2890
Jaziri,Salma,,70,Femme,Non,Gabès,0,1105
Mansour,Youssef,45,,Homme,Non,Ariana,2,
Haddad,Leila,29,58,Inconnu,Oui,Ettadhamen,0,1670.25
";
