//! Built-in checklist variants
//!
//! Each variant is only a table; the engine is shared.

use crate::definition::{ChecklistDefinition, Slot};
use crate::error::ConfigError;

/// Ids of all built-in variants, in listing order
pub const BUILTIN_IDS: &[&str] = &[
    PHYSICIAN,
    FULL_CYCLE,
    NUCLEAR_CARDIOLOGY,
    PARKING_DOCUMENTS,
    PARKING_AGREEMENT,
];

/// Physician onboarding documents
pub const PHYSICIAN: &str = "physician";
/// Complete onboarding cycle
pub const FULL_CYCLE: &str = "full-cycle";
/// Nuclear cardiology credentials
pub const NUCLEAR_CARDIOLOGY: &str = "nuclear-cardiology";
/// Parking paperwork with optional tax and deposit forms
pub const PARKING_DOCUMENTS: &str = "parking-documents";
/// Signed parking agreement letter, only for records that need one
pub const PARKING_AGREEMENT: &str = "parking-agreement";

/// Look up a built-in variant
///
/// # Errors
/// `ConfigError::UnknownVariant` for ids not in [`BUILTIN_IDS`]
pub fn builtin(id: &str) -> Result<ChecklistDefinition, ConfigError> {
    match id {
        PHYSICIAN => Ok(physician()),
        FULL_CYCLE => Ok(full_cycle()),
        NUCLEAR_CARDIOLOGY => Ok(nuclear_cardiology()),
        PARKING_DOCUMENTS => Ok(parking_documents()),
        PARKING_AGREEMENT => Ok(parking_agreement()),
        other => Err(ConfigError::UnknownVariant(other.to_string())),
    }
}

/// All built-in variants
#[must_use]
pub fn all_builtin() -> Vec<ChecklistDefinition> {
    vec![
        physician(),
        full_cycle(),
        nuclear_cardiology(),
        parking_documents(),
        parking_agreement(),
    ]
}

/// Four equally weighted physician documents
#[must_use]
pub fn physician() -> ChecklistDefinition {
    ChecklistDefinition::new(
        PHYSICIAN,
        "Physician checklist",
        vec![
            Slot::new("crmLicense", "CRM License", 25),
            Slot::new("physicianAvailability", "Physician Availability", 25),
            Slot::new("physicianCv", "Physician Cv", 25),
            Slot::new("spectEhr", "SPECT EHR Export", 25),
        ],
    )
}

/// Sixteen-slot full onboarding cycle
#[must_use]
pub fn full_cycle() -> ChecklistDefinition {
    ChecklistDefinition::new(
        FULL_CYCLE,
        "Full-cycle checklist",
        vec![
            Slot::new("medicalSupervision", "Medical Supervision", 7).single_version(),
            Slot::new("mou", "Parking Acknowledgement (PA)", 7).single_version(),
            Slot::new("CMS855b", "CMS 855b form", 7),
            Slot::new("ACLS", "ACLS", 7),
            Slot::new("medicalLicense", "Medical License", 6),
            Slot::new("boardCertifications", "Board Certifications", 6),
            Slot::new("codeOfConduct", "ABIM Screenshot", 6),
            Slot::new(
                "nuclearCardiology",
                "Certification Board of Nuclear Cardiology",
                6,
            ),
            Slot::new(
                "radioactiveMaterial",
                "Current Radioactive Materials License",
                6,
            ),
            Slot::new("W9", "W9", 6).single_version(),
            Slot::new("parkingDrawing", "Parking Drawing", 6).single_version(),
            Slot::new(
                "vettingReport",
                "Vetting Report Completed and Approval to Interpret",
                6,
            ),
            Slot::new("dueDiligence", "Due diligence", 6),
            Slot::new("parkingVerification", "Parking Verification Form", 6).single_version(),
            Slot::new("ddf", "Direct Deposit Form (ACH)", 6).single_version(),
            Slot::new("oig", "OIG Checklist", 6),
        ],
    )
}

/// Three nuclear cardiology credentials
///
/// Weights are kept as the checklist owner authored them (sum 18), so strict
/// validation rejects this table.
// TODO: replace weights once the checklist owner supplies a table summing to 100
#[must_use]
pub fn nuclear_cardiology() -> ChecklistDefinition {
    ChecklistDefinition::new(
        NUCLEAR_CARDIOLOGY,
        "Nuclear cardiology checklist",
        vec![
            Slot::new(
                "nuclearCardiology",
                "Certification Board of Nuclear Cardiology",
                6,
            ),
            Slot::new(
                "radioactiveMaterial",
                "Current Radioactive Materials License",
                6,
            ),
            Slot::new(
                "vettingReport",
                "Vetting Report Completed and Approval to Interpret",
                6,
            ),
        ],
    )
}

/// Parking agreement with optional W9 and ACH forms
#[must_use]
pub fn parking_documents() -> ChecklistDefinition {
    ChecklistDefinition::new(
        PARKING_DOCUMENTS,
        "Parking documents checklist",
        vec![
            Slot::new("ParkingAgreement", "Parking Agreement", 33),
            Slot::new("W92", "W92 optional", 33),
            Slot::new("ACH2", "ACH optional", 34),
        ],
    )
}

/// Single parking agreement letter, gated on the record
#[must_use]
pub fn parking_agreement() -> ChecklistDefinition {
    ChecklistDefinition::new(
        PARKING_AGREEMENT,
        "Parking agreement checklist",
        vec![Slot::new("parkingAgreement", "Parking Agreement Letter", 100)],
    )
    .gated()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{DefinitionValidator, WeightPolicy};

    #[test]
    fn builtin_lookup_matches_listing() {
        for id in BUILTIN_IDS {
            assert_eq!(builtin(id).unwrap().id, *id);
        }
        assert_eq!(all_builtin().len(), BUILTIN_IDS.len());
        assert!(matches!(
            builtin("nope"),
            Err(ConfigError::UnknownVariant(_))
        ));
    }

    #[test]
    fn well_formed_variants_pass_strict_validation() {
        let validator = DefinitionValidator::new(WeightPolicy::Strict);
        for def in [
            physician(),
            full_cycle(),
            parking_documents(),
            parking_agreement(),
        ] {
            let id = def.id.clone();
            assert!(validator.validate(def).is_ok(), "{id} should validate");
        }
    }

    #[test]
    fn nuclear_cardiology_weights_are_surfaced() {
        let err = DefinitionValidator::new(WeightPolicy::Strict)
            .validate(nuclear_cardiology())
            .unwrap_err();
        assert!(matches!(err, ConfigError::WeightSumMismatch { sum: 18, .. }));

        assert!(DefinitionValidator::new(WeightPolicy::Lenient)
            .validate(nuclear_cardiology())
            .is_ok());
    }

    #[test]
    fn full_cycle_single_version_slots() {
        let def = full_cycle();
        let single: Vec<_> = def
            .slots
            .iter()
            .filter(|s| s.single_version)
            .map(|s| s.key.as_str())
            .collect();
        assert_eq!(
            single,
            vec!["medicalSupervision", "mou", "W9", "parkingDrawing", "parkingVerification", "ddf"]
        );
        assert_eq!(def.weight_sum(), 100);
    }
}
