//! Doctor specialization vocabulary.

use serde::{Deserialize, Serialize};

/// Medical specialty of a doctor. Serialized as its display string so the
/// stored value is what a clinician reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Specialization {
    #[serde(rename = "General Practice/Family Medicine")]
    GeneralPractice,
    #[serde(rename = "Internal Medicine")]
    InternalMedicine,
    #[serde(rename = "Cardiology")]
    Cardiology,
    #[serde(rename = "Dermatology")]
    Dermatology,
    #[serde(rename = "Endocrinology")]
    Endocrinology,
    #[serde(rename = "Gastroenterology")]
    Gastroenterology,
    #[serde(rename = "Neurology")]
    Neurology,
    #[serde(rename = "Obstetrics & Gynecology")]
    ObstetricsGynecology,
    #[serde(rename = "Oncology")]
    Oncology,
    #[serde(rename = "Orthopedics")]
    Orthopedics,
    #[serde(rename = "Pediatrics")]
    Pediatrics,
    #[serde(rename = "Psychiatry")]
    Psychiatry,
    #[serde(rename = "Radiology")]
    Radiology,
    #[serde(rename = "Urology")]
    Urology,
}

pub const ALL_SPECIALIZATIONS: &[Specialization] = &[
    Specialization::GeneralPractice,
    Specialization::InternalMedicine,
    Specialization::Cardiology,
    Specialization::Dermatology,
    Specialization::Endocrinology,
    Specialization::Gastroenterology,
    Specialization::Neurology,
    Specialization::ObstetricsGynecology,
    Specialization::Oncology,
    Specialization::Orthopedics,
    Specialization::Pediatrics,
    Specialization::Psychiatry,
    Specialization::Radiology,
    Specialization::Urology,
];

impl Specialization {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GeneralPractice => "General Practice/Family Medicine",
            Self::InternalMedicine => "Internal Medicine",
            Self::Cardiology => "Cardiology",
            Self::Dermatology => "Dermatology",
            Self::Endocrinology => "Endocrinology",
            Self::Gastroenterology => "Gastroenterology",
            Self::Neurology => "Neurology",
            Self::ObstetricsGynecology => "Obstetrics & Gynecology",
            Self::Oncology => "Oncology",
            Self::Orthopedics => "Orthopedics",
            Self::Pediatrics => "Pediatrics",
            Self::Psychiatry => "Psychiatry",
            Self::Radiology => "Radiology",
            Self::Urology => "Urology",
        }
    }
}

/// Validate a stored specialization string.
pub fn validate_specialization(raw: &str) -> Result<Specialization, String> {
    ALL_SPECIALIZATIONS
        .iter()
        .copied()
        .find(|s| s.as_str() == raw)
        .ok_or_else(|| format!("Invalid specialization '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fourteen_specializations() {
        assert_eq!(ALL_SPECIALIZATIONS.len(), 14);
    }

    #[test]
    fn display_strings_validate() {
        assert_eq!(
            validate_specialization("Obstetrics & Gynecology"),
            Ok(Specialization::ObstetricsGynecology)
        );
        assert!(validate_specialization("Neurosurgery").is_err());
    }

    #[test]
    fn serializes_as_display_string() {
        let json = serde_json::to_string(&Specialization::GeneralPractice).unwrap();
        assert_eq!(json, "\"General Practice/Family Medicine\"");
    }
}
