//! Declared-vs-observed consistency scoring.
//!
//! Compares a vessel's declared type, size and observed speed against the
//! types inferred by independent sensors and fixed plausibility envelopes.
//! The scorer is total: missing static info or empty detection lists simply
//! produce fewer issues, never an error.

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::{AnalyzedVessel, ExternalDetection, Mmsi, Severity};

/// Consistency issue categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    TypeMismatch,
    SizeImplausible,
    SpeedOutOfRange,
    InferredConflict,
}

/// One graded consistency finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyIssue {
    pub code: IssueCode,
    pub severity: Severity,
    pub message: String,
    pub context: serde_json::Value,
}

/// Overall report grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportSummary {
    Ok,
    Warn,
    Alert,
}

/// Cross-source consistency report for one vessel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub mmsi: Mmsi,
    pub issues: Vec<ConsistencyIssue>,
    /// The single normalized type inferred across detections, when exactly
    /// one distinct value was seen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inferred_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<String>,
    pub summary: ReportSummary,
}

/// Synonym table mapping raw type tokens to canonical categories.
/// Process-lifetime, immutable after initialization.
static TYPE_SYNONYMS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("tanker", "TANKER"),
        ("crude", "TANKER"),
        ("bulk", "BULK"),
        ("bulker", "BULK"),
        ("cargo", "CARGO"),
        ("container", "CONTAINER"),
        ("fishing", "FISHING"),
        ("fish", "FISHING"),
        ("research", "RESEARCH"),
        ("supply", "SUPPORT"),
        ("support", "SUPPORT"),
        ("icebreaker", "ICEBREAKER"),
        ("passenger", "PASSENGER"),
        ("ferry", "PASSENGER"),
    ])
});

/// Expected overall length range per canonical type, in meters.
struct SizeExpectation {
    min_length_m: f64,
    max_length_m: f64,
}

static TYPE_SIZE_EXPECTATIONS: Lazy<HashMap<&'static str, SizeExpectation>> = Lazy::new(|| {
    let range = |min_length_m, max_length_m| SizeExpectation {
        min_length_m,
        max_length_m,
    };
    HashMap::from([
        ("TANKER", range(60.0, 400.0)),
        ("BULK", range(60.0, 330.0)),
        ("CARGO", range(50.0, 350.0)),
        ("CONTAINER", range(100.0, 400.0)),
        ("FISHING", range(8.0, 90.0)),
        ("RESEARCH", range(20.0, 150.0)),
        ("SUPPORT", range(15.0, 120.0)),
        ("ICEBREAKER", range(50.0, 180.0)),
        ("PASSENGER", range(30.0, 360.0)),
    ])
});

/// Typical maximum sustained speed per canonical type, in knots.
static TYPE_SPEED_EXPECTATIONS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([
        ("TANKER", 22.0),
        ("BULK", 22.0),
        ("CARGO", 26.0),
        ("CONTAINER", 30.0),
        ("FISHING", 18.0),
        ("RESEARCH", 20.0),
        ("SUPPORT", 24.0),
        ("ICEBREAKER", 24.0),
        ("PASSENGER", 34.0),
    ])
});

/// Observed speeds may exceed the typical envelope by this factor before an
/// issue is raised.
const SPEED_TOLERANCE_FACTOR: f64 = 1.15;

/// Normalize a raw type token to its canonical category.
///
/// Lower-cases, strips non-alphabetic characters, then resolves through the
/// synonym table. Unrecognized tokens are upper-cased verbatim.
pub fn normalize_type(raw: &str) -> String {
    let key: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect();
    match TYPE_SYNONYMS.get(key.as_str()) {
        Some(canonical) => (*canonical).to_string(),
        None => raw.to_uppercase(),
    }
}

/// Build the consistency report for one analyzed vessel against the sensor
/// detections attributed to it.
pub fn build_consistency_report(
    vessel: &AnalyzedVessel,
    detections: &[ExternalDetection],
) -> ConsistencyReport {
    let mut issues = Vec::new();

    let declared_type = vessel
        .static_info
        .as_ref()
        .and_then(|info| info.ship_type.as_deref())
        .map(normalize_type);

    let inferred_candidates: BTreeSet<String> = detections
        .iter()
        .filter_map(|d| d.inferred_type.as_deref())
        .map(normalize_type)
        .collect();
    let inferred_type = if inferred_candidates.len() == 1 {
        inferred_candidates.iter().next().cloned()
    } else {
        None
    };

    if let (Some(declared), Some(inferred)) = (&declared_type, &inferred_type) {
        if declared != inferred {
            issues.push(ConsistencyIssue {
                code: IssueCode::TypeMismatch,
                severity: Severity::Medium,
                message: format!(
                    "Declared type {} differs from inferred {}",
                    declared, inferred
                ),
                context: json!({
                    "declared_type": declared,
                    "inferred_type": inferred,
                }),
            });
        }
    }

    if let (Some(declared), Some(info)) = (&declared_type, &vessel.static_info) {
        if let (Some(expectation), Some(length)) =
            (TYPE_SIZE_EXPECTATIONS.get(declared.as_str()), info.length_m)
        {
            if length < expectation.min_length_m || length > expectation.max_length_m {
                issues.push(ConsistencyIssue {
                    code: IssueCode::SizeImplausible,
                    severity: Severity::Medium,
                    message: format!(
                        "Length {}m unusual for {} (expected {}-{}m)",
                        length, declared, expectation.min_length_m, expectation.max_length_m
                    ),
                    context: json!({
                        "length_m": length,
                        "declared_type": declared,
                    }),
                });
            }
        }
    }

    if let Some(declared) = &declared_type {
        if let Some(max_expected) = TYPE_SPEED_EXPECTATIONS.get(declared.as_str()) {
            if vessel.metrics.max_speed_knots > max_expected * SPEED_TOLERANCE_FACTOR {
                issues.push(ConsistencyIssue {
                    code: IssueCode::SpeedOutOfRange,
                    severity: Severity::High,
                    message: format!(
                        "Observed max speed {} kn exceeds typical {} capability ({} kn)",
                        vessel.metrics.max_speed_knots, declared, max_expected
                    ),
                    context: json!({
                        "max_speed_knots": vessel.metrics.max_speed_knots,
                        "max_expected_knots": max_expected,
                    }),
                });
            }
        }
    }

    if inferred_candidates.len() > 1 {
        let listed: Vec<&str> = inferred_candidates.iter().map(String::as_str).collect();
        issues.push(ConsistencyIssue {
            code: IssueCode::InferredConflict,
            severity: Severity::Low,
            message: format!("Multiple inferred types: {}", listed.join(", ")),
            context: json!({ "inferred_types": listed }),
        });
    }

    let summary = derive_summary(&issues);

    ConsistencyReport {
        mmsi: vessel.mmsi.clone(),
        issues,
        inferred_type,
        declared_type,
        summary,
    }
}

/// ALERT iff any issue is high severity, else WARN iff any issue exists,
/// else OK.
fn derive_summary(issues: &[ConsistencyIssue]) -> ReportSummary {
    if issues.iter().any(|i| i.severity == Severity::High) {
        ReportSummary::Alert
    } else if !issues.is_empty() {
        ReportSummary::Warn
    } else {
        ReportSummary::Ok
    }
}
