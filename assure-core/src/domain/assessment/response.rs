// assure-core/src/domain/assessment/response.rs

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

/// AI verdict for a single question. `None` on the record means "absent".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Satisfactory,
    Unsatisfactory,
    Requirement,
    NotApplicable,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Satisfactory => "satisfactory",
            Self::Unsatisfactory => "unsatisfactory",
            Self::Requirement => "requirement",
            Self::NotApplicable => "not_applicable",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Verdict {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "satisfactory" => Ok(Self::Satisfactory),
            "unsatisfactory" => Ok(Self::Unsatisfactory),
            "requirement" => Ok(Self::Requirement),
            "not_applicable" => Ok(Self::NotApplicable),
            _ => Err(DomainError::UnknownVocabulary {
                kind: "verdict",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceLevel {
    Compliant,
    PartiallyCompliant,
    NonCompliant,
}

impl ComplianceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compliant => "compliant",
            Self::PartiallyCompliant => "partially_compliant",
            Self::NonCompliant => "non_compliant",
        }
    }

    /// Points awarded by the weighted score.
    pub fn points(&self) -> f64 {
        match self {
            Self::Compliant => 1.0,
            Self::PartiallyCompliant => 0.5,
            Self::NonCompliant => 0.0,
        }
    }
}

impl fmt::Display for ComplianceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ComplianceLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compliant" => Ok(Self::Compliant),
            "partially_compliant" => Ok(Self::PartiallyCompliant),
            "non_compliant" => Ok(Self::NonCompliant),
            _ => Err(DomainError::UnknownVocabulary {
                kind: "compliance_level",
                value: s.to_string(),
            }),
        }
    }
}

/// Canonical per-question result. AI-origin fields (`verdict`, `compliance_level`,
/// free text) are never rewritten client-side; only the consultant fields move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResponse {
    pub id: String,
    pub assessment_id: String,
    pub question_id: String,

    #[serde(
        default,
        deserialize_with = "lenient_vocabulary",
        skip_serializing_if = "Option::is_none"
    )]
    pub verdict: Option<Verdict>,

    #[serde(
        default,
        deserialize_with = "lenient_vocabulary",
        skip_serializing_if = "Option::is_none"
    )]
    pub compliance_level: Option<ComplianceLevel>,

    #[serde(default = "default_relevant", deserialize_with = "relevance_flag")]
    pub is_relevant: bool,

    /// `Some(true)` accepted, `Some(false)` rejected, `None` pending.
    #[serde(default)]
    pub consultant_accepted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consultant_notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_reference: Option<String>,
}

impl AssessmentResponse {
    /// Bare record with only identity set; handy for building fixtures.
    pub fn new(
        id: impl Into<String>,
        assessment_id: impl Into<String>,
        question_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            assessment_id: assessment_id.into(),
            question_id: question_id.into(),
            verdict: None,
            compliance_level: None,
            is_relevant: true,
            consultant_accepted: None,
            consultant_notes: None,
            comment: None,
            recommendation: None,
            evidence_reference: None,
        }
    }

    pub fn with_verdict(mut self, verdict: Verdict) -> Self {
        self.verdict = Some(verdict);
        self
    }

    pub fn with_level(mut self, level: ComplianceLevel) -> Self {
        self.compliance_level = Some(level);
        self
    }

    pub fn irrelevant(mut self) -> Self {
        self.is_relevant = false;
        self
    }
}

/// Question context the report endpoint attaches to each response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct QuestionContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseWithContext {
    #[serde(flatten)]
    pub response: AssessmentResponse,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionContext>,
}

/// Full report for one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AssessmentReport {
    #[serde(default)]
    pub responses: Vec<ResponseWithContext>,
    /// Question-set size when the backend reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_questions: Option<u32>,
}

impl AssessmentReport {
    pub fn into_responses(self) -> Vec<AssessmentResponse> {
        self.responses.into_iter().map(|r| r.response).collect()
    }

    pub fn responses(&self) -> impl Iterator<Item = &AssessmentResponse> {
        self.responses.iter().map(|r| &r.response)
    }
}

fn default_relevant() -> bool {
    true
}

// Explicit `null` is treated like a missing field.
fn relevance_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

// Unknown wire values degrade to "absent" instead of failing the whole report.
fn lenient_vocabulary<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = DomainError>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!("{}; treating as absent", e);
            None
        }
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_vocabulary_round_trip() -> Result<()> {
        for v in [
            Verdict::Satisfactory,
            Verdict::Unsatisfactory,
            Verdict::Requirement,
            Verdict::NotApplicable,
        ] {
            assert_eq!(v.to_string().parse::<Verdict>()?, v);
            let wire = serde_json::to_string(&v)?;
            assert_eq!(wire, format!("\"{}\"", v.as_str()));
        }
        for l in [
            ComplianceLevel::Compliant,
            ComplianceLevel::PartiallyCompliant,
            ComplianceLevel::NonCompliant,
        ] {
            assert_eq!(l.to_string().parse::<ComplianceLevel>()?, l);
        }
        Ok(())
    }

    #[test]
    fn test_missing_fields_default() -> Result<()> {
        let raw = r#"{ "id": "r1", "assessment_id": "a1", "question_id": "q1" }"#;
        let resp: AssessmentResponse = serde_json::from_str(raw)?;
        assert!(resp.is_relevant);
        assert_eq!(resp.verdict, None);
        assert_eq!(resp.compliance_level, None);
        assert_eq!(resp.consultant_accepted, None);
        Ok(())
    }

    #[test]
    fn test_unknown_and_null_values_are_absent() -> Result<()> {
        let raw = r#"{
            "id": "r1", "assessment_id": "a1", "question_id": "q1",
            "verdict": "maybe", "compliance_level": null, "is_relevant": null,
            "consultant_accepted": false
        }"#;
        let resp: AssessmentResponse = serde_json::from_str(raw)?;
        assert_eq!(resp.verdict, None);
        assert_eq!(resp.compliance_level, None);
        assert!(resp.is_relevant);
        assert_eq!(resp.consultant_accepted, Some(false));
        Ok(())
    }

    #[test]
    fn test_report_flattens_question_context() -> Result<()> {
        let raw = r#"{
            "responses": [{
                "id": "r1", "assessment_id": "a1", "question_id": "q1",
                "verdict": "satisfactory", "compliance_level": "partially_compliant",
                "question": { "number": "1.2", "text": "Fire doors inspected?" }
            }],
            "total_questions": 42
        }"#;
        let report: AssessmentReport = serde_json::from_str(raw)?;
        assert_eq!(report.total_questions, Some(42));
        let ctx = report.responses[0].question.clone().unwrap();
        assert_eq!(ctx.number.as_deref(), Some("1.2"));
        let responses = report.into_responses();
        assert_eq!(responses[0].verdict, Some(Verdict::Satisfactory));
        assert_eq!(
            responses[0].compliance_level,
            Some(ComplianceLevel::PartiallyCompliant)
        );
        Ok(())
    }
}
