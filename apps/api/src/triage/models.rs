//! Request and response shapes for the triage API.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::AppError;

/// Longest feeling statement accepted, counted in characters.
pub const MAX_FEELING_CHARS: usize = 1000;
pub const MAX_MOOD: i64 = 10;

/// Answer to "any thoughts of self-harm?".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SuicidalFlag {
    #[default]
    No,
    Unsure,
    Yes,
}

/// Whether someone is physically nearby right now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SupportStatus {
    Alone,
    WithSomeone,
    #[default]
    PreferNotSay,
}

impl SupportStatus {
    /// Phrase substituted for `{supportStatus}` in prompt templates.
    ///
    /// `PreferNotSay` is rendered the same as `WithSomeone`.
    pub fn as_phrase(self) -> &'static str {
        match self {
            SupportStatus::Alone => "đang ở một mình",
            SupportStatus::WithSomeone | SupportStatus::PreferNotSay => "có người bên cạnh",
        }
    }
}

/// One submission of the triage form. Never persisted.
///
/// Everything except the JSON syntax itself is checked by the responder, so a
/// malformed mood or support value can never stand in the way of the crisis
/// check.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageInput {
    #[serde(default)]
    pub feeling: Option<String>,
    #[serde(default, deserialize_with = "or_default")]
    pub suicidal: SuicidalFlag,
    #[serde(default, deserialize_with = "or_default")]
    pub support_nearby: SupportStatus,
    #[serde(default)]
    pub mood: Option<Value>,
}

impl TriageInput {
    pub fn feeling(&self) -> &str {
        self.feeling.as_deref().unwrap_or("")
    }

    /// Rejects a missing or blank feeling statement.
    pub fn require_feeling(&self) -> Result<(), AppError> {
        if self.feeling().trim().is_empty() {
            return Err(AppError::Validation(
                "Vui lòng nhập cảm giác của bạn".to_string(),
            ));
        }
        Ok(())
    }

    /// Rejects a feeling statement longer than the form allows.
    pub fn validate_feeling_length(&self) -> Result<(), AppError> {
        if self.feeling().chars().count() > MAX_FEELING_CHARS {
            return Err(AppError::Validation(format!(
                "feeling must be at most {MAX_FEELING_CHARS} characters"
            )));
        }
        Ok(())
    }

    /// Returns the mood score once it is known to be a whole number in 0..=10.
    pub fn validated_mood(&self) -> Result<u8, AppError> {
        let Some(raw) = &self.mood else {
            return Err(AppError::Validation("mood is required".to_string()));
        };
        match raw.as_f64() {
            Some(mood) if mood.fract() == 0.0 && (0.0..=MAX_MOOD as f64).contains(&mood) => {
                Ok(mood as u8)
            }
            _ => Err(AppError::Validation(format!(
                "mood must be a whole number between 0 and {MAX_MOOD}, got {raw}"
            ))),
        }
    }
}

// Unknown or mistyped values fall back to the field's default: `no` for the
// suicidal flag, `preferNotSay` for support.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).unwrap_or_default())
}

/// Locally detected topic of a feeling statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueCategory {
    Stress,
    Sadness,
    Anxiety,
    Burnout,
    General,
}

impl IssueCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueCategory::Stress => "stress",
            IssueCategory::Sadness => "sadness",
            IssueCategory::Anxiety => "anxiety",
            IssueCategory::Burnout => "burnout",
            IssueCategory::General => "general",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Sad,
    Stressed,
    Anxious,
    Lost,
    Hopeful,
}

impl Emotion {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "sad" => Some(Emotion::Sad),
            "stressed" => Some(Emotion::Stressed),
            "anxious" => Some(Emotion::Anxious),
            "lost" => Some(Emotion::Lost),
            "hopeful" => Some(Emotion::Hopeful),
            _ => None,
        }
    }
}

/// Human-readable bucket for a 0-10 mood score, as shown next to the slider.
pub fn mood_label(mood: u8) -> &'static str {
    match mood {
        0..=2 => "Rất khó khăn",
        3..=4 => "Khó khăn",
        5..=6 => "Ổn",
        7..=8 => "Tốt",
        _ => "Rất tốt",
    }
}

/// A hotline rendered on the crisis panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmergencyContact {
    pub label: &'static str,
    pub number: &'static str,
}

pub const EMERGENCY_CONTACTS: &[EmergencyContact] = &[
    EmergencyContact {
        label: "Cấp cứu",
        number: "115",
    },
    EmergencyContact {
        label: "Cảnh sát",
        number: "113",
    },
    EmergencyContact {
        label: "The Leaf",
        number: "18006003",
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrisisNotice {
    pub message: String,
    pub contacts: Vec<EmergencyContact>,
}

/// Supportive content for a non-crisis submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Guidance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion: Option<Emotion>,
    pub empathy: String,
    pub advice: String,
    pub actions: Vec<String>,
    pub quote: String,
    pub detected_issue: String,
    pub mood_label: String,
}

/// The body returned by `POST /api/analyze`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TriageResult {
    Crisis(CrisisNotice),
    Normal(Guidance),
}

/// The JSON object the completion model is asked to produce.
///
/// `type` and `detectedIssue` may be present but are ignored: both are
/// decided locally.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelReply {
    #[serde(default, deserialize_with = "lenient_emotion")]
    pub emotion: Option<Emotion>,
    pub empathy: String,
    pub advice: String,
    pub actions: Vec<String>,
    pub quote: String,
}

// Labels outside the closed set (e.g. "confused") become None instead of
// failing the whole reply.
fn lenient_emotion<'de, D>(deserializer: D) -> Result<Option<Emotion>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Emotion::from_label))
}
