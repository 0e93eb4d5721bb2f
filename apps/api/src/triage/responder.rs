//! Responder — turns one triage submission into a structured result.
//!
//! Flow: validate → crisis short-circuit → detect issue → fill template →
//!       one completion call → strip fences → parse reply (or fall back) →
//!       stamp the locally detected issue.
//!
//! The crisis check runs before any network I/O, so no upstream failure can
//! suppress a crisis response.

use tracing::{debug, error, info, warn};

use crate::errors::AppError;
use crate::llm_client::{strip_code_fences, CompletionService, LlmError};
use crate::triage::classifier::{detect_issue, is_crisis};
use crate::triage::models::{
    mood_label, CrisisNotice, Emotion, Guidance, IssueCategory, ModelReply, SuicidalFlag,
    TriageInput, TriageResult, EMERGENCY_CONTACTS,
};
use crate::triage::prompts::{template_key_for, PromptTemplates, ANALYZE_SYSTEM};

pub const CRISIS_MESSAGE: &str = "Mình rất lo cho an toàn của bạn. Nếu bạn đang gặp nguy hiểm, \
    hãy gọi 115 (cấp cứu) hoặc 113 (cảnh sát).";

/// Issue label used when no locally detected issue applies.
pub const GENERAL_SUPPORT_LABEL: &str = "Hỗ trợ tổng quát";

/// How much of unparseable model text is shown as empathy, in characters.
const EMPATHY_PREVIEW_CHARS: usize = 300;

const CONTENT_FALLBACK_ADVICE: &str = "Mình nghĩ bạn nên nghỉ ngơi một chút và chăm sóc bản thân.";
const CONTENT_FALLBACK_ACTIONS: [&str; 3] = ["Hít thở sâu", "Uống nước", "Gọi cho người thân"];
const CONTENT_FALLBACK_QUOTE: &str = "Mọi chuyện rồi sẽ qua";

const SAFE_FALLBACK_EMPATHY: &str = "Tôi hiểu bạn đang gặp khó khăn. Cảm ơn bạn đã chia sẻ.";
const SAFE_FALLBACK_ADVICE: &str =
    "Đôi khi cuộc sống mang đến thử thách, nhưng mỗi thử thách là cơ hội trưởng thành.";
const SAFE_FALLBACK_ACTIONS: [&str; 3] = [
    "Hít thở sâu 3 lần",
    "Viết ra 3 điều tốt đẹp",
    "Gọi điện cho người thân",
];
const SAFE_FALLBACK_QUOTE: &str = "Sau cơn mưa trời lại sáng";

/// Analyzes one submission.
///
/// Errors only for invalid input, a missing credential, a non-success status
/// from the completion service, or a non-JSON response envelope. Transport
/// failures yield the safe fallback guidance instead.
pub async fn analyze(
    input: &TriageInput,
    llm: &dyn CompletionService,
    templates: &PromptTemplates,
) -> Result<TriageResult, AppError> {
    input.require_feeling()?;
    let feeling = input.feeling();

    if input.suicidal == SuicidalFlag::Yes || is_crisis(feeling) {
        warn!(suicidal = ?input.suicidal, "Crisis indicators present; skipping completion call");
        return Ok(crisis_result());
    }

    // Form-shape checks only apply once the crisis path is ruled out.
    input.validate_feeling_length()?;
    let mood = input.validated_mood()?;
    let issue = detect_issue(feeling);
    let template_key = template_key_for(issue);
    let prompt = templates.render(template_key, feeling, mood, input.support_nearby);

    info!(
        issue = issue.as_str(),
        template = template_key.as_str(),
        "Prompt template selected"
    );
    debug!(%prompt, "Filled prompt");

    let content = match llm.complete(ANALYZE_SYSTEM, &prompt).await {
        Ok(content) => content,
        Err(LlmError::MissingApiKey) => {
            return Err(AppError::Configuration(LlmError::MissingApiKey.to_string()))
        }
        Err(e @ LlmError::Api { .. }) => return Err(AppError::Upstream(e.to_string())),
        Err(e @ LlmError::Envelope(_)) => return Err(AppError::UpstreamFormat(e.to_string())),
        Err(e @ LlmError::Http(_)) => {
            error!("Completion call failed, serving safe fallback: {e}");
            return Ok(TriageResult::Normal(safe_fallback(mood)));
        }
    };

    let cleaned = strip_code_fences(&content);
    let mut guidance = match serde_json::from_str::<ModelReply>(&cleaned) {
        Ok(reply) => from_reply(reply, issue, mood),
        Err(e) => {
            warn!("Model content is not valid guidance JSON ({e}); using content fallback");
            debug!(%cleaned, "Unparseable model content");
            content_fallback(&cleaned, issue, mood)
        }
    };

    // The model's own opinion on the issue is never trusted.
    guidance.detected_issue = issue.as_str().to_string();

    Ok(TriageResult::Normal(guidance))
}

/// The fixed crisis payload.
pub fn crisis_result() -> TriageResult {
    TriageResult::Crisis(CrisisNotice {
        message: CRISIS_MESSAGE.to_string(),
        contacts: EMERGENCY_CONTACTS.to_vec(),
    })
}

fn from_reply(reply: ModelReply, issue: IssueCategory, mood: u8) -> Guidance {
    Guidance {
        emotion: reply.emotion,
        empathy: reply.empathy,
        advice: reply.advice,
        actions: reply.actions,
        quote: reply.quote,
        detected_issue: issue.as_str().to_string(),
        mood_label: mood_label(mood).to_string(),
    }
}

/// Guidance built around model text that could not be parsed.
fn content_fallback(cleaned: &str, issue: IssueCategory, mood: u8) -> Guidance {
    Guidance {
        emotion: None,
        empathy: cleaned.chars().take(EMPATHY_PREVIEW_CHARS).collect(),
        advice: CONTENT_FALLBACK_ADVICE.to_string(),
        actions: CONTENT_FALLBACK_ACTIONS.map(String::from).to_vec(),
        quote: CONTENT_FALLBACK_QUOTE.to_string(),
        detected_issue: issue.as_str().to_string(),
        mood_label: mood_label(mood).to_string(),
    }
}

/// Guidance served when the completion call itself could not complete.
fn safe_fallback(mood: u8) -> Guidance {
    Guidance {
        emotion: Some(Emotion::Hopeful),
        empathy: SAFE_FALLBACK_EMPATHY.to_string(),
        advice: SAFE_FALLBACK_ADVICE.to_string(),
        actions: SAFE_FALLBACK_ACTIONS.map(String::from).to_vec(),
        quote: SAFE_FALLBACK_QUOTE.to_string(),
        detected_issue: GENERAL_SUPPORT_LABEL.to_string(),
        mood_label: mood_label(mood).to_string(),
    }
}
