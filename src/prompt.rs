//! Default system prompt and conversation titling.

/// Maximum title length derived from the first user message, in characters.
const TITLE_MAX_CHARS: usize = 50;

/// System prompt for the fab sensor assistant.
pub const DEFAULT_SYSTEM_PROMPT: &str = "당신은 반도체 공정 인프라를 관리하는 AI 어시스턴트입니다.

## 역할
- 반도체 FAB의 센서 데이터를 분석하고 시각화합니다
- 장비 상태를 모니터링하고 이상 징후를 감지합니다
- 사용자의 질문에 친절하고 정확하게 답변합니다

## 사용 가능한 센서 종류
- temperature: 온도 (°C)
- pressure: 압력 (mTorr)
- vacuum: 진공도 (Pa)
- gas_flow: 가스 유량 (sccm)
- rf_power: RF Power (W)

## 도구 사용 지침 (매우 중요!)
- 사용자가 \"그래프\", \"차트\", \"시각화\", \"보여줘\", \"그려줘\" 등의 키워드를 사용하면 **반드시** generate_sensor_chart 도구를 즉시 호출하세요
- 질문하지 말고 바로 도구를 호출하세요. 기본값으로 temperature 센서와 최근 24시간 데이터를 사용하세요
- 사용자가 센서 데이터나 통계를 요청하면 get_sensor_data 또는 get_sensor_statistics 도구를 사용하세요
- 장비 목록이 필요하면 list_equipment 도구를 사용하세요

## 응답 형식
- 한국어로 답변하세요
- 데이터를 설명할 때는 구체적인 수치를 포함하세요
- 이상 징후가 발견되면 경고와 함께 원인을 분석하세요
- 그래프를 생성한 후에는 간단히 데이터 특징을 설명하세요
";

/// Derive a conversation title from the first user message.
///
/// Truncation counts characters, not bytes, so multibyte text is never cut
/// mid-character.
pub fn derive_title(user_message: &str) -> String {
    if user_message.chars().count() > TITLE_MAX_CHARS {
        let truncated: String = user_message.chars().take(TITLE_MAX_CHARS).collect();
        format!("{truncated}...")
    } else {
        user_message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_message_is_used_verbatim() {
        assert_eq!(derive_title("온도 추이 보여줘"), "온도 추이 보여줘");
    }

    #[test]
    fn exactly_fifty_chars_is_not_truncated() {
        let message = "a".repeat(50);
        assert_eq!(derive_title(&message), message);
    }

    #[test]
    fn long_message_gets_ellipsis() {
        let message = "b".repeat(51);
        let title = derive_title(&message);
        assert_eq!(title.chars().count(), 53);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn multibyte_text_truncates_on_character_boundary() {
        let message = "가".repeat(60);
        let title = derive_title(&message);
        assert_eq!(title, format!("{}...", "가".repeat(50)));
    }

    #[test]
    fn prompt_names_the_chart_tool() {
        assert!(DEFAULT_SYSTEM_PROMPT.contains("generate_sensor_chart"));
        assert!(DEFAULT_SYSTEM_PROMPT.contains("list_equipment"));
    }
}
