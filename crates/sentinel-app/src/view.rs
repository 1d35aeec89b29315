//! Render-ready projection of the alert state.

use sentinel_core::AlertState;
use serde::Serialize;

/// What the presenter shows: the idle indicator or one alert block.
///
/// Text is carried verbatim; wrapping is a rendering concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum AlertView {
    Listening,
    Alert {
        detected_text: String,
        reasoning: String,
    },
}

impl AlertView {
    pub fn is_alert(&self) -> bool {
        matches!(self, AlertView::Alert { .. })
    }
}

impl From<&AlertState> for AlertView {
    fn from(state: &AlertState) -> Self {
        match state {
            AlertState::Idle => AlertView::Listening,
            AlertState::Alert(alert) => AlertView::Alert {
                detected_text: alert.detected_text.clone(),
                reasoning: alert.reasoning.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_core::Alert;

    #[test]
    fn test_idle_projects_to_listening() {
        assert_eq!(AlertView::from(&AlertState::Idle), AlertView::Listening);
    }

    #[test]
    fn test_alert_keeps_text_verbatim() {
        let state = AlertState::Alert(Alert::new(
            "  You must wire $5000 immediately ",
            "line one\nline two",
        ));
        assert_eq!(
            AlertView::from(&state),
            AlertView::Alert {
                detected_text: "  You must wire $5000 immediately ".to_string(),
                reasoning: "line one\nline two".to_string(),
            }
        );
    }

    #[test]
    fn test_serializes_with_view_tag() {
        let json = serde_json::to_value(AlertView::Listening).unwrap();
        assert_eq!(json["view"], "listening");

        let json = serde_json::to_value(AlertView::Alert {
            detected_text: "t".into(),
            reasoning: "r".into(),
        })
        .unwrap();
        assert_eq!(json["view"], "alert");
        assert_eq!(json["detected_text"], "t");
        assert_eq!(json["reasoning"], "r");
    }
}
