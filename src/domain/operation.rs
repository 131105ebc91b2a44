use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FixGrammar,
    ImproveStyle,
    GenerateContent,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::FixGrammar => "grammar",
            Operation::ImproveStyle => "style",
            Operation::GenerateContent => "generate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Formal,
    Creative,
    Casual,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Formal => "formal",
            Tone::Creative => "creative",
            Tone::Casual => "casual",
        }
    }

    /// Parses a tone label. Anything unrecognized is treated as formal.
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "creative" | "creativo" => Tone::Creative,
            "casual" => Tone::Casual,
            _ => Tone::Formal,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OperationRequest {
    pub operation: Operation,
    pub text: String,
    pub tone: Option<Tone>,
}

impl OperationRequest {
    pub fn new(operation: Operation, text: impl Into<String>) -> Self {
        Self {
            operation,
            text: text.into(),
            tone: None,
        }
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = Some(tone);
        self
    }

    pub fn tone_or_default(&self) -> Tone {
        self.tone.unwrap_or_default()
    }
}

/// Outcome of a text operation: either the produced text or a readable error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult {
    Success { output: String },
    Failure { error_message: String },
}

impl OperationResult {
    pub fn success(&self) -> bool {
        matches!(self, OperationResult::Success { .. })
    }

    pub fn output(&self) -> Option<&str> {
        match self {
            OperationResult::Success { output } => Some(output),
            OperationResult::Failure { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            OperationResult::Success { .. } => None,
            OperationResult::Failure { error_message } => Some(error_message),
        }
    }
}

#[derive(Serialize)]
struct OperationResultView<'a> {
    success: bool,
    output: Option<&'a str>,
    error_message: Option<&'a str>,
}

impl Serialize for OperationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        OperationResultView {
            success: self.success(),
            output: self.output(),
            error_message: self.error_message(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tone_labels() {
        assert_eq!(Tone::from_label("Formal"), Tone::Formal);
        assert_eq!(Tone::from_label("CREATIVE"), Tone::Creative);
        assert_eq!(Tone::from_label("Creativo"), Tone::Creative);
        assert_eq!(Tone::from_label(" casual "), Tone::Casual);
    }

    #[test]
    fn unknown_tone_falls_back_to_formal() {
        assert_eq!(Tone::from_label("UnknownTone"), Tone::Formal);
        assert_eq!(Tone::from_label(""), Tone::Formal);
    }

    #[test]
    fn request_tone_defaults_to_formal() {
        let request = OperationRequest::new(Operation::ImproveStyle, "hola");
        assert_eq!(request.tone_or_default(), Tone::Formal);

        let request = request.with_tone(Tone::Casual);
        assert_eq!(request.tone_or_default(), Tone::Casual);
    }

    #[test]
    fn result_exposes_exactly_one_side() {
        let ok = OperationResult::Success {
            output: "listo".to_string(),
        };
        assert!(ok.success());
        assert_eq!(ok.output(), Some("listo"));
        assert_eq!(ok.error_message(), None);

        let failed = OperationResult::Failure {
            error_message: "Error: timeout".to_string(),
        };
        assert!(!failed.success());
        assert_eq!(failed.output(), None);
        assert_eq!(failed.error_message(), Some("Error: timeout"));
    }

    #[test]
    fn serializes_with_both_fields() {
        let failed = OperationResult::Failure {
            error_message: "Error: quota".to_string(),
        };
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "success": false,
                "output": null,
                "error_message": "Error: quota",
            })
        );
    }
}
