/// Per-session state carried between requests by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub current_result: Option<String>,
    pub original_text: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.current_result = None;
        self.original_text.clear();
    }

    pub fn has_result(&self) -> bool {
        self.current_result
            .as_deref()
            .is_some_and(|result| !result.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_resets_both_fields() {
        let mut session = Session {
            current_result: Some("Hola.".to_string()),
            original_text: "hola".to_string(),
        };
        assert!(session.has_result());

        session.clear();
        assert_eq!(session, Session::new());
        assert!(!session.has_result());
    }

    #[test]
    fn empty_result_counts_as_nothing() {
        let session = Session {
            current_result: Some(String::new()),
            original_text: "x".to_string(),
        };
        assert!(!session.has_result());
    }
}
