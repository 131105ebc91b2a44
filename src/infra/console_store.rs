use std::io::{self, Stdout, Write};
use std::sync::Mutex;

use crate::services::DraftStore;

const PREVIEW_CHARS: usize = 50;

/// Stand-in for a database: describes the save on a console and reports success.
pub struct ConsoleDraftStore<W: Write + Send> {
    out: Mutex<W>,
}

impl ConsoleDraftStore<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleDraftStore<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn describe(out: &mut W, user_id: &str, text: &str) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "Simulating database connection...")?;
        writeln!(out, "Saving draft for user {user_id}...")?;
        writeln!(out, "Content: {}", preview(text))?;
        writeln!(out, "Draft saved to the simulated database.")?;
        writeln!(out)?;
        out.flush()
    }
}

impl<W: Write + Send> DraftStore for ConsoleDraftStore<W> {
    fn save_draft(&self, user_id: &str, text: &str) -> bool {
        let mut out = match self.out.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match Self::describe(&mut out, user_id, text) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(user_id, "failed to save draft: {err}");
                false
            }
        }
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn prints_description_and_succeeds() {
        let store = ConsoleDraftStore::new(Vec::new());
        assert!(store.save_draft("usuario_anonimo", "Hola, mundo."));

        let printed = String::from_utf8(store.into_inner()).unwrap();
        assert!(printed.contains("Saving draft for user usuario_anonimo"));
        assert!(printed.contains("Content: Hola, mundo.\n"));
    }

    #[test]
    fn long_drafts_are_previewed() {
        let text = "á".repeat(60);
        assert_eq!(preview(&text), format!("{}...", "á".repeat(50)));
        assert_eq!(preview(&"a".repeat(50)), "a".repeat(50));
    }

    #[test]
    fn write_failure_reports_false() {
        let store = ConsoleDraftStore::new(BrokenPipe);
        assert!(!store.save_draft("usuario_anonimo", "texto"));
    }
}
