use chrono::Utc;
use fs_err as fs;
use serde_json::json;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use uuid::Uuid;

/// Write-only debug artifacts for one session: every agent call's prompt and
/// raw response land under `.affirm/sessions/<uuid>/`. This is not session
/// state; nothing is ever read back.
pub struct SessionLog {
    session: Uuid,
    dir: PathBuf,
    counter: AtomicU32,
}

impl SessionLog {
    pub fn new(root: &Path, session: Uuid) -> Self {
        Self {
            session,
            dir: root.join(".affirm").join("sessions").join(session.to_string()),
            counter: AtomicU32::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save one stage's prompt and raw agent response. Files are sequenced so
    /// repeated stages (screen, screen, batch, batch...) stay ordered.
    pub fn save_stage(&self, stage: &str, prompt: &str, response: &str) -> anyhow::Result<(PathBuf, PathBuf)> {
        fs::create_dir_all(&self.dir)?;
        let seq = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        if seq == 1 {
            let meta = json!({
                "session": self.session,
                "started_at": Utc::now(),
            });
            fs::write(self.dir.join("session.json"), serde_json::to_string_pretty(&meta)?)?;
        }

        let prompt_path = self.dir.join(format!("{seq:02}.{stage}.prompt.txt"));
        fs::write(&prompt_path, prompt)?;

        let response_path = self.dir.join(format!("{seq:02}.{stage}.response.txt"));
        fs::write(&response_path, response)?;

        Ok((prompt_path, response_path))
    }
}

pub fn print_session_dir(log: &SessionLog) {
    println!("debug: session artifacts directory: {}", log.dir().display());
    std::io::stdout().flush().ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_sequenced_and_written() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let log = SessionLog::new(tmp.path(), Uuid::new_v4());

        let (p1, r1) = log.save_stage("screen", "prompt one", "response one").expect("save");
        let (p2, _) = log.save_stage("batch", "prompt two", "response two").expect("save");

        assert!(p1.file_name().and_then(|n| n.to_str()).expect("name").starts_with("01.screen"));
        assert!(p2.file_name().and_then(|n| n.to_str()).expect("name").starts_with("02.batch"));
        assert_eq!(fs::read_to_string(&r1).expect("read"), "response one");
        // Session metadata written alongside the first stage.
        assert!(log.dir().join("session.json").exists());
    }

    #[test]
    fn artifacts_live_under_session_dir() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let id = Uuid::new_v4();
        let log = SessionLog::new(tmp.path(), id);
        assert!(log.dir().ends_with(Path::new(".affirm").join("sessions").join(id.to_string())));
    }
}
