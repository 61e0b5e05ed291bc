// Subprocess-backed analysis bridge
use crate::application::analysis_backend::{AnalysisBackend, AnalysisError};
use crate::domain::chart::ChartSuggestion;
use crate::domain::upload::UploadedFile;
use crate::infrastructure::demarcation::extract_json_payload;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use uuid::Uuid;

/// Bridge to the external analysis program. Per request it stages the
/// upload in the scratch directory, runs
/// `<command> [<args>...] <temp-path>` with both streams captured, deletes
/// the temp file, and decodes the chart suggestions embedded in stdout.
pub struct SubprocessAnalyzer {
    command: String,
    args: Vec<String>,
    scratch_dir: PathBuf,
    time_limit: Option<Duration>,
}

impl SubprocessAnalyzer {
    pub fn new(
        command: String,
        args: Vec<String>,
        scratch_dir: PathBuf,
        time_limit: Option<Duration>,
    ) -> Self {
        Self {
            command,
            args,
            scratch_dir,
            time_limit,
        }
    }

    /// Write the upload under a request-scoped name. The random prefix
    /// keeps concurrent uploads with identical file names apart; only the
    /// final path component of the client-supplied name is used.
    async fn stage_upload(&self, upload: &UploadedFile) -> Result<PathBuf, AnalysisError> {
        tokio::fs::create_dir_all(&self.scratch_dir)
            .await
            .map_err(AnalysisError::ProcessSpawn)?;

        let base = Path::new(&upload.name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let temp_path = self.scratch_dir.join(format!("{}-{}", Uuid::new_v4(), base));

        tokio::fs::write(&temp_path, &upload.bytes)
            .await
            .map_err(AnalysisError::ProcessSpawn)?;

        Ok(temp_path)
    }

    async fn run_analyzer(&self, temp_path: &Path) -> Result<Output, AnalysisError> {
        tracing::debug!(
            "Invoking analyzer: {} {:?} {}",
            self.command,
            self.args,
            temp_path.display()
        );

        let child = Command::new(&self.command)
            .args(&self.args)
            .arg(temp_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(AnalysisError::ProcessSpawn)?;

        // kill_on_drop reaps the child when the bounded wait gives up on it
        let wait = child.wait_with_output();
        let output = match self.time_limit {
            Some(limit) => match tokio::time::timeout(limit, wait).await {
                Ok(result) => result.map_err(AnalysisError::ProcessSpawn)?,
                Err(_) => return Err(AnalysisError::Timeout(limit)),
            },
            None => wait.await.map_err(AnalysisError::ProcessSpawn)?,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            tracing::error!(
                "Analyzer exited with code {:?}: {}",
                output.status.code(),
                stderr
            );
            return Err(AnalysisError::ProcessExit {
                code: output.status.code(),
                stderr,
            });
        }

        Ok(output)
    }

    /// Best-effort deletion, exactly once per staged file. Failures are
    /// logged and suppressed.
    async fn discard_temp_file(temp_path: &Path) {
        if let Err(e) = tokio::fs::remove_file(temp_path).await {
            tracing::warn!("Could not delete temp file {}: {}", temp_path.display(), e);
        }
    }

    fn decode_output(output: &Output) -> Result<Vec<ChartSuggestion>, AnalysisError> {
        let stdout = String::from_utf8_lossy(&output.stdout);

        let payload = extract_json_payload(&stdout).ok_or_else(|| AnalysisError::OutputParse {
            reason: "no JSON found in analyzer output".to_string(),
            raw_output: stdout.to_string(),
        })?;

        // The analyzer normally answers with an array; a bare object is
        // accepted as a single suggestion.
        match serde_json::from_str::<Vec<ChartSuggestion>>(payload) {
            Ok(suggestions) => Ok(suggestions),
            Err(list_err) => match serde_json::from_str::<ChartSuggestion>(payload) {
                Ok(single) => Ok(vec![single]),
                Err(_) => Err(AnalysisError::OutputParse {
                    reason: format!("could not parse analyzer output as JSON: {list_err}"),
                    raw_output: stdout.to_string(),
                }),
            },
        }
    }
}

#[async_trait]
impl AnalysisBackend for SubprocessAnalyzer {
    async fn analyze(&self, upload: &UploadedFile) -> Result<Vec<ChartSuggestion>, AnalysisError> {
        let temp_path = self.stage_upload(upload).await?;

        let result = self.run_analyzer(&temp_path).await;
        Self::discard_temp_file(&temp_path).await;

        let output = result?;
        Self::decode_output(&output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn write_script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("analyzer.sh");
        std::fs::write(&path, body).unwrap();
        path
    }

    fn analyzer(script: &Path, scratch: &Path) -> SubprocessAnalyzer {
        SubprocessAnalyzer::new(
            "sh".to_string(),
            vec![script.to_string_lossy().into_owned()],
            scratch.to_path_buf(),
            Some(Duration::from_secs(10)),
        )
    }

    fn upload(name: &str, content: &str) -> UploadedFile {
        UploadedFile::new(
            name.to_string(),
            "text/csv".to_string(),
            Bytes::from(content.to_string()),
        )
    }

    fn scratch_is_empty(scratch: &Path) -> bool {
        std::fs::read_dir(scratch).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn test_parses_suggestions_after_progress_lines() {
        let script_dir = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let script = write_script(
            script_dir.path(),
            r#"
echo "loading..."
echo '[{"title":"A","chart_type":"bar","insight":"i","parameters":{"x_axis":"x","y_axis":"y"}}]'
"#,
        );

        let backend = analyzer(&script, scratch.path());
        let suggestions = backend.analyze(&upload("sales.csv", "a,b\n1,2\n")).await.unwrap();

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].title, "A");
        assert!(scratch_is_empty(scratch.path()));
    }

    #[tokio::test]
    async fn test_analyzer_receives_the_uploaded_bytes() {
        let script_dir = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let script = write_script(
            script_dir.path(),
            r#"
test -f "$1" || exit 9
grep -q "region,sales" "$1" || exit 8
echo "[]"
"#,
        );

        let backend = analyzer(&script, scratch.path());
        let suggestions = backend
            .analyze(&upload("sales.csv", "region,sales\nnorth,12\n"))
            .await
            .unwrap();

        assert!(suggestions.is_empty());
        assert!(scratch_is_empty(scratch.path()));
    }

    #[tokio::test]
    async fn test_object_payload_becomes_one_suggestion() {
        let script_dir = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let script = write_script(
            script_dir.path(),
            r#"echo '{"title":"Only","chart_type":"pie"}'"#,
        );

        let backend = analyzer(&script, scratch.path());
        let suggestions = backend.analyze(&upload("x.csv", "a\n")).await.unwrap();

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].title, "Only");
    }

    #[tokio::test]
    async fn test_nonzero_exit_reports_stderr_and_still_cleans_up() {
        let script_dir = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let script = write_script(script_dir.path(), "echo \"boom\" >&2\nexit 3\n");

        let backend = analyzer(&script, scratch.path());
        let err = backend.analyze(&upload("x.csv", "a\n")).await.unwrap_err();

        match err {
            AnalysisError::ProcessExit { code, stderr } => {
                assert_eq!(code, Some(3));
                assert!(stderr.contains("boom"));
            }
            other => panic!("expected ProcessExit, got {other:?}"),
        }
        assert!(scratch_is_empty(scratch.path()));
    }

    #[tokio::test]
    async fn test_output_without_json_is_a_parse_error() {
        let script_dir = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let script = write_script(script_dir.path(), "echo \"nothing to see\"\n");

        let backend = analyzer(&script, scratch.path());
        let err = backend.analyze(&upload("x.csv", "a\n")).await.unwrap_err();

        match err {
            AnalysisError::OutputParse { reason, raw_output } => {
                assert!(reason.contains("no JSON found"));
                assert!(raw_output.contains("nothing to see"));
            }
            other => panic!("expected OutputParse, got {other:?}"),
        }
        assert!(scratch_is_empty(scratch.path()));
    }

    #[tokio::test]
    async fn test_bracket_prefixed_progress_line_poisons_the_parse() {
        let script_dir = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let script = write_script(
            script_dir.path(),
            r#"
echo "[1/3] reading file"
echo '[{"title":"A","chart_type":"bar"}]'
"#,
        );

        let backend = analyzer(&script, scratch.path());
        let err = backend.analyze(&upload("x.csv", "a\n")).await.unwrap_err();

        assert!(matches!(err, AnalysisError::OutputParse { .. }));
    }

    #[tokio::test]
    async fn test_missing_command_is_a_spawn_error() {
        let scratch = tempfile::tempdir().unwrap();
        let backend = SubprocessAnalyzer::new(
            "/definitely/not/a/real/analyzer".to_string(),
            Vec::new(),
            scratch.path().to_path_buf(),
            None,
        );

        let err = backend.analyze(&upload("x.csv", "a\n")).await.unwrap_err();

        assert!(matches!(err, AnalysisError::ProcessSpawn(_)));
        assert!(scratch_is_empty(scratch.path()));
    }

    #[tokio::test]
    async fn test_stalled_analyzer_times_out() {
        let script_dir = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let script = write_script(script_dir.path(), "sleep 30\n");

        let backend = SubprocessAnalyzer::new(
            "sh".to_string(),
            vec![script.to_string_lossy().into_owned()],
            scratch.path().to_path_buf(),
            Some(Duration::from_millis(200)),
        );

        let err = backend.analyze(&upload("x.csv", "a\n")).await.unwrap_err();

        assert!(matches!(err, AnalysisError::Timeout(_)));
        assert!(scratch_is_empty(scratch.path()));
    }

    #[tokio::test]
    async fn test_concurrent_uploads_with_the_same_name_do_not_collide() {
        let script_dir = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        // Echo the staged file back so each request sees its own bytes.
        let script = write_script(script_dir.path(), "cat \"$1\"\n");

        let backend = analyzer(&script, scratch.path());
        let first = upload("same.csv", r#"[{"title":"First","chart_type":"bar"}]"#);
        let second = upload("same.csv", r#"[{"title":"Second","chart_type":"line"}]"#);

        let (a, b) = tokio::join!(backend.analyze(&first), backend.analyze(&second));

        assert_eq!(a.unwrap()[0].title, "First");
        assert_eq!(b.unwrap()[0].title, "Second");
        assert!(scratch_is_empty(scratch.path()));
    }
}
