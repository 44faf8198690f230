//! Predictor backed by an external model process.
//!
//! The record is written to the child's stdin as JSON. The child answers on
//! stdout with either a `RiskOutcome` object or a bare probability.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use domain::{HealthRecord, RiskOutcome};
use session_gate::{InferenceError, Predictor};

const PREDICT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct CommandPredictor {
    command: String,
    timeout: Duration,
}

impl CommandPredictor {
    pub fn new(command: String) -> Self {
        Self {
            command,
            timeout: PREDICT_TIMEOUT,
        }
    }

    #[cfg(test)]
    fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn shell(&self) -> Command {
        #[cfg(windows)]
        let mut cmd = {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C");
            cmd
        };
        #[cfg(not(windows))]
        let mut cmd = {
            let mut cmd = Command::new("sh");
            cmd.arg("-c");
            cmd
        };
        cmd.arg(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    async fn run(&self, input: Vec<u8>) -> Result<Vec<u8>, InferenceError> {
        let mut child = self
            .shell()
            .spawn()
            .map_err(|e| InferenceError::Backend(format!("failed to start model: {}", e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            // A model that ignores its input may close stdin early
            if let Err(e) = stdin.write_all(&input).await {
                tracing::debug!(error = %e, "Model closed stdin before reading input");
            }
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| InferenceError::Backend(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(InferenceError::Backend(format!(
                "model exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl Predictor for CommandPredictor {
    async fn predict(&self, features: &HealthRecord) -> Result<RiskOutcome, InferenceError> {
        let input =
            serde_json::to_vec(features).map_err(|e| InferenceError::Malformed(e.to_string()))?;

        let stdout = tokio::time::timeout(self.timeout, self.run(input))
            .await
            .map_err(|_| {
                InferenceError::Backend(format!(
                    "model did not answer within {}s",
                    self.timeout.as_secs()
                ))
            })??;

        parse_outcome(&stdout)
    }
}

fn parse_outcome(stdout: &[u8]) -> Result<RiskOutcome, InferenceError> {
    let text = String::from_utf8_lossy(stdout);
    let text = text.trim();

    let probability = match serde_json::from_str::<RiskOutcome>(text) {
        Ok(outcome) => outcome.probability,
        Err(_) => text.parse::<f32>().map_err(|_| {
            InferenceError::Malformed(format!("unexpected model output: {:?}", text))
        })?,
    };

    RiskOutcome::try_from_probability(probability).ok_or_else(|| {
        InferenceError::Malformed(format!("probability out of range: {}", probability))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Gender, RiskLevel};
    use tokio_test::assert_ok;

    fn record() -> HealthRecord {
        HealthRecord {
            age: 52,
            gender: Gender::Male,
            resting_bp: 125.0,
            serum_cholesterol: 212.0,
            triglycerides: 150.0,
            ldl: 130.0,
            hdl: 45.0,
            fasting_blood_sugar: 98.0,
            chest_pain: 0,
            resting_ecg: 1,
            stress_test: 0,
            echo: 0,
            max_heart_rate: 168.0,
        }
    }

    #[test]
    fn test_parse_bare_probability() {
        let outcome = parse_outcome(b"0.73\n").unwrap();
        assert_eq!(outcome.level, RiskLevel::High);
    }

    #[test]
    fn test_parse_json_outcome_recomputes_level() {
        let outcome = parse_outcome(br#"{"probability":0.2,"level":"high"}"#).unwrap();

        // Level is always derived from the probability
        assert_eq!(outcome.level, RiskLevel::Low);
    }

    #[test]
    fn test_parse_rejects_non_finite_and_out_of_range() {
        let outputs: [&[u8]; 5] = [
            b"NaN",
            b"1.7",
            b"-0.1",
            b"inf",
            br#"{"probability":1.5,"level":"high"}"#,
        ];
        for output in outputs {
            assert!(matches!(
                parse_outcome(output),
                Err(InferenceError::Malformed(_))
            ));
        }
    }

    #[test]
    fn test_parse_garbage_is_malformed() {
        assert!(matches!(
            parse_outcome(b"not a number"),
            Err(InferenceError::Malformed(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_reads_stdin_and_answers() {
        let predictor = CommandPredictor::new("grep -q '\"AGE\":52' && echo 0.9".to_string());
        let outcome = assert_ok!(predictor.predict(&record()).await);

        assert_eq!(outcome.level, RiskLevel::High);
        assert!((outcome.probability - 0.9).abs() < f32::EPSILON);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_command_is_backend_error() {
        let predictor = CommandPredictor::new("echo boom >&2; exit 3".to_string());

        match predictor.predict(&record()).await {
            Err(InferenceError::Backend(msg)) => assert!(msg.contains("boom")),
            other => panic!("expected backend error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_command_times_out() {
        let predictor = CommandPredictor::new("sleep 5".to_string())
            .with_timeout(Duration::from_millis(100));

        assert!(matches!(
            predictor.predict(&record()).await,
            Err(InferenceError::Backend(_))
        ));
    }
}
