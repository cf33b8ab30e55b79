//! Human-readable error descriptions, structured JSON error output, and
//! the error-class to exit-code mapping.

use serde_json::json;
use stopgo_core::ClassifierError;

/// Stable exit codes: 0 success, 2 configuration error, 3 input too
/// short, 1 anything else.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if let Some(typed) = err.downcast_ref::<ClassifierError>() {
        return match typed {
            ClassifierError::InvalidConfig(_) => 2,
            ClassifierError::InputTooShort { .. } => 3,
            _ => 1,
        };
    }
    let lower = err.to_string().to_ascii_lowercase();
    if lower.contains("configuration") || lower.contains("config ") {
        return 2;
    }
    1
}

/// Map an eyre::Report to a human-readable explanation with likely causes
/// and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    if let Some(typed) = err.downcast_ref::<ClassifierError>() {
        return match typed {
            ClassifierError::InvalidConfig(msg) => format!(
                "What happened: The classifier configuration is invalid ({msg}).\nLikely causes: An override in the TOML moved a threshold past its partner, or every primary method was disabled.\nHow to fix: Edit the config file and rerun; `stopgo validate-config` checks it without touching a trace."
            ),
            ClassifierError::InputTooShort { required, got } => format!(
                "What happened: The trace has too few unique positions ({got}, need {required}).\nLikely causes: The device was stationary for the whole recording, or the file was truncated.\nHow to fix: Record a longer trace, or lower the method window sizes in the config."
            ),
            other => format!(
                "What happened: {other}.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();
    if lower.contains("must have headers") {
        return "Invalid headers in trace CSV. Expected 'ts,x,y' or 'ts,x,y,motion_score'.".to_string();
    }
    if lower.contains("non-decreasing") {
        return format!(
            "What happened: The trace timestamps run backwards.\nLikely causes: Rows were concatenated from several recordings, or the export was unsorted.\nHow to fix: Sort the CSV by the ts column and rerun. Original: {msg}"
        );
    }
    if lower.contains("configuration") {
        return format!(
            "What happened: Configuration is invalid or unreadable.\nLikely causes: Malformed TOML or an out-of-range value.\nHow to fix: Edit the config file and try again. Original: {msg}"
        );
    }

    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// One stable JSON error object for `--json` mode.
pub fn format_error_json(err: &eyre::Report) -> String {
    json!({
        "event": "error",
        "message": err.to_string(),
        "exit_code": exit_code_for_error(err),
    })
    .to_string()
}
