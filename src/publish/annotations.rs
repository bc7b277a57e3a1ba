// src/publish/annotations.rs

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::progress::ProgressSnapshot;
use crate::track::record::whole_seconds;

/// Default annotation key prefix.
pub const DEFAULT_PREFIX: &str = "test-progress";

/// Render a snapshot as job annotations.
///
/// Keys are `<prefix>/<field>` for overall values and
/// `<prefix>/<suite>-<field>` per suite. `last-updated` is only included
/// when `changed` is set; suites that have not started carry no duration.
pub fn build_annotations(
    prefix: &str,
    snapshot: &ProgressSnapshot,
    changed: bool,
    now: DateTime<Utc>,
) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    let mut put = |key: String, value: String| {
        out.insert(format!("{prefix}/{key}"), value);
    };

    put("total".into(), snapshot.total.to_string());
    put("completed".into(), snapshot.completed.to_string());
    put("passed".into(), snapshot.passed.to_string());
    put("failed".into(), snapshot.failed.to_string());
    put("percent".into(), snapshot.percent.to_string());
    put("active-suites".into(), snapshot.active_suites.to_string());
    if changed {
        put(
            "last-updated".into(),
            now.to_rfc3339_opts(SecondsFormat::Secs, true),
        );
    }

    for (suite, progress) in &snapshot.suites {
        put(format!("{suite}-total"), progress.total.to_string());
        put(format!("{suite}-completed"), progress.completed.to_string());
        put(format!("{suite}-passed"), progress.passed.to_string());
        put(format!("{suite}-failed"), progress.failed.to_string());
        put(format!("{suite}-percent"), progress.percent.to_string());
        put(format!("{suite}-finished"), progress.finished.to_string());
        if let Some(duration) = progress.duration {
            put(
                format!("{suite}-duration"),
                humantime::format_duration(whole_seconds(duration)).to_string(),
            );
        }
    }

    out
}
