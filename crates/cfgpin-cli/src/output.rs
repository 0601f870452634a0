//! JSON views of command results. Secrets never appear here.

use cfgpin_names::Resolution;
use cfgpin_publish::{NameUpdateResult, PreviousBinding, PublishOutcome, UploadResult};
use cfgpin_registry::EnvironmentRecord;
use serde_json::{json, Value};

pub fn outcome_json(outcome: &PublishOutcome) -> Value {
    let upload = match &outcome.upload {
        UploadResult::Uploaded { content_id, url } => json!({
            "status": "uploaded",
            "content_id": content_id.as_str(),
            "url": url,
        }),
        UploadResult::Failed { error } => json!({
            "status": "failed",
            "kind": error.kind(),
            "error": error.to_string(),
        }),
    };
    let name_update = match &outcome.name_update {
        NameUpdateResult::Updated {
            name,
            reachable_as,
            sequence,
        } => json!({
            "status": "updated",
            "name": name.to_string(),
            "reachable_as": reachable_as,
            "sequence": sequence,
        }),
        NameUpdateResult::Failed { error } => json!({
            "status": "failed",
            "kind": error.kind(),
            "error": error.to_string(),
        }),
        NameUpdateResult::Skipped { reason } => json!({
            "status": "skipped",
            "reason": reason.to_string(),
        }),
    };
    json!({
        "environment": outcome.environment,
        "stage": outcome.stage().to_string(),
        "upload": upload,
        "name_update": name_update,
        "previous": previous_json(&outcome.previous),
        "warnings": outcome.warnings,
    })
}

pub fn previous_json(previous: &PreviousBinding) -> Value {
    match previous {
        PreviousBinding::Published {
            content_id,
            sequence,
        } => json!({
            "status": "published",
            "content_id": content_id.as_str(),
            "sequence": sequence,
        }),
        PreviousBinding::NotPublished => json!({ "status": "not_published" }),
        PreviousBinding::Unknown { reason } => json!({ "status": "unknown", "reason": reason }),
        PreviousBinding::NotChecked => json!({ "status": "not_checked" }),
    }
}

pub fn resolution_json(resolution: &Resolution) -> Value {
    json!({
        "name": resolution.name.to_string(),
        "content_id": resolution.content_id().map(|id| id.as_str()),
        "sequence": resolution.sequence(),
    })
}

pub fn environment_json(record: &EnvironmentRecord, service_configured: bool) -> Value {
    json!({
        "environment": record.label,
        "public_name": record.public_name.to_string(),
        "effective_name": record.effective_name().to_string(),
        "can_update_name": record.can_update_name(),
        "service_configured": service_configured,
    })
}
