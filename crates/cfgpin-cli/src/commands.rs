use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use cfgpin_crypto::OwningCredential;
use cfgpin_names::{
    HttpNameNetwork, HttpNamingConfig, InMemoryNameNetwork, NameResolver, NamingNetwork,
    Resolution, ResolutionRequest,
};
use cfgpin_publish::{
    is_configured, status_message, NameUpdateResult, PreviousBinding, PublishStage, Publisher,
    PublisherConfig, UploadResult,
};
use cfgpin_registry::Registry;
use cfgpin_snapshot::Snapshot;
use cfgpin_store::{ContentUploader, HttpPinningConfig, HttpPinningService, InMemoryPinStore};
use cfgpin_types::Name;
use colored::Colorize;
use serde_json::json;
use tracing::{debug, info};

use crate::cli::*;
use crate::output;

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    match cli.command {
        Command::Publish(args) => cmd_publish(args, format).await,
        Command::Resolve(args) => cmd_resolve(args, format).await,
        Command::Status(args) => cmd_status(args, format).await,
        Command::Keygen => cmd_keygen(format),
    }
}

fn build_publisher(args: &ServiceArgs) -> anyhow::Result<Publisher> {
    let timeout = args.timeout_secs.map(Duration::from_secs);
    let (uploader, network) = if args.dry_run {
        info!("dry run: using in-memory services");
        let uploader: Arc<dyn ContentUploader> = Arc::new(InMemoryPinStore::new());
        let network: Arc<dyn NamingNetwork> = Arc::new(InMemoryNameNetwork::new());
        (uploader, network)
    } else {
        let pinning = HttpPinningService::new(HttpPinningConfig {
            api_base: args.pinning_api.clone(),
            request_timeout: timeout,
        })
        .context("building pinning client")?;
        let naming = HttpNameNetwork::new(HttpNamingConfig {
            api_base: args.naming_api.clone(),
            request_timeout: timeout,
        })
        .context("building naming client")?;
        let uploader: Arc<dyn ContentUploader> = Arc::new(pinning);
        let network: Arc<dyn NamingNetwork> = Arc::new(naming);
        (uploader, network)
    };

    if args.record_validity_days <= 0 {
        bail!("--record-validity-days must be positive");
    }
    let resolver = NameResolver::new(network)
        .with_validity(chrono::Duration::days(args.record_validity_days));
    let config = PublisherConfig::default().with_gateway(args.gateway.clone());
    Ok(Publisher::new(uploader, resolver).with_config(config))
}

fn read_snapshot(path: &std::path::Path) -> anyhow::Result<Snapshot> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing snapshot {}", path.display()))?;
    Snapshot::from_json_object(&value).with_context(|| format!("snapshot {}", path.display()))
}

async fn cmd_publish(args: PublishArgs, format: OutputFormat) -> anyhow::Result<()> {
    let registry = Registry::load(&args.config)?;
    let record = registry.record(&args.env)?;
    let snapshot = read_snapshot(&args.snapshot)?;
    let publisher = build_publisher(&args.services)?;

    if matches!(format, OutputFormat::Text) {
        println!("{}", status_message(&record.label).dimmed());
    }
    debug!(environment = %record.label, keys = snapshot.len(), "publishing");
    let outcome = publisher.publish(&snapshot, record).await;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output::outcome_json(&outcome))?),
        OutputFormat::Text => {
            for warning in &outcome.warnings {
                println!("{} {}", "warning:".yellow().bold(), warning);
            }
            let mark = match outcome.stage() {
                PublishStage::NameUpdated | PublishStage::NameSkipped => "✓".green().bold(),
                PublishStage::NameUpdateFailed => "!".yellow().bold(),
                _ => "✗".red().bold(),
            };
            println!("{mark} {}", outcome.summary());
            if let UploadResult::Uploaded { url, .. } = &outcome.upload {
                println!("  Snapshot: {}", url.blue());
            }
            if let NameUpdateResult::Updated { reachable_as, sequence, .. } =
                &outcome.name_update
            {
                println!("  Name: {} (revision {sequence})", reachable_as.blue());
            }
            if let Some(previous) = outcome.previous.content_id() {
                println!("  Previous: {}", previous.to_string().dimmed());
            }
        }
    }

    match outcome.stage() {
        PublishStage::UploadFailed => bail!("nothing was published for {}", outcome.environment),
        PublishStage::NameUpdateFailed => {
            bail!("snapshot stored but the name for {} was not updated", outcome.environment)
        }
        _ => Ok(()),
    }
}

async fn cmd_resolve(args: ResolveArgs, format: OutputFormat) -> anyhow::Result<()> {
    let publisher = build_publisher(&args.services)?;
    let resolution: Resolution = match (&args.name, &args.env) {
        (Some(name), _) => {
            let name = Name::parse(name).context("invalid name")?;
            publisher
                .resolver()
                .resolve(ResolutionRequest::ByName(name))
                .await?
        }
        (None, Some(env)) => {
            let config = args.config.as_ref().context("--env needs --config")?;
            let registry = Registry::load(config)?;
            publisher.resolve(registry.record(env)?).await?
        }
        (None, None) => bail!("pass --name or --env"),
    };
    print_resolution(&publisher, &resolution, format)
}

fn print_resolution(
    publisher: &Publisher,
    resolution: &Resolution,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&output::resolution_json(resolution))?)
        }
        OutputFormat::Text => {
            println!("Name: {}", resolution.name.to_string().cyan());
            match (resolution.content_id(), resolution.sequence()) {
                (Some(id), Some(sequence)) => {
                    println!("  Points at: {} (revision {sequence})", id.to_string().yellow());
                    println!("  Gateway: {}", publisher.config().name_url(&resolution.name).blue());
                }
                _ => println!("  {}", "not published yet".dimmed()),
            }
        }
    }
    Ok(())
}

async fn cmd_status(args: StatusArgs, format: OutputFormat) -> anyhow::Result<()> {
    let registry = Registry::load(&args.config)?;
    let publisher = build_publisher(&args.services)?;

    let mut rows = Vec::new();
    for record in registry.records() {
        let configured = is_configured(record.service_credential.as_ref());
        let previous = if args.offline {
            None
        } else {
            Some(publisher.previous(record).await)
        };

        match format {
            OutputFormat::Json => {
                let mut row = output::environment_json(record, configured);
                if let Some(previous) = &previous {
                    row["current"] = output::previous_json(previous);
                }
                rows.push(row);
            }
            OutputFormat::Text => {
                println!("{}", record.label.bold());
                println!("  Name: {}", record.effective_name().to_string().cyan());
                if record.name_mismatch().is_some() {
                    println!(
                        "  {} configured name {} differs from the credential's",
                        "warning:".yellow(),
                        record.public_name.short_id()
                    );
                }
                let yes_no = |b: bool| if b { "yes".green() } else { "no".red() };
                println!("  Can update name: {}", yes_no(record.can_update_name()));
                println!("  Upload configured: {}", yes_no(configured));
                match previous.as_ref() {
                    Some(PreviousBinding::Published { content_id, sequence }) => {
                        println!("  Current: {} (revision {sequence})", content_id.to_string().yellow())
                    }
                    Some(PreviousBinding::NotPublished) => {
                        println!("  Current: {}", "not published".dimmed())
                    }
                    Some(PreviousBinding::Unknown { reason }) => {
                        println!("  Current: {} ({reason})", "unknown".red())
                    }
                    Some(PreviousBinding::NotChecked) | None => {}
                }
            }
        }
    }

    if matches!(format, OutputFormat::Json) {
        println!("{}", serde_json::to_string_pretty(&json!({ "environments": rows }))?);
    } else if registry.is_empty() {
        println!("No environments configured.");
    }
    Ok(())
}

fn cmd_keygen(format: OutputFormat) -> anyhow::Result<()> {
    let credential = OwningCredential::generate();
    let name = credential.name();
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "name": name.to_string(),
                "credential": credential.to_hex(),
            }))?
        ),
        OutputFormat::Text => {
            println!("{} Generated owning credential", "✓".green().bold());
            println!("  Name: {}", name.to_string().cyan());
            println!("  Credential: {}", credential.to_hex());
            println!("  {}", "Keep the credential secret; anyone holding it can repoint the name.".dimmed());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn services() -> ServiceArgs {
        ServiceArgs {
            pinning_api: "http://127.0.0.1:9".into(),
            naming_api: "http://127.0.0.1:9".into(),
            gateway: "https://w3s.link".into(),
            timeout_secs: Some(1),
            record_validity_days: 365,
            dry_run: true,
        }
    }

    fn write(dir: &tempfile::TempDir, file: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(file);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn dry_run_publish_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let cred = OwningCredential::generate();
        let config = write(
            &dir,
            "envs.toml",
            &format!(
                "[_env]\nserviceCredential = \"tok\"\n\n[dev]\ncredential = \"{}\"\n",
                cred.to_hex()
            ),
        );
        let snapshot = write(&dir, "snap.json", r#"{"feature":"on","retries":3}"#);
        let args = PublishArgs {
            config,
            env: "dev".into(),
            snapshot,
            services: services(),
        };
        cmd_publish(args, OutputFormat::Json).await.unwrap();
    }

    #[tokio::test]
    async fn dry_run_publish_without_service_credential_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cred = OwningCredential::generate();
        let config = write(&dir, "envs.toml", &format!("[dev]\npublicName = \"{}\"\n", cred.name()));
        let snapshot = write(&dir, "snap.json", r#"{"a":"1"}"#);
        let args = PublishArgs {
            config,
            env: "dev".into(),
            snapshot,
            services: services(),
        };
        assert!(cmd_publish(args, OutputFormat::Text).await.is_err());
    }

    #[test]
    fn nested_snapshot_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "snap.json", r#"{"a":{"b":"c"}}"#);
        assert!(read_snapshot(&path).is_err());
    }

    #[tokio::test]
    async fn status_offline_lists_environments() {
        let dir = tempfile::tempdir().unwrap();
        let cred = OwningCredential::generate();
        let config = write(&dir, "envs.json", &format!(r#"{{"qa":{{"publicName":"{}"}}}}"#, cred.name()));
        let args = StatusArgs {
            config,
            offline: true,
            services: services(),
        };
        cmd_status(args, OutputFormat::Json).await.unwrap();
    }

    #[test]
    fn zero_validity_rejected() {
        let mut args = services();
        args.record_validity_days = 0;
        assert!(build_publisher(&args).is_err());
    }

    #[test]
    fn keygen_runs() {
        cmd_keygen(OutputFormat::Text).unwrap();
    }
}
