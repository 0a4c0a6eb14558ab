//! Submit command handlers: `tsg` (structured JSON) and `form` (raw fields).

use std::io::{self, IsTerminal};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use abzdok_core::submit::payload::{FIELD_GLOBAL, FIELD_MONTH, FIELD_SORT, FIELD_VALIDATE};
use abzdok_core::{
    ArtifactSink, DirectorySink, FormPayload, StdoutSink, SubmitAndDownload, SubmitClient,
    SubmitOutcome, Variant,
};
use anyhow::{Context, Result, bail};
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use crate::app_config::Settings;
use crate::cli::{FormArgs, TsgArgs, parse_field_assignment};
use crate::terminal::{TerminalStatus, is_dumb_terminal, should_use_spinner};

/// Checkbox value the generator's own form sends.
const CHECKED: &str = "true";

pub async fn run_tsg_command(settings: &Settings, args: &TsgArgs, quiet: bool) -> Result<ExitCode> {
    if is_stdin(&args.global) && is_stdin(&args.month) {
        bail!("--global and --month cannot both read from stdin");
    }

    let global = read_input(&args.global).await?;
    let month = read_input(&args.month).await?;
    let form = tsg_form(global, month, !args.no_sort, !args.no_validate);

    let submit = build_component(settings, Variant::Structured, quiet)?;
    Ok(trigger(&submit, &form).await)
}

pub async fn run_form_command(
    settings: &Settings,
    args: &FormArgs,
    quiet: bool,
) -> Result<ExitCode> {
    let mut form = FormPayload::new();
    if let Some(path) = &args.fields_file {
        let raw = read_input(path).await?;
        for (name, value) in parse_fields_file(&raw)
            .with_context(|| format!("Failed to parse fields file '{}'", path.display()))?
        {
            form.push(name, value);
        }
    }
    for (name, value) in &args.fields {
        form.push(name.as_str(), value.as_str());
    }
    if form.is_empty() {
        bail!("No form fields given. Use --field KEY=VALUE or --fields-file FILE.");
    }

    let submit = build_component(settings, Variant::Form, quiet)?;
    Ok(trigger(&submit, &form).await)
}

/// Form state of the TimeSheetGenerator page: two JSON text areas and two
/// checkboxes.
fn tsg_form(global: String, month: String, sort: bool, validate: bool) -> FormPayload {
    let mut form = FormPayload::new().with(FIELD_GLOBAL, global).with(FIELD_MONTH, month);
    if sort {
        form.push(FIELD_SORT, CHECKED);
    }
    if validate {
        form.push(FIELD_VALIDATE, CHECKED);
    }
    form
}

fn build_component(settings: &Settings, variant: Variant, quiet: bool) -> Result<SubmitAndDownload> {
    let client = SubmitClient::with_timeouts(
        &settings.server.value,
        settings.connect_timeout_secs.value,
        settings.read_timeout_secs.value,
    )?;
    debug!(server = %client.server(), variant = variant.as_str(), "client ready");

    let sink: Arc<dyn ArtifactSink> = if settings.stdout {
        Arc::new(StdoutSink)
    } else {
        Arc::new(
            DirectorySink::new(settings.output_dir.value.clone())
                .overwriting(settings.overwrite.value),
        )
    };

    let use_spinner = should_use_spinner(io::stderr().is_terminal(), quiet, is_dumb_terminal());
    let status = Arc::new(TerminalStatus::new(use_spinner, quiet));

    Ok(SubmitAndDownload::new(client, variant, status, sink))
}

async fn trigger(submit: &SubmitAndDownload, form: &FormPayload) -> ExitCode {
    match submit.trigger(form).await {
        SubmitOutcome::Downloaded(location) => {
            info!(location = %location, "document saved");
            ExitCode::SUCCESS
        }
        SubmitOutcome::Failed(_) | SubmitOutcome::Superseded => ExitCode::FAILURE,
    }
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

async fn read_input(path: &Path) -> Result<String> {
    if is_stdin(path) {
        let mut buffer = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buffer)
            .await
            .context("Failed to read stdin")?;
        return Ok(buffer);
    }
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read '{}'", path.display()))
}

/// One `key=value` per line; blank lines and `#` comments are skipped.
fn parse_fields_file(raw: &str) -> Result<Vec<(String, String)>> {
    let mut fields = Vec::new();
    for (line_index, line) in raw.lines().enumerate() {
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        let field = parse_field_assignment(line)
            .map_err(|e| anyhow::anyhow!("line {}: {e}", line_index + 1))?;
        fields.push(field);
    }
    Ok(fields)
}
