//! `purlscope evinse` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use purlscope_core::config::PurlscopeConfig;
use purlscope_evidence::{
    EngineConfig, EngineConfigBuilder, EvidenceEngine, EvidenceReport, EvidenceStatus, Language,
};

use crate::cli::EvinseArgs;
use crate::commands::{load_config, resolve_db_path};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `evinse` command.
pub async fn execute(
    args: EvinseArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = load_config(config_path).await?;
    let maps_output = args.maps_output.clone();
    let engine_config = build_engine_config(args, &config)?;

    info!(
        input = %engine_config.input,
        language = %engine_config.language,
        "starting evidence run"
    );

    let engine = EvidenceEngine::builder().config(engine_config).build()?;
    let report = engine.run().await?;

    if let Some(path) = maps_output {
        let json = serde_json::to_string_pretty(&report.maps)?;
        tokio::fs::write(&path, json).await?;
        info!(path = %path.display(), "evidence maps written");
    }

    writer.render(&EvinseReport::from(&report))?;
    Ok(())
}

/// Merge CLI flags over the `[evidence]` section.
///
/// Boolean flags only switch features on; they never turn off a feature enabled in the file.
fn build_engine_config(
    args: EvinseArgs,
    config: &PurlscopeConfig,
) -> Result<EngineConfig, CliError> {
    let evidence = &config.evidence;
    let mut builder = EngineConfigBuilder::from_core(evidence)
        .input(args.input.display().to_string())
        .with_data_flow(args.with_data_flow || evidence.with_data_flow)
        .with_reachables(args.with_reachables || evidence.with_reachables)
        .include_crypto(args.include_crypto || evidence.include_crypto)
        .annotate(args.annotate || evidence.annotate);

    if let Some(output) = args.output {
        builder = builder.output(output.display().to_string());
    }
    if let Some(name) = args.language {
        let language = Language::from_str_loose(&name)
            .ok_or_else(|| CliError::Command(format!("unsupported language: {name}")))?;
        builder = builder.language(language);
    }
    if let Some(db_path) = resolve_db_path(args.db_path, config) {
        builder = builder.db_path(db_path);
    }
    if let Some(path) = args.usages_slices_file {
        builder = builder.usages_slice_path(path.display().to_string());
    }
    if let Some(path) = args.data_flow_slices_file {
        builder = builder.data_flow_slice_path(path.display().to_string());
    }
    if let Some(path) = args.reachables_slices_file {
        builder = builder.reachables_slice_path(path.display().to_string());
    }
    if let Some(path) = args.semantics_slices_file {
        builder = builder.semantics_slice_path(path.display().to_string());
    }
    if let Some(path) = args.crypto_catalog {
        builder = builder.crypto_catalog_path(path.display().to_string());
    }

    Ok(builder.build()?)
}

/// Summary of one evidence run.
#[derive(Debug, Serialize)]
pub struct EvinseReport {
    pub output: String,
    pub status: String,
    pub occurrences: usize,
    pub callstacks: usize,
    pub services: usize,
    pub crypto_components: usize,
    pub crypto_providers: usize,
    pub index_queries: u64,
    pub cache_hits: u64,
    pub slices: Vec<SliceEntry>,
}

/// Load outcome of one slice kind.
#[derive(Debug, Serialize)]
pub struct SliceEntry {
    pub kind: String,
    pub result: String,
}

impl From<&EvidenceReport> for EvinseReport {
    fn from(report: &EvidenceReport) -> Self {
        Self {
            output: report.output.clone(),
            status: report.status.as_str().to_owned(),
            occurrences: report.summary.occurrences,
            callstacks: report.summary.callstacks,
            services: report.summary.services,
            crypto_components: report.summary.crypto_components,
            crypto_providers: report.summary.crypto_providers,
            index_queries: report.index_queries,
            cache_hits: report.cache_hits,
            slices: report
                .slices
                .iter()
                .map(|(kind, result)| SliceEntry {
                    kind: kind.as_str().to_owned(),
                    result: (*result).to_owned(),
                })
                .collect(),
        }
    }
}

impl Render for EvinseReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let status = match self.status.as_str() {
            s if s == EvidenceStatus::Attached.as_str() => s.green().bold(),
            s => s.yellow().bold(),
        };
        writeln!(w, "Evidence: {} ({})", self.output.bold(), status)?;
        writeln!(w)?;
        writeln!(w, "  {:<20} {}", "Occurrences:", self.occurrences)?;
        writeln!(w, "  {:<20} {}", "Call stacks:", self.callstacks)?;
        writeln!(w, "  {:<20} {}", "Services:", self.services)?;
        writeln!(w, "  {:<20} {}", "Crypto assets:", self.crypto_components)?;
        writeln!(w, "  {:<20} {}", "Crypto providers:", self.crypto_providers)?;
        writeln!(
            w,
            "  {:<20} {} ({} cached)",
            "Index queries:", self.index_queries, self.cache_hits
        )?;

        if !self.slices.is_empty() {
            writeln!(w)?;
            writeln!(w, "  {:<14} {}", "Slice", "Result")?;
            writeln!(w, "  {}", "-".repeat(28))?;
            for slice in &self.slices {
                writeln!(w, "  {:<14} {}", slice.kind, slice.result)?;
            }
        }

        Ok(())
    }
}
