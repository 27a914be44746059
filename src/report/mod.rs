//! Report generation for subnet plans.
//!
//! Every formatter consumes the same [`VlsmPlan`]; picking a format only
//! changes how the plan is rendered, never how it was computed.

pub mod json;
pub mod text;

use std::fs;
use std::path::Path;

use color_eyre::eyre::Context;
use color_eyre::Result;
use serde::{Deserialize, Serialize};

use crate::vlsm::VlsmPlan;

pub use json::JsonReport;
pub use text::{
    render_advanced_lab, render_equal_subnetting, render_network_details, render_topology,
    DetailedTextReport, SummaryTextReport,
};

/// Renders a plan into a document
pub trait ReportFormatter {
    fn render(&self, plan: &VlsmPlan) -> Result<String>;
}

/// Available report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Detailed,
    Summary,
    Json,
}

impl ReportFormat {
    pub fn formatter(self) -> Box<dyn ReportFormatter> {
        match self {
            ReportFormat::Detailed => Box::new(DetailedTextReport),
            ReportFormat::Summary => Box::new(SummaryTextReport),
            ReportFormat::Json => Box::new(JsonReport),
        }
    }
}

/// Write a rendered report to disk
pub fn write_report(content: &str, output_path: &Path) -> Result<()> {
    fs::write(output_path, content)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    log::info!("Report written to {}", output_path.display());
    Ok(())
}
