//! Report writers for the assessment output contract.

use anyhow::Result;
use chrono::Utc;
use colored::*;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

use crate::risk::classification::{ChangeAssessment, RiskLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

/// One assessed plan, labeled when several plans run in one invocation.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentRun {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<PathBuf>,
    #[serde(flatten)]
    pub assessment: ChangeAssessment,
}

pub trait OutputWriter {
    fn write_runs(&mut self, runs: &[AssessmentRun]) -> Result<()>;
}

pub fn create_writer(format: OutputFormat, writer: Box<dyn Write>) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
    }
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_runs(&mut self, runs: &[AssessmentRun]) -> Result<()> {
        // A single run emits the bare assessment object; several runs emit
        // an array labeled by plan.
        let json = match runs {
            [only] => serde_json::to_string_pretty(&only.assessment)?,
            many => serde_json::to_string_pretty(many)?,
        };
        writeln!(self.writer, "{json}")?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_header(&mut self) -> Result<()> {
        writeln!(self.writer, "# Blastmap Change Risk Assessment")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Generated: {}",
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_assessment(&mut self, run: &AssessmentRun) -> Result<()> {
        let assessment = &run.assessment;
        match &run.plan {
            Some(plan) => writeln!(self.writer, "## Plan: {}", plan.display())?,
            None => writeln!(self.writer, "## Assessment")?,
        }
        writeln!(self.writer)?;

        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        writeln!(
            self.writer,
            "| Risk level | **{}** |",
            assessment.risk_level.label()
        )?;
        writeln!(
            self.writer,
            "| ITIL change type | {} |",
            assessment.itil_change_type.label()
        )?;
        writeln!(
            self.writer,
            "| Approval required | {} |",
            assessment.approval_required.label()
        )?;
        writeln!(
            self.writer,
            "| Final score | {:.4} |",
            assessment.final_score
        )?;
        writeln!(self.writer, "| Average risk | {:.4} |", assessment.avg_risk)?;
        writeln!(self.writer, "| Max risk | {:.4} |", assessment.max_risk)?;
        writeln!(
            self.writer,
            "| Blast radius | {:.0}% ({} of {} components) |",
            assessment.blast_radius_factor * 100.0,
            assessment.affected_components,
            assessment.total_components
        )?;
        writeln!(self.writer)?;

        if !assessment.components.is_empty() {
            writeln!(self.writer, "### Affected Components")?;
            writeln!(self.writer)?;
            writeln!(
                self.writer,
                "| Component | Change | Criticality | Effective Score |"
            )?;
            writeln!(
                self.writer,
                "|-----------|--------|-------------|-----------------|"
            )?;
            for risk in &assessment.components {
                writeln!(
                    self.writer,
                    "| {} | {} | {} | {:.4} |",
                    risk.component_id, risk.change_type, risk.criticality, risk.effective_score
                )?;
            }
            writeln!(self.writer)?;
        }

        if !assessment.warnings.is_empty() {
            writeln!(self.writer, "### Warnings")?;
            writeln!(self.writer)?;
            for warning in &assessment.warnings {
                writeln!(self.writer, "- {warning}")?;
            }
            writeln!(self.writer)?;
        }

        writeln!(self.writer, "### Recommendations")?;
        writeln!(self.writer)?;
        for recommendation in &assessment.recommendations {
            writeln!(self.writer, "- {recommendation}")?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_runs(&mut self, runs: &[AssessmentRun]) -> Result<()> {
        self.write_header()?;
        for run in runs {
            self.write_assessment(run)?;
        }
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_assessment(&mut self, run: &AssessmentRun) -> Result<()> {
        let assessment = &run.assessment;

        if let Some(plan) = &run.plan {
            writeln!(self.writer, "{}", format!("Plan: {}", plan.display()).bold())?;
        }
        writeln!(
            self.writer,
            "Risk level: {} (score {:.4})",
            level_badge(assessment.risk_level),
            assessment.final_score
        )?;
        writeln!(
            self.writer,
            "ITIL change type: {}, approval: {}",
            assessment.itil_change_type.label(),
            assessment.approval_required.label()
        )?;
        writeln!(
            self.writer,
            "Blast radius: {} of {} components affected ({:.0}%)",
            assessment.affected_components,
            assessment.total_components,
            assessment.blast_radius_factor * 100.0
        )?;
        writeln!(
            self.writer,
            "Average risk {:.4}, max risk {:.4}",
            assessment.avg_risk, assessment.max_risk
        )?;

        if !assessment.components.is_empty() {
            writeln!(self.writer)?;
            writeln!(self.writer, "{}", "Components:".bold())?;
            for risk in &assessment.components {
                writeln!(
                    self.writer,
                    "  {:.4}  {:<9} {} ({})",
                    risk.effective_score,
                    risk.change_type.as_str(),
                    risk.component_id,
                    risk.criticality
                )?;
            }
        }

        if !assessment.warnings.is_empty() {
            writeln!(self.writer)?;
            writeln!(self.writer, "{}", "Warnings:".yellow().bold())?;
            for warning in &assessment.warnings {
                writeln!(self.writer, "  {}", warning.to_string().yellow())?;
            }
        }

        writeln!(self.writer)?;
        writeln!(self.writer, "{}", "Recommendations:".bold())?;
        for recommendation in &assessment.recommendations {
            writeln!(self.writer, "  - {recommendation}")?;
        }
        Ok(())
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_runs(&mut self, runs: &[AssessmentRun]) -> Result<()> {
        writeln!(self.writer, "{}", "Change Risk Assessment".bold())?;
        writeln!(self.writer)?;
        for (index, run) in runs.iter().enumerate() {
            if index > 0 {
                writeln!(self.writer)?;
            }
            self.write_assessment(run)?;
        }
        Ok(())
    }
}

fn level_badge(level: RiskLevel) -> ColoredString {
    match level {
        RiskLevel::Low => level.label().green(),
        RiskLevel::Medium => level.label().yellow(),
        RiskLevel::High => level.label().red(),
        RiskLevel::Critical => level.label().red().bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::ChangeRiskAnalyzer;
    use crate::config::RiskPolicy;
    use crate::core::{Change, ChangeSet, ChangeType, Component};
    use crate::graph::DependencyGraph;
    use indoc::indoc;

    fn sample_run(plan: Option<&str>) -> AssessmentRun {
        let mut graph = DependencyGraph::new();
        graph.add_component(Component::new("vpc"));
        let mut db = Component::new("db");
        db.dependency_count = 1;
        graph.add_component(db);
        graph.add_dependency("db", "vpc");

        let changes = ChangeSet::from_changes(vec![Change {
            component_id: "vpc".to_string(),
            change_type: ChangeType::Delete,
        }]);
        let assessment = ChangeRiskAnalyzer::new(RiskPolicy::default())
            .unwrap()
            .assess(&graph, &changes);

        AssessmentRun {
            plan: plan.map(PathBuf::from),
            assessment,
        }
    }

    fn render(format: OutputFormat, runs: &[AssessmentRun]) -> String {
        let mut buffer = Vec::new();
        match format {
            OutputFormat::Json => JsonWriter::new(&mut buffer).write_runs(runs).unwrap(),
            OutputFormat::Markdown => MarkdownWriter::new(&mut buffer).write_runs(runs).unwrap(),
            OutputFormat::Terminal => TerminalWriter::new(&mut buffer).write_runs(runs).unwrap(),
        }
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn single_run_json_is_the_bare_output_contract() {
        let output = render(OutputFormat::Json, &[sample_run(None)]);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["risk_level"], "medium");
        assert_eq!(value["itil_change_type"], "normal");
        assert_eq!(value["approval_required"], "team_lead");
        assert_eq!(value["total_components"], 2);
        assert_eq!(value["affected_components"], 2);
        assert_eq!(value["components"][0]["id"], "vpc");
        assert_eq!(value["components"][0]["change_type"], "delete");
        assert!(value["recommendations"].as_array().unwrap().len() >= 4);
        assert!(value.get("plan").is_none());
    }

    #[test]
    fn multiple_runs_serialize_as_labeled_array() {
        let runs = [sample_run(Some("plans/a.json")), sample_run(Some("plans/b.json"))];
        let output = render(OutputFormat::Json, &runs);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[0]["plan"], "plans/a.json");
        assert_eq!(array[1]["risk_level"], "medium");
    }

    #[test]
    fn markdown_contains_summary_and_component_tables() {
        let output = render(OutputFormat::Markdown, &[sample_run(None)]);

        assert!(output.starts_with("# Blastmap Change Risk Assessment"));
        assert!(output.contains("| Risk level | **medium** |"));
        assert!(output.contains("| Blast radius | 100% (2 of 2 components) |"));

        let expected_components = indoc! {"
            | Component | Change | Criticality | Effective Score |
            |-----------|--------|-------------|-----------------|
            | vpc | delete | medium | 0.2625 |
            | db | no_change | medium | 0.2000 |
        "};
        assert!(output.contains(expected_components));
        assert!(output.contains("### Recommendations"));
    }

    #[test]
    fn terminal_output_reports_level_and_components() {
        colored::control::set_override(false);
        let output = render(OutputFormat::Terminal, &[sample_run(Some("plan.json"))]);
        colored::control::unset_override();

        assert!(output.contains("Change Risk Assessment"));
        assert!(output.contains("Plan: plan.json"));
        assert!(output.contains("Risk level: medium (score 0.3175)"));
        assert!(output.contains("2 of 2 components affected (100%)"));
        assert!(output.contains("0.2625  delete    vpc (medium)"));
        assert!(output.contains("Recommendations:"));
    }
}
