use anyhow::bail;
use clap::Parser;
use non_empty_string::NonEmptyString;
use prereq::{
    Catalog, Course, Language, PrerequisiteKind,
    domain::{PrerequisiteGraph, language},
};
use serde::Serialize;
use tracing::instrument;

use super::{Context, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Show detailed information about a course")]
pub struct Show {
    /// Course code (or group ID) of the course to display
    #[clap(value_parser = super::parse_code)]
    code: NonEmptyString,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

/// Everything `show` reports about one course.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Details<'a> {
    code: &'a str,
    group_id: &'a str,
    name: &'a str,
    curriculum_period_ids: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    study_level: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    compulsory_groups: usize,
    recommended_groups: usize,
    prerequisites: Vec<Link<'a>>,
    dependents: Vec<&'a str>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct Link<'a> {
    code: &'a str,
    kind: PrerequisiteKind,
}

impl<'a> Details<'a> {
    fn collect(course: &'a Course, graph: &PrerequisiteGraph<'a>, language: Language) -> Self {
        let mut dependents: Vec<_> = graph.dependents_of(&course.code).collect();
        dependents.sort_unstable();

        let mut prerequisites: Vec<_> = graph
            .prerequisites_of(&course.code)
            .map(|(code, kind)| Link { code, kind })
            .collect();
        prerequisites.sort_unstable_by_key(|link| (link.kind, link.code));

        Self {
            code: &course.code,
            group_id: &course.group_id,
            name: language::select(course.name.as_ref(), language),
            curriculum_period_ids: &course.curriculum_period_ids,
            study_level: course.study_level.as_deref(),
            description: course
                .prerequisites
                .as_ref()
                .and_then(|text| text.preferred(language)),
            compulsory_groups: course
                .prerequisite_groups(PrerequisiteKind::Compulsory)
                .len(),
            recommended_groups: course
                .prerequisite_groups(PrerequisiteKind::Recommended)
                .len(),
            prerequisites,
            dependents,
        }
    }
}

impl Show {
    #[instrument(level = "debug", skip_all, fields(code = %self.code))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let catalog = context.open()?;
        let details = Self::details(&catalog, self.code.as_str())?;

        match self.output {
            OutputFormat::Pretty => print!("{}", render(&details)),
            OutputFormat::Json => {
                serde_json::to_writer_pretty(std::io::stdout(), &details)?;
                println!();
            }
        }

        Ok(())
    }

    fn details<'a>(catalog: &'a Catalog, code: &str) -> anyhow::Result<Details<'a>> {
        let Some(course) = catalog.index().lookup(code) else {
            bail!("course {code} not found in the active catalog");
        };
        let graph = catalog.graph();
        Ok(Details::collect(
            course,
            &graph,
            catalog.config().language(),
        ))
    }
}

fn render(details: &Details<'_>) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();
    let _ = writeln!(out, "# {}", details.code);
    let _ = writeln!(out, "{}\n", details.name);

    let _ = writeln!(out, "{}", "Metadata".dim());
    let _ = writeln!(out, "  Group ID:  {}", details.group_id);
    if !details.curriculum_period_ids.is_empty() {
        let _ = writeln!(out, "  Periods:   {}", details.curriculum_period_ids.join(", "));
    }
    if let Some(level) = details.study_level {
        let _ = writeln!(out, "  Level:     {level}");
    }
    let _ = writeln!(
        out,
        "  Groups:    {} compulsory, {} recommended",
        details.compulsory_groups, details.recommended_groups
    );

    if let Some(description) = details.description {
        let _ = writeln!(out, "\n{}", "Prerequisites (as described)".dim());
        let _ = writeln!(out, "  {description}");
    }

    let _ = writeln!(out, "\n{}", "Requires".dim());
    if details.prerequisites.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for link in &details.prerequisites {
        let _ = writeln!(out, "  {} [{}]", link.code, link.kind);
    }

    let _ = writeln!(out, "\n{}", "Required by".dim());
    if details.dependents.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for code in &details.dependents {
        let _ = writeln!(out, "  {code}");
    }

    out
}
