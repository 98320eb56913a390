use clap::Parser;
use prereq::domain::{DanglingReference, EntryCounts, PrerequisiteGraph};
use serde::Serialize;
use tracing::instrument;

use super::{Context, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Check the catalog for prerequisite cycles and broken references")]
pub struct Validate {
    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress all output except errors
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Serialize)]
struct ValidationResult<'a> {
    courses: usize,
    links: usize,
    entries: EntryCounts,
    cycles: Vec<Vec<&'a str>>,
    dangling: &'a [DanglingReference],
}

impl<'a> ValidationResult<'a> {
    fn check(graph: &'a PrerequisiteGraph<'a>, courses: usize) -> Self {
        Self {
            courses,
            links: graph.link_count(),
            entries: graph.entry_counts(),
            cycles: graph.cycles(),
            dangling: graph.dangling_references(),
        }
    }

    const fn has_issues(&self) -> bool {
        !self.cycles.is_empty() || !self.dangling.is_empty()
    }
}

impl Validate {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let catalog = context.open()?;
        let graph = catalog.graph();
        let result = ValidationResult::check(&graph, catalog.index().len());

        if !self.quiet {
            match self.output {
                OutputFormat::Table => print!("{}", render(&result)),
                OutputFormat::Json => {
                    serde_json::to_writer_pretty(std::io::stdout(), &result)?;
                    println!();
                }
            }
        }

        if result.has_issues() {
            std::process::exit(2);
        }

        Ok(())
    }
}

fn render(result: &ValidationResult<'_>) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} courses, {} prerequisite links",
        result.courses, result.links
    );
    let _ = writeln!(
        out,
        "{}",
        format!(
            "entries: {} courses, {} modules, {} unknown",
            result.entries.courses, result.entries.modules, result.entries.unknown
        )
        .dim()
    );

    if !result.cycles.is_empty() {
        let _ = writeln!(out, "\n{}", "Cycles".warning());
        for cycle in &result.cycles {
            let _ = writeln!(out, "  {}", cycle.join(" <-> "));
        }
    }

    if !result.dangling.is_empty() {
        let _ = writeln!(out, "\n{}", "Unresolved references".warning());
        for reference in result.dangling {
            let _ = writeln!(
                out,
                "  {} ({}) -> {}",
                reference.course, reference.kind, reference.reference
            );
        }
    }

    if !result.has_issues() {
        let _ = writeln!(out, "\n{}", "No problems found".success());
    }

    out
}

#[cfg(test)]
mod tests {
    use prereq::{
        Catalog, Config, Course, LocalizedString, Prerequisite, PrerequisiteGroup,
    };

    use super::*;

    fn catalog(courses: Vec<Course>) -> Catalog {
        let mut config = Config::default();
        config.filter_periods = false;
        Catalog::from_courses(courses, config)
    }

    fn course(code: &str, requires: &[&str]) -> Course {
        let course = Course::new(code, format!("g-{code}"), LocalizedString::finnish(code));
        if requires.is_empty() {
            return course;
        }
        course.with_compulsory(
            requires
                .iter()
                .map(|id| Prerequisite::course(format!("g-{id}")))
                .collect::<PrerequisiteGroup>(),
        )
    }

    #[test]
    fn clean_catalog_has_no_issues() {
        let catalog = catalog(vec![course("A", &["B"]), course("B", &[])]);
        let graph = catalog.graph();

        let result = ValidationResult::check(&graph, catalog.index().len());

        assert!(!result.has_issues());
        assert_eq!((result.courses, result.links), (2, 1));
        assert!(render(&result).contains("No problems found"));
    }

    #[test]
    fn reports_cycles_and_dangling_references() {
        let catalog = catalog(vec![
            course("A", &["B"]),
            course("B", &["A", "MISSING"]),
        ]);
        let graph = catalog.graph();

        let result = ValidationResult::check(&graph, catalog.index().len());

        assert!(result.has_issues());
        assert_eq!(result.cycles, vec![vec!["A", "B"]]);
        assert_eq!(result.dangling.len(), 1);

        let text = render(&result);
        assert!(text.contains("A <-> B"));
        assert!(text.contains("B (compulsory) -> g-MISSING"));
    }

    #[test]
    fn run_succeeds_on_clean_catalog() {
        let (_tmp, context) = crate::cli::tests::fixture();
        let command = Validate {
            output: OutputFormat::Json,
            quiet: true,
        };

        command.run(&context).unwrap();
    }
}
