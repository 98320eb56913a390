use anyhow::Context as _;
use clap::Parser;
use prereq::{Course, Language, domain::language};
use regex::Regex;
use serde::Serialize;
use tracing::instrument;

use super::{Context, terminal};

/// Command arguments for `prereq list`.
#[derive(Debug, Parser)]
#[command(about = "List the courses of the active curriculum periods")]
pub struct List {
    /// Regular expression matched against course codes and names.
    #[arg(long, short, value_name = "REGEX")]
    matching: Option<String>,

    /// Show only courses that declare prerequisites.
    #[arg(long)]
    with_prerequisites: bool,

    /// Limit number of rows returned (0 = unlimited).
    #[arg(long, default_value_t = 0)]
    limit: usize,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,

    /// Print only the course codes, one per line.
    #[arg(long, short, conflicts_with = "output")]
    quiet: bool,
}

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, clap::ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// One listed course.
#[derive(Debug, Serialize, PartialEq, Eq)]
struct Row<'a> {
    code: &'a str,
    name: &'a str,
}

impl List {
    #[instrument(level = "debug", skip_all)]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let catalog = context.open()?;
        let pattern = self
            .matching
            .as_deref()
            .map(Regex::new)
            .transpose()
            .context("invalid --matching pattern")?;

        let rows = self.select(
            catalog.index().courses(),
            pattern.as_ref(),
            catalog.config().language(),
        );

        match self.output {
            OutputFormat::Table if self.quiet => {
                for row in &rows {
                    println!("{}", row.code);
                }
            }
            OutputFormat::Table => render_table(&rows, terminal::terminal_width()),
            OutputFormat::Json => {
                serde_json::to_writer_pretty(std::io::stdout(), &rows)
                    .context("failed to render json output")?;
                println!();
            }
        }

        Ok(())
    }

    fn select<'a>(
        &self,
        courses: &'a [Course],
        pattern: Option<&Regex>,
        language: Language,
    ) -> Vec<Row<'a>> {
        let rows = courses
            .iter()
            .filter(|course| !self.with_prerequisites || course.has_prerequisites())
            .map(|course| Row {
                code: &course.code,
                name: language::select(course.name.as_ref(), language),
            })
            .filter(|row| {
                pattern.is_none_or(|pattern| pattern.is_match(row.code) || pattern.is_match(row.name))
            });

        if self.limit > 0 {
            rows.take(self.limit).collect()
        } else {
            rows.collect()
        }
    }
}

fn render_table(rows: &[Row<'_>], width: Option<usize>) {
    let code_width = rows
        .iter()
        .map(|row| row.code.chars().count())
        .max()
        .unwrap_or(0)
        .max("CODE".len());

    println!("{:<code_width$}  NAME", "CODE");
    println!("{:-<code_width$}  {:-<4}", "", "");

    for row in rows {
        let name = match width {
            Some(width) if width > code_width + 2 => terminal::truncate(row.name, width - code_width - 2),
            _ => row.name.to_string(),
        };
        println!("{:<code_width$}  {name}", row.code);
    }
}
