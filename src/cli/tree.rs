use std::fmt::Write as _;

use clap::Parser;
use non_empty_string::NonEmptyString;
use prereq::{DisplayNode, PrerequisiteKind, domain::NodeKind};
use tracing::{instrument, warn};

use super::{
    Context,
    terminal::{self, Style},
};

#[derive(Debug, Parser)]
#[command(about = "Show the prerequisite tree of a course")]
pub struct Tree {
    /// Course code (or group ID) of the course at the root of the tree
    #[clap(value_parser = super::parse_code)]
    code: NonEmptyString,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,

    /// Number of prerequisite levels to display (0 = unlimited)
    #[arg(long, value_name = "N", default_value_t = 0)]
    depth: usize,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    /// Indented outline
    #[default]
    Pretty,
    /// The display-node tree as JSON
    Json,
}

impl Tree {
    #[instrument(level = "debug", skip_all, fields(code = %self.code))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let catalog = context.open()?;
        let code = self.code.as_str();

        if !catalog.index().contains(code) {
            warn!("course {code} is not in the active catalog");
        }

        let tree = catalog.build_tree(code);

        match self.output {
            OutputFormat::Pretty => {
                let max_depth = (self.depth > 0).then_some(self.depth);
                print!("{}", render(&tree, max_depth, terminal::supports_color()));
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(std::io::stdout(), &tree)?;
                println!();
            }
        }

        Ok(())
    }
}

/// Renders a tree as an indented outline.
///
/// Levels below `max_depth` are summarised by a single elision line.
fn render(tree: &DisplayNode, max_depth: Option<usize>, colored: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", label(tree, colored));
    render_children(&mut out, tree, "", 1, max_depth, colored);
    out
}

fn render_children(
    out: &mut String,
    node: &DisplayNode,
    prefix: &str,
    level: usize,
    max_depth: Option<usize>,
    colored: bool,
) {
    let children = node.children();
    if children.is_empty() {
        return;
    }

    if max_depth.is_some_and(|max| level > max) {
        let hidden = node.node_count() - 1;
        let text = format!("… {hidden} more");
        let _ = writeln!(out, "{prefix}└── {}", Style::Dim.paint(&text, colored));
        return;
    }

    for (position, child) in children.iter().enumerate() {
        let last = position + 1 == children.len();
        let (branch, indent) = if last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        let _ = writeln!(out, "{prefix}{branch}{}", label(child, colored));
        render_children(
            out,
            child,
            &format!("{prefix}{indent}"),
            level + 1,
            max_depth,
            colored,
        );
    }
}

fn label(node: &DisplayNode, colored: bool) -> String {
    match (node.kind(), node.code()) {
        (Some(NodeKind::Group), _) => Style::Dim.paint(&node.name, colored),
        (Some(NodeKind::Course), Some(code)) => {
            // Cyclic back-references are the only course nodes without children.
            let name = if node.children.is_none() {
                Style::Warning.paint(&node.name, colored)
            } else if node.prerequisite_kind() == Some(PrerequisiteKind::Recommended) {
                Style::Info.paint(&node.name, colored)
            } else {
                node.name.clone()
            };
            format!("{name} {}", Style::Dim.paint(&format!("({code})"), colored))
        }
        _ if node.attributes.is_none() && node.children.is_none() => {
            Style::Warning.paint(&node.name, colored)
        }
        _ => node.name.clone(),
    }
}
