use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::Parser;
use prereq::Catalog;
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use tracing::{debug, instrument};

use super::{Context, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Write the prerequisite tree of every listed course as JSON")]
pub struct Export {
    /// Directory to write `<code>.json` files into (created if missing)
    dir: PathBuf,
}

impl Export {
    #[instrument(level = "debug", skip_all, fields(dir = %self.dir.display()))]
    pub fn run(self, context: &Context) -> anyhow::Result<()> {
        let catalog = context.open()?;
        let written = export_all(&catalog, &self.dir)?;

        println!(
            "{}",
            format!("Exported {written} trees to {}", self.dir.display()).success()
        );
        Ok(())
    }
}

/// Writes one tree per distinct course code, returning how many files were
/// written.
fn export_all(catalog: &Catalog, dir: &Path) -> anyhow::Result<usize> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create {}", dir.display()))?;

    // Several records may share a code when period filtering is off.
    let codes: Vec<&str> = catalog
        .index()
        .codes()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    codes.par_iter().try_for_each(|code| {
        let tree = catalog.build_tree(code);
        let path = dir.join(file_name(code));
        let json = serde_json::to_vec_pretty(&tree)?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        debug!(path = %path.display(), "exported tree");
        anyhow::Ok(())
    })?;

    Ok(codes.len())
}

/// File name for a course code.
///
/// Path separators are percent-encoded (as is `%` itself), so distinct codes
/// always map to distinct files.
fn file_name(code: &str) -> String {
    let mut name = String::with_capacity(code.len() + 5);
    for c in code.chars() {
        match c {
            '%' => name.push_str("%25"),
            '/' => name.push_str("%2F"),
            '\\' => name.push_str("%5C"),
            c => name.push(c),
        }
    }
    name.push_str(".json");
    name
}
