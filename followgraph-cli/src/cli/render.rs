//! Writers for the edge list, relationship matrix and DOT outputs.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use followgraph_core::{GeneratedGraph, RelationshipCode};

use super::commands::{CliError, GenerationSummary, OutputFormat};

/// Smallest and largest DOT node widths, in inches.
const MIN_NODE_WIDTH: f64 = 0.4;
const MAX_NODE_WIDTH: f64 = 2.0;

/// Renders `summary` to `writer` in its requested format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_summary(summary: &GenerationSummary, writer: impl Write) -> io::Result<()> {
    match summary.format {
        OutputFormat::Edges => render_edges(&summary.graph, writer),
        OutputFormat::Matrix => render_matrix(&summary.graph, writer),
        OutputFormat::Dot => render_dot(&summary.roster, &summary.graph, writer),
    }
}

/// Writes `summary` to its `--out` file, or to `stdout` when none was given.
///
/// # Errors
/// Returns [`CliError::Io`] when the file cannot be created or written.
pub fn write_summary(summary: &GenerationSummary) -> Result<(), CliError> {
    match &summary.out {
        Some(path) => {
            let io_error = |source| CliError::Io {
                path: path.clone(),
                source,
            };
            let file = File::create(path).map_err(io_error)?;
            let mut writer = BufWriter::new(file);
            render_summary(summary, &mut writer).map_err(io_error)?;
            writer.flush().map_err(io_error)
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            let io_error = |source| CliError::Io {
                path: "<stdout>".into(),
                source,
            };
            render_summary(summary, &mut writer).map_err(io_error)?;
            writer.flush().map_err(io_error)
        }
    }
}

/// Writes one `follower\tfollowed` line per edge after a header row.
///
/// # Errors
/// Returns [`io::Error`] if writing fails.
///
/// # Examples
/// ```
/// # use followgraph_cli::cli::render_edges;
/// # use followgraph_core::{GraphBuilder, PersonaRecord};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let roster = (0..3)
///     .map(|i| PersonaRecord::new(format!("P{i}"), format!("p{i}"), "f"))
///     .collect();
/// let generated = GraphBuilder::new().build()?.generate("trio", roster)?;
/// let mut out = Vec::new();
/// render_edges(&generated, &mut out)?;
/// let text = String::from_utf8(out)?;
/// assert_eq!(text.lines().next(), Some("follower\tfollowed"));
/// assert_eq!(text.lines().count(), 7);
/// # Ok(())
/// # }
/// ```
pub fn render_edges(graph: &GeneratedGraph, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "follower\tfollowed")?;
    for (follower, followed) in graph.edge_handles() {
        writeln!(writer, "{follower}\t{followed}")?;
    }
    Ok(())
}

/// Writes the relationship matrix with handles labelling both axes.
///
/// Cells hold `0` (none), `1` (row follows column), `2` (mutual) or `3`
/// (column follows row).
///
/// # Errors
/// Returns [`io::Error`] if writing fails.
pub fn render_matrix(graph: &GeneratedGraph, mut writer: impl Write) -> io::Result<()> {
    let registry = graph.registry();
    let matrix = graph.relationship_matrix();

    write!(writer, "handle")?;
    for persona in registry.iter() {
        write!(writer, "\t{}", persona.handle())?;
    }
    writeln!(writer)?;

    for (persona, row) in registry.iter().zip(matrix.rows()) {
        write!(writer, "{}", persona.handle())?;
        for code in row {
            write!(writer, "\t{}", RelationshipCode::as_u8(code))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Writes a Graphviz digraph. Node width grows with follower count; labels
/// show the persona name and tooltips add the follower count.
///
/// # Errors
/// Returns [`io::Error`] if writing fails.
pub fn render_dot(roster: &str, graph: &GeneratedGraph, mut writer: impl Write) -> io::Result<()> {
    let registry = graph.registry();
    let max_in = registry
        .iter()
        .map(|persona| persona.current_in())
        .max()
        .unwrap_or(0)
        .max(1);

    writeln!(writer, "digraph \"{}\" {{", escape(roster))?;
    writeln!(writer, "  node [shape=circle, fixedsize=true];")?;
    for persona in registry.iter() {
        let followers = persona.current_in();
        let width = node_width(followers, max_in);
        writeln!(
            writer,
            "  \"{handle}\" [label=\"{name}\", tooltip=\"{name} ({followers} followers)\", width={width:.2}];",
            handle = escape(persona.handle()),
            name = escape(persona.name()),
        )?;
    }
    for (follower, followed) in graph.edge_handles() {
        writeln!(
            writer,
            "  \"{}\" -> \"{}\";",
            escape(follower),
            escape(followed)
        )?;
    }
    writeln!(writer, "}}")
}

fn node_width(followers: u64, max_in: u64) -> f64 {
    let share = followers as f64 / max_in as f64;
    MIN_NODE_WIDTH + (MAX_NODE_WIDTH - MIN_NODE_WIDTH) * share
}

fn escape(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}
