use clap::{ArgAction, Parser, ValueHint};
use qwalk::io::{self, FileKind, QwmlDocument};
use qwalk::{Graph, ProbabilityTable, QwError, WalkParametersBuilder, Walker, DEFAULT_COMMENT, DEFAULT_STEPS};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

#[derive(Parser, Debug)]
#[command(author, version, about = "Discrete-time quantum walks and Grover search on graphs")]
struct Cli {
    /// Adjacency matrix (.adj) to compute on, or a QWML file (.qwml) to inspect
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// 1-indexed start vertex of a walk
    #[arg(long, value_name = "V", conflicts_with = "search")]
    start: Option<usize>,

    /// 1-indexed marked vertex of a search
    #[arg(long, value_name = "V")]
    search: Option<usize>,

    /// Number of time steps to record
    #[arg(long, default_value_t = DEFAULT_STEPS)]
    steps: usize,

    /// Output file: .qwml for a QWML document, anything but .adj for a raw grid
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Comment stored in QWML output
    #[arg(long, default_value = DEFAULT_COMMENT)]
    comment: String,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let ansi = std::io::stdout().is_terminal();
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true).with_ansi(ansi);
    Registry::default().with(filter).with(fmt_layer).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match FileKind::from_path(&cli.input) {
        FileKind::Adjacency => compute(&cli),
        FileKind::Qwml => inspect(&cli.input),
        FileKind::Raw => Err(QwError::InvalidParameter {
            message: format!("{}: input must be an .adj or .qwml file", cli.input.display()),
        }),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("qwalk: {}", err);
            ExitCode::FAILURE
        }
    }
}

/// Converts a 1-indexed command-line vertex to a 0-indexed one.
fn zero_indexed(vertex: usize, flag: &str) -> qwalk::Result<usize> {
    vertex.checked_sub(1).ok_or_else(|| QwError::InvalidParameter {
        message: format!("--{} counts vertices from 1", flag),
    })
}

fn compute(cli: &Cli) -> qwalk::Result<()> {
    if let Some(output) = &cli.output {
        output_kind(output)?;
    }
    let graph = io::read_adjacency(&cli.input)?;

    let mut builder = WalkParametersBuilder::new().steps(cli.steps);
    if let Some(v) = cli.start {
        builder = builder.start(zero_indexed(v, "start")?);
    }
    if let Some(v) = cli.search {
        builder = builder.marked(zero_indexed(v, "search")?);
    }
    let params = builder.build()?;

    let table = Walker::new().run(&graph, &params)?;
    print_summary(&graph, &table);

    if let Some(output) = &cli.output {
        write_output(output, graph, table, &cli.comment)?;
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputKind {
    Qwml,
    Raw,
}

/// Output format for `path`. An `.adj` target would receive probabilities
/// instead of a matrix, so it is refused.
fn output_kind(path: &Path) -> qwalk::Result<OutputKind> {
    match FileKind::from_path(path) {
        FileKind::Qwml => Ok(OutputKind::Qwml),
        FileKind::Raw => Ok(OutputKind::Raw),
        FileKind::Adjacency => Err(QwError::InvalidParameter {
            message: format!("{}: output must be a .qwml document or a raw grid, not .adj", path.display()),
        }),
    }
}

fn write_output(path: &Path, graph: Graph, table: ProbabilityTable, comment: &str) -> qwalk::Result<()> {
    match output_kind(path)? {
        OutputKind::Qwml => {
            let doc = QwmlDocument::new(graph, table)?.with_comment(comment);
            io::write_qwml(path, &doc)?;
        }
        OutputKind::Raw => io::write_raw(path, &table)?,
    }
    info!(path = %path.display(), "wrote probability data");
    Ok(())
}

fn inspect(path: &Path) -> qwalk::Result<()> {
    let doc = io::read_qwml(path)?;
    if let Some(name) = doc.filename() {
        println!("filename: {}", name);
    }
    if let Some(comment) = doc.comment() {
        println!("comment:  {}", comment);
    }
    println!("layout:   {}", if doc.layout().is_some() { "stored" } else { "none" });
    print_summary(doc.graph(), doc.table());
    Ok(())
}

fn print_summary(graph: &Graph, table: &ProbabilityTable) {
    println!("vertices: {}", graph.vertex_count());
    println!("edges:    {}", graph.edge_count());
    println!("steps:    {}", table.steps());
    println!("max probability: {:.8}", table.max_probability());
    if let Some(last) = table.steps().checked_sub(1).and_then(|t| table.step(t)) {
        let cells: Vec<String> = last.iter().map(|p| format!("{:.6}", p)).collect();
        println!("final distribution: {}", cells.join(" "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qwalk::{generators, quantum_walk};
    use tempfile::tempdir;

    fn cycle_run() -> qwalk::Result<(Graph, ProbabilityTable)> {
        let graph = generators::cycle(4);
        let table = quantum_walk(&graph, 0, 3)?;
        Ok((graph, table))
    }

    #[test]
    fn test_adjacency_output_is_refused() -> qwalk::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("out.adj");
        let (graph, table) = cycle_run()?;
        let err = write_output(&path, graph, table, DEFAULT_COMMENT).unwrap_err();
        assert!(matches!(err, QwError::InvalidParameter { .. }), "got {:?}", err);
        assert!(!path.exists());
        assert!(output_kind(Path::new("OUT.ADJ")).is_err());
        assert_eq!(output_kind(Path::new("walk.prob"))?, OutputKind::Raw);
        Ok(())
    }

    #[test]
    fn test_output_format_follows_extension() -> qwalk::Result<()> {
        let dir = tempdir()?;
        let (graph, table) = cycle_run()?;

        let raw = dir.path().join("out.prob");
        write_output(&raw, graph.clone(), table.clone(), DEFAULT_COMMENT)?;
        assert_eq!(io::read_raw(&raw)?.steps(), 3);

        let qwml = dir.path().join("out.qwml");
        write_output(&qwml, graph.clone(), table, "cli test")?;
        let doc = io::read_qwml(&qwml)?;
        assert_eq!(doc.graph(), &graph);
        assert_eq!(doc.comment(), Some("cli test"));
        Ok(())
    }

    #[test]
    fn test_command_line_vertices_start_at_one() {
        assert!(matches!(zero_indexed(1, "start"), Ok(0)));
        assert!(matches!(zero_indexed(0, "search"), Err(QwError::InvalidParameter { .. })));
    }
}
