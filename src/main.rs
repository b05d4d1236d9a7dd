//! `netctrl` - driver nodes, control paths and edge classes of a network read from an edge list.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use netctrl::{io::*, model::*, prelude::*};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "netctrl")]
#[command(author, version, about = "Structural controllability of complex networks", long_about = None)]
struct Cli {
    /// Edge list to read, `-` for standard input
    input: PathBuf,

    /// Controllability model
    #[arg(short, long, default_value_t = ModelKind::Liu)]
    model: ModelKind,

    /// What to print
    #[arg(short = 'M', long, value_enum, default_value_t = Mode::DriverNodes)]
    mode: Mode,

    /// Read the edges as undirected
    #[arg(long)]
    undirected: bool,

    /// Use the edge-based controllability measure (switchboard model only)
    #[arg(long)]
    edge_measure: bool,

    /// File with whitespace separated target node ids (liu model only)
    #[arg(short, long)]
    targets: Option<PathBuf>,

    /// Output file, standard output if omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log more (repeat for even more)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// One driver node per line
    DriverNodes,
    /// One control path per line
    ControlPaths,
    /// Counts and fractions of driver nodes and edge classes
    Statistics,
    /// JSON document of the annotated network
    Graph,
}

fn init_logging(cli: &Cli) {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        _ => "trace",
    };

    // RUST_LOG takes precedence over the command line
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn read_network(cli: &Cli) -> Result<Network> {
    let reader = EdgeListReader::new().directed(!cli.undirected);

    if cli.input == Path::new("-") {
        reader
            .try_read_graph(io::stdin().lock())
            .context("failed to read network from standard input")
    } else {
        reader
            .try_read_graph_file(&cli.input)
            .with_context(|| format!("failed to read network from {}", cli.input.display()))
    }
}

fn read_targets(path: &Path, graph: &Network) -> Result<Vec<Node>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

    let mut targets = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.with_context(|| format!("failed to read {}", path.display()))?;
        for token in line.split_whitespace() {
            let node: Node = token
                .parse()
                .with_context(|| format!("invalid target node `{token}` in {}", path.display()))?;
            anyhow::ensure!(
                node < graph.number_of_nodes(),
                "target node {node} does not exist in a network with {} nodes",
                graph.number_of_nodes()
            );
            targets.push(node);
        }
    }

    Ok(targets)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    info!(">> loading network");
    let graph = read_network(&cli)?;
    debug!(
        nodes = graph.number_of_nodes(),
        edges = graph.number_of_edges(),
        directed = graph.is_directed(),
        "network loaded"
    );

    let targets = cli
        .targets
        .as_deref()
        .map(|path| read_targets(path, &graph))
        .transpose()?;

    let mut model: Box<dyn ControllabilityModel<'_> + '_> = match cli.model {
        ModelKind::Switchboard if cli.edge_measure => Box::new(
            SwitchboardControllabilityModel::new().with_measure(ControllabilityMeasure::Edge),
        ),
        kind => kind.build(),
    };
    model.set_graph(Some(&graph));
    model.set_targets(targets.as_deref());

    info!(">> calculating control paths and driver nodes");
    model.calculate()?;
    info!(">> found {} driver node(s)", model.driver_nodes().len());

    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    match cli.mode {
        Mode::DriverNodes => {
            for u in model.driver_nodes() {
                writeln!(out, "{u}")?;
            }
        }
        Mode::ControlPaths => {
            let paths = model.control_paths();
            for path in paths {
                writeln!(out, "{}", path.display_with(paths))?;
            }
        }
        Mode::Statistics => {
            writeln!(out, "{}", ControlStatistics::from_model(model.as_ref())?)?;
        }
        Mode::Graph => {
            let document = AnnotatedNetwork::new(&graph, model.as_ref())?;
            serde_json::to_writer_pretty(&mut out, &document)?;
            writeln!(out)?;
        }
    }

    out.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct AnnotatedNode {
    id: Node,
    is_driver: bool,
}

#[derive(Serialize)]
struct AnnotatedEdge {
    id: EdgeId,
    source: Node,
    target: Node,
    edge_class: Option<EdgeClass>,
    path_type: Option<&'static str>,
    path_index: Option<usize>,
    path_order: Option<usize>,
}

/// The network with driver nodes, edge classes and the control path every edge belongs to
#[derive(Serialize)]
struct AnnotatedNetwork {
    directed: bool,
    model: ModelKind,
    controllability: f64,
    nodes: Vec<AnnotatedNode>,
    edges: Vec<AnnotatedEdge>,
}

impl AnnotatedNetwork {
    fn new(graph: &Network, model: &dyn ControllabilityModel<'_>) -> Result<Self> {
        let mut is_driver = vec![false; graph.len()];
        for &u in model.driver_nodes() {
            is_driver[u as usize] = true;
        }

        let classes = if model.supports_edge_classes() {
            Some(model.edge_classes()?)
        } else {
            None
        };

        let mut edges = graph
            .edge_ids()
            .map(|e| {
                let Edge(source, target) = graph.endpoints(e);
                AnnotatedEdge {
                    id: e,
                    source,
                    target,
                    edge_class: classes.as_ref().map(|c| c[e as usize]),
                    path_type: None,
                    path_index: None,
                    path_order: None,
                }
            })
            .collect::<Vec<_>>();

        for (index, path) in model.control_paths().iter().enumerate() {
            for (order, e) in path.edges(graph).into_iter().enumerate() {
                let edge = &mut edges[e as usize];
                if edge.path_index.is_none() {
                    edge.path_type = Some(path.name());
                    edge.path_index = Some(index);
                    edge.path_order = Some(order);
                }
            }
        }

        Ok(Self {
            directed: graph.is_directed(),
            model: model.kind(),
            controllability: model.controllability(),
            nodes: graph
                .vertices()
                .map(|id| AnnotatedNode {
                    id,
                    is_driver: is_driver[id as usize],
                })
                .collect(),
            edges,
        })
    }
}
