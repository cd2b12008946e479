//! Codegraph Go CLI
//!
//! Lowers a Go file or project into the code property graph and prints a
//! summary.
//!
//! # Usage
//!
//! ```bash
//! # One file, with its declaration outline
//! cargo run --bin codegraph-go -- file main.go --outline
//!
//! # A whole module (reads go.mod at the root)
//! RUST_LOG=codegraph_go=debug cargo run --bin codegraph-go -- project ./svc
//! ```

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use codegraph_go::{
    Declaration, FrontendConfig, GoFrontend, LoweredFile, NodeId, ProjectLowering,
};
use tracing::error;

#[derive(Parser)]
#[command(name = "codegraph-go")]
#[command(about = "Lower Go sources into a code property graph", long_about = None)]
struct Cli {
    /// YAML frontend configuration (version 1)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print the declaration outline of every file
    #[arg(long, global = true)]
    outline: bool,

    /// Print every recorded problem
    #[arg(long, global = true)]
    problems: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lower a single file
    File {
        path: PathBuf,

        /// Project root used for the namespace path (go.mod lookup)
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Lower every .go file under a directory
    Project {
        root: PathBuf,

        /// Include _test.go files
        #[arg(long)]
        tests: bool,

        /// Lower files sequentially
        #[arg(long)]
        sequential: bool,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!(error = %e, "lowering failed");
            eprintln!("error: {}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// `Ok(false)` when some project file failed to lower
fn run(cli: Cli) -> codegraph_go::Result<bool> {
    let mut config = match &cli.config {
        Some(path) => FrontendConfig::from_yaml(path)?,
        None => FrontendConfig::default(),
    };

    match cli.command {
        Commands::File { path, root } => {
            let frontend = GoFrontend::new(config)?;
            let lowered = frontend.lower_file(&path, root.as_deref())?;
            print_file(&lowered, cli.outline, cli.problems);
            Ok(true)
        }
        Commands::Project {
            root,
            tests,
            sequential,
        } => {
            if tests {
                config = config.include_test_files(true);
            }
            if sequential {
                config = config.parallel(false);
            }
            let frontend = GoFrontend::new(config)?;
            let project = frontend.lower_project(&root)?;
            print_project(&project, cli.outline, cli.problems);
            Ok(project.failures.is_empty())
        }
    }
}

fn print_project(project: &ProjectLowering, outline: bool, problems: bool) {
    println!(
        "module: {}",
        project.module_path.as_deref().unwrap_or("(no manifest)")
    );
    for file in &project.files {
        print_file(file, outline, problems);
    }
    for (path, e) in &project.failures {
        println!("FAILED {}: {}", path, e);
    }
    println!(
        "{} files, {} nodes, {} problems, {} failures",
        project.files.len(),
        project.node_count(),
        project.problem_count(),
        project.failures.len()
    );
}

fn print_file(file: &LoweredFile, outline: bool, problems: bool) {
    println!(
        "{}  package {}  namespace {}  ({} nodes, {} problems)",
        file.path,
        file.package,
        file.namespace_path,
        file.graph.len(),
        file.total_problems()
    );
    if outline {
        print_outline(file, file.namespace, 1);
    }
    if problems {
        for problem in &file.problems {
            println!("  ! {}", problem);
        }
        if file.suppressed_problems > 0 {
            println!("  ! ... {} more", file.suppressed_problems);
        }
    }
}

fn print_outline(file: &LoweredFile, id: NodeId, depth: usize) {
    let Some(node) = file.node(id) else {
        return;
    };
    let Some(decl) = node.as_declaration() else {
        return;
    };
    let indent = "  ".repeat(depth);
    let ty = node.ty().map(|t| format!(" : {}", t)).unwrap_or_default();
    let name = if node.fqn.is_empty() { &node.name } else { &node.fqn };
    println!("{}{} {}{}", indent, decl.label(), name, ty);

    let members: Vec<NodeId> = match decl {
        // Attached methods are printed under their record
        Declaration::Namespace { declarations, .. } => declarations
            .iter()
            .copied()
            .filter(|d| {
                !matches!(
                    file.node(*d).and_then(|n| n.as_declaration()),
                    Some(Declaration::Method { record: Some(_), .. })
                )
            })
            .collect(),
        Declaration::Record {
            fields, methods, ..
        } => fields.iter().chain(methods).copied().collect(),
        _ => Vec::new(),
    };
    for member in members {
        print_outline(file, member, depth + 1);
    }
}
