use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use fuwrap::{Candidate, Composition, HandleId, InMemoryHost, Kind, Node, Object as _, Resolver};

#[derive(Parser, Debug)]
#[command(name = "fuwrap", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve one handle of a host snapshot and print its kind.
    Resolve(ResolveArgs),
    /// Print the current composition's tools and their connections.
    Tree(TreeArgs),
}

#[derive(Parser, Debug)]
struct ResolveArgs {
    /// Host snapshot JSON.
    #[arg(long)]
    snapshot: PathBuf,

    /// Handle id; omitted = the ambient default of `--as`.
    #[arg(long)]
    handle: Option<u64>,

    /// Requested kind (`Object` infers freely).
    #[arg(long = "as", default_value = "Object", value_parser = parse_kind)]
    kind: Kind,
}

#[derive(Parser, Debug)]
struct TreeArgs {
    /// Host snapshot JSON.
    #[arg(long)]
    snapshot: PathBuf,
}

fn parse_kind(s: &str) -> Result<Kind, String> {
    Kind::from_name(s).ok_or_else(|| {
        let names: Vec<&str> = Kind::ALL.iter().map(|k| k.name()).collect();
        format!("unknown kind '{s}' (expected one of: {})", names.join(", "))
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Resolve(args) => cmd_resolve(args),
        Command::Tree(args) => cmd_tree(args),
    }
}

fn load_host(path: &Path) -> anyhow::Result<Arc<InMemoryHost>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read snapshot '{}'", path.display()))?;
    let host = InMemoryHost::from_json(&json)
        .with_context(|| format!("parse snapshot '{}'", path.display()))?;
    Ok(Arc::new(host))
}

fn cmd_resolve(args: ResolveArgs) -> anyhow::Result<()> {
    let host = load_host(&args.snapshot)?;
    let resolver: Resolver = host.resolver();
    let candidate = Candidate::from(args.handle.map(HandleId));
    let node: Node = resolver
        .resolve_node(args.kind, candidate)
        .with_context(|| format!("resolve as {}", args.kind))?;
    println!("{}\t{}\t{}", node.handle().id(), node.kind(), node);
    Ok(())
}

fn cmd_tree(args: TreeArgs) -> anyhow::Result<()> {
    let host = load_host(&args.snapshot)?;
    let comp: Composition = host
        .resolver()
        .resolve(Candidate::Absent)
        .context("no current composition in snapshot")?;
    println!("{comp}");

    for tool in comp.tool_list(false, None)? {
        println!("  {tool} [{}]", tool.id()?);
        for input in tool.inputs()? {
            match input.connected_output()? {
                Some(out) => println!(
                    "    in  {} <- {}.{}",
                    input.name()?,
                    out.tool()?.name()?,
                    out.name()?
                ),
                None => println!("    in  {}", input.name()?),
            }
        }
        for output in tool.outputs()? {
            let targets = output
                .connected_inputs()?
                .iter()
                .map(|i| Ok(format!("{}.{}", i.tool()?.name()?, i.name()?)))
                .collect::<fuwrap::FuResult<Vec<_>>>()?;
            if targets.is_empty() {
                println!("    out {}", output.name()?);
            } else {
                println!("    out {} -> {}", output.name()?, targets.join(", "));
            }
        }
    }
    Ok(())
}
