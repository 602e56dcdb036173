mod config;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{CommandFactory, Parser};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Builder as FilterBuilder;

use nautilus_inspect::{ClusterInspector, render};
use nautilus_k8s::{ClusterBackend, ClusterConfig, KubeBackend};

use crate::config::{DEFAULT_NAMESPACE, Settings};

/// Nautilus - Describe Kubernetes cluster information
#[derive(Parser, Debug)]
#[command(name = "nautilus")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Set the namespace to get the information
    #[arg(long)]
    namespace: Option<String>,

    /// Print the cluster information
    #[arg(long = "cluster-info", visible_alias = "cluster")]
    cluster_info: bool,

    /// Print the API versions
    #[arg(long)]
    api_versions: bool,

    /// Print information about all nodes
    #[arg(long)]
    nodes: bool,

    /// Print information about all namespaces
    #[arg(long = "list_namespaces")]
    list_namespaces: bool,

    /// Switch to a different context
    #[arg(long, value_name = "NAME")]
    switch_context: Option<String>,

    /// Apply a configuration file
    #[arg(long, value_name = "FILE")]
    apply: Option<PathBuf>,

    /// Create a new resource (deployment or service)
    #[arg(long, num_args = 3, value_names = ["RESOURCE_TYPE", "NAME", "IMAGE"])]
    create: Option<Vec<String>>,

    /// Number of replicas for deployment
    #[arg(long)]
    replicas: Option<i32>,

    /// List all pods in the current namespace
    #[arg(long)]
    list_pods: bool,

    /// Settings file (default: ~/.nautilus/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Kubeconfig file to use instead of the default discovery
    #[arg(long, value_name = "FILE")]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to connect with
    #[arg(long, value_name = "NAME")]
    context: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// The primary action; at most one runs per invocation
#[derive(Debug, PartialEq, Eq)]
enum Action {
    ClusterInfo,
    ApiVersions,
    Nodes,
    Namespaces,
    SwitchContext(String),
    Apply(PathBuf),
    Create {
        resource_type: String,
        name: String,
        image: String,
        replicas: Option<i32>,
    },
}

impl Args {
    /// First matching flag wins, in declaration order
    fn action(&self) -> Option<Action> {
        if self.cluster_info {
            Some(Action::ClusterInfo)
        } else if self.api_versions {
            Some(Action::ApiVersions)
        } else if self.nodes {
            Some(Action::Nodes)
        } else if self.list_namespaces {
            Some(Action::Namespaces)
        } else if let Some(name) = &self.switch_context {
            Some(Action::SwitchContext(name.clone()))
        } else if let Some(path) = &self.apply {
            Some(Action::Apply(path.clone()))
        } else if let Some([resource_type, name, image]) = self.create.as_deref() {
            Some(Action::Create {
                resource_type: resource_type.clone(),
                name: name.clone(),
                image: image.clone(),
                replicas: self.replicas,
            })
        } else {
            None
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(args.verbose).from_env_lossy())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// `warn`, or `debug` with `--verbose`; a non-empty `RUST_LOG` replaces it
fn log_filter(verbose: bool) -> FilterBuilder {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    EnvFilter::builder().with_default_directive(level.into())
}

async fn run(args: Args) -> Result<()> {
    let action = args.action();
    if action.is_none() && !args.list_pods {
        Args::command().print_help()?;
        return Ok(());
    }

    let settings = Settings::load(args.config.as_deref())?;
    let cluster = ClusterConfig::new(
        args.kubeconfig.or(settings.kubeconfig),
        args.context.or(settings.context),
    );
    let backend = KubeBackend::connect(&cluster)
        .await
        .context("Failed to connect to the cluster")?;

    let namespace = args
        .namespace
        .or(settings.namespace)
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
    let mut inspector = ClusterInspector::new(backend, namespace);

    if let Some(action) = action {
        run_action(&mut inspector, action).await?;
    }

    if args.list_pods {
        let pods = inspector.pods().await?;
        print!("{}", render::pods(inspector.namespace(), &pods));
    }

    Ok(())
}

async fn run_action<B: ClusterBackend>(
    inspector: &mut ClusterInspector<B>,
    action: Action,
) -> Result<()> {
    match action {
        Action::ClusterInfo => {
            let info = inspector.cluster_info().await;
            print!("{}", render::cluster_info(&info));
        }
        Action::ApiVersions => {
            let version = inspector.api_versions().await?;
            print!("{}", render::server_version(&version));
        }
        Action::Nodes => {
            let nodes = inspector.nodes().await?;
            print!("{}", render::nodes(&nodes));
        }
        Action::Namespaces => {
            let namespaces = inspector.namespaces().await?;
            print!("{}", render::namespaces(&namespaces, Utc::now()));
        }
        Action::SwitchContext(name) => {
            inspector.switch_context(&name).await?;
            println!("Switched to context '{}'", name);
        }
        Action::Apply(path) => {
            let outcomes = inspector.apply_file(&path).await?;
            for outcome in &outcomes {
                println!("{}", outcome);
            }

            let failed = outcomes.iter().filter(|o| o.is_failed()).count();
            if failed > 0 {
                bail!("{} of {} documents failed to apply", failed, outcomes.len());
            }
        }
        Action::Create {
            resource_type,
            name,
            image,
            replicas,
        } => {
            let kind = inspector
                .create(&resource_type, &name, &image, replicas)
                .await?;
            println!("{} '{}' created.", kind, name);
        }
    }

    Ok(())
}
