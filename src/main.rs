use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use env_logger::Env;
use log::{info, warn};
use std::path::{Path, PathBuf};

use subnetplan::config::PlanConfig;
use subnetplan::config_loader;
use subnetplan::net::{NetworkBlock, NetworkDetails};
use subnetplan::report::{self, ReportFormat};
use subnetplan::subnet::divide_equal;
use subnetplan::topology::{
    build_advanced_lab, build_topology, RoutingProtocol, SiteSpec, TopologyOptions,
};
use subnetplan::utils::validation::{parse_address_prefix, parse_device_list, parse_host_list};
use subnetplan::vlsm::{plan_vlsm, FailurePolicy};

/// IPv4 subnetting and VLSM planning utility
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Allocate variable-length subnets for a list of host counts
    Vlsm {
        /// Base network in CIDR notation (e.g. 192.168.1.0/24)
        #[arg(short, long)]
        base: NetworkBlock,

        /// Comma-separated host counts (e.g. 50,30,20,10)
        #[arg(long)]
        hosts: String,

        /// Skip requests that do not fit instead of stopping
        #[arg(long)]
        skip_failures: bool,

        /// Report format
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Detailed)]
        format: ReportFormat,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the step-by-step calculation for one address/prefix
    Details {
        /// Address with prefix (e.g. 192.168.0.11/24)
        cidr: String,
    },

    /// Split a network into a number of equal subnets
    Split {
        /// Base network in CIDR notation
        #[arg(short, long)]
        base: NetworkBlock,

        /// Number of subnets
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        count: u32,
    },

    /// Allocate subnets and lay out routers, switches and VLANs for a lab
    Topology {
        /// Base network in CIDR notation
        #[arg(short, long)]
        base: NetworkBlock,

        /// Comma-separated device counts, one per subnet
        #[arg(long)]
        hosts: String,

        /// Expected number of subnets (checked against --hosts)
        #[arg(long)]
        subnets: Option<usize>,

        /// Number of routers
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        routers: u32,

        /// Number of switches
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        switches: u32,

        /// Write the scheme to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Lay out a lab where every subnet has its own routers, switches and hosts
    TopologyAdvanced {
        /// Base network in CIDR notation
        #[arg(short, long)]
        base: NetworkBlock,

        /// Devices for one subnet as routers,switches,hosts (repeat per
        /// subnet; the first is the main network)
        #[arg(long = "site", required = true)]
        sites: Vec<SiteSpec>,

        /// Routing protocol between the subnet routers
        #[arg(long, value_enum, default_value_t = RoutingProtocol::Static)]
        routing: RoutingProtocol,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,

        /// Write the scheme to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run a plan described in a YAML file
    Plan {
        /// Path to the plan YAML file
        #[arg(short, long)]
        config: PathBuf,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write an example plan file
    Init {
        /// Where to write the example plan
        #[arg(default_value = "plan.yaml")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize logging with the requested default filter level
    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level)).init();

    match cli.command {
        Commands::Vlsm {
            base,
            hosts,
            skip_failures,
            format,
            output,
        } => {
            let hosts = parse_host_list(&hosts)?;
            let policy = if skip_failures {
                FailurePolicy::SkipAndContinue
            } else {
                FailurePolicy::Abort
            };
            let config = PlanConfig {
                base,
                hosts,
                on_failure: policy,
                format,
                topology: None,
            };
            run_plan(&config, output.as_deref())
        }
        Commands::Details { cidr } => {
            let (address, prefix) = parse_address_prefix(&cidr)?;
            let details = NetworkDetails::calculate(address, prefix)?;
            print!("{}", report::render_network_details(&details));
            Ok(())
        }
        Commands::Split { base, count } => {
            let split = divide_equal(base, count)?;
            print!("{}", report::render_equal_subnetting(&split));
            Ok(())
        }
        Commands::Topology {
            base,
            hosts,
            subnets,
            routers,
            switches,
            output,
        } => {
            let hosts = match subnets {
                Some(expected) => parse_device_list(&hosts, expected)?,
                None => parse_host_list(&hosts)?,
            };
            let topology = TopologyOptions { routers, switches };
            let config = PlanConfig {
                base,
                hosts,
                on_failure: FailurePolicy::Abort,
                format: ReportFormat::Summary,
                topology: Some(topology),
            };
            run_plan(&config, output.as_deref())
        }
        Commands::TopologyAdvanced {
            base,
            sites,
            routing,
            json,
            output,
        } => {
            let lab = build_advanced_lab(base, &sites, routing)?;
            let document = if json {
                serde_json::to_string_pretty(&lab).wrap_err("Failed to serialize lab to JSON")?
            } else {
                report::render_advanced_lab(&lab)
            };
            match output {
                Some(path) => report::write_report(&document, &path)?,
                None => print!("{}", document),
            }
            info!("Laid out {} subnets in {}", lab.sites.len(), lab.base);
            Ok(())
        }
        Commands::Plan { config, output } => {
            let plan_config = config_loader::load_config(&config)?;
            run_plan(&plan_config, output.as_deref())
        }
        Commands::Init { output } => {
            let example = PlanConfig {
                base: "192.168.1.0/24".parse()?,
                hosts: vec![50, 30, 20, 10],
                on_failure: FailurePolicy::Abort,
                format: ReportFormat::Detailed,
                topology: Some(TopologyOptions {
                    routers: 1,
                    switches: 2,
                }),
            };
            config_loader::save_config(&example, &output)?;
            info!("Example plan written to {:?}", output);
            Ok(())
        }
    }
}

/// Allocate, render and emit one plan; an incomplete plan is still reported
/// before the error is returned.
fn run_plan(config: &PlanConfig, output: Option<&Path>) -> Result<()> {
    let plan = plan_vlsm(config.base, &config.hosts, config.on_failure)?;

    let mut document = config.format.formatter().render(&plan)?;

    if let Some(options) = config.topology {
        if plan.is_complete() {
            let lab = build_topology(plan.base, &plan.allocations, options)?;
            let rendered = match config.format {
                ReportFormat::Json => serde_json::to_string_pretty(&lab)
                    .wrap_err("Failed to serialize topology to JSON")?,
                _ => report::render_topology(&lab),
            };
            document.push('\n');
            document.push_str(&rendered);
        } else {
            warn!("Skipping topology: not every subnet could be allocated");
        }
    }

    match output {
        Some(path) => report::write_report(&document, path)?,
        None => print!("{}", document),
    }

    if !plan.is_complete() {
        return Err(eyre!(
            "{} of {} subnets could not be allocated in {}",
            plan.failures.len(),
            plan.requests.len(),
            plan.base
        ));
    }

    info!("Allocated {} subnets in {}", plan.allocations.len(), plan.base);
    Ok(())
}
