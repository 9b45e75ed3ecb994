use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand};
use isosim::protocol::FieldDefinition;
use isosim::{
    AuditLog, EncodedMessage, FieldSelection, Framing, HttpClient, Registry, SimulatorConfig,
    TcpClient, Template, build, randomize, redact, validate,
};
use rand_core::OsRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "isosim", version, about = "Build and send ISO 8583 test messages")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registry fields
    Fields {
        /// Only optional fields matching this number or label
        #[arg(long)]
        search: Option<String>,
    },
    /// Build a message and print it
    Build(MessageArgs),
    /// Validate, build and send over TCP
    Send {
        #[command(flatten)]
        message: MessageArgs,
        /// Switch host (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Switch port (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Validate, build and POST the unframed payload over HTTP
    Post {
        #[command(flatten)]
        message: MessageArgs,
        /// Endpoint URL (overrides config)
        #[arg(long)]
        url: Option<String>,
    },
    /// Save the included fields as a JSON template
    TemplateSave {
        /// Output file
        path: PathBuf,
        #[command(flatten)]
        message: MessageArgs,
    },
}

#[derive(Args, Debug)]
struct MessageArgs {
    /// Start from a saved template
    #[arg(long)]
    template: Option<PathBuf>,
    /// Include a field with a value, e.g. --field 4=000000005000
    #[arg(long = "field", value_name = "N=VALUE", value_parser = parse_field)]
    fields: Vec<(u8, String)>,
    /// Include a field at its default value
    #[arg(long, value_name = "N")]
    include: Vec<u8>,
    /// Leave a field out
    #[arg(long, value_name = "N")]
    exclude: Vec<u8>,
    /// Replace a field with generated test data
    #[arg(long, value_name = "N")]
    randomize: Vec<u8>,
    /// Replace every included field with generated test data
    #[arg(long)]
    randomize_included: bool,
    /// Prepend the TPDU header
    #[arg(long)]
    tpdu: bool,
    /// Prepend the 2-byte length header
    #[arg(long)]
    len_header: bool,
    /// Show cardholder data unmasked
    #[arg(long)]
    no_mask: bool,
}

impl MessageArgs {
    fn selection(&self, registry: &Registry) -> Result<FieldSelection, Box<dyn Error>> {
        let mut selection = FieldSelection::seeded(registry);
        if let Some(path) = &self.template {
            let applied = Template::load(path)?.apply(&mut selection);
            info!(applied, path = %path.display(), "template loaded");
        }
        for &number in &self.include {
            selection.include(number, registry)?;
        }
        for (number, value) in &self.fields {
            selection.insert(*number, value.clone())?;
        }
        for &number in &self.exclude {
            selection.exclude(number);
        }

        let mut targets = self.randomize.clone();
        if self.randomize_included {
            targets.extend(selection.included_numbers());
        }
        if !targets.is_empty() {
            randomize(&mut selection, registry, targets, &mut OsRng);
        }
        Ok(selection)
    }

    fn framing(&self, config: &SimulatorConfig) -> Framing {
        let mut framing = config.framing();
        framing.include_tpdu |= self.tpdu;
        framing.include_length_header |= self.len_header;
        framing
    }

    fn masked(&self, config: &SimulatorConfig) -> bool {
        config.mask_sensitive && !self.no_mask
    }
}

fn parse_field(arg: &str) -> Result<(u8, String), String> {
    let (number, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected N=VALUE, got `{arg}`"))?;
    let number = number
        .trim()
        .parse()
        .map_err(|_| format!("invalid field number `{number}`"))?;
    Ok((number, value.to_string()))
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("isosim error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    let config = SimulatorConfig::load_or_default(cli.config.as_deref())?;
    let registry = Registry::standard();

    match cli.command {
        Command::Fields { search } => {
            list_fields(registry, search.as_deref());
            Ok(ExitCode::SUCCESS)
        }
        Command::Build(args) => {
            let selection = args.selection(registry)?;
            let message = build(&selection, registry, args.framing(&config))?;
            print_message(&message, registry, args.masked(&config));

            let report = validate(&selection, registry);
            if !report.is_valid() {
                eprintln!("{report}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Send {
            message: args,
            host,
            port,
        } => {
            let Some(message) = checked_message(&args, registry, &config)? else {
                return Ok(ExitCode::FAILURE);
            };
            let client = TcpClient::new(
                host.as_deref().unwrap_or(&config.host),
                port.unwrap_or(config.port),
                config.timeout(),
            );

            let mut log = AuditLog::new();
            let exchange = log.request(message.framed());
            let code = match client.send(&message.wire_bytes()) {
                Ok(reply) => {
                    log.response(exchange, String::from_utf8_lossy(&reply));
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    log.failure(exchange, err.to_string());
                    ExitCode::FAILURE
                }
            };
            print!("{log}");
            Ok(code)
        }
        Command::Post { message: args, url } => {
            let Some(message) = checked_message(&args, registry, &config)? else {
                return Ok(ExitCode::FAILURE);
            };
            let client = HttpClient::new(url.as_deref().unwrap_or(&config.http_url), config.timeout())?;

            let mut log = AuditLog::new();
            let exchange = log.request(format!("POST {}\n{}", client.url(), message.payload()));
            let code = match client.post(message.payload()) {
                Ok(reply) => {
                    log.response(exchange, reply.to_string());
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    log.failure(exchange, err.to_string());
                    ExitCode::FAILURE
                }
            };
            print!("{log}");
            Ok(code)
        }
        Command::TemplateSave {
            path,
            message: args,
        } => {
            let selection = args.selection(registry)?;
            let template = Template::from_selection(&selection);
            template.save(&path)?;
            println!("Template saved: {} fields -> {}", template.len(), path.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Build a message only if every included field validates.
fn checked_message(
    args: &MessageArgs,
    registry: &Registry,
    config: &SimulatorConfig,
) -> Result<Option<EncodedMessage>, Box<dyn Error>> {
    let selection = args.selection(registry)?;
    let report = validate(&selection, registry);
    if !report.is_valid() {
        eprintln!("Validation failed:\n{report}");
        return Ok(None);
    }
    let message = build(&selection, registry, args.framing(config))?;
    print_message(&message, registry, args.masked(config));
    Ok(Some(message))
}

fn print_message(message: &EncodedMessage, registry: &Registry, masked: bool) {
    println!("Wire ({}): {}", message.framing(), message.framed());
    println!("Bitmap: {}", message.bitmap_hex());
    let rows = if masked {
        redact(message.breakdown(), registry)
    } else {
        message.breakdown().to_vec()
    };
    for row in rows {
        println!("  {:<40} {}", row.to_string(), row.label);
    }
}

fn list_fields(registry: &Registry, search: Option<&str>) {
    let fields: Vec<&FieldDefinition> = match search {
        Some(query) => registry.search(query),
        None => registry
            .all_fields()
            .iter()
            .filter(|field| !field.is_reserved())
            .collect(),
    };
    for field in fields {
        let kind = if field.is_mandatory() { "mandatory" } else { "optional" };
        println!(
            "{:<50} {:>4} {:<3} {kind}",
            field.title(),
            field.max_length(),
            field.type_class().code()
        );
    }
}
