use crate::config::{expand_home, RawConfig, DEFAULT_CONFIG_PATH};
use crate::csr::CsrBuilder;
use crate::error::Result;
use crate::identity::resolve;
use crate::inspect::{display_request, parse_request_der};
use crate::output::{
    prepare_output_dir, timestamp_now, write_csr, write_key, OutputPaths, DEFAULT_OUTPUT_PATH,
};
use crate::types::{Encoding, KeyFormat, RequestSpec, DEFAULT_KEY_BITS};
use clap::Parser;
use colored::Colorize;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "gen-csr")]
#[command(version, about = "Generate an RSA key and a certificate signing request", long_about = None)]
pub struct CliArgs {
    #[arg(
        short,
        long,
        default_value = DEFAULT_CONFIG_PATH,
        help = "Load subject fields from the given YAML config-file"
    )]
    pub config: PathBuf,

    #[arg(
        short = 'n',
        long = "name",
        value_name = "DNSNAME",
        help = "DNS-names to add to the request, the first is also used as common name"
    )]
    pub names: Vec<String>,

    #[arg(
        short = 's',
        long = "keysize",
        value_name = "SIZE",
        default_value_t = DEFAULT_KEY_BITS,
        help = "Key size of the RSA private key in bits"
    )]
    pub key_size: u32,

    #[arg(
        short,
        long,
        value_name = "DIRECTORY",
        default_value = DEFAULT_OUTPUT_PATH,
        help = "Directory to write key and request to"
    )]
    pub output_path: PathBuf,

    #[arg(short = 'w', long, help = "Add a www. prefixed variant of every name")]
    pub add_www: bool,

    #[arg(long, default_value = "pkcs1", help = "Private key format: pkcs1 or pkcs8")]
    pub key_format: String,

    #[arg(long, default_value = "pem", help = "File encoding: pem or der")]
    pub encoding: String,

    #[arg(short, long, help = "Enable debug logging")]
    pub verbose: bool,
}

pub fn run_cli() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.verbose);
    run(args)
}

pub fn run(args: CliArgs) -> Result<()> {
    let key_format = args.key_format.parse::<KeyFormat>()?;
    let encoding = args.encoding.parse::<Encoding>()?;

    let config = RawConfig::load(&args.config)?;
    let spec = resolve(args.names, args.add_www, &config)?.with_key_bits(args.key_size);

    let output_dir = expand_home(&args.output_path);
    prepare_output_dir(&output_dir)?;

    print_configuration(&spec, &output_dir);

    let paths = OutputPaths::new(&output_dir, spec.common_name(), &timestamp_now());
    let artifact = CsrBuilder::new(spec).build()?;

    write_key(&artifact, &paths.key, key_format, encoding)?;
    println!("{}: {}", "Wrote key".green().bold(), paths.key.display());

    write_csr(&artifact, &paths.csr, encoding)?;
    println!("{}: {}", "Wrote CSR".green().bold(), paths.csr.display());

    let parsed = parse_request_der(artifact.csr_der())?;
    println!("{}", display_request(&parsed));

    Ok(())
}

fn print_configuration(spec: &RequestSpec, output_dir: &Path) {
    let subject = spec
        .subject_fields()
        .iter()
        .map(|f| format!("{}={}", f.code, f.value))
        .collect::<Vec<_>>()
        .join(", ");

    println!("{}", "Configured options:".bold());
    println!("  {}: {}", "Common Name".cyan(), spec.common_name());
    println!("  {}: {}", "Subject".cyan(), subject);
    println!("  {}: {}", "Alt Names".cyan(), spec.subject_alt_name_value());
    println!("  {}: {} bits", "Key Size".cyan(), spec.key_bits());
    println!("  {}: {}", "Output Path".cyan(), output_dir.display());
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}
