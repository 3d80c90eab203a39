#[cfg(feature = "cli")]
use colored::Colorize;
#[cfg(feature = "cli")]
use gen_csr::cli::run_cli;

#[cfg(feature = "cli")]
fn main() {
    if let Err(e) = run_cli() {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("gen-csr was built without the 'cli' feature; only the library is available.");
    eprintln!("Rebuild with: cargo build --features cli");
    std::process::exit(1);
}
