use clap::Parser;

#[derive(Parser)]
#[command(about = "Lazy prime and Fermi-Dirac sequences")]
struct Cli {
    /// Command name: fermi-dirac, fd-index, primes or isprime
    command: String,
    /// Remaining `--name=value` args passed to the command
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    args: Vec<String>,
}

fn enable_tracing() {
    use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .without_time()
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    enable_tracing();
    let cli = Cli::parse();
    println!("{}", fdseq::infra::dispatch(&cli.command, &cli.args)?);
    Ok(())
}
