use clap::Parser;
use exhaust::infra::{Request, dispatch};

#[derive(Parser)]
struct Cli {
    /// Demo id, e.g. pairs
    id: String,
    /// Number of items to print
    #[arg(long, default_value_t = 20)]
    take: usize,
    /// Symbols for list, string, permutation and subset demos
    #[arg(long, default_value = "ab")]
    alphabet: String,
    /// Make product operands finite with this many elements
    #[arg(long)]
    size: Option<u64>,
}

fn enable_tracing() {
    use tracing_subscriber::fmt::format::FmtSpan;

    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .without_time()
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    enable_tracing();
    let cli = Cli::parse();
    let req = Request {
        take: cli.take,
        alphabet: cli.alphabet,
        size: cli.size,
    };
    println!("{}", dispatch(&cli.id, &req)?);
    Ok(())
}
