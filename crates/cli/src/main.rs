//! Benchmark result deduplicator entry point.

fn main() {
    if let Err(e) = bench_dedup_cli::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
