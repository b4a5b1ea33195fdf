use trip_ledger::{cli::run_cli, init};

fn main() {
    // SMTP credentials may live in a local .env file.
    dotenvy::dotenv().ok();
    init();

    if let Err(err) = run_cli() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
