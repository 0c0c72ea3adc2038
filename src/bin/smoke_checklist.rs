use smoke_checklist::{cli::run_cli, init};

fn main() {
    init();

    if let Err(err) = run_cli() {
        eprintln!("Error: {err}");
        tracing::error!(%err, "shell terminated");
        std::process::exit(1);
    }
}
