use clap::Parser;
use slate::cli::commands::Cli;
use slate::cli::handlers;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        None => {
            let data_dir = slate::io::store::data_dir(
                cli.data_dir.as_deref().map(std::path::Path::new),
            );
            if let Err(e) = slate::tui::run(&data_dir) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        Some(_) => {
            if let Err(e) = handlers::dispatch(cli) {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
    }
}
