//! `zfssnap` - snapshot management for ZFS storage appliances.
//!
//! See `README.md` for user documentation and `DESIGN.md` for architecture.

use zfssnap::cli::Cli;
use zfssnap::exit_codes::exit;

fn main() {
    let cli = Cli::parse_args();
    zfssnap::logging::init(cli.verbose);

    // Nothing to unwind on interrupt; a half-written export is accepted.
    if let Err(e) = ctrlc::set_handler(|| {
        println!("\nReceived Ctrl^C. Exiting....");
        std::process::exit(exit::SUCCESS);
    }) {
        tracing::warn!(error = %e, "could not install Ctrl-C handler");
    }

    let exit_code = match zfssnap::engine::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            exit::FAILURE
        }
    };
    std::process::exit(exit_code);
}
