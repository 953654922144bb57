//! Binary entry point: resolve configuration, start logging, open the record
//! store, then either run the interactive menu or the operator-only reset.
use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use university_records::config::{Cli, Command};
use university_records::logging::init_logging;
use university_records::{run_app, App, RecordStore};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.confirm()?;
    let settings = cli.settings()?;
    init_logging(&settings.log_path, settings.verbose)?;

    let store = RecordStore::open(&settings.db_path)
        .with_context(|| format!("failed to open {}", settings.db_path.display()))?;

    match cli.command.unwrap_or(Command::Menu) {
        Command::Menu => {
            let mut app = App::new(store);
            let result = run_app(&mut app);
            if let Err(err) = &result {
                error!(error = %err, "menu terminated");
            }
            app.into_store().close()?;
            result
        }
        Command::Reset { .. } => {
            store.reset_all()?;
            store.close()?;
            info!(path = %settings.db_path.display(), "database reset by operator");
            println!("All records erased: {}", settings.db_path.display());
            Ok(())
        }
    }
}
