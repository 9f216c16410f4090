use log::info;
use times_tables::cli::Args;
use times_tables::gui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse_args();
    let bounds = args.validate_range()?;
    info!("Starting with tables {}", bounds);

    // Run the GUI application
    gui::run_app(bounds)?;

    Ok(())
}
