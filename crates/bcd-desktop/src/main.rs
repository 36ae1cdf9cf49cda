use eyre::Result;

use bcd_desktop::commands::NativeDialogs;
use bcd_desktop::config;
use bcd_desktop::state::DesktopState;
use bcd_desktop::terminal;

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = config::load_config()?;

    let mut state = DesktopState::new(config);
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    terminal::run(&mut state, stdin.lock(), &mut stdout, &NativeDialogs)
}
