// modemd -- the modem emulator daemon.
//
// Opens the configured serial port, answers AT commands on it like a
// Hayes modem, and places ATD calls through the selected dialer backend.
// Runs until ctrl-c.
//
// Usage:
//   modemd --serial-config serial.json --dialer dummy
//   modemd --serial-config serial.json --dialer zisson \
//       --dialer-config zisson.json --country-code 47
//   modemd --dialer phonelog --dialer-config phonelog.json
//
// Log verbosity follows RUST_LOG (e.g. RUST_LOG=dialup_modem=debug).

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;

use dialup::dialer::{DummyDialer, E164Dialer, PhonelogDialer, PhonelogSettings, ZissonDialer, ZissonSettings};
use dialup::modem::Modem;
use dialup::transport::{SerialSettings, SerialTransport};
use dialup::Dialer;

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// Modem emulator daemon for legacy dial-out equipment.
#[derive(Parser)]
#[command(name = "modemd", version, about)]
struct Cli {
    /// Path to the serial port settings file.
    #[arg(long, default_value = "serial.json")]
    serial_config: String,

    /// Dialer backend to place calls with.
    #[arg(long, value_enum, default_value_t = DialerKind::Dummy)]
    dialer: DialerKind,

    /// Path to the dialer settings file (zisson.json / phonelog.json).
    /// Not used by the dummy dialer.
    #[arg(long)]
    dialer_config: Option<String>,

    /// Country code for E.164 normalization of dialed numbers
    /// (zisson and dummy; phonelog configures its own).
    #[arg(long, default_value = "")]
    country_code: String,

    /// Local area prefix for E.164 normalization of dialed numbers.
    #[arg(long, default_value = "")]
    local_prefix: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DialerKind {
    /// Log the number and pretend the call succeeded.
    Dummy,
    /// Zisson switchboard simple API.
    Zisson,
    /// Phonelog dial API.
    Phonelog,
}

// ---------------------------------------------------------------------------
// Dialer construction
// ---------------------------------------------------------------------------

fn build_dialer(cli: &Cli) -> Result<Box<dyn Dialer>> {
    let config = |default: &str| {
        cli.dialer_config
            .clone()
            .unwrap_or_else(|| default.to_string())
    };

    match cli.dialer {
        DialerKind::Dummy => Ok(Box::new(E164Dialer::new(
            DummyDialer::new(),
            &cli.country_code,
            &cli.local_prefix,
        ))),
        DialerKind::Zisson => {
            let settings = ZissonSettings::load(&config("zisson.json"))
                .context("loading zisson settings")?;
            let dialer = ZissonDialer::new(settings).context("constructing zisson dialer")?;
            // Zisson expects E.164; normalize what the terminal typed.
            Ok(Box::new(E164Dialer::new(
                dialer,
                &cli.country_code,
                &cli.local_prefix,
            )))
        }
        DialerKind::Phonelog => {
            let settings = PhonelogSettings::load(&config("phonelog.json"))
                .context("loading phonelog settings")?;
            // Phonelog normalizes with its own configured codes.
            Ok(Box::new(PhonelogDialer::new(settings)))
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    tracing::info!("starting modemd v{}", env!("CARGO_PKG_VERSION"));

    let settings =
        SerialSettings::load(&cli.serial_config).context("loading serial settings")?;
    let transport = SerialTransport::open(&settings)
        .await
        .context("opening serial port")?;
    let dialer = build_dialer(&cli)?;

    let mut modem = Modem::new(transport, dialer);

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("ctrl-c pressed, exiting...");
            signal_cancel.cancel();
        }
    });

    modem
        .run_until_cancelled(cancel)
        .await
        .context("modem loop failed")?;
    Ok(())
}
