use std::io;
use std::process;

use clap::Parser;
use gradient_cli::{exitcode, output, Cli, Settings, UreqTransport};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            let _ = output::error(&mut io::stderr(), &e);
            process::exit(e.exit_code());
        }
    };
    tracing::debug!(
        api_host = %settings.api_host,
        experiments_host = %settings.experiments_host,
        "settings loaded"
    );

    let transport = UreqTransport::new(settings.request_timeout());
    let code = gradient_cli::run(
        &cli,
        &settings,
        &transport,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );
    if code != exitcode::OK {
        tracing::info!(code, "exiting with error");
    }
    process::exit(code);
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // ureq and its HTTP stack are chatty below info.
    let quiet_deps = if filter > LevelFilter::INFO {
        "ureq=info,ureq_proto=info,rustls=info"
    } else {
        ""
    };
    let noisy = EnvFilter::builder()
        .with_default_directive(filter.into())
        .parse_lossy(quiet_deps);

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(noisy))
        .init();

    match filter {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}
