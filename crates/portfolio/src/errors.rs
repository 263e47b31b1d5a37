//! Report and panic hooks.
//!
//! A panic first hands the terminal back (raw mode, alternate screen, mouse
//! capture and bracketed paste are all switched on by the TUI), then writes the
//! plain-text report into `portfolio.log` and only then prints to stderr:
//! human-panic in release builds, better-panic in debug builds.

use std::panic::PanicHookInfo;
use std::sync::OnceLock;

use color_eyre::{config::PanicHook, Result};
use tracing::error;

use crate::{logging, tui};

static INIT: OnceLock<()> = OnceLock::new();

/// Install the color-eyre report hook and the panic hook. Repeated calls are
/// no-ops.
pub fn init() -> Result<()> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .panic_section(format!(
            "{} crashed. The full report was written to {}",
            env!("CARGO_PKG_NAME"),
            logging::log_path().display()
        ))
        .capture_span_trace_by_default(false)
        .display_location_section(false)
        .display_env_section(false)
        .try_into_hooks()?;
    eyre_hook.install()?;

    std::panic::set_hook(Box::new(move |info| {
        if let Err(err) = tui::restore() {
            error!("could not restore the terminal: {err:?}");
        }
        logging::panic_report(&panic_hook.panic_report(info).to_string());
        print_panic(&panic_hook, info);
        std::process::exit(libc::EXIT_FAILURE);
    }));

    let _ = INIT.set(());
    Ok(())
}

#[cfg(not(debug_assertions))]
fn print_panic(panic_hook: &PanicHook, info: &PanicHookInfo<'_>) {
    use human_panic::{handle_dump, metadata, print_msg};

    let metadata = metadata!();
    let dump = handle_dump(&metadata, info);
    // stderr may already be gone
    let _ = print_msg(dump, &metadata);
    eprintln!("{}", panic_hook.panic_report(info));
}

#[cfg(debug_assertions)]
fn print_panic(_panic_hook: &PanicHook, info: &PanicHookInfo<'_>) {
    better_panic::Settings::auto()
        .most_recent_first(false)
        .lineno_suffix(true)
        .verbosity(better_panic::Verbosity::Full)
        .create_panic_handler()(info);
}
