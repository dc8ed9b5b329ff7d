use color_eyre::Result;
use mongo_monitor_tui::restore_terminal;

/// Installs the `color_eyre` report handler and a panic hook that gives the
/// terminal back before anything is printed.
pub fn init_errors() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .panic_section("This is a bug. Please report it together with the log file.")
        .capture_span_trace_by_default(false)
        .display_location_section(false)
        .display_env_section(false)
        .into_hooks();
    eyre_hook.install()?;

    std::panic::set_hook(Box::new(move |panic_info| {
        if let Err(err) = restore_terminal() {
            error!("Unable to restore the terminal: {err:?}");
        }

        #[cfg(not(debug_assertions))]
        {
            use human_panic::{
                handle_dump,
                metadata,
                print_msg,
            };
            let metadata = metadata!();
            let file_path = handle_dump(&metadata, panic_info);
            if let Err(err) = print_msg(file_path, &metadata) {
                eprintln!("Failed to print the panic message: {err}");
            }
            eprintln!("{}", panic_hook.panic_report(panic_info));
        }

        let msg = format!("{}", panic_hook.panic_report(panic_info));
        error!("Error: {}", strip_ansi_escapes::strip_str(msg));

        #[cfg(debug_assertions)]
        {
            better_panic::Settings::auto()
                .most_recent_first(false)
                .lineno_suffix(true)
                .verbosity(better_panic::Verbosity::Full)
                .create_panic_handler()(panic_info);
        }

        std::process::exit(libc::EXIT_FAILURE);
    }));

    Ok(())
}
