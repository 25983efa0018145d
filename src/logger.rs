use super::*;

/// `RUST_LOG` filtering (default `info`), coloured levels and a
/// `<file>:<line> [<name>_<version> <timestamp>]` prefix.
pub fn setup_logger() {
    let tag = format!("{}_{}", NAME, VERSION);
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(move |buf, record| {
            let level = match record.level() {
                log::Level::Error => format!("{}", record.level()).red(),
                log::Level::Warn => format!(" {}", record.level()).yellow(),
                log::Level::Info => format!(" {}", record.level()).green(),
                log::Level::Debug => format!("{}", record.level()).blue(),
                log::Level::Trace => format!("{}", record.level()).purple(),
            };
            writeln!(
                buf,
                "{}:{} [{} {}]{}: {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                tag.dimmed(),
                Local::now().format("%Y%m%d %H:%M:%S").to_string().purple(),
                level,
                record.args()
            )
        })
        .init();
    debug!("Logger initialized for {} {}", NAME, VERSION);
}
