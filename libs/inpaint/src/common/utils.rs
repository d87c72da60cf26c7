use log::LevelFilter;
use std::io::Write;

/// Installs the process-wide logger. Records from the calling crate and from
/// this library are enabled down to `Trace`/`Debug`; `RUST_LOG` still wins.
pub fn init_logger(name: impl Into<String>) {
    let crate_name = name.into().replace('-', "_");
    let lib_name = env!("CARGO_CRATE_NAME");

    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .filter(Some(&crate_name), LevelFilter::Trace)
        .filter(Some(lib_name), LevelFilter::Debug)
        .parse_default_env()
        .format(move |f, rec| {
            let now = humantime::format_rfc3339_millis(std::time::SystemTime::now());
            let module = rec.module_path().unwrap_or("<unknown>");
            let line = rec.line().unwrap_or(u32::MIN);
            let level = rec.level();

            writeln!(
                f,
                "[{} {} {} {}:{}] {}",
                level,
                crate_name,
                now,
                module,
                line,
                rec.args()
            )
        })
        .init();
}

/// Filename without directories and without its last extension.
///
/// Leading dots do not start an extension, so `.env` stays `.env` while
/// `photo.final.jpg` becomes `photo.final`.
pub fn file_stem(file_name: &str) -> &str {
    let base = file_name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(file_name);
    match base.rfind('.') {
        Some(dot) if base[..dot].chars().any(|c| c != '.') => &base[..dot],
        _ => base,
    }
}
