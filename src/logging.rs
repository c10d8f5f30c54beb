use std::path::Path;

pub const LOG_FILE_BASENAME: &str = "doalist";
pub const LOG_FILE_SUFFIX: &str = "log";
pub const LOG_ROTATE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
pub const LOG_ROTATE_KEEP_FILES: usize = 10;

/// Log files sit next to `tasks.json` and `settings.json`.
pub fn log_directory(data_dir: &Path) -> &Path {
    data_dir
}

pub fn default_log_spec() -> &'static str {
    if cfg!(debug_assertions) {
        "warn,doalist_lib=debug"
    } else {
        "warn,doalist_lib=info"
    }
}

#[cfg(all(feature = "app", not(test)))]
pub fn init_logging(
    config: &crate::config::RuntimeConfig,
) -> Result<flexi_logger::LoggerHandle, flexi_logger::FlexiLoggerError> {
    use flexi_logger::{
        detailed_format, Cleanup, Criterion, Duplicate, FileSpec, Logger, Naming, WriteMode,
    };

    std::fs::create_dir_all(&config.data_dir)?;
    let spec = config
        .log_spec
        .clone()
        .unwrap_or_else(|| default_log_spec().to_string());

    let handle = Logger::try_with_str(spec)?
        .log_to_file(
            FileSpec::default()
                .directory(log_directory(&config.data_dir))
                .basename(LOG_FILE_BASENAME)
                .suffix(LOG_FILE_SUFFIX),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .format_for_files(detailed_format)
        .rotate(
            Criterion::Size(LOG_ROTATE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(LOG_ROTATE_KEEP_FILES),
        )
        .duplicate_to_stdout(if cfg!(debug_assertions) {
            Duplicate::Info
        } else {
            Duplicate::None
        })
        .start()?;

    install_panic_hook();

    log::info!(
        "logger initialized dir={} rotate_size_bytes={} keep_files={}",
        log_directory(&config.data_dir).display(),
        LOG_ROTATE_SIZE_BYTES,
        LOG_ROTATE_KEEP_FILES
    );
    Ok(handle)
}

#[cfg(all(feature = "app", not(test)))]
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info: &std::panic::PanicHookInfo<'_>| {
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| info.payload().downcast_ref::<String>().map(|s| s.as_str()))
            .unwrap_or("<non-string panic payload>");
        let location = info
            .location()
            .map(|loc| loc.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());

        log::error!("panic: payload={payload} location={location}");
        default_hook(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logs_live_in_the_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(log_directory(dir.path()), dir.path());
    }

    #[test]
    fn default_spec_keeps_dependencies_quiet() {
        let spec = default_log_spec();
        assert!(spec.starts_with("warn,"));
        assert!(spec.contains("doalist_lib="));
    }
}
