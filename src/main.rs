use cosmic::app::Settings;
use cosmic::cosmic_config::CosmicConfigEntry;
use cosmic::iced::Limits;

mod application;
mod components;
mod localize;
mod message;
mod pages;

use tasklight::config;

use application::{Flags, Tasklight};
use config::{APP_ID, CONFIG_VERSION, TasklightConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match cosmic::cosmic_config::Config::new(APP_ID, CONFIG_VERSION) {
        Ok(cosmic_cfg) => TasklightConfig::get_entry(&cosmic_cfg).unwrap_or_else(|(_, cfg)| cfg),
        Err(e) => {
            eprintln!("Failed to open config, using defaults: {:?}", e);
            TasklightConfig::default()
        }
    };

    if let Err(e) = init_logging(config.debug_logging) {
        eprintln!("Failed to connect to the journal, logging disabled: {}", e);
    }
    localize::localize();

    let settings = Settings::default().size_limits(Limits::NONE.min_width(320.0).min_height(400.0));

    let flags = Flags { config };
    cosmic::app::run::<Tasklight>(settings, flags)?;

    Ok(())
}

/// Log to the systemd user journal (`journalctl --user -t tasklight -f`).
/// Our own targets log at info (debug when enabled), everything else at warn.
fn init_logging(debug: bool) -> Result<(), Box<dyn std::error::Error>> {
    struct FilteredJournal {
        inner: systemd_journal_logger::JournalLog,
    }

    impl log::Log for FilteredJournal {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            let target = metadata.target();
            if target.starts_with("tasklight") {
                let max = if tasklight::debug_logging() {
                    log::LevelFilter::Debug
                } else {
                    log::LevelFilter::Info
                };
                metadata.level() <= max
            } else {
                metadata.level() <= log::LevelFilter::Warn
            }
        }

        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                self.inner.log(record);
            }
        }

        fn flush(&self) {
            self.inner.flush();
        }
    }

    let journal = systemd_journal_logger::JournalLog::new()?.with_syslog_identifier("tasklight".to_string());

    tasklight::set_debug_logging(debug);

    log::set_boxed_logger(Box::new(FilteredJournal { inner: journal }))?;
    // Global max must be Debug so our debug logs can pass when enabled
    log::set_max_level(log::LevelFilter::Debug);
    Ok(())
}
