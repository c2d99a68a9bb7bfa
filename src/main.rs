#![allow(dead_code)]

use cosmic::app::Settings;
use cosmic::cosmic_config::CosmicConfigEntry;
use cosmic::iced::Limits;

mod application;
mod components;
mod localize;
mod message;
mod pages;

use fichario::config;
use fichario::core;
use fichario::state;
use fichario::storage;

use application::{Fichario, Flags, LaunchMode};
use config::{FicharioConfig, CONFIG_VERSION};
use fichario::core::card::Tab;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cosmic_cfg = cosmic::cosmic_config::Config::new("dev.fichario.app", CONFIG_VERSION)
        .expect("Failed to create cosmic config");
    let config = FicharioConfig::get_entry(&cosmic_cfg).unwrap_or_else(|(_, cfg)| cfg);

    // Set up logging to the systemd user journal (`journalctl --user -t fichario -f`).
    // Wrapper filters: fichario crate at info/debug (per config), everything else at warn.
    {
        struct FilteredJournal {
            inner: systemd_journal_logger::JournalLog,
        }

        impl log::Log for FilteredJournal {
            fn enabled(&self, metadata: &log::Metadata) -> bool {
                let target = metadata.target();
                if target.starts_with("fichario")
                    || target.starts_with("application")
                    || target.starts_with("pages")
                    || target.starts_with("components")
                {
                    let max = if fichario::debug_logging() {
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

        let journal = systemd_journal_logger::JournalLog::new()
            .unwrap()
            .with_syslog_identifier("fichario".to_string());

        fichario::set_debug_logging(config.debug_logging);

        log::set_boxed_logger(Box::new(FilteredJournal { inner: journal })).unwrap();
        // Global max must be Debug so fichario debug logs can pass through when toggled
        log::set_max_level(log::LevelFilter::Debug);
    }

    localize::localize();

    // Parse CLI flags
    let args: Vec<String> = std::env::args().collect();
    let launch_mode = if args.iter().any(|a| a == "--capture") {
        LaunchMode::Capture
    } else {
        LaunchMode::Normal
    };
    let start_tab = args
        .iter()
        .position(|a| a == "--tab")
        .and_then(|i| args.get(i + 1))
        .and_then(|name| Tab::from_str(name));

    let mut settings = Settings::default();
    settings = settings.size_limits(Limits::NONE.min_width(400.0).min_height(300.0));

    let flags = Flags {
        config,
        cosmic_config: cosmic_cfg,
        launch_mode,
        start_tab,
    };
    cosmic::app::run::<Fichario>(settings, flags)?;

    Ok(())
}
