//! Logging and lock diagnostics.
//!
//! Both functions may be called any number of times; only the first call
//! has an effect.

/// Installs the global `tracing` subscriber.
///
/// Outside Android the filter comes from `RUST_LOG` and defaults to
/// `error,april_bridge=info`.
pub fn init() {
    #[cfg(target_os = "android")]
    {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .try_init();
    }

    #[cfg(not(target_os = "android"))]
    {
        let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => match tracing_subscriber::EnvFilter::try_new("error,april_bridge=info") {
                Ok(filter) => filter,
                Err(_) => tracing_subscriber::EnvFilter::new("error"),
            },
        };

        let _ = tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(filter)
            .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
            .try_init();
    }
}

/// Starts the lock watchdog in debug builds.
///
/// Every ten seconds it asks `parking_lot` for deadlocked threads and logs
/// their backtraces.
pub fn init_deadlock_detection() {
    #[cfg(debug_assertions)]
    {
        use std::{sync::Once, thread, time::Duration};

        static INIT: Once = Once::new();
        INIT.call_once(|| {
            let spawned = thread::Builder::new()
                .name("april-deadlock".to_string())
                .spawn(|| {
                    loop {
                        thread::sleep(Duration::from_secs(10));
                        let deadlocks = parking_lot::deadlock::check_deadlock();
                        if deadlocks.is_empty() {
                            continue;
                        }

                        tracing::error!("{} deadlocks detected", deadlocks.len());
                        for (idx, threads) in deadlocks.iter().enumerate() {
                            for thread in threads {
                                tracing::error!(
                                    "deadlock #{idx}, thread {:?}:\n{:?}",
                                    thread.thread_id(),
                                    thread.backtrace()
                                );
                            }
                        }
                    }
                });
            if let Err(err) = spawned {
                tracing::warn!("deadlock watchdog not started: {err}");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn repeated_initialization_is_harmless() {
        super::init();
        super::init();
        super::init_deadlock_detection();
        super::init_deadlock_detection();
        tracing::info!("logging initialized twice");
    }
}
