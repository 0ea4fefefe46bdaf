// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::io::{self, IsTerminal};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::LogFormat;

pub fn use_json(format: LogFormat, stdout_is_terminal: bool) -> bool {
	match format {
		LogFormat::Json => true,
		LogFormat::Text => false,
		LogFormat::Auto => !stdout_is_terminal,
	}
}

/// Installs the global subscriber. Filtering follows `RUST_LOG` and defaults
/// to `info`. Events go to stderr; stdout carries the command's output.
pub fn init(format: LogFormat) {
	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

	let result = if use_json(format, io::stdout().is_terminal()) {
		tracing_subscriber::registry()
			.with(env_filter)
			.with(fmt::layer().json().flatten_event(true).with_current_span(false).with_writer(io::stderr))
			.try_init()
	} else {
		tracing_subscriber::registry().with(env_filter).with(fmt::layer().with_writer(io::stderr)).try_init()
	};

	if let Err(err) = result {
		eprintln!("logging already initialized: {}", err);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_auto_follows_terminal() {
		assert!(use_json(LogFormat::Auto, false));
		assert!(!use_json(LogFormat::Auto, true));
		assert!(use_json(LogFormat::Json, true));
		assert!(!use_json(LogFormat::Text, false));
	}
}
