// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "docinit", version, about = "Create the credential, collection and unique index an application needs")]
pub struct Cli {
	#[command(subcommand)]
	pub command: Command,

	/// TOML file with `[connection]` and `[plan]` tables.
	#[arg(long, global = true, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Connection string of the administrative session.
	#[arg(long, global = true, env = "DOCINIT_URI", hide_env_values = true)]
	pub uri: Option<String>,

	/// Secret of the credential to create.
	#[arg(long, global = true, env = "DOCINIT_SECRET", hide_env_values = true)]
	pub secret: Option<String>,

	/// Run against a throwaway in-process server instead of connecting.
	#[arg(long, global = true)]
	pub memory: bool,

	#[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
	pub output: OutputFormat,

	#[arg(long, global = true, value_enum, default_value_t = LogFormat::Auto)]
	pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
	/// Connect and create everything the plan describes.
	Run,
	/// Connect and check what exists, without changing anything.
	Verify,
	/// Print the effective plan with the secret redacted.
	Plan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	Text,
	Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
	/// JSON when stdout is not a terminal, text otherwise.
	Auto,
	Text,
	Json,
}
