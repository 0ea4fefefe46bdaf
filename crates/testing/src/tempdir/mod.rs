// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{env, fs, path::Path};

use uuid::Uuid;

/// Runs `f` with a fresh directory that is removed afterwards.
pub fn temp_dir<F, T>(f: F) -> std::io::Result<T>
where
	F: FnOnce(&Path) -> std::io::Result<T>,
{
	let mut path = env::temp_dir();
	path.push(format!("docinit-{}", Uuid::new_v4()));

	fs::create_dir(&path)?;
	let result = f(&path);

	let _ = fs::remove_dir_all(&path);
	result
}

/// Writes `contents` to `name` inside a fresh directory and hands the file
/// path to `f`.
pub fn with_file<F, T>(name: &str, contents: &str, f: F) -> std::io::Result<T>
where
	F: FnOnce(&Path) -> T,
{
	temp_dir(|dir| {
		let file = dir.join(name);
		fs::write(&file, contents)?;
		Ok(f(&file))
	})
}
