// SPDX-License-Identifier: LGPL-2.1-or-later
// Copyright (C) 2025 Shahzad A. Bhatti <bhatti@plexobject.com>
//
// This file is part of Quire.
//
// Quire is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License as published by
// the Free Software Foundation, either version 2.1 of the License, or
// (at your option) any later version.
//
// Quire is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with Quire. If not, see <https://www.gnu.org/licenses/>.

//! Quire lock CLI
//!
//! ## Purpose
//! Operator tool for the edit-lock database shared by the editing backends:
//! - Create the lock table
//! - Inspect, take and release individual locks
//! - List live locks and prune expired rows
//!
//! Output is JSON on stdout; logs go to stderr. The process exits with 1 on
//! storage or configuration errors and with 2 when `lock` is rejected.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(name = "quire-locks")]
#[command(about = "Quire lock CLI - Inspect and manage edit locks", long_about = None)]
struct Cli {
    /// Lock database URL (e.g. sqlite://data/locks/lockstore.sqlite, memory:).
    /// Defaults to the QUIRE_LOCK_* environment variables.
    #[arg(short, long, global = true)]
    database: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Create the lock table if it does not exist
    Init,

    /// Show the live lock on a name
    Status {
        /// Lock name (document path)
        name: String,
    },

    /// Take or renew a lock
    Lock {
        /// Lock name (document path)
        name: String,

        /// Holder identity
        #[arg(long)]
        holder: String,

        /// Seconds until the lock expires
        #[arg(long, default_value_t = 900, allow_negative_numbers = true)]
        ttl: i64,
    },

    /// Release a lock held by a holder
    Unlock {
        /// Lock name (document path)
        name: String,

        /// Holder identity
        #[arg(long)]
        holder: String,
    },

    /// List every live lock
    List,

    /// Delete expired lock rows
    Prune,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_setup::init_tracing();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<bool> {
    let store = commands::open_store(cli.database.as_deref()).await?;

    match cli.command {
        Commands::Init => commands::print_json(&commands::init(&store)),
        Commands::Status { name } => commands::print_json(&commands::status(&store, &name).await?),
        Commands::Lock { name, holder, ttl } => {
            let report = commands::lock(&store, &name, &holder, ttl).await?;
            commands::print_json(&report)?;
            return Ok(report.acquired);
        }
        Commands::Unlock { name, holder } => {
            commands::print_json(&commands::unlock(&store, &name, &holder).await?)
        }
        Commands::List => commands::print_json(&commands::list(&store).await?),
        Commands::Prune => commands::print_json(&commands::prune(&store).await?),
    }?;

    Ok(true)
}
