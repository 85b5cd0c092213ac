// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use std::process::ExitCode;

use aprscan::bootstrap::{init_tracing, run, LogFormat};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing(LogFormat::from_lookup(|key| dotenvy::var(key).ok()));

    if let Err(e) = run().await {
        tracing::error!("APR service error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}
