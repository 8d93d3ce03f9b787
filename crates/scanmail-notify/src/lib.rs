// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanmail-notify — Emails each scanned document to the configured recipient
// over SMTP with STARTTLS and password authentication.

pub mod mailer;

pub use mailer::{DocumentSender, Notifier, compose_message};
