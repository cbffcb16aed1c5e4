// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - integrations and business helpers.

pub mod ai;
pub mod google_oauth;
pub mod mailer;
pub mod password;

pub use ai::{CompletionClient, ContentKind, Generated, ParsedReply};
pub use google_oauth::{GoogleOAuthClient, GoogleProfile};
pub use mailer::Mailer;
