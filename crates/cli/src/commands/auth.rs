// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Login and logout: manage the stored API credentials.

use ireport_core::{keys, KeyValueStore};

use super::Context;
use crate::error::{Error, Result};

pub fn login(ctx: &Context, token: &str) -> Result<()> {
    login_impl(&ctx.store, token)?;
    println!("Token saved; queued actions will be sent with it");
    Ok(())
}

pub(crate) fn login_impl(store: &impl KeyValueStore, token: &str) -> Result<()> {
    let token = token.trim();
    if token.is_empty() {
        return Err(Error::FieldEmpty { field: "token" });
    }
    store.set(keys::AUTH_TOKEN, token)?;
    tracing::debug!("stored API token");
    Ok(())
}

pub fn logout(ctx: &Context) -> Result<()> {
    if logout_impl(&ctx.store)? {
        println!("Signed out");
    } else {
        println!("Not signed in");
    }
    Ok(())
}

/// Forget the token and cached user. Returns whether a token was stored.
///
/// Queued actions are kept; they are sent after the next login.
pub(crate) fn logout_impl(store: &impl KeyValueStore) -> Result<bool> {
    let had_token = store.get(keys::AUTH_TOKEN)?.is_some();
    store.remove(keys::AUTH_TOKEN)?;
    store.remove(keys::USER_DATA)?;
    Ok(had_token)
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
