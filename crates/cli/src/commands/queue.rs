// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queue commands: record an action locally for the next sync.

use std::path::Path;

use ireport_core::{
    Action, Category, ImageRef, KeyValueStore, NewComment, NewIncident, ProfilePatch,
    QueuedAction, ReactionToggle, ReactionType,
};

use super::Context;
use crate::cli::IncidentArgs;
use crate::error::{Error, Result};
use crate::sync::{OfflineSync, RemoteApi};

/// Fallback when the extension says nothing about the image format.
const DEFAULT_IMAGE_TYPE: &str = "image/jpeg";

pub async fn incident(ctx: &Context, args: IncidentArgs) -> Result<()> {
    let action = build_incident(args)?;
    enqueue(ctx, action).await
}

pub async fn comment(ctx: &Context, incident_id: &str, content: &str) -> Result<()> {
    let action = build_comment(incident_id, content)?;
    enqueue(ctx, action).await
}

pub async fn react(ctx: &Context, incident_id: &str, reaction: &str) -> Result<()> {
    let action = build_reaction(incident_id, reaction)?;
    enqueue(ctx, action).await
}

pub async fn profile(
    ctx: &Context,
    full_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    bio: Option<String>,
) -> Result<()> {
    let action = build_profile(full_name, email, phone, bio)?;
    enqueue(ctx, action).await
}

async fn enqueue(ctx: &Context, action: Action) -> Result<()> {
    let sync = ctx.service()?;
    enqueue_impl(&sync, action).await.map(|_| ())
}

/// Queue `action` and report where it went.
pub(crate) async fn enqueue_impl<S: KeyValueStore, A: RemoteApi>(
    sync: &OfflineSync<S, A>,
    action: Action,
) -> Result<QueuedAction> {
    let queued = sync.enqueue(action).await?;
    let pending = *sync.pending_count().borrow();
    println!("Queued {}: {}", queued.id, queued.action.summary());
    println!("{} pending; run 'ireport sync' once online", pending);
    Ok(queued)
}

pub(crate) fn build_incident(args: IncidentArgs) -> Result<Action> {
    let category: Category = args.category.parse()?;
    let image = match args.image {
        Some(path) => Some(image_ref(&path, args.image_type)?),
        None => None,
    };
    Ok(Action::CreateIncident(NewIncident {
        title: required("title", &args.title)?,
        description: required("description", &args.description)?,
        category,
        location: args
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty()),
        image,
    }))
}

pub(crate) fn build_comment(incident_id: &str, content: &str) -> Result<Action> {
    Ok(Action::CreateComment(NewComment {
        incident_id: required("incident id", incident_id)?,
        content: required("content", content)?,
    }))
}

pub(crate) fn build_reaction(incident_id: &str, reaction: &str) -> Result<Action> {
    let reaction_type: ReactionType = reaction.parse()?;
    Ok(Action::ToggleReaction(ReactionToggle {
        incident_id: required("incident id", incident_id)?,
        reaction_type,
    }))
}

pub(crate) fn build_profile(
    full_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    bio: Option<String>,
) -> Result<Action> {
    let patch = ProfilePatch {
        full_name,
        email,
        phone,
        bio,
        ..ProfilePatch::default()
    };
    if patch.is_empty() {
        return Err(Error::EmptyProfileUpdate);
    }
    Ok(Action::UpdateProfile(patch))
}

fn required(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::FieldEmpty { field });
    }
    Ok(trimmed.to_string())
}

/// Reference an image by absolute path; the file is read when the incident is sent.
fn image_ref(path: &Path, mime_type: Option<String>) -> Result<ImageRef> {
    if !path.is_file() {
        return Err(Error::ImageNotFound(path.display().to_string()));
    }
    let path = path.canonicalize()?;
    let mime_type = mime_type.unwrap_or_else(|| guess_image_type(&path).to_string());
    Ok(ImageRef {
        file_name: path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned()),
        path: path.to_string_lossy().into_owned(),
        mime_type,
    })
}

pub(crate) fn guess_image_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        _ => DEFAULT_IMAGE_TYPE,
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
