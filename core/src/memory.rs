//! In-memory reference host.
//!
//! Implements the [`Host`] and [`MediaElement`] seams entirely in process.
//! Used by the workspace's own tests and by headless embedders that want the
//! navigation semantics without a real page.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::sync::Notify;

use crate::host::{Host, ScriptSpec};
use crate::media::{GestureSource, MediaElement, PlayRejected};
use crate::state::Phase;

#[derive(Debug, Clone, Default)]
struct TemplateEntry {
    body: String,
    scripts: Vec<ScriptSpec>,
    media: Vec<MemoryMedia>,
}

/// A cloned template instantiation.
#[derive(Debug, Clone)]
pub struct MemoryContent {
    body: String,
    scripts: Vec<ScriptSpec>,
    media: Vec<MemoryMedia>,
}

impl MemoryContent {
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// An in-process page: template store, content area, nav links, fragment.
#[derive(Debug, Default)]
pub struct MemoryHost {
    templates: HashMap<String, TemplateEntry>,
    links: Vec<String>,
    content: String,
    scripts: Vec<ScriptSpec>,
    executed_scripts: Vec<ScriptSpec>,
    media: Vec<MemoryMedia>,
    phase: Phase,
    loading: bool,
    scroll: (u32, u32),
    active_link: Option<String>,
    fragment: Option<String>,
    history: Vec<String>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_template(&mut self, id: impl Into<String>, body: impl Into<String>) {
        self.templates.insert(
            id.into(),
            TemplateEntry {
                body: body.into(),
                ..Default::default()
            },
        );
    }

    /// Attach an inert script to an existing template.
    pub fn attach_script(&mut self, template_id: &str, script: ScriptSpec) {
        if let Some(entry) = self.templates.get_mut(template_id) {
            entry.scripts.push(script);
        }
    }

    /// Attach a media element to an existing template. The handle stays
    /// shared: the caller keeps observing the same element after swaps.
    pub fn attach_media(&mut self, template_id: &str, media: MemoryMedia) {
        if let Some(entry) = self.templates.get_mut(template_id) {
            entry.media.push(media);
        }
    }

    pub fn add_link(&mut self, page: impl Into<String>) {
        self.links.push(page.into());
    }

    /// Emulate the platform moving the fragment (back/forward navigation).
    /// Does not touch the push history.
    pub fn set_fragment(&mut self, fragment: Option<String>) {
        self.fragment = fragment;
    }

    /// Scroll away from the top, for asserting the reset.
    pub fn set_scroll(&mut self, x: u32, y: u32) {
        self.scroll = (x, y);
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn scroll(&self) -> (u32, u32) {
        self.scroll
    }

    pub fn active_link(&self) -> Option<&str> {
        self.active_link.as_deref()
    }

    /// Fragments written through `push_fragment`, in order.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn executed_scripts(&self) -> &[ScriptSpec] {
        &self.executed_scripts
    }
}

impl Host for MemoryHost {
    type Content = MemoryContent;
    type Media = MemoryMedia;

    fn clone_template(&self, template_id: &str) -> Option<Self::Content> {
        self.templates.get(template_id).map(|entry| MemoryContent {
            body: entry.body.clone(),
            scripts: entry.scripts.clone(),
            media: entry.media.clone(),
        })
    }

    fn swap_content(&mut self, content: Self::Content) {
        self.content = content.body;
        self.scripts = content.scripts;
        self.media = content.media;
    }

    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    fn set_loading(&mut self, active: bool) {
        self.loading = active;
    }

    fn take_inert_scripts(&mut self) -> Vec<ScriptSpec> {
        std::mem::take(&mut self.scripts)
    }

    fn instantiate_script(&mut self, script: ScriptSpec) {
        self.executed_scripts.push(script);
    }

    fn media_elements(&self) -> Vec<Self::Media> {
        self.media.clone()
    }

    fn scroll_to_top(&mut self) {
        self.scroll = (0, 0);
    }

    fn set_active_link(&mut self, page: &str) {
        self.active_link = self
            .links
            .iter()
            .find(|link| link.as_str() == page)
            .cloned();
    }

    fn read_fragment(&self) -> Option<String> {
        self.fragment.clone()
    }

    fn push_fragment(&mut self, page: &str) {
        self.fragment = Some(page.to_string());
        self.history.push(page.to_string());
    }
}

#[derive(Debug, Default)]
struct MediaState {
    paused: AtomicBool,
    muted: AtomicBool,
    user_unmuted: AtomicBool,
    started_loading: AtomicBool,
    inline_play_trigger: AtomicBool,
    retry_armed: AtomicBool,
    load_calls: AtomicUsize,
    play_attempts: AtomicUsize,
    rejections_left: AtomicUsize,
    gesture: Notify,
}

/// Shared handle to an in-process media element. Starts paused, unmuted,
/// not yet loading.
#[derive(Debug, Clone)]
pub struct MemoryMedia {
    state: Arc<MediaState>,
}

impl MemoryMedia {
    pub fn new() -> Self {
        let state = MediaState::default();
        state.paused.store(true, Ordering::Relaxed);
        Self {
            state: Arc::new(state),
        }
    }

    pub fn with_user_unmuted(self) -> Self {
        self.state.user_unmuted.store(true, Ordering::Relaxed);
        self
    }

    pub fn with_inline_play_trigger(self) -> Self {
        self.state.inline_play_trigger.store(true, Ordering::Relaxed);
        self
    }

    pub fn with_started_loading(self) -> Self {
        self.state.started_loading.store(true, Ordering::Relaxed);
        self
    }

    /// Make the next `count` play attempts fail with [`PlayRejected`].
    pub fn reject_next_plays(&self, count: usize) {
        self.state.rejections_left.store(count, Ordering::Relaxed);
    }

    /// Wake every retry currently awaiting a gesture on this element.
    pub fn emit_gesture(&self) {
        self.state.gesture.notify_waiters();
    }

    pub fn is_playing(&self) -> bool {
        !self.is_paused()
    }

    pub fn play_attempts(&self) -> usize {
        self.state.play_attempts.load(Ordering::Relaxed)
    }

    pub fn load_calls(&self) -> usize {
        self.state.load_calls.load(Ordering::Relaxed)
    }
}

impl Default for MemoryMedia {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl GestureSource for MemoryMedia {
    async fn next_gesture(&self) {
        self.state.gesture.notified().await;
    }
}

#[async_trait::async_trait]
impl MediaElement for MemoryMedia {
    type Error = PlayRejected;

    fn is_paused(&self) -> bool {
        self.state.paused.load(Ordering::Relaxed)
    }

    fn is_muted(&self) -> bool {
        self.state.muted.load(Ordering::Relaxed)
    }

    fn set_muted(&self, muted: bool) {
        self.state.muted.store(muted, Ordering::Relaxed);
    }

    fn user_unmuted(&self) -> bool {
        self.state.user_unmuted.load(Ordering::Relaxed)
    }

    fn has_started_loading(&self) -> bool {
        self.state.started_loading.load(Ordering::Relaxed)
    }

    fn load(&self) {
        self.state.load_calls.fetch_add(1, Ordering::Relaxed);
        self.state.started_loading.store(true, Ordering::Relaxed);
    }

    async fn play(&self) -> Result<(), Self::Error> {
        self.state.play_attempts.fetch_add(1, Ordering::Relaxed);
        let left = self.state.rejections_left.load(Ordering::Relaxed);
        if left > 0 {
            self.state.rejections_left.store(left - 1, Ordering::Relaxed);
            return Err(PlayRejected);
        }
        self.state.paused.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn has_inline_play_trigger(&self) -> bool {
        self.state.inline_play_trigger.load(Ordering::Relaxed)
    }

    fn retry_armed(&self) -> bool {
        self.state.retry_armed.load(Ordering::Relaxed)
    }

    fn mark_retry_armed(&self) {
        self.state.retry_armed.store(true, Ordering::Relaxed);
    }
}

/// Document-level gesture source for the first-interaction resume path.
#[derive(Debug, Clone, Default)]
pub struct MemoryGestures {
    inner: Arc<Notify>,
}

impl MemoryGestures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self) {
        self.inner.notify_waiters();
    }
}

#[async_trait::async_trait]
impl GestureSource for MemoryGestures {
    async fn next_gesture(&self) {
        self.inner.notified().await;
    }
}
