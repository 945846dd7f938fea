use url::Url;
use uuid::Uuid;

/// MediaSession pairs the loaded source with the engine's media handle.
/// The bridge owns at most one at a time; the handle is released on dispose.
#[derive(Debug)]
pub struct MediaSession<M> {
    pub id: Uuid,
    pub url: Url,
    media: Option<M>,
}

impl<M> MediaSession<M> {
    pub fn new(url: Url, media: M) -> Self {
        MediaSession {
            id: Uuid::new_v4(),
            url,
            media: Some(media),
        }
    }

    pub fn media(&self) -> Option<&M> {
        self.media.as_ref()
    }

    /// Release the engine handle. Safe to call more than once.
    pub fn dispose(&mut self) {
        if let Some(media) = self.media.take() {
            drop(media);
            tracing::debug!(session = %self.id, url = %self.url, "media disposed");
        }
    }

    #[cfg(test)]
    pub fn is_disposed(&self) -> bool {
        self.media.is_none()
    }
}

impl<M> Drop for MediaSession<M> {
    fn drop(&mut self) {
        self.dispose();
    }
}
