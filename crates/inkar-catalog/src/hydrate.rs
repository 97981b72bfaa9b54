//! Asynchronous image hydration for visible list slots.
//!
//! Slots render immediately with a placeholder; each visible item gets
//! one background fetch that decodes the image and posts the result
//! back through the UI queue. Fetches are independent and unordered: a
//! slow image never blocks its neighbors.
//!
//! Cancellation is fire-and-ignore. Every fetch carries the render
//! generation it was spawned under; the view discards events whose
//! generation no longer matches, so a fetch that resolves after its
//! item scrolled out can never bind to the wrong slot.
//!
//! Decoded images are cached by URL (the catalog re-shows the same
//! page constantly while the user paginates back and forth). Cache
//! hits still go through the queue and the generation check.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use image::DynamicImage;
use lru::LruCache;
use tracing::Instrument;

use inkar_core::observability::hydration_span;
use inkar_core::{BlobStore, Error, Result, TattooId, UiSender};

/// A decoded image ready for binding to a slot.
#[derive(Debug, Clone)]
pub struct HydratedImage {
    image: DynamicImage,
}

impl HydratedImage {
    /// Decodes raw bytes defensively; no content type is trusted.
    ///
    /// # Errors
    ///
    /// Returns `Error::ImageFetch` when the bytes are not a decodable
    /// image.
    pub fn decode(url: &str, bytes: &Bytes) -> Result<Self> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| Error::image_fetch(url, format!("decode failed: {e}")))?;
        Ok(Self { image })
    }

    /// Image width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Image height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// The decoded pixel data.
    #[must_use]
    pub const fn image(&self) -> &DynamicImage {
        &self.image
    }
}

/// Outcome of one hydration, delivered through the UI queue.
#[derive(Debug)]
pub struct HydrationEvent {
    /// The item the fetch was spawned for.
    pub item_id: TattooId,
    /// Render generation at spawn time; stale generations are
    /// discarded by the view.
    pub generation: u64,
    /// The decoded image, or the per-item failure.
    pub result: Result<HydratedImage>,
}

/// Fetches and decodes images for visible items.
#[derive(Clone)]
pub struct ImageHydrator {
    blob: Arc<dyn BlobStore>,
    cache: Arc<Mutex<LruCache<String, HydratedImage>>>,
    timeout: Duration,
    tx: UiSender<HydrationEvent>,
}

impl ImageHydrator {
    /// Creates a hydrator posting results to `tx`.
    #[must_use]
    pub fn new(
        blob: Arc<dyn BlobStore>,
        cache_capacity: NonZeroUsize,
        timeout: Duration,
        tx: UiSender<HydrationEvent>,
    ) -> Self {
        Self {
            blob,
            cache: Arc::new(Mutex::new(LruCache::new(cache_capacity))),
            timeout,
            tx,
        }
    }

    /// Spawns one background hydration for a visible slot.
    ///
    /// The task never fails the caller: fetch and decode errors are
    /// logged and delivered as an `Err` event for the view to ignore.
    pub fn spawn(
        &self,
        item_id: TattooId,
        image_ref: String,
        generation: u64,
    ) -> tokio::task::JoinHandle<()> {
        let hydrator = self.clone();
        tokio::spawn(async move {
            let result = hydrator.hydrate_once(item_id.as_str(), &image_ref).await;
            if let Err(err) = &result {
                tracing::warn!(item = %item_id, url = %image_ref, error = %err, "hydration failed");
            }
            // The queue side may be gone (screen dismissed); discard.
            hydrator.tx.post(HydrationEvent {
                item_id,
                generation,
                result,
            });
        })
    }

    /// Fetches and decodes one image, consulting the cache first.
    ///
    /// # Errors
    ///
    /// Returns `Error::ImageFetch` on transport failure, timeout, or
    /// undecodable bytes. Always contained per item by callers.
    pub async fn hydrate_once(&self, item_id: &str, image_ref: &str) -> Result<HydratedImage> {
        // Instrumented rather than entered: concurrent hydrations
        // interleave at the fetch await, and an entered guard would
        // bleed this span onto whatever task runs next on the thread.
        let span = hydration_span(item_id, image_ref);
        async {
            if let Some(hit) = self.cache_get(image_ref)? {
                tracing::debug!("image cache hit");
                return Ok(hit);
            }

            let bytes = tokio::time::timeout(self.timeout, self.blob.fetch_image(image_ref))
                .await
                .map_err(|_| {
                    Error::image_fetch(
                        image_ref,
                        format!("timed out after {}s", self.timeout.as_secs()),
                    )
                })??;

            let decoded = HydratedImage::decode(image_ref, &bytes)?;
            self.cache_put(image_ref, decoded.clone())?;
            Ok(decoded)
        }
        .instrument(span)
        .await
    }

    fn cache_get(&self, image_ref: &str) -> Result<Option<HydratedImage>> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| Error::internal("image cache lock poisoned"))?;
        Ok(cache.get(image_ref).cloned())
    }

    fn cache_put(&self, image_ref: &str, image: HydratedImage) -> Result<()> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| Error::internal("image cache lock poisoned"))?;
        cache.put(image_ref.to_string(), image);
        Ok(())
    }

    /// Number of images currently cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache lock is poisoned.
    pub fn cached_len(&self) -> Result<usize> {
        let cache = self
            .cache
            .lock()
            .map_err(|_| Error::internal("image cache lock poisoned"))?;
        Ok(cache.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use image::ImageFormat;
    use inkar_core::{MemoryBlobStore, UiQueue};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Bytes {
        let img = DynamicImage::ImageRgba8(image::RgbaImage::new(width, height));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .expect("encode should succeed");
        Bytes::from(buf)
    }

    fn hydrator_with(
        blob: Arc<dyn BlobStore>,
        capacity: usize,
    ) -> (ImageHydrator, UiQueue<HydrationEvent>) {
        let queue = UiQueue::new();
        let hydrator = ImageHydrator::new(
            blob,
            NonZeroUsize::new(capacity).expect("capacity > 0"),
            Duration::from_secs(5),
            queue.sender(),
        );
        (hydrator, queue)
    }

    #[tokio::test]
    async fn hydrate_decodes_dimensions() {
        let blob = Arc::new(MemoryBlobStore::new());
        let url = blob.seed("tattoos/a.png", png_bytes(3, 2));
        let (hydrator, _queue) = hydrator_with(blob, 8);

        let image = hydrator
            .hydrate_once("t1", &url)
            .await
            .expect("should hydrate");
        assert_eq!(image.width(), 3);
        assert_eq!(image.height(), 2);
    }

    #[tokio::test]
    async fn undecodable_bytes_are_image_fetch_error() {
        let blob = Arc::new(MemoryBlobStore::new());
        let url = blob.seed("tattoos/bad.png", Bytes::from_static(b"not an image"));
        let (hydrator, _queue) = hydrator_with(blob, 8);

        let err = hydrator
            .hydrate_once("t1", &url)
            .await
            .expect_err("should fail to decode");
        assert!(matches!(err, Error::ImageFetch { .. }));
    }

    #[tokio::test]
    async fn second_hydration_hits_cache() {
        let blob = Arc::new(MemoryBlobStore::new());
        let url = blob.seed("tattoos/a.png", png_bytes(2, 2));
        let (hydrator, _queue) = hydrator_with(blob.clone(), 8);

        hydrator.hydrate_once("t1", &url).await.expect("first");
        hydrator.hydrate_once("t1", &url).await.expect("second");

        assert_eq!(blob.fetch_count(), 1);
        assert_eq!(hydrator.cached_len().expect("len"), 1);
    }

    #[tokio::test]
    async fn cache_evicts_at_capacity() {
        let blob = Arc::new(MemoryBlobStore::new());
        let url_a = blob.seed("tattoos/a.png", png_bytes(1, 1));
        let url_b = blob.seed("tattoos/b.png", png_bytes(1, 1));
        let url_c = blob.seed("tattoos/c.png", png_bytes(1, 1));
        let (hydrator, _queue) = hydrator_with(blob.clone(), 2);

        hydrator.hydrate_once("a", &url_a).await.expect("a");
        hydrator.hydrate_once("b", &url_b).await.expect("b");
        hydrator.hydrate_once("c", &url_c).await.expect("c");
        assert_eq!(hydrator.cached_len().expect("len"), 2);

        // a was least recently used and evicted; re-fetch hits store.
        hydrator.hydrate_once("a", &url_a).await.expect("a again");
        assert_eq!(blob.fetch_count(), 4);
    }

    #[tokio::test]
    async fn spawn_posts_event_with_generation() {
        let blob = Arc::new(MemoryBlobStore::new());
        let url = blob.seed("tattoos/a.png", png_bytes(1, 1));
        let (hydrator, mut queue) = hydrator_with(blob, 8);

        let id = TattooId::new("t1").expect("valid");
        hydrator
            .spawn(id.clone(), url, 7)
            .await
            .expect("task should finish");

        let events = queue.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].item_id, id);
        assert_eq!(events[0].generation, 7);
        assert!(events[0].result.is_ok());
    }

    #[tokio::test]
    async fn spawn_delivers_failure_as_event() {
        let blob = Arc::new(MemoryBlobStore::new());
        let (hydrator, mut queue) = hydrator_with(blob, 8);

        let id = TattooId::new("t1").expect("valid");
        hydrator
            .spawn(id, "memory://blobs/missing.png".to_string(), 1)
            .await
            .expect("task should finish");

        let events = queue.drain();
        assert_eq!(events.len(), 1);
        assert!(events[0].result.is_err());
    }

    #[tokio::test]
    async fn spawn_survives_dropped_queue() {
        let blob = Arc::new(MemoryBlobStore::new());
        let url = blob.seed("tattoos/a.png", png_bytes(1, 1));
        let (hydrator, queue) = hydrator_with(blob, 8);
        drop(queue);

        // Fire-and-ignore: posting to a dropped queue must not panic.
        let id = TattooId::new("t1").expect("valid");
        hydrator
            .spawn(id, url, 1)
            .await
            .expect("task should finish");
    }

    /// Blob store that never answers, for timeout coverage.
    struct StalledBlobStore;

    #[async_trait]
    impl BlobStore for StalledBlobStore {
        async fn fetch_image(&self, _url: &str) -> Result<Bytes> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            unreachable!("sleep outlives every test timeout")
        }

        async fn put_blob(&self, _path: &str, _data: Bytes) -> Result<String> {
            Err(Error::write("unsupported"))
        }

        async fn delete_blob(&self, _url: &str) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn suspended_fetch_leaves_no_span_on_thread() {
        let _sub = tracing::subscriber::set_default(tracing_subscriber::registry());
        let (hydrator, _queue) = hydrator_with(Arc::new(StalledBlobStore), 8);

        let id = TattooId::new("t1").expect("valid");
        let task = hydrator.spawn(id, "https://img/slow.png".to_string(), 1);
        // Let the fetch task run up to its await point and suspend.
        tokio::task::yield_now().await;

        // The suspended task's span must not bleed onto this thread;
        // events logged here would otherwise carry its item and url.
        assert!(tracing::Span::current().is_none());
        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn slow_fetch_times_out_per_item() {
        let (hydrator, _queue) = hydrator_with(Arc::new(StalledBlobStore), 8);

        let err = hydrator
            .hydrate_once("t1", "https://img/slow.png")
            .await
            .expect_err("should time out");
        assert!(matches!(err, Error::ImageFetch { .. }));
        assert!(err.to_string().contains("timed out"));
    }
}
