//! Background search and photo download tasks.
//!
//! Every task is tagged with the load attempt (generation) that started it
//! and reports back over an unbounded channel. The event loop drops results
//! whose generation is no longer current.

use std::sync::Arc;
use std::time::Duration;

use parallax_core::{ImageFetcher, ImageRecord, SearchRequest};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::event::{ImageLoadResult, SearchResult};
use crate::images::PhotoPixels;

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);
const IMAGE_ACCEPT: &str = "image/jpeg,image/png,image/webp,image/*;q=0.8";

pub struct Loader {
    fetcher: Arc<ImageFetcher>,
    client: reqwest::Client,
    search_tx: mpsc::UnboundedSender<SearchResult>,
    image_tx: mpsc::UnboundedSender<ImageLoadResult>,
    tasks: Vec<JoinHandle<()>>,
}

impl Loader {
    pub fn new(
        fetcher: Arc<ImageFetcher>,
        search_tx: mpsc::UnboundedSender<SearchResult>,
        image_tx: mpsc::UnboundedSender<ImageLoadResult>,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("parallax/", env!("CARGO_PKG_VERSION")))
            .timeout(DOWNLOAD_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self {
            fetcher,
            client,
            search_tx,
            image_tx,
            tasks: Vec::new(),
        })
    }

    /// Start the single search request of a load attempt
    pub fn spawn_search(&mut self, generation: u64, request: SearchRequest) {
        let fetcher = Arc::clone(&self.fetcher);
        let tx = self.search_tx.clone();

        self.track(tokio::spawn(async move {
            let result = match fetcher.fetch(&request).await {
                Ok(records) => SearchResult::Success {
                    generation,
                    records,
                },
                Err(e) => {
                    if e.is_fetch_failure() {
                        tracing::warn!("Search for '{}' failed: {}", request.query(), e);
                    } else {
                        tracing::error!("Search for '{}' could not start: {}", request.query(), e);
                    }
                    SearchResult::Failure {
                        generation,
                        error: e.to_string(),
                    }
                }
            };
            // Receiver gone means the app is shutting down
            let _ = tx.send(result);
        }));
    }

    /// Download and decode one photo sized for `width_px` columns of pixels
    pub fn spawn_image(
        &mut self,
        generation: u64,
        record: &ImageRecord,
        width_px: u32,
        blur_sigma: f32,
    ) {
        let client = self.client.clone();
        let tx = self.image_tx.clone();
        let id = record.id.clone();
        let url = record.sized_url(width_px);

        self.track(tokio::spawn(async move {
            tracing::debug!("Loading photo {} from {}", id, url);
            let result = match load_photo(&client, &url, blur_sigma).await {
                Ok(pixels) => ImageLoadResult::Success {
                    generation,
                    id,
                    pixels,
                },
                Err(error) => {
                    tracing::warn!("Photo {} failed: {}", id, error);
                    ImageLoadResult::Failure {
                        generation,
                        id,
                        error,
                    }
                }
            };
            let _ = tx.send(result);
        }));
    }

    /// Cancel every outstanding task
    pub fn abort_all(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }

    fn track(&mut self, handle: JoinHandle<()>) {
        self.tasks.retain(|t| !t.is_finished());
        self.tasks.push(handle);
    }
}

impl Drop for Loader {
    fn drop(&mut self) {
        self.abort_all();
    }
}

async fn load_photo(
    client: &reqwest::Client,
    url: &str,
    blur_sigma: f32,
) -> Result<PhotoPixels, String> {
    let bytes = download_bytes(client, url).await?;

    // Decode and blur are CPU-bound
    tokio::task::spawn_blocking(move || PhotoPixels::decode(&bytes, blur_sigma))
        .await
        .map_err(|e| format!("Task failed: {}", e))?
}

async fn download_bytes(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, String> {
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, IMAGE_ACCEPT)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status()));
    }

    response
        .bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|e| format!("Read error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn serve_once(status: &'static str, content_type: &'static str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let head = format!(
                "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                content_type,
                body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(&body).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{}", addr)
    }

    fn png_bytes() -> Vec<u8> {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            6,
            4,
            image::Rgb([1, 2, 3]),
        ));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn record(base: &str) -> ImageRecord {
        ImageRecord {
            id: "p1".to_string(),
            full_url: format!("{}/full.png", base),
            raw_url: format!("{}/raw.png", base),
            alt_description: None,
        }
    }

    fn loader() -> (
        Loader,
        mpsc::UnboundedReceiver<SearchResult>,
        mpsc::UnboundedReceiver<ImageLoadResult>,
    ) {
        let (search_tx, search_rx) = mpsc::unbounded_channel();
        let (image_tx, image_rx) = mpsc::unbounded_channel();
        let fetcher =
            ImageFetcher::with_client(reqwest::Client::new(), "http://127.0.0.1:9").unwrap();
        let loader = Loader::new(Arc::new(fetcher), search_tx, image_tx).unwrap();
        (loader, search_rx, image_rx)
    }

    #[tokio::test]
    async fn test_image_success_carries_generation() {
        let base = serve_once("200 OK", "image/png", png_bytes()).await;
        let (mut loader, _search_rx, mut image_rx) = loader();

        loader.spawn_image(7, &record(&base), 200, 1.0);

        match image_rx.recv().await.unwrap() {
            ImageLoadResult::Success { generation, id, pixels } => {
                assert_eq!(generation, 7);
                assert_eq!(id, "p1");
                assert_eq!(pixels.source_dimensions(), (6, 4));
            }
            ImageLoadResult::Failure { error, .. } => panic!("unexpected failure: {}", error),
        }
    }

    #[tokio::test]
    async fn test_image_http_error_is_failure() {
        let base = serve_once("404 Not Found", "text/plain", b"missing".to_vec()).await;
        let (mut loader, _search_rx, mut image_rx) = loader();

        loader.spawn_image(2, &record(&base), 200, 1.0);

        match image_rx.recv().await.unwrap() {
            ImageLoadResult::Failure { generation, error, .. } => {
                assert_eq!(generation, 2);
                assert!(error.contains("404"));
            }
            ImageLoadResult::Success { .. } => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn test_search_failure_is_reported() {
        let (mut loader, mut search_rx, _image_rx) = loader();
        let request = SearchRequest::new("cat", 8, "key").unwrap();

        loader.spawn_search(3, request);

        let result = search_rx.recv().await.unwrap();
        assert_eq!(result.generation(), 3);
        assert!(matches!(result, SearchResult::Failure { .. }));
    }

    #[tokio::test]
    async fn test_abort_all_drops_pending_results() {
        // Accepts but never answers
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let (mut loader, _search_rx, mut image_rx) = loader();

        loader.spawn_image(1, &record(&base), 200, 1.0);
        loader.abort_all();
        drop(loader);

        // All senders are gone once the aborted task is torn down
        assert!(image_rx.recv().await.is_none());
        drop(listener);
    }
}
