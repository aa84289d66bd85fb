//! Multi-page comment collection for `YoutubeClient`.

use std::time::Duration;

use yolix_core::{CollectionResult, VideoMetadata};

use crate::client::YoutubeClient;
use crate::error::YoutubeError;
use crate::types::CommentThread;
use crate::video_id::extract_video_id;

/// Everything fetched for one watch URL.
#[derive(Debug, Clone)]
pub struct VideoComments {
    pub video_id: String,
    pub metadata: VideoMetadata,
    pub collection: CollectionResult,
}

impl YoutubeClient {
    /// Fetches every top-level comment thread of a video.
    ///
    /// Starts without a cursor and follows `nextPageToken` until a page comes
    /// back without one. An empty page that still carries a cursor does not end
    /// the walk. A fixed `page_delay_ms` pause separates consecutive requests.
    ///
    /// `declared_total` is taken from the first page's `pageInfo.totalResults`
    /// and is not reconciled with the number of comments actually returned.
    ///
    /// **All-or-nothing semantics**: on any page failure the comments gathered
    /// so far are discarded and the error is returned.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_comment_page`].
    /// Returns [`YoutubeError::PaginationLimit`] if a page cap is configured
    /// and the cursor chain runs past it.
    pub async fn collect_all_comments(
        &self,
        video_id: &str,
    ) -> Result<CollectionResult, YoutubeError> {
        let mut comments = Vec::new();
        let mut cursor: Option<String> = None;
        let mut declared_total: Option<u64> = None;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if let Some(max_pages) = self.max_pages {
                if page_count > max_pages {
                    return Err(YoutubeError::PaginationLimit {
                        video_id: video_id.to_owned(),
                        max_pages,
                    });
                }
            }

            if page_count > 1 && self.page_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.page_delay_ms)).await;
            }

            let page = self
                .fetch_comment_page(video_id, cursor.as_deref())
                .await
                .inspect_err(|e| {
                    tracing::error!(
                        video_id,
                        page = page_count,
                        error = %e,
                        "comment page fetch failed; aborting collection"
                    );
                })?;

            if declared_total.is_none() {
                declared_total = Some(page.page_info.total_results);
            }

            let received = page.items.len();
            comments.extend(page.items.into_iter().map(CommentThread::into_comment));
            tracing::debug!(
                video_id,
                page = page_count,
                received,
                accumulated = comments.len(),
                "fetched comment page"
            );

            cursor = page.next_page_token.filter(|t| !t.is_empty());
            if cursor.is_none() {
                break;
            }
        }

        let declared_total = declared_total.unwrap_or_default();
        tracing::info!(
            video_id,
            pages = page_count,
            collected = comments.len(),
            declared_total,
            "comment collection complete"
        );

        Ok(CollectionResult {
            comments,
            declared_total,
        })
    }

    /// Fetches metadata followed by every comment for one video ID.
    ///
    /// # Errors
    ///
    /// Any error from [`Self::fetch_video_metadata`] or
    /// [`Self::collect_all_comments`].
    pub async fn fetch_video(&self, video_id: &str) -> Result<VideoComments, YoutubeError> {
        let metadata = self.fetch_video_metadata(video_id).await?;
        let collection = self.collect_all_comments(video_id).await?;
        Ok(VideoComments {
            video_id: video_id.to_owned(),
            metadata,
            collection,
        })
    }

    /// Resolves a watch URL to its video ID, then runs [`Self::fetch_video`].
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::InvalidUrl`] if the URL has no `v=` parameter.
    /// - Any error from [`Self::fetch_video`].
    pub async fn fetch_video_comments(&self, url: &str) -> Result<VideoComments, YoutubeError> {
        let video_id = extract_video_id(url)?;
        self.fetch_video(&video_id).await
    }
}
