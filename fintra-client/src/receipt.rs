//! Receipt extraction seam.

use crate::service::RemoteResult;
use async_trait::async_trait;
use fintra_core::{ExpenseDraft, ReceiptDetails};

/// Turns a base64-encoded receipt image into structured details.
///
/// Implementations may return any subset of fields; callers treat the
/// output as a suggestion only.
#[async_trait]
pub trait ReceiptExtractor: Send + Sync {
    async fn extract(&self, image_base64: &str) -> RemoteResult<ReceiptDetails>;
}

/// Run `extractor` and merge whatever it found into `draft`.
///
/// On failure the draft is left untouched.
pub async fn prefill_draft(
    extractor: &dyn ReceiptExtractor,
    image_base64: &str,
    draft: &mut ExpenseDraft,
) -> RemoteResult<()> {
    let details = extractor.extract(image_base64).await?;
    tracing::debug!(
        items = details.items.len(),
        has_amount = details.amount.is_some(),
        "receipt extracted"
    );
    draft.apply_receipt(&details);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fintra_core::RemoteError;

    struct Fixed(RemoteResult<ReceiptDetails>);

    #[async_trait]
    impl ReceiptExtractor for Fixed {
        async fn extract(&self, _image_base64: &str) -> RemoteResult<ReceiptDetails> {
            self.0.clone()
        }
    }

    fn draft() -> ExpenseDraft {
        ExpenseDraft::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
    }

    #[tokio::test]
    async fn test_prefill_applies_details() {
        let extractor = Fixed(Ok(ReceiptDetails {
            title: Some("Corner Cafe".to_string()),
            amount: Some(12.5),
            ..Default::default()
        }));
        let mut draft = draft();
        prefill_draft(&extractor, "aGVsbG8=", &mut draft).await.unwrap();
        assert_eq!(draft.title, "Corner Cafe");
        assert_eq!(draft.amount, Some(12.5));
    }

    #[tokio::test]
    async fn test_failed_extraction_leaves_draft() {
        let extractor = Fixed(Err(RemoteError::transport("extract_receipt", "offline")));
        let mut draft = draft();
        let before = draft.clone();
        assert!(prefill_draft(&extractor, "aGVsbG8=", &mut draft).await.is_err());
        assert_eq!(draft, before);
    }
}
