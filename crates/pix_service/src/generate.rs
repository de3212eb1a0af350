use tracing::{error, info};

use pix_core::models::pix::{NewPixRecord, PixRequest, PixResult};

use crate::error::Result;
use crate::PixService;

impl PixService {
    /// Builds the payload, renders it and stores the record. Nothing is
    /// stored when generation fails.
    pub async fn generate(&self, request: PixRequest) -> Result<PixResult> {
        let result = pix_core::generate(&request, &self.renderer).inspect_err(|e| {
            if !e.is_user_error() {
                error!(error = %e, "payload generation failed");
            }
        })?;

        let record = NewPixRecord { request, result };
        let saved = self.pix_repo.save(&record).await.inspect_err(|e| {
            error!(error = %e, "failed to persist pix code");
        })?;

        info!(id = saved.id, "pix code generated");
        Ok(record.result)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ServiceError;
    use crate::test_support::service;
    use pix_core::{PixError, PixRequest};

    #[tokio::test]
    async fn generated_code_is_persisted_verbatim() {
        let svc = service();
        let req = PixRequest::new("MARIA OLIVEIRA", "maria@email.com", "RIO DE JANEIRO");
        let result = svc.generate(req).await.unwrap();
        assert!(result.code.ends_with("6304F98D"));
        assert!(result.qr_png.starts_with("data:image/png;base64,"));

        let stored = svc.pix_repo.find_by_code(&result.code).await.unwrap();
        assert_eq!(stored.name, "MARIA OLIVEIRA");
        assert_eq!(stored.amount, None);
        assert_eq!(stored.result(), result);
    }

    #[tokio::test]
    async fn invalid_request_stores_nothing() {
        let svc = service();
        let err = svc.generate(PixRequest::new("", "k", "RECIFE")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Pix(PixError::MissingField("nome"))));
        assert!(svc.pix_repo.list().await.unwrap().is_empty());
    }
}
