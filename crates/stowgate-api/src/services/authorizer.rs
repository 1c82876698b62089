//! Upload authorization: identity lookup, usage accounting and quota policy.

use std::sync::Arc;

use stowgate_core::{decide, AppError, AuthorizedContext, QuotaDecision, UploadRequest};
use stowgate_db::AccountRepository;
use stowgate_storage::UsageAccountant;

/// Decides whether a parsed upload request may proceed.
///
/// The namespace, tier and paid flag always come from the stored account
/// record. The two backend reads run one after the other and nothing is
/// written.
#[derive(Clone)]
pub struct Authorizer {
    accounts: Arc<dyn AccountRepository>,
    usage: UsageAccountant,
}

impl Authorizer {
    pub fn new(accounts: Arc<dyn AccountRepository>, usage: UsageAccountant) -> Self {
        Self { accounts, usage }
    }

    #[tracing::instrument(
        skip(self, request),
        fields(
            subject_id = %request.subject_id,
            requested_bytes = request.requested_file_size_bytes,
            operation = "authorize_upload"
        )
    )]
    pub async fn authorize(&self, request: &UploadRequest) -> Result<AuthorizedContext, AppError> {
        let record = self
            .accounts
            .find_by_subject(&request.subject_id)
            .await?
            .ok_or_else(|| {
                tracing::debug!("No account record for subject");
                AppError::IdentityNotFound
            })?;

        if record.subject_id != request.subject_id || record.account_group_id.is_empty() {
            tracing::warn!(
                stored_subject_id = %record.subject_id,
                "Account record is unusable for this subject"
            );
            return Err(AppError::IdentityNotFound);
        }

        let context = AuthorizedContext::enrich(request.clone(), &record);

        let usage_bytes = self
            .usage
            .current_usage_bytes(context.account_group_id())
            .await?;

        match decide(
            context.service_tier(),
            context.is_paid(),
            usage_bytes,
            context.requested_file_size_bytes(),
        ) {
            QuotaDecision::Allow => {
                tracing::info!(
                    account_group_id = %context.account_group_id(),
                    tier = %context.service_tier(),
                    usage_bytes,
                    outcome = "allow",
                    "Upload authorized"
                );
                Ok(context)
            }
            QuotaDecision::Deny(reason) => {
                tracing::info!(
                    account_group_id = %context.account_group_id(),
                    tier = %context.service_tier(),
                    is_paid = context.is_paid(),
                    usage_bytes,
                    outcome = "deny",
                    reason = ?reason,
                    "Upload denied"
                );
                Err(reason.into())
            }
        }
    }
}
