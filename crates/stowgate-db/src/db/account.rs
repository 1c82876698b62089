//! Account repository: lookups of account records by subject identifier.

use async_trait::async_trait;
use stowgate_core::{AccountRecord, AppError};

/// Read-only access to account records.
///
/// `Ok(None)` means no record exists for the subject. Backend failures come
/// back as `AppError::BackendUnavailable` and are not retried here.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_subject(&self, subject_id: &str) -> Result<Option<AccountRecord>, AppError>;
}

#[cfg(feature = "dynamodb")]
pub use dynamo::DynamoAccountRepository;

#[cfg(feature = "dynamodb")]
mod dynamo {
    use super::AccountRepository;
    use async_trait::async_trait;
    use aws_config::BehaviorVersion;
    use aws_sdk_dynamodb::error::DisplayErrorContext;
    use aws_sdk_dynamodb::types::AttributeValue;
    use aws_sdk_dynamodb::Client as DynamoClient;
    use std::collections::HashMap;
    use stowgate_core::{AccountRecord, AppError, ServiceTier};

    const ATTR_SUB: &str = "sub";
    const ATTR_GROUP: &str = "company_id";
    const ATTR_TIER: &str = "service_tier";
    const ATTR_PAID: &str = "payed";

    /// Account records stored in a DynamoDB table keyed by `sub`.
    #[derive(Clone)]
    pub struct DynamoAccountRepository {
        client: DynamoClient,
        table: String,
    }

    impl DynamoAccountRepository {
        pub fn new(client: DynamoClient, table: String) -> Self {
            Self { client, table }
        }

        /// Create a repository with credentials from the default provider chain
        pub async fn from_region(region: &str, table: String) -> Self {
            let config = aws_config::defaults(BehaviorVersion::latest())
                .region(aws_config::Region::new(region.to_string()))
                .load()
                .await;

            Self::new(DynamoClient::new(&config), table)
        }
    }

    #[async_trait]
    impl AccountRepository for DynamoAccountRepository {
        #[tracing::instrument(skip(self), fields(
            aws.service.name = "dynamodb",
            aws.dynamodb.table = %self.table,
            aws.dynamodb.operation = "GetItem"
        ))]
        async fn find_by_subject(
            &self,
            subject_id: &str,
        ) -> Result<Option<AccountRecord>, AppError> {
            let start = std::time::Instant::now();

            let output = self
                .client
                .get_item()
                .table_name(&self.table)
                .key(ATTR_SUB, AttributeValue::S(subject_id.to_string()))
                .send()
                .await
                .map_err(|e| {
                    tracing::error!(
                        error = %DisplayErrorContext(&e),
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "DynamoDB GetItem failed"
                    );
                    AppError::BackendUnavailable(format!(
                        "Identity store lookup failed: {}",
                        e
                    ))
                })?;

            let item = match output.item() {
                Some(item) if !item.is_empty() => item,
                _ => {
                    tracing::debug!(
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "No account record for subject"
                    );
                    return Ok(None);
                }
            };

            let record = account_from_item(item)?;

            tracing::debug!(
                account_group_id = %record.account_group_id,
                service_tier = %record.service_tier,
                is_paid = record.is_paid,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Account record loaded"
            );

            Ok(Some(record))
        }
    }

    fn decode_error(attribute: &str, expected: &str) -> AppError {
        AppError::BackendUnavailable(format!(
            "Identity store record has invalid attribute '{}': expected {}",
            attribute, expected
        ))
    }

    /// Decode a stored item. Optional attributes default to an empty group,
    /// the Free tier and an unpaid account.
    pub(crate) fn account_from_item(
        item: &HashMap<String, AttributeValue>,
    ) -> Result<AccountRecord, AppError> {
        let subject_id = item
            .get(ATTR_SUB)
            .ok_or_else(|| decode_error(ATTR_SUB, "a string"))?
            .as_s()
            .map_err(|_| decode_error(ATTR_SUB, "a string"))?
            .clone();

        let account_group_id = match item.get(ATTR_GROUP) {
            Some(value) => value
                .as_s()
                .map_err(|_| decode_error(ATTR_GROUP, "a string"))?
                .clone(),
            None => String::new(),
        };

        let service_tier = match item.get(ATTR_TIER) {
            Some(value) => {
                let raw = value
                    .as_n()
                    .map_err(|_| decode_error(ATTR_TIER, "a number"))?;
                ServiceTier::from_ordinal(raw.trim().parse::<i64>().unwrap_or(0))
            }
            None => ServiceTier::Free,
        };

        let is_paid = match item.get(ATTR_PAID) {
            Some(value) => *value
                .as_bool()
                .map_err(|_| decode_error(ATTR_PAID, "a boolean"))?,
            None => false,
        };

        Ok(AccountRecord {
            subject_id,
            account_group_id,
            service_tier,
            is_paid,
        })
    }

}
