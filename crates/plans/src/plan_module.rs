use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tenantry_core::record::{require_non_empty, stamp_created, to_fields};
use tenantry_core::{DocumentId, DomainError, DomainResult, Draft, Entity, Fields, Patch, Record};

/// Inclusion of an application module in a subscription plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlanModule {
    pub id: DocumentId,
    #[serde(default = "Utc::now")]
    pub created_date: DateTime<Utc>,
    pub id_app_module: String,
    pub id_subscription_plan: String,
    pub is_unlimited: bool,
    /// Ignored when `is_unlimited` is set.
    pub registers_limit: i64,
}

impl Entity for SubscriptionPlanModule {
    type Id = DocumentId;

    fn id(&self) -> &DocumentId {
        &self.id
    }
}

impl Record for SubscriptionPlanModule {
    const COLLECTION: &'static str = "subscriptionPlanModules";
    const LABEL: &'static str = "Subscription plan module";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateSubscriptionPlanModule {
    pub id_app_module: String,
    pub id_subscription_plan: String,
    pub is_unlimited: bool,
    pub registers_limit: i64,
}

impl Draft for CreateSubscriptionPlanModule {
    type Record = SubscriptionPlanModule;

    fn validate(&self) -> DomainResult<()> {
        require_non_empty("idAppModule", &self.id_app_module)?;
        require_non_empty("idSubscriptionPlan", &self.id_subscription_plan)?;
        if self.registers_limit < 0 {
            return Err(DomainError::validation("registersLimit must not be negative"));
        }
        Ok(())
    }

    fn into_fields(self, created_at: DateTime<Utc>) -> DomainResult<Fields> {
        let mut fields = to_fields(&self)?;
        stamp_created(&mut fields, created_at)?;
        Ok(fields)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateSubscriptionPlanModule {
    pub id_app_module: Option<String>,
    pub id_subscription_plan: Option<String>,
    pub is_unlimited: Option<bool>,
    pub registers_limit: Option<i64>,
}

impl Patch for UpdateSubscriptionPlanModule {
    type Record = SubscriptionPlanModule;

    fn validate(&self) -> DomainResult<()> {
        if let Some(v) = &self.id_app_module {
            require_non_empty("idAppModule", v)?;
        }
        if let Some(v) = &self.id_subscription_plan {
            require_non_empty("idSubscriptionPlan", v)?;
        }
        if self.registers_limit.is_some_and(|v| v < 0) {
            return Err(DomainError::validation("registersLimit must not be negative"));
        }
        Ok(())
    }
}
