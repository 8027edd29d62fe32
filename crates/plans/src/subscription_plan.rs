use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use tenantry_core::record::{require_non_empty, require_non_negative, stamp_created, to_fields};
use tenantry_core::{DocumentId, DomainError, DomainResult, Draft, Entity, Fields, Patch, Record};

/// A plan companies can subscribe to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPlan {
    pub id: DocumentId,
    pub annual_price: f64,
    pub country: String,
    #[serde(default = "Utc::now")]
    pub created_date: DateTime<Utc>,
    pub description: String,
    #[serde(default)]
    pub is_active: bool,
    /// License length in months.
    pub license_period: i64,
    pub monthly_price: f64,
    pub name: String,
    pub non_expiring_license: bool,
}

impl Entity for SubscriptionPlan {
    type Id = DocumentId;

    fn id(&self) -> &DocumentId {
        &self.id
    }
}

impl Record for SubscriptionPlan {
    const COLLECTION: &'static str = "subscriptionPlans";
    const LABEL: &'static str = "Subscription plan";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateSubscriptionPlan {
    pub annual_price: f64,
    pub country: String,
    pub description: String,
    pub is_active: Option<bool>,
    pub license_period: i64,
    pub monthly_price: f64,
    pub name: String,
    pub non_expiring_license: bool,
}

impl Draft for CreateSubscriptionPlan {
    type Record = SubscriptionPlan;

    fn validate(&self) -> DomainResult<()> {
        require_non_empty("name", &self.name)?;
        require_non_empty("country", &self.country)?;
        require_non_negative("annualPrice", self.annual_price)?;
        require_non_negative("monthlyPrice", self.monthly_price)?;
        if self.license_period < 0 {
            return Err(DomainError::validation("licensePeriod must not be negative"));
        }
        Ok(())
    }

    fn into_fields(mut self, created_at: DateTime<Utc>) -> DomainResult<Fields> {
        let is_active = self.is_active.take().unwrap_or(true);
        let mut fields = to_fields(&self)?;
        fields.insert("isActive".to_string(), Value::Bool(is_active));
        stamp_created(&mut fields, created_at)?;
        Ok(fields)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateSubscriptionPlan {
    pub annual_price: Option<f64>,
    pub country: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub license_period: Option<i64>,
    pub monthly_price: Option<f64>,
    pub name: Option<String>,
    pub non_expiring_license: Option<bool>,
}

impl Patch for UpdateSubscriptionPlan {
    type Record = SubscriptionPlan;

    fn validate(&self) -> DomainResult<()> {
        if let Some(v) = &self.name {
            require_non_empty("name", v)?;
        }
        if let Some(v) = &self.country {
            require_non_empty("country", v)?;
        }
        if let Some(v) = self.annual_price {
            require_non_negative("annualPrice", v)?;
        }
        if let Some(v) = self.monthly_price {
            require_non_negative("monthlyPrice", v)?;
        }
        if self.license_period.is_some_and(|p| p < 0) {
            return Err(DomainError::validation("licensePeriod must not be negative"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft() -> CreateSubscriptionPlan {
        serde_json::from_value(json!({
            "annualPrice": 1200.0,
            "country": "CO",
            "description": "Everything included",
            "licensePeriod": 12,
            "monthlyPrice": 110.0,
            "name": "Pro",
            "nonExpiringLicense": false
        }))
        .unwrap()
    }

    #[test]
    fn valid_plan_is_active_by_default() {
        let d = draft();
        d.validate().unwrap();
        let fields = d.into_fields(Utc::now()).unwrap();
        assert_eq!(fields["isActive"], true);
        assert_eq!(fields["monthlyPrice"], 110.0);
    }

    #[test]
    fn prices_must_not_be_negative() {
        let mut d = draft();
        d.monthly_price = -1.0;
        assert!(matches!(
            d.validate(),
            Err(DomainError::Validation(m)) if m.contains("monthlyPrice")
        ));

        let u = UpdateSubscriptionPlan { annual_price: Some(-10.0), ..Default::default() };
        assert!(u.validate().is_err());
    }

    #[test]
    fn empty_update_is_rejected() {
        assert!(UpdateSubscriptionPlan::default().into_fields().is_err());
    }
}
