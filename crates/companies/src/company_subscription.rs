use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use tenantry_core::record::{require_non_empty, require_non_negative, stamp_created, to_fields};
use tenantry_core::{DocumentId, DomainError, DomainResult, Draft, Entity, Fields, Patch, Record};

/// A company's subscription to a plan for a billing period.
///
/// Amounts are stored as sent by the client; pricing rules live elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySubscription {
    pub id: DocumentId,
    pub billing_cycle: String,
    #[serde(default = "Utc::now")]
    pub created_date: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub end_date: DateTime<Utc>,
    pub id_company: String,
    pub id_subscription_plan: String,
    #[serde(default)]
    pub is_active: bool,
    pub license_period: i64,
    pub price: f64,
    pub discount: f64,
    pub vat_percentage: f64,
    pub vat_value: f64,
    pub final_price: f64,
    #[serde(default = "Utc::now")]
    pub start_date: DateTime<Utc>,
}

impl Entity for CompanySubscription {
    type Id = DocumentId;

    fn id(&self) -> &DocumentId {
        &self.id
    }
}

impl Record for CompanySubscription {
    const COLLECTION: &'static str = "companySubscriptions";
    const LABEL: &'static str = "Company subscription";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateCompanySubscription {
    pub billing_cycle: String,
    pub end_date: DateTime<Utc>,
    pub id_company: String,
    pub id_subscription_plan: String,
    pub is_active: Option<bool>,
    pub license_period: i64,
    pub price: f64,
    pub discount: f64,
    pub vat_percentage: f64,
    pub vat_value: f64,
    pub final_price: f64,
    pub start_date: DateTime<Utc>,
}

fn check_period(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> DomainResult<()> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(DomainError::validation("endDate must not precede startDate"));
        }
    }
    Ok(())
}

fn check_amounts(amounts: &[(&str, Option<f64>)]) -> DomainResult<()> {
    for (field, value) in amounts {
        if let Some(v) = value {
            require_non_negative(field, *v)?;
        }
    }
    Ok(())
}

impl Draft for CreateCompanySubscription {
    type Record = CompanySubscription;

    fn validate(&self) -> DomainResult<()> {
        require_non_empty("billingCycle", &self.billing_cycle)?;
        require_non_empty("idCompany", &self.id_company)?;
        require_non_empty("idSubscriptionPlan", &self.id_subscription_plan)?;
        if self.license_period < 0 {
            return Err(DomainError::validation("licensePeriod must not be negative"));
        }
        check_amounts(&[
            ("price", Some(self.price)),
            ("discount", Some(self.discount)),
            ("vatPercentage", Some(self.vat_percentage)),
            ("vatValue", Some(self.vat_value)),
            ("finalPrice", Some(self.final_price)),
        ])?;
        check_period(Some(self.start_date), Some(self.end_date))
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
pub struct UpdateCompanySubscription {
    pub billing_cycle: Option<String>,
    pub end_date: Option<DateTime<Utc>>,
    pub id_company: Option<String>,
    pub id_subscription_plan: Option<String>,
    pub is_active: Option<bool>,
    pub license_period: Option<i64>,
    pub price: Option<f64>,
    pub discount: Option<f64>,
    pub vat_percentage: Option<f64>,
    pub vat_value: Option<f64>,
    pub final_price: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
}

impl Patch for UpdateCompanySubscription {
    type Record = CompanySubscription;

    // Only checks a period when both ends are in the same patch; the stored
    // counterpart is not consulted.
    fn validate(&self) -> DomainResult<()> {
        if let Some(v) = &self.billing_cycle {
            require_non_empty("billingCycle", v)?;
        }
        if self.license_period.is_some_and(|p| p < 0) {
            return Err(DomainError::validation("licensePeriod must not be negative"));
        }
        check_amounts(&[
            ("price", self.price),
            ("discount", self.discount),
            ("vatPercentage", self.vat_percentage),
            ("vatValue", self.vat_value),
            ("finalPrice", self.final_price),
        ])?;
        check_period(self.start_date, self.end_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tenantry_core::Document;

    fn draft() -> CreateCompanySubscription {
        serde_json::from_value(json!({
            "billingCycle": "monthly",
            "startDate": "2025-01-01T00:00:00Z",
            "endDate": "2025-12-31T23:59:59Z",
            "idCompany": "c1",
            "idSubscriptionPlan": "p1",
            "licensePeriod": 12,
            "price": 100.0,
            "discount": 10.0,
            "vatPercentage": 19.0,
            "vatValue": 17.1,
            "finalPrice": 107.1
        }))
        .unwrap()
    }

    #[test]
    fn dates_round_trip_through_documents() {
        let d = draft();
        d.validate().unwrap();
        let start = d.start_date;
        let fields = d.into_fields(Utc::now()).unwrap();
        let sub = CompanySubscription::from_document(Document::new("s1".parse().unwrap(), fields))
            .unwrap();
        assert_eq!(sub.start_date, start);
        assert_eq!(sub.billing_cycle, "monthly");
        assert!(sub.is_active);
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut d = draft();
        std::mem::swap(&mut d.start_date, &mut d.end_date);
        assert!(matches!(d.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn negative_amounts_are_rejected_in_updates() {
        let u = UpdateCompanySubscription { discount: Some(-1.0), ..Default::default() };
        assert!(u.validate().is_err());
        let ok = UpdateCompanySubscription { final_price: Some(0.0), ..Default::default() };
        assert!(ok.validate().is_ok());
    }
}
