use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use tenantry_core::record::{require_non_empty, require_non_negative, stamp_created, to_fields};
use tenantry_core::{DocumentId, DomainError, DomainResult, Draft, Entity, Fields, Patch, Record};

/// An application module enabled for a company, with its register limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyModule {
    pub id: DocumentId,
    pub additional_module_price: f64,
    #[serde(default = "Utc::now")]
    pub created_date: DateTime<Utc>,
    pub id_app_module: String,
    pub id_company: String,
    #[serde(default)]
    pub is_active: bool,
    /// Bought on top of the subscription plan.
    pub is_additional_module: bool,
    pub is_unlimited_registers: bool,
    pub registers_limit_company: i64,
    pub registers_limit_plan: i64,
}

impl Entity for CompanyModule {
    type Id = DocumentId;

    fn id(&self) -> &DocumentId {
        &self.id
    }
}

impl Record for CompanyModule {
    const COLLECTION: &'static str = "companyModules";
    const LABEL: &'static str = "Company module";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateCompanyModule {
    pub additional_module_price: f64,
    pub id_app_module: String,
    pub id_company: String,
    pub is_active: Option<bool>,
    pub is_additional_module: bool,
    pub is_unlimited_registers: bool,
    pub registers_limit_company: i64,
    pub registers_limit_plan: i64,
}

fn check_limits(company: Option<i64>, plan: Option<i64>) -> DomainResult<()> {
    if company.is_some_and(|v| v < 0) || plan.is_some_and(|v| v < 0) {
        return Err(DomainError::validation("register limits must not be negative"));
    }
    Ok(())
}

impl Draft for CreateCompanyModule {
    type Record = CompanyModule;

    fn validate(&self) -> DomainResult<()> {
        require_non_empty("idAppModule", &self.id_app_module)?;
        require_non_empty("idCompany", &self.id_company)?;
        require_non_negative("additionalModulePrice", self.additional_module_price)?;
        check_limits(Some(self.registers_limit_company), Some(self.registers_limit_plan))
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
pub struct UpdateCompanyModule {
    pub additional_module_price: Option<f64>,
    pub id_app_module: Option<String>,
    pub id_company: Option<String>,
    pub is_active: Option<bool>,
    pub is_additional_module: Option<bool>,
    pub is_unlimited_registers: Option<bool>,
    pub registers_limit_company: Option<i64>,
    pub registers_limit_plan: Option<i64>,
}

impl Patch for UpdateCompanyModule {
    type Record = CompanyModule;

    fn validate(&self) -> DomainResult<()> {
        if let Some(v) = &self.id_app_module {
            require_non_empty("idAppModule", v)?;
        }
        if let Some(v) = &self.id_company {
            require_non_empty("idCompany", v)?;
        }
        if let Some(price) = self.additional_module_price {
            require_non_negative("additionalModulePrice", price)?;
        }
        check_limits(self.registers_limit_company, self.registers_limit_plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft() -> CreateCompanyModule {
        serde_json::from_value(json!({
            "additionalModulePrice": 15.5,
            "idAppModule": "m1",
            "idCompany": "c1",
            "isAdditionalModule": false,
            "isUnlimitedRegisters": false,
            "registersLimitCompany": 100,
            "registersLimitPlan": 50
        }))
        .unwrap()
    }

    #[test]
    fn valid_draft_becomes_active_document() {
        let d = draft();
        d.validate().unwrap();
        let fields = d.into_fields(Utc::now()).unwrap();
        assert_eq!(fields["isActive"], true);
        assert_eq!(fields["idCompany"], "c1");
        assert_eq!(fields["registersLimitPlan"], 50);
    }

    #[test]
    fn negative_values_are_rejected() {
        let mut d = draft();
        d.registers_limit_plan = -1;
        assert!(d.validate().is_err());

        let mut d = draft();
        d.additional_module_price = -0.01;
        assert!(d.validate().is_err());

        let u = UpdateCompanyModule { registers_limit_company: Some(-5), ..Default::default() };
        assert!(u.validate().is_err());
    }
}
