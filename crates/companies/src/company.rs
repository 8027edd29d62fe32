use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use tenantry_core::record::{require_email, require_non_empty, stamp_created, to_fields};
use tenantry_core::{DocumentId, DomainResult, Draft, Entity, Fields, Patch, Record};

/// A customer company (tenant) of the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: DocumentId,
    pub address: Option<String>,
    pub city: String,
    /// Any JSON number; integral codes keep their integer form.
    pub company_code: Option<Number>,
    pub company_name: String,
    pub contact_name: Option<String>,
    pub country: String,
    #[serde(default = "Utc::now")]
    pub created_date: DateTime<Utc>,
    pub description: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    /// Id of the parent company, for branches.
    pub main_company: Option<String>,
    /// Tax identification number.
    pub nit: String,
    pub phone: String,
    pub region: String,
}

impl Entity for Company {
    type Id = DocumentId;

    fn id(&self) -> &DocumentId {
        &self.id
    }
}

impl Record for Company {
    const COLLECTION: &'static str = "companies";
    const LABEL: &'static str = "Company";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateCompany {
    pub address: Option<String>,
    pub city: String,
    pub company_code: Option<Number>,
    pub company_name: String,
    pub contact_name: Option<String>,
    pub country: String,
    pub description: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
    pub main_company: Option<String>,
    pub nit: String,
    pub phone: String,
    pub region: String,
}

impl Draft for CreateCompany {
    type Record = Company;

    fn validate(&self) -> DomainResult<()> {
        require_non_empty("city", &self.city)?;
        require_non_empty("companyName", &self.company_name)?;
        require_non_empty("country", &self.country)?;
        require_non_empty("nit", &self.nit)?;
        require_non_empty("phone", &self.phone)?;
        require_non_empty("region", &self.region)?;
        if let Some(email) = &self.email {
            require_email("email", email)?;
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
pub struct UpdateCompany {
    pub address: Option<String>,
    pub city: Option<String>,
    pub company_code: Option<Number>,
    pub company_name: Option<String>,
    pub contact_name: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
    pub main_company: Option<String>,
    pub nit: Option<String>,
    pub phone: Option<String>,
    pub region: Option<String>,
}

impl Patch for UpdateCompany {
    type Record = Company;

    fn validate(&self) -> DomainResult<()> {
        for (field, value) in [
            ("city", &self.city),
            ("companyName", &self.company_name),
            ("country", &self.country),
            ("nit", &self.nit),
            ("phone", &self.phone),
            ("region", &self.region),
        ] {
            if let Some(v) = value {
                require_non_empty(field, v)?;
            }
        }
        if let Some(email) = &self.email {
            require_email("email", email)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tenantry_core::{Document, DomainError};

    fn draft() -> CreateCompany {
        serde_json::from_value(json!({
            "city": "Bogotá",
            "companyName": "Lavaautos SAS",
            "country": "CO",
            "nit": "900123456-7",
            "phone": "+57 300 000 0000",
            "region": "Cundinamarca",
            "email": "admin@lavaautos.co"
        }))
        .unwrap()
    }

    #[test]
    fn new_company_defaults_to_active_and_is_stamped() {
        let now = Utc::now();
        let fields = draft().into_fields(now).unwrap();
        assert_eq!(fields["isActive"], true);
        assert_eq!(fields["companyName"], "Lavaautos SAS");
        assert!(fields.contains_key("createdDate"));
        assert!(!fields.contains_key("address"));
        assert!(!fields.contains_key("id"));

        let company = Company::from_document(Document::new("c1".parse().unwrap(), fields)).unwrap();
        assert_eq!(company.id.as_str(), "c1");
        assert!(company.is_active);
        assert_eq!(company.created_date, now);
    }

    #[test]
    fn explicit_inactive_flag_is_kept() {
        let mut d = draft();
        d.is_active = Some(false);
        assert_eq!(d.into_fields(Utc::now()).unwrap()["isActive"], false);
    }

    #[test]
    fn validation_rejects_blank_required_fields_and_bad_email() {
        let mut d = draft();
        d.nit = "  ".into();
        assert!(matches!(d.validate(), Err(DomainError::Validation(m)) if m.contains("nit")));

        let mut d = draft();
        d.email = Some("not-an-email".into());
        assert!(d.validate().is_err());
    }

    #[test]
    fn company_code_accepts_any_number() {
        let mut d = draft();
        d.company_code = serde_json::from_value(json!(12.5)).unwrap();
        let fields = d.into_fields(Utc::now()).unwrap();
        assert_eq!(fields["companyCode"], json!(12.5));

        let mut d = draft();
        d.company_code = serde_json::from_value(json!(7)).unwrap();
        assert_eq!(d.into_fields(Utc::now()).unwrap()["companyCode"], json!(7));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let res = serde_json::from_value::<CreateCompany>(json!({
            "city": "x", "companyName": "x", "country": "x", "nit": "x",
            "phone": "x", "region": "x", "createdDate": "2020-01-01T00:00:00Z"
        }));
        assert!(res.is_err());
    }

    #[test]
    fn update_only_carries_present_fields() {
        let update = UpdateCompany { phone: Some("123".into()), ..Default::default() };
        update.validate().unwrap();
        let fields = update.into_fields().unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["phone"], "123");

        let blank = UpdateCompany { city: Some("".into()), ..Default::default() };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn legacy_documents_without_created_date_still_map() {
        let fields = json!({
            "city": "Cali", "companyName": "X", "country": "CO", "nit": "1",
            "phone": "2", "region": "Valle", "isActive": true
        });
        let doc = Document::new("c2".parse().unwrap(), fields.as_object().cloned().unwrap());
        let company = Company::from_document(doc).unwrap();
        assert_eq!(company.city, "Cali");
    }
}
