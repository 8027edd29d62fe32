use std::sync::Arc;

use serde_json::Value;

use tenantry_auth::{Authenticator, PasswordSignIn, PrincipalId};
use tenantry_companies::{Company, CompanyModule, CompanySubscription};
use tenantry_core::DocumentId;
use tenantry_infra::Backend;
use tenantry_infra::Repository;
use tenantry_infra::document_store::DocumentStore;
use tenantry_plans::{AppModule, SubscriptionPlan, SubscriptionPlanModule};
use tenantry_regions::Region;

/// Collection holding per-user profile documents, keyed by uid.
pub const USERS_COLLECTION: &str = "users";

/// Everything handlers need, built once from the [`Backend`].
#[derive(Clone)]
pub struct AppServices {
    pub authenticator: Authenticator,
    pub sign_in: Arc<dyn PasswordSignIn>,
    pub documents: Arc<dyn DocumentStore>,

    pub companies: Repository<Company>,
    pub company_modules: Repository<CompanyModule>,
    pub company_subscriptions: Repository<CompanySubscription>,
    pub subscription_plans: Repository<SubscriptionPlan>,
    pub subscription_plan_modules: Repository<SubscriptionPlanModule>,
    pub app_modules: Repository<AppModule>,
    pub regions: Repository<Region>,
}

impl AppServices {
    pub fn new(backend: &Backend) -> Self {
        let docs = backend.documents.clone();
        Self {
            authenticator: Authenticator::new(backend.identity.clone()),
            sign_in: backend.sign_in.clone(),
            documents: docs.clone(),
            companies: Repository::new(docs.clone()),
            company_modules: Repository::new(docs.clone()),
            company_subscriptions: Repository::new(docs.clone()),
            subscription_plans: Repository::new(docs.clone()),
            subscription_plan_modules: Repository::new(docs.clone()),
            app_modules: Repository::new(docs.clone()),
            regions: Repository::new(docs),
        }
    }

    /// Profile document of `uid`, if any.
    ///
    /// Lookup failures are logged and treated as "no profile"; they never fail
    /// a login.
    pub async fn user_profile(&self, uid: &PrincipalId) -> Option<Value> {
        let id = match DocumentId::new(uid.as_str()) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(%uid, error = %e, "uid is not a valid profile id");
                return None;
            }
        };
        match self.documents.get(USERS_COLLECTION, &id).await {
            Ok(Some(doc)) => {
                let mut fields = doc.fields;
                fields.insert("id".to_string(), Value::String(doc.id.to_string()));
                Some(Value::Object(fields))
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(%uid, error = %e, "user profile lookup failed");
                None
            }
        }
    }
}
