//! Companies (tenants) and what they are subscribed to.

pub mod company;
pub mod company_module;
pub mod company_subscription;

pub use company::{Company, CreateCompany, UpdateCompany};
pub use company_module::{CompanyModule, CreateCompanyModule, UpdateCompanyModule};
pub use company_subscription::{
    CompanySubscription, CreateCompanySubscription, UpdateCompanySubscription,
};
